//! Host facts for `info` and the webtools page, read from the PHP binary.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use serde::Deserialize;
use tracing::{debug, instrument};

use devtools_core::{application::ports::EnvironmentProbe, domain::HostFacts};

/// Prints every fact as one JSON object; unknown values come out as `null`.
const PROBE_SCRIPT: &str = r#"echo json_encode([
    'version' => PHP_VERSION,
    'sapi' => php_sapi_name(),
    'binary' => PHP_BINARY,
    'extension_dir' => PHP_EXTENSION_DIR,
    'bin_dir' => PHP_BINDIR,
    'ini' => php_ini_loaded_file() ?: null,
    'framework' => class_exists('Phalcon\Version')
        ? \Phalcon\Version::get()
        : (extension_loaded('phalcon') ? phpversion('phalcon') : null),
]);"#;

#[derive(Debug, Default, Deserialize)]
struct PhpReport {
    version: Option<String>,
    sapi: Option<String>,
    binary: Option<String>,
    extension_dir: Option<String>,
    bin_dir: Option<String>,
    ini: Option<String>,
    framework: Option<String>,
}

/// Runs `php -r` once per probe. A missing or failing binary yields facts
/// with only the operating system filled in.
#[derive(Debug, Clone)]
pub struct PhpProbe {
    binary: PathBuf,
}

impl Default for PhpProbe {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("php"),
        }
    }
}

impl PhpProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self) -> Option<String> {
        let output = Command::new(&self.binary)
            .args(["-r", PROBE_SCRIPT])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => String::from_utf8(out.stdout).ok(),
            Ok(out) => {
                debug!(status = %out.status, "php exited unsuccessfully");
                None
            }
            Err(e) => {
                debug!(binary = %self.binary.display(), error = %e, "php not runnable");
                None
            }
        }
    }
}

impl EnvironmentProbe for PhpProbe {
    #[instrument(skip(self), fields(binary = %self.binary.display()))]
    fn probe(&self) -> HostFacts {
        let report = self.run().map(|out| parse_report(&out)).unwrap_or_default();
        facts_from(report)
    }
}

fn parse_report(stdout: &str) -> PhpReport {
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        debug!(error = %e, "unreadable php output");
        PhpReport::default()
    })
}

fn facts_from(report: PhpReport) -> HostFacts {
    HostFacts {
        os: Some(host_os()),
        framework_version: report.framework,
        php_version: report.version,
        php_sapi: report.sapi,
        php_binary: report.binary,
        php_extension_dir: report.extension_dir,
        php_bin_dir: report.bin_dir,
        php_ini: report.ini,
    }
}

fn host_os() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
