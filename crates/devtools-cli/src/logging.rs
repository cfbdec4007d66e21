//! Tracing subscriber setup.
//!
//! The libraries only emit spans and events; the binary is the one place a
//! subscriber is installed.
//!
//! | Flag(s)   | Filter level |
//! |-----------|--------------|
//! | (none)    | WARN         |
//! | `-v`      | INFO         |
//! | `-vv`     | DEBUG        |
//! | `-vvv`    | TRACE        |
//! | `--quiet` | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Install the global subscriber. Call once, before any event fires.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(args)));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Same level for the binary and both libraries.
fn filter_for(args: &GlobalArgs) -> String {
    let level = derive_level(args);
    format!("devtools={level},devtools_core={level},devtools_adapters={level}")
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            settings: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn levels_follow_verbosity() {
        assert_eq!(derive_level(&args_with(0, false)), "warn");
        assert_eq!(derive_level(&args_with(1, false)), "info");
        assert_eq!(derive_level(&args_with(2, false)), "debug");
        assert_eq!(derive_level(&args_with(3, false)), "trace");
        assert_eq!(derive_level(&args_with(10, false)), "trace");
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(derive_level(&args_with(0, true)), "error");
        assert_eq!(derive_level(&args_with(3, true)), "error");
    }

    #[test]
    fn filter_covers_every_crate() {
        let filter = filter_for(&args_with(2, false));
        assert!(filter.contains("devtools=debug"));
        assert!(filter.contains("devtools_core=debug"));
        assert!(filter.contains("devtools_adapters=debug"));
    }
}
