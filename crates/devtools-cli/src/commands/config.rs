//! `devtools config`: inspect and initialise the tool settings.

use std::fs;

use crate::{
    cli::ConfigCommands,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    settings::AppSettings,
};

pub fn execute(cmd: ConfigCommands, settings: AppSettings, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = settings.get(&key).ok_or_else(|| CliError::ConfigError {
                message: format!("Unknown settings key: '{key}'"),
                source: None,
            })?;
            if output.is_json() {
                output.json(&serde_json::json!({ "key": key, "value": value }))?;
            } else {
                output.print(&value)?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&settings)?;
            } else {
                output.header("Current settings:")?;
                output.print(&to_toml(&settings)?)?;
            }
        }

        ConfigCommands::Path => {
            let path = settings.source.clone().unwrap_or_else(AppSettings::settings_path);
            output.print(&path.display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            let path = settings.source.clone().unwrap_or_else(AppSettings::settings_path);
            if path.exists() && !force {
                return Err(CliError::InvalidInput {
                    message: format!(
                        "settings file {} already exists; pass --force to overwrite",
                        path.display()
                    ),
                });
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_cli_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&path, to_toml(&AppSettings::default())?)
                .with_cli_context(|| format!("writing {}", path.display()))?;
            output.success(&format!("Default settings written to {}", path.display()))?;
        }
    }

    Ok(())
}

fn to_toml(settings: &AppSettings) -> CliResult<String> {
    toml::to_string_pretty(settings).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise settings: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serialise_to_toml() {
        let text = to_toml(&AppSettings::default()).unwrap();
        assert!(text.contains("[project]"));
        assert!(text.contains("flavor = \"simple\""));
        assert!(text.contains("addr = \"127.0.0.1:8000\""));
    }

    #[test]
    fn written_defaults_load_back() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, to_toml(&AppSettings::default()).unwrap()).unwrap();

        let loaded = AppSettings::load_with_env(Some(&path), Some(Default::default())).unwrap();
        assert_eq!(loaded.project, AppSettings::default().project);
        assert_eq!(loaded.webtools, AppSettings::default().webtools);
    }
}
