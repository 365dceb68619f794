//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the config command against the file at `config_path`.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            Output::kv("File", &config_path.display().to_string());
            println!();
            println!("{}", rendered);
        }

        ConfigAction::Edit => {
            if write_if_missing(&settings, config_path)? {
                Output::info(&format!("Wrote defaults to {}", config_path.display()));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            Output::info(&format!("Opening {} in {}...", config_path.display(), editor));

            match std::process::Command::new(&editor).arg(config_path).status() {
                Ok(status) if status.success() => Output::success("Config saved."),
                Ok(status) => Output::warning(&format!("{} exited with {}", editor, status)),
                Err(e) => {
                    Output::error(&format!("Failed to start {}: {}", editor, e));
                    Output::info(&format!("Edit {} by hand instead.", config_path.display()));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// The config file in effect: `--config` if given, else the default location.
pub fn effective_path(flag: Option<&str>) -> PathBuf {
    flag.map(PathBuf::from)
        .unwrap_or_else(Settings::default_config_path)
}

/// Save `settings` to `path` unless a file is already there.
fn write_if_missing(settings: &Settings, path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    settings.save_to(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_path_prefers_flag() {
        assert_eq!(
            effective_path(Some("/tmp/hark-alt.toml")),
            PathBuf::from("/tmp/hark-alt.toml")
        );
        assert_eq!(effective_path(None), Settings::default_config_path());
    }

    #[test]
    fn test_write_if_missing_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hark.toml");
        let mut settings = Settings::default();
        settings.browse.page_size = 7;

        assert!(write_if_missing(&settings, &path).unwrap());
        assert!(!write_if_missing(&Settings::default(), &path).unwrap());

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.browse.page_size, 7);
    }

    #[test]
    fn test_path_action_ignores_default_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        run_config(&ConfigAction::Path, Settings::default(), &path).unwrap();
        assert!(!path.exists());
    }
}
