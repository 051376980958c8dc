pub mod model;

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use std::path::{Path, PathBuf};

pub use model::{AppConfig, UiConfig};

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crabline")
        .join("config.toml")
}

/// Load the config from the default location; a missing file means defaults.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    validate_timestamp_format(&config.ui.timestamp_format)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

fn validate_timestamp_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        bail!("ui.timestamp_format '{}' is not a valid chrono format", format);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::LoggingConfig;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crabline-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = load_config_from(&temp_path("missing")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.ui.timestamp_format, "%y-%m-%d %H:%M:%S");
        assert!(cfg.ui.color);
        assert!(!cfg.connection.accept_invalid_certs);
        assert_eq!(cfg.connection.identify_timeout_secs, None);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = temp_path("partial");
        std::fs::write(
            &path,
            "[connection]\nidentify_timeout_secs = 30\n\n[ui]\ncolor = false\n",
        )
        .unwrap();
        let cfg = load_config_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.connection.identify_timeout_secs, Some(30));
        assert!(!cfg.ui.color);
        assert_eq!(cfg.ui.timestamp_format, "%y-%m-%d %H:%M:%S");
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_timestamp_format_is_rejected() {
        let path = temp_path("badformat");
        std::fs::write(&path, "[ui]\ntimestamp_format = \"%Q\"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{:#}", err).contains("ui.timestamp_format"));
    }

    #[test]
    fn test_default_timestamp_format_is_valid() {
        assert!(validate_timestamp_format(&UiConfig::default().timestamp_format).is_ok());
        assert!(validate_timestamp_format("%H:%M").is_ok());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[ui\ncolor = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{}", err).contains("Failed to parse config file"));
    }
}
