//! Parser configuration loaded from `~/.config/timetab/config.toml`.
//!
//! ```toml
//! field_mode = "roles"
//! day_tolerance = 15
//! day_start = "09:00"
//! strict = false
//! require_period = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::schedule::ParserConfig;

/// Load the parser configuration.
///
/// Reads `path` when given, otherwise the default location. A missing
/// default file yields [`ParserConfig::default`]; a missing explicit file
/// is an error.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_path();
            if !path.exists() {
                return Ok(ParserConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    parse_config(&content).with_context(|| format!("invalid TOML in {}", path.display()))
}

/// Parse configuration TOML; absent keys keep their defaults.
pub fn parse_config(content: &str) -> Result<ParserConfig> {
    Ok(toml::from_str(content)?)
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timetab")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FieldMode;

    #[test]
    fn parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
field_mode = "roles"
day_start = "08:00"
"#,
        )
        .unwrap();
        assert_eq!(config.field_mode, FieldMode::Roles);
        assert_eq!(config.day_start, "08:00");
        assert_eq!(config.day_tolerance, 15);
        assert!(config.require_period);
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
field_mode = "merged"
day_tolerance = 10
day_start = "08:30"
strict = true
require_period = false
"#,
        )
        .unwrap();
        assert_eq!(config.day_tolerance, 10);
        assert!(config.strict);
        assert!(!config.require_period);
    }

    #[test]
    fn rejects_unknown_field_mode() {
        assert!(parse_config(r#"field_mode = "positional""#).is_err());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let err = load_config(Some(Path::new("/nonexistent/timetab.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn config_path_ends_with_app_dir() {
        assert!(config_path().ends_with("timetab/config.toml"));
    }
}
