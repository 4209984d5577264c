use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::curve::Granularity;

/// Presentation settings, read from an optional JSON file.
///
/// The fallback thresholds are constants in `processing::fallback`, not
/// settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_granularity: Granularity,
    pub currency_prefix: String,
    pub percent_decimals: usize,
    /// Rows per quarter in the executive grid.
    pub quarter_len: usize,
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_granularity: Granularity::Months,
            currency_prefix: "S/ ".to_string(),
            percent_decimals: 1,
            quarter_len: 3,
            pretty_json: true,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quarter_len == 0 {
            return Err(ConfigError::Invalid {
                field: "quarter_len",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.percent_decimals > 6 {
            return Err(ConfigError::Invalid {
                field: "percent_decimals",
                reason: format!("{} is more precision than the data carries", self.percent_decimals),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_granularity": "weeks", "quarter_len": 4}}"#).unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.default_granularity, Granularity::Weeks);
        assert_eq!(settings.quarter_len, 4);
        assert_eq!(settings.currency_prefix, "S/ ");
        assert!(settings.pretty_json);
    }

    #[test]
    fn zero_quarter_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"quarter_len": 0}}"#).unwrap();
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "quarter_len", .. }));
    }

    #[test]
    fn missing_file() {
        let err = Settings::from_file(Path::new("/nonexistent/evcurve.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
