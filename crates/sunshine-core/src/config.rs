use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Cached-data addressing settings
    #[serde(default)]
    pub data: DataConfig,

    /// Background sync settings
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Content authority used to build record URIs.
    ///
    /// Must be a globally unique reverse-domain string; every record URI is
    /// rooted at `content://<authority>`.
    pub authority: String,

    /// File name of the local weather database, created under `config_dir`
    pub database_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            authority: "com.example.android.sunshine".to_string(),
            database_file: "weather.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Interval between scheduled sync runs, in minutes
    #[serde(default = "default_sync_interval")]
    pub interval_minutes: u32,
}

fn default_sync_interval() -> u32 {
    180
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_sync_interval(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sunshine");

        Self {
            config_dir,
            data: DataConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::NotFound(format!("{}: {}", config_path.display(), e))
        })?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if validation fails with critical
    /// errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.ensure_valid()?;

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate, turning any validation error into a [`ConfigError`] while
    /// keeping the warnings for the caller to report.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] carrying the error summary.
    pub fn ensure_valid(&self) -> Result<ValidationResult, ConfigError> {
        let validation = self.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }
        Ok(validation)
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Validate the content authority
        if self.data.authority.is_empty() {
            result.add_error("data.authority", "Content authority must not be empty");
        } else {
            match Url::parse(&format!("content://{}", self.data.authority)) {
                Ok(url) => {
                    if url.host_str() != Some(self.data.authority.as_str()) {
                        result.add_error(
                            "data.authority",
                            format!(
                                "Authority must be a plain host name, got: {}",
                                self.data.authority
                            ),
                        );
                    }
                }
                Err(e) => {
                    result.add_error("data.authority", format!("Invalid authority: {}", e));
                }
            }
        }

        // Validate the database file name
        if self.data.database_file.is_empty() {
            result.add_error("data.database_file", "Database file name must not be empty");
        } else if self.data.database_file.contains(std::path::MAIN_SEPARATOR) {
            result.add_error(
                "data.database_file",
                "Database file name must not contain path separators",
            );
        }

        // Validate sync interval
        if self.sync.interval_minutes == 0 {
            result.add_warning("sync.interval_minutes", "Scheduled sync disabled (0 minutes)");
        } else if self.sync.interval_minutes > 1440 {
            result.add_warning(
                "sync.interval_minutes",
                "Sync interval is more than 24 hours",
            );
        }

        result
    }

    /// Path of the local weather database file
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(&self.data.database_file)
    }

    /// Path of the persisted user settings file
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Invalid(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)
            .map_err(|e| ConfigError::Invalid(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("platform config directory".to_string()))?
            .join("sunshine");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
    }

    #[test]
    fn test_empty_authority() {
        let mut config = Config::default();
        config.data.authority = String::new();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "data.authority"));
    }

    #[test]
    fn test_authority_with_path_segment() {
        let mut config = Config::default();
        config.data.authority = "com.example/weather".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "data.authority"));
    }

    #[test]
    fn test_database_file_with_separator() {
        let mut config = Config::default();
        config.data.database_file = format!("nested{}weather.db", std::path::MAIN_SEPARATOR);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "data.database_file"));
    }

    #[test]
    fn test_zero_sync_interval_is_warning() {
        let mut config = Config::default();
        config.sync.interval_minutes = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "sync.interval_minutes"));
    }

    #[test]
    fn test_ensure_valid_surfaces_config_error() {
        let mut config = Config::default();
        config.data.authority = String::new();

        let err = match config.ensure_valid() {
            Err(e) => e,
            Ok(_) => panic!("invalid config accepted"),
        };
        assert!(matches!(err, ConfigError::Invalid(_)));

        // The error carries through to the app-level display path.
        let app_err: crate::error::AppError = err.into();
        assert_eq!(
            app_err.user_message(),
            "Invalid configuration. Check your settings."
        );
    }

    #[test]
    fn test_ensure_valid_keeps_warnings() {
        let mut config = Config::default();
        config.sync.interval_minutes = 0;
        let validation = match config.ensure_valid() {
            Ok(v) => v,
            Err(e) => panic!("valid config rejected: {}", e),
        };
        assert!(!validation.warnings.is_empty());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_database_path_under_config_dir() {
        let config = Config::default();
        let path = config.database_path();
        assert!(path.starts_with(&config.config_dir));
        assert!(path.ends_with("weather.db"));
    }
}
