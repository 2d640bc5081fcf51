//! Application configuration
//!
//! The config struct lives in esoparse-types; this module adds the
//! platform-specific defaults and confy persistence.

pub use esoparse_types::AppConfig;

use std::path::Path;

use crate::context::ConfigError;
use crate::game_data::GearSetTable;

const APP_NAME: &str = "esoparse";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub fn default_log_directory() -> String {
    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        dirs::document_dir()
            .map(|p| p.join("Elder Scrolls Online/live/Logs"))
            .and_then(|p| p.to_str().map(String::from))
            .unwrap_or_default()
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs::home_dir()
            .map(|p| {
                p.join(".local/share/Steam/steamapps/compatdata/306130/pfx/drive_c/users/steamuser/Documents/Elder Scrolls Online/live/Logs")
            })
            .and_then(|p| p.to_str().map(String::from))
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Result<Self, ConfigError>;
    fn load_with_defaults() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
    fn load_gear_sets(&self) -> Result<GearSetTable, ConfigError>;
}

impl AppConfigExt for AppConfig {
    /// Load from the platform config dir. A missing file yields defaults
    /// (confy writes it out); an unreadable one is an error.
    fn load() -> Result<Self, ConfigError> {
        let mut config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        if config.log_directory.is_empty() {
            config.log_directory = default_log_directory();
        }
        config.validate()?;
        Ok(config)
    }

    fn load_with_defaults() -> Self {
        AppConfig::with_log_directory(default_log_directory())
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.retained_encounters == 0 {
            return Err(ConfigError::InvalidRetention);
        }
        Ok(())
    }

    /// Builtin table, extended by the configured TOML file when set.
    fn load_gear_sets(&self) -> Result<GearSetTable, ConfigError> {
        match &self.gear_set_table {
            Some(path) => GearSetTable::from_toml_file(Path::new(path)),
            None => Ok(GearSetTable::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_retention_is_rejected() {
        let config = AppConfig {
            retained_encounters: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRetention)));
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn gear_sets_default_to_builtin() {
        let table = AppConfig::default().load_gear_sets().unwrap();
        assert_eq!(table.set_count(), GearSetTable::builtin().set_count());
    }

    #[test]
    fn configured_gear_table_must_exist() {
        let config = AppConfig {
            gear_set_table: Some("/definitely/not/here/sets.toml".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.load_gear_sets(),
            Err(ConfigError::MissingGearTable { .. })
        ));
    }
}
