//! Configuration Files
//!
//! TOML in, validated `DispenserConfig` out. Missing sections and fields
//! fall back to the factory board (8 tokens, 270 ms window, three roles).

use crate::domain::config::{ConfigError, DispenserConfig};
use std::path::Path;

/// File name `canteen init` writes by default.
pub const DEFAULT_CONFIG_FILE: &str = "canteen.toml";

impl DispenserConfig {
    /// Read and validate a TOML file.
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` if
    /// it is not valid TOML for this schema, or any validation error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// `ConfigError::Parse` or any validation error.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    /// `ConfigError::Parse` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Write as TOML to `path`, replacing any existing file.
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatcher::LineId;
    use crate::domain::roles::{RoleKind, Trigger};
    use std::time::Duration;

    #[test]
    fn test_empty_file_is_factory_board() {
        let config = DispenserConfig::parse("").unwrap();
        assert_eq!(config, DispenserConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DispenserConfig::parse(
            r#"
            [pool]
            capacity = 4

            [[roles]]
            kind = "entrance"
            line = 5

            [[roles]]
            kind = "reset"
            cooldown_ms = 500
            trigger = { mode = "timer", period_ms = 60000 }
            "#,
        )
        .unwrap();

        assert_eq!(config.pool.capacity, 4);
        assert_eq!(config.debounce.window_ms, 270);
        assert_eq!(config.roles.len(), 2);
        assert_eq!(config.roles[0].line, Some(LineId::ENTRANCE));
        assert_eq!(config.roles[1].kind, RoleKind::Reset);
        assert_eq!(config.roles[1].trigger, Trigger::Timer { period_ms: 60_000 });
        assert_eq!(config.roles[1].cooldown(), Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_toml() {
        let err = DispenserConfig::parse("[pool\ncapacity = 8").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_parsed_config_is_validated() {
        let err = DispenserConfig::parse("[pool]\ncapacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCapacity));
    }

    #[test]
    fn test_unknown_role_kind() {
        let err = DispenserConfig::parse("[[roles]]\nkind = \"cashier\"\nline = 7").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut config = DispenserConfig::default();
        config.roles[2] = crate::domain::config::RoleConfig::timed_reset(30_000);

        config.write_to(&path).unwrap();
        assert_eq!(DispenserConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = DispenserConfig::from_file(Path::new("/nonexistent/canteen.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/canteen.toml"));
    }
}
