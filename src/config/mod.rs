// ============================================================================
// Store Settings
// ============================================================================

use serde::Deserialize;

use crate::context::StatementLogging;
use crate::core::{Result, SessionError};

/// The default configuration section settings are loaded from.
pub const DEFAULT_SECTION: &str = "database";

/// Connection settings for the store a session family runs against.
///
/// Loaded from a named section of a JSON configuration document, e.g.
///
/// ```json
/// { "database": { "connection_string": "server=db1;db=app", "logging_enabled": true } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreSettings {
    /// Connection string to the target database.
    pub connection_string: String,

    /// Whether statement logging is enabled. Default is false.
    #[serde(default)]
    pub logging_enabled: bool,
}

impl StoreSettings {
    pub fn new(connection_string: &str) -> Self {
        Self {
            connection_string: connection_string.to_string(),
            logging_enabled: false,
        }
    }

    /// Enable or disable statement logging.
    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Loads settings from the `"database"` section.
    pub fn from_configuration(config: &serde_json::Value) -> Result<Self> {
        Self::from_section(config, DEFAULT_SECTION)
    }

    /// Loads settings from a named section of a configuration document.
    pub fn from_section(config: &serde_json::Value, section: &str) -> Result<Self> {
        if section.trim().is_empty() {
            return Err(SessionError::InvalidArgument(
                "section name must not be empty or whitespace".to_string(),
            ));
        }
        let body = config.get(section).ok_or_else(|| {
            SessionError::Config(format!(
                "store settings could not be retrieved from configuration section \"{section}\""
            ))
        })?;
        let settings: StoreSettings = serde_json::from_value(body.clone())
            .map_err(|err| SessionError::Config(format!("invalid \"{section}\" section: {err}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(SessionError::InvalidArgument(
                "connection_string must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Turns statement logging on for the context when the settings ask for it.
/// Leaves the context untouched otherwise.
pub fn apply_statement_logging<C: StatementLogging>(context: &mut C, settings: &StoreSettings) {
    if settings.logging_enabled {
        context.set_statement_logging(true);
        log::debug!("statement logging enabled from settings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_default_section() {
        let config = json!({
            "database": {
                "connection_string": "server=localhost;db=app",
                "logging_enabled": true
            }
        });

        let settings = StoreSettings::from_configuration(&config).unwrap();
        assert_eq!(settings.connection_string, "server=localhost;db=app");
        assert!(settings.logging_enabled);
    }

    #[test]
    fn test_logging_defaults_to_disabled() {
        let config = json!({
            "database": { "connection_string": "server=localhost;db=app" }
        });

        let settings = StoreSettings::from_configuration(&config).unwrap();
        assert!(!settings.logging_enabled);
    }

    #[test]
    fn test_custom_section_name() {
        let config = json!({
            "reporting_db": { "connection_string": "server=db2" }
        });

        let settings = StoreSettings::from_section(&config, "reporting_db").unwrap();
        assert_eq!(settings.connection_string, "server=db2");
    }

    #[test]
    fn test_blank_section_name_is_invalid_argument() {
        let config = json!({});
        let err = StoreSettings::from_section(&config, "  ").unwrap_err();
        assert!(matches!(err, SessionError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let config = json!({ "other": {} });
        let err = StoreSettings::from_section(&config, "database").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_empty_connection_string_rejected() {
        let config = json!({
            "database": { "connection_string": "" }
        });
        let err = StoreSettings::from_configuration(&config).unwrap_err();
        assert!(matches!(err, SessionError::InvalidArgument(_)));
    }

    #[test]
    fn test_builder() {
        let settings = StoreSettings::new("server=db1").logging_enabled(true);
        assert!(settings.logging_enabled);
        assert!(settings.validate().is_ok());
    }
}
