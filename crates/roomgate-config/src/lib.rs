//! Configuration parsing and validation for roomgate
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Group-prefix -> access tag and room -> access tag tables
//! - Piano counts per room
//! - Booking-only role ids and locale prefixes for group codes
//! - Validation with clear error messages

mod policy;
mod schema;
mod validation;

pub use policy::*;
pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Policy> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Policy> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    let policy = Policy::from_raw(raw);
    debug!(
        groups = policy.acl.group_count(),
        rooms = policy.acl.room_count(),
        pianos = policy.pianos.len(),
        "Configuration parsed"
    );
    Ok(policy)
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_minimal_config() {
        let config = r#"
            config_version = 1

            [group_tags]
            KL = ["general", "classical", "practice"]

            [room_tags]
            D107 = "practice"
        "#;

        let policy = parse_config(config).unwrap();
        assert_eq!(policy.acl.tags_for_prefix("KL").unwrap().len(), 3);
        assert_eq!(policy.acl.room_tag("D107"), Some("practice"));
    }

    #[test]
    fn reject_wrong_version() {
        let config = r#"
            config_version = 99
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_tables() {
        let config = r#"
            config_version = 1

            [room_tags]
            "D107 klass" = "practice"

            [pianos]
            D303 = 3
        "#;

        match parse_config(config) {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "config_version = 1\n[pianos]\nB401 = 2").unwrap();

        let policy = load_config(file.path()).unwrap();
        assert_eq!(policy.pianos.count("B401"), 2);
    }
}
