//! Visitor configuration.
//!
//! Settings are validated once, when they are built. Visitors only read them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Names of every recognized option.
pub const OPTIONS: &[&str] = &[
    "min_name_length",
    "max_name_length",
    "max_tuple_unpack_length",
    "forbidden_module_names",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid value for `{option}`: {reason}")]
    Invalid { option: String, reason: String },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Options consumed by the builtin visitors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Shortest allowed module name, ignoring leading and trailing underscores.
    pub min_name_length: usize,
    pub max_name_length: usize,
    /// Most names a single unpacking target may bind.
    pub max_tuple_unpack_length: usize,
    pub forbidden_module_names: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_name_length: 2,
            max_name_length: 45,
            max_tuple_unpack_length: 4,
            forbidden_module_names: ["util", "utils", "utilities", "helpers", "common", "misc"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = text.parse()?;
        if let Some(unknown) = table.keys().find(|k| !OPTIONS.contains(&k.as_str())) {
            return Err(ConfigError::UnknownOption(unknown.clone()));
        }
        let settings: Settings = toml::Value::Table(table).try_into()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Return a copy with one option overridden.
    pub fn with_option(
        &self,
        name: &str,
        value: impl Into<toml::Value>,
    ) -> Result<Self, ConfigError> {
        if !OPTIONS.contains(&name) {
            return Err(ConfigError::UnknownOption(name.to_string()));
        }
        let toml::Value::Table(mut table) =
            toml::Value::try_from(self).map_err(|err| invalid(name, err.to_string()))?
        else {
            return Err(invalid(name, "settings do not serialize to a table"));
        };
        table.insert(name.to_string(), value.into());
        let settings: Settings = toml::Value::Table(table)
            .try_into()
            .map_err(|err: toml::de::Error| invalid(name, err.message()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_name_length == 0 {
            return Err(invalid("min_name_length", "must be at least 1"));
        }
        if self.max_name_length < self.min_name_length {
            return Err(invalid(
                "max_name_length",
                format!("must not be below min_name_length ({})", self.min_name_length),
            ));
        }
        if self.max_tuple_unpack_length == 0 {
            return Err(invalid("max_tuple_unpack_length", "must be at least 1"));
        }
        Ok(())
    }

    /// JSON schema of the settings file.
    pub fn schema() -> serde_json::Value {
        schemars::schema_for!(Settings).to_value()
    }
}

fn invalid(option: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        option: option.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_tuple_unpack_length, 4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str("max_name_length = 20\n").unwrap();
        assert_eq!(settings.max_name_length, 20);
        assert_eq!(settings.min_name_length, 2);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Settings::from_toml_str("max_line_length = 80\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption(ref name) if name == "max_line_length"));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = Settings::from_toml_str("max_name_length = \"long\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn test_inconsistent_limits_rejected() {
        let err = Settings::from_toml_str("min_name_length = 10\nmax_name_length = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref option, .. } if option == "max_name_length"));
    }

    #[test]
    fn test_with_option() {
        let settings = Settings::default()
            .with_option("max_tuple_unpack_length", 6)
            .unwrap();
        assert_eq!(settings.max_tuple_unpack_length, 6);

        assert!(matches!(
            Settings::default().with_option("nope", 1),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            Settings::default().with_option("max_tuple_unpack_length", 0),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Settings::default().with_option("max_tuple_unpack_length", "four"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_schema_lists_options() {
        let schema = Settings::schema();
        let properties = schema["properties"].as_object().unwrap();
        for option in OPTIONS {
            assert!(properties.contains_key(*option), "{option}");
        }
    }
}
