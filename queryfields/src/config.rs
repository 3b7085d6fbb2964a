//! Selector configuration: query parameter names and the name delimiter.
//!
//! Values can be set in code, or loaded with figment from defaults, an
//! optional TOML file, and `QUERYFIELDS_`-prefixed environment variables, in
//! that precedence order (later sources override earlier ones).

use std::fmt;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{QueryFieldsError, Result};

/// Default name of the include query parameter.
pub const DEFAULT_INCLUDE_ARG_NAME: &str = "fields";

/// Default name of the exclude query parameter.
pub const DEFAULT_EXCLUDE_ARG_NAME: &str = "fields!";

/// Default separator between field names inside one parameter value.
pub const DEFAULT_DELIMITER: &str = ",";

/// Environment variable prefix read by [`SelectorConfig::load`].
pub const ENV_PREFIX: &str = "QUERYFIELDS_";

/// RFC 1738 reserved characters that cannot appear in a delimiter.
pub const RESERVED_DELIMITER_CHARS: &[char] = &[';', '/', '?', ':', '@', '=', '&'];

/// How include/exclude field lists are read from a request's query string.
///
/// When filter backends share the query string, these parameter names must
/// not collide with model field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub include_arg_name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub exclude_arg_name: String,
    /// Splits one parameter value into field names. May be longer than one character.
    #[serde(deserialize_with = "scalar_string")]
    pub delimiter: String,
}

/// Accept any scalar as a string.
///
/// figment's `Env` provider types values, so `QUERYFIELDS_DELIMITER=1` arrives
/// as an integer rather than the string `"1"`.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarString;

    impl Visitor<'_> for ScalarString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or scalar value")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<String, E> {
            Ok(value)
        }

        fn visit_char<E: de::Error>(self, value: char) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ScalarString)
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            include_arg_name: DEFAULT_INCLUDE_ARG_NAME.to_string(),
            exclude_arg_name: DEFAULT_EXCLUDE_ARG_NAME.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl SelectorConfig {
    pub fn with_include_arg_name(mut self, name: impl Into<String>) -> Self {
        self.include_arg_name = name.into();
        self
    }

    pub fn with_exclude_arg_name(mut self, name: impl Into<String>) -> Self {
        self.exclude_arg_name = name.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Check the delimiter and parameter names.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() || self.delimiter.contains(RESERVED_DELIMITER_CHARS) {
            return Err(QueryFieldsError::InvalidDelimiter {
                delimiter: self.delimiter.clone(),
            });
        }

        for name in [&self.include_arg_name, &self.exclude_arg_name] {
            if name.is_empty() {
                return Err(QueryFieldsError::InvalidArgName {
                    name: name.clone(),
                    message: "parameter name cannot be empty".to_string(),
                });
            }
        }

        if self.include_arg_name == self.exclude_arg_name {
            return Err(QueryFieldsError::InvalidArgName {
                name: self.include_arg_name.clone(),
                message: "include and exclude parameters must differ".to_string(),
            });
        }

        Ok(())
    }

    /// Load from defaults and environment variables.
    pub fn load() -> Result<Self> {
        Self::extract(Self::base_figment())
    }

    /// Load from defaults, a TOML file, and environment variables.
    ///
    /// A missing file is treated as empty.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        trace!(path = %path.display(), "loading selector config file");

        let figment = Figment::new()
            .merge(Serialized::defaults(SelectorConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX));

        Self::extract(figment)
    }

    fn base_figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(SelectorConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: SelectorConfig = figment.extract()?;
        config.validate()?;

        debug!(
            include = %config.include_arg_name,
            exclude = %config.exclude_arg_name,
            delimiter = %config.delimiter,
            "selector config loaded"
        );

        Ok(config)
    }
}
