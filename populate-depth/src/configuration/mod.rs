//! Logic for loading configuration in to an object model

mod content_api;
mod logging;
mod populate;
#[cfg(test)]
mod tests;

use std::path::Path;
use std::str::FromStr;

use displaydoc::Display;
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub use self::content_api::ContentApi;
pub use self::logging::LogFormat;
pub use self::logging::Logging;
pub use self::populate::DepthConfig;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not read configuration file: {0}
    CannotReadFile(#[from] std::io::Error),
    /// could not deserialize configuration: {0}
    DeserializeConfigError(#[from] serde_yaml::Error),
    /// {message}: {error}
    InvalidConfiguration {
        /// What is wrong.
        message: &'static str,
        /// The offending value.
        error: String,
    },
    /// type '{type_id}' is listed as both shallow and medium
    ConflictingDepthCaps {
        /// The type found in both sets.
        type_id: String,
    },
    /// include_only key '{key}' must have the form '<parentField>.<field>'
    InvalidIncludeOnlyKey {
        /// The malformed key.
        key: String,
    },
}

/// The resolver configuration.
///
/// Usually parsed from YAML with [`FromStr`] or [`Configuration::from_file`],
/// which also validate it. Can be created inline in Rust code with
/// `serde_json::json!` and `serde_json::from_value`, in which case
/// [`Configuration::validate`] should be called.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Depth caps and field rules for populate traversal.
    #[serde(default)]
    pub populate: DepthConfig,

    /// Which requests get a computed populate directive.
    #[serde(default)]
    pub content_api: ContentApi,

    /// Log output.
    #[serde(default)]
    pub logging: Logging,
}

impl Configuration {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let configuration: Self = std::fs::read_to_string(path)?.parse()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.populate.validate()?;
        self.content_api.validate()?;
        Ok(())
    }
}

/// Parse configuration from a string in YAML syntax
impl FromStr for Configuration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // an empty document is a valid, all-defaults configuration
        let configuration: Self = if s.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(s)?
        };
        configuration.validate()?;
        Ok(configuration)
    }
}

/// Generate a JSON schema of the configuration, for editor completion and validation.
pub fn generate_config_schema() -> RootSchema {
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = true;
        s.option_add_null_type = false;
        s.inline_subschemas = true;
    });
    settings.into_generator().into_root_schema_for::<Configuration>()
}
