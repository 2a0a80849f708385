use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use super::ConfigurationError;

/// Which requests get a computed populate directive.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct ContentApi {
    /// Path prefix of the content API.
    pub prefix: String,

    /// First path segments left untouched: identity administration and SEO
    /// metadata manage their own population.
    pub excluded_namespaces: Vec<String>,
}

fn default_prefix() -> String {
    "/api".to_string()
}

fn default_excluded_namespaces() -> Vec<String> {
    ["users-permissions", "users", "auth", "seo"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ContentApi {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            excluded_namespaces: default_excluded_namespaces(),
        }
    }
}

impl ContentApi {
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.prefix.starts_with('/') || (self.prefix.len() > 1 && self.prefix.ends_with('/')) {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "content_api.prefix must start with '/' and not end with one",
                error: self.prefix.clone(),
            });
        }
        Ok(())
    }

    /// The path below the prefix, without its leading slash, if `path` is a
    /// content API path.
    pub(crate) fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        let prefix = self.prefix.trim_end_matches('/');
        let rest = path.strip_prefix(prefix)?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    pub(crate) fn is_excluded(&self, namespace: &str) -> bool {
        self.excluded_namespaces.iter().any(|ns| ns == namespace)
    }
}
