//! Depth and field overrides driving populate traversal.

use indexmap::IndexMap;
use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use super::ConfigurationError;
use crate::spec::SchemaIdentifier;
use crate::spec::depth_limits::DEFAULT_DEPTH;

/// Populate traversal configuration.
///
/// Loaded once at startup and shared read-only by every request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct DepthConfig {
    /// Depth at which traversal stops when no other rule matches.
    pub default_depth: u32,

    /// Types never populated past depth 1.
    pub shallow: IndexSet<SchemaIdentifier>,

    /// Types never populated past depth 2.
    pub medium: IndexSet<SchemaIdentifier>,

    /// Depth caps for exact traversal paths (`author.avatar`). Take precedence
    /// over type caps.
    pub path_depth: IndexMap<String, u32>,

    /// Fields never populated, per type.
    pub exclude_fields: IndexMap<SchemaIdentifier, IndexSet<String>>,

    /// Fields populated one level deep instead of recursing, keyed by
    /// `<parentField>.<field>`.
    pub include_only: IndexMap<String, Vec<String>>,

    /// When set, only relation fields with these names are populated.
    pub allowed_relations: Option<IndexSet<String>>,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_DEPTH,
            shallow: IndexSet::new(),
            medium: IndexSet::new(),
            path_depth: IndexMap::new(),
            exclude_fields: IndexMap::new(),
            include_only: IndexMap::new(),
            allowed_relations: None,
        }
    }
}

impl DepthConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.default_depth == 0 {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "populate.default_depth must be at least 1",
                error: "got 0".to_string(),
            });
        }
        if let Some(type_id) = self.shallow.iter().find(|id| self.medium.contains(*id)) {
            return Err(ConfigurationError::ConflictingDepthCaps {
                type_id: type_id.to_string(),
            });
        }
        for key in self.include_only.keys() {
            match key.split_once('.') {
                Some((parent, field)) if !parent.is_empty() && !field.is_empty() => {}
                _ => {
                    return Err(ConfigurationError::InvalidIncludeOnlyKey { key: key.clone() });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn is_excluded(&self, type_id: &str, field: &str) -> bool {
        self.exclude_fields
            .get(type_id)
            .is_some_and(|fields| fields.contains(field))
    }

    pub(crate) fn include_only(&self, parent: &str, field: &str) -> Option<&[String]> {
        self.include_only
            .get(format!("{parent}.{field}").as_str())
            .map(Vec::as_slice)
    }

    pub(crate) fn is_relation_allowed(&self, field: &str) -> bool {
        self.allowed_relations
            .as_ref()
            .is_none_or(|allowed| allowed.contains(field))
    }
}
