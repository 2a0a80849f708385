//! Depth caps for populate traversal.

use crate::configuration::DepthConfig;
use crate::spec::TraversalPath;

/// Cap for types in the shallow set.
pub(crate) const SHALLOW_DEPTH: u32 = 1;
/// Cap for types in the medium set.
pub(crate) const MEDIUM_DEPTH: u32 = 2;
/// Cap when no override matches.
pub(crate) const DEFAULT_DEPTH: u32 = 3;

/// The rule that decided how deep a type may be populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DepthLimit {
    Path(u32),
    Shallow,
    Medium,
    Default(u32),
}

impl DepthLimit {
    pub(crate) fn cap(self) -> u32 {
        match self {
            DepthLimit::Path(cap) | DepthLimit::Default(cap) => cap,
            DepthLimit::Shallow => SHALLOW_DEPTH,
            DepthLimit::Medium => MEDIUM_DEPTH,
        }
    }
}

/// Returns the cap applying to `type_id` reached through `path`. First match wins:
/// exact path override, shallow set, medium set, configured default.
pub(crate) fn limit_for(config: &DepthConfig, type_id: &str, path: &TraversalPath) -> DepthLimit {
    if !config.path_depth.is_empty()
        && let Some(cap) = config.path_depth.get(path.to_string().as_str())
    {
        return DepthLimit::Path(*cap);
    }
    if config.shallow.contains(type_id) {
        DepthLimit::Shallow
    } else if config.medium.contains(type_id) {
        DepthLimit::Medium
    } else {
        DepthLimit::Default(config.default_depth)
    }
}

/// Whether traversal must stop at `type_id` once `depth` levels deep.
pub(crate) fn should_stop(config: &DepthConfig, type_id: &str, depth: u32, path: &TraversalPath) -> bool {
    depth >= limit_for(config, type_id, path).cap()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> DepthConfig {
        serde_json::from_value(json!({
            "shallow": ["plugin::users-permissions.user"],
            "medium": ["api::category.category"],
            "path_depth": {
                "author": 2,
                "category.parent": 0
            }
        }))
        .unwrap()
    }

    #[test]
    fn default_cap() {
        let config = config();
        let path = TraversalPath::root();
        assert!(!should_stop(&config, "api::article.article", 0, &path));
        assert!(!should_stop(&config, "api::article.article", 2, &path));
        assert!(should_stop(&config, "api::article.article", 3, &path));
        assert!(should_stop(&config, "api::article.article", 7, &path));
    }

    #[test]
    fn type_caps() {
        let config = config();
        let path: TraversalPath = ["writer"].into_iter().collect();
        assert!(!should_stop(&config, "plugin::users-permissions.user", 0, &path));
        assert!(should_stop(&config, "plugin::users-permissions.user", 1, &path));
        assert!(!should_stop(&config, "api::category.category", 1, &path));
        assert!(should_stop(&config, "api::category.category", 2, &path));
    }

    #[test]
    fn path_override_takes_precedence() {
        let config = config();
        let author: TraversalPath = ["author"].into_iter().collect();
        // shallow type, but the path allows one more level
        assert_eq!(
            limit_for(&config, "plugin::users-permissions.user", &author),
            DepthLimit::Path(2)
        );
        assert!(!should_stop(&config, "plugin::users-permissions.user", 1, &author));
        assert!(should_stop(&config, "plugin::users-permissions.user", 2, &author));

        let parent: TraversalPath = ["category", "parent"].into_iter().collect();
        assert!(should_stop(&config, "api::category.category", 0, &parent));

        // only exact matches count
        let nested: TraversalPath = ["author", "avatar"].into_iter().collect();
        assert_eq!(
            limit_for(&config, "plugin::upload.file", &nested),
            DepthLimit::Default(DEFAULT_DEPTH)
        );
    }

    #[test]
    fn configured_default() {
        let config = DepthConfig {
            default_depth: 5,
            ..Default::default()
        };
        let path = TraversalPath::root();
        assert!(!should_stop(&config, "api::page.page", 4, &path));
        assert!(should_stop(&config, "api::page.page", 5, &path));
    }
}
