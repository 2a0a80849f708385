//! Content type names as they appear in request paths.

use inflector::string::singularize::to_singular;

/// Maps the plural name used in a content API route back to the singular
/// content type name (`articles` to `article`).
#[cfg_attr(test, mockall::automock)]
pub trait Pluralizer: Send + Sync {
    /// `None` when no singular form can be derived.
    fn singular(&self, plural: &str) -> Option<String>;
}

/// English inflection rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct InflectorPluralizer;

impl Pluralizer for InflectorPluralizer {
    fn singular(&self, plural: &str) -> Option<String> {
        if plural.is_empty() {
            return None;
        }
        let singular = to_singular(plural);
        (!singular.is_empty()).then_some(singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_forms() {
        let pluralizer = InflectorPluralizer;
        assert_eq!(pluralizer.singular("articles").as_deref(), Some("article"));
        assert_eq!(pluralizer.singular("categories").as_deref(), Some("category"));
        assert_eq!(pluralizer.singular("boxes").as_deref(), Some("box"));
        assert_eq!(pluralizer.singular(""), None);
    }
}
