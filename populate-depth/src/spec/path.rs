use std::fmt;

use itertools::Itertools;

/// Field names from the traversal root to the current attribute.
///
/// Displayed joined with `.`, which is the key used for path depth overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraversalPath(Vec<String>);

impl TraversalPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path extended by one segment. `self` is left untouched so sibling
    /// branches can extend the same parent.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TraversalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for TraversalPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
