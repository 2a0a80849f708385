//! Resolver errors.
use displaydoc::Display;
use thiserror::Error;

pub use crate::configuration::ConfigurationError;

/// Errors raised while loading or querying a schema registry.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum SchemaError {
    /// could not read schema document: {0}
    Io(#[from] std::io::Error),

    /// could not parse schema document: {0}
    Parse(#[from] serde_json::Error),

    /// relation attribute '{attribute}' has no target
    MissingRelationTarget {
        /// The attribute declaring the relation.
        attribute: String,
    },

    /// component attribute '{attribute}' has no component type
    MissingComponent {
        /// The attribute declaring the component.
        attribute: String,
    },

    /// unknown relation kind '{kind}'
    UnknownRelationKind {
        /// The relation kind found in the schema document.
        kind: String,
    },

    /// schema registry lookup for '{type_id}' failed: {reason}
    Lookup {
        /// The identifier being resolved.
        type_id: String,
        /// Why the lookup failed.
        reason: String,
    },
}

/// Reasons a populate directive was not injected into a content API request.
///
/// None of these are returned to the client. The request is forwarded without a
/// computed directive and the error is logged.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum InjectionError {
    /// could not extract a content type from path '{path}'
    UnextractableContentType {
        /// The request path.
        path: String,
    },

    /// could not singularize content type name '{name}'
    UnsingularizableName {
        /// The plural name taken from the request path.
        name: String,
    },

    /// populate traversal failed for '{type_id}': {source}
    Traversal {
        /// The root type identifier of the traversal.
        type_id: String,
        /// The registry failure.
        source: SchemaError,
    },
}
