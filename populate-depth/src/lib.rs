//! Schema-driven populate directives for a headless CMS content API.
//!
//! Content API reads that do not say which relations to expand get a nested
//! `populate` directive computed from the content type's schema. Traversal is
//! bounded by per-type and per-path depth caps and stops at cycles.
//!
//! ```ignore
//! let configuration = Configuration::from_file("populate.yaml")?;
//! let registry = InMemorySchemaRegistry::from_file("schema.json")?;
//! let service = ServiceBuilder::new()
//!     .layer(InjectPopulateLayer::new(&configuration, Arc::new(registry)))
//!     .service(content_api);
//! ```

#![warn(unreachable_pub)]

mod configuration;
pub mod error;
pub mod inflection;
pub mod services;
mod spec;
pub mod subscriber;

pub use configuration::Configuration;
pub use configuration::ContentApi;
pub use configuration::DepthConfig;
pub use configuration::LogFormat;
pub use configuration::Logging;
pub use configuration::generate_config_schema;
pub use services::layers::inject_populate::InjectPopulateLayer;
pub use spec::AttributeDescriptor;
pub use spec::AttributeKind;
pub use spec::FieldPopulate;
pub use spec::InMemorySchemaRegistry;
pub use spec::Populate;
pub use spec::PopulateMap;
pub use spec::PopulateResolver;
pub use spec::RelationKind;
pub use spec::Schema;
pub use spec::SchemaIdentifier;
pub use spec::SchemaKind;
pub use spec::SchemaRegistry;
pub use spec::TraversalPath;
