//! Schema model and populate traversal.

pub(crate) mod depth_limits;
mod path;
mod populate;
mod resolver;
mod schema;

pub use self::path::TraversalPath;
pub use self::populate::FieldPopulate;
pub use self::populate::Populate;
pub use self::populate::PopulateMap;
pub use self::resolver::PopulateResolver;
pub use self::schema::AttributeDescriptor;
pub use self::schema::AttributeKind;
pub use self::schema::InMemorySchemaRegistry;
pub use self::schema::RelationKind;
pub use self::schema::Schema;
pub use self::schema::SchemaIdentifier;
pub use self::schema::SchemaKind;
pub use self::schema::SchemaRegistry;
#[cfg(test)]
pub(crate) use self::schema::MockSchemaRegistry;
