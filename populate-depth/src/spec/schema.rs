//! Content type and component schemas, as exposed by the CMS schema registry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::error::SchemaError;

/// Opaque key naming a content type (`api::article.article`) or a component
/// (`shared.hero`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct SchemaIdentifier(String);

impl SchemaIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The canonical identifier of an API content type: `api::<name>.<name>`.
    pub fn api(name: &str) -> Self {
        Self(format!("api::{name}.{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SchemaIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SchemaIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How a relation attribute links its owner to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    OneWay,
    ManyWay,
    MorphToOne,
    MorphToMany,
    MorphOne,
    MorphMany,
}

impl RelationKind {
    /// Polymorphic relations point at records of arbitrary types.
    pub fn is_morph(self) -> bool {
        matches!(
            self,
            Self::MorphToOne | Self::MorphToMany | Self::MorphOne | Self::MorphMany
        )
    }
}

impl FromStr for RelationKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|_| {
            SchemaError::UnknownRelationKind {
                kind: s.to_string(),
            }
        })
    }
}

/// The kind of an attribute, with the data specific to that kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Relation {
        relation: RelationKind,
        /// `None` for polymorphic relations.
        target: Option<SchemaIdentifier>,
    },
    Media {
        multiple: bool,
    },
    Component {
        component: SchemaIdentifier,
        repeatable: bool,
    },
    DynamicZone {
        components: Vec<SchemaIdentifier>,
    },
    /// Scalars, enumerations, JSON, rich text...
    Primitive {
        r#type: String,
    },
}

/// One field of a schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub kind: AttributeKind,
    pub visible: bool,
}

impl AttributeDescriptor {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Attribute as written in a schema document, before its kind is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttribute {
    r#type: String,
    relation: Option<String>,
    target: Option<SchemaIdentifier>,
    component: Option<SchemaIdentifier>,
    #[serde(default)]
    components: Vec<SchemaIdentifier>,
    #[serde(default)]
    repeatable: bool,
    #[serde(default)]
    multiple: bool,
    visible: Option<bool>,
}

impl RawAttribute {
    fn into_descriptor(self, name: &str) -> Result<AttributeDescriptor, SchemaError> {
        let kind = match self.r#type.as_str() {
            "relation" => {
                let relation = self
                    .relation
                    .as_deref()
                    .unwrap_or("oneToOne")
                    .parse::<RelationKind>()?;
                // morph relations are polymorphic and declare no target
                if self.target.is_none() && !relation.is_morph() {
                    return Err(SchemaError::MissingRelationTarget {
                        attribute: name.to_string(),
                    });
                }
                AttributeKind::Relation {
                    relation,
                    target: self.target,
                }
            }
            "media" => AttributeKind::Media {
                multiple: self.multiple,
            },
            "component" => AttributeKind::Component {
                component: self.component.ok_or_else(|| SchemaError::MissingComponent {
                    attribute: name.to_string(),
                })?,
                repeatable: self.repeatable,
            },
            "dynamiczone" => AttributeKind::DynamicZone {
                components: self.components,
            },
            _ => AttributeKind::Primitive { r#type: self.r#type },
        };
        Ok(AttributeDescriptor {
            kind,
            visible: self.visible.unwrap_or(true),
        })
    }
}

/// Whether a schema is a content type or a reusable component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaKind {
    #[default]
    CollectionType,
    SingleType,
    Component,
}

/// The field declaration of a content type or component.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct Schema {
    /// Filled in from the key the schema is registered under. Empty for a schema
    /// deserialized on its own, traversal keys on the requested identifier instead.
    pub uid: SchemaIdentifier,
    pub kind: SchemaKind,
    /// Attributes in declaration order.
    pub attributes: IndexMap<String, AttributeDescriptor>,
}

#[derive(Deserialize)]
struct RawSchema {
    #[serde(default)]
    kind: SchemaKind,
    #[serde(default)]
    attributes: IndexMap<String, RawAttribute>,
}

impl TryFrom<RawSchema> for Schema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let attributes = raw
            .attributes
            .into_iter()
            .map(|(name, attribute)| {
                let descriptor = attribute.into_descriptor(&name)?;
                Ok((name, descriptor))
            })
            .collect::<Result<_, SchemaError>>()?;
        Ok(Self {
            uid: SchemaIdentifier::new(String::new()),
            kind: raw.kind,
            attributes,
        })
    }
}

impl Schema {
    pub fn new(uid: impl Into<SchemaIdentifier>, kind: SchemaKind) -> Self {
        Self {
            uid: uid.into(),
            kind,
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: AttributeDescriptor) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.get(name)
    }
}

impl From<String> for SchemaIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Runtime schema introspection.
///
/// Implementations must be safe to share between concurrent requests.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaRegistry: Send + Sync {
    /// Look up a content type or component.
    ///
    /// `Ok(None)` means the identifier is unknown. `Err` means the registry itself
    /// could not answer.
    fn model(&self, type_id: &str) -> Result<Option<Arc<Schema>>, SchemaError>;

    /// Whether an attribute is exposed through the content API.
    fn is_visible_attribute(&self, schema: &Schema, field: &str) -> bool {
        schema
            .attribute(field)
            .is_some_and(|attribute| attribute.visible)
    }
}

/// Schema document: every content type and component known to the CMS.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    #[serde(default)]
    content_types: IndexMap<SchemaIdentifier, Schema>,
    #[serde(default)]
    components: IndexMap<SchemaIdentifier, Schema>,
}

/// A [`SchemaRegistry`] holding every schema in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemorySchemaRegistry {
    models: HashMap<SchemaIdentifier, Arc<Schema>>,
}

impl InMemorySchemaRegistry {
    pub fn new(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            models: schemas
                .into_iter()
                .map(|schema| (schema.uid.clone(), Arc::new(schema)))
                .collect(),
        }
    }

    /// Parse a JSON schema document with `content_types` and `components` maps.
    pub fn parse(document: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(document)?;
        let content_types = document.content_types.into_iter().map(|(uid, schema)| Schema {
            uid,
            ..schema
        });
        let components = document.components.into_iter().map(|(uid, schema)| Schema {
            uid,
            kind: SchemaKind::Component,
            ..schema
        });
        let registry = Self::new(content_types.chain(components));
        tracing::debug!(models = registry.len(), "loaded schema registry");
        Ok(registry)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn insert(&mut self, schema: Schema) {
        self.models.insert(schema.uid.clone(), Arc::new(schema));
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn model(&self, type_id: &str) -> Result<Option<Arc<Schema>>, SchemaError> {
        Ok(self.models.get(type_id).cloned())
    }
}
