//! The populate directive handed to the data-fetch layer.
//!
//! Serialized the way the content API reads its `populate` query parameter:
//!
//! ```json
//! {
//!   "category": { "populate": { "parent": { "populate": "*" } } },
//!   "cover": { "populate": "*" },
//!   "blocks": { "on": { "shared.hero": { "populate": "*" } } }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

pub(crate) const WILDCARD: &str = "*";

/// Field name to directive, in schema declaration order.
pub type PopulateMap = IndexMap<String, FieldPopulate>;

/// How much of a record to populate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Populate {
    /// Every relation, media and component one level deep, nothing further.
    All,
    /// Exactly these fields, one level deep.
    Only(Vec<String>),
    /// Per-field directives. Fields absent from the map are not populated.
    Fields(PopulateMap),
}

/// The directive for one field of a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldPopulate {
    /// `{ "populate": ... }`
    Populate(Populate),
    /// `{ "on": { "<component>": { "populate": ... } } }`, one entry per dynamic
    /// zone variant.
    On(IndexMap<String, Populate>),
}

impl Populate {
    pub fn is_empty(&self) -> bool {
        match self {
            Populate::All => false,
            Populate::Only(fields) => fields.is_empty(),
            Populate::Fields(fields) => fields.is_empty(),
        }
    }

    /// Empty mappings fall back to a flat populate.
    pub(crate) fn or_all(self) -> Self {
        if self.is_empty() { Populate::All } else { self }
    }

    /// The field directives, if this is a per-field mapping.
    pub fn fields(&self) -> Option<&PopulateMap> {
        match self {
            Populate::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// Bracketed query string pairs, e.g. `populate[category][populate]=*`.
    pub fn to_query_pairs(&self, prefix: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        self.push_query_pairs(prefix, &mut pairs);
        pairs
    }

    fn push_query_pairs(&self, prefix: &str, pairs: &mut Vec<(String, String)>) {
        match self {
            Populate::All => pairs.push((prefix.to_string(), WILDCARD.to_string())),
            Populate::Only(fields) => {
                for (index, field) in fields.iter().enumerate() {
                    pairs.push((format!("{prefix}[{index}]"), field.clone()));
                }
            }
            Populate::Fields(fields) => {
                for (name, field) in fields {
                    let prefix = format!("{prefix}[{name}]");
                    match field {
                        FieldPopulate::Populate(populate) => {
                            populate.push_query_pairs(&format!("{prefix}[populate]"), pairs)
                        }
                        FieldPopulate::On(variants) => {
                            for (variant, populate) in variants {
                                populate.push_query_pairs(
                                    &format!("{prefix}[on][{variant}][populate]"),
                                    pairs,
                                )
                            }
                        }
                    }
                }
            }
        }
    }
}

impl FieldPopulate {
    pub fn all() -> Self {
        FieldPopulate::Populate(Populate::All)
    }

    /// Wraps a nested directive, falling back to a flat populate when empty.
    pub(crate) fn nested(populate: Populate) -> Self {
        FieldPopulate::Populate(populate.or_all())
    }
}

impl From<&Populate> for Value {
    fn from(populate: &Populate) -> Self {
        match populate {
            Populate::All => Value::String(WILDCARD.to_string()),
            Populate::Only(fields) => {
                Value::Array(fields.iter().cloned().map(Value::String).collect())
            }
            Populate::Fields(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), Value::from(field)))
                    .collect(),
            ),
        }
    }
}

impl From<&FieldPopulate> for Value {
    fn from(field: &FieldPopulate) -> Self {
        match field {
            FieldPopulate::Populate(populate) => wrap("populate", Value::from(populate)),
            FieldPopulate::On(variants) => wrap(
                "on",
                Value::Object(
                    variants
                        .iter()
                        .map(|(variant, populate)| {
                            (variant.clone(), wrap("populate", Value::from(populate)))
                        })
                        .collect(),
                ),
            ),
        }
    }
}

fn wrap(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Value::Object(object)
}

impl Serialize for Populate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl Serialize for FieldPopulate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::indexmap;
    use serde_json::json;

    use super::*;

    fn article() -> Populate {
        Populate::Fields(indexmap! {
            "category".to_string() => FieldPopulate::nested(Populate::Fields(indexmap! {
                "parent".to_string() => FieldPopulate::all(),
            })),
            "cover".to_string() => FieldPopulate::all(),
            "author".to_string() => FieldPopulate::Populate(Populate::Only(vec![
                "name".to_string(),
                "avatar".to_string(),
            ])),
            "blocks".to_string() => FieldPopulate::On(indexmap! {
                "shared.hero".to_string() => Populate::All,
            }),
        })
    }

    #[test]
    fn serializes_as_content_api_populate() {
        assert_eq!(
            serde_json::to_value(article()).unwrap(),
            json!({
                "category": { "populate": { "parent": { "populate": "*" } } },
                "cover": { "populate": "*" },
                "author": { "populate": ["name", "avatar"] },
                "blocks": { "on": { "shared.hero": { "populate": "*" } } }
            })
        );
        assert_eq!(serde_json::to_value(Populate::All).unwrap(), json!("*"));
    }

    #[test]
    fn keeps_declaration_order() {
        let value = serde_json::to_value(article()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["category", "cover", "author", "blocks"]);
    }

    #[test]
    fn empty_nested_directives_fall_back_to_wildcard() {
        assert_eq!(
            FieldPopulate::nested(Populate::Fields(PopulateMap::new())),
            FieldPopulate::all()
        );
        assert!(Populate::Fields(PopulateMap::new()).is_empty());
        assert!(!Populate::All.is_empty());
    }

    #[test]
    fn query_pairs() {
        let pairs = article().to_query_pairs("populate");
        let pairs: Vec<_> = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        assert_eq!(
            pairs,
            [
                "populate[category][populate][parent][populate]=*",
                "populate[cover][populate]=*",
                "populate[author][populate][0]=name",
                "populate[author][populate][1]=avatar",
                "populate[blocks][on][shared.hero][populate]=*",
            ]
        );
        assert_eq!(
            Populate::All.to_query_pairs("populate"),
            [("populate".to_string(), "*".to_string())]
        );
    }
}
