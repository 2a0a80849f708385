//! Walks the schema graph and builds populate directives.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::configuration::DepthConfig;
use crate::error::SchemaError;
use crate::spec::AttributeKind;
use crate::spec::FieldPopulate;
use crate::spec::Populate;
use crate::spec::PopulateMap;
use crate::spec::RelationKind;
use crate::spec::Schema;
use crate::spec::SchemaIdentifier;
use crate::spec::SchemaRegistry;
use crate::spec::TraversalPath;
use crate::spec::depth_limits;

/// Relations recording which admin user created or last updated a record.
/// Populating them would pull in the admin user graph.
const PROVENANCE_FIELDS: [&str; 2] = ["createdBy", "updatedBy"];

/// Types entered along the current branch, root included.
///
/// Each level works on its own copy: siblings never see each other's entries.
#[derive(Clone, Debug, Default)]
struct VisitedSet(HashSet<SchemaIdentifier>);

impl VisitedSet {
    fn contains(&self, type_id: &str) -> bool {
        self.0.contains(type_id)
    }

    fn with(&self, type_id: &SchemaIdentifier) -> Self {
        let mut visited = self.0.clone();
        visited.insert(type_id.clone());
        Self(visited)
    }
}

/// Computes populate directives from a schema registry and a depth configuration.
///
/// Cheap to clone and safe to share: the configuration is immutable and every
/// traversal only owns per-call state.
#[derive(Clone)]
pub struct PopulateResolver {
    config: Arc<DepthConfig>,
    registry: Arc<dyn SchemaRegistry>,
}

impl PopulateResolver {
    pub fn new(config: Arc<DepthConfig>, registry: Arc<dyn SchemaRegistry>) -> Self {
        Self { config, registry }
    }

    /// Whether traversal stops at `type_id` once `depth` levels deep via `path`.
    pub fn should_stop(&self, type_id: &str, depth: u32, path: &TraversalPath) -> bool {
        depth_limits::should_stop(&self.config, type_id, depth, path)
    }

    /// Builds the directive for a request on `type_id`.
    ///
    /// Unknown types yield [`Populate::All`]. Only a failing registry is an error.
    ///
    /// A relation is populated flat as soon as either its owning type or its
    /// target would stop one level further down. A type in the medium set reached
    /// at depth 1 therefore has all its relations populated with `"*"`, and a
    /// shallow type at the root never expands its relations.
    pub fn resolve(&self, type_id: &str) -> Result<Populate, SchemaError> {
        let populate = self.build_directive(
            type_id,
            0,
            &VisitedSet::default(),
            &TraversalPath::root(),
        )?;
        tracing::debug!(
            type_id,
            populate = %serde_json::Value::from(&populate),
            "computed populate directive"
        );
        Ok(populate)
    }

    // `visited` must only contain ancestors of `type_id`. The root call passes an
    // empty set, which is why depth 0 is exempt from the cycle check.
    fn build_directive(
        &self,
        type_id: &str,
        depth: u32,
        visited: &VisitedSet,
        path: &TraversalPath,
    ) -> Result<Populate, SchemaError> {
        if self.should_stop(type_id, depth, path) {
            return Ok(Populate::All);
        }
        if depth > 0 && visited.contains(type_id) {
            tracing::trace!(type_id, %path, "cycle truncated");
            return Ok(Populate::All);
        }
        let Some(schema) = self.registry.model(type_id)? else {
            tracing::warn!(type_id, %path, "unresolvable type, populating flat");
            return Ok(Populate::All);
        };
        let visited = visited.with(&SchemaIdentifier::from(type_id));

        let mut fields = PopulateMap::new();
        for (name, attribute) in &schema.attributes {
            if self.config.is_excluded(type_id, name) {
                continue;
            }
            if let Some(only) = path
                .last()
                .and_then(|parent| self.config.include_only(parent, name))
            {
                fields.insert(
                    name.clone(),
                    FieldPopulate::Populate(Populate::Only(only.to_vec())),
                );
                continue;
            }

            let field_path = path.child(name);
            let directive = match &attribute.kind {
                AttributeKind::Relation { relation, target } => self.relation(
                    type_id,
                    &schema,
                    name,
                    *relation,
                    target.as_ref(),
                    depth,
                    &visited,
                    &field_path,
                )?,
                AttributeKind::Media { .. } => Some(FieldPopulate::all()),
                AttributeKind::Component { component, .. } => {
                    let nested =
                        self.build_directive(component.as_str(), depth + 1, &visited, &field_path)?;
                    Some(FieldPopulate::nested(nested))
                }
                AttributeKind::DynamicZone { components } => {
                    let mut variants = IndexMap::with_capacity(components.len());
                    for variant in components {
                        let nested = self.build_directive(
                            variant.as_str(),
                            depth + 1,
                            &visited,
                            &path.child(variant.as_str()),
                        )?;
                        variants.insert(variant.to_string(), nested.or_all());
                    }
                    Some(FieldPopulate::On(variants))
                }
                AttributeKind::Primitive { .. } => None,
            };
            if let Some(directive) = directive {
                fields.insert(name.clone(), directive);
            }
        }
        Ok(Populate::Fields(fields))
    }

    #[allow(clippy::too_many_arguments)]
    fn relation(
        &self,
        owner: &str,
        schema: &Schema,
        name: &str,
        relation: RelationKind,
        target: Option<&SchemaIdentifier>,
        depth: u32,
        visited: &VisitedSet,
        field_path: &TraversalPath,
    ) -> Result<Option<FieldPopulate>, SchemaError> {
        if relation.is_morph() || PROVENANCE_FIELDS.contains(&name) {
            return Ok(None);
        }
        if !self.registry.is_visible_attribute(schema, name) {
            return Ok(None);
        }
        if !self.config.is_relation_allowed(name) {
            return Ok(None);
        }
        let Some(target) = target else {
            return Ok(Some(FieldPopulate::all()));
        };
        // the owner's cap bounds everything hanging off its relations, the
        // target's cap bounds the target itself
        if self.should_stop(owner, depth + 1, field_path)
            || self.should_stop(target.as_str(), depth + 1, field_path)
        {
            return Ok(Some(FieldPopulate::all()));
        }
        let nested = self.build_directive(target.as_str(), depth + 1, visited, field_path)?;
        Ok(Some(FieldPopulate::nested(nested)))
    }
}
