//! Graph navigation and binding orchestration.
//!
//! The [`Binder`] drives the whole subsystem: for each incoming field it
//! parses the path expression, walks or creates intermediate nodes of the
//! target graph, grows containers on demand, coerces the raw value and sets
//! the leaf. The binder holds no state between calls; the only mutation
//! target is the in-progress graph, owned by one call at a time.

use crate::{coerce::coerce, grow, path, BindError, BindValue, FieldMap};
use indexmap::IndexMap;
use proteus_schema::{ClassificationSource, Describe, SchemaRegistry, TypeDescriptor, ValueKind};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Configuration knobs for one binder.
#[derive(Debug, Clone)]
pub struct BinderOptions {
    /// Upper bound on any single sequence index. Violating indices are
    /// rejected before any container mutation.
    pub max_index: usize,
    /// When true, a field name matching no settable field is a client
    /// error instead of being silently skipped.
    pub strict: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            max_index: 255,
            strict: false,
        }
    }
}

/// Schema context for the node currently being navigated.
///
/// Struct nodes are introspected through their descriptor; map nodes bypass
/// introspection entirely — any key is addressable, and the map's declared
/// value kind governs coercion one level down.
enum NodeSchema<'a> {
    Struct(&'a TypeDescriptor),
    MapValue(&'a ValueKind),
}

impl NodeSchema<'_> {
    fn owner_name(&self) -> &str {
        match self {
            NodeSchema::Struct(descriptor) => descriptor.type_name(),
            NodeSchema::MapValue(_) => "map",
        }
    }
}

/// The request-data-to-object binder.
///
/// A binder owns its collaborators — the schema registry and the
/// classification lookup — and is cheap to share across calls. Each
/// [`bind`](Self::bind) call owns its target graph exclusively.
///
/// # Example
///
/// ```rust
/// use proteus_bind::{Binder, FieldMap};
/// use proteus_schema::{
///     Describe, NoClassifications, SchemaRegistry, TypeDescriptor, ValueKind,
/// };
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Debug, Deserialize)]
/// struct Greeting {
///     name: String,
///     repeat: u64,
/// }
///
/// impl Describe for Greeting {
///     fn type_name() -> &'static str {
///         "Greeting"
///     }
///
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::builder("Greeting")
///             .field("name", ValueKind::String)
///             .field("repeat", ValueKind::UInt)
///             .build()
///     }
/// }
///
/// let binder = Binder::new(
///     Arc::new(SchemaRegistry::new()),
///     Arc::new(NoClassifications),
/// );
///
/// let mut fields = FieldMap::new();
/// fields.push("name", "Jonathan");
/// fields.push("repeat", "3");
///
/// let greeting: Greeting = binder.bind(&fields).unwrap();
/// assert_eq!(greeting.name, "Jonathan");
/// assert_eq!(greeting.repeat, 3);
/// ```
pub struct Binder {
    registry: Arc<SchemaRegistry>,
    classifications: Arc<dyn ClassificationSource>,
    options: BinderOptions,
}

impl Binder {
    /// Creates a binder with default options.
    #[must_use]
    pub fn new(
        registry: Arc<SchemaRegistry>,
        classifications: Arc<dyn ClassificationSource>,
    ) -> Self {
        Self::with_options(registry, classifications, BinderOptions::default())
    }

    /// Creates a binder with explicit options.
    #[must_use]
    pub fn with_options(
        registry: Arc<SchemaRegistry>,
        classifications: Arc<dyn ClassificationSource>,
        options: BinderOptions,
    ) -> Self {
        Self {
            registry,
            classifications,
            options,
        }
    }

    /// Returns the binder's options.
    #[must_use]
    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Returns the binder's schema registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Binds the field map into a typed target.
    ///
    /// Fields are applied in map order; the first classified failure aborts
    /// the call. The fully bound graph is materialized through serde at the
    /// end.
    pub fn bind<T: Describe + DeserializeOwned>(
        &self,
        fields: &FieldMap,
    ) -> Result<T, BindError> {
        let descriptor = self.registry.descriptor_of::<T>();
        let graph = self.bind_fields(&descriptor, fields)?;
        graph.into_typed(descriptor.type_name())
    }

    /// Binds the field map into a dynamic graph without materializing it.
    pub fn bind_value<T: Describe>(&self, fields: &FieldMap) -> Result<BindValue, BindError> {
        let descriptor = self.registry.descriptor_of::<T>();
        self.bind_fields(&descriptor, fields)
    }

    /// Binds a field map against an already-resolved descriptor.
    fn bind_fields(
        &self,
        descriptor: &TypeDescriptor,
        fields: &FieldMap,
    ) -> Result<BindValue, BindError> {
        let mut graph = BindValue::new_object();
        for (name, values) in fields.iter() {
            self.apply(&mut graph, &NodeSchema::Struct(descriptor), name, name, values)?;
        }
        Ok(graph)
    }

    /// Applies one field to one node of the graph: the recursive descent.
    fn apply(
        &self,
        node: &mut BindValue,
        schema: &NodeSchema<'_>,
        expr: &str,
        origin: &str,
        values: &[String],
    ) -> Result<(), BindError> {
        let segment = path::parse(expr).map_err(|e| match e {
            // Syntax diagnostics always cite the full incoming field name.
            BindError::PathSyntax { reason, .. } => BindError::path_syntax(origin, reason),
            other => other,
        })?;

        match segment {
            path::PathSegment::Simple(name) => {
                self.apply_simple(node, schema, &name, origin, values)
            }
            path::PathSegment::Nested { name, rest } => {
                self.apply_nested(node, schema, &name, &rest, origin, values)
            }
            path::PathSegment::Indexed {
                name,
                indices,
                rest,
            } => self.apply_indexed(node, schema, &name, &indices, rest.as_deref(), origin, values),
        }
    }

    /// Sets a leaf value on the current node.
    fn apply_simple(
        &self,
        node: &mut BindValue,
        schema: &NodeSchema<'_>,
        name: &str,
        origin: &str,
        values: &[String],
    ) -> Result<(), BindError> {
        let kind = match schema {
            NodeSchema::Struct(descriptor) => {
                let Some(field) = descriptor.field(name).filter(|f| f.is_writable()) else {
                    return self.skip_or_strict(schema.owner_name(), name);
                };
                field.kind().clone()
            }
            NodeSchema::MapValue(value_kind) => (*value_kind).clone(),
        };

        let value = coerce(values, &kind, self.classifications.as_ref(), origin)?;
        entries_mut(node).insert(name.to_string(), value);
        Ok(())
    }

    /// Descends into a nested property, instantiating it if absent.
    fn apply_nested(
        &self,
        node: &mut BindValue,
        schema: &NodeSchema<'_>,
        name: &str,
        rest: &str,
        origin: &str,
        values: &[String],
    ) -> Result<(), BindError> {
        let declared = match schema {
            NodeSchema::Struct(descriptor) => {
                let Some(field) = descriptor.field(name).filter(|f| f.is_readable()) else {
                    return self.skip_or_strict(schema.owner_name(), name);
                };
                field.kind().unwrap_optional().clone()
            }
            NodeSchema::MapValue(value_kind) => value_kind.unwrap_optional().clone(),
        };

        match declared {
            ValueKind::Struct(type_name) => {
                let child_descriptor = self.resolve(&type_name)?;
                let child = entries_mut(node)
                    .entry(name.to_string())
                    .or_insert_with(BindValue::new_object);
                if !matches!(child, BindValue::Object(_)) {
                    *child = BindValue::new_object();
                }
                self.apply(child, &NodeSchema::Struct(&child_descriptor), rest, origin, values)
            }
            ValueKind::Map(value_kind) => {
                let child = entries_mut(node)
                    .entry(name.to_string())
                    .or_insert_with(BindValue::new_map);
                if !matches!(child, BindValue::Map(_)) {
                    *child = BindValue::new_map();
                }
                self.apply(child, &NodeSchema::MapValue(&value_kind), rest, origin, values)
            }
            // A remainder path into a non-structural kind matches no
            // settable property.
            _ => self.skip_or_strict(schema.owner_name(), origin),
        }
    }

    /// Grows a sequence to the requested index chain, then sets the leaf or
    /// recurses into the element.
    fn apply_indexed(
        &self,
        node: &mut BindValue,
        schema: &NodeSchema<'_>,
        name: &str,
        indices: &[i64],
        rest: Option<&str>,
        origin: &str,
        values: &[String],
    ) -> Result<(), BindError> {
        let declared = match schema {
            NodeSchema::Struct(descriptor) => {
                let Some(field) = descriptor.field(name).filter(|f| f.is_writable()) else {
                    return self.skip_or_strict(schema.owner_name(), name);
                };
                field.kind().unwrap_optional().clone()
            }
            NodeSchema::MapValue(value_kind) => value_kind.unwrap_optional().clone(),
        };

        let slot = entries_mut(node)
            .entry(name.to_string())
            .or_insert(BindValue::Null);
        let leaf = grow::ensure_chain(slot, indices, &declared, origin, self.options.max_index)?;

        let Some(leaf_kind) = declared.element_kind(indices.len()) else {
            tracing::error!(path = origin, "index chain outruns declared sequence depth");
            return Err(BindError::not_indexable(origin, declared.to_string()));
        };

        let Some(rest) = rest else {
            *leaf = coerce(values, leaf_kind, self.classifications.as_ref(), origin)?;
            return Ok(());
        };

        match leaf_kind.unwrap_optional() {
            ValueKind::Struct(type_name) => {
                let child_descriptor = self.resolve(type_name)?;
                if !matches!(leaf, BindValue::Object(_)) {
                    *leaf = BindValue::new_object();
                }
                self.apply(leaf, &NodeSchema::Struct(&child_descriptor), rest, origin, values)
            }
            ValueKind::Map(value_kind) => {
                if !matches!(leaf, BindValue::Map(_)) {
                    *leaf = BindValue::new_map();
                }
                self.apply(leaf, &NodeSchema::MapValue(value_kind), rest, origin, values)
            }
            _ => self.skip_or_strict(schema.owner_name(), origin),
        }
    }

    /// Resolves a nested struct descriptor; an unregistered type is a
    /// server-classified schema defect.
    fn resolve(&self, type_name: &str) -> Result<Arc<TypeDescriptor>, BindError> {
        self.registry.resolve(type_name).map_err(|e| {
            tracing::error!(type_name, "no descriptor registered for nested type");
            BindError::introspection(type_name, e)
        })
    }

    /// The unknown-field policy: silently skipped by default, a client
    /// error under the strict option.
    fn skip_or_strict(&self, owner: &str, field: &str) -> Result<(), BindError> {
        if self.options.strict {
            return Err(BindError::unknown_field(owner, field));
        }
        tracing::debug!(owner, field, "skipping unknown or unwritable field");
        Ok(())
    }
}

/// Returns the entry table of a container node, normalizing anything else
/// to an empty object first. The navigator only recurses into nodes it
/// created as objects or maps, so normalization only fires when a later
/// field overwrites an earlier scalar leaf.
fn entries_mut(node: &mut BindValue) -> &mut IndexMap<String, BindValue> {
    if !matches!(node, BindValue::Object(_) | BindValue::Map(_)) {
        *node = BindValue::new_object();
    }
    match node {
        BindValue::Object(entries) | BindValue::Map(entries) => entries,
        _ => unreachable!("node was just normalized to an object"),
    }
}
