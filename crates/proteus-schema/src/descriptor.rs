//! Type descriptors: the explicit capability interface for bindable types.
//!
//! A [`TypeDescriptor`] answers the questions the binder would otherwise ask
//! through runtime reflection: does this type have a settable field named X,
//! what kind is it declared as, and how deep do its sequence dimensions nest.
//! Descriptors are built once per type and cached by the registry.

use crate::ValueKind;
use indexmap::IndexMap;

/// How a JSON-body-consuming target expects its payload to be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// The body is a single JSON object.
    Single,
    /// The body is a JSON array of objects.
    List,
}

/// Description of one bindable field of a target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: ValueKind,
    writable: bool,
    readable: bool,
}

impl FieldDescriptor {
    /// Creates a readable, writable field descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            writable: true,
            readable: true,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Returns true if the binder may write this field.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Returns true if the binder may read this field during traversal.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.readable
    }
}

/// Schema of one bindable target type.
///
/// Field order is preserved; lookups are by name. The JSON-body marker
/// routes the whole target to the body binder instead of field binding.
///
/// # Example
///
/// ```rust
/// use proteus_schema::{TypeDescriptor, ValueKind};
///
/// let owner = TypeDescriptor::builder("Owner")
///     .field("name", ValueKind::String)
///     .field("pets", ValueKind::list(ValueKind::Struct("Pet".into())))
///     .build();
///
/// assert!(owner.is_writable("name"));
/// assert!(!owner.is_writable("missing"));
/// assert_eq!(
///     owner.element_kind("pets", 1),
///     Some(&ValueKind::Struct("Pet".into()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    type_name: String,
    fields: IndexMap<String, FieldDescriptor>,
    body: Option<BodyShape>,
}

impl TypeDescriptor {
    /// Starts building a descriptor for the named type.
    #[must_use]
    pub fn builder(type_name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            type_name: type_name.into(),
            fields: IndexMap::new(),
            body: None,
        }
    }

    /// Returns the described type's name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the descriptor for a field, if the type declares it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Returns true if the type declares a field of that name.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns true if the named field exists and is writable.
    #[must_use]
    pub fn is_writable(&self, name: &str) -> bool {
        self.field(name).is_some_and(FieldDescriptor::is_writable)
    }

    /// Returns true if the named field exists and is readable.
    #[must_use]
    pub fn is_readable(&self, name: &str) -> bool {
        self.field(name).is_some_and(FieldDescriptor::is_readable)
    }

    /// Returns the element kind of the named field after descending `depth`
    /// sequence dimensions, or `None` if the field is absent or does not
    /// nest that deep.
    #[must_use]
    pub fn element_kind(&self, name: &str, depth: usize) -> Option<&ValueKind> {
        self.field(name).and_then(|f| f.kind().element_kind(depth))
    }

    /// Returns the JSON-body shape if this target consumes a JSON body.
    #[must_use]
    pub fn body_shape(&self) -> Option<BodyShape> {
        self.body
    }

    /// Returns true if this target is marked as JSON-body-consuming.
    #[must_use]
    pub fn consumes_json_body(&self) -> bool {
        self.body.is_some()
    }

    /// Iterates the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the type declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`TypeDescriptor`].
///
/// A later field with the same name replaces an earlier one.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    type_name: String,
    fields: IndexMap<String, FieldDescriptor>,
    body: Option<BodyShape>,
}

impl TypeDescriptorBuilder {
    /// Adds a readable, writable field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        let descriptor = FieldDescriptor::new(name, kind);
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Adds a readable field the binder must not write.
    #[must_use]
    pub fn read_only_field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        let mut descriptor = FieldDescriptor::new(name, kind);
        descriptor.writable = false;
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Adds a writable field the binder must not read during traversal.
    #[must_use]
    pub fn write_only_field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        let mut descriptor = FieldDescriptor::new(name, kind);
        descriptor.readable = false;
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Marks the target as JSON-body-consuming with the given payload shape.
    #[must_use]
    pub fn json_body(mut self, shape: BodyShape) -> Self {
        self.body = Some(shape);
        self
    }

    /// Builds the descriptor.
    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            type_name: self.type_name,
            fields: self.fields,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder("Owner")
            .field("name", ValueKind::String)
            .field("age", ValueKind::UInt)
            .field("pets", ValueKind::list(ValueKind::Struct("Pet".into())))
            .read_only_field("id", ValueKind::UInt)
            .build()
    }

    #[test]
    fn test_field_lookup() {
        let desc = owner_descriptor();

        assert!(desc.has_field("name"));
        assert!(!desc.has_field("missing"));
        assert_eq!(desc.field("age").map(FieldDescriptor::kind), Some(&ValueKind::UInt));
    }

    #[test]
    fn test_writability() {
        let desc = owner_descriptor();

        assert!(desc.is_writable("name"));
        assert!(!desc.is_writable("id"));
        assert!(!desc.is_writable("missing"));
        assert!(desc.is_readable("id"));
    }

    #[test]
    fn test_write_only_field() {
        let desc = TypeDescriptor::builder("Secret")
            .write_only_field("token", ValueKind::String)
            .build();

        assert!(desc.is_writable("token"));
        assert!(!desc.is_readable("token"));
    }

    #[test]
    fn test_element_kind() {
        let desc = owner_descriptor();

        assert_eq!(
            desc.element_kind("pets", 1),
            Some(&ValueKind::Struct("Pet".into()))
        );
        assert_eq!(desc.element_kind("pets", 2), None);
        assert_eq!(desc.element_kind("missing", 0), None);
    }

    #[test]
    fn test_field_order_preserved() {
        let desc = owner_descriptor();
        let names: Vec<_> = desc.fields().map(FieldDescriptor::name).collect();

        assert_eq!(names, vec!["name", "age", "pets", "id"]);
    }

    #[test]
    fn test_duplicate_field_replaces() {
        let desc = TypeDescriptor::builder("T")
            .field("x", ValueKind::Int)
            .field("x", ValueKind::String)
            .build();

        assert_eq!(desc.len(), 1);
        assert_eq!(desc.field("x").map(FieldDescriptor::kind), Some(&ValueKind::String));
    }

    #[test]
    fn test_body_shape() {
        let plain = owner_descriptor();
        assert!(!plain.consumes_json_body());

        let body = TypeDescriptor::builder("CreateOwner")
            .field("name", ValueKind::String)
            .json_body(BodyShape::Single)
            .build();
        assert!(body.consumes_json_body());
        assert_eq!(body.body_shape(), Some(BodyShape::Single));
    }
}
