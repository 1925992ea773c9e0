//! Declared-type model for bindable fields.
//!
//! A [`ValueKind`] describes what a target field is declared to hold, which
//! drives coercion, container growth and JSON-body compatibility checks.
//! It replaces runtime reflection with an explicit, registered description.

use std::fmt;

/// The declared kind of a bindable field.
///
/// Kinds form a small recursive grammar: scalars at the leaves, with
/// [`Optional`](Self::Optional), [`List`](Self::List) and
/// [`Map`](Self::Map) wrapping inner kinds and [`Struct`](Self::Struct)
/// referencing another registered type by name.
///
/// # Example
///
/// ```rust
/// use proteus_schema::ValueKind;
///
/// // A list of structs, e.g. `pets: Vec<Pet>`
/// let pets = ValueKind::list(ValueKind::Struct("Pet".into()));
/// assert!(pets.is_sequence());
/// assert_eq!(pets.element_kind(1), Some(&ValueKind::Struct("Pet".into())));
///
/// // A two-dimensional grid, e.g. `grid: Vec<Vec<i64>>`
/// let grid = ValueKind::list(ValueKind::list(ValueKind::Int));
/// assert_eq!(grid.element_kind(2), Some(&ValueKind::Int));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean value.
    Bool,
    /// Signed integer value.
    Int,
    /// Unsigned integer value.
    UInt,
    /// Floating point value.
    Float,
    /// Plain string value.
    String,
    /// Date and time value (normalized to RFC 3339 on coercion).
    DateTime,
    /// Calendar date value (normalized to `YYYY-MM-DD` on coercion).
    Date,
    /// Enumerated classification value, resolved from a short code through
    /// the injected classification lookup. The string names the code domain.
    Classification(String),
    /// Embedded JSON scalar: the raw string value is decoded as a JSON
    /// document. This is explicit schema metadata, not a runtime marker scan.
    Json,
    /// Optional wrapper around an inner kind. An empty raw value maps to an
    /// empty optional, not an error.
    Optional(Box<ValueKind>),
    /// Growable sequence of an inner kind. Covers both array-style and
    /// list-style targets; growth never shrinks the sequence.
    List(Box<ValueKind>),
    /// String-keyed map of an inner value kind. Maps bypass field
    /// introspection: any key is addressable.
    Map(Box<ValueKind>),
    /// Reference to another registered struct type, by type name.
    Struct(String),
    /// A declared container whose element kind is not concrete. Growing a
    /// sequence of this kind is a server-classified schema defect.
    Opaque,
}

impl ValueKind {
    /// Convenience constructor for an optional wrapper.
    #[must_use]
    pub fn optional(inner: ValueKind) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Convenience constructor for a sequence.
    #[must_use]
    pub fn list(element: ValueKind) -> Self {
        Self::List(Box::new(element))
    }

    /// Convenience constructor for a string-keyed map.
    #[must_use]
    pub fn map(value: ValueKind) -> Self {
        Self::Map(Box::new(value))
    }

    /// Convenience constructor for a classification kind.
    #[must_use]
    pub fn classification(domain: impl Into<String>) -> Self {
        Self::Classification(domain.into())
    }

    /// Returns true if this kind is a growable sequence.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns true if this kind is a string-keyed map.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns true if this kind references a registered struct type.
    #[must_use]
    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Returns the referenced struct type name, if any.
    #[must_use]
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the map value kind, if this kind is a map.
    #[must_use]
    pub fn map_value(&self) -> Option<&ValueKind> {
        match self {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Strips any optional wrapper, returning the innermost non-optional kind.
    #[must_use]
    pub fn unwrap_optional(&self) -> &ValueKind {
        match self {
            Self::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// Returns the element kind after descending `depth` sequence
    /// dimensions, or `None` if the kind does not nest that deep.
    ///
    /// `element_kind(0)` is the kind itself.
    #[must_use]
    pub fn element_kind(&self, depth: usize) -> Option<&ValueKind> {
        if depth == 0 {
            return Some(self);
        }
        match self {
            Self::List(element) => element.element_kind(depth - 1),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::UInt => write!(f, "uint"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::DateTime => write!(f, "datetime"),
            Self::Date => write!(f, "date"),
            Self::Classification(domain) => write!(f, "classification({domain})"),
            Self::Json => write!(f, "json"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Map(value) => write!(f, "map<string, {value}>"),
            Self::Struct(name) => write!(f, "struct {name}"),
            Self::Opaque => write!(f, "opaque"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_depth() {
        let grid = ValueKind::list(ValueKind::list(ValueKind::Int));

        assert_eq!(grid.element_kind(0), Some(&grid));
        assert_eq!(
            grid.element_kind(1),
            Some(&ValueKind::list(ValueKind::Int))
        );
        assert_eq!(grid.element_kind(2), Some(&ValueKind::Int));
        assert_eq!(grid.element_kind(3), None);
    }

    #[test]
    fn test_element_kind_on_scalar() {
        assert_eq!(ValueKind::Int.element_kind(0), Some(&ValueKind::Int));
        assert_eq!(ValueKind::Int.element_kind(1), None);
    }

    #[test]
    fn test_unwrap_optional() {
        let kind = ValueKind::optional(ValueKind::optional(ValueKind::UInt));
        assert_eq!(kind.unwrap_optional(), &ValueKind::UInt);
        assert_eq!(ValueKind::String.unwrap_optional(), &ValueKind::String);
    }

    #[test]
    fn test_predicates() {
        assert!(ValueKind::list(ValueKind::Bool).is_sequence());
        assert!(!ValueKind::Bool.is_sequence());
        assert!(ValueKind::map(ValueKind::Bool).is_map());
        assert!(ValueKind::Struct("Pet".into()).is_struct());
        assert_eq!(ValueKind::Struct("Pet".into()).struct_name(), Some("Pet"));
        assert_eq!(
            ValueKind::map(ValueKind::Bool).map_value(),
            Some(&ValueKind::Bool)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ValueKind::list(ValueKind::Struct("Pet".into())).to_string(),
            "list<struct Pet>"
        );
        assert_eq!(
            ValueKind::classification("color").to_string(),
            "classification(color)"
        );
        assert_eq!(
            ValueKind::map(ValueKind::optional(ValueKind::Date)).to_string(),
            "map<string, optional<date>>"
        );
    }
}
