//! The dynamic target graph under construction.
//!
//! A [`BindValue`] tree is the in-progress result of one binding call. It is
//! owned exclusively by that call, mutated field by field during the
//! recursive descent, and finally materialized into the declared Rust type
//! through serde.

use crate::BindError;
use indexmap::IndexMap;
use proteus_schema::ValueKind;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One node of the target graph.
///
/// `Object` holds a struct's fields, `Map` holds arbitrary string keys;
/// both preserve insertion order. The distinction carries intent during
/// navigation — maps bypass field introspection — and disappears on
/// materialization, where both become JSON objects.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Absent or empty value.
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// Signed integer leaf.
    Int(i64),
    /// Unsigned integer leaf.
    UInt(u64),
    /// Floating point leaf.
    Float(f64),
    /// String leaf (also carries normalized date/time values).
    String(String),
    /// Growable sequence.
    List(Vec<BindValue>),
    /// String-keyed map.
    Map(IndexMap<String, BindValue>),
    /// Struct node with named fields.
    Object(IndexMap<String, BindValue>),
}

impl BindValue {
    /// Creates an empty struct node.
    #[must_use]
    pub fn new_object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// Creates an empty map node.
    #[must_use]
    pub fn new_map() -> Self {
        Self::Map(IndexMap::new())
    }

    /// Creates an empty sequence node.
    #[must_use]
    pub fn new_list() -> Self {
        Self::List(Vec::new())
    }

    /// Returns true if this node is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the struct fields, if this node is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, BindValue>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the struct fields mutably, if this node is an object.
    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, BindValue>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the map entries mutably, if this node is a map.
    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, BindValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the sequence elements, if this node is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[BindValue]> {
        match self {
            Self::List(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the sequence elements mutably, if this node is a list.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<BindValue>> {
        match self {
            Self::List(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the zero/default value used to fill grown positions of the
    /// given declared kind: numeric zero, `false`, the empty string, an
    /// empty container, or a freshly constructed empty struct instance.
    #[must_use]
    pub fn zero_of(kind: &ValueKind) -> Self {
        match kind {
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Int => Self::Int(0),
            ValueKind::UInt => Self::UInt(0),
            ValueKind::Float => Self::Float(0.0),
            ValueKind::String => Self::String(String::new()),
            ValueKind::List(_) => Self::new_list(),
            ValueKind::Map(_) => Self::new_map(),
            ValueKind::Struct(_) => Self::new_object(),
            ValueKind::DateTime
            | ValueKind::Date
            | ValueKind::Classification(_)
            | ValueKind::Json
            | ValueKind::Optional(_)
            | ValueKind::Opaque => Self::Null,
        }
    }

    /// Converts a decoded JSON value into a graph node. JSON objects become
    /// maps: the struct/map distinction only matters during navigation.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => Self::String(s),
            Value::Array(elements) => {
                Self::List(elements.into_iter().map(Self::from_json).collect())
            }
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts the graph into a JSON value for materialization.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::Number(i.into()),
            Self::UInt(u) => Value::Number(u.into()),
            Self::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
            Self::String(s) => Value::String(s),
            Self::List(elements) => {
                Value::Array(elements.into_iter().map(Self::into_json).collect())
            }
            Self::Map(entries) | Self::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
        }
    }

    /// Materializes the fully bound graph into the declared Rust type.
    ///
    /// A failure here means the registered descriptor and the Rust type
    /// disagree — a schema defect, not bad input.
    pub fn into_typed<T: DeserializeOwned>(self, type_name: &str) -> Result<T, BindError> {
        serde_json::from_value(self.into_json()).map_err(|e| {
            tracing::error!(type_name, error = %e, "bound graph failed to materialize");
            BindError::materialize(type_name, e)
        })
    }
}

impl Default for BindValue {
    fn default() -> Self {
        Self::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_zero_values() {
        assert_eq!(BindValue::zero_of(&ValueKind::Int), BindValue::Int(0));
        assert_eq!(BindValue::zero_of(&ValueKind::UInt), BindValue::UInt(0));
        assert_eq!(BindValue::zero_of(&ValueKind::Bool), BindValue::Bool(false));
        assert_eq!(
            BindValue::zero_of(&ValueKind::String),
            BindValue::String(String::new())
        );
        assert_eq!(
            BindValue::zero_of(&ValueKind::list(ValueKind::Int)),
            BindValue::new_list()
        );
        assert_eq!(
            BindValue::zero_of(&ValueKind::Struct("Pet".into())),
            BindValue::new_object()
        );
        assert_eq!(
            BindValue::zero_of(&ValueKind::optional(ValueKind::Int)),
            BindValue::Null
        );
    }

    #[test]
    fn test_json_round_trip() {
        let original = json!({
            "name": "Rex",
            "age": 4,
            "offset": -2,
            "ratio": 0.5,
            "alive": true,
            "tags": ["dog", "good"],
            "owner": {"name": "Jonathan"},
            "note": null,
        });

        assert_eq!(BindValue::from_json(original.clone()).into_json(), original);
    }

    #[test]
    fn test_into_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Pet {
            name: String,
            age: u32,
        }

        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), BindValue::String("Rex".into()));
        fields.insert("age".to_string(), BindValue::UInt(4));

        let pet: Pet = BindValue::Object(fields).into_typed("Pet").unwrap();
        assert_eq!(
            pet,
            Pet {
                name: "Rex".into(),
                age: 4
            }
        );
    }

    #[test]
    fn test_into_typed_mismatch_is_error() {
        #[derive(Debug, Deserialize)]
        struct Pet {
            #[allow(dead_code)]
            age: u32,
        }

        let mut fields = IndexMap::new();
        fields.insert("age".to_string(), BindValue::String("old".into()));

        let result: Result<Pet, _> = BindValue::Object(fields).into_typed("Pet");
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "MATERIALIZE");
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(BindValue::Float(f64::NAN).into_json(), Value::Null);
    }

    #[test]
    fn test_accessors() {
        let mut object = BindValue::new_object();
        object
            .as_object_mut()
            .unwrap()
            .insert("x".into(), BindValue::Int(1));

        assert!(object.as_object().unwrap().contains_key("x"));
        assert!(object.as_list().is_none());
        assert!(BindValue::Null.is_null());
    }
}
