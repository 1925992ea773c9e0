//! Incoming field storage.
//!
//! A [`FieldMap`] is the binder's input contract: an ordered mapping from
//! field name to one or more raw string values, as produced by query
//! strings, form bodies, multipart fields or path segments. Repeated keys
//! accumulate values in arrival order.

use crate::BindError;
use indexmap::IndexMap;

/// Ordered, multi-valued collection of incoming request fields.
///
/// Insertion order is preserved and is the order fields are applied during
/// binding. The map is immutable input once binding starts; the binder never
/// mutates it.
///
/// # Example
///
/// ```rust
/// use proteus_bind::FieldMap;
///
/// let mut fields = FieldMap::new();
/// fields.push("name", "Jonathan");
/// fields.push("tags", "red");
/// fields.push("tags", "blue");
///
/// assert_eq!(fields.first("name"), Some("Jonathan"));
/// assert_eq!(fields.get("tags"), Some(&["red".to_string(), "blue".to_string()][..]));
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMap {
    inner: IndexMap<String, Vec<String>>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string or `application/x-www-form-urlencoded` body,
    /// preserving repeated keys as multi-valued fields.
    ///
    /// # Example
    ///
    /// ```rust
    /// use proteus_bind::FieldMap;
    ///
    /// let fields = FieldMap::parse_urlencoded("q=rust+lang&ids=1&ids=2").unwrap();
    /// assert_eq!(fields.first("q"), Some("rust lang"));
    /// assert_eq!(fields.get("ids").unwrap().len(), 2);
    /// ```
    pub fn parse_urlencoded(input: &str) -> Result<Self, BindError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)
            .map_err(|e| BindError::field_encoding(e.to_string()))?;

        let mut fields = Self::new();
        for (name, value) in pairs {
            fields.push(name, value);
        }
        Ok(fields)
    }

    /// Appends a value for a field, creating the field if absent.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(name.into()).or_default().push(value.into());
    }

    /// Replaces all values of a field.
    pub fn insert_all(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.inner.insert(name.into(), values);
    }

    /// Returns all values of a field in arrival order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner.get(name).map(Vec::as_slice)
    }

    /// Returns the first value of a field.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.inner.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Returns true if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of distinct field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.push(name, value);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a [String])> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice())))
    }
}
