//! Injectable classification lookup.
//!
//! Classifications are closed, code-identified enumerated domain values — a
//! business code table, not a source-language enum. The binder never
//! hardcodes them; it resolves codes through an injected
//! [`ClassificationSource`].

use indexmap::IndexMap;
use serde_json::Value;

/// Total `(domain, code) -> value | not-found` lookup.
///
/// Implementations must be cheap to call and safe to share across binding
/// operations. Returning `None` for a non-empty code is reported to the
/// caller as a "not found" client error by the coercer, never as a crash.
pub trait ClassificationSource: Send + Sync {
    /// Resolves `code` within `domain` to its classification value.
    fn resolve(&self, domain: &str, code: &str) -> Option<Value>;
}

/// In-memory classification source backed by per-domain code tables.
///
/// # Example
///
/// ```rust
/// use proteus_schema::{ClassificationSource, MapClassificationSource};
/// use serde_json::json;
///
/// let mut source = MapClassificationSource::new();
/// source.insert("color", "R", json!({"code": "R", "label": "red"}));
/// source.insert("color", "G", json!({"code": "G", "label": "green"}));
///
/// assert_eq!(
///     source.resolve("color", "R").unwrap()["label"],
///     "red"
/// );
/// assert!(source.resolve("color", "X").is_none());
/// assert!(source.resolve("shape", "R").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapClassificationSource {
    domains: IndexMap<String, IndexMap<String, Value>>,
}

impl MapClassificationSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a code and its value into a domain, replacing any previous
    /// value for that code.
    pub fn insert(
        &mut self,
        domain: impl Into<String>,
        code: impl Into<String>,
        value: Value,
    ) {
        self.domains
            .entry(domain.into())
            .or_default()
            .insert(code.into(), value);
    }

    /// Returns the number of codes registered in a domain.
    #[must_use]
    pub fn domain_len(&self, domain: &str) -> usize {
        self.domains.get(domain).map_or(0, IndexMap::len)
    }
}

impl ClassificationSource for MapClassificationSource {
    fn resolve(&self, domain: &str, code: &str) -> Option<Value> {
        self.domains.get(domain)?.get(code).cloned()
    }
}

/// A source that resolves nothing. Useful for binders over targets without
/// classification fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifications;

impl ClassificationSource for NoClassifications {
    fn resolve(&self, _domain: &str, _code: &str) -> Option<Value> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_known_code() {
        let mut source = MapClassificationSource::new();
        source.insert("status", "A", json!("active"));

        assert_eq!(source.resolve("status", "A"), Some(json!("active")));
    }

    #[test]
    fn test_resolve_unknown_code_and_domain() {
        let mut source = MapClassificationSource::new();
        source.insert("status", "A", json!("active"));

        assert_eq!(source.resolve("status", "Z"), None);
        assert_eq!(source.resolve("missing", "A"), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut source = MapClassificationSource::new();
        source.insert("status", "A", json!("old"));
        source.insert("status", "A", json!("new"));

        assert_eq!(source.resolve("status", "A"), Some(json!("new")));
        assert_eq!(source.domain_len("status"), 1);
    }

    #[test]
    fn test_no_classifications() {
        assert_eq!(NoClassifications.resolve("any", "code"), None);
    }
}
