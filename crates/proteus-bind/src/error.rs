//! Binding error types and the two-tier failure classification.
//!
//! Every failure leaving the binder carries a [`FailureClass`]: client
//! errors are attributable to caller-controlled input and abort only the
//! offending binding call; server errors mean the registered schema and the
//! binder's assumptions disagree and must be surfaced loudly. The class is a
//! property of the error, converted to transport concerns (status codes)
//! only at the subsystem boundary.

use crate::body::ChallengeReport;
use http::StatusCode;
use proteus_schema::SchemaError;
use thiserror::Error;

/// Maximum length of a raw value echoed back in diagnostics.
const MAX_DIAGNOSTIC_VALUE: usize = 120;

/// Two-way classification of a binding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Bad input: the request is rejected, the process is healthy.
    Client,
    /// Broken schema or programming defect: fix the code, not the request.
    Server,
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Error raised while binding request data into a target graph.
///
/// # Example
///
/// ```rust
/// use proteus_bind::{BindError, FailureClass};
/// use http::StatusCode;
///
/// let err = BindError::index_policy("scores[50]", 50, 10);
/// assert_eq!(err.class(), FailureClass::Client);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert!(err.to_string().contains("scores[50]"));
/// ```
#[derive(Error, Debug)]
pub enum BindError {
    /// Malformed path expression: bad bracket/paren nesting or a
    /// non-numeric index token.
    #[error("malformed path expression '{path}': {reason}")]
    PathSyntax {
        /// The offending field name.
        path: String,
        /// Explanation of the syntax defect.
        reason: String,
    },

    /// A raw value could not be converted to the field's declared kind.
    #[error("cannot coerce value '{value}' for '{path}' to {expected}: {reason}")]
    Coercion {
        /// The offending field name.
        path: String,
        /// The raw value, summarized if very large.
        value: String,
        /// The declared kind the value was coerced towards.
        expected: String,
        /// Explanation of the parse failure.
        reason: String,
    },

    /// A non-empty classification code resolved to nothing.
    #[error("classification code '{code}' not found in domain '{domain}' for '{path}'")]
    ClassificationNotFound {
        /// The offending field name.
        path: String,
        /// The classification domain searched.
        domain: String,
        /// The unresolvable code.
        code: String,
    },

    /// An index is negative or exceeds the configured maximum. The whole
    /// chain is validated before any growth, so the container is untouched.
    #[error("index {index} rejected by policy (allowed 0..={max}) in '{path}'")]
    IndexPolicy {
        /// The offending field name.
        path: String,
        /// The rejected index value.
        index: i64,
        /// The configured upper bound.
        max: usize,
    },

    /// The field name matches no settable field. Raised only under the
    /// strict option; the lenient default skips the field silently.
    #[error("unknown or unwritable field '{field}' on type '{type_name}'")]
    UnknownField {
        /// The target type inspected.
        type_name: String,
        /// The unmatched field name.
        field: String,
    },

    /// A query/form string could not be decoded into a field map.
    #[error("malformed urlencoded input: {reason}")]
    FieldEncoding {
        /// Explanation of the decode failure.
        reason: String,
    },

    /// A JSON body failed to decode into the declared target. Carries the
    /// debug-challenge report comparing the generically-decoded payload
    /// against the target schema.
    #[error("malformed JSON body: {reason}")]
    JsonBody {
        /// The decode failure message.
        reason: String,
        /// The offending body, summarized if very large.
        excerpt: String,
        /// Per-field compatibility verdicts from the generic re-decode.
        challenge: ChallengeReport,
    },

    /// A sequence field has no concrete element kind to instantiate.
    #[error("sequence '{path}' has no concrete element kind")]
    OpaqueElement {
        /// The offending field name.
        path: String,
    },

    /// An index chain was applied to a field that is not a sequence.
    #[error("field '{path}' of kind {kind} does not accept an index chain")]
    NotIndexable {
        /// The offending field name.
        path: String,
        /// The declared kind that was indexed.
        kind: String,
    },

    /// The registry cannot describe a type the binding needs.
    #[error("cannot describe type '{type_name}'")]
    Introspection {
        /// The undescribable type name.
        type_name: String,
        /// The underlying schema failure.
        #[source]
        source: SchemaError,
    },

    /// A fully bound graph failed to deserialize into the declared Rust
    /// type: the descriptor and the type disagree.
    #[error("bound graph for '{type_name}' failed to materialize")]
    Materialize {
        /// The target type name.
        type_name: String,
        /// The underlying deserialization failure.
        #[source]
        source: anyhow::Error,
    },
}

impl BindError {
    /// Creates a path-syntax error.
    #[must_use]
    pub fn path_syntax(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathSyntax {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a coercion error; the raw value is summarized if very large.
    #[must_use]
    pub fn coercion(
        path: impl Into<String>,
        value: &str,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            path: path.into(),
            value: summarize(value),
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Creates a classification-not-found error.
    #[must_use]
    pub fn classification_not_found(
        path: impl Into<String>,
        domain: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::ClassificationNotFound {
            path: path.into(),
            domain: domain.into(),
            code: code.into(),
        }
    }

    /// Creates an index-policy error.
    #[must_use]
    pub fn index_policy(path: impl Into<String>, index: i64, max: usize) -> Self {
        Self::IndexPolicy {
            path: path.into(),
            index,
            max,
        }
    }

    /// Creates an unknown-field error.
    #[must_use]
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Creates a field-encoding error.
    #[must_use]
    pub fn field_encoding(reason: impl Into<String>) -> Self {
        Self::FieldEncoding {
            reason: reason.into(),
        }
    }

    /// Creates a JSON-body error; the body excerpt is summarized if large.
    #[must_use]
    pub fn json_body(
        reason: impl Into<String>,
        body: &str,
        challenge: ChallengeReport,
    ) -> Self {
        Self::JsonBody {
            reason: reason.into(),
            excerpt: summarize(body),
            challenge,
        }
    }

    /// Creates an opaque-element error.
    #[must_use]
    pub fn opaque_element(path: impl Into<String>) -> Self {
        Self::OpaqueElement { path: path.into() }
    }

    /// Creates a not-indexable error.
    #[must_use]
    pub fn not_indexable(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::NotIndexable {
            path: path.into(),
            kind: kind.into(),
        }
    }

    /// Creates an introspection error from a schema failure.
    #[must_use]
    pub fn introspection(type_name: impl Into<String>, source: SchemaError) -> Self {
        Self::Introspection {
            type_name: type_name.into(),
            source,
        }
    }

    /// Creates a materialization error.
    pub fn materialize(type_name: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Materialize {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// Classifies this failure as a client mistake or a server defect.
    #[must_use]
    pub fn class(&self) -> FailureClass {
        match self {
            Self::PathSyntax { .. }
            | Self::Coercion { .. }
            | Self::ClassificationNotFound { .. }
            | Self::IndexPolicy { .. }
            | Self::UnknownField { .. }
            | Self::FieldEncoding { .. }
            | Self::JsonBody { .. } => FailureClass::Client,
            Self::OpaqueElement { .. }
            | Self::NotIndexable { .. }
            | Self::Introspection { .. }
            | Self::Materialize { .. } => FailureClass::Server,
        }
    }

    /// Returns the HTTP status code for this failure at the boundary.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.class() {
            FailureClass::Client => StatusCode::BAD_REQUEST,
            FailureClass::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PathSyntax { .. } => "PATH_SYNTAX",
            Self::Coercion { .. } => "TYPE_COERCION",
            Self::ClassificationNotFound { .. } => "CLASSIFICATION_NOT_FOUND",
            Self::IndexPolicy { .. } => "INDEX_POLICY",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::FieldEncoding { .. } => "MALFORMED_FIELD_ENCODING",
            Self::JsonBody { .. } => "JSON_BODY",
            Self::OpaqueElement { .. } => "OPAQUE_ELEMENT",
            Self::NotIndexable { .. } => "NOT_INDEXABLE",
            Self::Introspection { .. } => "INTROSPECTION",
            Self::Materialize { .. } => "MATERIALIZE",
        }
    }

    /// Returns the challenge report attached to a JSON-body failure.
    #[must_use]
    pub fn challenge(&self) -> Option<&ChallengeReport> {
        match self {
            Self::JsonBody { challenge, .. } => Some(challenge),
            _ => None,
        }
    }
}

/// Truncates a raw value for diagnostics, keeping a prefix and marking the
/// cut with an ellipsis.
pub(crate) fn summarize(raw: &str) -> String {
    if raw.len() <= MAX_DIAGNOSTIC_VALUE {
        return raw.to_string();
    }
    let mut cut = MAX_DIAGNOSTIC_VALUE;
    while !raw.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}… ({} bytes)", &raw[..cut], raw.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let errors = [
            BindError::path_syntax("sea[x]", "non-numeric index"),
            BindError::coercion("age", "abc", "uint", "invalid digit"),
            BindError::classification_not_found("color", "color", "Z"),
            BindError::index_policy("scores[50]", 50, 10),
            BindError::unknown_field("Owner", "bogus"),
            BindError::field_encoding("invalid percent escape"),
        ];

        for err in errors {
            assert_eq!(err.class(), FailureClass::Client, "{err}");
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_server_errors() {
        let errors = [
            BindError::opaque_element("bag"),
            BindError::not_indexable("name", "string"),
            BindError::introspection("Ghost", SchemaError::unknown_type("Ghost")),
            BindError::materialize("Owner", anyhow::anyhow!("type mismatch")),
        ];

        for err in errors {
            assert_eq!(err.class(), FailureClass::Server, "{err}");
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_index_policy_message() {
        let err = BindError::index_policy("scores[50]", 50, 10);
        assert!(err.to_string().contains("50"));
        assert!(err.to_string().contains("0..=10"));
        assert_eq!(err.error_code(), "INDEX_POLICY");
    }

    #[test]
    fn test_coercion_summarizes_large_values() {
        let huge = "x".repeat(500);
        let err = BindError::coercion("blob", &huge, "int", "invalid digit");

        let rendered = err.to_string();
        assert!(rendered.len() < 400);
        assert!(rendered.contains("500 bytes"));
    }

    #[test]
    fn test_summarize_respects_char_boundaries() {
        let raw = "é".repeat(200);
        let summary = summarize(&raw);
        assert!(summary.contains("…"));
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(FailureClass::Client.to_string(), "client");
        assert_eq!(FailureClass::Server.to_string(), "server");
    }
}
