//! JSON body binding and the debug-challenge diagnostic.
//!
//! Targets marked as JSON-body-consuming bypass field binding: the whole
//! body decodes into the target in one step. Because a failed body decode
//! is otherwise opaque to API callers during development, every decode
//! failure carries a challenge report: the same body is re-decoded
//! generically and each declared field of the target gets a compatibility
//! verdict.

use crate::{BindError, Binder, FieldMap};
use proteus_schema::{BodyShape, Describe, SchemaRegistry, TypeDescriptor, ValueKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Compatibility verdict for one declared field of a challenged body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeVerdict {
    /// The generic value would plausibly assign to the declared kind.
    Assignable,
    /// The generic value clearly would not assign.
    Incompatible,
    /// The field is absent from the payload.
    Absent,
    /// The payload's shape cannot be judged against the declared kind.
    Unknown,
}

/// One field's verdict within a challenge report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeEntry {
    /// The declared field name.
    pub field: String,
    /// The compatibility verdict.
    pub verdict: ChallengeVerdict,
    /// Human-readable detail (expected vs found).
    pub detail: String,
}

/// Per-field compatibility verdicts attached to a JSON body failure.
///
/// Rendered one line per field: `o:` assignable, `x: cannot` assign,
/// `-:` absent, `?:` unknown shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChallengeReport {
    entries: Vec<ChallengeEntry>,
}

impl ChallengeReport {
    /// Creates a report with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns all entries in declared-field order.
    #[must_use]
    pub fn entries(&self) -> &[ChallengeEntry] {
        &self.entries
    }

    /// Returns the entry for a declared field, if present.
    #[must_use]
    pub fn entry(&self, field: &str) -> Option<&ChallengeEntry> {
        self.entries.iter().find(|e| e.field == field)
    }

    /// Returns true if the report has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ChallengeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry.verdict {
                ChallengeVerdict::Assignable => {
                    writeln!(f, "o: can assign '{}' ({})", entry.field, entry.detail)?;
                }
                ChallengeVerdict::Incompatible => {
                    writeln!(f, "x: cannot assign '{}' ({})", entry.field, entry.detail)?;
                }
                ChallengeVerdict::Absent => {
                    writeln!(f, "-: absent '{}'", entry.field)?;
                }
                ChallengeVerdict::Unknown => {
                    writeln!(f, "?: unknown '{}' ({})", entry.field, entry.detail)?;
                }
            }
        }
        Ok(())
    }
}

impl Binder {
    /// Decodes a JSON body into a single target object.
    ///
    /// A decode failure carries the challenge report for the declared
    /// fields of `T`.
    pub fn bind_body<T: Describe + DeserializeOwned>(&self, body: &str) -> Result<T, BindError> {
        let descriptor = self.registry().descriptor_of::<T>();
        serde_json::from_str(body).map_err(|e| self.body_failure(&descriptor, body, &e))
    }

    /// Decodes a JSON body into a list of target objects.
    pub fn bind_body_list<T: Describe + DeserializeOwned>(
        &self,
        body: &str,
    ) -> Result<Vec<T>, BindError> {
        let descriptor = self.registry().descriptor_of::<T>();
        serde_json::from_str(body).map_err(|e| self.body_failure(&descriptor, body, &e))
    }

    /// Routes a request to field binding or body binding based on the
    /// target's JSON-body marker.
    ///
    /// List-shaped body targets decode their elements through
    /// [`bind_body_list`](Self::bind_body_list); this entry point serves
    /// single-object targets and plain field targets.
    pub fn bind_request<T: Describe + DeserializeOwned>(
        &self,
        fields: &FieldMap,
        body: Option<&str>,
    ) -> Result<T, BindError> {
        let descriptor = self.registry().descriptor_of::<T>();
        if descriptor.consumes_json_body() {
            let body = body.ok_or_else(|| {
                BindError::json_body("empty request body", "", ChallengeReport::empty())
            })?;
            self.bind_body(body)
        } else {
            self.bind(fields)
        }
    }

    fn body_failure(
        &self,
        descriptor: &TypeDescriptor,
        body: &str,
        error: &serde_json::Error,
    ) -> BindError {
        let report = challenge(descriptor, self.registry(), body);
        tracing::debug!(
            type_name = descriptor.type_name(),
            error = %error,
            "JSON body failed to decode"
        );
        BindError::json_body(error.to_string(), body, report)
    }
}

/// Best-effort re-decode of a failed body, producing one verdict per
/// declared field of the target.
fn challenge(descriptor: &TypeDescriptor, registry: &SchemaRegistry, body: &str) -> ChallengeReport {
    let Ok(generic) = serde_json::from_str::<Value>(body) else {
        let entries = descriptor
            .fields()
            .map(|field| ChallengeEntry {
                field: field.name().to_string(),
                verdict: ChallengeVerdict::Unknown,
                detail: "body is not valid JSON".to_string(),
            })
            .collect();
        return ChallengeReport { entries };
    };

    // List-shaped targets are judged against their first element.
    let subject = match (descriptor.body_shape(), generic) {
        (Some(BodyShape::List), Value::Array(items)) => {
            items.into_iter().next().unwrap_or(Value::Null)
        }
        (_, other) => other,
    };

    let entries = descriptor
        .fields()
        .map(|field| {
            let name = field.name().to_string();
            let Some(payload) = subject.as_object() else {
                return ChallengeEntry {
                    field: name,
                    verdict: ChallengeVerdict::Unknown,
                    detail: format!("payload is {}, not an object", json_type_name(&subject)),
                };
            };
            match payload.get(field.name()) {
                None => ChallengeEntry {
                    field: name,
                    verdict: ChallengeVerdict::Absent,
                    detail: String::new(),
                },
                Some(value) => {
                    let verdict = compatibility(field.kind(), value, registry);
                    ChallengeEntry {
                        field: name,
                        verdict,
                        detail: format!(
                            "expected {}, found {}",
                            field.kind(),
                            json_type_name(value)
                        ),
                    }
                }
            }
        })
        .collect();

    ChallengeReport { entries }
}

/// Judges whether a generic JSON value would plausibly assign to a
/// declared kind.
fn compatibility(kind: &ValueKind, value: &Value, registry: &SchemaRegistry) -> ChallengeVerdict {
    use ChallengeVerdict::{Assignable, Incompatible, Unknown};

    let assignable = |ok: bool| if ok { Assignable } else { Incompatible };
    match kind {
        ValueKind::Bool => assignable(value.is_boolean()),
        ValueKind::Int => assignable(value.is_i64()),
        ValueKind::UInt => assignable(value.is_u64()),
        ValueKind::Float => assignable(value.is_number()),
        ValueKind::String
        | ValueKind::DateTime
        | ValueKind::Date
        | ValueKind::Classification(_) => assignable(value.is_string()),
        ValueKind::Json => Assignable,
        ValueKind::Optional(inner) => {
            if value.is_null() {
                Assignable
            } else {
                compatibility(inner, value, registry)
            }
        }
        ValueKind::List(element) => match value.as_array() {
            None => Incompatible,
            Some(items) => {
                for item in items {
                    match compatibility(element, item, registry) {
                        Assignable => {}
                        other => return other,
                    }
                }
                Assignable
            }
        },
        ValueKind::Map(value_kind) => match value.as_object() {
            None => Incompatible,
            Some(entries) => {
                for entry in entries.values() {
                    match compatibility(value_kind, entry, registry) {
                        Assignable => {}
                        other => return other,
                    }
                }
                Assignable
            }
        },
        ValueKind::Struct(type_name) => match (value.as_object(), registry.get(type_name)) {
            (None, _) => Incompatible,
            (Some(_), None) => Unknown,
            (Some(payload), Some(child)) => {
                for field in child.fields() {
                    if let Some(nested) = payload.get(field.name()) {
                        match compatibility(field.kind(), nested, registry) {
                            Assignable => {}
                            other => return other,
                        }
                    }
                }
                Assignable
            }
        },
        ValueKind::Opaque => Unknown,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
