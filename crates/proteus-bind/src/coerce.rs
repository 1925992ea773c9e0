//! Raw-value coercion.
//!
//! The coercer converts one raw string (or the full multi-valued sequence,
//! for sequence leaf targets) into the declared kind of the field being
//! set. Parse failures are client errors; the coercer never panics on
//! caller-controlled input.

use crate::{BindError, BindValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use proteus_schema::{ClassificationSource, ValueKind};

/// Datetime formats accepted in addition to RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Date formats accepted.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Coerces raw values into the declared kind.
///
/// Multi-valued input collapses to its first element for scalar kinds and
/// is used in full for sequence kinds. An empty raw value against an
/// optional kind yields `Null` (an empty optional, not an error).
pub fn coerce(
    values: &[String],
    kind: &ValueKind,
    classifications: &dyn ClassificationSource,
    path: &str,
) -> Result<BindValue, BindError> {
    match kind {
        ValueKind::Optional(inner) => {
            if first(values).is_empty() {
                Ok(BindValue::Null)
            } else {
                coerce(values, inner, classifications, path)
            }
        }
        ValueKind::List(element) => values
            .iter()
            .map(|value| {
                coerce(
                    std::slice::from_ref(value),
                    element,
                    classifications,
                    path,
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map(BindValue::List),
        scalar => coerce_scalar(first(values), scalar, classifications, path),
    }
}

fn first(values: &[String]) -> &str {
    values.first().map_or("", String::as_str)
}

fn coerce_scalar(
    raw: &str,
    kind: &ValueKind,
    classifications: &dyn ClassificationSource,
    path: &str,
) -> Result<BindValue, BindError> {
    match kind {
        ValueKind::Int => raw
            .parse()
            .map(BindValue::Int)
            .map_err(|e| BindError::coercion(path, raw, "int", e.to_string())),
        ValueKind::UInt => raw
            .parse()
            .map(BindValue::UInt)
            .map_err(|e| BindError::coercion(path, raw, "uint", e.to_string())),
        ValueKind::Float => raw
            .parse()
            .map(BindValue::Float)
            .map_err(|e| BindError::coercion(path, raw, "float", e.to_string())),
        ValueKind::DateTime => coerce_datetime(raw, path),
        ValueKind::Date => coerce_date(raw, path),
        ValueKind::Bool => coerce_bool(raw, path),
        ValueKind::Classification(domain) => {
            coerce_classification(raw, domain, classifications, path)
        }
        ValueKind::Json => serde_json::from_str(raw)
            .map(BindValue::from_json)
            .map_err(|e| BindError::coercion(path, raw, "json", e.to_string())),
        // Everything else passes the raw string through unchanged.
        _ => Ok(BindValue::String(raw.to_string())),
    }
}

/// Parses a datetime and normalizes it to RFC 3339. Formats without an
/// offset are taken as UTC.
fn coerce_datetime(raw: &str, path: &str) -> Result<BindValue, BindError> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(BindValue::String(datetime.to_rfc3339()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(BindValue::String(naive.and_utc().to_rfc3339()));
        }
    }
    Err(BindError::coercion(
        path,
        raw,
        "datetime",
        "not a recognized datetime format",
    ))
}

/// Parses a date and normalizes it to `YYYY-MM-DD`.
fn coerce_date(raw: &str, path: &str) -> Result<BindValue, BindError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(BindValue::String(date.format("%Y-%m-%d").to_string()));
        }
    }
    Err(BindError::coercion(
        path,
        raw,
        "date",
        "not a recognized date format",
    ))
}

fn coerce_bool(raw: &str, path: &str) -> Result<BindValue, BindError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(BindValue::Bool(true)),
        "false" | "0" | "off" | "no" => Ok(BindValue::Bool(false)),
        _ => Err(BindError::coercion(
            path,
            raw,
            "bool",
            "not a recognized boolean literal",
        )),
    }
}

/// Resolves a classification code. An empty code yields no value; an
/// unresolvable non-empty code is reported as not found, never a crash.
fn coerce_classification(
    code: &str,
    domain: &str,
    classifications: &dyn ClassificationSource,
    path: &str,
) -> Result<BindValue, BindError> {
    if code.is_empty() {
        return Ok(BindValue::Null);
    }
    classifications
        .resolve(domain, code)
        .map(BindValue::from_json)
        .ok_or_else(|| BindError::classification_not_found(path, domain, code))
}
