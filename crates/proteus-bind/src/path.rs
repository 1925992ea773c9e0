//! Path expression parsing.
//!
//! Incoming field names carry a small path grammar: `.` descends into a
//! nested property, `[N]` (repeatable) addresses sequence elements, and
//! `(key)` addresses a map entry. Whichever delimiter occurs first in the
//! raw name selects the variant; `(key)` is rewritten to `.key` and
//! re-parsed, so map access reaches the navigator as nested access with a
//! synthetic property named by the key.

use crate::BindError;
use smallvec::SmallVec;
use std::fmt::Write as _;

/// Index chains up to four dimensions are stored inline (stack allocated).
type IndexChain = SmallVec<[i64; 4]>;

/// One parsed step of a field name's path expression.
///
/// # Example
///
/// ```rust
/// use proteus_bind::path::{parse, PathSegment};
///
/// match parse("sea[0][1].land").unwrap() {
///     PathSegment::Indexed { name, indices, rest } => {
///         assert_eq!(name, "sea");
///         assert_eq!(&indices[..], &[0, 1]);
///         assert_eq!(rest.as_deref(), Some("land"));
///     }
///     other => panic!("unexpected segment: {other:?}"),
/// }
///
/// // Map access is normalized to nested access.
/// assert_eq!(
///     parse("tags(red)").unwrap(),
///     PathSegment::Nested { name: "tags".into(), rest: "red".into() }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A plain property name with no further structure.
    Simple(String),
    /// A property name followed by an unparsed remainder path.
    Nested {
        /// The property to descend into.
        name: String,
        /// The unparsed path continuing inside that property's value.
        rest: String,
    },
    /// A sequence property with one or more bracketed indices.
    Indexed {
        /// The sequence property.
        name: String,
        /// The ordered index chain. Negative values survive parsing and are
        /// rejected by the grower's index policy, not here.
        indices: IndexChain,
        /// Optional trailing path after the index group.
        rest: Option<String>,
    },
}

impl PathSegment {
    /// Reconstructs the field-name string this segment was parsed from.
    ///
    /// Lossy across the `(key)` → `.key` rewrite, which is a documented
    /// normalization.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Simple(name) => name.clone(),
            Self::Nested { name, rest } => format!("{name}.{rest}"),
            Self::Indexed {
                name,
                indices,
                rest,
            } => {
                let mut out = name.clone();
                for index in indices {
                    let _ = write!(out, "[{index}]");
                }
                if let Some(rest) = rest {
                    out.push('.');
                    out.push_str(rest);
                }
                out
            }
        }
    }
}

/// Parses one incoming field name into its first path segment.
///
/// Delimiter precedence: the first occurrence of `.`, `[` or `(` selects
/// the variant; absence of all three yields [`PathSegment::Simple`]. All
/// syntax failures are client-classified — a malformed path is bad input,
/// never a crash.
pub fn parse(field: &str) -> Result<PathSegment, BindError> {
    if field.is_empty() {
        return Err(BindError::path_syntax(field, "empty field name"));
    }

    let dot = field.find('.');
    let bracket = field.find('[');
    let paren = field.find('(');

    let first = [dot, bracket, paren].into_iter().flatten().min();
    let Some(first) = first else {
        return Ok(PathSegment::Simple(field.to_string()));
    };

    if Some(first) == dot {
        parse_nested(field, first)
    } else if Some(first) == bracket {
        parse_indexed(field, first)
    } else {
        parse_mapped(field, first)
    }
}

fn parse_nested(field: &str, dot: usize) -> Result<PathSegment, BindError> {
    let name = &field[..dot];
    let rest = &field[dot + 1..];
    if name.is_empty() {
        return Err(BindError::path_syntax(field, "missing property name before '.'"));
    }
    if rest.is_empty() {
        return Err(BindError::path_syntax(field, "trailing '.'"));
    }
    Ok(PathSegment::Nested {
        name: name.to_string(),
        rest: rest.to_string(),
    })
}

fn parse_indexed(field: &str, bracket: usize) -> Result<PathSegment, BindError> {
    let name = &field[..bracket];
    if name.is_empty() {
        return Err(BindError::path_syntax(field, "missing property name before '['"));
    }

    let bytes = field.as_bytes();
    let mut indices = IndexChain::new();
    let mut pos = bracket;
    while pos < bytes.len() && bytes[pos] == b'[' {
        let close = field[pos..]
            .find(']')
            .map(|c| c + pos)
            .ok_or_else(|| BindError::path_syntax(field, "unterminated '['"))?;
        let token = &field[pos + 1..close];
        indices.push(parse_index(field, token)?);
        pos = close + 1;
    }

    let tail = &field[pos..];
    let rest = if tail.is_empty() {
        None
    } else if let Some(rest) = tail.strip_prefix('.') {
        if rest.is_empty() {
            return Err(BindError::path_syntax(field, "trailing '.'"));
        }
        Some(rest.to_string())
    } else {
        return Err(BindError::path_syntax(
            field,
            format!("unexpected '{}' after index group", &tail[..1]),
        ));
    };

    Ok(PathSegment::Indexed {
        name: name.to_string(),
        indices,
        rest,
    })
}

fn parse_index(field: &str, token: &str) -> Result<i64, BindError> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BindError::path_syntax(
            field,
            format!("non-numeric index '{token}'"),
        ));
    }
    token
        .parse()
        .map_err(|_| BindError::path_syntax(field, format!("index '{token}' out of range")))
}

fn parse_mapped(field: &str, paren: usize) -> Result<PathSegment, BindError> {
    let name = &field[..paren];
    if name.is_empty() {
        return Err(BindError::path_syntax(field, "missing property name before '('"));
    }
    // The first ')' closes the key: keys containing ')' are unsupported.
    let close = field[paren..]
        .find(')')
        .map(|c| c + paren)
        .ok_or_else(|| BindError::path_syntax(field, "unterminated '('"))?;
    let key = &field[paren + 1..close];
    let rest = &field[close + 1..];

    // Rewrite `name(key)rest` to `name.key` + rest and re-parse, so map
    // access is just nested access with a synthetic property.
    parse(&format!("{name}.{key}{rest}"))
}
