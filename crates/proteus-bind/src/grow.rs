//! On-demand container growth.
//!
//! Growing a sequence makes a requested index chain addressable: positions
//! up to the index are filled with the element kind's zero/default value,
//! and multi-dimensional chains recurse, constructing intermediate empty
//! lists as needed. Growth never truncates and never shrinks. The whole
//! index chain is validated against the injected policy before any
//! mutation, so a rejected request leaves the container untouched.

use crate::{BindError, BindValue};
use proteus_schema::ValueKind;

/// Grows the sequence at `node` so the whole `indices` chain is
/// addressable, returning the element at the end of the chain.
///
/// `kind` is the declared kind of the sequence field itself. A `Null` node
/// is replaced by an empty sequence before growing.
///
/// # Errors
///
/// - [`BindError::IndexPolicy`] (client) if any index in the chain is
///   negative or exceeds `max_index`; evaluated eagerly for the whole
///   chain before any growth.
/// - [`BindError::OpaqueElement`] (server) if an element kind along the
///   chain is not concrete.
/// - [`BindError::NotIndexable`] (server) if the chain descends deeper
///   than the declared kind nests.
pub fn ensure_chain<'a>(
    node: &'a mut BindValue,
    indices: &[i64],
    kind: &ValueKind,
    path: &str,
    max_index: usize,
) -> Result<&'a mut BindValue, BindError> {
    // Eager policy pass: the whole chain is validated before any mutation.
    for &index in indices {
        if index < 0 || usize::try_from(index).map_or(true, |i| i > max_index) {
            return Err(BindError::index_policy(path, index, max_index));
        }
    }

    let mut current = node;
    let mut current_kind = kind;
    for &index in indices {
        let element_kind = match current_kind {
            ValueKind::List(element) => element.as_ref(),
            other => {
                tracing::error!(path, kind = %other, "index chain applied to non-sequence kind");
                return Err(BindError::not_indexable(path, other.to_string()));
            }
        };
        if *element_kind == ValueKind::Opaque {
            tracing::error!(path, "sequence element kind is not concrete");
            return Err(BindError::opaque_element(path));
        }

        if current.is_null() {
            *current = BindValue::new_list();
        }
        let elements = match current {
            BindValue::List(elements) => elements,
            other => {
                tracing::error!(path, "sequence field holds a non-sequence node");
                return Err(BindError::not_indexable(path, format!("{other:?}")));
            }
        };

        let target =
            usize::try_from(index).map_err(|_| BindError::index_policy(path, index, max_index))?;
        if elements.len() <= target {
            elements.resize(target + 1, BindValue::zero_of(element_kind));
        }

        current = &mut elements[target];
        current_kind = element_kind;
    }

    Ok(current)
}
