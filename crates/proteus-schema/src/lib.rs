//! # Proteus Schema
//!
//! Target-type schema descriptors and the introspection registry for the
//! Proteus request-data binder.
//!
//! The binder needs to answer, for any target type: does it have a settable
//! field named X, what is that field declared to hold, and how deep do its
//! container dimensions nest. This crate answers those questions through an
//! explicit, registered capability interface instead of runtime reflection:
//!
//! | Type | Role |
//! |------|------|
//! | [`ValueKind`] | Declared-type model for a field (scalars, date/time, classification, optional, sequence, map, struct reference, embedded JSON) |
//! | [`FieldDescriptor`] | One bindable field: name, kind, read/write capability |
//! | [`TypeDescriptor`] | One target type: ordered field table plus the JSON-body marker |
//! | [`Describe`] | Capability trait a target type implements to supply its descriptor |
//! | [`SchemaRegistry`] | Concurrent memoizing per-type descriptor cache, injected at the composition root |
//! | [`ClassificationSource`] | Injected `(domain, code) -> value` lookup for enumerated classification values |
//!
//! ## Example
//!
//! ```rust
//! use proteus_schema::{Describe, SchemaRegistry, TypeDescriptor, ValueKind};
//!
//! struct Owner;
//!
//! impl Describe for Owner {
//!     fn type_name() -> &'static str {
//!         "Owner"
//!     }
//!
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder("Owner")
//!             .field("name", ValueKind::String)
//!             .field("pets", ValueKind::list(ValueKind::Struct("Pet".into())))
//!             .build()
//!     }
//! }
//!
//! let registry = SchemaRegistry::new();
//! let owner = registry.descriptor_of::<Owner>();
//!
//! assert!(owner.is_writable("pets"));
//! assert_eq!(
//!     owner.element_kind("pets", 1),
//!     Some(&ValueKind::Struct("Pet".into()))
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/proteus-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classification;
mod descriptor;
mod error;
mod kind;
mod registry;

pub use classification::{ClassificationSource, MapClassificationSource, NoClassifications};
pub use descriptor::{BodyShape, FieldDescriptor, TypeDescriptor, TypeDescriptorBuilder};
pub use error::SchemaError;
pub use kind::ValueKind;
pub use registry::{Describe, SchemaRegistry};
