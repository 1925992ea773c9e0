//! # Proteus Bind
//!
//! Request-data-to-object binding for the Proteus framework.
//!
//! The binder takes a flat collection of incoming request fields — query or
//! form parameters, multipart fields, path segments — or a raw JSON body,
//! and materializes a strongly-typed, possibly nested target object graph:
//! plain structs, growable sequences, keyed maps, enumerated classification
//! values and sub-objects decoded from embedded JSON.
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`FieldMap`] | Ordered, multi-valued name→values input contract |
//! | [`path`] | Path expression parser (`pets[0].name`, `tags(red)`) |
//! | [`Binder`] | Recursive graph navigator and binding orchestrator |
//! | [`BinderOptions`] | Index policy knob and strict-unknown-field toggle |
//! | [`BindValue`] | Dynamic target graph under construction |
//! | [`BindError`] / [`FailureClass`] | Two-tier failure classification |
//! | [`ChallengeReport`] | Debug diagnostic attached to JSON body failures |
//!
//! ## Path expressions
//!
//! Field names carry a small path grammar: `.` descends into a nested
//! property, `[N]` (repeatable, 0-based) addresses sequence elements and
//! grows the sequence on demand, `(key)` addresses a map entry. Whichever
//! delimiter occurs first selects the interpretation.
//!
//! ## Example
//!
//! ```rust
//! use proteus_bind::{Binder, FieldMap};
//! use proteus_schema::{
//!     Describe, NoClassifications, SchemaRegistry, TypeDescriptor, ValueKind,
//! };
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Debug, Deserialize)]
//! struct Pet {
//!     name: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Owner {
//!     name: String,
//!     #[serde(default)]
//!     pets: Vec<Pet>,
//! }
//!
//! impl Describe for Pet {
//!     fn type_name() -> &'static str {
//!         "Pet"
//!     }
//!
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder("Pet")
//!             .field("name", ValueKind::String)
//!             .build()
//!     }
//! }
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
//! let registry = Arc::new(SchemaRegistry::new());
//! registry.register::<Pet>();
//! let binder = Binder::new(registry, Arc::new(NoClassifications));
//!
//! let fields = FieldMap::parse_urlencoded("name=Jonathan&pets%5B0%5D.name=Rex").unwrap();
//! let owner: Owner = binder.bind(&fields).unwrap();
//!
//! assert_eq!(owner.name, "Jonathan");
//! assert_eq!(owner.pets[0].name, "Rex");
//! ```
//!
//! ## Error classification
//!
//! Every failure carries a [`FailureClass`]: [`Client`](FailureClass::Client)
//! failures are attributable to caller-controlled input (parse failures,
//! unresolvable classification codes, index policy violations, malformed
//! paths or JSON bodies) and reject the request; [`Server`](FailureClass::Server)
//! failures mean the registered schema and the binder's assumptions disagree
//! and are surfaced loudly as defects. No failure is retried — binding is
//! deterministic and idempotent given the same input.

#![doc(html_root_url = "https://docs.rs/proteus-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod body;
mod coerce;
mod error;
mod fields;
mod grow;
pub mod path;
mod value;

// Re-export main types
pub use binder::{Binder, BinderOptions};
pub use body::{ChallengeEntry, ChallengeReport, ChallengeVerdict};
pub use error::{BindError, FailureClass};
pub use fields::FieldMap;
pub use value::BindValue;

// Re-export schema types callers need to describe targets
pub use proteus_schema::{
    BodyShape, ClassificationSource, Describe, MapClassificationSource, NoClassifications,
    SchemaRegistry, TypeDescriptor, ValueKind,
};
