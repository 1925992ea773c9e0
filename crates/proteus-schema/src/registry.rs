//! Process-wide schema registry with per-type memoization.
//!
//! The registry is the single shared resource of the binding subsystem. It is
//! owned by the composition root and injected into each binder; there is no
//! global static state. Descriptors are built lazily on first use and are
//! immutable once cached, so concurrent lookups need no further
//! synchronization.

use crate::{SchemaError, TypeDescriptor};
use dashmap::DashMap;
use std::sync::Arc;

/// Capability trait for types that can describe their bindable schema.
///
/// This is the explicit replacement for runtime reflection: a target type
/// states its settable fields and their declared kinds once, and the
/// registry caches the result per process.
///
/// # Example
///
/// ```rust
/// use proteus_schema::{Describe, SchemaRegistry, TypeDescriptor, ValueKind};
///
/// struct Pet;
///
/// impl Describe for Pet {
///     fn type_name() -> &'static str {
///         "Pet"
///     }
///
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::builder("Pet")
///             .field("name", ValueKind::String)
///             .build()
///     }
/// }
///
/// let registry = SchemaRegistry::new();
/// let descriptor = registry.descriptor_of::<Pet>();
/// assert!(descriptor.is_writable("name"));
/// ```
pub trait Describe {
    /// The registered type name. Must be stable and unique per registry.
    fn type_name() -> &'static str;

    /// Builds the type's descriptor. Called at most a handful of times per
    /// process; the registry caches the result.
    fn describe() -> TypeDescriptor;
}

/// Concurrent, memoizing cache of [`TypeDescriptor`]s.
///
/// First-build races are tolerated: two threads may both build a descriptor
/// for the same type, and one build wins; entries are immutable after
/// insertion. The cache is never invalidated within a process lifetime.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: DashMap<String, Arc<TypeDescriptor>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached descriptor for `T`, building and caching it on
    /// first use.
    pub fn descriptor_of<T: Describe>(&self) -> Arc<TypeDescriptor> {
        if let Some(existing) = self.types.get(T::type_name()) {
            return Arc::clone(&existing);
        }
        let built = Arc::new(T::describe());
        // A concurrent first build may have inserted already; keep the winner.
        Arc::clone(
            self.types
                .entry(T::type_name().to_string())
                .or_insert(built)
                .value(),
        )
    }

    /// Registers `T`'s descriptor without returning it.
    ///
    /// Nested struct fields reference their types by name; every referenced
    /// type must be registered before binding reaches it.
    pub fn register<T: Describe>(&self) {
        let _ = self.descriptor_of::<T>();
    }

    /// Registers a descriptor built by hand (e.g. from generated schema
    /// metadata) under its own type name.
    pub fn register_descriptor(&self, descriptor: TypeDescriptor) {
        self.types
            .entry(descriptor.type_name().to_string())
            .or_insert_with(|| Arc::new(descriptor));
    }

    /// Returns the descriptor registered under `type_name`, if any.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(type_name).map(|d| Arc::clone(&d))
    }

    /// Returns the descriptor registered under `type_name`, or an
    /// introspection failure naming the missing type.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<TypeDescriptor>, SchemaError> {
        self.get(type_name)
            .ok_or_else(|| SchemaError::unknown_type(type_name))
    }

    /// Returns the number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no descriptors have been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
