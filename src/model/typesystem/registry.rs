//! Session-scoped interning of type descriptors.
//!
//! Descriptors are created on demand the first time a type is encountered and cached
//! under their canonical form for the lifetime of the owning session. Interning is a
//! sharing optimization only: equality of descriptors never depends on whether they were
//! interned, so a descriptor produced outside the interner is interchangeable with the
//! cached one.
//!
//! # Thread Safety
//!
//! The cache is a lock-free `SkipMap`; concurrent interning of the same canonical form may
//! race, in which case the first inserted descriptor is retained and returned to every
//! caller.

use crossbeam_skiplist::SkipMap;

use crate::{model::typesystem::TypeDescriptor, Result};

/// Cache of [`TypeDescriptor`] values keyed by their canonical form
pub struct TypeInterner {
    /// Canonical form -> shared descriptor
    descriptors: SkipMap<String, TypeDescriptor>,
}

impl TypeInterner {
    /// Create an empty interner
    #[must_use]
    pub fn new() -> Self {
        TypeInterner {
            descriptors: SkipMap::new(),
        }
    }

    /// Return the cached descriptor structurally equal to `descriptor`, caching it if absent.
    pub fn intern(&self, descriptor: &TypeDescriptor) -> TypeDescriptor {
        let key = descriptor.to_string();
        if let Some(entry) = self.descriptors.get(key.as_str()) {
            return entry.value().clone();
        }

        self.descriptors
            .get_or_insert(key, descriptor.clone())
            .value()
            .clone()
    }

    /// Parse `canonical` and return the cached descriptor for it.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidTypeName`] if `canonical` cannot be parsed.
    pub fn get_or_parse(&self, canonical: &str) -> Result<TypeDescriptor> {
        if let Some(entry) = self.descriptors.get(canonical) {
            return Ok(entry.value().clone());
        }

        let parsed = TypeDescriptor::parse(canonical)?;
        Ok(self.intern(&parsed))
    }

    /// Look up a cached descriptor by canonical form
    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<TypeDescriptor> {
        self.descriptors
            .get(canonical)
            .map(|entry| entry.value().clone())
    }

    /// Number of cached descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing has been interned yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Drop every cached descriptor
    pub fn clear(&self) {
        self.descriptors.clear();
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
