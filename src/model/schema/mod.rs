//! Schemas of managed structural types.
//!
//! A [`Schema`] is the ordered set of [`ManagedProperty`] values describing one type. It is
//! produced by the [`SchemaExtractor`] from the candidate members of the type and is
//! immutable afterwards.
//!
//! # Ordering
//!
//! Properties are kept in lexical (byte-wise) order of their names. The order does not
//! depend on the order members were discovered in, so repeated extraction of the same type
//! yields identical schemas and identical [`fingerprints`](Schema::fingerprint).

mod extractor;
mod hash;

use std::{collections::BTreeMap, sync::Arc};

pub use extractor::SchemaExtractor;
pub use hash::SchemaHash;

use crate::model::{
    member::{AccessorKind, AccessorRef},
    typesystem::TypeDescriptor,
};

/// Reference to a `Schema`
pub type SchemaRc = Arc<Schema>;

/// A managed property of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedProperty {
    name: String,
    ty: TypeDescriptor,
    internal: bool,
    accessors: BTreeMap<AccessorKind, AccessorRef>,
}

impl ManagedProperty {
    /// Create a new property
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ty: TypeDescriptor,
        internal: bool,
        accessors: BTreeMap<AccessorKind, AccessorRef>,
    ) -> Self {
        ManagedProperty {
            name: name.into(),
            ty,
            internal,
            accessors,
        }
    }

    /// The property name, unique within its schema
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of the property
    #[must_use]
    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Returns `true` if the property is not part of the public contract
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// All accessors, at most one per kind
    #[must_use]
    pub fn accessors(&self) -> &BTreeMap<AccessorKind, AccessorRef> {
        &self.accessors
    }

    /// The accessor of the given kind
    #[must_use]
    pub fn accessor(&self, kind: AccessorKind) -> Option<&AccessorRef> {
        self.accessors.get(&kind)
    }

    /// The getter, preferring `getX` over `isX`
    #[must_use]
    pub fn getter(&self) -> Option<&AccessorRef> {
        self.accessor(AccessorKind::GetGetter)
            .or_else(|| self.accessor(AccessorKind::IsGetter))
    }

    /// Returns `true` if the property has a getter
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.getter().is_some()
    }

    /// Returns `true` if the property has a setter
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.accessors.contains_key(&AccessorKind::Setter)
    }

    /// Returns `true` if the declared type is a `List` or `Set`
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.ty.is_collection()
    }

    /// Returns `true` if the property has an adder
    #[must_use]
    pub fn is_appendable(&self) -> bool {
        self.accessors.contains_key(&AccessorKind::Adder)
    }
}

/// The ordered set of managed properties of one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    ty: TypeDescriptor,
    /// Sorted by name
    properties: Vec<ManagedProperty>,
}

impl Schema {
    pub(crate) fn new(ty: TypeDescriptor, mut properties: Vec<ManagedProperty>) -> Self {
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        Schema { ty, properties }
    }

    /// The type this schema describes
    #[must_use]
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// All properties, in schema order
    #[must_use]
    pub fn properties(&self) -> &[ManagedProperty] {
        &self.properties
    }

    /// Properties that are part of the public contract, in schema order
    pub fn public_properties(&self) -> impl Iterator<Item = &ManagedProperty> {
        self.properties.iter().filter(|property| !property.internal)
    }

    /// Position of the named property in schema order
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties
            .binary_search_by(|property| property.name.as_str().cmp(name))
            .ok()
    }

    /// Look up a property by name (case-sensitive)
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ManagedProperty> {
        self.index_of(name).map(|index| &self.properties[index])
    }

    /// Number of properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the type declares no properties
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Total number of accessors over all properties
    #[must_use]
    pub fn accessor_count(&self) -> usize {
        self.properties
            .iter()
            .map(|property| property.accessors.len())
            .sum()
    }

    /// Deterministic digest of names, types, internal flags and accessor signatures
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hash = SchemaHash::new()
            .add_str(&self.ty.to_string())
            .add_u64(self.properties.len() as u64);

        for property in &self.properties {
            hash = hash
                .add_str(&property.name)
                .add_str(&property.ty.to_string())
                .add_bool(property.internal)
                .add_u64(property.accessors.len() as u64);
            for (kind, accessor) in &property.accessors {
                let kind: &'static str = (*kind).into();
                hash = hash
                    .add_str(kind)
                    .add_str(&accessor.signature().to_string());
            }
        }

        hash.finalize()
    }
}
