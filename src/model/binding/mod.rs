//! Slot layout and accessor dispatch for managed types.
//!
//! The [`PropertyBinder`] turns a [`Schema`](crate::model::schema::Schema) into a
//! [`Binding`]: one storage slot per property, in schema order, plus a dispatch table that
//! maps every accessor method name to the slot it operates on and the operation it
//! performs. A binding is created once per schema and shared by all instances of the type.
//!
//! # Dispatch
//!
//! | Accessor kind | Operation |
//! |---------------|-----------|
//! | `getX`, `isX` | [`SlotOperation::Read`] |
//! | `setX`        | [`SlotOperation::Write`] |
//! | `addX`        | [`SlotOperation::Append`] |

use std::collections::{btree_map::Entry, BTreeMap};

use strum::Display;
use tracing::debug;

use crate::{
    model::{
        member::{AccessorKind, AccessorRef},
        schema::SchemaRc,
        typesystem::{TypeDescriptor, Value},
    },
    Result,
};

/// What a dispatched accessor does with its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SlotOperation {
    /// Return the slot value
    #[strum(serialize = "read")]
    Read,
    /// Replace the slot value
    #[strum(serialize = "write")]
    Write,
    /// Append an element to the collection in the slot
    #[strum(serialize = "append")]
    Append,
}

impl From<AccessorKind> for SlotOperation {
    fn from(kind: AccessorKind) -> Self {
        match kind {
            AccessorKind::GetGetter | AccessorKind::IsGetter => SlotOperation::Read,
            AccessorKind::Setter => SlotOperation::Write,
            AccessorKind::Adder => SlotOperation::Append,
        }
    }
}

/// Storage slot of one property
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Position in the instance storage, equal to the property's schema index
    pub index: usize,
    /// Name of the stored property
    pub property: String,
    /// Declared type of the stored property
    pub declared_type: TypeDescriptor,
    /// The property is not part of the public contract
    pub internal: bool,
    /// Canonical zero value of the declared type, if any
    pub zero: Option<Value>,
}

/// Dispatch target of one accessor method
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEntry {
    /// Index of the slot the accessor operates on
    pub slot: usize,
    /// What the accessor does with the slot
    pub operation: SlotOperation,
    /// Weak reference to the accessor member, resolved on every invocation
    pub accessor: AccessorRef,
}

/// Slot layout and dispatch table of one schema
#[derive(Debug, PartialEq)]
pub struct Binding {
    schema: SchemaRc,
    slots: Vec<Slot>,
    dispatch: BTreeMap<String, DispatchEntry>,
}

impl Binding {
    /// The bound schema
    #[must_use]
    pub fn schema(&self) -> &SchemaRc {
        &self.schema
    }

    /// The bound type
    #[must_use]
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        self.schema.type_descriptor()
    }

    /// All slots, in schema order
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot storing the named property
    #[must_use]
    pub fn slot_of(&self, property: &str) -> Option<&Slot> {
        self.schema
            .index_of(property)
            .map(|index| &self.slots[index])
    }

    /// Dispatch target of the accessor with the given method name
    #[must_use]
    pub fn dispatch(&self, method: &str) -> Option<&DispatchEntry> {
        self.dispatch.get(method)
    }

    /// The full dispatch table, keyed by accessor method name
    #[must_use]
    pub fn dispatch_table(&self) -> &BTreeMap<String, DispatchEntry> {
        &self.dispatch
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the bound type has no properties
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Binds schemas to slot layouts and dispatch tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyBinder;

impl PropertyBinder {
    /// Create a new binder
    #[must_use]
    pub fn new() -> Self {
        PropertyBinder
    }

    /// Bind `schema`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Binding`] if a property has no accessors, or if a slot or
    /// dispatch key would be assigned twice. Neither can happen for a schema produced by
    /// the extractor.
    pub fn bind(&self, schema: &SchemaRc) -> Result<Binding> {
        let ty = schema.type_descriptor();
        let mut slots: Vec<Slot> = Vec::with_capacity(schema.len());
        let mut dispatch = BTreeMap::new();

        for (index, property) in schema.properties().iter().enumerate() {
            if property.accessors().is_empty() {
                return Err(binding_error!(
                    ty,
                    "property '{}' has no accessors",
                    property.name()
                ));
            }
            if slots.iter().any(|slot| slot.property == property.name()) {
                return Err(binding_error!(
                    ty,
                    "property '{}' would occupy slot {} twice",
                    property.name(),
                    index
                ));
            }

            slots.push(Slot {
                index,
                property: property.name().to_string(),
                declared_type: property.declared_type().clone(),
                internal: property.is_internal(),
                zero: property.declared_type().zero_value(),
            });

            for (kind, accessor) in property.accessors() {
                match dispatch.entry(accessor.name().to_string()) {
                    Entry::Vacant(entry) => {
                        entry.insert(DispatchEntry {
                            slot: index,
                            operation: SlotOperation::from(*kind),
                            accessor: accessor.clone(),
                        });
                    }
                    Entry::Occupied(_) => {
                        return Err(binding_error!(
                            ty,
                            "accessor '{}' is dispatched twice",
                            accessor.name()
                        ));
                    }
                }
            }
        }

        if dispatch.len() != schema.accessor_count() {
            return Err(binding_error!(
                ty,
                "dispatch table covers {} of {} accessors",
                dispatch.len(),
                schema.accessor_count()
            ));
        }

        debug!(
            type_name = %ty,
            slots = slots.len(),
            accessors = dispatch.len(),
            "bound schema"
        );

        Ok(Binding {
            schema: schema.clone(),
            slots,
            dispatch,
        })
    }
}
