//! Managed instances and the factory creating them.
//!
//! A [`ManagedInstance`] is the generated implementation of a managed type: a shared
//! [`Binding`] plus one storage slot per property. It can be driven through its accessor
//! surface ([`invoke`](ManagedInstance::invoke), dispatching by method name exactly like
//! generated code would) or through its property surface ([`get`](ManagedInstance::get),
//! [`set`](ManagedInstance::set), [`add`](ManagedInstance::add)).
//!
//! # Examples
//!
//! ```rust
//! use modelcore::prelude::*;
//!
//! let session = ModelSession::default();
//! let context = DefiningContext::new("build");
//! let person = TypeDescriptor::named("Person");
//! TypeDeclaration::new(person.clone())
//!     .property("Name", TypeDescriptor::string())
//!     .define_in(&context);
//! session.extract_from(&context, &person)?;
//!
//! let mut instance = session.create(&person, &[])?;
//! instance.invoke("setName", vec![Value::from("Ada")])?;
//! assert_eq!(instance.invoke("getName", vec![])?, Some(Value::from("Ada")));
//! # Ok::<(), modelcore::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    config::FactoryConfig,
    model::{
        binding::{Binding, Slot, SlotOperation},
        schema::ManagedProperty,
        typesystem::{TypeDescriptor, Value},
    },
    Error, Result,
};

/// An instance of a managed type.
///
/// Instances are independent of each other: cloning copies every slot, nested instances
/// included. Equality compares the binding and the stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedInstance {
    binding: Arc<Binding>,
    slots: Vec<Option<Value>>,
    config: FactoryConfig,
}

impl ManagedInstance {
    /// The managed type of this instance
    #[must_use]
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        self.binding.type_descriptor()
    }

    /// The binding shared by all instances of the type
    #[must_use]
    pub fn binding(&self) -> &Arc<Binding> {
        &self.binding
    }

    /// The configuration this instance was created with
    #[must_use]
    pub fn config(&self) -> FactoryConfig {
        self.config
    }

    /// Invoke an accessor by method name.
    ///
    /// The accessor reference is resolved on every call, so a released defining context
    /// surfaces here and nowhere earlier. Getters return `Some(value)`, setters and adders
    /// return `None`.
    ///
    /// # Errors
    /// - [`Error::UnknownAccessor`] if the type declares no such accessor
    /// - [`Error::Resolution`] if the accessor member has been released
    /// - [`Error::InvalidArguments`] if `args` does not match the member's parameter count
    /// - [`Error::UnsetProperty`] or [`Error::TypeMismatch`] from the slot operation
    pub fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Option<Value>> {
        let binding = Arc::clone(&self.binding);
        let Some(entry) = binding.dispatch(method) else {
            return Err(Error::UnknownAccessor {
                type_name: self.type_descriptor().to_string(),
                method: method.to_string(),
            });
        };

        let member = entry.accessor.resolve()?;
        if member.parameters().len() != args.len() {
            return Err(Error::InvalidArguments {
                method: method.to_string(),
                expected: member.parameters().len(),
                actual: args.len(),
            });
        }

        let slot = &binding.slots()[entry.slot];
        match entry.operation {
            SlotOperation::Read => self.read(slot).map(Some),
            SlotOperation::Write => {
                for value in args {
                    self.write(slot, value)?;
                }
                Ok(None)
            }
            SlotOperation::Append => {
                for element in args {
                    self.append(slot, element)?;
                }
                Ok(None)
            }
        }
    }

    /// Read a property by name. Works for internal properties too.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProperty`] for an undeclared name and
    /// [`Error::UnsetProperty`] if the property was never written and no zero-value default
    /// applies.
    pub fn get(&self, property: &str) -> Result<Value> {
        let slot = self.slot(property)?;
        self.read(slot)
    }

    /// Write a property by name.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProperty`], [`Error::NotWritable`] if the property has no
    /// setter, or [`Error::TypeMismatch`] if the value does not match the declared type.
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> Result<()> {
        let binding = Arc::clone(&self.binding);
        let slot = Self::slot_in(&binding, property)?;
        if !Self::property_in(&binding, slot).is_writable() {
            return Err(Error::NotWritable {
                type_name: self.type_descriptor().to_string(),
                property: property.to_string(),
            });
        }
        self.write(slot, value.into())
    }

    /// Append an element to a collection-valued property by name.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProperty`], [`Error::NotCollection`] if the property has no
    /// adder, or [`Error::TypeMismatch`] if the element does not match the element type.
    pub fn add(&mut self, property: &str, element: impl Into<Value>) -> Result<()> {
        let binding = Arc::clone(&self.binding);
        let slot = Self::slot_in(&binding, property)?;
        if !Self::property_in(&binding, slot).is_appendable() {
            return Err(Error::NotCollection {
                type_name: self.type_descriptor().to_string(),
                property: property.to_string(),
            });
        }
        self.append(slot, element.into())
    }

    /// Returns `true` if the property has been written.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProperty`] for an undeclared name.
    pub fn is_set(&self, property: &str) -> Result<bool> {
        let slot = self.slot(property)?;
        Ok(self.slots[slot.index].is_some())
    }

    /// The properties of the public contract, in schema order
    pub fn public_properties(&self) -> impl Iterator<Item = &ManagedProperty> {
        self.binding.schema().public_properties()
    }

    /// Current values of the public properties, in schema order.
    ///
    /// Unset properties yield `None`, or their zero value when zero-value defaults are
    /// enabled. Enumeration never writes to the instance.
    pub fn public_values(&self) -> impl Iterator<Item = (&str, Option<Value>)> {
        self.binding
            .slots()
            .iter()
            .filter(|slot| !slot.internal)
            .map(|slot| (slot.property.as_str(), self.read(slot).ok()))
    }

    fn slot(&self, property: &str) -> Result<&Slot> {
        Self::slot_in(&self.binding, property)
    }

    fn slot_in<'a>(binding: &'a Binding, property: &str) -> Result<&'a Slot> {
        binding
            .slot_of(property)
            .ok_or_else(|| Error::UnknownProperty {
                type_name: binding.type_descriptor().to_string(),
                property: property.to_string(),
            })
    }

    fn property_in<'a>(binding: &'a Binding, slot: &Slot) -> &'a ManagedProperty {
        &binding.schema().properties()[slot.index]
    }

    fn read(&self, slot: &Slot) -> Result<Value> {
        if let Some(value) = &self.slots[slot.index] {
            return Ok(value.clone());
        }

        match &slot.zero {
            Some(zero) if self.config.use_zero_value_defaults => Ok(zero.clone()),
            _ => Err(Error::UnsetProperty {
                type_name: self.type_descriptor().to_string(),
                property: slot.property.clone(),
            }),
        }
    }

    fn write(&mut self, slot: &Slot, value: Value) -> Result<()> {
        self.check(slot, &slot.declared_type, &value)?;
        self.slots[slot.index] = Some(value.normalize());
        Ok(())
    }

    fn append(&mut self, slot: &Slot, element: Value) -> Result<()> {
        let (Some(element_type), Some(zero)) = (slot.declared_type.element_type(), &slot.zero)
        else {
            return Err(Error::NotCollection {
                type_name: self.type_descriptor().to_string(),
                property: slot.property.clone(),
            });
        };
        self.check(slot, &element_type, &element)?;
        let element = element.normalize();

        let collection = self.slots[slot.index].get_or_insert_with(|| zero.clone());
        if collection.push_element(element) {
            Ok(())
        } else {
            Err(Error::NotCollection {
                type_name: self.type_descriptor().to_string(),
                property: slot.property.clone(),
            })
        }
    }

    fn check(&self, slot: &Slot, expected: &TypeDescriptor, value: &Value) -> Result<()> {
        let accepted = if self.config.strict_type_checking {
            expected.accepts(value)
        } else {
            expected.accepts_shallow(value)
        };

        if accepted {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                type_name: self.type_descriptor().to_string(),
                property: slot.property.clone(),
                expected: expected.to_string(),
                actual: value.shape(),
            })
        }
    }
}

/// Creates managed instances from bindings.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstanceFactory {
    config: FactoryConfig,
}

impl InstanceFactory {
    /// Create a factory producing instances with the given configuration
    #[must_use]
    pub fn new(config: FactoryConfig) -> Self {
        InstanceFactory { config }
    }

    /// The configuration handed to created instances
    #[must_use]
    pub fn config(&self) -> FactoryConfig {
        self.config
    }

    /// Create an instance of the bound type.
    ///
    /// `initial` values are assigned by property name before the instance is returned.
    /// They are type-checked like any write but may target read-only properties.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProperty`] for an undeclared name and
    /// [`Error::TypeMismatch`] for a value that does not match its property.
    pub fn create(
        &self,
        binding: &Arc<Binding>,
        initial: &[(&str, Value)],
    ) -> Result<ManagedInstance> {
        let mut instance = ManagedInstance {
            binding: Arc::clone(binding),
            slots: vec![None; binding.len()],
            config: self.config,
        };

        for (property, value) in initial {
            let slot = ManagedInstance::slot_in(binding, property)?;
            instance.write(slot, value.clone())?;
        }

        Ok(instance)
    }
}
