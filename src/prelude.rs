//! # modelcore Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! modelcore library. Import this module to get quick access to the essential types for
//! declaring, extracting and instantiating managed types.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all modelcore operations
pub use crate::Error;

/// A single violation found during schema extraction
pub use crate::ExtractionError;

/// The result type used throughout modelcore
pub use crate::Result;

/// Options for managed instances
pub use crate::FactoryConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Registry of schemas and bindings
pub use crate::model::session::ModelSession;

// ================================================================================================
// Type System
// ================================================================================================

/// Type descriptors, classification and runtime values
pub use crate::model::typesystem::{CollectionKind, PrimitiveKind, TypeDescriptor, TypeKind, Value};

// ================================================================================================
// Members
// ================================================================================================

/// Declared members, their owners and accessor references
pub use crate::model::member::{
    AccessorKind, AccessorRef, DefiningContext, MemberDescriptor, MemberFlags, MemberRc,
    TypeDeclaration,
};

// ================================================================================================
// Schemas, Bindings and Instances
// ================================================================================================

/// Schemas and their extraction
pub use crate::model::schema::{ManagedProperty, Schema, SchemaExtractor, SchemaRc};

/// Slot layout and accessor dispatch
pub use crate::model::binding::{Binding, DispatchEntry, PropertyBinder, Slot, SlotOperation};

/// Managed instances and their factory
pub use crate::model::instance::{InstanceFactory, ManagedInstance};
