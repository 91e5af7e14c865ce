//! Candidate members of structural types and weak references to accessors.
//!
//! This module models what the member-discovery collaborator hands to the schema
//! extractor, and how the extractor keeps hold of accessors without pinning them.
//!
//! # Key Components
//!
//! - [`MemberDescriptor`]: One declared method of a structural type
//! - [`MemberSignature`]: Stable identity key of a member (type + name + signature)
//! - [`MemberFlags`]: Modifiers that exclude members from, or annotate, the contract
//! - [`DefiningContext`]: Owner of declared members, bounding their lifetime
//! - [`TypeDeclaration`]: Builder for member lists
//! - [`AccessorKind`], [`AccessorRef`]: Accessor taxonomy and weak accessor references
//!
//! # Lifetime model
//!
//! A [`DefiningContext`] owns its members through strong `Arc`s. Everything derived from a
//! member afterwards (most importantly [`AccessorRef`]) only holds a `Weak` handle plus the
//! member's [`MemberSignature`]. Once the context is dropped, released, or the declaring
//! type is evicted, resolving such a reference fails with [`crate::Error::Resolution`].

mod accessor;
mod context;

use std::{fmt, sync::Arc};

use bitflags::bitflags;

pub use accessor::{AccessorKind, AccessorRef};
pub use context::{DefiningContext, TypeDeclaration};

use crate::model::typesystem::TypeDescriptor;

/// Reference to a `MemberDescriptor`
pub type MemberRc = Arc<MemberDescriptor>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Modifiers of a declared member
    pub struct MemberFlags: u32 {
        /// Member belongs to the type, not to instances; never part of the contract
        const STATIC = 0x0001;
        /// Member was generated by the toolchain (bridge methods etc.)
        const SYNTHETIC = 0x0002;
        /// Member carries a hand-written implementation
        const IMPLEMENTED = 0x0004;
        /// Member is marked internal and excluded from the public contract
        const INTERNAL = 0x0008;
    }
}

/// Stable identity of a member: declaring type, name, parameter types and return type.
///
/// The signature is all that weak references keep of a member, so it must carry enough
/// information to attribute failures after the member itself is gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberSignature {
    /// The type declaring the member
    pub declaring: TypeDescriptor,
    /// Method name
    pub name: String,
    /// Ordered parameter types
    pub parameters: Vec<TypeDescriptor>,
    /// Return type, `void` for none
    pub return_type: TypeDescriptor,
}

impl fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.declaring, self.name)?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, "): {}", self.return_type)
    }
}

/// A method declared by a structural type, as supplied by member discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Identity of the member
    pub signature: MemberSignature,
    /// Modifiers
    pub flags: MemberFlags,
}

impl MemberDescriptor {
    /// Create a new member without modifiers
    #[must_use]
    pub fn new(
        declaring: TypeDescriptor,
        name: impl Into<String>,
        parameters: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
    ) -> Self {
        MemberDescriptor {
            signature: MemberSignature {
                declaring,
                name: name.into(),
                parameters,
                return_type,
            },
            flags: MemberFlags::empty(),
        }
    }

    /// Replace the modifiers of this member
    #[must_use]
    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The declaring type
    #[must_use]
    pub fn declaring(&self) -> &TypeDescriptor {
        &self.signature.declaring
    }

    /// The method name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// The ordered parameter types
    #[must_use]
    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.signature.parameters
    }

    /// The return type
    #[must_use]
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.signature.return_type
    }

    /// Returns `true` if the member is not part of the instance contract
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.flags
            .intersects(MemberFlags::STATIC | MemberFlags::SYNTHETIC)
    }

    /// Returns `true` if the member is marked internal
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.flags.contains(MemberFlags::INTERNAL)
    }

    /// Returns `true` if the member has a hand-written implementation
    #[must_use]
    pub fn is_implemented(&self) -> bool {
        self.flags.contains(MemberFlags::IMPLEMENTED)
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_display() {
        let member = MemberDescriptor::new(
            TypeDescriptor::named("Person"),
            "setName",
            vec![TypeDescriptor::string()],
            TypeDescriptor::void(),
        );
        assert_eq!(member.to_string(), "Person.setName(String): void");

        let getter = MemberDescriptor::new(
            TypeDescriptor::named("Person"),
            "getTags",
            vec![],
            TypeDescriptor::list_of(TypeDescriptor::string()),
        );
        assert_eq!(getter.signature.to_string(), "Person.getTags(): List<String>");
    }

    #[test]
    fn test_flags() {
        let member = MemberDescriptor::new(
            TypeDescriptor::named("Person"),
            "create",
            vec![],
            TypeDescriptor::named("Person"),
        )
        .with_flags(MemberFlags::STATIC);
        assert!(member.is_excluded());
        assert!(!member.is_internal());

        let internal = member.with_flags(MemberFlags::INTERNAL | MemberFlags::IMPLEMENTED);
        assert!(!internal.is_excluded());
        assert!(internal.is_internal());
        assert!(internal.is_implemented());
    }
}
