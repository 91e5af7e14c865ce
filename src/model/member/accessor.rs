//! Accessor kinds and weak accessor references.
//!
//! [`AccessorKind`] is the naming-convention taxonomy used to recognize accessors among the
//! members of a structural type. [`AccessorRef`] is how a schema keeps hold of an accessor:
//! by identity plus a `Weak` handle, so schema metadata can outlive the defining context of
//! the type it describes.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::{
    model::{
        member::{MemberDescriptor, MemberRc, MemberSignature},
        typesystem::TypeDescriptor,
    },
    Error, Result,
};

/// Recognized accessor conventions, in the order properties list them
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
pub enum AccessorKind {
    /// `getX()` returning the property value
    #[strum(serialize = "getter")]
    GetGetter,
    /// `isX()` returning a `boolean` property value
    #[strum(serialize = "is-getter")]
    IsGetter,
    /// `setX(value)` replacing the property value
    #[strum(serialize = "setter")]
    Setter,
    /// `addX(element)` appending to a collection-valued property
    #[strum(serialize = "adder")]
    Adder,
}

impl AccessorKind {
    /// The method-name prefix of this convention
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            AccessorKind::GetGetter => "get",
            AccessorKind::IsGetter => "is",
            AccessorKind::Setter => "set",
            AccessorKind::Adder => "add",
        }
    }

    /// Returns `true` for both getter conventions
    #[must_use]
    pub fn is_getter(self) -> bool {
        matches!(self, AccessorKind::GetGetter | AccessorKind::IsGetter)
    }

    /// Returns `true` for accessors that modify the property
    #[must_use]
    pub fn is_mutator(self) -> bool {
        matches!(self, AccessorKind::Setter | AccessorKind::Adder)
    }

    /// Match `method_name` against the accessor conventions.
    ///
    /// Returns the accessor kind and the normalized property name, or `None` if the name
    /// follows no convention. The character following the prefix must not be lower case,
    /// so `isolate` or `settle` are not accessors.
    #[must_use]
    pub fn parse_name(method_name: &str) -> Option<(AccessorKind, String)> {
        [
            AccessorKind::IsGetter,
            AccessorKind::GetGetter,
            AccessorKind::Setter,
            AccessorKind::Adder,
        ]
        .into_iter()
        .find_map(|kind| {
            let rest = method_name.strip_prefix(kind.prefix())?;
            let first = rest.chars().next()?;
            if !first.is_alphabetic() || first.is_lowercase() {
                return None;
            }
            Some((kind, decapitalize(rest)))
        })
    }

    /// Check the shape of a member that matched this convention by name.
    ///
    /// # Errors
    /// Returns a short description of the violated shape rule.
    pub fn check_shape(self, member: &MemberDescriptor) -> std::result::Result<(), &'static str> {
        match self {
            AccessorKind::GetGetter | AccessorKind::IsGetter => {
                if !member.parameters().is_empty() {
                    return Err("must not take parameters");
                }
                if member.return_type().is_void() {
                    return Err("must return a value");
                }
                if self == AccessorKind::IsGetter && !member.return_type().is_boolean() {
                    return Err("must return boolean");
                }
            }
            AccessorKind::Setter | AccessorKind::Adder => {
                if member.parameters().len() != 1 {
                    return Err("must take exactly one parameter");
                }
                if !member.return_type().is_void() {
                    return Err("must return void");
                }
            }
        }
        Ok(())
    }

    /// The type of the value this accessor reads or writes.
    ///
    /// For getters this is the return type, for setters and adders the parameter type (the
    /// element type, in the case of adders).
    #[must_use]
    pub fn value_type(self, signature: &MemberSignature) -> Option<&TypeDescriptor> {
        if self.is_getter() {
            Some(&signature.return_type)
        } else {
            signature.parameters.first()
        }
    }
}

/// Decapitalize a property name the way bean conventions do: `Name` -> `name`, but `URL`
/// stays `URL` because its first two characters are upper case.
#[must_use]
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    if let Some(second) = chars.next() {
        if first.is_uppercase() && second.is_uppercase() {
            return name.to_string();
        }
    }

    let mut result: String = first.to_lowercase().collect();
    result.push_str(&name[first.len_utf8()..]);
    result
}

/// A weak reference to a single accessor member.
///
/// The reference stores the member's [`MemberSignature`] as a stable identity key and a
/// `Weak` handle to the member itself. Holding an `AccessorRef` never keeps the member, or
/// the context that defined it, alive. The handle is upgraded lazily on every
/// [`resolve`](AccessorRef::resolve), which fails with [`Error::Resolution`] once the last
/// strong holder of the member is gone.
///
/// Equality, hashing and ordering use the kind and signature only.
#[derive(Clone)]
pub struct AccessorRef {
    kind: AccessorKind,
    signature: MemberSignature,
    member: Weak<MemberDescriptor>,
}

impl AccessorRef {
    /// Create a new `AccessorRef` from a strong reference
    #[must_use]
    pub fn new(kind: AccessorKind, member: &MemberRc) -> Self {
        AccessorRef {
            kind,
            signature: member.signature.clone(),
            member: Arc::downgrade(member),
        }
    }

    /// The accessor convention of the member
    #[must_use]
    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    /// The identity of the member
    #[must_use]
    pub fn signature(&self) -> &MemberSignature {
        &self.signature
    }

    /// The method name of the member
    #[must_use]
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// The type declaring the member
    #[must_use]
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.signature.declaring
    }

    /// The declared parameter types
    #[must_use]
    pub fn parameter_types(&self) -> &[TypeDescriptor] {
        &self.signature.parameters
    }

    /// The declared return type
    #[must_use]
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.signature.return_type
    }

    /// The type of the value read or written through this accessor
    #[must_use]
    pub fn value_type(&self) -> Option<&TypeDescriptor> {
        self.kind.value_type(&self.signature)
    }

    /// Resolve the live member behind this reference.
    ///
    /// # Errors
    /// Returns [`Error::Resolution`] if the member has been released.
    pub fn resolve(&self) -> Result<MemberRc> {
        self.member.upgrade().ok_or_else(|| Error::Resolution {
            signature: self.signature.to_string(),
            kind: self.kind,
        })
    }

    /// Check if the referenced member is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.member.strong_count() > 0
    }
}

impl PartialEq for AccessorRef {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.signature == other.signature
    }
}

impl Eq for AccessorRef {}

impl Hash for AccessorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.signature.hash(state);
    }
}

impl PartialOrd for AccessorRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccessorRef {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind, &self.signature).cmp(&(other.kind, &other.signature))
    }
}

impl fmt::Debug for AccessorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorRef")
            .field("kind", &self.kind)
            .field("signature", &self.signature.to_string())
            .field("valid", &self.is_valid())
            .finish()
    }
}
