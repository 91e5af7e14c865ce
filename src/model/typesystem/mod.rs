//! Structural type descriptors for managed model types.
//!
//! This module provides the value types that describe the declared types of managed
//! properties and the runtime values stored for them. Descriptors compare by structure
//! (canonical name plus type arguments), so two descriptors created independently for the
//! same type are interchangeable as cache keys.
//!
//! # Key Components
//!
//! - [`TypeDescriptor`]: Canonical, possibly generic type signature
//! - [`TypeKind`]: Classification into scalars, collections and structs
//! - [`PrimitiveKind`], [`CollectionKind`]: Built-in scalar and collection types
//! - [`Value`]: Runtime value stored in a managed instance slot
//! - [`TypeInterner`]: Session-scoped cache of descriptors keyed by canonical form
//!
//! # Examples
//!
//! ```rust
//! use modelcore::model::typesystem::{TypeDescriptor, TypeKind, PrimitiveKind};
//!
//! let names = TypeDescriptor::parse("List<String>")?;
//! assert_eq!(names, TypeDescriptor::list_of(TypeDescriptor::string()));
//! assert_eq!(names.to_string(), "List<String>");
//!
//! let count = TypeDescriptor::primitive(PrimitiveKind::Int);
//! assert_eq!(count.kind(), TypeKind::Scalar(PrimitiveKind::Int));
//! # Ok::<(), modelcore::Error>(())
//! ```

mod parser;
mod primitives;
mod registry;

use std::{fmt, sync::Arc};

pub use primitives::{CollectionKind, PrimitiveKind, Value};
pub use registry::TypeInterner;

/// Canonical name of the type used as return type of members without a result.
pub const VOID: &str = "void";

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
struct TypeDescriptorData {
    name: String,
    arguments: Vec<TypeDescriptor>,
}

/// A value representing a (possibly generic) type signature.
///
/// Equality, hashing and ordering are structural over the canonical name and the ordered
/// list of type arguments. Descriptors are immutable and share their storage, so cloning is
/// cheap and they can be used freely as map keys across threads.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
    data: Arc<TypeDescriptorData>,
}

/// Classification of a [`TypeDescriptor`] into the categories the binder cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// No value (`void`), only valid as a member return type
    Void,
    /// A built-in scalar type
    Scalar(PrimitiveKind),
    /// A built-in collection type and its element type
    Collection {
        /// The flavor of collection
        kind: CollectionKind,
        /// Declared type of the elements
        element: TypeDescriptor,
    },
    /// Any other named type, e.g. a nested managed type
    Struct,
}

impl TypeDescriptor {
    /// Create a non-generic descriptor with the given canonical name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    /// Create a descriptor with the given canonical name and type arguments.
    #[must_use]
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor {
            data: Arc::new(TypeDescriptorData {
                name: name.into(),
                arguments,
            }),
        }
    }

    /// Descriptor of a built-in scalar type.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        let name: &'static str = kind.into();
        Self::named(name)
    }

    /// Descriptor of `String`.
    #[must_use]
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Descriptor of `void`.
    #[must_use]
    pub fn void() -> Self {
        Self::named(VOID)
    }

    /// Descriptor of `List<element>`.
    #[must_use]
    pub fn list_of(element: TypeDescriptor) -> Self {
        Self::collection(CollectionKind::List, element)
    }

    /// Descriptor of `Set<element>`.
    #[must_use]
    pub fn set_of(element: TypeDescriptor) -> Self {
        Self::collection(CollectionKind::Set, element)
    }

    fn collection(kind: CollectionKind, element: TypeDescriptor) -> Self {
        let name: &'static str = kind.into();
        Self::generic(name, vec![element])
    }

    /// The canonical name, without type arguments.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// The ordered type arguments (empty for non-generic types).
    #[must_use]
    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.data.arguments
    }

    /// Returns `true` if this descriptor has type arguments.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.data.arguments.is_empty()
    }

    /// The raw (erased) identity of this type, i.e. the descriptor without type arguments.
    #[must_use]
    pub fn raw(&self) -> TypeDescriptor {
        if self.is_generic() {
            Self::named(self.name())
        } else {
            self.clone()
        }
    }

    /// Returns `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.name() == VOID && !self.is_generic()
    }

    /// Returns `true` for `boolean`.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.kind() == TypeKind::Scalar(PrimitiveKind::Boolean)
    }

    /// Classify this descriptor.
    ///
    /// Scalar and collection names are only recognized with the expected number of type
    /// arguments; anything else, including a `List` without arguments, is a struct.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        if self.is_void() {
            return TypeKind::Void;
        }

        match self.arguments() {
            [] => match self.name().parse::<PrimitiveKind>() {
                Ok(primitive) => TypeKind::Scalar(primitive),
                Err(_) => TypeKind::Struct,
            },
            [element] => match self.name().parse::<CollectionKind>() {
                Ok(kind) => TypeKind::Collection {
                    kind,
                    element: element.clone(),
                },
                Err(_) => TypeKind::Struct,
            },
            _ => TypeKind::Struct,
        }
    }

    /// Returns `true` if this is a `List` or `Set`.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.kind(), TypeKind::Collection { .. })
    }

    /// Element type of a collection descriptor.
    #[must_use]
    pub fn element_type(&self) -> Option<TypeDescriptor> {
        match self.kind() {
            TypeKind::Collection { element, .. } => Some(element),
            _ => None,
        }
    }

    /// The canonical zero value of this type, if it has one.
    ///
    /// Scalars default to `false`, `'\0'`, `0`, `0.0` or the empty string, collections to the
    /// empty collection. Structs and `void` have no zero value.
    #[must_use]
    pub fn zero_value(&self) -> Option<Value> {
        match self.kind() {
            TypeKind::Scalar(primitive) => Some(primitive.zero_value()),
            TypeKind::Collection {
                kind: CollectionKind::List,
                ..
            } => Some(Value::List(Vec::new())),
            TypeKind::Collection {
                kind: CollectionKind::Set,
                ..
            } => Some(Value::Set(Vec::new())),
            TypeKind::Struct | TypeKind::Void => None,
        }
    }

    /// Check the outer shape of `value` against this type.
    ///
    /// Collections only check the collection flavor, not the elements. Struct values must be
    /// instances of exactly this type.
    #[must_use]
    pub fn accepts_shallow(&self, value: &Value) -> bool {
        match (self.kind(), value) {
            (TypeKind::Scalar(primitive), value) => value.primitive_kind() == Some(primitive),
            (
                TypeKind::Collection {
                    kind: CollectionKind::List,
                    ..
                },
                Value::List(_),
            )
            | (
                TypeKind::Collection {
                    kind: CollectionKind::Set,
                    ..
                },
                Value::Set(_),
            ) => true,
            (TypeKind::Struct, Value::Struct(instance)) => instance.type_descriptor() == self,
            _ => false,
        }
    }

    /// Check `value` structurally against this type, including collection elements.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        if !self.accepts_shallow(value) {
            return false;
        }

        match (self.element_type(), value) {
            (Some(element), Value::List(items) | Value::Set(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            _ => true,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if self.is_generic() {
            f.write_str("<")?;
            for (index, argument) in self.arguments().iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{argument}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDescriptor::primitive(kind)
    }
}
