use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::model::{
    member::{MemberDescriptor, MemberFlags, MemberRc},
    typesystem::TypeDescriptor,
};

/// Owner of the members declared by a group of structural types.
///
/// A `DefiningContext` plays the role a class-loading context plays for compiled types: it
/// is the only strong holder of the members it defines, and member discovery goes through
/// it. Releasing the context (or evicting a single type, e.g. on redefinition) makes every
/// [`AccessorRef`](crate::model::member::AccessorRef) to those members unresolvable.
///
/// # Thread Safety
///
/// Definitions are stored in a `DashMap` and can be added, queried and evicted
/// concurrently.
pub struct DefiningContext {
    /// Name used in diagnostics
    name: String,
    /// Declared members of each type, in declaration order
    types: DashMap<TypeDescriptor, Vec<MemberRc>>,
}

impl DefiningContext {
    /// Create a new, empty context
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(DefiningContext {
            name: name.into(),
            types: DashMap::new(),
        })
    }

    /// The name of this context
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define (or redefine) the members of `ty`, returning the shared member handles.
    ///
    /// Redefining a type drops the previous members, which invalidates weak references to
    /// them unless someone else still holds them.
    pub fn define(
        &self,
        ty: TypeDescriptor,
        members: impl IntoIterator<Item = MemberDescriptor>,
    ) -> Vec<MemberRc> {
        let members: Vec<MemberRc> = members.into_iter().map(Arc::new).collect();
        debug!(
            context = %self.name,
            type_name = %ty,
            members = members.len(),
            "defining structural type"
        );
        self.types.insert(ty, members.clone());
        members
    }

    /// Member discovery: the members of `ty` in declaration order
    #[must_use]
    pub fn members(&self, ty: &TypeDescriptor) -> Option<Vec<MemberRc>> {
        self.types.get(ty).map(|members| members.value().clone())
    }

    /// Returns `true` if `ty` is currently defined in this context
    #[must_use]
    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        self.types.contains_key(ty)
    }

    /// Drop the definition of `ty`. Returns `true` if it was defined.
    pub fn evict(&self, ty: &TypeDescriptor) -> bool {
        let evicted = self.types.remove(ty).is_some();
        if evicted {
            debug!(context = %self.name, type_name = %ty, "evicted structural type");
        }
        evicted
    }

    /// Drop every definition held by this context
    pub fn release(&self) {
        debug!(context = %self.name, types = self.types.len(), "releasing context");
        self.types.clear();
    }

    /// Number of defined types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is defined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builder for the member list of a structural type.
///
/// ```rust
/// use modelcore::model::member::{MemberFlags, TypeDeclaration};
/// use modelcore::model::typesystem::{TypeDescriptor, PrimitiveKind};
///
/// let members = TypeDeclaration::new(TypeDescriptor::named("Person"))
///     .property("Name", TypeDescriptor::string())
///     .getter("getInternalId", PrimitiveKind::Long.into())
///     .flags(MemberFlags::INTERNAL)
///     .build();
///
/// assert_eq!(members.len(), 3);
/// assert_eq!(members[1].name(), "setName");
/// ```
pub struct TypeDeclaration {
    ty: TypeDescriptor,
    members: Vec<MemberDescriptor>,
}

impl TypeDeclaration {
    /// Start declaring the members of `ty`
    #[must_use]
    pub fn new(ty: TypeDescriptor) -> Self {
        TypeDeclaration {
            ty,
            members: Vec::new(),
        }
    }

    /// Add an arbitrary member
    #[must_use]
    pub fn method(
        mut self,
        name: &str,
        parameters: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
    ) -> Self {
        self.members.push(MemberDescriptor::new(
            self.ty.clone(),
            name,
            parameters,
            return_type,
        ));
        self
    }

    /// Add a getter `name(): ty`
    #[must_use]
    pub fn getter(self, name: &str, ty: TypeDescriptor) -> Self {
        self.method(name, Vec::new(), ty)
    }

    /// Add a setter `name(ty): void`
    #[must_use]
    pub fn setter(self, name: &str, ty: TypeDescriptor) -> Self {
        self.method(name, vec![ty], TypeDescriptor::void())
    }

    /// Add an adder `name(element): void`
    #[must_use]
    pub fn adder(self, name: &str, element: TypeDescriptor) -> Self {
        self.method(name, vec![element], TypeDescriptor::void())
    }

    /// Add a `getX`/`setX` pair for the capitalized property name `suffix`
    #[must_use]
    pub fn property(self, suffix: &str, ty: TypeDescriptor) -> Self {
        self.getter(&format!("get{suffix}"), ty.clone())
            .setter(&format!("set{suffix}"), ty)
    }

    /// Replace the modifiers of the most recently added member
    #[must_use]
    pub fn flags(mut self, flags: MemberFlags) -> Self {
        if let Some(last) = self.members.pop() {
            self.members.push(last.with_flags(flags));
        }
        self
    }

    /// The declared member list
    #[must_use]
    pub fn build(self) -> Vec<MemberDescriptor> {
        self.members
    }

    /// Define the declared members in `context`
    pub fn define_in(self, context: &DefiningContext) -> Vec<MemberRc> {
        let ty = self.ty.clone();
        context.define(ty, self.members)
    }
}
