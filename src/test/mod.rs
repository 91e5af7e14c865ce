//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::model::{
    binding::{Binding, PropertyBinder},
    member::{DefiningContext, MemberFlags, TypeDeclaration},
    schema::SchemaExtractor,
    typesystem::{PrimitiveKind, TypeDescriptor},
};

pub fn person() -> TypeDescriptor {
    TypeDescriptor::named("Person")
}

/// `Person` with a public name, age, active flag and tag list, plus an internal id
pub fn person_declaration() -> TypeDeclaration {
    TypeDeclaration::new(person())
        .property("Name", TypeDescriptor::string())
        .property("Age", PrimitiveKind::Int.into())
        .getter("isActive", PrimitiveKind::Boolean.into())
        .setter("setActive", PrimitiveKind::Boolean.into())
        .getter("getInternalId", PrimitiveKind::Long.into())
        .flags(MemberFlags::INTERNAL)
        .setter("setInternalId", PrimitiveKind::Long.into())
        .flags(MemberFlags::INTERNAL)
        .getter("getTag", TypeDescriptor::list_of(TypeDescriptor::string()))
        .adder("addTag", TypeDescriptor::string())
}

/// Define `declaration` in `context`, then extract and bind it. The context stays the only
/// strong owner of the members.
pub fn bind_in(
    context: &DefiningContext,
    ty: TypeDescriptor,
    declaration: TypeDeclaration,
) -> Arc<Binding> {
    let members = declaration.define_in(context);
    let schema = Arc::new(SchemaExtractor::new().extract(&ty, &members).unwrap());
    Arc::new(PropertyBinder::new().bind(&schema).unwrap())
}
