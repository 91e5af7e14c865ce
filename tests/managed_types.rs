//! Integration tests for the extract, bind and instantiate pipeline.
//!
//! These tests drive the public API end to end through a [`ModelSession`]:
//! - well-formed types round-trip values through their generated accessors
//! - malformed types are rejected with an attributed error and nothing is cached
//! - internal properties stay accessible but are hidden from enumeration
//! - accessor references fail to resolve once their defining context is released

use std::sync::Arc;

use modelcore::prelude::*;

fn person() -> TypeDescriptor {
    TypeDescriptor::named("Person")
}

fn define_person(context: &DefiningContext) {
    TypeDeclaration::new(person())
        .property("Name", TypeDescriptor::string())
        .getter("getInternalId", PrimitiveKind::Long.into())
        .flags(MemberFlags::INTERNAL)
        .setter("setInternalId", PrimitiveKind::Long.into())
        .flags(MemberFlags::INTERNAL)
        .define_in(context);
}

#[test]
fn person_schema_and_enumeration() -> Result<()> {
    let session = ModelSession::default();
    let context = DefiningContext::new("build");
    define_person(&context);

    let schema = session.extract_from(&context, &person())?;
    assert_eq!(schema.len(), 2);

    let name = schema.property("name").expect("name property");
    assert_eq!(name.declared_type(), &TypeDescriptor::string());
    assert!(!name.is_internal());
    assert!(name.is_writable());

    let internal_id = schema.property("internalId").expect("internalId property");
    assert_eq!(internal_id.declared_type(), &TypeDescriptor::named("long"));
    assert!(internal_id.is_internal());

    let binding = session.bind(&schema)?;
    assert_eq!(binding.len(), 2);

    let mut instance = session.create(&person(), &[])?;
    match instance.invoke("getInternalId", vec![]) {
        Err(Error::UnsetProperty {
            type_name,
            property,
        }) => {
            assert_eq!(type_name, "Person");
            assert_eq!(property, "internalId");
        }
        other => panic!("expected unset property, got {other:?}"),
    }
    assert!(matches!(
        instance.get("internalId"),
        Err(Error::UnsetProperty { .. })
    ));

    instance.set("name", "Ada")?;
    instance.invoke("setInternalId", vec![Value::Long(42)])?;

    let public: Vec<_> = instance.public_values().collect();
    assert_eq!(public, vec![("name", Some(Value::from("Ada")))]);
    assert_eq!(
        instance.invoke("getInternalId", vec![])?,
        Some(Value::Long(42))
    );
    Ok(())
}

#[test]
fn round_trip_through_accessors() -> Result<()> {
    let session = ModelSession::default();
    let context = DefiningContext::new("build");
    let build = TypeDescriptor::named("BuildSettings");
    TypeDeclaration::new(build.clone())
        .property("Version", TypeDescriptor::string())
        .property("Retries", PrimitiveKind::Int.into())
        .getter("isOffline", PrimitiveKind::Boolean.into())
        .setter("setOffline", PrimitiveKind::Boolean.into())
        .getter("getFlag", TypeDescriptor::set_of(TypeDescriptor::string()))
        .adder("addFlag", TypeDescriptor::string())
        .define_in(&context);
    session.extract_from(&context, &build)?;

    let mut settings = session.create(&build, &[])?;
    let values = [
        ("setVersion", "getVersion", Value::from("1.2.0")),
        ("setRetries", "getRetries", Value::Int(3)),
        ("setOffline", "isOffline", Value::Boolean(true)),
    ];
    for (setter, getter, value) in values {
        settings.invoke(setter, vec![value.clone()])?;
        assert_eq!(settings.invoke(getter, vec![])?, Some(value));
    }

    settings.invoke("addFlag", vec![Value::from("--debug")])?;
    settings.invoke("addFlag", vec![Value::from("--debug")])?;
    settings.invoke("addFlag", vec![Value::from("--quiet")])?;
    assert_eq!(
        settings.get("flag")?,
        Value::Set(vec![Value::from("--debug"), Value::from("--quiet")])
    );
    Ok(())
}

#[test]
fn malformed_type_is_rejected_and_not_cached() {
    let session = ModelSession::default();
    let context = DefiningContext::new("build");
    let counter = TypeDescriptor::named("Counter");
    TypeDeclaration::new(counter.clone())
        .getter("getCount", PrimitiveKind::Int.into())
        .setter("setCount", TypeDescriptor::string())
        .define_in(&context);

    match session.extract_from(&context, &counter) {
        Err(Error::Extraction(err)) => {
            assert_eq!(err.type_name(), "Counter");
            assert_eq!(err.property(), Some("count"));
            assert!(matches!(err, ExtractionError::SetterTypeMismatch { .. }));
        }
        other => panic!("expected extraction failure, got {other:?}"),
    }

    assert!(session.schema(&counter).is_none());
    assert!(matches!(
        session.create(&counter, &[]),
        Err(Error::UnknownType(_))
    ));
}

#[test]
fn repeated_extraction_is_idempotent() -> Result<()> {
    let context = DefiningContext::new("build");
    define_person(&context);

    let first = ModelSession::default().extract_from(&context, &person())?;
    let second = ModelSession::default().extract_from(&context, &person())?;

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    Ok(())
}

#[test]
fn unset_reads_fail_or_default() -> Result<()> {
    let context = DefiningContext::new("build");
    define_person(&context);

    let strict = ModelSession::new(FactoryConfig::strict());
    strict.extract_from(&context, &person())?;
    let instance = strict.create(&person(), &[])?;
    assert!(matches!(
        instance.get("name"),
        Err(Error::UnsetProperty { .. })
    ));

    let lenient = ModelSession::new(FactoryConfig::lenient());
    lenient.extract_from(&context, &person())?;
    let instance = lenient.create(&person(), &[])?;
    assert_eq!(instance.get("name")?, Value::from(""));
    assert_eq!(instance.get("internalId")?, Value::Long(0));
    assert!(!instance.is_set("name")?);
    Ok(())
}

#[test]
fn nested_managed_types() -> Result<()> {
    let session = ModelSession::new(FactoryConfig::strict());
    let context = DefiningContext::new("build");
    let address = TypeDescriptor::named("Address");
    let customer = TypeDescriptor::named("Customer");

    TypeDeclaration::new(address.clone())
        .property("City", TypeDescriptor::string())
        .define_in(&context);
    TypeDeclaration::new(customer.clone())
        .property("Address", address.clone())
        .define_in(&context);
    session.extract_from(&context, &address)?;
    session.extract_from(&context, &customer)?;

    let home = session.create(&address, &[("city", Value::from("Graz"))])?;
    let mut buyer = session.create(&customer, &[])?;
    buyer.set("address", home.clone())?;
    assert_eq!(buyer.get("address")?.as_instance(), Some(&home));

    let wrong = session.create(&customer, &[])?;
    assert!(matches!(
        buyer.set("address", wrong),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn resolution_fails_after_context_release() -> Result<()> {
    let session = ModelSession::default();
    let context = DefiningContext::new("build");
    define_person(&context);
    let schema = session.extract_from(&context, &person())?;
    let mut instance = session.create(&person(), &[])?;

    let getter = schema
        .property("name")
        .and_then(ManagedProperty::getter)
        .expect("getter")
        .clone();
    assert!(getter.resolve().is_ok());

    drop(context);

    assert!(!getter.is_valid());
    match instance.invoke("setName", vec![Value::from("Ada")]) {
        Err(Error::Resolution { signature, kind }) => {
            assert_eq!(signature, "Person.setName(String): void");
            assert_eq!(kind, AccessorKind::Setter);
        }
        other => panic!("expected resolution failure, got {other:?}"),
    }

    // Schema metadata outlives the context
    assert_eq!(schema.len(), 2);
    Ok(())
}

#[test]
fn evicted_type_can_be_redefined() -> Result<()> {
    let session = ModelSession::default();
    let context = DefiningContext::new("build");
    define_person(&context);
    let old = session.extract_from(&context, &person())?;

    assert!(context.evict(&person()));
    assert!(old.properties().iter().all(|property| property
        .accessors()
        .values()
        .all(|accessor| !accessor.is_valid())));

    TypeDeclaration::new(person())
        .property("Name", TypeDescriptor::string())
        .property("Age", PrimitiveKind::Int.into())
        .define_in(&context);
    assert!(session.invalidate(&person()));

    let new = session.extract_from(&context, &person())?;
    assert_eq!(new.len(), 2);
    assert!(new.property("age").is_some());
    assert!(new.property("internalId").is_none());

    let mut instance = session.create(&person(), &[])?;
    instance.invoke("setAge", vec![Value::Int(36)])?;
    assert_eq!(instance.get("age")?, Value::Int(36));
    Ok(())
}
