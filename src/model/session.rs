//! Lifecycle-scoped registry of schemas and bindings.
//!
//! A [`ModelSession`] owns every cache the core needs: interned type descriptors, extracted
//! schemas and their bindings. There is no process-global state; dropping the session
//! drops the caches, and two sessions never observe each other's results.
//!
//! # Thread Safety
//!
//! All operations take `&self` and the session is `Send + Sync`. Lookups are concurrent.
//! When two threads extract the same type at the same time, both run the extractor outside
//! any lock and the first result inserted is retained; every caller receives that retained
//! schema, so no caller ever observes a partially populated or divergent schema.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::FactoryConfig,
    model::{
        binding::{Binding, PropertyBinder},
        instance::{InstanceFactory, ManagedInstance},
        member::{DefiningContext, MemberRc},
        schema::{SchemaExtractor, SchemaRc},
        typesystem::{TypeDescriptor, TypeInterner, Value},
    },
    Error, Result,
};

/// Registry of extracted schemas, bindings and interned descriptors.
pub struct ModelSession {
    config: FactoryConfig,
    extractor: SchemaExtractor,
    binder: PropertyBinder,
    interner: TypeInterner,
    schemas: DashMap<TypeDescriptor, SchemaRc>,
    bindings: DashMap<TypeDescriptor, Arc<Binding>>,
}

impl ModelSession {
    /// Create an empty session whose instances use `config`
    #[must_use]
    pub fn new(config: FactoryConfig) -> Self {
        ModelSession {
            config,
            extractor: SchemaExtractor::new(),
            binder: PropertyBinder::new(),
            interner: TypeInterner::new(),
            schemas: DashMap::new(),
            bindings: DashMap::new(),
        }
    }

    /// The configuration handed to created instances
    #[must_use]
    pub fn config(&self) -> FactoryConfig {
        self.config
    }

    /// Look up or create the descriptor with the given canonical form.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTypeName`] if `canonical` cannot be parsed.
    pub fn descriptor(&self, canonical: &str) -> Result<TypeDescriptor> {
        self.interner.get_or_parse(canonical)
    }

    /// Extract the schema of `ty` from its candidate members, or return the cached one.
    ///
    /// On a cache miss the schema is extracted without holding any lock and then offered
    /// to the cache; if another thread got there first its schema is returned instead.
    /// A failed extraction caches nothing.
    ///
    /// # Errors
    /// Returns [`Error::Extraction`] if `ty` is not a well-formed managed type.
    pub fn extract(&self, ty: &TypeDescriptor, members: &[MemberRc]) -> Result<SchemaRc> {
        if let Some(cached) = self.schemas.get(ty) {
            return Ok(cached.value().clone());
        }

        let schema = Arc::new(self.extractor.extract(ty, members)?);
        let ty = self.interner.intern(ty);
        let retained = match self.schemas.entry(ty) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                debug!(
                    type_name = %entry.key(),
                    properties = schema.len(),
                    "caching schema"
                );
                entry.insert(schema).value().clone()
            }
        };
        Ok(retained)
    }

    /// Extract the schema of `ty`, discovering its members through `context`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] if `context` does not define `ty`, or
    /// [`Error::Extraction`] if the type is malformed.
    pub fn extract_from(&self, context: &DefiningContext, ty: &TypeDescriptor) -> Result<SchemaRc> {
        if let Some(cached) = self.schemas.get(ty) {
            return Ok(cached.value().clone());
        }

        let members = context
            .members(ty)
            .ok_or_else(|| Error::UnknownType(ty.to_string()))?;
        self.extract(ty, &members)
    }

    /// Extract a batch of types in parallel.
    ///
    /// Results are returned in request order; each request succeeds or fails on its own.
    #[must_use]
    pub fn extract_all(&self, requests: &[(TypeDescriptor, Vec<MemberRc>)]) -> Vec<Result<SchemaRc>> {
        requests
            .par_iter()
            .map(|(ty, members)| self.extract(ty, members))
            .collect()
    }

    /// The cached schema of `ty`, if it has been extracted
    #[must_use]
    pub fn schema(&self, ty: &TypeDescriptor) -> Option<SchemaRc> {
        self.schemas.get(ty).map(|schema| schema.value().clone())
    }

    /// Bind `schema`, or return the cached binding of its type.
    ///
    /// A cached binding is only reused if it was created for this very schema.
    ///
    /// # Errors
    /// Returns [`Error::Binding`] on an internal consistency failure.
    pub fn bind(&self, schema: &SchemaRc) -> Result<Arc<Binding>> {
        let ty = schema.type_descriptor();
        if let Some(cached) = self.bindings.get(ty) {
            if Arc::ptr_eq(cached.schema(), schema) {
                return Ok(cached.value().clone());
            }
        }

        let binding = Arc::new(self.binder.bind(schema)?);
        let retained = match self.bindings.entry(self.interner.intern(ty)) {
            Entry::Occupied(mut entry) => {
                if Arc::ptr_eq(entry.get().schema(), schema) {
                    entry.get().clone()
                } else {
                    entry.insert(binding.clone());
                    binding
                }
            }
            Entry::Vacant(entry) => entry.insert(binding).value().clone(),
        };
        Ok(retained)
    }

    /// Create an instance of an extracted type.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] if `ty` has not been extracted in this session, or any
    /// error of [`InstanceFactory::create`].
    pub fn create(&self, ty: &TypeDescriptor, initial: &[(&str, Value)]) -> Result<ManagedInstance> {
        let schema = self
            .schema(ty)
            .ok_or_else(|| Error::UnknownType(ty.to_string()))?;
        let binding = self.bind(&schema)?;
        self.create_bound(&binding, initial)
    }

    /// Create an instance from an existing binding.
    ///
    /// # Errors
    /// See [`InstanceFactory::create`].
    pub fn create_bound(
        &self,
        binding: &Arc<Binding>,
        initial: &[(&str, Value)],
    ) -> Result<ManagedInstance> {
        InstanceFactory::new(self.config).create(binding, initial)
    }

    /// Drop the cached schema and binding of `ty`. Returns `true` if a schema was cached.
    pub fn invalidate(&self, ty: &TypeDescriptor) -> bool {
        self.bindings.remove(ty);
        let removed = self.schemas.remove(ty).is_some();
        if removed {
            debug!(type_name = %ty, "invalidated schema");
        }
        removed
    }

    /// Drop every cached schema, binding and interned descriptor
    pub fn clear(&self) {
        debug!(schemas = self.schemas.len(), "clearing session");
        self.bindings.clear();
        self.schemas.clear();
        self.interner.clear();
    }

    /// Number of cached schemas
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if no schema is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for ModelSession {
    fn default() -> Self {
        Self::new(FactoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{member::TypeDeclaration, typesystem::PrimitiveKind},
        test::{person, person_declaration},
    };

    #[test]
    fn test_extract_caches_schema() {
        let session = ModelSession::default();
        let context = DefiningContext::new("test");
        person_declaration().define_in(&context);

        let first = session.extract_from(&context, &person()).unwrap();
        let second = session.extract_from(&context, &person()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(session.len(), 1);
        assert!(Arc::ptr_eq(&session.schema(&person()).unwrap(), &first));
    }

    #[test]
    fn test_failed_extraction_caches_nothing() {
        let session = ModelSession::default();
        let counter = TypeDescriptor::named("Counter");
        let members: Vec<_> = TypeDeclaration::new(counter.clone())
            .getter("getCount", PrimitiveKind::Int.into())
            .setter("setCount", TypeDescriptor::string())
            .build()
            .into_iter()
            .map(Arc::new)
            .collect();

        assert!(matches!(
            session.extract(&counter, &members),
            Err(Error::Extraction(_))
        ));
        assert!(session.schema(&counter).is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn test_bind_is_cached_per_schema() {
        let session = ModelSession::default();
        let context = DefiningContext::new("test");
        person_declaration().define_in(&context);

        let schema = session.extract_from(&context, &person()).unwrap();
        let first = session.bind(&schema).unwrap();
        let second = session.bind(&schema).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(session.invalidate(&person()));
        assert!(!session.invalidate(&person()));

        let fresh = session.extract_from(&context, &person()).unwrap();
        assert!(!Arc::ptr_eq(&fresh, &schema));
        assert_eq!(fresh, schema);
        let rebound = session.bind(&fresh).unwrap();
        assert!(!Arc::ptr_eq(&rebound, &first));
    }

    #[test]
    fn test_create_requires_extraction() {
        let session = ModelSession::default();
        assert!(matches!(
            session.create(&person(), &[]),
            Err(Error::UnknownType(name)) if name == "Person"
        ));

        let context = DefiningContext::new("test");
        assert!(matches!(
            session.extract_from(&context, &person()),
            Err(Error::UnknownType(_))
        ));
    }

    #[test]
    fn test_descriptor_interning() {
        let session = ModelSession::default();
        let first = session.descriptor("List<String>").unwrap();
        let second = session.descriptor("List< String >").unwrap();
        assert_eq!(first, second);
        assert!(matches!(
            session.descriptor("List<"),
            Err(Error::InvalidTypeName(_))
        ));
    }

    #[test]
    fn test_extract_all_preserves_order() {
        let session = ModelSession::default();
        let requests: Vec<_> = (0..8)
            .map(|index| {
                let ty = TypeDescriptor::named(format!("Type{index}"));
                let members = TypeDeclaration::new(ty.clone())
                    .property("Value", PrimitiveKind::Int.into())
                    .build()
                    .into_iter()
                    .map(Arc::new)
                    .collect();
                (ty, members)
            })
            .collect();

        let results = session.extract_all(&requests);
        assert_eq!(results.len(), 8);
        for ((ty, _), result) in requests.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap().type_descriptor(), ty);
        }
        assert_eq!(session.len(), 8);

        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_clear_drops_interned_descriptors() {
        let session = ModelSession::default();
        let context = DefiningContext::new("test");
        person_declaration().define_in(&context);
        session.extract_from(&context, &person()).unwrap();
        session.descriptor("List<String>").unwrap();
        assert!(!session.interner.is_empty());

        session.clear();
        assert!(session.is_empty());
        assert!(session.interner.is_empty());
        assert!(session.schema(&person()).is_none());
    }
}
