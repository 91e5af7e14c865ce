//! Schema extraction and validation of managed structural types.
//!
//! The [`SchemaExtractor`] turns the candidate members of a structural type into a
//! [`Schema`]. Extraction happens in two passes:
//!
//! 1. **Classification** (member order): every member is matched against the accessor
//!    conventions, its shape is checked and it is grouped under its property name.
//!    Duplicate accessors with identical signatures (e.g. re-declared inherited members)
//!    are merged.
//! 2. **Property validation** (lexical property order): getter/setter/adder types are
//!    checked against each other.
//!
//! The first violation found is returned as an [`ExtractionError`]; no partial schema is
//! ever produced.
//!
//! # Members outside the contract
//!
//! Members flagged [`MemberFlags::STATIC`](crate::model::member::MemberFlags::STATIC) or
//! [`MemberFlags::SYNTHETIC`](crate::model::member::MemberFlags::SYNTHETIC) are skipped, as
//! are implemented members that follow no accessor convention (hand-written behavior).
//! An implemented member that *does* follow a convention is rejected, since managed
//! property storage is always generated.

use std::collections::{btree_map::Entry, BTreeMap};

use tracing::{debug, trace};

use crate::{
    error::ExtractionError,
    model::{
        member::{AccessorKind, AccessorRef, MemberRc},
        schema::{ManagedProperty, Schema},
        typesystem::TypeDescriptor,
    },
    Result,
};

/// Accessors grouped under one property name during classification
#[derive(Default)]
struct PropertyCandidate {
    accessors: BTreeMap<AccessorKind, MemberRc>,
    internal: bool,
}

/// Extracts and validates schemas from candidate member lists.
///
/// The extractor is stateless; caching of results is the job of the
/// [`ModelSession`](crate::model::session::ModelSession).
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaExtractor;

impl SchemaExtractor {
    /// Create a new extractor
    #[must_use]
    pub fn new() -> Self {
        SchemaExtractor
    }

    /// Extract the schema of `ty` from its candidate members.
    ///
    /// # Arguments
    /// * `ty` - The structural type being extracted
    /// * `members` - The candidate members in stable discovery order
    ///
    /// # Errors
    /// Returns [`crate::Error::Extraction`] describing the first rule violation.
    pub fn extract(&self, ty: &TypeDescriptor, members: &[MemberRc]) -> Result<Schema> {
        let candidates = Self::classify(ty, members)?;

        let mut properties = Vec::with_capacity(candidates.len());
        for (name, candidate) in candidates {
            properties.push(Self::validate_property(ty, name, candidate)?);
        }

        let schema = Schema::new(ty.clone(), properties);
        debug!(
            type_name = %ty,
            properties = schema.len(),
            accessors = schema.accessor_count(),
            fingerprint = schema.fingerprint(),
            "extracted schema"
        );
        Ok(schema)
    }

    fn classify(
        ty: &TypeDescriptor,
        members: &[MemberRc],
    ) -> Result<BTreeMap<String, PropertyCandidate>> {
        let mut candidates: BTreeMap<String, PropertyCandidate> = BTreeMap::new();

        for member in members {
            if member.is_excluded() {
                trace!(type_name = %ty, member = %member, "skipping member outside the contract");
                continue;
            }

            let Some((kind, property)) = AccessorKind::parse_name(member.name()) else {
                if member.is_implemented() {
                    trace!(type_name = %ty, member = %member, "skipping implemented member");
                    continue;
                }
                return Err(ExtractionError::UnrecognizedMember {
                    type_name: ty.to_string(),
                    member: member.to_string(),
                }
                .into());
            };

            if member.is_implemented() {
                return Err(ExtractionError::ImplementedAccessor {
                    type_name: ty.to_string(),
                    property,
                    member: member.to_string(),
                    kind,
                }
                .into());
            }

            if let Err(reason) = kind.check_shape(member) {
                return Err(ExtractionError::InvalidAccessorSignature {
                    type_name: ty.to_string(),
                    member: member.to_string(),
                    kind,
                    reason,
                }
                .into());
            }

            trace!(type_name = %ty, member = %member, %kind, %property, "classified accessor");

            let candidate = candidates.entry(property.clone()).or_default();
            candidate.internal |= member.is_internal();

            match candidate.accessors.entry(kind) {
                Entry::Vacant(slot) => {
                    slot.insert(member.clone());
                }
                Entry::Occupied(existing) => {
                    let existing = existing.get();
                    if existing.parameters() != member.parameters()
                        || existing.return_type() != member.return_type()
                    {
                        return Err(ExtractionError::ConflictingAccessors {
                            type_name: ty.to_string(),
                            property,
                            kind,
                            first: existing.to_string(),
                            second: member.to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(candidates)
    }

    fn validate_property(
        ty: &TypeDescriptor,
        name: String,
        candidate: PropertyCandidate,
    ) -> Result<ManagedProperty> {
        let accessors = candidate.accessors;
        if accessors.is_empty() {
            return Err(ExtractionError::NoAccessors {
                type_name: ty.to_string(),
                property: name,
            }
            .into());
        }

        let get = accessors.get(&AccessorKind::GetGetter);
        let is = accessors.get(&AccessorKind::IsGetter);
        if let (Some(get), Some(is)) = (get, is) {
            if get.return_type() != is.return_type() {
                return Err(ExtractionError::GetterTypeMismatch {
                    type_name: ty.to_string(),
                    property: name,
                    get_type: get.return_type().to_string(),
                    is_type: is.return_type().to_string(),
                }
                .into());
            }
        }

        let Some(property_type) = get.or(is).map(|getter| getter.return_type().clone()) else {
            let kind = if accessors.contains_key(&AccessorKind::Setter) {
                AccessorKind::Setter
            } else {
                AccessorKind::Adder
            };
            return Err(ExtractionError::MissingGetter {
                type_name: ty.to_string(),
                property: name,
                kind,
            }
            .into());
        };

        if let Some(setter) = accessors.get(&AccessorKind::Setter) {
            let setter_type = &setter.parameters()[0];
            if *setter_type != property_type {
                return Err(ExtractionError::SetterTypeMismatch {
                    type_name: ty.to_string(),
                    property: name,
                    getter_type: property_type.to_string(),
                    setter_type: setter_type.to_string(),
                }
                .into());
            }
        }

        if let Some(adder) = accessors.get(&AccessorKind::Adder) {
            let adder_type = &adder.parameters()[0];
            let Some(element_type) = property_type.element_type() else {
                return Err(ExtractionError::AdderOnNonCollection {
                    type_name: ty.to_string(),
                    property: name,
                    property_type: property_type.to_string(),
                }
                .into());
            };
            if *adder_type != element_type {
                return Err(ExtractionError::AdderElementMismatch {
                    type_name: ty.to_string(),
                    property: name,
                    element_type: element_type.to_string(),
                    adder_type: adder_type.to_string(),
                }
                .into());
            }
        }

        let accessors = accessors
            .iter()
            .map(|(kind, member)| (*kind, AccessorRef::new(*kind, member)))
            .collect();

        Ok(ManagedProperty::new(
            name,
            property_type,
            candidate.internal,
            accessors,
        ))
    }
}
