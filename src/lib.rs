// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # modelcore
//!
//! The core of a managed structural model: from a user-declared abstract type (an
//! interface-like contract made of getter/setter pairs) `modelcore` extracts a schema,
//! validates that the type is well-formed for managed instantiation, and produces
//! instances whose property storage and accessor dispatch are generated rather than
//! hand-written.
//!
//! ## Features
//!
//! - **Structural type descriptors** - Canonical, generic-aware type signatures usable as cache keys
//! - **Strict schema validation** - Every malformed accessor is reported with type, property and kind
//! - **Weak accessor references** - Schemas never keep a defining context alive
//! - **Deterministic schemas** - Lexical property order and stable fingerprints
//! - **Concurrent caches** - Single-writer-wins schema population, parallel batch extraction
//!
//! ## Quick Start
//!
//! ```rust
//! use modelcore::prelude::*;
//!
//! let session = ModelSession::default();
//! let context = DefiningContext::new("build");
//!
//! let person = TypeDescriptor::named("Person");
//! TypeDeclaration::new(person.clone())
//!     .property("Name", TypeDescriptor::string())
//!     .getter("getInternalId", PrimitiveKind::Long.into())
//!     .flags(MemberFlags::INTERNAL)
//!     .setter("setInternalId", PrimitiveKind::Long.into())
//!     .flags(MemberFlags::INTERNAL)
//!     .define_in(&context);
//!
//! let schema = session.extract_from(&context, &person)?;
//! assert_eq!(schema.len(), 2);
//! assert_eq!(schema.public_properties().count(), 1);
//!
//! let mut instance = session.create(&person, &[])?;
//! instance.set("name", "Ada")?;
//! assert_eq!(instance.get("name")?, Value::from("Ada"));
//! # Ok::<(), modelcore::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`model`] - Type descriptors, members, schemas, bindings, instances and sessions
//! - [`FactoryConfig`] - Options for created instances
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: `debug` for schema
//! extraction, caching, binding and invalidation, `trace` for per-member classification.
//! No subscriber is installed; applications choose their own.

#[macro_use]
pub(crate) mod error;
pub(crate) mod config;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use modelcore::prelude::*;
///
/// let session = ModelSession::new(FactoryConfig::lenient());
/// let ty = session.descriptor("List<String>")?;
/// assert!(ty.is_collection());
/// # Ok::<(), modelcore::Error>(())
/// ```
pub mod prelude;

/// The managed structural model
///
/// # Key Components
///
/// - [`model::typesystem::TypeDescriptor`] - Structural type signature
/// - [`model::member::AccessorRef`] - Weak reference to an accessor member
/// - [`model::schema::SchemaExtractor`] - Member list to validated schema
/// - [`model::binding::PropertyBinder`] - Schema to slot layout and dispatch table
/// - [`model::instance::InstanceFactory`] - Binding to instances
/// - [`model::session::ModelSession`] - Caches tying the stages together
pub mod model;

/// `modelcore` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `modelcore` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use modelcore::{Error, ModelSession};
///
/// let session = ModelSession::default();
/// match session.descriptor("List<") {
///     Err(Error::InvalidTypeName(message)) => println!("Bad name: {}", message),
///     Err(e) => println!("Error: {}", e),
///     Ok(ty) => println!("Parsed {}", ty),
/// }
/// ```
pub use error::Error;

/// A single violation found during schema extraction
pub use error::ExtractionError;

/// Options for managed instances
pub use config::FactoryConfig;

/// Main entry point for extracting, binding and instantiating managed types.
///
/// See [`model::session::ModelSession`].
pub use model::session::ModelSession;

/// Structural type signature, see [`model::typesystem::TypeDescriptor`]
pub use model::typesystem::TypeDescriptor;
