//! The managed structural model.
//!
//! Data flows through the submodules in declaration order: descriptors and members are
//! turned into a [`schema::Schema`], the schema into a [`binding::Binding`], and the
//! binding into [`instance::ManagedInstance`] values. [`session::ModelSession`] ties the
//! stages together and caches their results.
//!
//! - [`typesystem`]: Type descriptors and runtime values
//! - [`member`]: Candidate members, defining contexts and accessor references
//! - [`schema`]: Schema extraction and validation
//! - [`binding`]: Slot layout and accessor dispatch
//! - [`instance`]: Managed instances and their factory
//! - [`session`]: Lifecycle-scoped caches

pub mod binding;
pub mod instance;
pub mod member;
pub mod schema;
pub mod session;
pub mod typesystem;
