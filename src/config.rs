//! Instance factory configuration
//!
//! This module provides the options recognized when creating managed instances. They
//! control how unset properties are read and how thoroughly written values are checked
//! against the declared property types.

/// Configuration for managed instances created by an
/// [`InstanceFactory`](crate::model::instance::InstanceFactory)
///
/// Written values are always checked against the declared type of their property. By
/// default the check covers the outer shape only (scalar kind, collection flavor, nested
/// instance type); collection elements are trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Unset properties whose declared type has a canonical zero value (scalars and
    /// collections) read as that value instead of failing with
    /// [`Error::UnsetProperty`](crate::Error::UnsetProperty)
    pub use_zero_value_defaults: bool,

    /// Revalidate the full structural type of every written value, including the elements
    /// of collection values
    pub strict_type_checking: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            use_zero_value_defaults: false,
            strict_type_checking: false,
        }
    }
}

impl FactoryConfig {
    /// Creates a lenient configuration
    ///
    /// Unset scalar and collection properties read as their zero value, writes are only
    /// checked shallowly.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            use_zero_value_defaults: true,
            strict_type_checking: false,
        }
    }

    /// Creates a configuration with all checks enabled
    ///
    /// Every read of an unset property fails and every write is checked deeply.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            use_zero_value_defaults: false,
            strict_type_checking: true,
        }
    }

    /// Creates a configuration suitable for production use
    ///
    /// Deep type checks catch malformed collections at the point of the write, while unset
    /// scalars and collections read as their zero value.
    #[must_use]
    pub fn production() -> Self {
        Self {
            use_zero_value_defaults: true,
            strict_type_checking: true,
        }
    }
}
