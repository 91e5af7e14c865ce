use thiserror::Error;

use crate::model::member::AccessorKind;

macro_rules! binding_error {
    // Single string version
    ($type_name:expr, $msg:expr) => {
        crate::Error::Binding {
            type_name: $type_name.to_string(),
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($type_name:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Binding {
            type_name: $type_name.to_string(),
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant carries enough context to attribute the failure precisely: the offending
/// type, the property and, where relevant, the accessor kind or member signature. None of
/// these errors are retried internally; they are always reported to the immediate caller.
///
/// # Error Categories
///
/// ## Schema Errors
/// - [`Error::Extraction`] - The declared type is not a well-formed managed type
/// - [`Error::InvalidTypeName`] - A canonical type name could not be parsed
///
/// ## Binding Errors
/// - [`Error::Binding`] - Internal consistency failure while binding a schema
/// - [`Error::Resolution`] - An accessor reference outlived its declaring member
///
/// ## Instance Errors
/// - [`Error::UnknownType`] - The type was never extracted or defined
/// - [`Error::UnsetProperty`] - A property was read before it was written
/// - [`Error::TypeMismatch`] - A written value does not match the declared type
/// - [`Error::UnknownProperty`], [`Error::UnknownAccessor`] - Lookup by name failed
/// - [`Error::NotWritable`], [`Error::NotCollection`] - Operation not supported by the property
/// - [`Error::InvalidArguments`] - Accessor invoked with the wrong number of arguments
///
/// # Examples
///
/// ```rust
/// use modelcore::{Error, ModelSession, TypeDescriptor};
///
/// let session = ModelSession::default();
/// match session.create(&TypeDescriptor::named("Unknown"), &[]) {
///     Err(Error::UnknownType(name)) => eprintln!("extract '{name}' first"),
///     Err(Error::Extraction(err)) => eprintln!("not a managed type: {err}"),
///     Err(e) => eprintln!("Other error: {e}"),
///     Ok(_) => {}
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The declared type is not well-formed as a managed structural type.
    ///
    /// Extraction is all-or-nothing: when this error is returned no schema was produced
    /// and nothing was cached for the type.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Internal consistency failure during binding.
    ///
    /// This should never occur for a schema produced by the extractor and is treated as a
    /// defect. The error includes the source location where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `type_name` - The type whose schema failed to bind
    /// * `message` - Detailed description of the inconsistency
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Binding of '{type_name}' failed - {file}:{line}: {message}")]
    Binding {
        /// The type whose schema failed to bind
        type_name: String,
        /// The message to be printed for the Binding error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An accessor reference could not be resolved to a live member.
    ///
    /// Raised at the point of invocation once the member's defining context has been
    /// released or the declaring type has been evicted, never at reference creation.
    #[error("Failed to resolve {kind} accessor '{signature}' - its defining context was released")]
    Resolution {
        /// Rendered signature of the member (`Type.name(params): return`)
        signature: String,
        /// Kind of the accessor that was invoked
        kind: AccessorKind,
    },

    /// A property without a default was read before any write.
    #[error("Property '{property}' of '{type_name}' has not been set")]
    UnsetProperty {
        /// The managed type owning the property
        type_name: String,
        /// The property that was read
        property: String,
    },

    /// A value supplied for a property does not match its declared type.
    #[error("Cannot assign a value of type '{actual}' to property '{property}' of '{type_name}' (declared as '{expected}')")]
    TypeMismatch {
        /// The managed type owning the property
        type_name: String,
        /// The property that was written
        property: String,
        /// The declared type of the property
        expected: String,
        /// The runtime shape of the rejected value
        actual: String,
    },

    /// The managed type has no property with this name.
    #[error("'{type_name}' has no property named '{property}'")]
    UnknownProperty {
        /// The managed type that was queried
        type_name: String,
        /// The property name that was not found
        property: String,
    },

    /// The managed type declares no accessor with this method name.
    #[error("'{type_name}' declares no accessor named '{method}'")]
    UnknownAccessor {
        /// The managed type that was queried
        type_name: String,
        /// The method name that was not found
        method: String,
    },

    /// The property has no setter.
    #[error("Property '{property}' of '{type_name}' is read-only")]
    NotWritable {
        /// The managed type owning the property
        type_name: String,
        /// The read-only property
        property: String,
    },

    /// The property has no adder.
    #[error("Property '{property}' of '{type_name}' does not accept added elements")]
    NotCollection {
        /// The managed type owning the property
        type_name: String,
        /// The property without adder
        property: String,
    },

    /// An accessor was invoked with the wrong number of arguments.
    #[error("Accessor '{method}' expects {expected} argument(s), got {actual}")]
    InvalidArguments {
        /// The invoked method name
        method: String,
        /// Parameter count of the live member
        expected: usize,
        /// Number of supplied arguments
        actual: usize,
    },

    /// The type is unknown to the session or defining context it was looked up in.
    ///
    /// Returned when creating an instance of a type that has not been extracted yet, or
    /// when member discovery finds no definition for the type.
    #[error("Unknown managed type '{0}'")]
    UnknownType(String),

    /// A canonical type name could not be parsed.
    #[error("Invalid type name - {0}")]
    InvalidTypeName(String),
}

/// A single violation found while extracting the schema of a managed type.
///
/// Each rule of the extractor maps to exactly one variant, so callers can match on the
/// precise cause. Every variant names the offending type; member-level variants also name
/// the member, property-level variants name the property and accessor kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The member does not follow any recognized accessor naming convention.
    #[error("Invalid managed type '{type_name}': member '{member}' is not a recognized property accessor")]
    UnrecognizedMember {
        /// The type being extracted
        type_name: String,
        /// Rendered signature of the rejected member
        member: String,
    },

    /// The member follows an accessor naming convention but has the wrong shape.
    #[error("Invalid managed type '{type_name}': {kind} '{member}' {reason}")]
    InvalidAccessorSignature {
        /// The type being extracted
        type_name: String,
        /// Rendered signature of the rejected member
        member: String,
        /// The accessor kind suggested by the member name
        kind: AccessorKind,
        /// What is wrong with the shape
        reason: &'static str,
    },

    /// An accessor carries a hand-written implementation.
    #[error("Invalid managed type '{type_name}': {kind} '{member}' of property '{property}' must not have an implementation")]
    ImplementedAccessor {
        /// The type being extracted
        type_name: String,
        /// The property the accessor belongs to
        property: String,
        /// Rendered signature of the rejected member
        member: String,
        /// The accessor kind
        kind: AccessorKind,
    },

    /// Two accessors of the same kind with different signatures target one property.
    #[error("Invalid managed type '{type_name}': property '{property}' has conflicting {kind} accessors '{first}' and '{second}'")]
    ConflictingAccessors {
        /// The type being extracted
        type_name: String,
        /// The property with conflicting accessors
        property: String,
        /// The duplicated accessor kind
        kind: AccessorKind,
        /// Signature of the accessor seen first
        first: String,
        /// Signature of the conflicting accessor
        second: String,
    },

    /// `isX` and `getX` return different types.
    #[error("Invalid managed type '{type_name}': getters of property '{property}' return different types ('{get_type}' and '{is_type}')")]
    GetterTypeMismatch {
        /// The type being extracted
        type_name: String,
        /// The property with mismatching getters
        property: String,
        /// Return type of the `get` getter
        get_type: String,
        /// Return type of the `is` getter
        is_type: String,
    },

    /// The setter parameter type differs from the getter return type.
    #[error("Invalid managed type '{type_name}': setter of property '{property}' accepts '{setter_type}' but its getter returns '{getter_type}'")]
    SetterTypeMismatch {
        /// The type being extracted
        type_name: String,
        /// The property with mismatching accessors
        property: String,
        /// Return type of the getter
        getter_type: String,
        /// Parameter type of the setter
        setter_type: String,
    },

    /// A setter or adder without any getter.
    #[error("Invalid managed type '{type_name}': property '{property}' has a {kind} but no getter")]
    MissingGetter {
        /// The type being extracted
        type_name: String,
        /// The property without getter
        property: String,
        /// The accessor kind that has no matching getter
        kind: AccessorKind,
    },

    /// An adder targets a property that is not collection-valued.
    #[error("Invalid managed type '{type_name}': property '{property}' of type '{property_type}' is not a collection and cannot have an adder")]
    AdderOnNonCollection {
        /// The type being extracted
        type_name: String,
        /// The property with the adder
        property: String,
        /// The declared type of the property
        property_type: String,
    },

    /// The adder parameter type differs from the collection element type.
    #[error("Invalid managed type '{type_name}': adder of property '{property}' accepts '{adder_type}' but elements are '{element_type}'")]
    AdderElementMismatch {
        /// The type being extracted
        type_name: String,
        /// The property with the adder
        property: String,
        /// Element type of the collection
        element_type: String,
        /// Parameter type of the adder
        adder_type: String,
    },

    /// A property ended up without any accessor.
    #[error("Invalid managed type '{type_name}': property '{property}' has no accessors")]
    NoAccessors {
        /// The type being extracted
        type_name: String,
        /// The empty property
        property: String,
    },
}

impl ExtractionError {
    /// The name of the type whose extraction failed.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            ExtractionError::UnrecognizedMember { type_name, .. }
            | ExtractionError::InvalidAccessorSignature { type_name, .. }
            | ExtractionError::ImplementedAccessor { type_name, .. }
            | ExtractionError::ConflictingAccessors { type_name, .. }
            | ExtractionError::GetterTypeMismatch { type_name, .. }
            | ExtractionError::SetterTypeMismatch { type_name, .. }
            | ExtractionError::MissingGetter { type_name, .. }
            | ExtractionError::AdderOnNonCollection { type_name, .. }
            | ExtractionError::AdderElementMismatch { type_name, .. }
            | ExtractionError::NoAccessors { type_name, .. } => type_name,
        }
    }

    /// The property the violation is attributed to, if it is a property-level violation.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self {
            ExtractionError::UnrecognizedMember { .. }
            | ExtractionError::InvalidAccessorSignature { .. } => None,
            ExtractionError::ImplementedAccessor { property, .. }
            | ExtractionError::ConflictingAccessors { property, .. }
            | ExtractionError::GetterTypeMismatch { property, .. }
            | ExtractionError::SetterTypeMismatch { property, .. }
            | ExtractionError::MissingGetter { property, .. }
            | ExtractionError::AdderOnNonCollection { property, .. }
            | ExtractionError::AdderElementMismatch { property, .. }
            | ExtractionError::NoAccessors { property, .. } => Some(property),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_attribution() {
        let err = ExtractionError::SetterTypeMismatch {
            type_name: "Counter".to_string(),
            property: "count".to_string(),
            getter_type: "int".to_string(),
            setter_type: "String".to_string(),
        };

        assert_eq!(err.type_name(), "Counter");
        assert_eq!(err.property(), Some("count"));

        let message = err.to_string();
        assert!(message.contains("Counter"));
        assert!(message.contains("count"));
        assert!(message.contains("String"));
    }

    #[test]
    fn test_member_level_errors_have_no_property() {
        let err = ExtractionError::UnrecognizedMember {
            type_name: "Person".to_string(),
            member: "Person.describe(): String".to_string(),
        };
        assert_eq!(err.property(), None);
        assert!(err.to_string().contains("Person.describe(): String"));
    }

    #[test]
    fn test_binding_error_macro_records_location() {
        let err = binding_error!("Person", "slot {} assigned twice", 3);
        match err {
            Error::Binding {
                type_name,
                message,
                file,
                line,
            } => {
                assert_eq!(type_name, "Person");
                assert_eq!(message, "slot 3 assigned twice");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
