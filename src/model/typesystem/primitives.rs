use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::model::{instance::ManagedInstance, typesystem::TypeDescriptor};

/// Built-in scalar types and their canonical names
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum PrimitiveKind {
    /// `boolean`
    #[strum(serialize = "boolean")]
    Boolean,
    /// `char`
    #[strum(serialize = "char")]
    Char,
    /// signed 8bit integer
    #[strum(serialize = "byte")]
    Byte,
    /// signed 16bit integer
    #[strum(serialize = "short")]
    Short,
    /// signed 32bit integer
    #[strum(serialize = "int")]
    Int,
    /// signed 64bit integer
    #[strum(serialize = "long")]
    Long,
    /// 32bit floating-point
    #[strum(serialize = "float")]
    Float,
    /// 64bit floating-point
    #[strum(serialize = "double")]
    Double,
    /// Immutable character string
    #[strum(serialize = "String")]
    String,
}

impl PrimitiveKind {
    /// The canonical zero value of this scalar type
    #[must_use]
    pub fn zero_value(self) -> Value {
        match self {
            PrimitiveKind::Boolean => Value::Boolean(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::Byte => Value::Byte(0),
            PrimitiveKind::Short => Value::Short(0),
            PrimitiveKind::Int => Value::Int(0),
            PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Float => Value::Float(0.0),
            PrimitiveKind::Double => Value::Double(0.0),
            PrimitiveKind::String => Value::String(String::new()),
        }
    }
}

/// Built-in collection types usable as collection-valued properties
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum CollectionKind {
    /// Ordered sequence, duplicates allowed
    #[strum(serialize = "List")]
    List,
    /// Insertion-ordered collection without duplicates
    #[strum(serialize = "Set")]
    Set,
}

/// A runtime value held in a managed instance slot
///
/// Equality is structural. Floating-point values compare by bit pattern, so a `NaN`
/// equals itself and `0.0` differs from `-0.0`.
#[derive(Debug, Clone)]
pub enum Value {
    /// Boolean value
    Boolean(bool),
    /// Character value
    Char(char),
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Insertion-ordered set of values (never holds two equal elements)
    Set(Vec<Value>),
    /// A nested managed instance
    Struct(ManagedInstance),
}

impl Value {
    /// The scalar kind of this value, if it is a scalar
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Boolean(_) => Some(PrimitiveKind::Boolean),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::Byte(_) => Some(PrimitiveKind::Byte),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::String(_) => Some(PrimitiveKind::String),
            Value::List(_) | Value::Set(_) | Value::Struct(_) => None,
        }
    }

    /// Name of the runtime shape of this value, used in diagnostics
    #[must_use]
    pub fn shape(&self) -> String {
        match self {
            Value::List(_) => CollectionKind::List.to_string(),
            Value::Set(_) => CollectionKind::Set.to_string(),
            Value::Struct(instance) => instance.type_descriptor().to_string(),
            scalar => scalar
                .primitive_kind()
                .map(|kind| kind.to_string())
                .unwrap_or_default(),
        }
    }

    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to convert to a 32-bit integer value
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Byte(value) => Some(i32::from(*value)),
            Value::Short(value) => Some(i32::from(*value)),
            Value::Int(value) => Some(*value),
            Value::Long(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(value) => Some(i64::from(*value)),
            Value::Short(value) => Some(i64::from(*value)),
            Value::Int(value) => Some(i64::from(*value)),
            Value::Long(value) => Some(*value),
            _ => None,
        }
    }

    /// Borrow the string content
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the elements of a list or set
    #[must_use]
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the nested managed instance
    #[must_use]
    pub fn as_instance(&self) -> Option<&ManagedInstance> {
        match self {
            Value::Struct(instance) => Some(instance),
            _ => None,
        }
    }

    /// Append an element to a list, or to a set if no equal element is present.
    ///
    /// Returns `false` if this value is not a collection.
    pub(crate) fn push_element(&mut self, element: Value) -> bool {
        match self {
            Value::List(items) => {
                items.push(element);
                true
            }
            Value::Set(items) => {
                if !items.contains(&element) {
                    items.push(element);
                }
                true
            }
            _ => false,
        }
    }

    /// Drop repeated elements of every set, nested ones included, keeping the first
    /// occurrence of each.
    pub(crate) fn normalize(self) -> Value {
        match self {
            Value::List(items) => Value::List(items.into_iter().map(Value::normalize).collect()),
            Value::Set(items) => {
                let mut set = Value::Set(Vec::with_capacity(items.len()));
                for item in items {
                    set.push_element(item.normalize());
                }
                set
            }
            other => other,
        }
    }

    /// Check whether this value could be stored for `ty` without any conversion
    #[must_use]
    pub fn is_instance_of(&self, ty: &TypeDescriptor) -> bool {
        ty.accepts(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ManagedInstance> for Value {
    fn from(value: ManagedInstance) -> Self {
        Value::Struct(value)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_primitive_names_roundtrip() {
        for kind in PrimitiveKind::iter() {
            let name = kind.to_string();
            assert_eq!(name.parse::<PrimitiveKind>().ok(), Some(kind));
            assert_eq!(kind.zero_value().primitive_kind(), Some(kind));
        }
        assert_eq!(PrimitiveKind::COUNT, 9);
        assert!("Integer".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(Value::Int(1).shape(), "int");
        assert_eq!(Value::from("x").shape(), "String");
        assert_eq!(Value::List(vec![]).shape(), "List");
        assert_eq!(Value::Set(vec![]).shape(), "Set");
    }

    #[test]
    fn test_push_element() {
        let mut list = Value::List(vec![]);
        assert!(list.push_element(Value::Int(1)));
        assert!(list.push_element(Value::Int(1)));
        assert_eq!(list.as_elements().map(<[Value]>::len), Some(2));

        let mut set = Value::Set(vec![]);
        assert!(set.push_element(Value::Int(1)));
        assert!(set.push_element(Value::Int(1)));
        assert!(set.push_element(Value::Int(2)));
        assert_eq!(set, Value::Set(vec![Value::Int(1), Value::Int(2)]));

        let mut scalar = Value::Int(0);
        assert!(!scalar.push_element(Value::Int(1)));
    }

    #[test]
    fn test_float_equality_by_bits() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_eq!(Value::Float(f32::NAN), Value::Float(f32::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Double(1.0), Value::Float(1.0));
        assert_ne!(Value::List(vec![]), Value::Set(vec![]));

        let mut set = Value::Set(vec![]);
        set.push_element(Value::Double(f64::NAN));
        set.push_element(Value::Double(f64::NAN));
        assert_eq!(set.as_elements().map(<[Value]>::len), Some(1));
    }

    #[test]
    fn test_normalize_deduplicates_sets() {
        let value = Value::List(vec![Value::Set(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("a"),
        ])]);
        assert_eq!(
            value.normalize(),
            Value::List(vec![Value::Set(vec![Value::from("a"), Value::from("b")])])
        );

        let list = Value::List(vec![Value::Int(1), Value::Int(1)]);
        assert_eq!(list.clone().normalize(), list);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::Short(7).as_i32(), Some(7));
        assert_eq!(Value::Long(i64::MAX).as_i32(), None);
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert!(Value::Int(1).as_instance().is_none());
    }
}
