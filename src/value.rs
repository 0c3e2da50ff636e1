//! Synthesized values
//!
//! `Value` is what the engine hands back for a dynamically described type.
//! Values are `Eq + Hash` so they can be set elements and map keys: floats
//! compare by bit pattern and native values by identity.

use crate::types::{ClassName, RawClass, TypeDescriptor};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::fmt;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An opaque Rust value produced by a custom creator.
#[derive(Clone)]
pub struct NativeValue(Arc<dyn Any + Send + Sync>);

impl NativeValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        NativeValue(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeValue({:p})", Arc::as_ptr(&self.0))
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeValue {}

impl Hash for NativeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

/// Instance built by a record constructor: its class and named arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub class: ClassName,
    pub fields: Vec<(Option<Arc<str>>, Value)>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field.as_deref() == Some(name))
            .map(|(_, value)| value)
    }

    /// Removes the field called `name` and returns its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self
            .fields
            .iter()
            .position(|(field, _)| field.as_deref() == Some(name))?;
        Some(self.fields.remove(index).1)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),

    BooleanArray(Vec<bool>),
    ByteArray(Vec<i8>),
    CharArray(Vec<char>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),

    /// Items of a generic array, typed by the declared element type
    Array {
        element: TypeDescriptor,
        items: Vec<Value>,
    },
    List(Vec<Value>),
    Set(IndexSet<Value>),
    Map(IndexMap<Value, Value>),

    Instant(DateTime<Utc>),
    LocalDate(NaiveDate),
    LocalDateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
    ZoneOffset(FixedOffset),

    Enum {
        class: ClassName,
        constant: Arc<str>,
    },
    Record(Record),
    Native(NativeValue),
}

impl Value {
    pub fn native<T: Any + Send + Sync>(value: T) -> Self {
        Value::Native(NativeValue::new(value))
    }

    /// Raw class this value is an instance of.
    ///
    /// Natives report `None`, they carry no class of their own.
    pub fn runtime_class(&self) -> Option<RawClass> {
        let raw = match self {
            Value::Bool(_) => RawClass::Boolean,
            Value::Byte(_) => RawClass::Byte,
            Value::Short(_) => RawClass::Short,
            Value::Int(_) => RawClass::Int,
            Value::Long(_) => RawClass::Long,
            Value::Float(_) => RawClass::Float,
            Value::Double(_) => RawClass::Double,
            Value::Char(_) => RawClass::Char,
            Value::Str(_) => RawClass::String,
            Value::BooleanArray(_) => RawClass::BooleanArray,
            Value::ByteArray(_) => RawClass::ByteArray,
            Value::CharArray(_) => RawClass::CharArray,
            Value::ShortArray(_) => RawClass::ShortArray,
            Value::IntArray(_) => RawClass::IntArray,
            Value::LongArray(_) => RawClass::LongArray,
            Value::FloatArray(_) => RawClass::FloatArray,
            Value::DoubleArray(_) => RawClass::DoubleArray,
            Value::Array { .. } => RawClass::Array,
            Value::List(_) => RawClass::List,
            Value::Set(_) => RawClass::Set,
            Value::Map(_) => RawClass::Map,
            Value::Instant(_) => RawClass::Instant,
            Value::LocalDate(_) => RawClass::LocalDate,
            Value::LocalDateTime(_) => RawClass::LocalDateTime,
            Value::ZonedDateTime(_) => RawClass::ZonedDateTime,
            Value::ZoneOffset(_) => RawClass::ZoneOffset,
            Value::Enum { class, .. } => RawClass::Named(class.clone()),
            Value::Record(record) => RawClass::Named(record.class.clone()),
            Value::Native(_) => return None,
        };
        Some(raw)
    }

    /// Number of elements for arrays and containers.
    pub fn len(&self) -> Option<usize> {
        let len = match self {
            Value::Str(s) => s.chars().count(),
            Value::BooleanArray(v) => v.len(),
            Value::ByteArray(v) => v.len(),
            Value::CharArray(v) => v.len(),
            Value::ShortArray(v) => v.len(),
            Value::IntArray(v) => v.len(),
            Value::LongArray(v) => v.len(),
            Value::FloatArray(v) => v.len(),
            Value::DoubleArray(v) => v.len(),
            Value::Array { items, .. } => items.len(),
            Value::List(v) => v.len(),
            Value::Set(v) => v.len(),
            Value::Map(v) => v.len(),
            _ => return None,
        };
        Some(len)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn kind(&self) -> String {
        match self.runtime_class() {
            Some(raw) => raw.to_string(),
            None => "Native".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::BooleanArray(a), Value::BooleanArray(b)) => a == b,
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::CharArray(a), Value::CharArray(b)) => a == b,
            (Value::ShortArray(a), Value::ShortArray(b)) => a == b,
            (Value::IntArray(a), Value::IntArray(b)) => a == b,
            (Value::LongArray(a), Value::LongArray(b)) => a == b,
            (Value::FloatArray(a), Value::FloatArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Value::DoubleArray(a), Value::DoubleArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (
                Value::Array {
                    element: ea,
                    items: ia,
                },
                Value::Array {
                    element: eb,
                    items: ib,
                },
            ) => ea == eb && ia == ib,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Instant(a), Value::Instant(b)) => a == b,
            (Value::LocalDate(a), Value::LocalDate(b)) => a == b,
            (Value::LocalDateTime(a), Value::LocalDateTime(b)) => a == b,
            (Value::ZonedDateTime(a), Value::ZonedDateTime(b)) => a == b,
            (Value::ZoneOffset(a), Value::ZoneOffset(b)) => a == b,
            (
                Value::Enum {
                    class: ca,
                    constant: a,
                },
                Value::Enum {
                    class: cb,
                    constant: b,
                },
            ) => ca == cb && a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(v) => v.hash(state),
            Value::Byte(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Char(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
            Value::BooleanArray(v) => v.hash(state),
            Value::ByteArray(v) => v.hash(state),
            Value::CharArray(v) => v.hash(state),
            Value::ShortArray(v) => v.hash(state),
            Value::IntArray(v) => v.hash(state),
            Value::LongArray(v) => v.hash(state),
            Value::FloatArray(v) => v.iter().for_each(|x| x.to_bits().hash(state)),
            Value::DoubleArray(v) => v.iter().for_each(|x| x.to_bits().hash(state)),
            Value::Array { element, items } => {
                element.hash(state);
                items.hash(state);
            }
            Value::List(v) => v.hash(state),
            // set and map equality ignores order, so element hashes are summed
            Value::Set(v) => unordered_hash(v.iter()).hash(state),
            Value::Map(v) => unordered_hash(v.iter()).hash(state),
            Value::Instant(v) => v.hash(state),
            Value::LocalDate(v) => v.hash(state),
            Value::LocalDateTime(v) => v.hash(state),
            Value::ZonedDateTime(v) => v.hash(state),
            Value::ZoneOffset(v) => v.hash(state),
            Value::Enum { class, constant } => {
                class.hash(state);
                constant.hash(state);
            }
            Value::Record(record) => record.hash(state),
            Value::Native(native) => native.hash(state),
        }
    }
}

fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items.fold(0u64, |sum, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        sum.wrapping_add(hasher.finish())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_values_compare_by_bits() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn test_set_collapses_equal_values() {
        let mut set = IndexSet::new();
        set.insert(Value::Str("a".into()));
        set.insert(Value::Str("a".into()));
        set.insert(Value::Int(1));
        assert_eq!(set.len(), 2);
    }

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_set_and_map_hash_ignores_order_but_not_content() {
        let forward = Value::Set([Value::Int(1), Value::Int(2)].into_iter().collect());
        let backward = Value::Set([Value::Int(2), Value::Int(1)].into_iter().collect());
        let other = Value::Set([Value::Int(3), Value::Int(4)].into_iter().collect());
        assert_eq!(forward, backward);
        assert_eq!(hash_of(&forward), hash_of(&backward));
        assert_ne!(hash_of(&forward), hash_of(&other));

        let map = |entries: [(i32, bool); 2]| {
            Value::Map(entries.into_iter().map(|(k, v)| (Value::Int(k), Value::Bool(v))).collect())
        };
        assert_eq!(hash_of(&map([(1, true), (2, false)])), hash_of(&map([(2, false), (1, true)])));
        assert_ne!(hash_of(&map([(1, true), (2, false)])), hash_of(&map([(1, false), (2, true)])));
    }

    #[test]
    fn test_natives_compare_by_identity() {
        let a = Value::native(5u8);
        let b = Value::native(5u8);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.runtime_class(), None);
    }

    #[test]
    fn test_record_take_removes_field() {
        let mut record = Record {
            class: Arc::from("Point"),
            fields: vec![
                (Some(Arc::from("x")), Value::Int(1)),
                (Some(Arc::from("y")), Value::Int(2)),
            ],
        };
        assert_eq!(record.field("y"), Some(&Value::Int(2)));
        assert_eq!(record.take("x"), Some(Value::Int(1)));
        assert_eq!(record.take("x"), None);
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn test_runtime_class_of_record() {
        let value = Value::Record(Record {
            class: Arc::from("Point"),
            fields: Vec::new(),
        });
        assert_eq!(value.runtime_class(), Some(RawClass::named("Point")));
        assert_eq!(value.kind(), "Point");
    }
}
