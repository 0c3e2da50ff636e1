//! Typed entry point
//!
//! Rust erases generic arguments at runtime, so a type that wants to be
//! synthesized through [`FixtureFactory::synthesize`](crate::engine::FixtureFactory::synthesize)
//! spells out its own descriptor and how to decode the engine's [`Value`].
//!
//! ```ignore
//! struct Point { x: i32, y: i32 }
//!
//! impl Fixture for Point {
//!     fn type_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::named("Point")
//!     }
//!
//!     fn from_value(value: Value) -> Result<Self, FixtureError> {
//!         let mut record = record_of(value, "Point")?;
//!         Ok(Point { x: field(&mut record, "x")?, y: field(&mut record, "y")? })
//!     }
//! }
//! ```

use crate::error::FixtureError;
use crate::types::{RawClass, TypeDescriptor};
use crate::value::{Record, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub trait Fixture: Sized {
    fn type_descriptor() -> TypeDescriptor;

    fn from_value(value: Value) -> Result<Self, FixtureError>;
}

macro_rules! direct_fixture {
    ($ty:ty, $raw:ident, $variant:ident) => {
        impl Fixture for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::of(RawClass::$raw)
            }

            fn from_value(value: Value) -> Result<Self, FixtureError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(FixtureError::mismatch(RawClass::$raw, other.kind())),
                }
            }
        }
    };
}

direct_fixture!(bool, Boolean, Bool);
direct_fixture!(i8, Byte, Byte);
direct_fixture!(i16, Short, Short);
direct_fixture!(i32, Int, Int);
direct_fixture!(i64, Long, Long);
direct_fixture!(f32, Float, Float);
direct_fixture!(f64, Double, Double);
direct_fixture!(char, Char, Char);
direct_fixture!(String, String, Str);
direct_fixture!(DateTime<Utc>, Instant, Instant);
direct_fixture!(NaiveDate, LocalDate, LocalDate);
direct_fixture!(NaiveDateTime, LocalDateTime, LocalDateTime);
direct_fixture!(DateTime<FixedOffset>, ZonedDateTime, ZonedDateTime);
direct_fixture!(FixedOffset, ZoneOffset, ZoneOffset);

fn elements<T: Fixture>(items: impl IntoIterator<Item = Value>) -> Result<Vec<T>, FixtureError> {
    items.into_iter().map(T::from_value).collect()
}

/// Lists, and generic arrays when decoded directly.
impl<T: Fixture> Fixture for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::type_descriptor())
    }

    fn from_value(value: Value) -> Result<Self, FixtureError> {
        match value {
            Value::List(items) | Value::Array { items, .. } => elements(items),
            Value::Set(items) => elements(items),
            other => Err(FixtureError::mismatch(Self::type_descriptor(), other.kind())),
        }
    }
}

impl<T: Fixture + Eq + Hash> Fixture for IndexSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::type_descriptor())
    }

    fn from_value(value: Value) -> Result<Self, FixtureError> {
        match value {
            Value::Set(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(FixtureError::mismatch(Self::type_descriptor(), other.kind())),
        }
    }
}

impl<T: Fixture + Eq + Hash> Fixture for HashSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::type_descriptor())
    }

    fn from_value(value: Value) -> Result<Self, FixtureError> {
        IndexSet::<T>::from_value(value).map(|set| set.into_iter().collect())
    }
}

impl<K: Fixture + Eq + Hash, V: Fixture> Fixture for IndexMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::type_descriptor(), V::type_descriptor())
    }

    fn from_value(value: Value) -> Result<Self, FixtureError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(FixtureError::mismatch(Self::type_descriptor(), other.kind())),
        }
    }
}

impl<K: Fixture + Eq + Hash, V: Fixture> Fixture for HashMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::type_descriptor(), V::type_descriptor())
    }

    fn from_value(value: Value) -> Result<Self, FixtureError> {
        IndexMap::<K, V>::from_value(value).map(|map| map.into_iter().collect())
    }
}

/// Unwraps a record of `class`.
pub fn record_of(value: Value, class: &str) -> Result<Record, FixtureError> {
    match value {
        Value::Record(record) if &*record.class == class => Ok(record),
        other => Err(FixtureError::mismatch(class, other.kind())),
    }
}

/// Removes field `name` from `record` and decodes it.
pub fn field<T: Fixture>(record: &mut Record, name: &str) -> Result<T, FixtureError> {
    let value = record.take(name).ok_or_else(|| FixtureError::TypeMismatch {
        expected: format!("field {} on {}", name, record.class),
        found: "no such field".to_string(),
    })?;
    T::from_value(value)
}

/// Clones the Rust value inside a [`Value::Native`].
pub fn native_of<T: Any + Clone>(value: &Value) -> Result<T, FixtureError> {
    match value {
        Value::Native(native) => native.downcast_ref::<T>().cloned().ok_or_else(|| {
            FixtureError::mismatch(std::any::type_name::<T>(), "a different native type")
        }),
        other => Err(FixtureError::mismatch(std::any::type_name::<T>(), other.kind())),
    }
}
