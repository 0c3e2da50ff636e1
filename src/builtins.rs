//! Built-in kinds: scalars, strings, arrays, containers and date/time values.
//!
//! Elements of arrays and containers go back through the full dispatch, so
//! custom creators apply to them as well.

use crate::engine::Synthesis;
use crate::error::FixtureError;
use crate::resolver;
use crate::types::{RawClass, TypeBinding, TypeDescriptor};
use crate::value::Value;
use chrono::{DateTime, Days, Local, Utc};

type Draw<T> = Result<T, FixtureError>;

/// Value for a built-in kind, `None` for catalogued classes.
pub(crate) fn synthesize_builtin(
    synthesis: &mut Synthesis<'_>,
    raw: &RawClass,
    binding: &TypeBinding,
    param_name: Option<&str>,
) -> Draw<Option<Value>> {
    let config = synthesis.config();
    let random = synthesis.random();

    let value = match raw {
        RawClass::Boolean => Value::Bool(random.next_bool()),
        RawClass::Byte => Value::Byte(random.next_i8()),
        RawClass::Short => Value::Short(random.next_i16()),
        RawClass::Int => Value::Int(random.int_in(config.int_range())),
        RawClass::Long => Value::Long(random.next_i64()),
        RawClass::Float => Value::Float(random.next_f32()),
        RawClass::Double => Value::Double(random.next_f64()),
        RawClass::Char => Value::Char(random.printable_char()),
        RawClass::String => Value::Str(random_string(synthesis, param_name)?),

        RawClass::BooleanArray => Value::BooleanArray(fixed_elements(synthesis, RawClass::Boolean, |v| match v {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        })?),
        RawClass::ByteArray => Value::ByteArray(fixed_elements(synthesis, RawClass::Byte, |v| match v {
            Value::Byte(b) => Ok(b),
            other => Err(other),
        })?),
        RawClass::CharArray => Value::CharArray(fixed_elements(synthesis, RawClass::Char, |v| match v {
            Value::Char(c) => Ok(c),
            other => Err(other),
        })?),
        RawClass::ShortArray => Value::ShortArray(fixed_elements(synthesis, RawClass::Short, |v| match v {
            Value::Short(s) => Ok(s),
            other => Err(other),
        })?),
        RawClass::IntArray => Value::IntArray(fixed_elements(synthesis, RawClass::Int, |v| match v {
            Value::Int(i) => Ok(i),
            other => Err(other),
        })?),
        RawClass::LongArray => Value::LongArray(fixed_elements(synthesis, RawClass::Long, |v| match v {
            Value::Long(l) => Ok(l),
            other => Err(other),
        })?),
        RawClass::FloatArray => Value::FloatArray(fixed_elements(synthesis, RawClass::Float, |v| match v {
            Value::Float(f) => Ok(f),
            other => Err(other),
        })?),
        RawClass::DoubleArray => Value::DoubleArray(fixed_elements(synthesis, RawClass::Double, |v| match v {
            Value::Double(d) => Ok(d),
            other => Err(other),
        })?),

        RawClass::Array => {
            let element = resolver::builtin_argument(raw, 0, binding)?;
            let items = repeat(synthesis, config.array_length(), &element, binding, param_name)?;
            Value::Array { element, items }
        }
        RawClass::List | RawClass::Collection => {
            let element = resolver::builtin_argument(raw, 0, binding)?;
            Value::List(repeat(synthesis, config.collection_size(), &element, binding, param_name)?)
        }
        RawClass::Set => {
            // duplicates collapse, the set may come out smaller
            let element = resolver::builtin_argument(raw, 0, binding)?;
            let items = repeat(synthesis, config.collection_size(), &element, binding, param_name)?;
            Value::Set(items.into_iter().collect())
        }
        RawClass::Map => {
            // colliding keys collapse, the map may come out smaller
            let key = resolver::builtin_argument(raw, 0, binding)?;
            let value = resolver::builtin_argument(raw, 1, binding)?;
            let keys = repeat(synthesis, config.collection_size(), &key, binding, param_name)?;
            let values = repeat(synthesis, config.collection_size(), &value, binding, param_name)?;
            Value::Map(keys.into_iter().zip(values).collect())
        }

        RawClass::Instant => {
            let bounds = (
                DateTime::<Utc>::MIN_UTC.timestamp_millis(),
                DateTime::<Utc>::MAX_UTC.timestamp_millis(),
            );
            let millis = random.epoch_millis(bounds);
            let instant = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                FixtureError::construction(format!("{} ms is outside the representable range", millis))
            })?;
            Value::Instant(instant)
        }
        RawClass::LocalDate => {
            let days = days_back(synthesis);
            Value::LocalDate(in_past(Local::now().date_naive().checked_sub_days(days))?)
        }
        RawClass::LocalDateTime => {
            let days = days_back(synthesis);
            Value::LocalDateTime(in_past(Local::now().naive_local().checked_sub_days(days))?)
        }
        RawClass::ZonedDateTime => {
            let days = days_back(synthesis);
            Value::ZonedDateTime(in_past(Local::now().fixed_offset().checked_sub_days(days))?)
        }
        RawClass::ZoneOffset => Value::ZoneOffset(*Local::now().offset()),

        RawClass::Named(_) => return Ok(None),
    };

    Ok(Some(value))
}

/// `string_length - len(param_name)` printable characters, prefixed with
/// `"<param_name>_"` when a name is given.
fn random_string(synthesis: &mut Synthesis<'_>, param_name: Option<&str>) -> Draw<String> {
    let target = synthesis.config().string_length();
    let name_len = param_name.map_or(0, |name| name.chars().count());
    if target <= name_len {
        return Err(FixtureError::InvalidConfiguration(format!(
            "string length {} too small for random string generation with parameter name of length {}",
            target, name_len
        )));
    }

    let random = synthesis.random().printable_string(target - name_len);
    Ok(match param_name {
        Some(name) => format!("{}_{}", name, random),
        None => random,
    })
}

fn fixed_elements<T>(
    synthesis: &mut Synthesis<'_>,
    element: RawClass,
    unwrap: fn(Value) -> Result<T, Value>,
) -> Draw<Vec<T>> {
    let ty = TypeDescriptor::of(element);
    (0..synthesis.config().array_length())
        .map(|_| {
            let value = synthesis.synthesize(&ty, None, None)?;
            unwrap(value).map_err(|other| FixtureError::mismatch(&ty, other.kind()))
        })
        .collect()
}

fn repeat(
    synthesis: &mut Synthesis<'_>,
    count: usize,
    element: &TypeDescriptor,
    binding: &TypeBinding,
    param_name: Option<&str>,
) -> Draw<Vec<Value>> {
    (0..count)
        .map(|_| synthesis.synthesize(element, Some(binding), param_name))
        .collect()
}

fn days_back(synthesis: &mut Synthesis<'_>) -> Days {
    // day_offset is never negative
    Days::new(synthesis.random().day_offset() as u64)
}

fn in_past<T>(stepped: Option<T>) -> Draw<T> {
    stepped.ok_or_else(|| FixtureError::construction("date stepped out of the representable range"))
}
