//! Ordered-fallback field lookup over loosely shaped JSON objects
//!
//! Payloads and backend replies name the same datum several ways
//! (`t` or `type`, `id` or `visitor_id`, `exito` or `success`). These helpers
//! walk a key list in priority order and return the first usable value.

use serde_json::{Map, Value};

/// Largest integer an IEEE-754 double represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whether a value counts as present.
///
/// Null, `false` and blank strings are absent. Numbers (zero included),
/// `true`, arrays and objects are present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.trim().is_empty(),
        Value::Number(_) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// First present value among `keys`, in order.
pub fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

/// First present scalar among `keys`, rendered as text.
///
/// Non-scalar values are skipped so the next key gets a chance.
pub fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter(|value| is_present(value))
        .find_map(scalar_text)
}

/// True when any of `keys` holds a present value.
pub fn first_flag(object: &Map<String, Value>, keys: &[&str]) -> bool {
    first_present(object, keys).is_some()
}

/// Render a string or number as text.
///
/// Whole floats print without a fractional part, so `42.0` and `42`
/// both become `"42"`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(int.to_string());
            }
            if let Some(uint) = number.as_u64() {
                return Some(uint.to_string());
            }
            let float = number.as_f64()?;
            if float.fract() == 0.0 && float.abs() < MAX_EXACT_INTEGER {
                Some(format!("{}", float as i64))
            } else {
                Some(float.to_string())
            }
        }
        _ => None,
    }
}
