//! Lenient typed lookups into a JSON params object.
//!
//! Animations build their parameter structs from user-supplied JSON. A
//! missing key or a value of the wrong type falls back to the default, so a
//! half-written params document still produces a working animation.

use crate::color::Srgb;
use serde_json::Value;

/// `params[name]` as `f64`; integers are widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as a `[min, max]` pair of numbers.
///
/// Reversed bounds are swapped; anything other than a two-number array
/// yields the default.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    let pair = params.get(name).and_then(Value::as_array).and_then(|arr| {
        match (arr.first().and_then(Value::as_f64), arr.get(1).and_then(Value::as_f64)) {
            (Some(a), Some(b)) if arr.len() == 2 => Some((a, b)),
            _ => None,
        }
    });
    match pair {
        Some((a, b)) if a <= b => (a, b),
        Some((a, b)) => (b, a),
        None => default,
    }
}

/// `params[name]` parsed as a `#rrggbb` color.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Srgb::from_hex(s).ok())
        .unwrap_or(default)
}
