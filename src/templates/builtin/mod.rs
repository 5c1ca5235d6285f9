//! Built-in templates.

pub mod democracy;
pub mod multisig;

use serde_json::Value;

/// Read an integer from a number or a numeric string, as typed into a form.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
