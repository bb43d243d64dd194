//! Lenient field accessors over `serde_json::Value`.

use serde_json::{Map, Value};

pub(super) type Object = Map<String, Value>;

/// String field; numbers and booleans are rendered as text, anything else is `""`.
pub(super) fn opt_str(obj: &Object, key: &str) -> String {
    obj.get(key).map(value_as_string).unwrap_or_default()
}

pub(super) fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Boolean field; accepts `"true"`/`"false"` strings, otherwise `false`.
pub(super) fn opt_bool(obj: &Object, key: &str) -> bool {
    bool_value(obj.get(key)).unwrap_or(false)
}

/// Integer field with a default; floats are truncated, numeric strings parsed.
pub(super) fn opt_i64(obj: &Object, key: &str, default: i64) -> i64 {
    int_value(obj.get(key)).unwrap_or(default)
}

/// Integer field that stays `None` when absent, null or not numeric.
pub(super) fn maybe_i64(obj: &Object, key: &str) -> Option<i64> {
    int_value(obj.get(key))
}

/// Boolean field that stays `None` when absent, null or not boolean.
pub(super) fn maybe_bool(obj: &Object, key: &str) -> Option<bool> {
    bool_value(obj.get(key))
}

pub(super) fn opt_object<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(key).and_then(Value::as_object)
}

pub(super) fn opt_array<'a>(obj: &'a Object, key: &str) -> Option<&'a Vec<Value>> {
    obj.get(key).and_then(Value::as_array)
}

fn bool_value(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn int_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}
