use crate::{shape::ScalarKind, value::Value};

// Bounds of the f64 range that truncates into an i64 without overflow.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

///
/// convert
///
/// Single-value conversion into a scalar kind.
/// The error is the human-readable reason; the caller attaches value and target.
///
pub(super) fn convert(value: &Value, kind: ScalarKind) -> Result<Value, String> {
    match kind {
        ScalarKind::Bool => to_bool(value).map(Value::Bool),
        ScalarKind::Int => to_int(value).map(Value::Int),
        ScalarKind::Float => to_float(value).map(Value::Float),
        ScalarKind::Text => to_text(value).map(Value::Text),
        ScalarKind::Bytes => to_bytes(value).map(Value::Bytes),
        ScalarKind::ByteBuffer => to_bytes(value).map(Value::ByteBuffer),
    }
}

fn to_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::None => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::Text(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => Err(format!("Cannot cast '{s}' to bool")),
        },
        Value::Bytes(b) | Value::ByteBuffer(b) => Ok(!b.is_empty()),
        Value::Seq(_, items) | Value::Tuple(items) | Value::Container(_, items) => {
            Ok(!items.is_empty())
        }
        Value::Map(_, entries) => Ok(!entries.is_empty()),
        Value::Record(_) => Ok(true),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_int(value: &Value) -> Result<i64, String> {
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Int(i) => Ok(*i),
        Value::Float(x) => {
            if !x.is_finite() {
                return Err(format!("cannot convert float {x} to integer"));
            }
            let truncated = x.trunc();
            if !(I64_LOWER..I64_UPPER).contains(&truncated) {
                return Err(format!("float {x} is out of integer range"));
            }
            Ok(truncated as i64)
        }
        Value::Text(s) => parse_int(s),
        Value::Bytes(b) | Value::ByteBuffer(b) => parse_int(&decode(b)?),
        other => Err(no_conversion(other, "int")),
    }
}

fn parse_int(s: &str) -> Result<i64, String> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid literal for int() with base 10: '{s}'"))
}

#[allow(clippy::cast_precision_loss)]
fn to_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Ok(*i as f64),
        Value::Float(x) => Ok(*x),
        Value::Text(s) => parse_float(s),
        Value::Bytes(b) | Value::ByteBuffer(b) => parse_float(&decode(b)?),
        other => Err(no_conversion(other, "float")),
    }
}

fn parse_float(s: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("could not convert string to float: '{s}'"))
}

fn to_text(value: &Value) -> Result<String, String> {
    match value {
        Value::Bytes(b) | Value::ByteBuffer(b) => decode(b),
        other => Ok(other.to_string()),
    }
}

fn to_bytes(value: &Value) -> Result<Vec<u8>, String> {
    match value {
        Value::Text(s) => Ok(s.as_bytes().to_vec()),
        Value::Bytes(b) | Value::ByteBuffer(b) => Ok(b.clone()),
        Value::Seq(_, items) | Value::Tuple(items) => items
            .iter()
            .map(|item| match item {
                Value::Int(i) => {
                    u8::try_from(*i).map_err(|_| "bytes must be in range(0, 256)".to_string())
                }
                other => Err(format!(
                    "'{}' object cannot be interpreted as an integer",
                    other.kind_name()
                )),
            })
            .collect(),
        other => Err(no_conversion(other, "bytes")),
    }
}

fn decode(bytes: &[u8]) -> Result<String, String> {
    String::from_utf8(bytes.to_vec()).map_err(|err| format!("invalid utf-8: {err}"))
}

fn no_conversion(value: &Value, target: &str) -> String {
    format!("no conversion from {} to {target}", value.kind_name())
}
