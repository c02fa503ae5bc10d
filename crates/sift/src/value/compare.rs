use super::Value;

/// Strict same-kind scalar equality.
///
/// Returns `None` when either side is not a scalar or the kinds differ;
/// two distinct scalar kinds are never equal.
#[must_use]
#[expect(clippy::float_cmp)] // scalar equality is the host type's equality
pub fn scalar_eq(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Int8(a), Value::Int8(b)) => Some(a == b),
        (Value::Int16(a), Value::Int16(b)) => Some(a == b),
        (Value::Int32(a), Value::Int32(b)) => Some(a == b),
        (Value::Int64(a), Value::Int64(b)) => Some(a == b),
        (Value::Int(a), Value::Int(b)) => Some(a == b),
        (Value::Uint8(a), Value::Uint8(b)) => Some(a == b),
        (Value::Uint16(a), Value::Uint16(b)) => Some(a == b),
        (Value::Uint32(a), Value::Uint32(b)) => Some(a == b),
        (Value::Uint64(a), Value::Uint64(b)) => Some(a == b),
        (Value::Uint(a), Value::Uint(b)) => Some(a == b),
        (Value::Float32(a), Value::Float32(b)) => Some(a == b),
        (Value::Float64(a), Value::Float64(b)) => Some(a == b),
        (Value::Text(a), Value::Text(b)) => Some(a == b),
        _ => None,
    }
}
