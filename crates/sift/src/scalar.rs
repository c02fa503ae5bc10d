use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;
use thiserror::Error;

///
/// Scalar
///
/// Closed set of primitive kinds the filter engine understands.
/// Coercion and equality dispatch are exhaustive per-variant matches,
/// never lookup tables; adding a kind is a compile-time obligation.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Scalar {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint,
    Float32,
    Float64,
    Text,
}

impl Scalar {
    /// Coerce a raw textual literal into a typed value of this kind.
    ///
    /// Text coercion is the identity. Numeric coercions are base-10 and
    /// range-checked by width. Bool accepts the classic token table
    /// (`1, t, T, TRUE, true, True` / `0, f, F, FALSE, false, False`).
    pub fn coerce(self, raw: &str) -> Result<Value, CoerceError> {
        match self {
            Self::Bool => coerce_bool(raw),
            Self::Int8 => coerce_int(self, raw, Value::Int8),
            Self::Int16 => coerce_int(self, raw, Value::Int16),
            Self::Int32 => coerce_int(self, raw, Value::Int32),
            Self::Int64 => coerce_int(self, raw, Value::Int64),
            Self::Int => coerce_int(self, raw, Value::Int),
            Self::Uint8 => coerce_int(self, raw, Value::Uint8),
            Self::Uint16 => coerce_int(self, raw, Value::Uint16),
            Self::Uint32 => coerce_int(self, raw, Value::Uint32),
            Self::Uint64 => coerce_int(self, raw, Value::Uint64),
            Self::Uint => coerce_int(self, raw, Value::Uint),
            Self::Float32 => coerce_float(self, raw, Value::Float32),
            Self::Float64 => coerce_float(self, raw, Value::Float64),
            Self::Text => Ok(Value::Text(raw.to_string())),
        }
    }

    /// Returns true if values of this kind carry text.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

fn coerce_bool(raw: &str) -> Result<Value, CoerceError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Value::Bool(true)),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Value::Bool(false)),
        _ => Err(CoerceError::Bool {
            raw: raw.to_string(),
        }),
    }
}

fn coerce_int<T>(kind: Scalar, raw: &str, make: fn(T) -> Value) -> Result<Value, CoerceError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.parse()
        .map(make)
        .map_err(|source| CoerceError::Int {
            kind,
            raw: raw.to_string(),
            source,
        })
}

fn coerce_float<T>(kind: Scalar, raw: &str, make: fn(T) -> Value) -> Result<Value, CoerceError>
where
    T: FromStr<Err = ParseFloatError>,
{
    raw.parse()
        .map(make)
        .map_err(|source| CoerceError::Float {
            kind,
            raw: raw.to_string(),
            source,
        })
}

///
/// CoerceError
///
/// A raw literal could not be turned into a typed value. Surfaces to
/// callers only as the source of a validation failure.
///

#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("'{raw}' is not a boolean token")]
    Bool { raw: String },

    #[error("'{raw}' is not a valid {kind:?} literal")]
    Int {
        kind: Scalar,
        raw: String,
        #[source]
        source: ParseIntError,
    },

    #[error("'{raw}' is not a valid {kind:?} literal")]
    Float {
        kind: Scalar,
        raw: String,
        #[source]
        source: ParseFloatError,
    },
}
