use crate::{
    expr::{EvalError, ValidateError},
    schema::SchemaError,
};
use thiserror::Error;

///
/// Error
///
/// Top-level error sum for facade callers. Each subsystem keeps its own
/// error type; this exists so one-call entry points can surface any of
/// them.
///

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
