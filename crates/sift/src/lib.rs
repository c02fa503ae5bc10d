//! Core runtime for sift: scalar kinds, runtime values, shape models, schema
//! derivation, and the boolean filter pipeline (validate once, evaluate many).
//!
//! The surface grammar lives in a front-end crate; this crate consumes the
//! expression tree it produces ([`expr::Expr`]) and everything downstream of
//! it: deriving [`schema::FieldConfigurations`] from a shape description,
//! validating and preparing an expression against them, and evaluating the
//! prepared expression against [`value::Value`] data.

pub mod error;
pub mod evaluator;
pub mod expr;
pub mod model;
pub mod scalar;
pub mod schema;
pub mod traits;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{
        error::Error,
        evaluator::Evaluator,
        expr::{Expr, Limits, MatchExpr, MatchOperator, MatchValue},
        model::{FieldModel, FieldType},
        scalar::Scalar,
        schema::{FieldConfiguration, FieldConfigurations},
        traits::{Evaluable, Filterable},
        value::Value,
    };
}
