pub mod ast;
pub mod eval;
pub mod validate;

#[cfg(test)]
mod tests;

pub use ast::{Expr, MatchExpr, MatchOperator, MatchValue};
pub use eval::{EvalError, evaluate, evaluate_match};
pub use validate::{Limits, ValidateError, validate};
