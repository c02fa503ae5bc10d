use super::ast::{Expr, MatchExpr, MatchOperator};
use crate::{
    scalar::CoerceError,
    schema::{FieldConfiguration, FieldConfigurations},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

///
/// Limits
///
/// Validation-time resource bounds. Zero means unlimited.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of match leaves in one expression.
    pub max_matches: usize,
    /// Maximum byte length of any raw right-hand literal.
    pub max_raw_value_length: usize,
}

///
/// ValidateError
///
/// The expression does not apply to the schema; the AST is unusable.
///

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("selector '{selector}' is not a valid field")]
    InvalidSelector { selector: String },

    #[error("operator '{op}' is not supported for selector '{selector}'")]
    InvalidOperator {
        selector: String,
        op: MatchOperator,
    },

    #[error("could not coerce value '{raw}' for selector '{selector}'")]
    CouldNotCoerce {
        selector: String,
        raw: String,
        #[source]
        source: CoerceError,
    },

    #[error("operator '{op}' requires a value for selector '{selector}'")]
    MissingValue {
        selector: String,
        op: MatchOperator,
    },

    #[error("operator '{op}' takes no value for selector '{selector}'")]
    UnexpectedValue {
        selector: String,
        op: MatchOperator,
    },

    #[error("expression exceeds the limit of {limit} match expressions")]
    TooManyMatches { limit: usize },

    #[error("value of length {length} for selector '{selector}' exceeds the limit of {limit}")]
    RawValueTooLong {
        selector: String,
        limit: usize,
        length: usize,
    },
}

/// Validate an expression against a configuration tree and prepare it
/// for evaluation.
///
/// Walks every match leaf: the selector must resolve through
/// `sub_fields` (the wildcard satisfies any step of a map shape), the
/// terminal configuration must support the operator, and raw literals
/// are coerced exactly once into [`MatchValue::converted`]. Resource
/// bounds are enforced during the same walk.
///
/// Validation is idempotent; a validated expression is immutable input
/// to evaluation and may be shared across threads.
pub fn validate(
    fields: &FieldConfigurations,
    expr: &mut Expr,
    limits: &Limits,
) -> Result<(), ValidateError> {
    let mut matches = 0_usize;
    validate_node(fields, expr, limits, &mut matches)
}

fn validate_node(
    fields: &FieldConfigurations,
    expr: &mut Expr,
    limits: &Limits,
    matches: &mut usize,
) -> Result<(), ValidateError> {
    match expr {
        Expr::Not(inner) => validate_node(fields, inner, limits, matches),
        Expr::And(left, right) | Expr::Or(left, right) => {
            validate_node(fields, left, limits, matches)?;
            validate_node(fields, right, limits, matches)
        }
        Expr::Match(matching) => validate_match(fields, matching, limits, matches),
    }
}

fn validate_match(
    fields: &FieldConfigurations,
    matching: &mut MatchExpr,
    limits: &Limits,
    matches: &mut usize,
) -> Result<(), ValidateError> {
    *matches += 1;
    if limits.max_matches != 0 && *matches > limits.max_matches {
        return Err(ValidateError::TooManyMatches {
            limit: limits.max_matches,
        });
    }

    let config = walk_selector(fields, matching)?;

    if !config.supports(matching.op) {
        return Err(ValidateError::InvalidOperator {
            selector: matching.selector_path(),
            op: matching.op,
        });
    }

    if matching.op.uses_value() {
        let coerce = config.coerce;
        let op = matching.op;
        let selector = matching.selector_path();
        let Some(value) = matching.value.as_mut() else {
            return Err(ValidateError::MissingValue { selector, op });
        };

        if limits.max_raw_value_length != 0 && value.raw.len() > limits.max_raw_value_length {
            return Err(ValidateError::RawValueTooLong {
                selector,
                limit: limits.max_raw_value_length,
                length: value.raw.len(),
            });
        }

        if let Some(scalar) = coerce {
            let converted =
                scalar
                    .coerce(&value.raw)
                    .map_err(|source| ValidateError::CouldNotCoerce {
                        selector,
                        raw: value.raw.clone(),
                        source,
                    })?;
            value.converted = Some(converted);
        }
    } else if matching.value.is_some() {
        return Err(ValidateError::UnexpectedValue {
            selector: matching.selector_path(),
            op: matching.op,
        });
    }

    Ok(())
}

// Resolve a selector to its terminal configuration; empty selectors and
// failed lookups are invalid.
fn walk_selector<'a>(
    fields: &'a FieldConfigurations,
    matching: &MatchExpr,
) -> Result<&'a FieldConfiguration, ValidateError> {
    let mut current = fields;
    let mut terminal = None;

    for name in &matching.selector {
        let config = current
            .step(name)
            .ok_or_else(|| ValidateError::InvalidSelector {
                selector: matching.selector_path(),
            })?;
        current = &config.sub_fields;
        terminal = Some(config);
    }

    terminal.ok_or_else(|| ValidateError::InvalidSelector {
        selector: matching.selector_path(),
    })
}
