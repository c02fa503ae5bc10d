use super::ast::{Expr, MatchExpr, MatchOperator};
use crate::{
    schema::FieldConfigurations,
    value::{Value, scalar_eq},
};
use thiserror::Error;

///
/// EvalError
///
/// Structurally impossible traversal under a validated expression;
/// signals a schema/data mismatch rather than a false match.
///

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("selector '{selector}' cannot descend into a non-nested value")]
    NotNestable { selector: String },

    #[error("selector '{selector}' is not configured for this schema")]
    UnknownSelector { selector: String },

    #[error("record field '{field}' is missing for selector '{selector}'")]
    FieldNotPresent { selector: String, field: String },

    #[error("cannot test membership at selector '{selector}'")]
    InvalidContainment { selector: String },

    #[error("cannot test emptiness at selector '{selector}'")]
    InvalidEmptiness { selector: String },

    #[error("match value for selector '{selector}' was never coerced")]
    ValueNotConverted { selector: String },

    /// Failure reported by a self-describing value.
    #[error("{message}")]
    Delegated { message: String },
}

impl EvalError {
    /// Build a delegated failure from a self-describing value.
    pub fn delegated(message: impl Into<String>) -> Self {
        Self::Delegated {
            message: message.into(),
        }
    }
}

/// Evaluate a validated expression against one data value.
///
/// `And`/`Or` evaluate their left operand first and short-circuit on a
/// decided result or an error; `Not` negates only a non-error result.
/// Evaluation is pure and deterministic.
pub fn evaluate(
    expr: &Expr,
    fields: &FieldConfigurations,
    datum: &Value,
) -> Result<bool, EvalError> {
    match expr {
        Expr::Not(inner) => Ok(!evaluate(inner, fields, datum)?),
        Expr::And(left, right) => {
            if evaluate(left, fields, datum)? {
                evaluate(right, fields, datum)
            } else {
                Ok(false)
            }
        }
        Expr::Or(left, right) => {
            if evaluate(left, fields, datum)? {
                Ok(true)
            } else {
                evaluate(right, fields, datum)
            }
        }
        Expr::Match(matching) => evaluate_match(matching, fields, datum),
    }
}

/// Evaluate one match leaf against one data value.
pub fn evaluate_match(
    matching: &MatchExpr,
    fields: &FieldConfigurations,
    datum: &Value,
) -> Result<bool, EvalError> {
    match_at(matching, 0, fields, datum)
}

// Defaulted answers when a map selector step misses: a missing key is
// indistinguishable from a value that is simultaneously
// not-equal-to-anything and empty.
const fn absent_answer(op: MatchOperator) -> bool {
    matches!(
        op,
        MatchOperator::NotEqual | MatchOperator::NotIn | MatchOperator::IsEmpty
    )
}

// Recursive traversal of one match against the value at selector depth
// `depth`. Lists are descended existentially without advancing depth.
fn match_at(
    matching: &MatchExpr,
    depth: usize,
    fields: &FieldConfigurations,
    value: &Value,
) -> Result<bool, EvalError> {
    let value = value.resolved();

    if let Value::Evaluable(data) = value {
        return data.evaluate_match(
            &matching.selector[depth..],
            matching.op,
            converted_value(matching),
        );
    }

    if depth == matching.selector.len() {
        return apply_operator(matching, value);
    }

    match value {
        Value::Record(record_fields) => {
            let name = &matching.selector[depth];
            let config = fields
                .step(name)
                .ok_or_else(|| EvalError::UnknownSelector {
                    selector: matching.selector_path(),
                })?;
            let canonical = config.canonical_name.as_deref().unwrap_or(name);
            let Some(field_value) = record_fields.get(canonical) else {
                return Err(EvalError::FieldNotPresent {
                    selector: matching.selector_path(),
                    field: canonical.to_string(),
                });
            };

            match_at(matching, depth + 1, &config.sub_fields, field_value)
        }
        Value::List(items) => {
            for item in items {
                if match_at(matching, depth, fields, item)? {
                    return Ok(true);
                }
            }

            Ok(false)
        }
        Value::Map(entries) => {
            let name = &matching.selector[depth];
            let config = fields
                .step(name)
                .ok_or_else(|| EvalError::UnknownSelector {
                    selector: matching.selector_path(),
                })?;
            let entry = entries
                .iter()
                .find(|(key, _)| key.resolved().as_text() == Some(name.as_str()));

            match entry {
                None => Ok(absent_answer(matching.op)),
                // A present nil entry collapses into the absent-key answer.
                Some((_, entry_value)) if matches!(entry_value.resolved(), Value::Null) => {
                    Ok(absent_answer(matching.op))
                }
                Some((_, entry_value)) => {
                    match_at(matching, depth + 1, &config.sub_fields, entry_value)
                }
            }
        }
        _ => Err(EvalError::NotNestable {
            selector: matching.selector_path(),
        }),
    }
}

// Apply the operator at the value the selector resolved to.
fn apply_operator(matching: &MatchExpr, value: &Value) -> Result<bool, EvalError> {
    // An absent leaf answers by the same defaulted table as a missed
    // map key.
    if matches!(value, Value::Null) {
        return Ok(absent_answer(matching.op));
    }

    match matching.op {
        MatchOperator::Equal => Ok(scalar_eq(value, required_value(matching)?).unwrap_or(false)),
        MatchOperator::NotEqual => {
            Ok(scalar_eq(value, required_value(matching)?).is_some_and(|eq| !eq))
        }
        MatchOperator::In => contains(matching, value),
        MatchOperator::NotIn => contains(matching, value).map(|found| !found),
        MatchOperator::IsEmpty => emptiness(matching, value),
        MatchOperator::IsNotEmpty => emptiness(matching, value).map(|empty| !empty),
    }
}

// In/NotIn: key membership on maps, element equality on lists,
// substring containment on text.
fn contains(matching: &MatchExpr, value: &Value) -> Result<bool, EvalError> {
    let needle = required_value(matching)?;

    match value {
        Value::Map(entries) => Ok(entries
            .iter()
            .any(|(key, _)| scalar_eq(key.resolved(), needle) == Some(true))),
        Value::List(items) => Ok(items
            .iter()
            .any(|item| scalar_eq(item.resolved(), needle) == Some(true))),
        Value::Text(text) => Ok(needle
            .as_text()
            .is_some_and(|substring| text.contains(substring))),
        _ => Err(EvalError::InvalidContainment {
            selector: matching.selector_path(),
        }),
    }
}

fn emptiness(matching: &MatchExpr, value: &Value) -> Result<bool, EvalError> {
    value.is_empty().ok_or_else(|| EvalError::InvalidEmptiness {
        selector: matching.selector_path(),
    })
}

fn required_value(matching: &MatchExpr) -> Result<&Value, EvalError> {
    converted_value(matching).ok_or_else(|| EvalError::ValueNotConverted {
        selector: matching.selector_path(),
    })
}

const fn converted_value(matching: &MatchExpr) -> Option<&Value> {
    match &matching.value {
        Some(value) => value.converted.as_ref(),
        None => None,
    }
}
