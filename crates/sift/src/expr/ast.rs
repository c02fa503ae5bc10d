use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

///
/// Expression AST
///
/// Pure representation of a boolean filter expression as produced by a
/// front-end parser. This layer carries no schema knowledge; selector
/// and operator legality, literal coercion, and resource bounds are all
/// applied by validation, and execution semantics live in evaluation.
///

///
/// MatchOperator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MatchOperator {
    Equal,
    NotEqual,
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
}

impl MatchOperator {
    /// Whether this operator consumes a right-hand value.
    #[must_use]
    pub const fn uses_value(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual | Self::In | Self::NotIn)
    }
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::IsEmpty => "is empty",
            Self::IsNotEmpty => "is not empty",
        };
        write!(f, "{token}")
    }
}

///
/// MatchValue
///
/// Raw right-hand literal and, after validation, its coerced form.
/// Coercion happens exactly once; evaluation only reads `converted`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct MatchValue {
    pub raw: String,
    pub converted: Option<Value>,
}

impl MatchValue {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            converted: None,
        }
    }
}

///
/// MatchExpr
///
/// Leaf applying one operator to the value at a dotted selector.
///

#[derive(Clone, Debug, PartialEq)]
pub struct MatchExpr {
    pub selector: Vec<String>,
    pub op: MatchOperator,
    pub value: Option<MatchValue>,
}

impl MatchExpr {
    #[must_use]
    pub fn new<I, S>(selector: I, op: MatchOperator, raw: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selector: selector.into_iter().map(Into::into).collect(),
            op,
            value: raw.map(MatchValue::new),
        }
    }

    /// Dotted selector path for diagnostics.
    #[must_use]
    pub fn selector_path(&self) -> String {
        self.selector.join(".")
    }
}

///
/// Expr
///
/// `And`/`Or` evaluate their left operand first and short-circuit;
/// `Match` leaves carry the selector, operator, and optional literal.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Not(Box<Self>),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Match(MatchExpr),
}

impl From<MatchExpr> for Expr {
    fn from(matching: MatchExpr) -> Self {
        Self::Match(matching)
    }
}

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(Box::new(self), Box::new(rhs))
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(Box::new(self), Box::new(rhs))
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}
