mod derive;


use crate::{expr::MatchOperator, scalar::Scalar};
use derive_more::{Deref, DerefMut, IntoIterator};
use std::collections::BTreeMap;
use thiserror::Error;

pub use derive::{field_configurations, field_configurations_for};

/// Wildcard field name satisfying any key of a text-keyed map shape.
pub const FIELD_NAME_ANY: &str = "*";

///
/// FieldConfiguration
///
/// Schema node for one selector step: the operators it admits, the
/// coercion kind applied to its right-hand side, its children, and the
/// canonical record name used for lookup (`None`: the selector name is
/// canonical).
///

#[derive(Clone, Debug, Default)]
pub struct FieldConfiguration {
    pub canonical_name: Option<String>,
    pub sub_fields: FieldConfigurations,
    pub coerce: Option<Scalar>,
    pub operators: Vec<MatchOperator>,
}

impl FieldConfiguration {
    /// Build a terminal configuration with a coercion kind.
    #[must_use]
    pub fn leaf(coerce: Scalar, operators: Vec<MatchOperator>) -> Self {
        Self {
            coerce: Some(coerce),
            operators,
            ..Self::default()
        }
    }

    /// Whether this node admits the operator.
    #[must_use]
    pub fn supports(&self, op: MatchOperator) -> bool {
        self.operators.contains(&op)
    }
}

///
/// FieldConfigurations
///
/// Selectable name → configuration; the sub-field map of an implicit
/// root. May contain the wildcard name `*` for map value shapes.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, IntoIterator)]
pub struct FieldConfigurations(BTreeMap<String, FieldConfiguration>);

impl FieldConfigurations {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Chainable insert, for declaring configurations inline.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, config: FieldConfiguration) -> Self {
        self.0.insert(name.into(), config);
        self
    }

    /// Resolve one selector step, falling back to the wildcard entry.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&FieldConfiguration> {
        self.0.get(name).or_else(|| self.0.get(FIELD_NAME_ANY))
    }
}

impl FromIterator<(String, FieldConfiguration)> for FieldConfigurations {
    fn from_iter<I: IntoIterator<Item = (String, FieldConfiguration)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

///
/// SchemaError
///
/// Malformed or unsupported top-level shape; fatal for derivation.
///

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("top-level shape must be a record, a text-keyed map, or self-describing")]
    InvalidTopLevel,
}
