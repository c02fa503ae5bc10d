use crate::{
    error::Error,
    expr::{EvalError, Expr, Limits, ValidateError, evaluate, validate},
    schema::{FieldConfigurations, field_configurations_for},
    traits::Filterable,
    value::Value,
};

///
/// Evaluator
///
/// Validates an expression once against a configuration tree, then
/// evaluates it against any number of data values. Immutable after
/// construction and freely shareable across threads; evaluations of
/// distinct data values are independently parallelizable.
///

#[derive(Clone, Debug)]
pub struct Evaluator {
    fields: FieldConfigurations,
    expr: Expr,
}

impl Evaluator {
    /// Validate `expr` against `fields` with unlimited bounds.
    pub fn new(fields: FieldConfigurations, expr: Expr) -> Result<Self, ValidateError> {
        Self::with_limits(fields, expr, &Limits::default())
    }

    /// Validate `expr` against `fields`, enforcing the provided limits.
    pub fn with_limits(
        fields: FieldConfigurations,
        mut expr: Expr,
        limits: &Limits,
    ) -> Result<Self, ValidateError> {
        validate(&fields, &mut expr, limits)?;

        Ok(Self { fields, expr })
    }

    /// Derive the configuration tree from a [`Filterable`] type, then
    /// validate.
    pub fn for_type<T: Filterable>(expr: Expr) -> Result<Self, Error> {
        let fields = field_configurations_for::<T>()?;

        Ok(Self::new(fields, expr)?)
    }

    /// Evaluate the prepared expression against one data value.
    pub fn evaluate(&self, datum: &Value) -> Result<bool, EvalError> {
        evaluate(&self.expr, &self.fields, datum)
    }

    /// The configuration tree this evaluator validates against.
    #[must_use]
    pub const fn fields(&self) -> &FieldConfigurations {
        &self.fields
    }

    /// The prepared expression.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }
}
