mod runtime;

use crate::{
    expr::{Expr, MatchExpr, MatchOperator},
    model::{FieldModel, FieldType},
    scalar::Scalar,
    schema::{FieldConfigurations, field_configurations},
};

// Shared profile shape exercised across runtime and property tests:
// scalars, a scalar list, a text-keyed map, and a record list.
pub(crate) fn profile_shape() -> FieldType {
    FieldType::record([
        FieldModel::new("name", FieldType::Scalar(Scalar::Text)),
        FieldModel::new("age", FieldType::Scalar(Scalar::Int32)),
        FieldModel::new("tags", FieldType::list(FieldType::Scalar(Scalar::Text))),
        FieldModel::new(
            "meta",
            FieldType::map(
                FieldType::Scalar(Scalar::Text),
                FieldType::Scalar(Scalar::Text),
            ),
        ),
        FieldModel::new(
            "users",
            FieldType::list(FieldType::record([FieldModel::new(
                "name",
                FieldType::Scalar(Scalar::Text),
            )])),
        ),
    ])
}

pub(crate) fn profile_fields() -> FieldConfigurations {
    field_configurations(&profile_shape()).expect("profile shape should derive")
}

pub(crate) fn match_expr(selector: &[&str], op: MatchOperator, raw: Option<&str>) -> Expr {
    MatchExpr::new(selector.iter().copied(), op, raw).into()
}
