//! Derivation of field configuration trees from shape models.
//!
//! Applied structurally: every shape derives to at most one
//! configuration, and record fields bind their children under each
//! selectable name. Shapes that derive to nothing are not selectable.

use super::{FIELD_NAME_ANY, FieldConfiguration, FieldConfigurations, SchemaError};
use crate::{
    expr::MatchOperator,
    model::{FieldModel, FieldType},
    scalar::Scalar,
    traits::Filterable,
};

/// Derive the root configuration map for a top-level shape.
///
/// The top level must be a record, a text-keyed map, or a
/// self-describing shape; anything else is a [`SchemaError`].
pub fn field_configurations(shape: &FieldType) -> Result<FieldConfigurations, SchemaError> {
    match shape.unwrapped() {
        FieldType::SelfDescribing(fields) => Ok(fields.clone()),
        FieldType::Record(fields) => Ok(record_configurations(fields)),
        FieldType::Map { key, value } if key.is_text() => {
            let mut root = FieldConfigurations::new();
            if let Some(sub) = configuration_for(value) {
                root.insert(FIELD_NAME_ANY.to_string(), sub);
            }
            Ok(root)
        }
        _ => Err(SchemaError::InvalidTopLevel),
    }
}

/// Derive the root configuration map from a [`Filterable`] host type.
pub fn field_configurations_for<T: Filterable>() -> Result<FieldConfigurations, SchemaError> {
    field_configurations(&T::field_type())
}

// One shape → one configuration; None marks a non-filterable shape.
fn configuration_for(shape: &FieldType) -> Option<FieldConfiguration> {
    match shape.unwrapped() {
        FieldType::Optional(inner) => configuration_for(inner),
        FieldType::SelfDescribing(fields) => Some(FieldConfiguration {
            sub_fields: fields.clone(),
            ..FieldConfiguration::default()
        }),
        FieldType::Scalar(scalar) => Some(scalar_configuration(*scalar)),
        FieldType::Map { key, value } => Some(map_configuration(key, value)),
        FieldType::List(elem) => Some(list_configuration(elem)),
        FieldType::Record(fields) => Some(FieldConfiguration {
            sub_fields: record_configurations(fields),
            ..FieldConfiguration::default()
        }),
        FieldType::Unsupported => None,
    }
}

fn scalar_configuration(scalar: Scalar) -> FieldConfiguration {
    // Text additionally admits substring membership and emptiness.
    let operators = if scalar.is_text() {
        vec![
            MatchOperator::Equal,
            MatchOperator::NotEqual,
            MatchOperator::In,
            MatchOperator::NotIn,
            MatchOperator::IsEmpty,
            MatchOperator::IsNotEmpty,
        ]
    } else {
        vec![MatchOperator::Equal, MatchOperator::NotEqual]
    };

    FieldConfiguration::leaf(scalar, operators)
}

fn map_configuration(key: &FieldType, value: &FieldType) -> FieldConfiguration {
    if !key.is_text() {
        // Non-text keys are not addressable; only emptiness applies.
        return FieldConfiguration {
            operators: vec![MatchOperator::IsEmpty, MatchOperator::IsNotEmpty],
            ..FieldConfiguration::default()
        };
    }

    let mut config = FieldConfiguration::leaf(
        Scalar::Text,
        vec![
            MatchOperator::In,
            MatchOperator::NotIn,
            MatchOperator::IsEmpty,
            MatchOperator::IsNotEmpty,
        ],
    );
    if let Some(sub) = configuration_for(value) {
        config.sub_fields.insert(FIELD_NAME_ANY.to_string(), sub);
    }

    config
}

fn list_configuration(elem: &FieldType) -> FieldConfiguration {
    match elem.unwrapped() {
        FieldType::Scalar(scalar) => FieldConfiguration::leaf(
            *scalar,
            vec![
                MatchOperator::In,
                MatchOperator::NotIn,
                MatchOperator::IsEmpty,
                MatchOperator::IsNotEmpty,
            ],
        ),
        compound => {
            // Selectors descend through the list existentially; the
            // element's children become the list's children.
            let sub_fields = configuration_for(compound)
                .map(|config| config.sub_fields)
                .unwrap_or_default();

            FieldConfiguration {
                sub_fields,
                operators: vec![MatchOperator::IsEmpty, MatchOperator::IsNotEmpty],
                ..FieldConfiguration::default()
            }
        }
    }
}

fn record_configurations(fields: &[FieldModel]) -> FieldConfigurations {
    let mut configs = FieldConfigurations::new();
    for field in fields {
        let names = field.selectable_names();
        if names.is_empty() {
            continue;
        }
        let Some(config) = configuration_for(&field.field_type) else {
            continue;
        };

        let config = FieldConfiguration {
            canonical_name: Some(field.name.clone()),
            ..config
        };
        for name in names {
            configs.insert(name, config.clone());
        }
    }

    configs
}
