use crate::{
    expr::{EvalError, MatchOperator},
    model::FieldType,
    scalar::Scalar,
    schema::FieldConfigurations,
    value::Value,
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
};

///
/// Evaluable
///
/// Capability by which a data value supplies its own field
/// configurations and its own match semantics, short-circuiting
/// generic traversal. Domain types use this to expose virtual fields
/// and implement operators directly.
///

pub trait Evaluable: Debug + Send + Sync {
    /// The field configurations this value answers matches for.
    fn field_configurations(&self) -> FieldConfigurations;

    /// Apply one operator at the given tail selector.
    ///
    /// `value` is the coerced right-hand side when the operator takes
    /// one. The selector is the remainder after the steps the generic
    /// engine already consumed.
    fn evaluate_match(
        &self,
        selector: &[String],
        op: MatchOperator,
        value: Option<&Value>,
    ) -> Result<bool, EvalError>;
}

///
/// Filterable
///
/// Host types publish the shape of their data for schema derivation.
/// Std containers come with blanket impls; record types implement this
/// by listing their field models.
///

pub trait Filterable {
    fn field_type() -> FieldType;
}

macro_rules! impl_filterable_scalar {
    ( $( $type:ty => $scalar:ident ),* $(,)? ) => {
        $(
            impl Filterable for $type {
                fn field_type() -> FieldType {
                    FieldType::Scalar(Scalar::$scalar)
                }
            }
        )*
    };
}

impl_filterable_scalar! {
    bool   => Bool,
    i8     => Int8,
    i16    => Int16,
    i32    => Int32,
    i64    => Int64,
    isize  => Int,
    u8     => Uint8,
    u16    => Uint16,
    u32    => Uint32,
    u64    => Uint64,
    usize  => Uint,
    f32    => Float32,
    f64    => Float64,
    String => Text,
    &str   => Text,
}

impl<T: Filterable> Filterable for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::list(T::field_type())
    }
}

impl<T: Filterable> Filterable for Option<T> {
    fn field_type() -> FieldType {
        FieldType::optional(T::field_type())
    }
}

impl<T: Filterable> Filterable for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }
}

impl<K: Filterable, V: Filterable> Filterable for BTreeMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::map(K::field_type(), V::field_type())
    }
}

impl<K: Filterable, V: Filterable> Filterable for HashMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::map(K::field_type(), V::field_type())
    }
}
