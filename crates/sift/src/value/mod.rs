mod compare;


use crate::{scalar::Scalar, traits::Evaluable};
use std::{collections::BTreeMap, sync::Arc};

pub use compare::scalar_eq;

///
/// Value
///
/// Closed runtime representation of filterable data.
///
/// `Indirect` models pointer-like indirection and is normalized via
/// [`resolved`](Self::resolved) before any dispatch. `Null` is explicit
/// absence (an empty optional, a nil map entry). `Evaluable` carries a
/// self-describing value that answers matches itself.
///

#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Text(String),
    /// Ordered collection of homogeneous elements.
    List(Vec<Self>),
    /// Keyed collection as key/value entry pairs. Keys may be any scalar
    /// kind; only text-keyed maps are selectable by name.
    Map(Vec<(Self, Self)>),
    /// Named fields of a record value.
    Record(BTreeMap<String, Self>),
    /// Pointer-like indirection to another value.
    Indirect(Box<Self>),
    Null,
    /// Self-describing value; traversal delegates to it.
    Evaluable(Arc<dyn Evaluable>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::Record` from name/value entries.
    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Record(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Build a `Value::Map` from key/value entries.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Self>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Wrap a value behind one level of indirection.
    pub fn indirect(value: impl Into<Self>) -> Self {
        Self::Indirect(Box::new(value.into()))
    }

    /// Wrap a self-describing value.
    pub fn evaluable(value: impl Evaluable + 'static) -> Self {
        Self::Evaluable(Arc::new(value))
    }

    ///
    /// TYPES
    ///

    /// Follow indirection chains to the underlying value.
    #[must_use]
    pub fn resolved(&self) -> &Self {
        let mut value = self;
        while let Self::Indirect(inner) = value {
            value = inner;
        }
        value
    }

    /// The scalar kind of this value, if it is a scalar.
    #[must_use]
    pub const fn scalar(&self) -> Option<Scalar> {
        match self {
            Self::Bool(_) => Some(Scalar::Bool),
            Self::Int8(_) => Some(Scalar::Int8),
            Self::Int16(_) => Some(Scalar::Int16),
            Self::Int32(_) => Some(Scalar::Int32),
            Self::Int64(_) => Some(Scalar::Int64),
            Self::Int(_) => Some(Scalar::Int),
            Self::Uint8(_) => Some(Scalar::Uint8),
            Self::Uint16(_) => Some(Scalar::Uint16),
            Self::Uint32(_) => Some(Scalar::Uint32),
            Self::Uint64(_) => Some(Scalar::Uint64),
            Self::Uint(_) => Some(Scalar::Uint),
            Self::Float32(_) => Some(Scalar::Float32),
            Self::Float64(_) => Some(Scalar::Float64),
            Self::Text(_) => Some(Scalar::Text),
            _ => None,
        }
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(items) = self {
            Some(items.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&[(Self, Self)]> {
        if let Self::Map(entries) = self {
            Some(entries.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&BTreeMap<String, Self>> {
        if let Self::Record(fields) = self {
            Some(fields)
        } else {
            None
        }
    }

    ///
    /// EMPTY
    ///

    /// Emptiness for the kinds that define it (map, list, text; `Null`
    /// counts as empty). `None` for every other kind.
    #[must_use]
    pub const fn is_empty(&self) -> Option<bool> {
        match self {
            Self::List(items) => Some(items.is_empty()),
            Self::Map(entries) => Some(entries.is_empty()),
            Self::Text(text) => Some(text.is_empty()),
            Self::Null => Some(true),
            _ => None,
        }
    }
}

// NOTE: equality resolves indirection first; evaluable values do not
// define equality and always compare unequal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let (left, right) = (self.resolved(), other.resolved());
        if let Some(verdict) = scalar_eq(left, right) {
            return verdict;
        }

        match (left, right) {
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

macro_rules! impl_value_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from! {
    bool   => Bool,
    i8     => Int8,
    i16    => Int16,
    i32    => Int32,
    i64    => Int64,
    u8     => Uint8,
    u16    => Uint16,
    u32    => Uint32,
    u64    => Uint64,
    f32    => Float32,
    f64    => Float64,
    &str   => Text,
    String => Text,
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Self::Indirect(Box::new(inner.into())),
            None => Self::Null,
        }
    }
}

impl<V: Into<Self>> From<BTreeMap<String, V>> for Value {
    fn from(entries: BTreeMap<String, V>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (Self::Text(key), value.into()))
                .collect(),
        )
    }
}
