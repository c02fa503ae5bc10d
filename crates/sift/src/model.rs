use crate::{scalar::Scalar, schema::FieldConfigurations};

///
/// FieldType
///
/// Shape tree describing the data a filter runs over. This is the
/// deriver's only input: an explicit description of the target shape,
/// supplied directly or through [`Filterable`](crate::traits::Filterable).
///
/// `Optional` is pointer-like indirection and is stripped before kind
/// inspection everywhere. `Unsupported` marks shapes that cannot be
/// filtered; fields of that shape are simply not selectable.
///

#[derive(Clone, Debug)]
pub enum FieldType {
    Scalar(Scalar),
    Record(Vec<FieldModel>),
    Map {
        key: Box<FieldType>,
        value: Box<FieldType>,
    },
    List(Box<FieldType>),
    Optional(Box<FieldType>),
    /// The shape declares its own field configurations and answers
    /// matches itself (see [`Evaluable`](crate::traits::Evaluable)).
    SelfDescribing(FieldConfigurations),
    Unsupported,
}

impl FieldType {
    /// Strip pointer-like indirection before kind inspection.
    #[must_use]
    pub fn unwrapped(&self) -> &Self {
        let mut ty = self;
        while let Self::Optional(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Returns true if this shape is text after stripping indirection.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.unwrapped(), Self::Scalar(Scalar::Text))
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn list(elem: Self) -> Self {
        Self::List(Box::new(elem))
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn record<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldModel>,
    {
        Self::Record(fields.into_iter().collect())
    }
}

///
/// FieldModel
///
/// One named record field. `rename` is the schema annotation: a
/// comma-separated alias list replacing the selectable name, or the
/// literal `-` to suppress the field. Fields with `accessible = false`
/// are omitted unless an annotation exposes them explicitly.
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    pub name: String,
    pub rename: Option<String>,
    pub accessible: bool,
    pub field_type: FieldType,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            rename: None,
            accessible: true,
            field_type,
        }
    }

    /// Attach a rename annotation (aliases, or `-` to suppress).
    #[must_use]
    pub fn renamed(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    /// Mark the field as hidden by the host type's access discipline.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.accessible = false;
        self
    }

    /// The names this field is selectable under; empty when suppressed
    /// or inaccessible without an explicit annotation.
    pub(crate) fn selectable_names(&self) -> Vec<String> {
        match self.rename.as_deref() {
            Some("-") => Vec::new(),
            Some(aliases) => aliases
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string)
                .collect(),
            None if self.accessible => vec![self.name.clone()],
            None => Vec::new(),
        }
    }
}
