use derive_more::{Deref, IntoIterator};

///
/// FilterValue
/// A single match value, or any-of over several values (expanded to a
/// union of that field's index sets before intersecting).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilterValue {
    One(String),
    Any(Vec<String>),
}

///
/// Filter
/// Ordered field = value equality filters. Every referenced field must be
/// a declared index of the model; validation happens at expression-build
/// time, before any store round trip.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct Filter(Vec<(String, FilterValue)>);

impl Filter {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((field.into(), FilterValue::One(value.into())));
        self
    }

    #[must_use]
    pub fn any<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();

        self.0.push((field.into(), FilterValue::Any(values)));
        self
    }
}

impl From<(&str, &str)> for Filter {
    fn from((field, value): (&str, &str)) -> Self {
        Self::new().eq(field, value)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Filter {
    fn from(entries: [(&str, &str); N]) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |filter, (field, value)| filter.eq(field, value))
    }
}
