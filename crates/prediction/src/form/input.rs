#![forbid(unsafe_code)]

use super::Field;

/// Raw text of every form field, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    values: [String; 8],
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field as usize]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field as usize] = value.into();
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(|field| (field, self.get(field)))
    }
}

impl<S: Into<String>> FromIterator<(Field, S)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (Field, S)>>(iter: I) -> Self {
        let mut input = Self::default();
        for (field, value) in iter {
            input.set(field, value);
        }
        input
    }
}
