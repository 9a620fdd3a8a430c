#![forbid(unsafe_code)]

use super::{Field, FormInput};
use std::collections::BTreeMap;

/// Field → message for every field that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn clear(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Check every field for presence.
///
/// A field is missing only when it is exactly empty; whitespace counts as a
/// value.
pub fn validate(input: &FormInput) -> FieldErrors {
    FieldErrors(
        input
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| (field, field.required_message()))
            .collect(),
    )
}
