#![forbid(unsafe_code)]

mod field;
mod input;
mod validate;

pub use field::Field;
pub use input::FormInput;
pub use validate::{FieldErrors, validate};
