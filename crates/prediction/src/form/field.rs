#![forbid(unsafe_code)]

use std::fmt;

/// The eight inputs of the prediction form, in display order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    County,
    City,
    ModelYear,
    Make,
    Model,
    EvType,
    CafvEligibility,
    ElectricUtility,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::County,
        Field::City,
        Field::ModelYear,
        Field::Make,
        Field::Model,
        Field::EvType,
        Field::CafvEligibility,
        Field::ElectricUtility,
    ];

    /// Key used on the wire and in error maps.
    pub fn key(self) -> &'static str {
        match self {
            Field::County => "county",
            Field::City => "city",
            Field::ModelYear => "modelYear",
            Field::Make => "make",
            Field::Model => "model",
            Field::EvType => "evType",
            Field::CafvEligibility => "cafvEligibility",
            Field::ElectricUtility => "electricUtility",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::County => "County",
            Field::City => "City",
            Field::ModelYear => "Model year",
            Field::Make => "Make",
            Field::Model => "Model",
            Field::EvType => "EV type",
            Field::CafvEligibility => "CAFV eligibility",
            Field::ElectricUtility => "Electric utility",
        }
    }

    pub fn required_message(self) -> String {
        format!("{} is required", self.label())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
