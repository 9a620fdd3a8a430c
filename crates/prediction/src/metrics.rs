#![forbid(unsafe_code)]

use serde::Serialize;
use std::fmt;

/// Display metrics derived from a predicted electric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionMetrics {
    /// Predicted range, km.
    pub range: f64,
    /// km per kWh.
    pub efficiency: f64,
    /// Minutes.
    pub charging_time: i64,
    /// kWh per 100 km. Infinite for a zero range.
    pub consumption: f64,
}

impl PredictionMetrics {
    pub fn from_range(range: f64) -> Self {
        Self {
            range,
            efficiency: round_half_up(range / 100.0 * 100.0) / 100.0,
            charging_time: round_half_up(range / 50.0 * 60.0) as i64,
            consumption: round_half_up(100.0 / range * 10.0) / 10.0,
        }
    }
}

/// Round to the nearest integer, ties towards positive infinity.
pub(crate) fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    // x - floor is exact for finite x, so 0.49999999999999994 stays below the tie
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

impl fmt::Display for PredictionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Range:         {} km", self.range)?;
        writeln!(f, "Efficiency:    {} km/kWh", self.efficiency)?;
        writeln!(f, "Charging time: {} min", self.charging_time)?;
        if self.consumption.is_infinite() {
            write!(f, "Consumption:   ∞ kWh/100km")
        } else {
            write!(f, "Consumption:   {} kWh/100km", self.consumption)
        }
    }
}
