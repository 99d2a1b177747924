use std::fmt::{Display, Formatter};

use crate::quantity::intensity::{GramsPerKilowattHour, KilogramsPerKilowattHour};

/// Display unit of the sensors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Unit {
    /// Grams per kilowatt-hour, rounded to whole grams.
    #[default]
    #[value(name = "g_per_kwh", alias = "g")]
    GramsPerKilowattHour,

    /// Kilograms per kilowatt-hour, rounded to 4 decimals.
    #[value(name = "kg_per_kwh", alias = "kg")]
    KilogramsPerKilowattHour,
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GramsPerKilowattHour => write!(f, "{}", GramsPerKilowattHour::UNIT),
            Self::KilogramsPerKilowattHour => write!(f, "{}", KilogramsPerKilowattHour::UNIT),
        }
    }
}

impl Unit {
    /// Convert the source value into the display unit.
    #[must_use]
    pub fn convert(self, value: KilogramsPerKilowattHour) -> f64 {
        match self {
            Self::GramsPerKilowattHour => GramsPerKilowattHour::from(value).0.round_ties_even(),
            Self::KilogramsPerKilowattHour => round_to(value.0, 4),
        }
    }
}

/// Round half to even, so that `12.5` becomes `12`.
#[must_use]
pub fn round_to(value: f64, n_decimals: i32) -> f64 {
    let factor = 10_f64.powi(n_decimals);
    (value * factor).round_ties_even() / factor
}
