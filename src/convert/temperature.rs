//! Temperature conversion

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::format::ensure_finite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemperatureUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" | "k" => Ok(TemperatureUnit::Kelvin),
            _ => Err(CalcError::parse(format!("Unknown temperature unit: '{}'", s))),
        }
    }
}

/// Convert a temperature between two scales
pub fn convert_temperature(
    from: TemperatureUnit,
    to: TemperatureUnit,
    amount: f64,
) -> CalcResult<f64> {
    use TemperatureUnit::*;

    let result = match (from, to) {
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => amount,
        (Celsius, Fahrenheit) => amount * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => amount + 273.15,
        (Fahrenheit, Celsius) => (amount - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => (amount - 32.0) * 5.0 / 9.0 + 273.15,
        (Kelvin, Celsius) => amount - 273.15,
        (Kelvin, Fahrenheit) => (amount - 273.15) * 9.0 / 5.0 + 32.0,
    };
    ensure_finite(result, "Converted temperature")
}
