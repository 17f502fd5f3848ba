//! Temperature units requested for simulated profile temperatures.

use crate::errors::RunError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Units the modeling library reports profile temperatures in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnits {
    /// Degrees Fahrenheit
    #[default]
    #[serde(rename = "degF")]
    DegF,
    /// Degrees Celsius
    #[serde(rename = "degC")]
    DegC,
}

impl TemperatureUnits {
    /// The option string understood by the modeling library.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnits::DegF => "degF",
            TemperatureUnits::DegC => "degC",
        }
    }
}

impl fmt::Display for TemperatureUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnits {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degF" => Ok(TemperatureUnits::DegF),
            "degC" => Ok(TemperatureUnits::DegC),
            other => Err(RunError::UnknownUnits(other.to_string())),
        }
    }
}
