//! Physical quantities handled by the unit table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical quantity a unit measures.
///
/// Only units of the same quantity can be converted into one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Frequency,
    Capacitance,
    Resistance,
    Power,
    Transconductance,
    Voltage,
}

impl Quantity {
    /// Symbol of the SI base unit for this quantity.
    pub fn base_symbol(&self) -> &'static str {
        match self {
            Quantity::Frequency => "Hz",
            Quantity::Capacitance => "F",
            Quantity::Resistance => "Ohm",
            Quantity::Power => "W",
            Quantity::Transconductance => "A/V",
            Quantity::Voltage => "V",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Frequency => "frequency",
            Quantity::Capacitance => "capacitance",
            Quantity::Resistance => "resistance",
            Quantity::Power => "power",
            Quantity::Transconductance => "transconductance",
            Quantity::Voltage => "voltage",
        };
        write!(f, "{name}")
    }
}
