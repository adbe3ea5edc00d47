//! The closed table of unit symbols accepted by the parameter schema.
//!
//! # Conversion Factor Convention
//!
//! All factors are the multiplier to convert FROM the registered unit TO the
//! SI base unit of its quantity. For example:
//! - `pF` has factor 1e-12 (1 pF = 1e-12 F)
//! - `mA/V` has factor 1e-3 (1 mA/V = 1e-3 A/V)
//!
//! The table is fixed; supporting a new unit means adding a row in
//! [`UnitRegistry::new`], not new conversion code.

use super::quantity::Quantity;
use crate::errors::{XtalError, XtalResult};
use std::sync::LazyLock;

/// Information about a known unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInfo {
    /// Symbol as it appears in the schema and on input forms.
    pub symbol: &'static str,
    /// The physical quantity this unit measures.
    pub quantity: Quantity,
    /// Conversion factor to the SI base unit.
    pub to_si_factor: f64,
}

impl UnitInfo {
    const fn new(symbol: &'static str, quantity: Quantity, to_si_factor: f64) -> Self {
        Self {
            symbol,
            quantity,
            to_si_factor,
        }
    }
}

static UNIT_TABLE: &[UnitInfo] = &[
    UnitInfo::new("Hz", Quantity::Frequency, 1.0),
    UnitInfo::new("kHz", Quantity::Frequency, 1e3),
    UnitInfo::new("MHz", Quantity::Frequency, 1e6),
    UnitInfo::new("F", Quantity::Capacitance, 1.0),
    UnitInfo::new("pF", Quantity::Capacitance, 1e-12),
    UnitInfo::new("nF", Quantity::Capacitance, 1e-9),
    UnitInfo::new("uF", Quantity::Capacitance, 1e-6),
    UnitInfo::new("Ohm", Quantity::Resistance, 1.0),
    UnitInfo::new("kOhm", Quantity::Resistance, 1e3),
    UnitInfo::new("W", Quantity::Power, 1.0),
    UnitInfo::new("mW", Quantity::Power, 1e-3),
    UnitInfo::new("uW", Quantity::Power, 1e-6),
    UnitInfo::new("A/V", Quantity::Transconductance, 1.0),
    UnitInfo::new("mA/V", Quantity::Transconductance, 1e-3),
    UnitInfo::new("V", Quantity::Voltage, 1.0),
    UnitInfo::new("mV", Quantity::Voltage, 1e-3),
];

/// The global unit registry.
pub static UNIT_REGISTRY: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of known units with their quantities and conversion factors.
#[derive(Debug)]
pub struct UnitRegistry {
    units: &'static [UnitInfo],
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Creates the registry over the fixed unit table.
    pub fn new() -> Self {
        Self { units: UNIT_TABLE }
    }

    /// Looks up a unit by its exact symbol. Symbols are case sensitive
    /// (`mF` is not `MF`).
    pub fn lookup(&self, symbol: &str) -> Option<&UnitInfo> {
        self.units.iter().find(|info| info.symbol == symbol)
    }

    /// Returns true if the symbol is in the table.
    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    /// Multiplier that converts a value in `symbol` to base SI.
    pub fn multiplier_for(&self, symbol: &str) -> XtalResult<f64> {
        self.lookup(symbol)
            .map(|info| info.to_si_factor)
            .ok_or_else(|| XtalError::UnknownUnit(symbol.to_string()))
    }

    /// Converts a base-SI value into `symbol`.
    ///
    /// Used when presenting results in the unit a datasheet quotes them in
    /// (pF, mA/V, uW).
    pub fn from_si(&self, value: f64, symbol: &str) -> XtalResult<f64> {
        Ok(value / self.multiplier_for(symbol)?)
    }

    /// All units measuring `quantity`, in table order.
    pub fn units_for(&self, quantity: Quantity) -> impl Iterator<Item = &UnitInfo> {
        self.units.iter().filter(move |info| info.quantity == quantity)
    }

    /// Iterates over every registered unit.
    pub fn iter(&self) -> impl Iterator<Item = &UnitInfo> {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        let registry = UnitRegistry::new();
        let cases = [
            ("Hz", 1.0),
            ("kHz", 1e3),
            ("MHz", 1e6),
            ("F", 1.0),
            ("pF", 1e-12),
            ("nF", 1e-9),
            ("uF", 1e-6),
            ("Ohm", 1.0),
            ("kOhm", 1e3),
            ("W", 1.0),
            ("mW", 1e-3),
            ("uW", 1e-6),
            ("A/V", 1.0),
            ("mA/V", 1e-3),
            ("V", 1.0),
            ("mV", 1e-3),
        ];
        for (symbol, factor) in cases {
            let m = registry.multiplier_for(symbol).unwrap();
            assert!(
                (m - factor).abs() <= f64::EPSILON * factor,
                "{symbol}: {m} != {factor}"
            );
        }
        assert_eq!(registry.iter().count(), cases.len());
    }

    #[test]
    fn test_unknown_unit() {
        let registry = UnitRegistry::new();
        assert!(registry.lookup("GHz").is_none());
        assert!(matches!(
            registry.multiplier_for("mhz"),
            Err(XtalError::UnknownUnit(s)) if s == "mhz"
        ));
    }

    #[test]
    fn test_every_quantity_has_its_base_unit() {
        let registry = UnitRegistry::new();
        for info in registry.iter() {
            let base = registry
                .lookup(info.quantity.base_symbol())
                .expect("base unit should be registered");
            assert_eq!(base.to_si_factor, 1.0);
            assert_eq!(base.quantity, info.quantity);
        }
    }

    #[test]
    fn test_from_si() {
        let registry = UnitRegistry::new();
        let pf = registry.from_si(6.5e-12, "pF").unwrap();
        assert!((pf - 6.5).abs() < 1e-9);
        assert_eq!(registry.units_for(Quantity::Power).count(), 3);
    }
}
