//! The catalog of parameters a validation run requires.
//!
//! The schema is the single source of truth shared by the normalizer and by
//! whatever builds the input form. It is built once into [`PARAMETER_SCHEMA`]
//! and only ever handed out by shared reference.
//!
//! # Example
//!
//! ```
//! use xtalval_core::schema::{ParameterGroup, ParameterKey, PARAMETER_SCHEMA};
//!
//! let freq = PARAMETER_SCHEMA.spec(ParameterKey::Freq);
//! assert_eq!(freq.default_unit, "MHz");
//! assert_eq!(freq.group, ParameterGroup::Crystal);
//!
//! // Specs are ordered: crystal, then circuit, then measurement.
//! let keys: Vec<_> = PARAMETER_SCHEMA.iter().map(|s| s.key.as_str()).collect();
//! assert_eq!(keys[0], "FREQ");
//! assert_eq!(keys[10], "C_PROBE");
//! ```
//!
//! # Parameters
//!
//! ## Crystal (datasheet)
//! - `FREQ` - Nominal operating frequency
//! - `C0` - Shunt capacitance of package and electrodes
//! - `ESR_MAX` - Maximum equivalent series resistance
//! - `DL_MAX` - Maximum drive level
//!
//! ## Circuit and MCU
//! - `GM_MCU` - Oscillator amplifier transconductance
//! - `CL_SEL` - External load capacitors (CL1 = CL2)
//! - `REXT_SEL` - Series current-limiting resistor, defaults to `0`
//! - `CS_PIN` - Stray capacitance of one MCU pin
//! - `CS_PCB` - Stray capacitance of one PCB trace
//!
//! ## Measurement
//! - `VPP_MEASURED` - Peak-to-peak voltage measured on OSC_IN
//! - `C_PROBE` - Capacitance of the scope probe used

use crate::errors::{XtalError, XtalResult};
use crate::normalize::RawInput;
use crate::units::UNIT_REGISTRY;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Identifier of a required parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterKey {
    Freq,
    C0,
    EsrMax,
    DlMax,
    GmMcu,
    ClSel,
    RextSel,
    CsPin,
    CsPcb,
    VppMeasured,
    CProbe,
}

impl ParameterKey {
    /// Every key, in schema order.
    pub const ALL: [ParameterKey; 11] = [
        ParameterKey::Freq,
        ParameterKey::C0,
        ParameterKey::EsrMax,
        ParameterKey::DlMax,
        ParameterKey::GmMcu,
        ParameterKey::ClSel,
        ParameterKey::RextSel,
        ParameterKey::CsPin,
        ParameterKey::CsPcb,
        ParameterKey::VppMeasured,
        ParameterKey::CProbe,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// The identifier as written in input files (`FREQ`, `ESR_MAX`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKey::Freq => "FREQ",
            ParameterKey::C0 => "C0",
            ParameterKey::EsrMax => "ESR_MAX",
            ParameterKey::DlMax => "DL_MAX",
            ParameterKey::GmMcu => "GM_MCU",
            ParameterKey::ClSel => "CL_SEL",
            ParameterKey::RextSel => "REXT_SEL",
            ParameterKey::CsPin => "CS_PIN",
            ParameterKey::CsPcb => "CS_PCB",
            ParameterKey::VppMeasured => "VPP_MEASURED",
            ParameterKey::CProbe => "C_PROBE",
        }
    }

    /// Position of the key in [`ParameterKey::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKey {
    type Err = XtalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| XtalError::UnknownParameter(s.to_string()))
    }
}

/// Input group a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterGroup {
    /// Values taken from the crystal datasheet.
    Crystal,
    /// Values of the MCU and the surrounding circuit.
    Circuit,
    /// Values measured on the running oscillator.
    Measurement,
}

impl ParameterGroup {
    pub fn title(&self) -> &'static str {
        match self {
            ParameterGroup::Crystal => "Crystal Parameters (XTAL Datasheet)",
            ParameterGroup::Circuit => "Circuit and MCU Parameters",
            ParameterGroup::Measurement => "Measurements (for effective DL)",
        }
    }
}

/// Static description of one required input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub key: ParameterKey,
    pub group: ParameterGroup,
    /// Name shown to the user and carried by validation errors.
    pub display_name: &'static str,
    /// Value a freshly reset form holds.
    pub default_value: &'static str,
    pub default_unit: &'static str,
    /// Units the user may pick from; always contains `default_unit`.
    pub acceptable_units: &'static [&'static str],
    pub description: &'static str,
}

impl ParameterSpec {
    /// Returns true if `unit` is one of the selectable units.
    pub fn accepts(&self, unit: &str) -> bool {
        self.acceptable_units.contains(&unit)
    }

    /// Raw input holding this parameter's default value and unit.
    pub fn default_input(&self) -> RawInput {
        RawInput::new(self.key, self.default_value, self.default_unit)
    }
}

const FREQUENCY_UNITS: &[&str] = &["MHz", "kHz", "Hz"];
const CAPACITANCE_UNITS: &[&str] = &["pF", "nF", "F"];
const RESISTANCE_UNITS: &[&str] = &["Ohm", "kOhm"];
const POWER_UNITS: &[&str] = &["uW", "mW", "W"];
const TRANSCONDUCTANCE_UNITS: &[&str] = &["mA/V", "A/V"];
const VOLTAGE_UNITS: &[&str] = &["mV", "V"];

static STANDARD_SPECS: [ParameterSpec; ParameterKey::COUNT] = [
    ParameterSpec {
        key: ParameterKey::Freq,
        group: ParameterGroup::Crystal,
        display_name: "Frequency (F)",
        default_value: "",
        default_unit: "MHz",
        acceptable_units: FREQUENCY_UNITS,
        description: "Nominal operating frequency.",
    },
    ParameterSpec {
        key: ParameterKey::C0,
        group: ParameterGroup::Crystal,
        display_name: "Shunt Capacitance (C0)",
        default_value: "",
        default_unit: "pF",
        acceptable_units: CAPACITANCE_UNITS,
        description: "Capacitance of the package and electrodes.",
    },
    ParameterSpec {
        key: ParameterKey::EsrMax,
        group: ParameterGroup::Crystal,
        display_name: "ESR Max",
        default_value: "",
        default_unit: "Ohm",
        acceptable_units: RESISTANCE_UNITS,
        description: "Maximum equivalent series resistance.",
    },
    ParameterSpec {
        key: ParameterKey::DlMax,
        group: ParameterGroup::Crystal,
        display_name: "DL Max",
        default_value: "",
        default_unit: "uW",
        acceptable_units: POWER_UNITS,
        description: "Maximum power the crystal may dissipate.",
    },
    ParameterSpec {
        key: ParameterKey::GmMcu,
        group: ParameterGroup::Circuit,
        display_name: "Gm MCU",
        default_value: "",
        default_unit: "mA/V",
        acceptable_units: TRANSCONDUCTANCE_UNITS,
        description: "Transconductance of the MCU oscillator amplifier.",
    },
    ParameterSpec {
        key: ParameterKey::ClSel,
        group: ParameterGroup::Circuit,
        display_name: "External CL (CL_sel)",
        default_value: "",
        default_unit: "pF",
        acceptable_units: CAPACITANCE_UNITS,
        description: "Value of the external load capacitors (CL1 = CL2).",
    },
    ParameterSpec {
        key: ParameterKey::RextSel,
        group: ParameterGroup::Circuit,
        display_name: "Selected Rext",
        default_value: "0",
        default_unit: "Ohm",
        acceptable_units: RESISTANCE_UNITS,
        description: "Series resistor for current limiting.",
    },
    ParameterSpec {
        key: ParameterKey::CsPin,
        group: ParameterGroup::Circuit,
        display_name: "Cs PIN",
        default_value: "",
        default_unit: "pF",
        acceptable_units: CAPACITANCE_UNITS,
        description: "Stray capacitance of a single MCU pin.",
    },
    ParameterSpec {
        key: ParameterKey::CsPcb,
        group: ParameterGroup::Circuit,
        display_name: "Cs PCB",
        default_value: "",
        default_unit: "pF",
        acceptable_units: CAPACITANCE_UNITS,
        description: "Stray capacitance of a single PCB trace.",
    },
    ParameterSpec {
        key: ParameterKey::VppMeasured,
        group: ParameterGroup::Measurement,
        display_name: "Measured Vpp",
        default_value: "",
        default_unit: "mV",
        acceptable_units: VOLTAGE_UNITS,
        description: "Peak-to-peak voltage measured on OSC_IN.",
    },
    ParameterSpec {
        key: ParameterKey::CProbe,
        group: ParameterGroup::Measurement,
        display_name: "Probe Cap. (C_probe)",
        default_value: "",
        default_unit: "pF",
        acceptable_units: CAPACITANCE_UNITS,
        description: "Capacitance of the scope probe used.",
    },
];

/// The schema every run is validated against.
pub static PARAMETER_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| ParameterSchema {
    specs: STANDARD_SPECS.to_vec(),
});

/// Ordered, immutable collection of [`ParameterSpec`]s covering every
/// [`ParameterKey`] exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    specs: Vec<ParameterSpec>,
}

impl ParameterSchema {
    /// Builds a schema from custom specs, e.g. with translated display names.
    ///
    /// Fails if a key is missing or repeated, if a declared unit is not in the
    /// unit table, or if the default unit is not among the acceptable units.
    pub fn new(specs: Vec<ParameterSpec>) -> XtalResult<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.key) {
                return Err(XtalError::InvalidSchema(format!(
                    "parameter {} declared twice",
                    spec.key
                )));
            }
            if let Some(unit) = spec
                .acceptable_units
                .iter()
                .find(|unit| !UNIT_REGISTRY.contains(unit))
            {
                return Err(XtalError::InvalidSchema(format!(
                    "parameter {} declares unknown unit '{unit}'",
                    spec.key
                )));
            }
            if !spec.accepts(spec.default_unit) {
                return Err(XtalError::InvalidSchema(format!(
                    "default unit '{}' of {} is not an acceptable unit",
                    spec.default_unit, spec.key
                )));
            }
        }
        if let Some(missing) = ParameterKey::ALL.iter().find(|key| !seen.contains(*key)) {
            return Err(XtalError::InvalidSchema(format!(
                "parameter {missing} is not declared"
            )));
        }
        Ok(Self { specs })
    }

    /// The built-in schema.
    pub fn standard() -> &'static ParameterSchema {
        &PARAMETER_SCHEMA
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Spec for `key`. Every key is present by construction.
    pub fn spec(&self, key: ParameterKey) -> &ParameterSpec {
        self.specs
            .iter()
            .find(|spec| spec.key == key)
            .unwrap_or(&STANDARD_SPECS[key.index()])
    }

    /// Specs of one input group, in schema order.
    pub fn group(&self, group: ParameterGroup) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter().filter(move |spec| spec.group == group)
    }

    /// A full set of raw inputs at their default values, as a reset form holds.
    pub fn defaults(&self) -> Vec<RawInput> {
        self.specs.iter().map(ParameterSpec::default_input).collect()
    }
}

impl<'a> IntoIterator for &'a ParameterSchema {
    type Item = &'a ParameterSpec;
    type IntoIter = std::slice::Iter<'a, ParameterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_is_consistent() {
        let schema = ParameterSchema::new(STANDARD_SPECS.to_vec());
        assert!(schema.is_ok(), "{:?}", schema.err());
        assert_eq!(PARAMETER_SCHEMA.len(), ParameterKey::COUNT);
    }

    #[test]
    fn test_schema_order_matches_keys() {
        let keys: Vec<_> = PARAMETER_SCHEMA.iter().map(|s| s.key).collect();
        assert_eq!(keys, ParameterKey::ALL.to_vec());
        for key in ParameterKey::ALL {
            assert_eq!(ParameterKey::ALL[key.index()], key);
        }
    }

    #[test]
    fn test_groups() {
        let crystal: Vec<_> = PARAMETER_SCHEMA
            .group(ParameterGroup::Crystal)
            .map(|s| s.key)
            .collect();
        assert_eq!(
            crystal,
            vec![
                ParameterKey::Freq,
                ParameterKey::C0,
                ParameterKey::EsrMax,
                ParameterKey::DlMax
            ]
        );
        assert_eq!(PARAMETER_SCHEMA.group(ParameterGroup::Circuit).count(), 5);
        assert_eq!(
            PARAMETER_SCHEMA.group(ParameterGroup::Measurement).count(),
            2
        );
    }

    #[test]
    fn test_only_rext_has_a_default_value() {
        for spec in PARAMETER_SCHEMA.iter() {
            match spec.key {
                ParameterKey::RextSel => assert_eq!(spec.default_value, "0"),
                _ => assert_eq!(spec.default_value, ""),
            }
        }
    }

    #[test]
    fn test_key_round_trip_through_str() {
        for key in ParameterKey::ALL {
            assert_eq!(key.as_str().parse::<ParameterKey>().unwrap(), key);
        }
        assert!("FREQUENCY".parse::<ParameterKey>().is_err());
    }

    #[test]
    fn test_serde_key_names_match_as_str() {
        for key in ParameterKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let mut specs = STANDARD_SPECS.to_vec();
        specs[1] = specs[0].clone();
        let err = ParameterSchema::new(specs).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_rejects_unknown_unit() {
        let mut specs = STANDARD_SPECS.to_vec();
        specs[0].acceptable_units = &["MHz", "GHz"];
        let err = ParameterSchema::new(specs).unwrap_err();
        assert!(err.to_string().contains("GHz"));
    }

    #[test]
    fn test_rejects_default_unit_not_acceptable() {
        let mut specs = STANDARD_SPECS.to_vec();
        specs[0].default_unit = "Hz";
        specs[0].acceptable_units = &["MHz", "kHz"];
        assert!(ParameterSchema::new(specs).is_err());
    }

    #[test]
    fn test_rejects_missing_key() {
        let mut specs = STANDARD_SPECS.to_vec();
        specs.pop();
        let err = ParameterSchema::new(specs).unwrap_err();
        assert!(err.to_string().contains("C_PROBE"));
    }

    #[test]
    fn test_defaults_cover_every_key() {
        let defaults = PARAMETER_SCHEMA.defaults();
        assert_eq!(defaults.len(), ParameterKey::COUNT);
        let rext = defaults
            .iter()
            .find(|raw| raw.key == ParameterKey::RextSel)
            .unwrap();
        assert_eq!(rext.value, "0");
        assert_eq!(rext.unit, "Ohm");
    }
}
