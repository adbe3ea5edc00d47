//! Oscilloscope probe presets.
//!
//! The probe tip loads the oscillator node it measures, so its capacitance
//! enters the drive-level calculation through `C_PROBE`. Picking a preset
//! fills that parameter; `Manual/Custom` leaves it to the user.

use crate::errors::{XtalError, XtalResult};
use crate::normalize::RawInput;
use crate::schema::ParameterKey;
use serde::Serialize;

/// A named probe and its input capacitance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbeModel {
    pub name: &'static str,
    /// Input capacitance in pF.
    pub capacitance_pf: f64,
}

/// Name of the preset selected by default.
pub const DEFAULT_PROBE_NAME: &str = "Manual/Custom";

/// Known probes, default first.
pub static PROBE_MODELS: &[ProbeModel] = &[
    ProbeModel {
        name: DEFAULT_PROBE_NAME,
        capacitance_pf: 0.0,
    },
    ProbeModel {
        name: "Active (LeCroy ZS1500)",
        capacitance_pf: 0.9,
    },
    ProbeModel {
        name: "Passive (Tek P5050B)",
        capacitance_pf: 12.0,
    },
];

impl ProbeModel {
    /// Finds a preset by exact name.
    pub fn by_name(name: &str) -> XtalResult<&'static ProbeModel> {
        PROBE_MODELS
            .iter()
            .find(|probe| probe.name == name)
            .ok_or_else(|| XtalError::UnknownProbe(name.to_string()))
    }

    /// The `Manual/Custom` preset.
    pub fn default_model() -> &'static ProbeModel {
        &PROBE_MODELS[0]
    }

    /// Input capacitance in F.
    pub fn capacitance(&self) -> f64 {
        self.capacitance_pf * 1e-12
    }

    /// The `C_PROBE` input this preset stands for.
    pub fn raw_input(&self) -> RawInput {
        RawInput::new(
            ParameterKey::CProbe,
            self.capacitance_pf.to_string(),
            "pF",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::schema::PARAMETER_SCHEMA;
    use is_close::is_close;

    #[test]
    fn test_lookup() {
        let probe = ProbeModel::by_name("Passive (Tek P5050B)").unwrap();
        assert!(is_close!(probe.capacitance(), 12e-12));
        assert_eq!(ProbeModel::default_model().name, DEFAULT_PROBE_NAME);
        assert_eq!(ProbeModel::default_model().capacitance(), 0.0);
    }

    #[test]
    fn test_unknown_probe() {
        let err = ProbeModel::by_name("Passive 10x").unwrap_err();
        assert!(matches!(err, XtalError::UnknownProbe(name) if name == "Passive 10x"));
    }

    #[test]
    fn test_raw_input_normalizes_to_capacitance() {
        for probe in PROBE_MODELS {
            let mut inputs: Vec<_> = PARAMETER_SCHEMA
                .iter()
                .map(|spec| RawInput::new(spec.key, "1", spec.default_unit))
                .filter(|raw| raw.key != ParameterKey::CProbe)
                .collect();
            inputs.push(probe.raw_input());
            let p = normalize(&inputs, &PARAMETER_SCHEMA).unwrap();
            assert!(is_close!(p.get(ParameterKey::CProbe), probe.capacitance()));
        }
    }
}
