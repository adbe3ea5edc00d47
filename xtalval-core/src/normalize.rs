//! Conversion of raw form input into base-SI parameter values.
//!
//! Normalization walks the schema in order and stops at the first problem, so
//! a run reports exactly one [`ValidationError`] naming the offending field.
//! No range checks happen here: zero and negative values pass through and are
//! left to the engine, which is total over all finite inputs.

use crate::errors::ValidationError;
use crate::schema::{ParameterKey, ParameterSchema, ParameterSpec};
use crate::units::UNIT_REGISTRY;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// One user-supplied value and the unit selected next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub key: ParameterKey,
    /// The text as typed, not yet trimmed.
    pub value: String,
    pub unit: String,
}

impl RawInput {
    pub fn new(key: ParameterKey, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
            unit: unit.into(),
        }
    }
}

/// A complete parameter set in base SI units (Hz, F, Ohm, W, A/V, V).
///
/// Holds a value for every [`ParameterKey`]; there is no way to build a
/// partial set. Values are expected to be finite, which [`normalize`]
/// guarantees and debug builds assert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedParameters {
    values: [f64; ParameterKey::COUNT],
}

impl NormalizedParameters {
    /// Creates a parameter set from base-SI values given in
    /// [`ParameterKey::ALL`] order.
    pub fn from_si(values: [f64; ParameterKey::COUNT]) -> Self {
        debug_assert!(
            values.iter().all(|v| v.is_finite()),
            "non-finite parameter value in {values:?}"
        );
        Self { values }
    }

    /// Value of `key` in base SI.
    pub fn get(&self, key: ParameterKey) -> f64 {
        self.values[key.index()]
    }

    /// Returns a copy with `key` replaced.
    #[must_use]
    pub fn with(mut self, key: ParameterKey, value: f64) -> Self {
        debug_assert!(value.is_finite(), "non-finite value {value} for {key}");
        self.values[key.index()] = value;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, f64)> + '_ {
        ParameterKey::ALL
            .into_iter()
            .map(move |key| (key, self.values[key.index()]))
    }

    /// Key-ordered map, the shape used for serialized output.
    pub fn to_map(&self) -> BTreeMap<ParameterKey, f64> {
        self.iter().collect()
    }
}

/// Serializes as a key-ordered map of base-SI values.
impl Serialize for NormalizedParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// Normalizes a full set of raw inputs against `schema`.
///
/// For each spec, in schema order:
/// 1. the first raw input with a matching key is used; a missing one counts
///    as an empty field
/// 2. the trimmed text must be non-empty, else [`ValidationError::EmptyField`]
/// 3. it must parse as a finite number, else [`ValidationError::NotNumeric`]
/// 4. the unit must be one the parameter accepts and the unit table knows, else
///    [`ValidationError::UnknownUnit`]
/// 5. the value is stored multiplied by the unit's SI factor
pub fn normalize(
    raw_inputs: &[RawInput],
    schema: &ParameterSchema,
) -> Result<NormalizedParameters, ValidationError> {
    let mut values = [0.0; ParameterKey::COUNT];
    for spec in schema {
        let raw = raw_inputs.iter().find(|raw| raw.key == spec.key);
        let value = normalize_one(spec, raw)?;
        debug!(parameter = %spec.key, value, "normalized parameter");
        values[spec.key.index()] = value;
    }
    Ok(NormalizedParameters { values })
}

fn normalize_one(spec: &ParameterSpec, raw: Option<&RawInput>) -> Result<f64, ValidationError> {
    let raw = raw.ok_or_else(|| ValidationError::EmptyField(spec.display_name.to_string()))?;

    let text = raw.value.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyField(spec.display_name.to_string()));
    }

    let value = parse_number(text)
        .ok_or_else(|| ValidationError::NotNumeric(spec.display_name.to_string()))?;

    let unit_error = || ValidationError::UnknownUnit {
        parameter: spec.display_name.to_string(),
        unit: raw.unit.clone(),
    };
    if !spec.accepts(&raw.unit) {
        return Err(unit_error());
    }
    let multiplier = UNIT_REGISTRY
        .multiplier_for(&raw.unit)
        .map_err(|_| unit_error())?;

    let scaled = value * multiplier;
    if !scaled.is_finite() {
        return Err(ValidationError::NotNumeric(spec.display_name.to_string()));
    }
    Ok(scaled)
}

/// Parses a decimal or exponent literal (`16`, `-0.5`, `7e-12`).
///
/// `NaN` and the infinities are rejected even though `f64::from_str` accepts
/// their spellings.
fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
