//! TOML input files for the command-line front end.
//!
//! ```toml
//! probe = "Active (LeCroy ZS1500)"
//!
//! [parameters]
//! FREQ = { value = "16", unit = "MHz" }
//! C0 = { value = "7", unit = "pF" }
//! REXT_SEL = "0"
//! CS_PIN = 2
//! ```
//!
//! Values may be TOML strings or numbers. A bare value is read in the
//! parameter's default unit.
//! Parameters that are left out take the schema default, which is empty for
//! everything except `REXT_SEL`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use xtalval_core::probes::ProbeModel;
use xtalval_core::{ParameterKey, ParameterSchema, RawInput, XtalError, XtalResult};

/// A parameter value written as a TOML string or number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueText {
    Text(String),
    Number(f64),
}

impl ValueText {
    fn to_text(&self) -> String {
        match self {
            ValueText::Text(text) => text.clone(),
            ValueText::Number(number) => number.to_string(),
        }
    }
}

/// Value of one entry in the `[parameters]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bare(ValueText),
    WithUnit {
        value: ValueText,
        unit: Option<String>,
    },
}

impl ParamValue {
    fn to_raw(&self, key: ParameterKey, default_unit: &str) -> RawInput {
        match self {
            ParamValue::Bare(value) => RawInput::new(key, value.to_text(), default_unit),
            ParamValue::WithUnit { value, unit } => RawInput::new(
                key,
                value.to_text(),
                unit.as_deref().unwrap_or(default_unit),
            ),
        }
    }
}

/// A parsed input file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputFile {
    /// Name of a probe preset. Supplies `C_PROBE` when the parameter table
    /// does not.
    pub probe: Option<String>,
    pub parameters: BTreeMap<ParameterKey, ParamValue>,
}

impl InputFile {
    pub fn from_toml_str(content: &str) -> XtalResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> XtalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| XtalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// One raw input per schema entry, in schema order.
    pub fn raw_inputs(&self, schema: &ParameterSchema) -> XtalResult<Vec<RawInput>> {
        let probe = self
            .probe
            .as_deref()
            .map(ProbeModel::by_name)
            .transpose()?;

        Ok(schema
            .iter()
            .map(|spec| match self.parameters.get(&spec.key) {
                Some(value) => value.to_raw(spec.key, spec.default_unit),
                None => match probe {
                    Some(model) if spec.key == ParameterKey::CProbe => {
                        debug!(probe = model.name, "C_PROBE taken from probe preset");
                        model.raw_input()
                    }
                    _ => spec.default_input(),
                },
            })
            .collect())
    }
}
