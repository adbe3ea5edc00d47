//! One-call validation: normalize, calculate, classify.

use crate::calculation::{calculate, series_reactance, DerivedResults};
use crate::classify::{classify_with, OverallVerdict, StatusVerdict};
use crate::errors::{ValidationError, XtalResult};
use crate::normalize::{normalize, NormalizedParameters, RawInput};
use crate::schema::{ParameterSchema, PARAMETER_SCHEMA};
use crate::thresholds::Thresholds;
use serde::Serialize;
use tracing::{info, warn};

/// Everything one successful run produces.
///
/// A fresh outcome is built by every run; nothing carries over from earlier
/// runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Inputs in base SI, as they entered the formulas.
    pub parameters: NormalizedParameters,
    pub derived: DerivedResults,
    pub verdict: StatusVerdict,
    /// Reactance of the selected load capacitor, in Ohm.
    pub series_reactance: f64,
}

impl ValidationOutcome {
    pub fn passed(&self) -> bool {
        self.verdict.overall == OverallVerdict::Pass
    }
}

/// A schema paired with the thresholds to classify against.
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    schema: &'a ParameterSchema,
    thresholds: Thresholds,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self {
            schema: &PARAMETER_SCHEMA,
            thresholds: Thresholds::default(),
        }
    }
}

impl<'a> Validator<'a> {
    /// Creates a validator, rejecting inconsistent thresholds.
    pub fn new(schema: &'a ParameterSchema, thresholds: Thresholds) -> XtalResult<Self> {
        thresholds.validate()?;
        Ok(Self { schema, thresholds })
    }

    pub fn schema(&self) -> &'a ParameterSchema {
        self.schema
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Runs normalize, calculate and classify on one set of raw inputs.
    ///
    /// The first validation error aborts the run and no results are
    /// produced.
    pub fn validate_and_calculate(
        &self,
        raw_inputs: &[RawInput],
    ) -> Result<ValidationOutcome, ValidationError> {
        let parameters = normalize(raw_inputs, self.schema).map_err(|e| {
            warn!(parameter = e.parameter(), error = %e, "input rejected");
            e
        })?;
        let derived = calculate(&parameters);
        let verdict = classify_with(&derived, &parameters, &self.thresholds);
        info!(
            overall = %verdict.overall,
            startup = %verdict.startup_margin.level,
            gain_margin = %verdict.gain_margin.level,
            drive_level = %verdict.drive_level.level,
            "validation finished"
        );
        Ok(ValidationOutcome {
            parameters,
            series_reactance: series_reactance(&parameters),
            derived,
            verdict,
        })
    }
}
