//! Parameter normalization and validation engine for crystal oscillator
//! drive circuits.
//!
//! Given the datasheet values of a quartz crystal, the transconductance of
//! the MCU's oscillator amplifier and a scope measurement of the running
//! oscillator, the engine computes the effective load capacitance, the
//! critical transconductance, the gain margin and the drive level, and
//! classifies them against pass/warn/fail thresholds.
//!
//! # Pipeline
//!
//! raw strings + units → [`normalize`](normalize::normalize) →
//! [`calculate`](calculation::calculate) → [`classify`](classify::classify) →
//! [`format_value`]
//!
//! ```
//! use xtalval_core::{get_schema, validate_and_calculate, RawInput};
//!
//! let inputs: Vec<RawInput> = get_schema()
//!     .iter()
//!     .map(|spec| {
//!         let value = match spec.key.as_str() {
//!             "FREQ" => "16",
//!             "C0" => "7",
//!             "ESR_MAX" => "40",
//!             "DL_MAX" => "200",
//!             "GM_MCU" => "25",
//!             "CL_SEL" => "8",
//!             "REXT_SEL" => "0",
//!             "CS_PIN" => "2",
//!             "CS_PCB" => "3",
//!             "VPP_MEASURED" => "500",
//!             _ => "1",
//!         };
//!         RawInput::new(spec.key, value, spec.default_unit)
//!     })
//!     .collect();
//!
//! let outcome = validate_and_calculate(&inputs).unwrap();
//! assert!(outcome.passed());
//! ```
//!
//! Everything is synchronous and allocation-light. The schema and unit table
//! are immutable statics; each run builds its own results.

pub mod calculation;
pub mod classify;
pub mod errors;
pub mod format;
pub mod normalize;
pub mod probes;
pub mod report;
pub mod schema;
pub mod thresholds;
pub mod units;
pub mod validator;

pub use calculation::DerivedResults;
pub use classify::{OverallVerdict, StatusLevel, StatusVerdict};
pub use errors::{ValidationError, XtalError, XtalResult};
pub use format::format_value;
pub use normalize::{NormalizedParameters, RawInput};
pub use schema::{ParameterKey, ParameterSchema, ParameterSpec};
pub use thresholds::Thresholds;
pub use validator::{ValidationOutcome, Validator};

/// The parameter catalog, for building input forms.
pub fn get_schema() -> &'static ParameterSchema {
    ParameterSchema::standard()
}

/// Validates one set of raw inputs with the built-in schema and default
/// thresholds.
pub fn validate_and_calculate(
    raw_inputs: &[RawInput],
) -> Result<ValidationOutcome, ValidationError> {
    Validator::default().validate_and_calculate(raw_inputs)
}
