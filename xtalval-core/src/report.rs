//! Text report of a validation outcome in datasheet units.

use crate::classify::{Aspect, StatusLevel};
use crate::errors::XtalResult;
use crate::format::format_value;
use crate::units::UNIT_REGISTRY;
use crate::validator::ValidationOutcome;
use serde::Serialize;
use std::fmt;

/// One derived quantity, scaled and formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// One aspect status line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStatus {
    pub aspect: Aspect,
    pub level: StatusLevel,
    pub message: String,
}

/// Display form of a [`ValidationOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub statuses: Vec<ReportStatus>,
    pub passed: bool,
}

impl Report {
    /// Builds the report, rendering values with `precision` decimals.
    pub fn new(outcome: &ValidationOutcome, precision: usize) -> XtalResult<Self> {
        let derived = &outcome.derived;
        let row = |label, value: f64, unit: &'static str| -> XtalResult<ReportRow> {
            Ok(ReportRow {
                label,
                value: format_value(UNIT_REGISTRY.from_si(value, unit)?, precision),
                unit,
            })
        };

        let rows = vec![
            row(
                "Effective Load Capacitance (CL_eff)",
                derived.effective_load_capacitance,
                "pF",
            )?,
            row(
                "Critical Transconductance (Gm_crit)",
                derived.critical_transconductance,
                "mA/V",
            )?,
            ReportRow {
                label: "Gain Margin (S_f = Gm/Gm_crit)",
                value: format_value(derived.gain_margin, precision),
                unit: "Ratio",
            },
            row("Circuit Reactance (X_C)", outcome.series_reactance, "Ohm")?,
            row("Calculated Drive Level (DL)", derived.drive_level, "uW")?,
        ];

        let statuses = outcome
            .verdict
            .aspects()
            .iter()
            .map(|status| ReportStatus {
                aspect: status.aspect,
                level: status.level,
                message: status.message.clone(),
            })
            .collect();

        Ok(Self {
            rows,
            statuses,
            passed: outcome.passed(),
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TECHNICAL REPORT: DERIVED PARAMETERS")?;
        for row in &self.rows {
            writeln!(f, "  {:<40} {:>12} [{}]", row.label, row.value, row.unit)?;
        }
        writeln!(f)?;
        writeln!(f, "FINAL VALIDATION STATUS")?;
        for status in &self.statuses {
            writeln!(
                f,
                "  {:<40} [{:<4}] {}",
                status.aspect.label(),
                status.level,
                status.message
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "VALIDATION: {}",
            if self.passed { "PASS" } else { "FAIL" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::RawInput;
    use crate::schema::ParameterKey;
    use crate::validator::Validator;

    fn outcome(dl_max_uw: &str) -> ValidationOutcome {
        let inputs = vec![
            RawInput::new(ParameterKey::Freq, "16", "MHz"),
            RawInput::new(ParameterKey::C0, "7", "pF"),
            RawInput::new(ParameterKey::EsrMax, "40", "Ohm"),
            RawInput::new(ParameterKey::DlMax, dl_max_uw, "uW"),
            RawInput::new(ParameterKey::GmMcu, "25", "mA/V"),
            RawInput::new(ParameterKey::ClSel, "8", "pF"),
            RawInput::new(ParameterKey::RextSel, "0", "Ohm"),
            RawInput::new(ParameterKey::CsPin, "2", "pF"),
            RawInput::new(ParameterKey::CsPcb, "3", "pF"),
            RawInput::new(ParameterKey::VppMeasured, "500", "mV"),
            RawInput::new(ParameterKey::CProbe, "1", "pF"),
        ];
        Validator::default().validate_and_calculate(&inputs).unwrap()
    }

    #[test]
    fn test_rows_in_display_units() {
        let report = Report::new(&outcome("200"), 3).unwrap();
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.rows[0].value, "6.500");
        assert_eq!(report.rows[0].unit, "pF");
        assert_eq!(report.rows[1].value, "0.295");
        assert_eq!(report.rows[4].value, "2.476");
        assert!(report.passed);
    }

    #[test]
    fn test_display_ends_with_verdict() {
        let text = Report::new(&outcome("200"), 3).unwrap().to_string();
        assert!(text.contains("Effective Load Capacitance (CL_eff)"));
        assert!(text.contains("[OK  ]"));
        assert!(text.ends_with("VALIDATION: PASS"));
    }

    #[test]
    fn test_failing_report() {
        let report = Report::new(&outcome("1"), 2).unwrap();
        assert!(!report.passed);
        assert_eq!(report.statuses[2].level, StatusLevel::Crit);
        assert!(report.to_string().ends_with("VALIDATION: FAIL"));
    }
}
