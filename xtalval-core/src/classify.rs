//! Three-tier status classification of derived results.
//!
//! | Aspect | CRIT | WARN | OK |
//! |---|---|---|---|
//! | Startup margin | `gm_crit > GM_MCU` | never | `gm_crit <= GM_MCU` |
//! | Gain margin | `< critical` | `[critical, ideal)` | `>= ideal` |
//! | Drive level | `ratio > limit` | `(caution, limit]` | `<= caution` |
//!
//! Every rule is always evaluated; a single CRIT fails the overall verdict.

use crate::calculation::DerivedResults;
use crate::format::format_value;
use crate::normalize::NormalizedParameters;
use crate::schema::ParameterKey;
use crate::thresholds::Thresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of one aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusLevel {
    Ok,
    Warn,
    Crit,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusLevel::Ok => "OK",
            StatusLevel::Warn => "WARN",
            StatusLevel::Crit => "CRIT",
        };
        f.pad(text)
    }
}

/// The three properties a drive circuit is judged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    /// Whether the amplifier can start the oscillation at all.
    StartupMargin,
    /// How much headroom the amplifier has over the minimum.
    GainMargin,
    /// Whether the crystal is driven within its power rating.
    DriveLevel,
}

impl Aspect {
    pub fn label(&self) -> &'static str {
        match self {
            Aspect::StartupMargin => "Gm/Gm_crit (Oscillation Startup)",
            Aspect::GainMargin => "Gain Margin (Robustness)",
            Aspect::DriveLevel => "Drive Level (Reliability)",
        }
    }
}

/// Result of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectStatus {
    pub aspect: Aspect,
    pub level: StatusLevel,
    /// Human readable explanation including the values compared.
    pub message: String,
}

/// Aggregate pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallVerdict {
    Pass,
    Fail,
}

impl fmt::Display for OverallVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            OverallVerdict::Pass => "PASS",
            OverallVerdict::Fail => "FAIL",
        };
        f.pad(text)
    }
}

/// Per-aspect statuses and the overall verdict of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusVerdict {
    pub startup_margin: AspectStatus,
    pub gain_margin: AspectStatus,
    pub drive_level: AspectStatus,
    pub overall: OverallVerdict,
}

impl StatusVerdict {
    /// The aspect statuses in reporting order.
    pub fn aspects(&self) -> [&AspectStatus; 3] {
        [&self.startup_margin, &self.gain_margin, &self.drive_level]
    }

    /// The most severe level among the aspects.
    pub fn worst_level(&self) -> StatusLevel {
        self.aspects()
            .iter()
            .map(|status| status.level)
            .max()
            .unwrap_or(StatusLevel::Ok)
    }
}

// The level functions below are written so that a NaN operand classifies as
// critical.

/// Startup is critical when the required transconductance exceeds the
/// available one. There is no warning tier.
pub fn startup_level(gm_crit: f64, gm_mcu: f64) -> StatusLevel {
    if gm_crit <= gm_mcu {
        StatusLevel::Ok
    } else {
        StatusLevel::Crit
    }
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn gain_margin_level(gain_margin: f64, thresholds: &Thresholds) -> StatusLevel {
    if !(gain_margin >= thresholds.gain_margin_critical) {
        StatusLevel::Crit
    } else if gain_margin < thresholds.gain_margin_ideal {
        StatusLevel::Warn
    } else {
        StatusLevel::Ok
    }
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn drive_level_level(ratio: f64, thresholds: &Thresholds) -> StatusLevel {
    if !(ratio <= thresholds.drive_level_limit) {
        StatusLevel::Crit
    } else if ratio > thresholds.drive_level_caution {
        StatusLevel::Warn
    } else {
        StatusLevel::Ok
    }
}

/// Classifies with the default thresholds.
pub fn classify(results: &DerivedResults, p: &NormalizedParameters) -> StatusVerdict {
    classify_with(results, p, &Thresholds::default())
}

/// Classifies with explicit thresholds.
pub fn classify_with(
    results: &DerivedResults,
    p: &NormalizedParameters,
    thresholds: &Thresholds,
) -> StatusVerdict {
    let startup_margin = startup_status(results, p.get(ParameterKey::GmMcu));
    let gain_margin = gain_margin_status(results, thresholds);
    let drive_level = drive_level_status(results, p.get(ParameterKey::DlMax), thresholds);

    let any_critical = [&startup_margin, &gain_margin, &drive_level]
        .iter()
        .any(|status| status.level == StatusLevel::Crit);
    let overall = if any_critical {
        OverallVerdict::Fail
    } else {
        OverallVerdict::Pass
    };

    StatusVerdict {
        startup_margin,
        gain_margin,
        drive_level,
        overall,
    }
}

fn startup_status(results: &DerivedResults, gm_mcu: f64) -> AspectStatus {
    let gm_crit = results.critical_transconductance;
    let level = startup_level(gm_crit, gm_mcu);
    let gm = format_value(gm_mcu * 1e3, 1);
    let gmc = format_value(gm_crit * 1e3, 1);
    let message = match level {
        StatusLevel::Crit => format!(
            "Gm ({gm} mA/V) < Gm_crit ({gmc} mA/V). Startup not guaranteed. CRITICAL."
        ),
        _ => format!("Gm ({gm} mA/V) >= Gm_crit ({gmc} mA/V). OK."),
    };
    AspectStatus {
        aspect: Aspect::StartupMargin,
        level,
        message,
    }
}

fn gain_margin_status(results: &DerivedResults, thresholds: &Thresholds) -> AspectStatus {
    let level = gain_margin_level(results.gain_margin, thresholds);
    let margin = format_value(results.gain_margin, 2);
    let ideal = thresholds.gain_margin_ideal;
    let message = match level {
        StatusLevel::Crit => {
            format!("Gain Margin ({margin}) too low. Risk of instability. CRITICAL.")
        }
        StatusLevel::Warn => {
            format!("Gain Margin ({margin}) acceptable, but < {ideal}. OPTIMIZE.")
        }
        StatusLevel::Ok => format!("Gain Margin ({margin}) >= {ideal}. EXCELLENT."),
    };
    AspectStatus {
        aspect: Aspect::GainMargin,
        level,
        message,
    }
}

fn drive_level_status(
    results: &DerivedResults,
    dl_max: f64,
    thresholds: &Thresholds,
) -> AspectStatus {
    let level = drive_level_level(results.drive_level_ratio, thresholds);
    let dl = format_value(results.drive_level * 1e6, 1);
    let ratio = format_value(results.drive_level_ratio, 2);
    let message = match level {
        StatusLevel::Crit => format!(
            "DL ({dl} uW) EXCEEDS DL Max ({} uW). Rext required. CRITICAL.",
            format_value(dl_max * 1e6, 1)
        ),
        StatusLevel::Warn => {
            format!("DL ({dl} uW) close to the limit (DL/DL_max = {ratio}). CAUTION.")
        }
        StatusLevel::Ok => format!("DL ({dl} uW) within limits (DL/DL_max = {ratio}). OK."),
    };
    AspectStatus {
        aspect: Aspect::DriveLevel,
        level,
        message,
    }
}
