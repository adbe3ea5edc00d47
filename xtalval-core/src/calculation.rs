//! Oscillator loop and drive-level calculations.
//!
//! All inputs and outputs are base SI. The functions here are pure and total:
//! any finite parameter set produces a result, never an error.
//!
//! # Divide-by-zero is a value, not a fault
//!
//! `gain_margin` and `drive_level_ratio` are ratios whose divisor can be zero
//! for legitimate (if idealized) inputs: a lossless loop has
//! `gm_crit = 0`, an unrated crystal has `DL_MAX = 0`. Both ratios are then
//! reported as `f64::INFINITY`, meaning "unconstrained". Infinite gain margin
//! classifies as the best case; an infinite drive-level ratio classifies as
//! critical. This looks like a bug at first sight and is not one.

use crate::normalize::NormalizedParameters;
use crate::schema::ParameterKey;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

/// The five quantities derived from a normalized parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedResults {
    /// Load capacitance seen by the crystal, in F.
    ///
    /// $$ C_{L,eff} = \frac{C_{L,sel} + C_{s,PCB} + C_{s,PIN}}{2} $$
    pub effective_load_capacitance: f64,

    /// Minimum amplifier transconductance that sustains oscillation, in A/V.
    ///
    /// $$ g_{m,crit} = 4 (ESR + R_{ext}) (2 \pi f)^2 (C_0 + C_{L,eff})^2 $$
    pub critical_transconductance: f64,

    /// Available over critical transconductance. `+∞` when `gm_crit` is not
    /// positive.
    pub gain_margin: f64,

    /// Power dissipated in the crystal at the measured amplitude, in W.
    ///
    /// $$ DL = \frac{ESR + R_{ext}}{2} (\pi f C_{leg} V_{pp})^2 $$
    ///
    /// where $C_{leg} = C_{L,sel} + C_{stray} + C_{probe}$.
    pub drive_level: f64,

    /// Drive level over the crystal's rating. `+∞` when `DL_MAX` is not
    /// positive.
    pub drive_level_ratio: f64,
}

/// Runs the full set of formulas.
pub fn calculate(p: &NormalizedParameters) -> DerivedResults {
    let freq = p.get(ParameterKey::Freq);
    let c0 = p.get(ParameterKey::C0);
    let cl_sel = p.get(ParameterKey::ClSel);
    let gm_mcu = p.get(ParameterKey::GmMcu);
    let dl_max = p.get(ParameterKey::DlMax);

    let total_esr = total_esr(p);
    let c_stray = stray_capacitance(p);
    let cl_eff = (cl_sel + c_stray) / 2.0;

    let loop_reactance = product(&[2.0 * PI, freq, c0 + cl_eff]);
    let gm_crit = product(&[4.0, total_esr, loop_reactance, loop_reactance]);
    let gain_margin = ratio_or_infinite(gm_mcu, gm_crit);

    let c_leg = cl_sel + c_stray + p.get(ParameterKey::CProbe);
    let leg_current = product(&[PI, freq, c_leg, p.get(ParameterKey::VppMeasured)]);
    let drive_level = product(&[total_esr / 2.0, leg_current, leg_current]);
    let drive_level_ratio = ratio_or_infinite(drive_level, dl_max);

    if gm_crit <= 0.0 {
        warn!(gm_crit, "critical transconductance is not positive; gain margin is unbounded");
    }
    if dl_max <= 0.0 {
        warn!(dl_max, "drive level rating is not positive; drive level ratio is unbounded");
    }

    let results = DerivedResults {
        effective_load_capacitance: cl_eff,
        critical_transconductance: gm_crit,
        gain_margin,
        drive_level,
        drive_level_ratio,
    };
    debug!(?results, "calculated derived results");
    results
}

/// Reactance of one selected load capacitor at the operating frequency, in Ohm.
///
/// $$ X_C = \frac{1}{2 \pi f C_{L,sel}} $$
///
/// A usual first value for a drive-limiting series resistor. Zero when
/// `CL_SEL` is not positive.
pub fn series_reactance(p: &NormalizedParameters) -> f64 {
    let cl_sel = p.get(ParameterKey::ClSel);
    if cl_sel > 0.0 {
        1.0 / (2.0 * PI * p.get(ParameterKey::Freq) * cl_sel)
    } else {
        0.0
    }
}

/// Crystal ESR plus any external series resistor.
fn total_esr(p: &NormalizedParameters) -> f64 {
    p.get(ParameterKey::EsrMax) + p.get(ParameterKey::RextSel)
}

/// Pin plus trace stray capacitance.
fn stray_capacitance(p: &NormalizedParameters) -> f64 {
    p.get(ParameterKey::CsPcb) + p.get(ParameterKey::CsPin)
}

/// Product of `factors`, taking `0 · ∞` as zero.
///
/// Extreme but finite inputs can overflow one factor to `±∞` while another
/// is exactly zero. No resistance or no capacitance means no loss.
fn product(factors: &[f64]) -> f64 {
    if factors.iter().any(|&f| f == 0.0) {
        return 0.0;
    }
    let value: f64 = factors.iter().product();
    // underflow to zero followed by an infinite factor
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

// `divisor > 0` is false for NaN as well, so a NaN divisor also maps to +∞.
fn ratio_or_infinite(numerator: f64, divisor: f64) -> f64 {
    if divisor > 0.0 {
        numerator / divisor
    } else {
        f64::INFINITY
    }
}
