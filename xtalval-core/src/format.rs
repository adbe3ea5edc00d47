//! Display formatting of numeric results.
//!
//! Front ends render every number through [`format_value`], so the switch
//! between fixed-point and scientific notation is part of the library
//! contract.

/// Default number of digits after the decimal point.
pub const DEFAULT_PRECISION: usize = 3;

/// Smallest magnitude rendered in fixed-point notation.
const FIXED_MIN: f64 = 1e-3;
/// Magnitudes at or above this are rendered in scientific notation.
const FIXED_MAX: f64 = 1e4;

/// Text shown for values that have no meaningful number.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats `value` with `precision` digits after the decimal point.
///
/// - non-finite values give `"N/A"`
/// - zero (of either sign) gives `0.000` (for precision 3)
/// - magnitudes outside `[1e-3, 1e4)` use scientific notation with an
///   explicitly signed exponent, e.g. `1.235e+4`, `2.500e-6`
/// - everything else is fixed-point
///
/// ```
/// use xtalval_core::format::format_value;
///
/// assert_eq!(format_value(0.0, 3), "0.000");
/// assert_eq!(format_value(6.5, 3), "6.500");
/// assert_eq!(format_value(12345.678, 3), "1.235e+4");
/// assert_eq!(format_value(f64::INFINITY, 3), "N/A");
/// ```
pub fn format_value(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", precision, 0.0);
    }
    let magnitude = value.abs();
    if !(FIXED_MIN..FIXED_MAX).contains(&magnitude) {
        return scientific(value, precision);
    }
    format!("{value:.precision$}")
}

/// Formats an optional value; `None` renders as `"N/A"`.
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format_value(v, precision))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Scientific notation with a signed exponent (`e+4`, `e-12`).
fn scientific(value: f64, precision: usize) -> String {
    let formatted = format!("{value:.precision$e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => {
            format!("{mantissa}e{exponent}")
        }
        Some((mantissa, exponent)) => format!("{mantissa}e+{exponent}"),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_available() {
        assert_eq!(format_value(f64::INFINITY, 3), "N/A");
        assert_eq!(format_value(f64::NEG_INFINITY, 3), "N/A");
        assert_eq!(format_value(f64::NAN, 3), "N/A");
        assert_eq!(format_optional(None, 3), "N/A");
        assert_eq!(format_optional(Some(1.5), 1), "1.5");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_value(0.0, DEFAULT_PRECISION), "0.000");
        assert_eq!(format_value(-0.0, 3), "0.000");
        assert_eq!(format_value(0.0, 1), "0.0");
        assert_eq!(format_value(0.0, 0), "0");
    }

    #[test]
    fn test_fixed_range() {
        assert_eq!(format_value(1e-3, 3), "0.001");
        assert_eq!(format_value(9999.0, 3), "9999.000");
        assert_eq!(format_value(-42.127, 2), "-42.13");
        assert_eq!(format_value(84.8321, 2), "84.83");
    }

    #[test]
    fn test_scientific_above_range() {
        let s = format_value(12345.0, 3);
        assert!(s.contains("e+4"), "{s}");
        assert!(s.starts_with("1.23"), "{s}");
        assert_eq!(format_value(1e4, 3), "1.000e+4");
        assert_eq!(format_value(-2.5e7, 2), "-2.50e+7");
    }

    /// Exact decimal ties round to even in both notations.
    #[test]
    fn test_exact_ties_round_to_even() {
        assert_eq!(format_value(12345.0, 3), "1.234e+4");
        assert_eq!(format_value(12355.0, 3), "1.236e+4");
        assert_eq!(format_value(0.125, 2), "0.12");
        assert_eq!(format_value(0.375, 2), "0.38");
        assert_eq!(format_value(2.5, 0), "2");
    }

    #[test]
    fn test_scientific_below_range() {
        assert_eq!(format_value(0.000999, 3), "9.990e-4");
        assert_eq!(format_value(2.5e-6, 3), "2.500e-6");
        assert_eq!(format_value(6.5e-12, 1), "6.5e-12");
    }
}
