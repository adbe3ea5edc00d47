//! Classification thresholds.
//!
//! Defaults match common crystal-vendor guidance: a gain margin of at least 5
//! is ideal and below 3 is unsafe; a drive level above 80% of the rating
//! deserves attention and above 100% is out of specification.
//!
//! Thresholds can be overridden from TOML. Missing keys keep their default:
//!
//! ```
//! use xtalval_core::thresholds::Thresholds;
//!
//! let t = Thresholds::from_toml_str("gain_margin_ideal = 8.0").unwrap();
//! assert_eq!(t.gain_margin_ideal, 8.0);
//! assert_eq!(t.gain_margin_critical, 3.0);
//! ```

use crate::errors::{XtalError, XtalResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Gain margin below which startup is considered unsafe.
pub const GAIN_MARGIN_CRITICAL: f64 = 3.0;
/// Gain margin at or above which the design is considered robust.
pub const GM_MARGIN_THRESHOLD: f64 = 5.0;
/// Drive-level ratio above which the design is close to the rating.
pub const DRIVE_LEVEL_CAUTION: f64 = 0.8;
/// Drive-level ratio above which the rating is exceeded.
pub const DRIVE_LEVEL_LIMIT: f64 = 1.0;

/// Independently tunable classification boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Gain margin strictly below this is critical.
    ///
    /// Default: 3.0
    pub gain_margin_critical: f64,

    /// Gain margin at or above this is OK; between the two is a warning.
    ///
    /// Default: 5.0
    pub gain_margin_ideal: f64,

    /// Drive-level ratio strictly above this is a warning.
    ///
    /// Default: 0.8
    pub drive_level_caution: f64,

    /// Drive-level ratio strictly above this is critical.
    ///
    /// Default: 1.0
    pub drive_level_limit: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            gain_margin_critical: GAIN_MARGIN_CRITICAL,
            gain_margin_ideal: GM_MARGIN_THRESHOLD,
            drive_level_caution: DRIVE_LEVEL_CAUTION,
            drive_level_limit: DRIVE_LEVEL_LIMIT,
        }
    }
}

impl Thresholds {
    /// Checks that every bound is finite and that each pair is ordered.
    pub fn validate(&self) -> XtalResult<()> {
        let values = [
            ("gain_margin_critical", self.gain_margin_critical),
            ("gain_margin_ideal", self.gain_margin_ideal),
            ("drive_level_caution", self.drive_level_caution),
            ("drive_level_limit", self.drive_level_limit),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(XtalError::InvalidThresholds(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.gain_margin_critical > self.gain_margin_ideal {
            return Err(XtalError::InvalidThresholds(format!(
                "gain_margin_critical ({}) exceeds gain_margin_ideal ({})",
                self.gain_margin_critical, self.gain_margin_ideal
            )));
        }
        if self.drive_level_caution > self.drive_level_limit {
            return Err(XtalError::InvalidThresholds(format!(
                "drive_level_caution ({}) exceeds drive_level_limit ({})",
                self.drive_level_caution, self.drive_level_limit
            )));
        }
        Ok(())
    }

    /// Parses and validates thresholds from a TOML document.
    pub fn from_toml_str(content: &str) -> XtalResult<Self> {
        let thresholds: Thresholds = toml::from_str(content)?;
        thresholds.validate()?;
        if thresholds != Thresholds::default() {
            warn!(?thresholds, "using non-default thresholds");
        }
        Ok(thresholds)
    }

    /// Reads thresholds from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> XtalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| XtalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.gain_margin_critical, 3.0);
        assert_eq!(t.gain_margin_ideal, 5.0);
        assert_eq!(t.drive_level_caution, 0.8);
        assert_eq!(t.drive_level_limit, 1.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Thresholds::from_toml_str("").unwrap(), Thresholds::default());
    }

    #[test]
    fn test_partial_override() {
        let t = Thresholds::from_toml_str(
            r#"
            drive_level_caution = 0.5
            drive_level_limit = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(t.drive_level_caution, 0.5);
        assert_eq!(t.drive_level_limit, 0.9);
        assert_eq!(t.gain_margin_ideal, 5.0);
    }

    #[test]
    fn test_rejects_inverted_gain_margin_bounds() {
        let err = Thresholds::from_toml_str("gain_margin_critical = 6.0").unwrap_err();
        assert!(matches!(err, XtalError::InvalidThresholds(_)));
    }

    #[test]
    fn test_rejects_inverted_drive_level_bounds() {
        let err = Thresholds::from_toml_str("drive_level_caution = 1.5").unwrap_err();
        assert!(err.to_string().contains("drive_level_caution"));
    }

    #[test]
    fn test_rejects_non_finite() {
        let t = Thresholds {
            drive_level_limit: f64::INFINITY,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
        assert!(Thresholds::from_toml_str("gain_margin_ideal = nan").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = Thresholds::from_toml_str("gain_margin = 4.0").unwrap_err();
        assert!(matches!(err, XtalError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Thresholds::from_path("/nonexistent/thresholds.toml").unwrap_err();
        assert!(matches!(err, XtalError::Io { .. }));
    }
}
