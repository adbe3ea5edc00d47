//! Unit symbols and conversion to base SI.
//!
//! Every parameter arrives as a number plus a unit symbol picked from a short
//! list (`pF`, `nF`, `F`, ...). The engine works exclusively in SI base units
//! (hertz, farads, ohms, watts, siemens, volts), so the first step of every
//! run is multiplying by the factor registered here.
//!
//! ```
//! use xtalval_core::units::UNIT_REGISTRY;
//!
//! let c = 22.0 * UNIT_REGISTRY.multiplier_for("pF").unwrap();
//! assert!((c - 22e-12).abs() < 1e-24);
//! ```
//!
//! # Module Structure
//!
//! - [`quantity`]: Physical quantities (frequency, capacitance, ...)
//! - [`registry`]: The fixed unit table and lookups

pub mod quantity;
pub mod registry;

pub use quantity::Quantity;
pub use registry::{UnitInfo, UnitRegistry, UNIT_REGISTRY};
