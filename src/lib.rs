//! Crystal oscillator drive validation.
//!
//! Re-exports the engine from `xtalval-core` and adds the TOML input file
//! format used by the `xtalval` binary.

pub mod input;

pub use xtalval_core::*;
