//! kmgen version information.
//!
//! The version is stamped into generated file headers and reported by `kmgen --version`, so both read
//! it from here.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The kmgen version string (for example, `0.3.0`).
pub const KMGEN_VERSION: &str = env!("CARGO_PKG_VERSION");
