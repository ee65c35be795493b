//! Staged Tree Scanning
//!
//! Deterministic enumeration of the files under a staged package directory,
//! expressed as package-relative, forward-slash paths.

pub mod path;
pub mod walker;
