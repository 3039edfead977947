//! Terminal output.
//!
//! Formatting lives here so the extraction code never deals with text layout.

pub mod format;

pub use format::*;
