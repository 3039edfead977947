//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - operation kinds, container keys and extractor options (`types`)
//! - the leaf result trait and the nested input tree (`fits`)

pub mod fits;
pub mod types;

pub use fits::*;
pub use types::*;
