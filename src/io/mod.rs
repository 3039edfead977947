//! Input/output helpers.
//!
//! - results JSON -> `Fits` (`load`)
//! - table exports (CSV/JSON) (`export`)

pub mod export;
pub mod load;

pub use export::*;
pub use load::*;
