//! `tidyfit` library crate.
//!
//! Turns fit results, or arbitrarily nested lists and maps of them, into tidy
//! tables: `glance` (one row per fit), `tidy` (one row per parameter) and
//! `augment` (one row per data point).
//!
//! The binary (`tidyfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - new result types plug in through the registry without touching dispatch

pub mod app;
pub mod cli;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod registry;
pub mod report;
pub mod table;

pub use dispatch::{Tidier, augment, glance, tidy};
pub use domain::{ExtractOptions, Fits, FitResult, Kind};
pub use error::{Result, TidyError};
pub use table::{Table, Value};
