//! Tidy tables: the single output type of every extractor.
//!
//! - `value`: scalar cells
//! - `frame`: columns, tables, concatenation with column union
//! - `convert`: key/value map <-> two-column table helpers

pub mod convert;
pub mod frame;
pub mod value;

pub use convert::*;
pub use frame::*;
pub use value::*;
