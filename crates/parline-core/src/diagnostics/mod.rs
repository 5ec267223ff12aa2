//! Diagnostics model
//!
//! Rule findings, their locations and suggested fixes, plus the source map
//! used to turn byte offsets into user-facing positions.

mod source_map;
pub mod types;

pub use source_map::SourceMap;
pub use types::*;
