//! Data models

pub mod prediction;
pub mod explanation;

pub use prediction::*;
pub use explanation::*;
