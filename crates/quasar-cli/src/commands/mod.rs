//! CLI command implementations.

pub mod gates;
pub mod parse;
pub mod version;
