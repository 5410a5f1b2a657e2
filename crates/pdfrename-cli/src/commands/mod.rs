//! CLI command implementations.

pub mod boxes;
pub mod inputs;
pub mod rename;
