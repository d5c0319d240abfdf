//! Built-in benchmark layouts: column schemas, variants and styling.

pub mod network;
pub mod processes;
