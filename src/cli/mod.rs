//! Command-line interface for contentverify.

mod commands;
pub mod icons;
pub mod progress;
pub mod render;

pub use commands::{is_verbose, run};
