//! CLI library components for the clinic appointment tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
