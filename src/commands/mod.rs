//! Command implementations
//!
//! Each command module provides a clap-derived struct with an execute
//! method, or a plain function for commands that take no arguments.

pub mod build;
pub mod check;
pub mod ci;
pub mod clean;
pub mod run;
pub mod targets;
pub mod test;
