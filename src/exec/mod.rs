//! External process execution

pub mod subprocess;

pub use subprocess::{command_line, run_checked, run_command, EnvMap};
