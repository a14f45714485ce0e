//! Shared helpers: terminal output, tool lookup, paths

pub mod paths;
pub mod terminal;
pub mod tools;
