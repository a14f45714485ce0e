//! Go test output handling

pub mod output;

pub use output::print_colorized;
