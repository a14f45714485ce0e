//! Project configuration
//!
//! Reads `Gotasks.toml` and fills in defaults for everything it omits.

mod gotasks_toml;
mod validation;

pub use gotasks_toml::{GotasksConfig, CONFIG_FILE};
