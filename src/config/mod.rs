//! Configuration and CLI handling

pub mod cli;
pub mod settings;

pub use cli::{Cli, DEFAULT_OUTPUT};
pub use settings::Settings;
