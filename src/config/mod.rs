//! Configuration management for apidocs

pub mod config;


pub use config::{Config, CONFIG_FILE_NAMES};
pub use apidocs_mock::{CyclePolicy, MockConfig, OutputFormat};
