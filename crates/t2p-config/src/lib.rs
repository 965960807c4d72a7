//! # t2p Config
//!
//! TOML configuration for the t2p CLI: file locations, the current user,
//! LLM settings, and named approval teams. Everything is optional; a
//! missing config file yields the defaults.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{Config, FilesConfig, LlmConfig};
