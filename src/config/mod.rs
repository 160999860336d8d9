//! Configuration: `dexec/config.toml` plus environment overrides.

mod loader;
mod types;

pub use loader::{ConfigError, CONFIG_ENV, TIMEOUT_ENV};
pub use types::{Config, Defaults, ImageEntry};
