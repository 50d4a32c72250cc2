//! gritty client configuration.
//!
//! TOML-based, with every section defaulted so partial files work. The
//! terminal widget's own options are fixed and deliberately absent here.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{GrittyConfig, InputConfig, LoggingConfig, ServerConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use gritty_common::ConfigError;

/// Read config from an explicit path, or from the platform default path
/// (creating it when missing). Not validated, so callers can apply
/// overrides first.
pub fn read_config(path: Option<&Path>) -> Result<GrittyConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// [`read_config`], then validate.
pub fn load_config(path: Option<&Path>) -> Result<GrittyConfig, ConfigError> {
    let config = read_config(path)?;
    validation::validate(&config)?;
    Ok(config)
}
