//! Full configuration validation.
//!
//! Collects every problem into one `ValidationError` instead of stopping at
//! the first.

mod helpers;

use crate::schema::GrittyConfig;
use gritty_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GrittyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    // Server
    validate_ws_url(&mut errors, "server.url", &config.server.url);
    validate_range(
        &mut errors,
        "server.connect_timeout_secs",
        config.server.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        &mut errors,
        "server.reconnect_delay_secs",
        config.server.reconnect_delay_secs,
        1,
        60,
    );
    validate_range(
        &mut errors,
        "server.max_reconnect_delay_secs",
        config.server.max_reconnect_delay_secs,
        config.server.reconnect_delay_secs,
        600,
    );

    // Input
    if config.input.detach_char().is_none() {
        errors.push(format!(
            "input.detach_key = {:?} must look like \"ctrl-]\" or \"ctrl-q\"",
            config.input.detach_key
        ));
    }

    // Logging
    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }
    if config.logging.file.trim().is_empty() {
        errors.push("logging.file must not be empty".into());
    }

    // Environment
    for key in config.env.keys() {
        if key.is_empty() || key.contains('=') || key.contains('\0') {
            errors.push(format!("env key {key:?} is not a valid variable name"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_ws_url(errors: &mut Vec<String>, name: &str, url: &str) {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => {}
        Some(_) => errors.push(format!("{name} = {url:?} has no host")),
        None => errors.push(format!("{name} = {url:?} must start with ws:// or wss://")),
    }
}

#[cfg(test)]
mod tests;
