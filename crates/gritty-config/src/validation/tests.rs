//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = GrittyConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn accepts_secure_websocket_url() {
    let mut config = GrittyConfig::default();
    config.server.url = "wss://shell.example.com:443/gritty".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_http_url() {
    let mut config = GrittyConfig::default();
    config.server.url = "http://localhost:1337".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.url"));
    assert!(err.contains("ws://"));
}

#[test]
fn catches_url_without_host() {
    let mut config = GrittyConfig::default();
    config.server.url = "ws:///gritty".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("has no host"));
}

#[test]
fn catches_zero_reconnect_delay() {
    let mut config = GrittyConfig::default();
    config.server.reconnect_delay_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.reconnect_delay_secs"));
}

#[test]
fn catches_max_delay_below_base_delay() {
    let mut config = GrittyConfig::default();
    config.server.reconnect_delay_secs = 10;
    config.server.max_reconnect_delay_secs = 5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.max_reconnect_delay_secs"));
}

#[test]
fn catches_bad_detach_key() {
    let mut config = GrittyConfig::default();
    config.input.detach_key = "alt-x".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("input.detach_key"));
}

#[test]
fn catches_bad_env_key() {
    let mut config = GrittyConfig::default();
    config.env.insert("A=B".into(), "c".into());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("env key"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = GrittyConfig::default();
    config.server.url = String::new();
    config.logging.level = " ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.url"));
    assert!(err.contains("logging.level"));
}
