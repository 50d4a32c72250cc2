//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the gritty client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrittyConfig {
    pub server: ServerConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
    /// Environment variables sent to the remote shell with the handshake.
    pub env: BTreeMap<String, String>,
}

/// Connection to the remote terminal host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// WebSocket URL of the terminal host.
    pub url: String,
    /// Give up on a single connection attempt after this many seconds.
    pub connect_timeout_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:1337/gritty".into(),
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Key that detaches from the remote terminal, e.g. `"ctrl-]"`.
    pub detach_key: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            detach_key: "ctrl-]".into(),
        }
    }
}

impl InputConfig {
    /// The character pressed together with Ctrl to detach, if `detach_key`
    /// is well formed. Letters are normalized to lowercase.
    pub fn detach_char(&self) -> Option<char> {
        let key = self.detach_key.trim().to_ascii_lowercase();
        let rest = key.strip_prefix("ctrl-").or_else(|| key.strip_prefix("ctrl+"))?;
        let mut chars = rest.chars();
        let ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match ch {
            'a'..='z' | '@' | '[' | '\\' | ']' | '^' | '_' => Some(ch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive.
    pub level: String,
    /// Log file name inside the platform data directory.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "gritty=info".into(),
            file: "gritty.log".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_host() {
        let config = GrittyConfig::default();
        assert_eq!(config.server.url, "ws://127.0.0.1:1337/gritty");
        assert_eq!(config.server.reconnect_delay_secs, 1);
        assert_eq!(config.server.max_reconnect_delay_secs, 30);
        assert_eq!(config.input.detach_key, "ctrl-]");
        assert!(config.env.is_empty());
    }

    #[test]
    fn detach_char_parsing() {
        let input = |key: &str| InputConfig {
            detach_key: key.into(),
        };
        assert_eq!(input("ctrl-]").detach_char(), Some(']'));
        assert_eq!(input("Ctrl+Q").detach_char(), Some('q'));
        assert_eq!(input("ctrl-").detach_char(), None);
        assert_eq!(input("ctrl-ab").detach_char(), None);
        assert_eq!(input("alt-x").detach_char(), None);
        assert_eq!(input("ctrl-1").detach_char(), None);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: GrittyConfig = toml::from_str("").unwrap();
        assert_eq!(config, GrittyConfig::default());
    }

    #[test]
    fn env_table_parses() {
        let config: GrittyConfig = toml::from_str(
            r#"
[env]
EDITOR = "vim"
LANG = "en_US.UTF-8"
"#,
        )
        .unwrap();
        assert_eq!(config.env.get("EDITOR").map(String::as_str), Some("vim"));
        assert_eq!(config.env.len(), 2);
    }
}
