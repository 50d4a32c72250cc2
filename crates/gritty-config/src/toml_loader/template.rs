use crate::schema::CONFIG_SCHEMA_VERSION;

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    format!(
        r##"# gritty configuration
# Schema version {CONFIG_SCHEMA_VERSION}
# Only override what you want to change -- missing fields use defaults.

[server]
url = "ws://127.0.0.1:1337/gritty"
# connect_timeout_secs = 15
# reconnect_delay_secs = 1       # 1-60
# max_reconnect_delay_secs = 30  # >= reconnect_delay_secs, <= 600

[input]
# detach_key = "ctrl-]"

[logging]
# level = "gritty=info"
# file = "gritty.log"

# Environment variables passed to the remote shell.
[env]
# EDITOR = "vim"
"##
    )
}
