mod cli;
mod logging;

use std::io;
use std::process::ExitCode;

use gritty_client::{
    set_cursor_blink, spawn_input_reader, SocketClient, SocketConfig, TerminalBridge,
    TerminalWidget, WidgetOptions,
};
use gritty_common::Result;
use gritty_config::GrittyConfig;
use tokio::sync::mpsc;

/// Put the host terminal back into cooked mode before the panic message is
/// printed, so it stays readable.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        eprintln!("\n--- gritty crashed ---");
        default_hook(info);
    }));
}

/// Config file plus command-line overrides, validated once as a whole.
fn load_config(args: &cli::Args) -> Result<GrittyConfig> {
    let mut config = gritty_config::read_config(args.config.as_deref())?;
    if let Some(url) = &args.url {
        config.server.url = url.clone();
    }
    config.env.extend(args.env.iter().cloned());
    gritty_config::validation::validate(&config)?;
    Ok(config)
}

async fn run(config: GrittyConfig) -> Result<()> {
    let (term_tx, term_rx) = mpsc::unbounded_channel();
    let (host_tx, host_rx) = mpsc::unbounded_channel();

    let widget = TerminalWidget::open(WidgetOptions::default(), term_tx.clone())?;
    let (socket, socket_rx) = SocketClient::connect(SocketConfig::from(&config.server));
    let input = spawn_input_reader(config.input.detach_char(), term_tx, host_tx);

    let blink = |on: bool| {
        if let Err(e) = set_cursor_blink(&mut io::stdout(), on) {
            tracing::warn!(error = %e, "Failed to set cursor style");
        }
    };
    let mut bridge = TerminalBridge::new(widget, socket, blink, config.env);

    let result = bridge.run(socket_rx, term_rx, host_rx).await;

    input.abort();
    let (mut widget, socket) = bridge.into_parts();
    socket.close();
    let restored = widget.close();
    result.and(restored)
}

#[tokio::main]
async fn main() -> ExitCode {
    install_panic_hook();

    let args = cli::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gritty: {e}");
            return ExitCode::FAILURE;
        }
    };

    let directive = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_str());
    match logging::init(directive, &config.logging.file) {
        Ok(path) => tracing::debug!(path = %path.display(), "Logging to file"),
        Err(e) => eprintln!("gritty: logging disabled: {e}"),
    }

    tracing::info!(
        url = %config.server.url,
        "gritty v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "gritty exited with an error");
            eprintln!("gritty: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use gritty_common::{ConfigError, GrittyError};

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn cli_url_replaces_invalid_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\nurl = \"http://wrong\"\n");
        let args = cli::Args::try_parse_from([
            "gritty",
            "ws://good-host:1337/gritty",
            "--config",
            path.as_str(),
        ])
        .unwrap();

        let config = load_config(&args).unwrap();
        assert_eq!(config.server.url, "ws://good-host:1337/gritty");
    }

    #[test]
    fn invalid_file_url_without_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\nurl = \"http://wrong\"\n");
        let args = cli::Args::try_parse_from(["gritty", "--config", path.as_str()]).unwrap();

        let err = load_config(&args).unwrap_err();
        assert!(matches!(
            err,
            GrittyError::Config(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn cli_env_is_merged_over_file_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[env]\nEDITOR = \"nano\"\nLANG = \"C\"\n");
        let args =
            cli::Args::try_parse_from(["gritty", "--config", path.as_str(), "-e", "EDITOR=vim"])
                .unwrap();

        let config = load_config(&args).unwrap();
        assert_eq!(config.env.get("EDITOR").map(String::as_str), Some("vim"));
        assert_eq!(config.env.get("LANG").map(String::as_str), Some("C"));
    }
}
