//! gritty-server: serves a login shell per WebSocket connection to gritty
//! clients.
//!
//! Each connection sends a `terminal` handshake carrying its geometry and
//! environment, gets a fresh PTY, and then exchanges `data` and `resize`
//! events with it until either side goes away.

mod connection;
mod decoder;
mod pty;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tracing_subscriber::EnvFilter;

use crate::connection::{handle_connection, ServerOptions};

#[derive(Parser, Debug)]
#[command(name = "gritty-server", version, about = "Terminal host for gritty clients")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 1337)]
    port: u16,

    /// Program to run for each client instead of the user's login shell.
    #[arg(short, long)]
    command: Option<String>,

    /// Seconds a client has to send its terminal handshake.
    #[arg(long, default_value_t = 10)]
    handshake_timeout: u64,

    /// Log level override (e.g. `gritty_server=debug`).
    #[arg(long)]
    log_level: Option<String>,
}

/// `--log-level` if given, else `RUST_LOG`, else `gritty_server=info`.
/// A malformed directive also falls back to the default.
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    let filter = match log_level {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    filter.unwrap_or_else(|| EnvFilter::new("gritty_server=info"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(args.log_level.as_deref()))
        .init();

    let addr = format!("{}:{}", args.host, args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind TCP listener");
            return ExitCode::FAILURE;
        }
    };

    let options = Arc::new(ServerOptions {
        command: args.command,
        handshake_timeout: Duration::from_secs(args.handshake_timeout),
    });
    tracing::info!(
        command = options.command.as_deref().unwrap_or("login shell"),
        "gritty-server listening on {}",
        addr
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let options = Arc::clone(&options);
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, &options).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_flag_sets_the_filter() {
        let filter = env_filter(Some("gritty_server=debug"));
        assert!(filter.to_string().contains("gritty_server=debug"));
    }

    #[test]
    fn malformed_log_level_falls_back() {
        let filter = env_filter(Some("gritty_server=["));
        assert!(filter.to_string().contains("gritty_server=info"));
    }

    #[test]
    fn args_defaults() {
        let args = Args::try_parse_from(["gritty-server"]).unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 1337);
        assert_eq!(args.handshake_timeout, 10);
        assert!(args.command.is_none());
    }
}
