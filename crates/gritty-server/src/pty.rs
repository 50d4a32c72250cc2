//! Remote shell PTY: spawn with a sanitized environment, then relay input,
//! output and resizes.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::thread;

use gritty_common::{ConnectOptions, Geometry, GrittyError, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use tokio::sync::mpsc;

/// Maximum bytes read from the PTY in one go (8 KB).
pub const PTY_READ_CHUNK: usize = 8_192;

/// Output chunks buffered between the reader thread and the connection.
const OUTPUT_CHANNEL_SIZE: usize = 64;

/// Environment variables inherited from the server process. Everything else
/// is dropped so server-side secrets never reach a remote shell.
const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME", "USER", "LOGNAME", "SHELL", "PATH", "LANG", "LC_ALL", "LC_CTYPE", "TMPDIR", "TMP",
    "TEMP",
];

/// The user's default shell: `$SHELL`, falling back to `/bin/sh`.
pub fn default_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

/// Whether a client-supplied variable name can be passed to a process.
fn valid_env_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}

/// Build the command for `program` (or a login shell when `None`).
///
/// The environment is the allow-listed part of ours, `TERM=xterm-256color`,
/// then the client's variables, which win on conflict.
fn build_command(program: Option<&str>, client_env: Option<&BTreeMap<String, String>>) -> CommandBuilder {
    let mut cmd = match program {
        Some(program) => {
            let mut parts = program.split_whitespace();
            let mut cmd = CommandBuilder::new(parts.next().unwrap_or(program));
            cmd.args(parts);
            cmd
        }
        None => {
            let mut cmd = CommandBuilder::new(default_shell());
            cmd.arg("-l");
            cmd
        }
    };

    cmd.env_clear();
    for key in ALLOWED_ENV_VARS {
        if let Ok(val) = std::env::var(key) {
            cmd.env(key, val);
        }
    }
    cmd.env("TERM", "xterm-256color");

    for (key, value) in client_env.into_iter().flatten() {
        if valid_env_key(key) {
            cmd.env(key, value);
        } else {
            tracing::warn!(key = %key, "Ignoring invalid environment variable name");
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        cmd.cwd(home);
    }
    cmd
}

fn pty_size(geometry: Geometry) -> PtySize {
    PtySize {
        rows: geometry.rows,
        cols: geometry.cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// A running shell on the master side of a PTY pair.
///
/// Input goes through a writer thread so a full PTY input queue blocks that
/// thread instead of the connection task that drains the output.
pub struct PtySession {
    input_tx: mpsc::UnboundedSender<Vec<u8>>,
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    geometry: Geometry,
}

impl PtySession {
    /// Spawn `program` sized and configured from the client's handshake.
    ///
    /// Output is read on a background thread and delivered in chunks on the
    /// returned receiver, which closes when the shell exits.
    pub fn spawn(
        program: Option<&str>,
        options: &ConnectOptions,
    ) -> Result<(Self, mpsc::Receiver<Vec<u8>>)> {
        let pair = native_pty_system()
            .openpty(pty_size(options.geometry))
            .map_err(|e| GrittyError::Terminal(format!("failed to open PTY: {e}")))?;

        let cmd = build_command(program, options.env.as_ref());
        let child = pair.slave.spawn_command(cmd).map_err(|e| {
            let program = program.map(str::to_string).unwrap_or_else(default_shell);
            GrittyError::Terminal(format!("failed to spawn '{program}': {e}"))
        })?;
        drop(pair.slave);

        let mut writer = pair
            .master
            .take_writer()
            .map_err(|e| GrittyError::Terminal(format!("failed to take PTY writer: {e}")))?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| GrittyError::Terminal(format!("failed to clone PTY reader: {e}")))?;

        let (tx, rx) = mpsc::channel::<Vec<u8>>(OUTPUT_CHANNEL_SIZE);
        thread::Builder::new()
            .name("pty-reader".to_string())
            .spawn(move || {
                let mut buf = [0u8; PTY_READ_CHUNK];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.blocking_send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "PTY reader stopped");
                            break;
                        }
                    }
                }
            })?;

        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        thread::Builder::new()
            .name("pty-writer".to_string())
            .spawn(move || {
                while let Some(data) = input_rx.blocking_recv() {
                    if let Err(e) = writer.write_all(&data).and_then(|()| writer.flush()) {
                        tracing::debug!(error = %e, "PTY writer stopped");
                        break;
                    }
                }
            })?;

        let session = Self {
            input_tx,
            master: pair.master,
            child,
            geometry: options.geometry,
        };
        Ok((session, rx))
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Queue client input for the shell. Never blocks.
    pub fn write_input(&mut self, data: &[u8]) -> Result<()> {
        self.input_tx
            .send(data.to_vec())
            .map_err(|_| GrittyError::Terminal("PTY writer has stopped".into()))
    }

    pub fn resize(&mut self, geometry: Geometry) -> Result<()> {
        self.master
            .resize(pty_size(geometry))
            .map_err(|e| GrittyError::Terminal(format!("PTY resize failed: {e}")))?;
        self.geometry = geometry;
        Ok(())
    }

    /// Kill the shell and reap it off the async runtime.
    pub fn shutdown(mut self) {
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "PTY kill failed (may already be dead)");
        }
        let mut child = self.child;
        tokio::task::spawn_blocking(move || match child.wait() {
            Ok(status) => tracing::debug!(code = status.exit_code(), "Shell reaped"),
            Err(e) => tracing::debug!(error = %e, "PTY wait failed"),
        });
    }
}
