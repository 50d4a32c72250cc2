//! Where the config file lives, and writing the commented default.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gritty_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "gritty";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/gritty/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

fn io_failure(action: &str, path: &Path, e: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("failed to {action} {}: {e}", path.display()))
}

/// Write the default config to `path`, creating parent directories. A file
/// that already exists is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_failure("create config directory", dir, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(io_failure("create", path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_failure("write default config to", path, e))?;

    info!(path = %path.display(), "Created default config");
    Ok(())
}
