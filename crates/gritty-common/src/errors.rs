use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures decoding or validating a socket frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("invalid geometry {cols}x{rows}: cols and rows must be positive")]
    InvalidGeometry { cols: u16, rows: u16 },
}

#[derive(Debug, thiserror::Error)]
pub enum GrittyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("socket error: {0}")]
    Socket(String),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("server.url is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: server.url is empty"
        );
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::UnknownEvent("exit".into());
        assert_eq!(err.to_string(), "unknown event: exit");

        let err = ProtocolError::InvalidGeometry { cols: 0, rows: 25 };
        assert_eq!(
            err.to_string(),
            "invalid geometry 0x25: cols and rows must be positive"
        );
    }

    #[test]
    fn gritty_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GrittyError = config_err.into();
        assert!(matches!(err, GrittyError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn gritty_error_from_protocol() {
        let err: GrittyError = ProtocolError::MalformedFrame("eof".into()).into();
        assert!(matches!(err, GrittyError::Protocol(_)));
        assert_eq!(err.to_string(), "malformed frame: eof");
    }

    #[test]
    fn gritty_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: GrittyError = io_err.into();
        assert!(matches!(err, GrittyError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn gritty_error_other_variants() {
        let err = GrittyError::Socket("connection refused".into());
        assert_eq!(err.to_string(), "socket error: connection refused");

        let err = GrittyError::Terminal("raw mode unavailable".into());
        assert_eq!(err.to_string(), "terminal error: raw mode unavailable");

        let err = GrittyError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
