pub mod errors;
pub mod geometry;
pub mod id;
pub mod protocol;

pub use errors::{ConfigError, GrittyError, ProtocolError};
pub use geometry::{ConnectOptions, Geometry};
pub use id::ConnectionId;
pub use protocol::{ClientEvent, ServerEvent, WireMessage};

pub type Result<T> = std::result::Result<T, GrittyError>;
