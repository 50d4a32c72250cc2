//! Terminal geometry and the handshake payload built from it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// Terminal size in character cells. Both dimensions are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct Geometry {
    pub cols: u16,
    pub rows: u16,
}

#[derive(Deserialize)]
struct RawGeometry {
    cols: u16,
    rows: u16,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = ProtocolError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Geometry::new(raw.cols, raw.rows)
    }
}

impl Geometry {
    pub fn new(cols: u16, rows: u16) -> Result<Self, ProtocolError> {
        if cols == 0 || rows == 0 {
            return Err(ProtocolError::InvalidGeometry { cols, rows });
        }
        Ok(Self { cols, rows })
    }

    /// Build a geometry from a measured size, clamping each side to at least 1.
    pub fn clamped(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Payload of the `terminal` handshake: the current geometry plus optional
/// environment variables for the remote shell.
///
/// Serializes flat, e.g. `{"cols":80,"rows":25,"env":{"hello":"world"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

impl ConnectOptions {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            env: None,
        }
    }

    /// Attach an environment map. An empty map is treated as no environment.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = if env.is_empty() { None } else { Some(env) };
        self
    }
}
