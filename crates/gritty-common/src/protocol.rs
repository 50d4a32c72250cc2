//! Socket wire protocol. Every event travels as one JSON text frame of the
//! form `{"event": <name>, "payload": <payload>}`.
//!
//! Connection and disconnection are transport level (WebSocket open/close)
//! and never appear as frames.

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;
use crate::geometry::{ConnectOptions, Geometry};

/// Generic frame envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WireMessage {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
    }

    fn payload_as<T: serde::de::DeserializeOwned>(self) -> Result<T, ProtocolError> {
        serde_json::from_value(self.payload).map_err(|e| {
            ProtocolError::MalformedFrame(format!("bad `{}` payload: {e}", self.event))
        })
    }
}

/// Events the terminal client sends to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum ClientEvent {
    /// One-time handshake: initial geometry and environment.
    Terminal(ConnectOptions),
    Resize(Geometry),
    /// Raw user input (keystrokes, paste).
    Data(String),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Terminal(_) => "terminal",
            ClientEvent::Resize(_) => "resize",
            ClientEvent::Data(_) => "data",
        }
    }

    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
    }

    pub fn from_frame(text: &str) -> Result<Self, ProtocolError> {
        let msg = WireMessage::parse(text)?;
        match msg.event.as_str() {
            "terminal" => Ok(ClientEvent::Terminal(msg.payload_as()?)),
            "resize" => Ok(ClientEvent::Resize(msg.payload_as()?)),
            "data" => Ok(ClientEvent::Data(msg.payload_as()?)),
            _ => Err(ProtocolError::UnknownEvent(msg.event)),
        }
    }
}

/// Events the host sends to the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum ServerEvent {
    /// Terminal output, written to the widget unmodified.
    Data(String),
}

impl ServerEvent {
    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
    }

    pub fn from_frame(text: &str) -> Result<Self, ProtocolError> {
        let msg = WireMessage::parse(text)?;
        match msg.event.as_str() {
            "data" => Ok(ServerEvent::Data(msg.payload_as()?)),
            _ => Err(ProtocolError::UnknownEvent(msg.event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn resize_frame_shape() {
        let event = ClientEvent::Resize(Geometry::clamped(80, 25));
        let value: serde_json::Value = serde_json::from_str(&event.to_frame().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"event": "resize", "payload": {"cols": 80, "rows": 25}})
        );
    }

    #[test]
    fn terminal_frame_carries_env() {
        let mut env = BTreeMap::new();
        env.insert("hello".to_string(), "world".to_string());
        let options = ConnectOptions::new(Geometry::clamped(80, 25)).with_env(env);
        let frame = ClientEvent::Terminal(options.clone()).to_frame().unwrap();

        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "terminal");
        assert_eq!(value["payload"]["env"]["hello"], "world");
        assert_eq!(
            ClientEvent::from_frame(&frame).unwrap(),
            ClientEvent::Terminal(options)
        );
    }

    #[test]
    fn data_frame_is_plain_string() {
        let frame = ClientEvent::Data("ls -la\r".into()).to_frame().unwrap();
        assert_eq!(frame, r#"{"event":"data","payload":"ls -la\r"}"#);
    }

    #[test]
    fn server_data_parses() {
        let event = ServerEvent::from_frame(r#"{"event":"data","payload":"hello"}"#).unwrap();
        assert_eq!(event, ServerEvent::Data("hello".into()));
    }

    #[test]
    fn unknown_event_is_reported_by_name() {
        let err = ClientEvent::from_frame(r#"{"event":"exit","payload":0}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(ref name) if name == "exit"));
    }

    #[test]
    fn non_json_is_malformed() {
        let err = ServerEvent::from_frame("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame(_)));
    }

    #[test]
    fn zero_resize_is_rejected() {
        let err = ClientEvent::from_frame(r#"{"event":"resize","payload":{"cols":0,"rows":0}}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame(_)));
    }

    #[test]
    fn event_names() {
        assert_eq!(ClientEvent::Data(String::new()).name(), "data");
        assert_eq!(ClientEvent::Resize(Geometry::clamped(1, 1)).name(), "resize");
    }
}
