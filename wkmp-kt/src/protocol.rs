//! Line-delimited JSON protocol types
//!
//! Inbound, one object per line:
//! ```text
//! {"id": "uuid", "path": "/music/file.mp3", "key": "9A"}   write
//! {"id": "uuid", "path": "/music/file.mp3"}                read
//! ```
//! Outbound, one [`ServerMessage`] per line:
//! ```text
//! {"type": "ready"}
//! {"type": "heartbeat"}
//! {"id": "uuid", "status": "success", "key": "9A", "filename": "file.mp3", "format": "mp3"}
//! {"id": "uuid", "status": "error", "error": "File not found", "filename": "file.mp3"}
//! ```
//! Both directions are mapped field by field rather than derived, so the
//! wire shape stays fixed regardless of how the Rust types evolve.

use crate::error::TagError;
use crate::format::ContainerFormat;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::path::{Component, Path};
use thiserror::Error;

/// Correlation id used when a request carries none
pub const UNKNOWN_ID: &str = "unknown";

/// Filename reported when a request carries no path
pub const UNKNOWN_FILENAME: &str = "unknown";

/// Problems turning one input line into a [`Request`]
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Line is not UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Line is not JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Line is JSON but not an object
    #[error("Request is not a JSON object")]
    NotAnObject,

    /// Object has a field of the wrong type; still answerable by id
    #[error("'{field}' must be a string")]
    InvalidField {
        id: String,
        path: String,
        field: &'static str,
    },
}

impl ProtocolError {
    /// Malformed lines are dropped without a response
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ProtocolError::InvalidField { .. })
    }
}

/// One key read or write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Opaque correlation token echoed in the response
    pub id: String,
    /// Filesystem path as sent by the client (may be empty)
    pub path: String,
    /// Key to write; `None` (absent, null or empty) means read
    pub key: Option<String>,
}

impl Request {
    /// Parse one raw input line
    pub fn from_line(line: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(line)?;
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(object) => Self::from_object(&object),
            _ => Err(ProtocolError::NotAnObject),
        }
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ProtocolError> {
        let id = match object.get("id") {
            None | Some(Value::Null) => UNKNOWN_ID.to_string(),
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
        };

        let path = match object.get("path") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(path)) => path.clone(),
            Some(_) => {
                return Err(ProtocolError::InvalidField {
                    id,
                    path: String::new(),
                    field: "path",
                })
            }
        };

        let key = match object.get("key") {
            None | Some(Value::Null) => None,
            Some(Value::String(key)) if key.is_empty() => None,
            Some(Value::String(key)) => Some(key.clone()),
            Some(_) => {
                return Err(ProtocolError::InvalidField {
                    id,
                    path,
                    field: "key",
                })
            }
        };

        Ok(Self { id, path, key })
    }

    pub fn is_write(&self) -> bool {
        self.key.is_some()
    }

    /// Final path segment as reported in responses
    pub fn filename(&self) -> String {
        filename_of(&self.path)
    }
}

/// Final segment of `path`, or [`UNKNOWN_FILENAME`] for an empty path
///
/// A path with no named segment (`/`, `.`) yields an empty filename.
pub fn filename_of(path: &str) -> String {
    if path.is_empty() {
        return UNKNOWN_FILENAME.to_string();
    }
    Path::new(path)
        .components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .next_back()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Everything the server writes to its output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Sent once after the worker pool is up
    Ready,
    /// Periodic liveness signal
    Heartbeat,
    /// Successful read or write
    Success {
        id: String,
        /// `None` serializes as `null`: the file has no key field
        key: Option<String>,
        filename: String,
        format: ContainerFormat,
    },
    /// Any answerable failure
    Error {
        id: String,
        error: String,
        filename: String,
    },
}

impl ServerMessage {
    pub fn success(
        id: impl Into<String>,
        key: Option<String>,
        filename: impl Into<String>,
        format: ContainerFormat,
    ) -> Self {
        ServerMessage::Success {
            id: id.into(),
            key,
            filename: filename.into(),
            format,
        }
    }

    pub fn error(id: impl Into<String>, error: impl ToString, filename: impl Into<String>) -> Self {
        ServerMessage::Error {
            id: id.into(),
            error: error.to_string(),
            filename: filename.into(),
        }
    }

    /// Error response for a request that could not be processed
    pub fn from_tag_error(request: &Request, error: &TagError) -> Self {
        Self::error(request.id.clone(), error, request.filename())
    }

    /// Correlation id, if this is a response
    pub fn id(&self) -> Option<&str> {
        match self {
            ServerMessage::Success { id, .. } | ServerMessage::Error { id, .. } => Some(id),
            ServerMessage::Ready | ServerMessage::Heartbeat => None,
        }
    }

    /// Serialize to a single JSON line (without the trailing newline)
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for ServerMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ServerMessage::Ready => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", "ready")?;
                map.end()
            }
            ServerMessage::Heartbeat => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", "heartbeat")?;
                map.end()
            }
            ServerMessage::Success {
                id,
                key,
                filename,
                format,
            } => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("id", id)?;
                map.serialize_entry("status", "success")?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("filename", filename)?;
                map.serialize_entry("format", format.as_str())?;
                map.end()
            }
            ServerMessage::Error {
                id,
                error,
                filename,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("id", id)?;
                map.serialize_entry("status", "error")?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("filename", filename)?;
                map.end()
            }
        }
    }
}
