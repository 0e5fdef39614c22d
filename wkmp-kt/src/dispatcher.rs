//! Request dispatch
//!
//! Turns one input line into at most one [`ServerMessage`]. Malformed
//! lines (not UTF-8, not JSON, not an object) are logged and produce no
//! response; every other line is answered exactly once, including when
//! the tag operation panics.

use crate::error::TagError;
use crate::protocol::{
    filename_of, ProtocolError, Request, ServerMessage, UNKNOWN_FILENAME, UNKNOWN_ID,
};
use crate::tagger::{read_key, write_key};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// Fallback message when a failed read carries no text
const READ_FAILED: &str = "Failed to read key";

/// Parse, process and answer one input line
///
/// Blocking: runs the tag operation on the calling thread.
pub fn handle_line(line: &[u8]) -> Option<ServerMessage> {
    let request = match Request::from_line(line) {
        Ok(request) => request,
        Err(e) if e.is_malformed() => {
            warn!("Dropping malformed request line: {}", e);
            return None;
        }
        Err(e) => return Some(invalid_request(&e)),
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| process(&request)));
    Some(outcome.unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        warn!(id = %request.id, path = %request.path, "Request panicked: {}", message);
        ServerMessage::from_tag_error(&request, &TagError::Unexpected(message))
    }))
}

/// Run a parsed request against the filesystem
pub fn process(request: &Request) -> ServerMessage {
    let path = Path::new(&request.path);
    if request.path.is_empty() || !path.exists() {
        debug!(id = %request.id, path = %request.path, "File not found");
        return ServerMessage::from_tag_error(request, &TagError::FileNotFound);
    }

    match &request.key {
        None => {
            debug!(id = %request.id, path = %request.path, "Reading key");
            match read_key(path) {
                Ok(reading) => ServerMessage::success(
                    request.id.clone(),
                    reading.key,
                    request.filename(),
                    reading.format,
                ),
                Err(e) => {
                    let message = e.to_string();
                    let message = if message.is_empty() {
                        READ_FAILED.to_string()
                    } else {
                        message
                    };
                    ServerMessage::error(request.id.clone(), message, request.filename())
                }
            }
        }
        Some(key) => {
            debug!(id = %request.id, path = %request.path, key = %key, "Writing key");
            match write_key(path, key) {
                Ok(format) => ServerMessage::success(
                    request.id.clone(),
                    Some(key.clone()),
                    request.filename(),
                    format,
                ),
                Err(e) => ServerMessage::from_tag_error(request, &e),
            }
        }
    }
}

fn invalid_request(error: &ProtocolError) -> ServerMessage {
    let cause = TagError::InvalidRequest(error.to_string());
    match error {
        ProtocolError::InvalidField { id, path, .. } => {
            ServerMessage::error(id.clone(), cause, filename_of(path))
        }
        _ => ServerMessage::error(UNKNOWN_ID, cause, UNKNOWN_FILENAME),
    }
}

/// Text carried by a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unexpected failure".to_string()
    }
}
