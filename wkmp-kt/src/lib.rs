//! # WKMP Key Tagger Library (wkmp-kt)
//!
//! Reads and writes the musical key (e.g. "9A", "E minor") stored in audio
//! file tags, driven by line-delimited JSON over stdin/stdout.
//!
//! **Purpose:** Lets a host process offload per-file tag I/O to one
//! long-running helper instead of spawning a process per file.
//!
//! **Architecture:** [`server`] reads lines and feeds a worker pool;
//! [`dispatcher`] turns each line into a [`tagger`] call; [`resolver`]
//! decides which tag field holds the key; [`container`] adapters do the
//! file I/O through `id3` and `lofty`.

pub mod config;
pub mod container;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod handler;
pub mod protocol;
pub mod resolver;
pub mod server;
pub mod tagger;

pub use error::{TagError, TagResult};
pub use format::ContainerFormat;
pub use protocol::{Request, ServerMessage};
pub use server::{Server, ServerState};
pub use tagger::{read_key, write_key, KeyReading};
