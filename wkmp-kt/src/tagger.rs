//! Key read and write operations
//!
//! Both operations take a path the caller has already checked exists,
//! classify it by extension and delegate to the matching
//! [`FormatHandler`]. Every failure comes back as a [`TagError`]; nothing
//! here panics on bad input.

use crate::error::TagResult;
use crate::format::ContainerFormat;
use crate::handler::FormatHandler;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Result of a successful key read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReading {
    /// Key value, `None` when the file carries no key field
    pub key: Option<String>,
    pub format: ContainerFormat,
}

/// Read the musical key stored in `path`
pub fn read_key(path: &Path) -> TagResult<KeyReading> {
    let format = ContainerFormat::from_path(path)?;
    let key = FormatHandler::for_format(format).read(path)?;

    debug!(file = %path.display(), %format, key = ?key, "Read key");
    Ok(KeyReading { key, format })
}

/// Write `key` into `path`, returning the detected format
///
/// The value is stored verbatim. After saving, the file is flushed to disk
/// on a best-effort basis.
pub fn write_key(path: &Path, key: &str) -> TagResult<ContainerFormat> {
    let format = ContainerFormat::from_path(path)?;
    FormatHandler::for_format(format).write(path, key)?;
    sync_file(path);

    debug!(file = %path.display(), %format, key, "Wrote key");
    Ok(format)
}

/// Force file contents to disk, ignoring any failure
pub fn sync_file(path: &Path) {
    if let Err(e) = File::open(path).and_then(|file| file.sync_all()) {
        debug!(file = %path.display(), error = %e, "Best-effort sync failed");
    }
}
