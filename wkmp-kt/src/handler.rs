//! Per-format handler table
//!
//! Pairs each [`ContainerFormat`] with the adapter that opens it and the
//! [`FieldScheme`] naming its key field. Selected once per request.

use crate::container::{self, TagContainer};
use crate::error::TagResult;
use crate::format::{ContainerFormat, TagFamily};
use crate::resolver::FieldScheme;
use std::path::Path;

/// Capabilities needed to read and write the key of one format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHandler {
    pub format: ContainerFormat,
    pub scheme: FieldScheme,
}

impl FormatHandler {
    pub fn for_format(format: ContainerFormat) -> Self {
        let scheme = match format.family() {
            TagFamily::Id3(_) => FieldScheme::ID3,
            TagFamily::Vorbis => FieldScheme::VORBIS,
            TagFamily::Mp4 => FieldScheme::MP4,
        };
        Self { format, scheme }
    }

    pub fn open(&self, path: &Path) -> TagResult<Box<dyn TagContainer>> {
        container::open(path, self.format)
    }

    /// Read the key value; `Ok(None)` when no key field is present
    pub fn read(&self, path: &Path) -> TagResult<Option<String>> {
        let container = self.open(path)?;
        Ok(self.scheme.resolve(container.as_ref()))
    }

    /// Write `value` and save the container
    pub fn write(&self, path: &Path, value: &str) -> TagResult<()> {
        let mut container = self.open(path)?;
        self.scheme.apply(container.as_mut(), value)?;
        container.save(path)
    }
}
