//! Vorbis comment adapter for flac and ogg
//!
//! Comment keys are kept exactly as stored in the file; lookups and
//! replacement ignore case, the way Vorbis readers treat field names.
//!
//! FLAC files are saved through the whole [`FlacFile`], so PICTURE blocks
//! (which lofty keeps outside the comment tag) are written back.

use super::{matching_names, FieldValue, TagContainer};
use crate::error::{TagError, TagResult};
use crate::format::ContainerFormat;
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::ogg::{VorbisComments, VorbisFile};
use lofty::tag::TagExt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

const FLAC_MARKER: &[u8] = b"fLaC";
const FLAC_BLOCK_HEADER_LEN: usize = 4;
const FLAC_LAST_BLOCK: u8 = 0x80;
const FLAC_BLOCK_PADDING: u8 = 1;
const FLAC_PADDING_LEN: usize = 1024;

/// Vorbis comments read from one FLAC or Ogg Vorbis file
pub struct VorbisContainer {
    comments: VorbisComments,
    /// Parsed FLAC file (pictures included); `None` for Ogg
    flac: Option<FlacFile>,
}

impl VorbisContainer {
    pub fn open(path: &Path, format: ContainerFormat) -> TagResult<Self> {
        let mut file = File::open(path)?;
        let options = ParseOptions::new().read_properties(false);

        let (comments, flac) = match format {
            ContainerFormat::Flac => {
                let flac = FlacFile::read_from(&mut file, options)?;
                let comments = flac.vorbis_comments().cloned().unwrap_or_default();
                (comments, Some(flac))
            }
            ContainerFormat::Ogg => {
                let ogg = VorbisFile::read_from(&mut file, options)?;
                (ogg.vorbis_comments().clone(), None)
            }
            other => {
                return Err(TagError::Container(format!(
                    "{} does not carry Vorbis comments",
                    other
                )))
            }
        };

        Ok(Self { comments, flac })
    }

    #[cfg(test)]
    pub(crate) fn from_comments(comments: VorbisComments) -> Self {
        Self {
            comments,
            flac: None,
        }
    }
}

/// Make sure the FLAC metadata of `path` ends in a PADDING block
///
/// lofty replaces comment and picture blocks in place and expects the
/// last-block flag to sit on a block it keeps.
fn ensure_trailing_padding(path: &Path) -> TagResult<()> {
    let mut data = std::fs::read(path)?;
    if append_padding_block(&mut data)? {
        debug!(file = %path.display(), "Adding FLAC padding block");
        std::fs::write(path, &data)?;
    }
    Ok(())
}

/// Append a PADDING block after the last metadata block unless it already
/// is one; returns whether `data` changed
fn append_padding_block(data: &mut Vec<u8>) -> TagResult<bool> {
    if !data.starts_with(FLAC_MARKER) {
        // Not a bare FLAC stream; lofty reports the real problem on save
        return Ok(false);
    }

    let truncated = || TagError::Container("Truncated FLAC metadata block".to_string());
    let mut pos = FLAC_MARKER.len();
    loop {
        let header = data
            .get(pos..pos + FLAC_BLOCK_HEADER_LEN)
            .ok_or_else(truncated)?;
        let is_last = header[0] & FLAC_LAST_BLOCK != 0;
        let block_type = header[0] & !FLAC_LAST_BLOCK;
        let len = u32::from_be_bytes([0, header[1], header[2], header[3]]) as usize;
        let end = pos + FLAC_BLOCK_HEADER_LEN + len;
        if end > data.len() {
            return Err(truncated());
        }

        if !is_last {
            pos = end;
            continue;
        }
        if block_type == FLAC_BLOCK_PADDING {
            return Ok(false);
        }

        data[pos] &= !FLAC_LAST_BLOCK;
        let mut padding = vec![0u8; FLAC_BLOCK_HEADER_LEN + FLAC_PADDING_LEN];
        padding[0] = FLAC_LAST_BLOCK | FLAC_BLOCK_PADDING;
        padding[1..4].copy_from_slice(&(FLAC_PADDING_LEN as u32).to_be_bytes()[1..]);
        data.splice(end..end, padding);
        return Ok(true);
    }
}

impl TagContainer for VorbisContainer {
    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (key, _) in self.comments.items() {
            if !names.iter().any(|n| n == key) {
                names.push(key.to_string());
            }
        }
        names
    }

    fn get_field(&self, name: &str) -> Option<Vec<FieldValue>> {
        let values: Vec<FieldValue> = self
            .comments
            .items()
            .filter(|(key, _)| *key == name)
            .map(|(_, value)| FieldValue::Text(value.to_string()))
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> TagResult<()> {
        self.delete_field(name)?;
        self.comments.push(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_field(&mut self, name: &str) -> TagResult<()> {
        let names = self.field_names();
        for key in matching_names(&names, name) {
            self.comments.remove(key).for_each(drop);
        }
        Ok(())
    }

    fn save(&mut self, path: &Path) -> TagResult<()> {
        match self.flac.as_mut() {
            Some(flac) => {
                ensure_trailing_padding(path)?;
                flac.set_vorbis_comments(self.comments.clone());
                // Padding already exists; lofty must not insert its own
                flac.save_to_path(path, WriteOptions::new().preferred_padding(0))?;
            }
            None => self.comments.save_to_path(path, WriteOptions::default())?,
        }
        Ok(())
    }
}
