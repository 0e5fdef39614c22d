//! ID3v2 adapter for mp3, aac, aiff/aif and wav
//!
//! Uses the `id3` crate directly so frames are addressed by their four
//! character ID. A file without any ID3 tag opens as an empty tag, which
//! is created on the first save. Saves always write ID3v2.4.

use super::{FieldValue, TagContainer};
use crate::error::TagResult;
use crate::format::Id3Carrier;
use id3::{ErrorKind, Frame, Tag, TagLike, Version};
use std::path::Path;
use tracing::debug;

/// ID3v2 tag read from (or to be created in) one file
pub struct Id3Container {
    tag: Tag,
    carrier: Id3Carrier,
}

impl Id3Container {
    pub fn open(path: &Path, carrier: Id3Carrier) -> TagResult<Self> {
        let read = match carrier {
            Id3Carrier::Stream => Tag::read_from_path(path),
            Id3Carrier::Aiff => Tag::read_from_aiff_path(path),
            Id3Carrier::Wav => Tag::read_from_wav_path(path),
        };

        let tag = match read {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => {
                debug!(file = %path.display(), "No ID3 tag present");
                Tag::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { tag, carrier })
    }
}

impl TagContainer for Id3Container {
    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for frame in self.tag.frames() {
            if !names.iter().any(|n| n == frame.id()) {
                names.push(frame.id().to_string());
            }
        }
        names
    }

    fn get_field(&self, name: &str) -> Option<Vec<FieldValue>> {
        let frame = self.tag.get(name)?;
        // Text frames keep multiple values null-separated
        let values = frame
            .content()
            .text()
            .map(|text| {
                text.split('\0')
                    .map(|v| FieldValue::Text(v.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        Some(values)
    }

    fn set_field(&mut self, name: &str, value: &str) -> TagResult<()> {
        self.delete_field(name)?;
        self.tag.add_frame(Frame::text(name, value));
        Ok(())
    }

    fn delete_field(&mut self, name: &str) -> TagResult<()> {
        let ids: Vec<String> = self
            .field_names()
            .into_iter()
            .filter(|id| id.eq_ignore_ascii_case(name))
            .collect();
        for id in ids {
            self.tag.remove(&id);
        }
        Ok(())
    }

    fn save(&mut self, path: &Path) -> TagResult<()> {
        match self.carrier {
            Id3Carrier::Stream => self.tag.write_to_path(path, Version::Id3v24)?,
            Id3Carrier::Aiff => self.tag.write_to_aiff_path(path, Version::Id3v24)?,
            Id3Carrier::Wav => self.tag.write_to_wav_path(path, Version::Id3v24)?,
        }
        Ok(())
    }
}
