//! Container format classification
//!
//! The format is chosen from the lower-cased filename extension alone; file
//! content is never sniffed. Anything outside the known set is
//! [`TagError::UnsupportedFormat`].

use crate::error::TagError;
use std::fmt;
use std::path::Path;

/// Audio container formats whose key field can be read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Mp3,
    Aac,
    Mp4,
    M4a,
    Alac,
    Flac,
    Ogg,
    Aiff,
    Aif,
    Wav,
}

/// Where an ID3v2 tag lives inside the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id3Carrier {
    /// Tag at the head of an MPEG/ADTS stream
    Stream,
    /// Tag inside an AIFF `ID3 ` chunk
    Aiff,
    /// Tag inside a RIFF/WAVE `id3 ` chunk
    Wav,
}

/// How a format stores its tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily {
    Id3(Id3Carrier),
    /// Vorbis comments (FLAC metadata block or Ogg comment header)
    Vorbis,
    /// MP4 `ilst` atoms with iTunes freeform entries
    Mp4,
}

impl ContainerFormat {
    pub const ALL: [ContainerFormat; 10] = [
        ContainerFormat::Mp3,
        ContainerFormat::Aac,
        ContainerFormat::Mp4,
        ContainerFormat::M4a,
        ContainerFormat::Alac,
        ContainerFormat::Flac,
        ContainerFormat::Ogg,
        ContainerFormat::Aiff,
        ContainerFormat::Aif,
        ContainerFormat::Wav,
    ];

    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Result<Self, TagError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self::from_extension(&ext).ok_or_else(|| {
            if ext.is_empty() {
                TagError::UnsupportedFormat(String::new())
            } else {
                TagError::UnsupportedFormat(format!(".{}", ext))
            }
        })
    }

    /// Look up a format by extension (without the dot, any case)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == ext)
    }

    /// Lower-case extension as reported in responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerFormat::Mp3 => "mp3",
            ContainerFormat::Aac => "aac",
            ContainerFormat::Mp4 => "mp4",
            ContainerFormat::M4a => "m4a",
            ContainerFormat::Alac => "alac",
            ContainerFormat::Flac => "flac",
            ContainerFormat::Ogg => "ogg",
            ContainerFormat::Aiff => "aiff",
            ContainerFormat::Aif => "aif",
            ContainerFormat::Wav => "wav",
        }
    }

    pub fn family(&self) -> TagFamily {
        match self {
            ContainerFormat::Mp3 | ContainerFormat::Aac => TagFamily::Id3(Id3Carrier::Stream),
            ContainerFormat::Aiff | ContainerFormat::Aif => TagFamily::Id3(Id3Carrier::Aiff),
            ContainerFormat::Wav => TagFamily::Id3(Id3Carrier::Wav),
            ContainerFormat::Flac | ContainerFormat::Ogg => TagFamily::Vorbis,
            ContainerFormat::Mp4 | ContainerFormat::M4a | ContainerFormat::Alac => TagFamily::Mp4,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
