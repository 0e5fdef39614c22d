//! Named-field access to audio tag containers
//!
//! [`TagContainer`] is the seam between key policy (see
//! [`crate::resolver`]) and the tag libraries doing the binary work. Field
//! names are the container's native ones: `TKEY` for ID3, raw comment keys
//! for Vorbis, `----:mean:name` or the four-character code for MP4.

pub mod id3;
pub mod mp4;
pub mod vorbis;

use crate::error::TagResult;
use crate::format::{ContainerFormat, TagFamily};
use std::path::Path;

pub use self::id3::Id3Container;
pub use self::mp4::Mp4Container;
pub use self::vorbis::VorbisContainer;

/// One value stored under a field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text as stored by the container
    Text(String),
    /// Raw bytes (MP4 freeform data without a text type)
    Bytes(Vec<u8>),
    /// Non-text data rendered as a string (integers, flags)
    Other(String),
}

impl FieldValue {
    /// Render the value as text, decoding raw bytes as UTF-8
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) | FieldValue::Other(text) => text,
            FieldValue::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// An opened tag structure for one audio file
pub trait TagContainer: Send {
    /// Field names present, in container order, without duplicates
    fn field_names(&self) -> Vec<String>;

    /// Values stored under exactly `name`; `None` if the field is absent
    fn get_field(&self, name: &str) -> Option<Vec<FieldValue>>;

    /// Replace every field matching `name` (ignoring case) with one value
    fn set_field(&mut self, name: &str, value: &str) -> TagResult<()>;

    /// Remove every field matching `name` (ignoring case)
    fn delete_field(&mut self, name: &str) -> TagResult<()>;

    /// Persist the tag structure back into the file at `path`
    fn save(&mut self, path: &Path) -> TagResult<()>;
}

/// Open the tag container of `path` with the adapter for `format`
///
/// ID3 carriers without a tag yield an empty container that is created on
/// save; Vorbis and MP4 files without tags yield an empty comment list.
pub fn open(path: &Path, format: ContainerFormat) -> TagResult<Box<dyn TagContainer>> {
    Ok(match format.family() {
        TagFamily::Id3(carrier) => Box::new(Id3Container::open(path, carrier)?),
        TagFamily::Vorbis => Box::new(VorbisContainer::open(path, format)?),
        TagFamily::Mp4 => Box::new(Mp4Container::open(path)?),
    })
}

/// Names in `names` equal to `wanted` ignoring ASCII case
pub(crate) fn matching_names<'a>(
    names: &'a [String],
    wanted: &'a str,
) -> impl Iterator<Item = &'a String> {
    names.iter().filter(move |n| n.eq_ignore_ascii_case(wanted))
}
