//! Key field resolution and write policy
//!
//! Formats with named comment maps (Vorbis, MP4 freeform) store the key
//! under two names: the canonical `initialkey` and the legacy `KEY` still
//! used by other taggers. Reads prefer the canonical name; writes always
//! set both. ID3 formats have a single `TKEY` frame.
//!
//! Name matching ignores case throughout. Resolution never mutates the
//! container.

use crate::container::{FieldValue, TagContainer};
use crate::error::TagResult;

/// Vorbis comment names
pub const VORBIS_CANONICAL: &str = "initialkey";
pub const VORBIS_LEGACY: &str = "KEY";

/// MP4 iTunes freeform names
pub const MP4_CANONICAL: &str = "----:com.apple.iTunes:initialkey";
pub const MP4_LEGACY: &str = "----:com.apple.iTunes:KEY";

/// ID3v2 initial key frame
pub const ID3_KEY_FRAME: &str = "TKEY";

/// Where a format keeps its key value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScheme {
    /// One frame, replaced wholesale on write
    Single(&'static str),
    /// Canonical name preferred on read, both names written
    Dual {
        canonical: &'static str,
        legacy: &'static str,
    },
}

impl FieldScheme {
    pub const ID3: FieldScheme = FieldScheme::Single(ID3_KEY_FRAME);
    pub const VORBIS: FieldScheme = FieldScheme::Dual {
        canonical: VORBIS_CANONICAL,
        legacy: VORBIS_LEGACY,
    };
    pub const MP4: FieldScheme = FieldScheme::Dual {
        canonical: MP4_CANONICAL,
        legacy: MP4_LEGACY,
    };

    /// Find the key value in `container`, `None` if no field holds one
    pub fn resolve(&self, container: &dyn TagContainer) -> Option<String> {
        match *self {
            FieldScheme::Single(name) => lookup(container, name),
            FieldScheme::Dual { canonical, legacy } => lookup(container, canonical)
                .filter(|value| !value.is_empty())
                .or_else(|| lookup(container, legacy)),
        }
    }

    /// Store `value` in `container` following the format's naming rules
    ///
    /// Does not save; the caller persists the container.
    pub fn apply(&self, container: &mut dyn TagContainer, value: &str) -> TagResult<()> {
        match *self {
            FieldScheme::Single(name) => {
                container.delete_field(name)?;
                container.set_field(name, value)
            }
            FieldScheme::Dual { canonical, legacy } => {
                container.set_field(canonical, value)?;
                container.set_field(legacy, value)
            }
        }
    }
}

/// First value of the first field named `name` (any case) that has one
fn lookup(container: &dyn TagContainer, name: &str) -> Option<String> {
    container
        .field_names()
        .iter()
        .filter(|field| field.eq_ignore_ascii_case(name))
        .find_map(|field| {
            container
                .get_field(field)
                .and_then(|values| values.into_iter().next())
        })
        .map(FieldValue::into_text)
}
