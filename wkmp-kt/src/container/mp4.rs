//! MP4 `ilst` adapter for mp4, m4a and alac
//!
//! Freeform atoms are named `----:<mean>:<name>` (for example
//! `----:com.apple.iTunes:initialkey`); other atoms by their fourcc.

use super::{matching_names, FieldValue, TagContainer};
use crate::error::{TagError, TagResult};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::tag::TagExt;
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

const FREEFORM_PREFIX: &str = "----:";

/// `ilst` atom list read from one MP4 file
pub struct Mp4Container {
    ilst: Ilst,
}

impl Mp4Container {
    pub fn open(path: &Path) -> TagResult<Self> {
        let mut file = File::open(path)?;
        let options = ParseOptions::new().read_properties(false);
        let ilst = Mp4File::read_from(&mut file, options)?
            .ilst()
            .cloned()
            .unwrap_or_default();

        Ok(Self { ilst })
    }

    #[cfg(test)]
    pub(crate) fn from_ilst(ilst: Ilst) -> Self {
        Self { ilst }
    }
}

/// Render an atom identifier as a field name
pub(crate) fn ident_name(ident: &AtomIdent<'_>) -> String {
    match ident {
        AtomIdent::Fourcc(fourcc) => fourcc.iter().map(|&b| b as char).collect(),
        AtomIdent::Freeform { mean, name } => format!("{}{}:{}", FREEFORM_PREFIX, mean, name),
    }
}

/// Parse a field name back into an atom identifier
pub(crate) fn parse_ident(field: &str) -> TagResult<AtomIdent<'static>> {
    if let Some(rest) = field.strip_prefix(FREEFORM_PREFIX) {
        let (mean, name) = rest.split_once(':').ok_or_else(|| {
            TagError::Container(format!("Freeform atom name has no mean: {}", field))
        })?;
        return Ok(AtomIdent::Freeform {
            mean: Cow::Owned(mean.to_string()),
            name: Cow::Owned(name.to_string()),
        });
    }

    let bytes: Vec<u8> = field
        .chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect();
    match <[u8; 4]>::try_from(bytes.as_slice()) {
        Ok(fourcc) if field.chars().count() == 4 => Ok(AtomIdent::Fourcc(fourcc)),
        _ => Err(TagError::Container(format!("Invalid atom name: {}", field))),
    }
}

fn field_value(data: &AtomData) -> Option<FieldValue> {
    match data {
        AtomData::UTF8(text) | AtomData::UTF16(text) => Some(FieldValue::Text(text.clone())),
        AtomData::Unknown { data, .. } => Some(FieldValue::Bytes(data.clone())),
        AtomData::SignedInteger(n) => Some(FieldValue::Other(n.to_string())),
        AtomData::UnsignedInteger(n) => Some(FieldValue::Other(n.to_string())),
        AtomData::Bool(b) => Some(FieldValue::Other(b.to_string())),
        _ => None,
    }
}

impl TagContainer for Mp4Container {
    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for atom in &self.ilst {
            let name = ident_name(atom.ident());
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn get_field(&self, name: &str) -> Option<Vec<FieldValue>> {
        let ident = parse_ident(name).ok()?;
        let atom = self.ilst.get(&ident)?;
        Some(atom.data().filter_map(field_value).collect())
    }

    fn set_field(&mut self, name: &str, value: &str) -> TagResult<()> {
        let ident = parse_ident(name)?;
        self.delete_field(name)?;
        self.ilst
            .insert(Atom::new(ident, AtomData::UTF8(value.to_string())));
        Ok(())
    }

    fn delete_field(&mut self, name: &str) -> TagResult<()> {
        let names = self.field_names();
        for field in matching_names(&names, name) {
            let ident = parse_ident(field)?;
            self.ilst.remove(&ident).for_each(drop);
        }
        Ok(())
    }

    fn save(&mut self, path: &Path) -> TagResult<()> {
        self.ilst.save_to_path(path, WriteOptions::default())?;
        Ok(())
    }
}
