//! Test Helper Utilities
//!
//! Shared utilities for testing wkmp-kt
#![allow(dead_code)]

pub mod audio_fixtures;
pub mod protocol;

// Re-export commonly used items
pub use audio_fixtures::{
    flac_comment_block, flac_picture_block, write_aac, write_aiff, write_fixture, write_flac,
    write_flac_blocks, write_flac_with_comments, write_mp3, write_mp4, write_ogg,
    write_ogg_with_comments, write_wav, DUAL_NAME_FORMATS, FLAC_AUDIO, FLAC_PADDING,
    FLAC_PICTURE, FLAC_VORBIS_COMMENT, ID3_FORMATS,
};
pub use protocol::{collect_messages, request_line};
