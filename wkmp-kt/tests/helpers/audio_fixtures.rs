//! Audio Test Fixture Generator
//!
//! Builds the smallest files each tag library accepts. Sample content is
//! irrelevant to key tagging; only the container structure matters.

use std::path::{Path, PathBuf};

/// Extensions whose key lives in an ID3 `TKEY` frame
pub const ID3_FORMATS: [&str; 5] = ["mp3", "aac", "wav", "aiff", "aif"];

/// Extensions whose key is written under both `initialkey` and `KEY`
pub const DUAL_NAME_FORMATS: [&str; 5] = ["flac", "ogg", "mp4", "m4a", "alac"];

/// FLAC metadata block types
pub const FLAC_PADDING: u8 = 1;
pub const FLAC_VORBIS_COMMENT: u8 = 4;
pub const FLAC_PICTURE: u8 = 6;

/// Stand-in for the first FLAC audio frame; must survive tag writes
pub const FLAC_AUDIO: [u8; 8] = [0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x8C, 0x5D];

const VENDOR: &str = "wkmp-kt fixtures";

/// Create `dir/<stem>.<ext>` with a valid container for `ext`
pub fn write_fixture(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let path = dir.join(format!("{}.{}", stem, ext));
    match ext {
        "mp3" => write_mp3(&path),
        "aac" => write_aac(&path),
        "wav" => write_wav(&path),
        "aiff" | "aif" => write_aiff(&path),
        "flac" => write_flac(&path),
        "ogg" => write_ogg(&path),
        "mp4" | "m4a" | "alac" => write_mp4(&path),
        other => panic!("no fixture for .{}", other),
    }
    path
}

/// Untagged MPEG-1 Layer III stream (silent frames)
pub fn write_mp3(path: &Path) {
    // 128 kbps, 44.1 kHz, no padding: 417-byte frames
    let mut data = Vec::new();
    for _ in 0..4 {
        let mut frame = vec![0u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        data.extend_from_slice(&frame);
    }
    std::fs::write(path, data).unwrap();
}

/// Untagged ADTS AAC stream
pub fn write_aac(path: &Path) {
    let mut data = Vec::new();
    for _ in 0..4 {
        // AAC-LC, 44.1 kHz, stereo, 16-byte frame
        let mut frame = vec![0u8; 16];
        frame[..7].copy_from_slice(&[0xFF, 0xF1, 0x50, 0x80, 0x02, 0x1F, 0xFC]);
        data.extend_from_slice(&frame);
    }
    std::fs::write(path, data).unwrap();
}

/// Untagged 16-bit mono WAV, 100 samples of silence
pub fn write_wav(path: &Path) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..100 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Untagged 16-bit mono AIFF, 100 frames of silence
pub fn write_aiff(path: &Path) {
    const FRAMES: u32 = 100;
    let sound_data = vec![0u8; FRAMES as usize * 2];

    let mut comm = Vec::new();
    comm.extend_from_slice(&1u16.to_be_bytes()); // channels
    comm.extend_from_slice(&FRAMES.to_be_bytes());
    comm.extend_from_slice(&16u16.to_be_bytes()); // bits per sample
    // 44100 Hz as an 80-bit IEEE extended float
    comm.extend_from_slice(&[0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]);

    let mut ssnd = Vec::new();
    ssnd.extend_from_slice(&0u32.to_be_bytes()); // offset
    ssnd.extend_from_slice(&0u32.to_be_bytes()); // block size
    ssnd.extend_from_slice(&sound_data);

    let mut body = Vec::new();
    body.extend_from_slice(b"AIFF");
    for (id, chunk) in [(b"COMM", &comm), (b"SSND", &ssnd)] {
        body.extend_from_slice(id);
        body.extend_from_slice(&(chunk.len() as u32).to_be_bytes());
        body.extend_from_slice(chunk);
    }

    let mut data = Vec::new();
    data.extend_from_slice(b"FORM");
    data.extend_from_slice(&(body.len() as u32).to_be_bytes());
    data.extend_from_slice(&body);
    std::fs::write(path, data).unwrap();
}

/// FLAC stream with only a STREAMINFO block and no Vorbis comments
pub fn write_flac(path: &Path) {
    write_flac_blocks(path, &[]);
}

/// FLAC fixture carrying the given Vorbis comments, as another tagger
/// would have left it
pub fn write_flac_with_comments(path: &Path, items: &[(&str, &str)]) {
    write_flac_blocks(
        path,
        &[
            (FLAC_VORBIS_COMMENT, flac_comment_block(items)),
            (FLAC_PADDING, vec![0u8; 64]),
        ],
    );
}

/// FLAC stream: STREAMINFO, then `blocks` in order (the final one flagged
/// last), then [`FLAC_AUDIO`]
pub fn write_flac_blocks(path: &Path, blocks: &[(u8, Vec<u8>)]) {
    let mut streaminfo = Vec::with_capacity(34);
    streaminfo.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    streaminfo.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    streaminfo.extend_from_slice(&[0, 0, 0]); // min frame size (unknown)
    streaminfo.extend_from_slice(&[0, 0, 0]); // max frame size (unknown)
    // sample rate (20 bits) | channels - 1 (3) | bits per sample - 1 (5) | total samples (36)
    let packed: u64 = (44100u64 << 44) | (1u64 << 41) | (15u64 << 36);
    streaminfo.extend_from_slice(&packed.to_be_bytes());
    streaminfo.extend_from_slice(&[0u8; 16]); // MD5 (unset)

    let mut all = vec![(0u8, streaminfo)];
    all.extend(blocks.iter().cloned());

    let mut data = b"fLaC".to_vec();
    for (i, (block_type, body)) in all.iter().enumerate() {
        let last = if i + 1 == all.len() { 0x80 } else { 0 };
        data.push(last | block_type);
        data.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
        data.extend_from_slice(body);
    }
    data.extend_from_slice(&FLAC_AUDIO);
    std::fs::write(path, data).unwrap();
}

/// Body of a VORBIS_COMMENT block (little-endian lengths, no framing bit)
pub fn flac_comment_block(items: &[(&str, &str)]) -> Vec<u8> {
    vorbis_comment_body(items)
}

/// Body of a PICTURE block holding `data` as a front cover
pub fn flac_picture_block(mime: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&3u32.to_be_bytes()); // front cover
    body.extend_from_slice(&(mime.len() as u32).to_be_bytes());
    body.extend_from_slice(mime.as_bytes());
    body.extend_from_slice(&0u32.to_be_bytes()); // description length
    for dimension in [1u32, 1, 24, 0] {
        // width, height, depth, indexed colors
        body.extend_from_slice(&dimension.to_be_bytes());
    }
    body.extend_from_slice(&(data.len() as u32).to_be_bytes());
    body.extend_from_slice(data);
    body
}

fn vorbis_comment_body(items: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(VENDOR.len() as u32).to_le_bytes());
    body.extend_from_slice(VENDOR.as_bytes());
    body.extend_from_slice(&(items.len() as u32).to_le_bytes());
    for (key, value) in items {
        let comment = format!("{}={}", key, value);
        body.extend_from_slice(&(comment.len() as u32).to_le_bytes());
        body.extend_from_slice(comment.as_bytes());
    }
    body
}

/// Untagged MP4: `ftyp`, a `moov` holding only `mvhd`, and a small `mdat`
pub fn write_mp4(path: &Path) {
    let mut ftyp = Vec::new();
    ftyp.extend_from_slice(b"M4A "); // major brand
    ftyp.extend_from_slice(&0u32.to_be_bytes()); // minor version
    ftyp.extend_from_slice(b"M4A isom");

    let mut mvhd = Vec::new();
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // version + flags
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // creation time
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // modification time
    mvhd.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // duration
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate 1.0
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes()); // volume 1.0
    mvhd.extend_from_slice(&[0u8; 10]); // reserved
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend_from_slice(&value.to_be_bytes()); // unity matrix
    }
    mvhd.extend_from_slice(&[0u8; 24]); // pre-defined
    mvhd.extend_from_slice(&2u32.to_be_bytes()); // next track id

    let mut data = mp4_atom(b"ftyp", &ftyp);
    data.extend(mp4_atom(b"moov", &mp4_atom(b"mvhd", &mvhd)));
    data.extend(mp4_atom(b"mdat", &[0u8; 16]));
    std::fs::write(path, data).unwrap();
}

fn mp4_atom(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut atom = Vec::with_capacity(8 + body.len());
    atom.extend_from_slice(&(8 + body.len() as u32).to_be_bytes());
    atom.extend_from_slice(kind);
    atom.extend_from_slice(body);
    atom
}

/// Ogg Vorbis stream with no comments
pub fn write_ogg(path: &Path) {
    write_ogg_with_comments(path, &[]);
}

/// Ogg Vorbis stream: identification page, comment + setup page, and one
/// audio page
pub fn write_ogg_with_comments(path: &Path, items: &[(&str, &str)]) {
    let mut ident = vec![0x01];
    ident.extend_from_slice(b"vorbis");
    ident.extend_from_slice(&0u32.to_le_bytes()); // version
    ident.push(2); // channels
    ident.extend_from_slice(&44100u32.to_le_bytes());
    ident.extend_from_slice(&0i32.to_le_bytes()); // bitrate maximum
    ident.extend_from_slice(&128_000i32.to_le_bytes()); // bitrate nominal
    ident.extend_from_slice(&0i32.to_le_bytes()); // bitrate minimum
    ident.push(0xB8); // block sizes 256 / 2048
    ident.push(0x01); // framing

    let mut comment = vec![0x03];
    comment.extend_from_slice(b"vorbis");
    comment.extend(vorbis_comment_body(items));
    comment.push(0x01); // framing

    let mut setup = vec![0x05];
    setup.extend_from_slice(b"vorbis");
    setup.extend_from_slice(&[0u8; 16]);

    let mut data = ogg_page(0x02, 0, 0, &[&ident]);
    data.extend(ogg_page(0x00, 1, 0, &[&comment, &setup]));
    data.extend(ogg_page(0x04, 2, 4410, &[&[0u8; 32]]));
    std::fs::write(path, data).unwrap();
}

fn ogg_page(header_type: u8, sequence: u32, granule: u64, packets: &[&[u8]]) -> Vec<u8> {
    let mut lacing = Vec::new();
    for packet in packets {
        lacing.extend(std::iter::repeat(255u8).take(packet.len() / 255));
        lacing.push((packet.len() % 255) as u8);
    }

    let mut page = Vec::new();
    page.extend_from_slice(b"OggS");
    page.push(0); // version
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&0x4B54_4B54u32.to_le_bytes()); // stream serial
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&0u32.to_le_bytes()); // checksum, filled below
    page.push(lacing.len() as u8);
    page.extend_from_slice(&lacing);
    for packet in packets {
        page.extend_from_slice(packet);
    }

    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

/// Ogg page checksum: CRC-32, polynomial 0x04C11DB7, no reflection
fn ogg_crc(data: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &byte in data {
        crc ^= u32::from(byte) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04C1_1DB7
            } else {
                crc << 1
            };
        }
    }
    crc
}
