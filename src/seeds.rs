//! Hex seed file loader: one 32-bit hex value per line, read big-endian
//! into a [`CompressionDescriptor`] sample via [`crate::bdi::bdi_compress`].

use std::fs;
use std::path::Path;

use crate::bdi::{bdi_compress, CompressionDescriptor};
use crate::error::SimError;

/// Parse a hex-seed file (`0xDEADBEEF` per line) into a single
/// `CompressionDescriptor` sample: the file's first non-blank value,
/// repeated eight times into a 32-byte line and run through BDI.
pub fn load_seed_descriptor(path: &Path) -> Result<CompressionDescriptor, SimError> {
    let text = fs::read_to_string(path)?;
    let (lineno, first) = text
        .lines()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())
        .ok_or_else(|| SimError::Config(format!("seed file {} contained no usable values", path.display())))?;
    let trimmed = first.trim();
    let value = parse_hex_u32(trimmed).ok_or_else(|| {
        SimError::Parse(format!("{}:{}: invalid hex seed {trimmed:?}", path.display(), lineno + 1))
    })?;
    let mut buf = [0u8; 32];
    for chunk in buf.chunks_exact_mut(4) {
        chunk.copy_from_slice(&value.to_be_bytes());
    }
    Ok(bdi_compress(&buf))
}

fn parse_hex_u32(s: &str) -> Option<u32> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    u32::from_str_radix(digits, 16).ok()
}

/// Load all five seed descriptors named by `paths`, one sample per file.
pub fn load_seed_descriptors(paths: &[std::path::PathBuf; 5]) -> Result<[CompressionDescriptor; 5], SimError> {
    let mut descriptors: Vec<CompressionDescriptor> = Vec::with_capacity(5);
    for p in paths {
        descriptors.push(load_seed_descriptor(p)?);
    }
    descriptors.try_into().map_err(|_| SimError::Config("expected exactly 5 seed descriptors".into()))
}
