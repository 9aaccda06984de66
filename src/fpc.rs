//! Frequent Pattern Compression (FPC) — non-core comparison-only collaborator.
//! The cache engine never uses this to decide admission; it exists only as
//! a side-by-side alternative the CLI can report.

use crate::reader::{read_as_ints, Endian};

/// Estimate the FPC-compressed size (in bytes) of a 32-byte line, read as
/// eight 4-byte big-endian words.
pub fn fpc_compress(buf: &[u8]) -> usize {
    let words = read_as_ints(buf, 4, Endian::Big).expect("step=4 is valid");
    let mut compressible = 0usize;
    for w in &words {
        let w = *w as u32;
        if w == 0 {
            compressible += 1;
            continue;
        }
        let signed = w as i32;
        if signed.unsigned_abs() <= 0xFF {
            compressible += 1;
            continue;
        }
        if signed.unsigned_abs() <= 0xFFFF {
            compressible += 2;
            continue;
        }
        if w & 0xFFFF == 0 {
            compressible += 2;
            continue;
        }
        let lo = (w & 0xFFFF) as i16 as i32;
        let hi = ((w >> 16) & 0xFFFF) as i16 as i32;
        if lo.unsigned_abs() <= 0xFF && hi.unsigned_abs() <= 0xFF {
            compressible += 2;
            continue;
        }
        let b0 = w & 0xFF;
        let b1 = (w >> 8) & 0xFF;
        let b2 = (w >> 16) & 0xFF;
        let b3 = (w >> 24) & 0xFF;
        if b0 == b1 && b0 == b2 && b0 == b3 {
            compressible += 1;
            continue;
        }
        compressible += 4;
    }
    // 3 bits of pattern code per word, rounded the way the source does:
    // words * 3 / 8 bytes total.
    let comp_size = compressible + words.len() * 3 / 8;
    comp_size.min(words.len() * 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_words_compress_maximally() {
        let buf = [0u8; 32];
        assert_eq!(fpc_compress(&buf), 8 * 3 / 8);
    }

    #[test]
    fn never_exceeds_uncompressed_size() {
        let mut buf = [0u8; 32];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(73).wrapping_add(11);
        }
        assert!(fpc_compress(&buf) <= 32);
    }
}
