//! Fixed cache geometry constants.
//!
//! Mirrors the macros at the top of the original `compressedCache.h`
//! (`CACHE_SIZE_KB`, `LINE_SIZE`, `SET_ASSOCIATIVITY`, `rrvp_max`), kept as
//! `const`s rather than a runtime `Config` because the spec fixes this
//! geometry for the core.

/// Total cache capacity in bytes (32 KiB).
pub const CACHE_SIZE_BYTES: usize = 32 * 1024;

/// Nominal line granule in bytes.
pub const LINE_SIZE: usize = 32;

/// Nominal set-associativity (actual resident-line count is variable).
pub const SET_ASSOCIATIVITY: usize = 2;

/// Per-set byte budget: B = LINE_SIZE * SET_ASSOCIATIVITY.
pub const SET_BYTE_BUDGET: usize = LINE_SIZE * SET_ASSOCIATIVITY;

/// Derived number of sets: S = CACHE_SIZE_BYTES / SET_BYTE_BUDGET.
pub const NUM_SETS: usize = CACHE_SIZE_BYTES / SET_BYTE_BUDGET;

/// Maximum re-reference prediction value used by CAMP.
pub const RRVP_MAX: u8 = 8;

/// Number of CAMP size-classes (rounded sizes 4, 8, ..., 32 — bounded by
/// the line granule, not the set budget: a single compressed line can
/// never round up past `LINE_SIZE`).
pub const CAMP_WEIGHT_CLASSES: usize = LINE_SIZE / 4;

/// CAMP per-set history ring capacity.
pub const CAMP_HISTORY_LEN: usize = 16;

/// Number of processed trace records between CAMP retraining epochs.
pub const CAMP_TRAINING_PERIOD: u32 = 160;

/// Address bit widths: offset is the low bits, index the next block, tag the rest.
pub const OFFSET_BITS: u32 = 5;
pub const INDEX_BITS: u32 = 9;
pub const TAG_BITS: u32 = 32 - OFFSET_BITS - INDEX_BITS;

const _: () = assert!(1 << INDEX_BITS == NUM_SETS);

/// Round a byte count up to the nearest multiple of 4.
pub const fn ceil4(x: usize) -> usize {
    (x + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_is_internally_consistent() {
        assert_eq!(NUM_SETS, 512);
        assert_eq!(SET_BYTE_BUDGET, 64);
        assert_eq!(TAG_BITS, 18);
    }

    #[test]
    fn ceil4_rounds_up_to_multiple_of_four() {
        assert_eq!(ceil4(0), 0);
        assert_eq!(ceil4(1), 4);
        assert_eq!(ceil4(4), 4);
        assert_eq!(ceil4(5), 8);
        assert_eq!(ceil4(32), 32);
    }
}
