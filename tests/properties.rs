//! Property tests for invariants that should hold over arbitrary inputs
//! rather than just the handful of worked scenarios in other test files.

use proptest::prelude::*;
use quickcheck::quickcheck;

use bdicache::bdi::bdi_compress;
use bdicache::geometry::{ceil4, LINE_SIZE, SET_BYTE_BUDGET};
use bdicache::line::CacheLine;
use bdicache::set::CacheSet;

quickcheck! {
    fn ceil4_rounds_up_to_a_multiple_of_four_at_or_above_input(x: u16) -> bool {
        let x = x as usize;
        let r = ceil4(x);
        r % 4 == 0 && r >= x
    }
}

fn descriptor(comp_size: usize) -> bdicache::bdi::CompressionDescriptor {
    bdicache::bdi::CompressionDescriptor { is_zero: false, is_same: false, comp_size, k: 8, base_num: 1 }
}

proptest! {
    #[test]
    fn bdi_compressed_size_never_exceeds_line_size(buf in prop::collection::vec(any::<u8>(), LINE_SIZE)) {
        let d = bdi_compress(&buf);
        prop_assert!(d.comp_size <= LINE_SIZE);
    }

    #[test]
    fn cacheset_remaining_size_plus_resident_bytes_always_equals_budget(
        sizes in prop::collection::vec(1usize..=8, 0..20)
    ) {
        let mut set = CacheSet::new();
        for (tag, quarter) in sizes.into_iter().enumerate() {
            let rounded = quarter * 4;
            let line = CacheLine::new(tag as u32, descriptor(rounded));
            set.insert_if_fits(line);
            let resident: usize = set.lines().iter().map(|l| l.rounded_comp_size).sum();
            prop_assert_eq!(set.remaining_size() + resident, SET_BYTE_BUDGET);
        }
    }

    #[test]
    fn cacheset_insert_then_remove_restores_remaining_size(rounded in (1usize..=8).prop_map(|q| q * 4)) {
        let mut set = CacheSet::new();
        let before = set.remaining_size();
        prop_assert!(set.insert_if_fits(CacheLine::new(1, descriptor(rounded))));
        prop_assert_eq!(set.remaining_size(), before - rounded);
        set.remove_by_tag(1).unwrap();
        prop_assert_eq!(set.remaining_size(), before);
    }
}
