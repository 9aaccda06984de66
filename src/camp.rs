//! CAMP trainer: periodic size-class weight retraining.
//!
//! Eviction-time MVE scoring and the rrvp boost live in [`crate::policy`];
//! this module only owns the histogram-and-reweight step that runs every
//! `CAMP_TRAINING_PERIOD` processed records.

use crate::geometry::{CAMP_HISTORY_LEN, CAMP_WEIGHT_CLASSES};
use crate::set::CacheSet;

/// Rebuild the global size-class weight table from every set's history
/// buffer, then reset all history buffers. Applied uniformly to every set
/// (a single shared weight table, mirroring the source's global array).
pub fn retrain(sets: &mut [CacheSet]) {
    let mut histogram = [0u32; CAMP_WEIGHT_CLASSES];
    for set in sets.iter() {
        // The ring wraps in place rather than tracking a fill count, so a
        // zero entry unambiguously means "never written" (sizes are always
        // >= 4, see CacheSet::camp_history_push).
        for &rounded in set.camp_history_buffer.iter().filter(|&&r| r != 0) {
            let class = rounded / 4 - 1;
            if class < CAMP_WEIGHT_CLASSES {
                histogram[class] += 1;
            }
        }
    }

    let mut ranked: Vec<usize> = (0..CAMP_WEIGHT_CLASSES).collect();
    ranked.sort_by(|&a, &b| histogram[b].cmp(&histogram[a]).then(a.cmp(&b)));

    let mut new_weights = [0u32; CAMP_WEIGHT_CLASSES];
    for (rank, &class) in ranked.iter().enumerate() {
        new_weights[class] = (CAMP_WEIGHT_CLASSES - rank) as u32;
    }

    for set in sets.iter_mut() {
        set.camp_weight_table = new_weights;
        set.camp_history_buffer = [0; CAMP_HISTORY_LEN];
        set.camp_hb_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrain_gives_highest_weight_to_most_frequent_class() {
        let mut sets = vec![CacheSet::new(), CacheSet::new()];
        for _ in 0..5 {
            sets[0].camp_history_push(8).unwrap();
        }
        sets[1].camp_history_push(32).unwrap();
        retrain(&mut sets);
        let class_8 = 8 / 4 - 1;
        let class_32 = 32 / 4 - 1;
        assert_eq!(sets[0].camp_weight_table[class_8], CAMP_WEIGHT_CLASSES as u32);
        assert!(sets[0].camp_weight_table[class_8] > sets[0].camp_weight_table[class_32]);
    }

    #[test]
    fn retrain_resets_all_history_buffers() {
        let mut sets = vec![CacheSet::new()];
        sets[0].camp_history_push(16).unwrap();
        retrain(&mut sets);
        assert_eq!(sets[0].camp_hb_count, 0);
        assert_eq!(sets[0].camp_history_buffer, [0; CAMP_HISTORY_LEN]);
    }
}
