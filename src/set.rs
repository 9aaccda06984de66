//! Cache set: a byte-budgeted container of variably-sized lines. Lines are
//! stored in a compact `Vec` with swap-remove rather than handles into a
//! separate arena — there are no cross-set references to invalidate.

use crate::error::SimError;
use crate::geometry::{CAMP_HISTORY_LEN, CAMP_WEIGHT_CLASSES, SET_BYTE_BUDGET};
use crate::line::CacheLine;

#[derive(Debug, Clone)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
    remaining_size: usize,
    /// CAMP per-size-class weight, indexed by `size/4 - 1`.
    pub camp_weight_table: [u32; CAMP_WEIGHT_CLASSES],
    /// CAMP history ring of recently-touched rounded sizes.
    pub camp_history_buffer: [usize; CAMP_HISTORY_LEN],
    pub camp_hb_count: usize,
}

impl Default for CacheSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheSet {
    pub fn new() -> Self {
        let mut camp_weight_table = [0u32; CAMP_WEIGHT_CLASSES];
        for (i, w) in camp_weight_table.iter_mut().enumerate() {
            *w = (i + 1) as u32;
        }
        Self {
            lines: Vec::new(),
            remaining_size: SET_BYTE_BUDGET,
            camp_weight_table,
            camp_history_buffer: [0; CAMP_HISTORY_LEN],
            camp_hb_count: 0,
        }
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [CacheLine] {
        &mut self.lines
    }

    pub fn remaining_size(&self) -> usize {
        self.remaining_size
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Insert `line` if it fits within the remaining byte budget.
    /// Returns `true` if admitted.
    pub fn insert_if_fits(&mut self, line: CacheLine) -> bool {
        if self.remaining_size >= line.rounded_comp_size {
            self.remaining_size -= line.rounded_comp_size;
            self.lines.push(line);
            true
        } else {
            false
        }
    }

    pub fn lookup(&self, tag: u32) -> Option<&CacheLine> {
        self.lines.iter().find(|l| l.tag == tag)
    }

    pub fn lookup_mut(&mut self, tag: u32) -> Option<&mut CacheLine> {
        self.lines.iter_mut().find(|l| l.tag == tag)
    }

    fn swap_remove_at(&mut self, idx: usize) -> CacheLine {
        let line = self.lines.swap_remove(idx);
        self.remaining_size += line.rounded_comp_size;
        line
    }

    /// Remove the first line with a matching index, returning it.
    pub fn remove_by_index(&mut self, idx: usize) -> Option<CacheLine> {
        if idx < self.lines.len() {
            Some(self.swap_remove_at(idx))
        } else {
            None
        }
    }

    pub fn remove_by_tag(&mut self, tag: u32) -> Option<CacheLine> {
        let idx = self.lines.iter().position(|l| l.tag == tag)?;
        Some(self.swap_remove_at(idx))
    }

    pub fn remove_by_size(&mut self, size: usize) -> Option<CacheLine> {
        let idx = self.lines.iter().position(|l| l.rounded_comp_size == size)?;
        Some(self.swap_remove_at(idx))
    }

    pub fn remove_by_timestamp(&mut self, timestamp: u64) -> Option<CacheLine> {
        let idx = self.lines.iter().position(|l| l.timestamp == timestamp)?;
        Some(self.swap_remove_at(idx))
    }

    /// Bump every other line's timestamp by one on an access. `touched_tag`
    /// is the tag that was just hit (its own timestamp was already reset to
    /// 0 by the caller) or `None` on a miss admission.
    pub fn age_others(&mut self, touched_tag: Option<u32>) {
        for line in &mut self.lines {
            if Some(line.tag) != touched_tag {
                line.timestamp += 1;
            }
        }
    }

    /// Append a rounded size to the CAMP history ring, wrapping mod 16.
    pub fn camp_history_push(&mut self, rounded_size: usize) -> Result<(), SimError> {
        if rounded_size == 0 {
            return Err(SimError::HistoryBufferFull(
                "refusing to record a zero-size history entry".into(),
            ));
        }
        let idx = self.camp_hb_count % CAMP_HISTORY_LEN;
        self.camp_history_buffer[idx] = rounded_size;
        self.camp_hb_count = (self.camp_hb_count + 1) % CAMP_HISTORY_LEN;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bdi::CompressionDescriptor;

    fn line_of_size(tag: u32, rounded: usize) -> CacheLine {
        let comp_size = rounded; // already a multiple of 4 in these tests
        CacheLine::new(
            tag,
            CompressionDescriptor { is_zero: false, is_same: false, comp_size, k: 8, base_num: 1 },
        )
    }

    #[test]
    fn fresh_set_has_full_budget() {
        let set = CacheSet::new();
        assert_eq!(set.remaining_size(), SET_BYTE_BUDGET);
    }

    #[test]
    fn insert_and_remove_round_trips_remaining_size() {
        let mut set = CacheSet::new();
        let before = set.remaining_size();
        assert!(set.insert_if_fits(line_of_size(1, 16)));
        assert_eq!(set.remaining_size(), before - 16);
        set.remove_by_tag(1).unwrap();
        assert_eq!(set.remaining_size(), before);
    }

    #[test]
    fn insert_rejects_when_set_is_full() {
        let mut set = CacheSet::new();
        assert!(set.insert_if_fits(line_of_size(1, 32)));
        assert!(set.insert_if_fits(line_of_size(2, 16)));
        assert!(set.insert_if_fits(line_of_size(3, 12)));
        assert_eq!(set.remaining_size(), 4);
        assert!(!set.insert_if_fits(line_of_size(4, 8)));
    }

    #[test]
    fn set_capacity_scenario() {
        let mut set = CacheSet::new();
        set.insert_if_fits(line_of_size(1, 32));
        set.insert_if_fits(line_of_size(2, 16));
        set.insert_if_fits(line_of_size(3, 12));
        assert_eq!(set.remaining_size(), 4);
        assert_eq!(set.num_lines(), 3);
    }

    #[test]
    fn age_others_skips_the_touched_line() {
        let mut set = CacheSet::new();
        set.insert_if_fits(line_of_size(1, 8));
        set.insert_if_fits(line_of_size(2, 8));
        set.age_others(Some(1));
        assert_eq!(set.lookup(1).unwrap().timestamp, 0);
        assert_eq!(set.lookup(2).unwrap().timestamp, 1);
    }

    #[test]
    fn camp_history_wraps_at_sixteen() {
        let mut set = CacheSet::new();
        for i in 0..20 {
            set.camp_history_push(4 + (i % 8) * 4).unwrap();
        }
        assert_eq!(set.camp_hb_count, 4); // 20 mod 16
    }
}
