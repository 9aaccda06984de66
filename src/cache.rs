//! The compressed cache engine: an array of [`CacheSet`]s plus the CAMP
//! training epoch counter.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bdi::CompressionDescriptor;
use crate::camp;
use crate::error::SimError;
use crate::geometry::{CAMP_TRAINING_PERIOD, NUM_SETS, SET_BYTE_BUDGET};
use crate::line::CacheLine;
use crate::policy::{self, ReplacementPolicy};
use crate::set::CacheSet;

pub struct Cache {
    sets: Vec<CacheSet>,
    policy: ReplacementPolicy,
    camp_training_counter: u32,
    rng: StdRng,
}

/// Outcome of one access, used by the trace driver to build telemetry rows.
pub struct AccessOutcome {
    pub index: u32,
    pub hit: bool,
    pub evicted: Vec<CacheLine>,
    pub resulting_line: CompressionDescriptor,
    pub rounded_comp_size: usize,
    pub timestamp: u64,
}

impl Cache {
    pub fn new(policy: ReplacementPolicy, rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sets: (0..NUM_SETS).map(|_| CacheSet::new()).collect(),
            policy,
            camp_training_counter: CAMP_TRAINING_PERIOD,
            rng,
        }
    }

    /// Look up `tag` in set `index`. On hit, apply the touch/CAMP update
    /// rules and age the rest of the set. On miss, call `miss_descriptor`
    /// to obtain a freshly compressed line and admit it, evicting per the
    /// configured policy. `miss_descriptor` is only invoked once a miss is
    /// confirmed, so a caller drawing it from an RNG never consumes a draw
    /// on a hit.
    pub fn access(
        &mut self,
        index: u32,
        tag: u32,
        miss_descriptor: impl FnOnce() -> CompressionDescriptor,
    ) -> Result<AccessOutcome, SimError> {
        let set = self
            .sets
            .get_mut(index as usize)
            .ok_or_else(|| SimError::InternalInvariant(format!("set index {index} out of range")))?;

        if let Some(line) = set.lookup_mut(tag) {
            line.touch();
            let rounded = line.rounded_comp_size;
            let result = line.comp_result;
            let timestamp = line.timestamp;
            set.age_others(Some(tag));
            if matches!(self.policy, ReplacementPolicy::Camp) {
                let _ = set.camp_history_push(rounded);
            }
            return Ok(AccessOutcome {
                index,
                hit: true,
                evicted: Vec::new(),
                resulting_line: result,
                rounded_comp_size: rounded,
                timestamp,
            });
        }

        let new_line = CacheLine::new(tag, miss_descriptor());
        if new_line.rounded_comp_size > SET_BYTE_BUDGET {
            return Err(SimError::Capacity(format!(
                "line rounded size {} exceeds set budget {}",
                new_line.rounded_comp_size, SET_BYTE_BUDGET
            )));
        }

        let need = new_line.rounded_comp_size;
        let mut evicted = Vec::new();
        if set.remaining_size() < need {
            evicted = policy::evict(self.policy, set, need, &mut self.rng);
        }
        if set.remaining_size() < need {
            return Err(SimError::InternalInvariant(
                "eviction completed but set still lacks room for the incoming line".into(),
            ));
        }

        let rounded = new_line.rounded_comp_size;
        let result = new_line.comp_result;
        let timestamp = new_line.timestamp;
        if !set.insert_if_fits(new_line) {
            return Err(SimError::InternalInvariant(
                "insert_if_fits rejected a line after successful eviction".into(),
            ));
        }
        set.age_others(None);

        Ok(AccessOutcome { index, hit: false, evicted, resulting_line: result, rounded_comp_size: rounded, timestamp })
    }

    /// Decrement the CAMP training counter; retrain and reset at zero.
    /// No-op under other policies.
    pub fn tick_camp_training(&mut self) {
        if !matches!(self.policy, ReplacementPolicy::Camp) {
            return;
        }
        self.camp_training_counter = self.camp_training_counter.saturating_sub(1);
        if self.camp_training_counter == 0 {
            camp::retrain(&mut self.sets);
            self.camp_training_counter = CAMP_TRAINING_PERIOD;
        }
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(comp_size: usize) -> CompressionDescriptor {
        CompressionDescriptor { is_zero: false, is_same: false, comp_size, k: 8, base_num: 1 }
    }

    #[test]
    fn miss_then_hit_on_same_tag() {
        let mut cache = Cache::new(ReplacementPolicy::Lru, Some(1));
        let outcome = cache.access(0, 42, || descriptor(16)).unwrap();
        assert!(!outcome.hit);
        let outcome = cache.access(0, 42, || descriptor(16)).unwrap();
        assert!(outcome.hit);
        assert_eq!(outcome.timestamp, 0);
    }

    #[test]
    fn hit_resets_timestamp_and_ages_others() {
        let mut cache = Cache::new(ReplacementPolicy::Lru, Some(1));
        cache.access(0, 1, || descriptor(16)).unwrap();
        cache.access(0, 2, || descriptor(16)).unwrap();
        let outcome = cache.access(0, 1, || descriptor(16)).unwrap();
        assert!(outcome.hit);
        assert_eq!(outcome.timestamp, 0);
    }

    #[test]
    fn eviction_happens_when_set_is_full() {
        let mut cache = Cache::new(ReplacementPolicy::Lru, Some(1));
        cache.access(0, 1, || descriptor(32)).unwrap();
        cache.access(0, 2, || descriptor(32)).unwrap();
        let outcome = cache.access(0, 3, || descriptor(32)).unwrap();
        assert!(!outcome.hit);
        assert!(!outcome.evicted.is_empty());
    }

    #[test]
    fn miss_descriptor_closure_is_not_called_on_a_hit() {
        let mut cache = Cache::new(ReplacementPolicy::Lru, Some(1));
        cache.access(0, 1, || descriptor(16)).unwrap();
        let mut calls = 0;
        cache.access(0, 1, || { calls += 1; descriptor(16) }).unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn camp_training_counter_retrains_at_period() {
        let mut cache = Cache::new(ReplacementPolicy::Camp, Some(1));
        for _ in 0..CAMP_TRAINING_PERIOD {
            cache.tick_camp_training();
        }
        assert_eq!(cache.camp_training_counter, CAMP_TRAINING_PERIOD);
    }
}
