//! Aggregate run counters, owned by the trace driver rather than kept as
//! process-wide mutables.

pub struct Stats {
    pub instruction_count: u64,
    pub load_count: u64,
    pub store_count: u64,
    pub load_hit_count: u64,
    pub store_hit_count: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            instruction_count: 0,
            load_count: 0,
            store_count: 0,
            load_hit_count: 0,
            store_hit_count: 0,
        }
    }

    pub fn tick_load(&mut self, hit: bool) {
        self.instruction_count += 1;
        self.load_count += 1;
        if hit {
            self.load_hit_count += 1;
        }
    }

    pub fn tick_store(&mut self, hit: bool) {
        self.instruction_count += 1;
        self.store_count += 1;
        if hit {
            self.store_hit_count += 1;
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.load_hit_count + self.store_hit_count;
        if self.instruction_count == 0 {
            0.0
        } else {
            hits as f64 / self.instruction_count as f64
        }
    }

    pub fn report(&self) {
        println!(
            "Processed {} accesses ({} loads, {} stores), hit rate {:.2}% (load hits {}, store hits {})",
            self.instruction_count,
            self.load_count,
            self.store_count,
            self.hit_rate() * 100.0,
            self.load_hit_count,
            self.store_hit_count,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_counts_both_loads_and_stores() {
        let mut stats = Stats::new();
        stats.tick_load(true);
        stats.tick_load(false);
        stats.tick_store(true);
        assert_eq!(stats.instruction_count, 3);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn hit_rate_is_zero_on_empty_run() {
        let stats = Stats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
