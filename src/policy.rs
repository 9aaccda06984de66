//! Replacement policies: RANDOM, BEST-FIT, LRU, CAMP. Modeled as a closed
//! tagged variant rather than a trait object, since there are exactly four
//! policies fixed at parse time and no plugin surface.

use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::geometry::RRVP_MAX;
use crate::line::CacheLine;
use crate::set::CacheSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Random,
    BestFit,
    Lru,
    Camp,
}

impl ReplacementPolicy {
    pub fn suffix(self) -> &'static str {
        match self {
            ReplacementPolicy::Random => "_random",
            ReplacementPolicy::BestFit => "_bestfit",
            ReplacementPolicy::Lru => "_lru",
            ReplacementPolicy::Camp => "_camp",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReplacementPolicy::Random => "random",
            ReplacementPolicy::BestFit => "bestfit",
            ReplacementPolicy::Lru => "lru",
            ReplacementPolicy::Camp => "camp",
        };
        f.write_str(s)
    }
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "random" | "RANDOM" => Ok(ReplacementPolicy::Random),
            "2" | "bestfit" | "BESTFIT" | "best-fit" => Ok(ReplacementPolicy::BestFit),
            "3" | "lru" | "LRU" => Ok(ReplacementPolicy::Lru),
            "4" | "camp" | "CAMP" => Ok(ReplacementPolicy::Camp),
            other => Err(format!("unrecognized policy {other:?}, expected 1-4 or a policy name")),
        }
    }
}

/// Evict lines from `set` until `remaining_size() >= need`, returning the
/// evicted lines in eviction order (oldest telemetry row first).
pub fn evict(
    policy: ReplacementPolicy,
    set: &mut CacheSet,
    need: usize,
    rng: &mut impl Rng,
) -> Vec<CacheLine> {
    match policy {
        ReplacementPolicy::Random => evict_random(set, need, rng),
        ReplacementPolicy::BestFit => evict_best_fit(set, need),
        ReplacementPolicy::Lru => evict_lru(set, need),
        ReplacementPolicy::Camp => evict_camp(set, need),
    }
}

fn evict_random(set: &mut CacheSet, need: usize, rng: &mut impl Rng) -> Vec<CacheLine> {
    let mut evicted = Vec::new();
    while set.remaining_size() < need && set.num_lines() > 0 {
        let idx = rng.gen_range(0..set.num_lines());
        if let Some(line) = set.remove_by_index(idx) {
            evicted.push(line);
        }
    }
    evicted
}

/// Enumerate subsets of `sizes` via DFS (include-then-exclude at each index,
/// ascending index order), tracking the first subset whose sum is >= `goal`
/// with minimal overshoot. Ties (equal overshoot) keep the earlier-found
/// subset, matching the source's depth-first tie-break.
fn best_fit_indices(sizes: &[usize], goal: usize) -> Vec<usize> {
    let mut best: Option<(usize, Vec<usize>)> = None;
    let mut chosen = Vec::new();

    fn dfs(
        sizes: &[usize],
        goal: usize,
        i: usize,
        sum: usize,
        chosen: &mut Vec<usize>,
        best: &mut Option<(usize, Vec<usize>)>,
    ) {
        if sum >= goal {
            let overshoot = sum - goal;
            let better = match best {
                None => true,
                Some((best_overshoot, _)) => overshoot < *best_overshoot,
            };
            if better {
                *best = Some((overshoot, chosen.clone()));
            }
            return;
        }
        if i == sizes.len() {
            return;
        }
        chosen.push(i);
        dfs(sizes, goal, i + 1, sum + sizes[i], chosen, best);
        chosen.pop();
        dfs(sizes, goal, i + 1, sum, chosen, best);
    }

    dfs(sizes, goal, 0, 0, &mut chosen, &mut best);
    best.map(|(_, idxs)| idxs).unwrap_or_default()
}

fn evict_best_fit(set: &mut CacheSet, need: usize) -> Vec<CacheLine> {
    if set.remaining_size() >= need {
        return Vec::new();
    }
    let goal = need - set.remaining_size();
    let sizes: Vec<usize> = set.lines().iter().map(|l| l.rounded_comp_size).collect();
    let victim_indices = best_fit_indices(&sizes, goal);

    let mut evicted = Vec::new();
    // Remove from highest index to lowest so earlier indices stay valid
    // across swap-removes.
    let mut sorted = victim_indices;
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    for idx in sorted {
        if let Some(line) = set.remove_by_index(idx) {
            evicted.push(line);
        }
    }
    evicted
}

fn evict_lru(set: &mut CacheSet, need: usize) -> Vec<CacheLine> {
    let mut evicted = Vec::new();
    while set.remaining_size() < need && set.num_lines() > 0 {
        let oldest_idx = set
            .lines()
            .iter()
            .enumerate()
            .max_by_key(|(_, l)| l.timestamp)
            .map(|(i, _)| i)
            .expect("num_lines > 0");
        if let Some(line) = set.remove_by_index(oldest_idx) {
            evicted.push(line);
        }
    }
    evicted
}

fn camp_weight(set: &CacheSet, rounded_size: usize) -> u32 {
    let class = rounded_size / 4 - 1;
    set.camp_weight_table[class]
}

fn evict_camp(set: &mut CacheSet, need: usize) -> Vec<CacheLine> {
    let mut evicted = Vec::new();
    while set.remaining_size() < need && set.num_lines() > 0 {
        let mut highest_rrvp: u8 = 0;
        let mut victim_idx = 0usize;
        let mut victim_mve = -1.0f64;
        for (i, line) in set.lines().iter().enumerate() {
            highest_rrvp = highest_rrvp.max(line.rrvp);
            let weight = camp_weight(set, line.rounded_comp_size).max(1) as f64;
            let mve = line.rrvp as f64 / weight;
            if mve > victim_mve {
                victim_mve = mve;
                victim_idx = i;
            }
        }
        if let Some(line) = set.remove_by_index(victim_idx) {
            evicted.push(line);
        }
        if highest_rrvp < RRVP_MAX {
            let delta = RRVP_MAX - highest_rrvp;
            for line in set.lines_mut() {
                line.rrvp = line.rrvp.saturating_add(delta).min(RRVP_MAX);
            }
        }
        let _ = set.camp_history_push(need);
    }
    evicted
}
