use crate::numerical::sparse_grid::grid_point::GridPoint;
use std::collections::HashMap;

/// Ranks already computed within one candidate-ranking pass, keyed by time step and
/// structural point identity (level/index vectors, so clones of a grid share entries).
/// Lives only as long as the pass: coefficients may change between passes.
#[derive(Debug, Default)]
pub struct RankingCache {
    ranks: HashMap<u64, HashMap<GridPoint, f64>>,
    hits: usize,
    misses: usize,
}

impl RankingCache {
    pub fn new() -> Self {
        RankingCache::default()
    }
    /// cached rank of `point` at `timestep`, computed with `compute` on a miss
    pub fn get_or_rank<F>(&mut self, timestep: f64, point: &GridPoint, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        let step = self.ranks.entry(timestep.to_bits()).or_default();
        if let Some(&rank) = step.get(point) {
            self.hits += 1;
            return rank;
        }
        self.misses += 1;
        let rank = compute();
        step.insert(point.clone(), rank);
        rank
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
    /// number of cached (time step, point) pairs
    pub fn len(&self) -> usize {
        self.ranks.values().map(|step| step.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
