//! Refinement criteria: scalar ranks of candidate points computed from hierarchical
//! surpluses.
//!
//! Candidates of a node set are not in the grid yet and have no coefficient. Their
//! surplus is predicted from the hierarchical parents that are in the grid (largest
//! magnitude), which is the usual a-priori estimate for node-adding refinement.
use crate::numerical::adaptive_refinement::admissible_set::AdmissibleSet;
use crate::numerical::adaptive_refinement::knowledge::KnowledgeType;
use crate::numerical::sparse_grid::grid::Grid;
use crate::numerical::sparse_grid::grid_point::GridPoint;
use enum_dispatch::enum_dispatch;
use nalgebra::DVector;

/// Problem parameters a criterion may use for ranking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingParams {
    /// lower and upper bound of the domain in each dimension; unit cube if None
    pub domain_bounds: Option<Vec<(f64, f64)>>,
}

impl RankingParams {
    pub fn new() -> Self {
        RankingParams {
            domain_bounds: None,
        }
    }

    pub fn with_bounds(bounds: Vec<(f64, f64)>) -> Self {
        RankingParams {
            domain_bounds: Some(bounds),
        }
    }
    /// volume of the domain, 1.0 for the unit cube
    pub fn domain_volume(&self) -> f64 {
        match &self.domain_bounds {
            Some(bounds) => bounds.iter().map(|(a, b)| (b - a).abs()).product(),
            None => 1.0,
        }
    }
}

#[enum_dispatch]
pub trait RefinementCriterion {
    /// coefficients this criterion ranks with
    fn knowledge_type(&self) -> KnowledgeType;
    /// absorbs the state of the current time step before ranking
    fn update(&mut self, _grid: &Grid, _alphas: &DVector<f64>, _admissible: &dyn AdmissibleSet) {}

    fn rank(
        &self,
        grid: &Grid,
        point: &GridPoint,
        alphas: &DVector<f64>,
        params: &RankingParams,
    ) -> f64;
}

/// Built-in criteria
#[enum_dispatch(RefinementCriterion)]
#[derive(Debug, Clone)]
pub enum CriterionKind {
    Surplus(SurplusRanking),
    SquaredSurplus(SquaredSurplusRanking),
    VolumeWeightedSurplus(VolumeWeightedSurplusRanking),
    RelativeSurplus(RelativeSurplusRanking),
}

/// Surplus of a point: its own coefficient if it is in the grid, otherwise the largest
/// magnitude among its parents in the grid (0.0 without any).
pub fn surplus_of(grid: &Grid, point: &GridPoint, alphas: &DVector<f64>) -> f64 {
    if let Some(seq) = grid.storage().seq(point) {
        if seq < alphas.len() {
            return alphas[seq];
        }
    }
    point
        .parents()
        .iter()
        .filter_map(|p| grid.storage().seq(p))
        .filter(|&seq| seq < alphas.len())
        .map(|seq| alphas[seq].abs())
        .fold(0.0, f64::max)
}

/// |alpha|
#[derive(Debug, Clone, Default)]
pub struct SurplusRanking;

impl RefinementCriterion for SurplusRanking {
    fn knowledge_type(&self) -> KnowledgeType {
        KnowledgeType::Simple
    }

    fn rank(
        &self,
        grid: &Grid,
        point: &GridPoint,
        alphas: &DVector<f64>,
        _params: &RankingParams,
    ) -> f64 {
        surplus_of(grid, point, alphas).abs()
    }
}

/// alpha^2 of the surpluses of the squared function
#[derive(Debug, Clone, Default)]
pub struct SquaredSurplusRanking;

impl RefinementCriterion for SquaredSurplusRanking {
    fn knowledge_type(&self) -> KnowledgeType {
        KnowledgeType::Squared
    }

    fn rank(
        &self,
        grid: &Grid,
        point: &GridPoint,
        alphas: &DVector<f64>,
        _params: &RankingParams,
    ) -> f64 {
        surplus_of(grid, point, alphas).powi(2)
    }
}

/// |alpha| times the support volume of the hat function, 2^-|l|_1 scaled to the domain
#[derive(Debug, Clone, Default)]
pub struct VolumeWeightedSurplusRanking;

impl RefinementCriterion for VolumeWeightedSurplusRanking {
    fn knowledge_type(&self) -> KnowledgeType {
        KnowledgeType::Simple
    }

    fn rank(
        &self,
        grid: &Grid,
        point: &GridPoint,
        alphas: &DVector<f64>,
        params: &RankingParams,
    ) -> f64 {
        let volume = 2.0_f64.powi(-(point.level_sum() as i32)) * params.domain_volume();
        surplus_of(grid, point, alphas).abs() * volume
    }
}

/// |alpha| / max |alpha| of the current time step
#[derive(Debug, Clone)]
pub struct RelativeSurplusRanking {
    max_abs: f64,
}

impl RelativeSurplusRanking {
    pub fn new() -> Self {
        RelativeSurplusRanking { max_abs: 0.0 }
    }
}

impl Default for RelativeSurplusRanking {
    fn default() -> Self {
        Self::new()
    }
}

impl RefinementCriterion for RelativeSurplusRanking {
    fn knowledge_type(&self) -> KnowledgeType {
        KnowledgeType::Simple
    }

    fn update(&mut self, _grid: &Grid, alphas: &DVector<f64>, _admissible: &dyn AdmissibleSet) {
        self.max_abs = alphas.iter().fold(0.0, |acc, a| acc.max(a.abs()));
    }

    fn rank(
        &self,
        grid: &Grid,
        point: &GridPoint,
        alphas: &DVector<f64>,
        _params: &RankingParams,
    ) -> f64 {
        if self.max_abs == 0.0 {
            return 0.0;
        }
        surplus_of(grid, point, alphas).abs() / self.max_abs
    }
}
