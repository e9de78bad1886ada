//! # Refinement manager
//!
//! Orchestrates one refinement episode on a sparse grid:
//! 1. validate the grid type and the configuration (nothing is mutated on failure)
//! 2. rank every admissible candidate for every time step with the refinement criterion,
//!    reusing ranks of (time step, point) pairs already computed in this pass
//! 3. optionally replace the ranks by look-ahead impact scores obtained by refining each
//!    candidate on a private copy of the grid
//! 4. reduce the per-timestep ranks to one score per candidate, keep the candidates
//!    scoring above the threshold, sort them ascending
//! 5. refine from the best candidate downwards until the budget is spent; refinements
//!    that create nothing do not consume budget
//! 6. optionally balance the grid, fold the new points into the admissible set and check
//!    that the grid grew by exactly the number of reported points
//!
//! Only the grid and the admissible set carry state from one episode to the next.
use crate::numerical::adaptive_refinement::admissible_set::{AdmissibleSet, AdmissibleSetKind};
use crate::numerical::adaptive_refinement::config::{
    LookAheadNormalization, MAX_SUPPORTED_LEVEL, RefinementConfig, RefinementSettings,
};
use crate::numerical::adaptive_refinement::criterion::{RankingParams, RefinementCriterion};
use crate::numerical::adaptive_refinement::error::RefinementError;
use crate::numerical::adaptive_refinement::knowledge::KnowledgeProvider;
use crate::numerical::adaptive_refinement::observer::{
    LogObserver, RefinementEvent, RefinementObserver,
};
use crate::numerical::adaptive_refinement::ranking_cache::RankingCache;
use crate::numerical::adaptive_refinement::reducer::{MaxReducer, Reducer};
use crate::numerical::adaptive_refinement::report::RefinementReport;
use crate::numerical::sparse_grid::balancing::balance;
use crate::numerical::sparse_grid::grid::Grid;
use crate::numerical::sparse_grid::grid_point::GridPoint;
use crate::numerical::sparse_grid::local_refinement::{LocalRefinementStrategy, RefinementLimits};
use log::warn;
use nalgebra::{DMatrix, DVector};

/// A candidate with its reduced score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub score: f64,
    pub point: GridPoint,
}

// result of the budgeted refine loop (and balancing)
#[derive(Debug, Default)]
struct RefineOutcome {
    budget: f64,
    new_points: Vec<GridPoint>,
    refined_points: Vec<GridPoint>,
    balanced_points: usize,
}

pub struct RefinementManager {
    config: RefinementConfig,
    admissible_set: Box<dyn AdmissibleSet>,
    criterion: Box<dyn RefinementCriterion>,
    local_refinement: Box<dyn LocalRefinementStrategy>,
    reducer: Box<dyn Reducer>,
    observer: Box<dyn RefinementObserver>,
}

impl RefinementManager {
    /// Manager with default configuration, a fresh max-over-timesteps reducer and a
    /// logging observer.
    pub fn new<A, C, S>(admissible_set: A, criterion: C, local_refinement: S) -> Self
    where
        A: AdmissibleSet + 'static,
        C: RefinementCriterion + 'static,
        S: LocalRefinementStrategy + 'static,
    {
        RefinementManager {
            config: RefinementConfig::default(),
            admissible_set: Box::new(admissible_set),
            criterion: Box::new(criterion),
            local_refinement: Box::new(local_refinement),
            reducer: Box::new(MaxReducer),
            observer: Box::new(LogObserver),
        }
    }
    /// builds the admissible set for `grid` and every component named in `settings`
    pub fn from_settings(settings: &RefinementSettings, grid: &Grid) -> Self {
        let admissible_set = settings
            .admissible_set
            .build(grid, settings.config.limits());
        RefinementManager::new(
            admissible_set,
            settings.criterion.clone(),
            settings.strategy.clone(),
        )
        .with_reducer(settings.reducer.clone())
        .with_config(settings.config.clone())
    }

    pub fn with_config(mut self, config: RefinementConfig) -> Self {
        self.config = config;
        self.config.max_level = self.config.max_level.min(MAX_SUPPORTED_LEVEL);
        self
    }

    pub fn with_reducer<R: Reducer + 'static>(mut self, reducer: R) -> Self {
        self.reducer = Box::new(reducer);
        self
    }

    pub fn with_observer<O: RefinementObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    pub fn set_adapt_threshold(&mut self, value: f64) {
        self.config.adapt_threshold = value;
    }

    pub fn set_adapt_points(&mut self, value: usize) {
        self.config.adapt_points = value;
    }

    pub fn set_adapt_rate(&mut self, value: f64) {
        self.config.adapt_rate = value;
    }

    pub fn set_adapt_time_window(&mut self, window: Vec<f64>) {
        self.config.adapt_time_window = window;
    }

    pub fn adapt_time_window(&self) -> &[f64] {
        &self.config.adapt_time_window
    }

    pub fn set_adapt_max_level(&mut self, level: u32) {
        self.config.max_level = level.min(MAX_SUPPORTED_LEVEL);
    }

    pub fn adapt_max_level(&self) -> u32 {
        self.config.max_level
    }

    pub fn has_balancing(&self) -> bool {
        self.config.balancing
    }

    pub fn set_balancing(&mut self, balancing: bool) {
        self.config.balancing = balancing;
    }

    pub fn has_average_weightening(&self) -> bool {
        self.config.average_weightening
    }

    pub fn set_average_weightening(&mut self, value: bool) {
        self.config.average_weightening = value;
    }

    pub fn refine_on_the_border(&mut self, ref_on_border: bool) {
        self.config.ref_on_border = ref_on_border;
    }

    pub fn set_admissible_set<A: AdmissibleSet + 'static>(&mut self, admissible_set: A) {
        self.admissible_set = Box::new(admissible_set);
    }

    pub fn admissible_set(&self) -> &dyn AdmissibleSet {
        self.admissible_set.as_ref()
    }

    pub fn set_refinement_criterion<C: RefinementCriterion + 'static>(&mut self, criterion: C) {
        self.criterion = Box::new(criterion);
    }

    pub fn refinement_criterion(&self) -> &dyn RefinementCriterion {
        self.criterion.as_ref()
    }

    pub fn set_local_refinement_strategy<S: LocalRefinementStrategy + 'static>(
        &mut self,
        strategy: S,
    ) {
        self.local_refinement = Box::new(strategy);
    }

    pub fn local_refinement_strategy(&self) -> &dyn LocalRefinementStrategy {
        self.local_refinement.as_ref()
    }

    fn limits(&self) -> RefinementLimits {
        self.config.limits()
    }

    /// Number of points to refine out of `refinable_points` candidates.
    ///
    /// The budget is real valued: the refine loop runs while it is strictly positive,
    /// so a rate-based budget of 2.5 allows three effective refinements.
    pub fn get_num_of_points_to_refine(&self, refinable_points: usize) -> f64 {
        let rate_points = self.config.adapt_rate * refinable_points as f64;
        if self.config.adapt_points == 0 {
            rate_points
        } else if self.config.adapt_rate == 0.0 {
            self.config.adapt_points as f64
        } else {
            rate_points.min(self.config.adapt_points as f64)
        }
    }

    /// fails for grid families the engine cannot refine and for invalid configurations
    pub fn check_grid(&self, grid: &Grid) -> Result<(), RefinementError> {
        if !grid.grid_type().is_refinement_supported() {
            return Err(RefinementError::UnsupportedGridType(grid.grid_type()));
        }
        self.config.validate()
    }

    fn fetch_alpha(
        &self,
        grid: &Grid,
        knowledge: &dyn KnowledgeProvider,
        qoi: &str,
        timestep: f64,
    ) -> Result<DVector<f64>, RefinementError> {
        let alphas = knowledge.get_alpha(qoi, timestep, self.criterion.knowledge_type())?;
        if alphas.len() != grid.size() {
            return Err(RefinementError::CoefficientLength {
                expected: grid.size(),
                actual: alphas.len(),
            });
        }
        Ok(alphas)
    }

    /// Ranked refinement candidates, ascending by score, all strictly above the threshold.
    pub fn candidates(
        &mut self,
        grid: &Grid,
        knowledge: &dyn KnowledgeProvider,
        params: &RankingParams,
        qoi: &str,
        timesteps: &[f64],
    ) -> Result<Vec<RankedCandidate>, RefinementError> {
        self.check_grid(grid)?;
        // the pool follows the manager's level and border limits
        let limits = self.limits();
        if self.admissible_set.limits() != limits {
            self.admissible_set.set_limits(grid, limits);
        }
        let data = self.admissible_set.values();
        self.observer.on_event(&RefinementEvent::RankingStarted {
            candidates: data.len(),
            timesteps: timesteps.len(),
        });

        let mut v = DMatrix::<f64>::zeros(data.len(), timesteps.len());
        let mut cache = RankingCache::new();
        for (i, &t) in timesteps.iter().enumerate() {
            let alphas = self.fetch_alpha(grid, knowledge, qoi, t)?;
            self.criterion
                .update(grid, &alphas, self.admissible_set.as_ref());
            for (j, point) in data.iter().enumerate() {
                let criterion = &self.criterion;
                v[(j, i)] =
                    cache.get_or_rank(t, point, || criterion.rank(grid, point, &alphas, params));
            }
            self.observer.on_event(&RefinementEvent::TimestepRanked {
                timestep: t,
                cache_hits: cache.hits(),
                cache_misses: cache.misses(),
            });
        }

        if self.config.average_weightening {
            if self.admissible_set.kind() == AdmissibleSetKind::SparseGridNodes {
                self.look_ahead_scores(grid, knowledge, params, qoi, timesteps, &data, &mut cache, &mut v)?;
            } else {
                warn!("look-ahead scoring needs a sparse grid node set, using plain ranks");
            }
        }

        let scores = self.reducer.reduce(&v);
        let threshold = self.config.adapt_threshold;
        let mut b: Vec<RankedCandidate> = data
            .into_iter()
            .zip(scores.iter())
            .filter(|(_, score)| **score > threshold)
            .map(|(point, &score)| RankedCandidate { score, point })
            .collect();
        // stable: equal scores keep enumeration order
        b.sort_by(|a, c| a.score.total_cmp(&c.score));
        self.observer.on_event(&RefinementEvent::CandidatesSelected {
            selected: b.len(),
            threshold,
        });
        Ok(b)
    }

    // Replaces the ranks in `v` by the ranks of the points each candidate would create.
    #[allow(clippy::too_many_arguments)]
    fn look_ahead_scores(
        &mut self,
        grid: &Grid,
        knowledge: &dyn KnowledgeProvider,
        params: &RankingParams,
        qoi: &str,
        timesteps: &[f64],
        data: &[GridPoint],
        cache: &mut RankingCache,
        v: &mut DMatrix<f64>,
    ) -> Result<(), RefinementError> {
        self.observer.on_event(&RefinementEvent::LookAheadStarted {
            candidates: data.len(),
        });
        let mut simulated: Vec<Vec<GridPoint>> = Vec::with_capacity(data.len());
        for (j, point) in data.iter().enumerate() {
            let mut copy = grid.clone();
            let single = vec![RankedCandidate {
                score: v.row(j).iter().copied().fold(f64::NEG_INFINITY, f64::max),
                point: point.clone(),
            }];
            let outcome = self.refine_candidates(&mut copy, single, true)?;
            simulated.push(outcome.new_points);
        }

        let n_candidates = simulated.len() as f64;
        for (i, &t) in timesteps.iter().enumerate() {
            let alphas = self.fetch_alpha(grid, knowledge, qoi, t)?;
            self.criterion
                .update(grid, &alphas, self.admissible_set.as_ref());
            let criterion = &self.criterion;
            let mut s = 0.0;
            for (j, points) in simulated.iter().enumerate() {
                match self.config.look_ahead_normalization {
                    LookAheadNormalization::Global => {
                        for gp in points {
                            s += cache.get_or_rank(t, gp, || criterion.rank(grid, gp, &alphas, params));
                        }
                        v[(j, i)] = s / n_candidates;
                    }
                    LookAheadNormalization::PerCandidate => {
                        let mut own = 0.0;
                        for gp in points {
                            own += cache.get_or_rank(t, gp, || criterion.rank(grid, gp, &alphas, params));
                        }
                        v[(j, i)] = if points.is_empty() {
                            0.0
                        } else {
                            own / points.len() as f64
                        };
                    }
                }
            }
        }
        Ok(())
    }

    // Budgeted refine loop followed by balancing. `simulate` only silences step events,
    // the caller decides whether `grid` is the real grid or a private copy.
    fn refine_candidates(
        &mut self,
        grid: &mut Grid,
        mut b: Vec<RankedCandidate>,
        simulate: bool,
    ) -> Result<RefineOutcome, RefinementError> {
        let budget = self.get_num_of_points_to_refine(b.len());
        let mut points_num = budget;
        let limits = self.limits();
        let size_before = grid.size();
        let mut outcome = RefineOutcome {
            budget,
            ..Default::default()
        };

        while points_num > 0.0 {
            // the highest rated candidate is at the end
            let Some(candidate) = b.pop() else {
                break;
            };
            let old_size = grid.size();
            let nps = self.local_refinement.refine(grid, &candidate.point, &limits);
            if grid.size() != old_size + nps.len() {
                return Err(RefinementError::InvariantViolation {
                    expected: nps.len(),
                    actual: grid.size() - old_size,
                    context: format!(
                        "{} refinement of {}",
                        self.local_refinement.name(),
                        candidate.point
                    ),
                });
            }
            if !nps.is_empty() {
                points_num -= 1.0;
                outcome.refined_points.push(candidate.point.clone());
                outcome.new_points.extend(nps);
                if !simulate {
                    self.observer.on_event(&RefinementEvent::PointRefined {
                        point: candidate.point,
                        score: candidate.score,
                        budget_left: points_num,
                        candidates_left: b.len(),
                        new_points: outcome.new_points.len(),
                        refined_points: outcome.refined_points.len(),
                    });
                }
            }
        }

        if self.config.balancing {
            let balanced = balance(grid);
            outcome.balanced_points = balanced.len();
            outcome.new_points.extend(balanced);
            if !simulate {
                self.observer.on_event(&RefinementEvent::Balanced {
                    added: outcome.balanced_points,
                });
            }
        }

        let grown = grid.size() - size_before;
        if outcome.new_points.len() != grown {
            return Err(RefinementError::InvariantViolation {
                expected: outcome.new_points.len(),
                actual: grown,
                context: "refinement episode".to_string(),
            });
        }
        Ok(outcome)
    }

    /// One committed refinement episode with its summary.
    ///
    /// When no candidate passes the threshold the grid and the admissible set are left
    /// untouched (balancing is not run either).
    pub fn refine_grid_with_report(
        &mut self,
        grid: &mut Grid,
        knowledge: &dyn KnowledgeProvider,
        params: &RankingParams,
        qoi: &str,
        timesteps: &[f64],
    ) -> Result<RefinementReport, RefinementError> {
        let grid_size_before = grid.size();
        let b = self.candidates(grid, knowledge, params, qoi, timesteps)?;
        let candidates = b.len();
        if b.is_empty() {
            self.observer.on_event(&RefinementEvent::EpisodeFinished {
                new_points: 0,
                grid_size: grid.size(),
            });
            return Ok(RefinementReport {
                grid_size_before,
                grid_size_after: grid_size_before,
                ..Default::default()
            });
        }

        let outcome = self.refine_candidates(grid, b, false)?;
        self.admissible_set.update(grid, &outcome.new_points);
        self.observer.on_event(&RefinementEvent::EpisodeFinished {
            new_points: outcome.new_points.len(),
            grid_size: grid.size(),
        });
        Ok(RefinementReport {
            grid_size_before,
            grid_size_after: grid.size(),
            candidates,
            budget: outcome.budget,
            refined_points: outcome.refined_points,
            new_points: outcome.new_points,
            balanced_points: outcome.balanced_points,
        })
    }

    /// One committed refinement episode; returns the created points.
    pub fn refine_grid(
        &mut self,
        grid: &mut Grid,
        knowledge: &dyn KnowledgeProvider,
        params: &RankingParams,
        qoi: &str,
        timesteps: &[f64],
    ) -> Result<Vec<GridPoint>, RefinementError> {
        let report = self.refine_grid_with_report(grid, knowledge, params, qoi, timesteps)?;
        Ok(report.new_points)
    }

    /// [`RefinementManager::refine_grid`] over the configured time window (time step 0.0
    /// when the window is empty)
    pub fn refine_window(
        &mut self,
        grid: &mut Grid,
        knowledge: &dyn KnowledgeProvider,
        params: &RankingParams,
        qoi: &str,
    ) -> Result<Vec<GridPoint>, RefinementError> {
        let window = if self.config.adapt_time_window.is_empty() {
            vec![0.0]
        } else {
            self.config.adapt_time_window.clone()
        };
        self.refine_grid(grid, knowledge, params, qoi, &window)
    }
}
