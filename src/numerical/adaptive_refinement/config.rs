//! Configuration of refinement episodes.
//!
//! [`RefinementConfig`] holds the numeric knobs of the manager. [`RefinementSettings`]
//! adds the choice of criterion, reducer, local strategy and admissible set plus the
//! logging level, and can be read from a task document:
//! ```text
//! refinement
//! adapt_points: 5
//! adapt_rate: 0.0
//! adapt_threshold: 1e-6
//! max_level: 12
//! adapt_time_window: 0.0, 1.0
//! balancing: true
//! average_weightening: false
//! ref_on_border: true
//! look_ahead_normalization: global
//! criterion
//! kind: surplus
//! reducer
//! kind: weighted
//! weights: 0.5, 0.5
//! strategy
//! kind: all_children
//! admissible_set
//! kind: refinable_nodes
//! logging
//! level: info
//! file: false
//! ```
//! Every section and key is optional, missing values keep their defaults.
use crate::Utils::task_parser::{DocumentMap, Value, parse_task};
use crate::numerical::adaptive_refinement::admissible_set::{
    AdmissibleSetEnum, AdmissibleSparseGridNodeSet, RefinableNodesSet,
};
use crate::numerical::adaptive_refinement::criterion::{
    CriterionKind, RelativeSurplusRanking, SquaredSurplusRanking, SurplusRanking,
    VolumeWeightedSurplusRanking,
};
use crate::numerical::adaptive_refinement::error::RefinementError;
use crate::numerical::adaptive_refinement::reducer::{
    MaxReducer, MeanReducer, ReducerKind, SumReducer, WeightedReducer,
};
use crate::numerical::sparse_grid::grid::Grid;
use crate::numerical::sparse_grid::local_refinement::{
    AddNode, AnovaRefinement, CreateAllChildrenRefinement, LocalRefinementKind,
    RefinementLimits,
};
use std::path::Path;

/// hard upper bound of the refinement level
pub const MAX_SUPPORTED_LEVEL: u32 = 31;

/// How look-ahead impact scores are normalised.
///
/// `Global` keeps one running sum per time step over all candidates and divides it by
/// the number of candidates, so later candidates accumulate the impact of earlier ones.
/// `PerCandidate` averages the ranks of each candidate's own simulated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookAheadNormalization {
    #[default]
    Global,
    PerCandidate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefinementConfig {
    /// fixed number of points to refine, 0 = not set
    pub adapt_points: usize,
    /// fraction of the refinable candidates to refine, 0.0 = not set
    pub adapt_rate: f64,
    /// candidates must score strictly above this value
    pub adapt_threshold: f64,
    pub max_level: u32,
    /// time steps whose coefficients are ranked
    pub adapt_time_window: Vec<f64>,
    pub balancing: bool,
    /// enables look-ahead scoring for node sets
    pub average_weightening: bool,
    pub ref_on_border: bool,
    pub look_ahead_normalization: LookAheadNormalization,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        RefinementConfig {
            adapt_points: 0,
            adapt_rate: 0.0,
            adapt_threshold: 0.0,
            max_level: 30,
            adapt_time_window: Vec::new(),
            balancing: false,
            average_weightening: false,
            ref_on_border: true,
            look_ahead_normalization: LookAheadNormalization::Global,
        }
    }
}

impl RefinementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adapt_points(mut self, points: usize) -> Self {
        self.adapt_points = points;
        self
    }

    pub fn with_adapt_rate(mut self, rate: f64) -> Self {
        self.adapt_rate = rate;
        self
    }

    pub fn with_adapt_threshold(mut self, threshold: f64) -> Self {
        self.adapt_threshold = threshold;
        self
    }
    /// levels above 31 are capped
    pub fn with_max_level(mut self, level: u32) -> Self {
        self.max_level = level.min(MAX_SUPPORTED_LEVEL);
        self
    }

    pub fn with_adapt_time_window(mut self, window: Vec<f64>) -> Self {
        self.adapt_time_window = window;
        self
    }

    pub fn with_balancing(mut self, balancing: bool) -> Self {
        self.balancing = balancing;
        self
    }

    pub fn with_average_weightening(mut self, value: bool) -> Self {
        self.average_weightening = value;
        self
    }

    pub fn with_ref_on_border(mut self, value: bool) -> Self {
        self.ref_on_border = value;
        self
    }

    pub fn with_look_ahead_normalization(mut self, value: LookAheadNormalization) -> Self {
        self.look_ahead_normalization = value;
        self
    }

    /// level and border limits shared by strategies and admissible sets
    pub fn limits(&self) -> RefinementLimits {
        RefinementLimits {
            max_level: self.max_level,
            ref_on_border: self.ref_on_border,
        }
    }

    pub fn validate(&self) -> Result<(), RefinementError> {
        if self.adapt_rate < 0.0 || !self.adapt_rate.is_finite() {
            return Err(RefinementError::InvalidConfig(format!(
                "adapt_rate must be a non-negative number, got {}",
                self.adapt_rate
            )));
        }
        if self.adapt_threshold.is_nan() {
            return Err(RefinementError::InvalidConfig(
                "adapt_threshold must not be NaN".to_string(),
            ));
        }
        Ok(())
    }
}

/// which admissible set to build for a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissibleSetChoice {
    #[default]
    RefinableNodes,
    SparseGridNodes,
}

impl AdmissibleSetChoice {
    pub fn build(&self, grid: &Grid, limits: RefinementLimits) -> AdmissibleSetEnum {
        match self {
            AdmissibleSetChoice::RefinableNodes => {
                RefinableNodesSet::from_grid_with_limits(grid, limits).into()
            }
            AdmissibleSetChoice::SparseGridNodes => {
                AdmissibleSparseGridNodeSet::from_grid_with_limits(grid, limits).into()
            }
        }
    }
}

/// Complete description of a refinement set-up
#[derive(Debug, Clone)]
pub struct RefinementSettings {
    pub config: RefinementConfig,
    pub criterion: CriterionKind,
    pub reducer: ReducerKind,
    pub strategy: LocalRefinementKind,
    pub admissible_set: AdmissibleSetChoice,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
}

impl Default for RefinementSettings {
    fn default() -> Self {
        RefinementSettings {
            config: RefinementConfig::default(),
            criterion: SurplusRanking.into(),
            reducer: ReducerKind::default(),
            strategy: CreateAllChildrenRefinement.into(),
            admissible_set: AdmissibleSetChoice::default(),
            loglevel: None,
            log_to_file: false,
        }
    }
}

fn invalid(section: &str, key: &str, expected: &str) -> RefinementError {
    RefinementError::InvalidConfig(format!("{}.{} must be {}", section, key, expected))
}

// single value of `section.key`, None if the key is absent
fn single<'a>(
    doc: &'a DocumentMap,
    section: &str,
    key: &str,
) -> Result<Option<&'a Value>, RefinementError> {
    match doc.get(section).and_then(|s| s.get(key)) {
        None => Ok(None),
        Some(values) if values.len() == 1 => Ok(Some(&values[0])),
        Some(_) => Err(invalid(section, key, "a single value")),
    }
}

fn float_value(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<f64>, RefinementError> {
    single(doc, section, key)?
        .map(|v| v.as_float().ok_or_else(|| invalid(section, key, "a number")))
        .transpose()
}

fn uint_value(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<u64>, RefinementError> {
    single(doc, section, key)?
        .map(|v| match v.as_integer() {
            Some(i) if i >= 0 => Ok(i as u64),
            _ => Err(invalid(section, key, "a non-negative integer")),
        })
        .transpose()
}

fn bool_value(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<bool>, RefinementError> {
    single(doc, section, key)?
        .map(|v| v.as_boolean().ok_or_else(|| invalid(section, key, "true or false")))
        .transpose()
}

fn string_value(
    doc: &DocumentMap,
    section: &str,
    key: &str,
) -> Result<Option<String>, RefinementError> {
    single(doc, section, key)?
        .map(|v| {
            v.as_string()
                .map(|s| s.to_lowercase())
                .ok_or_else(|| invalid(section, key, "a name"))
        })
        .transpose()
}

fn float_list(
    doc: &DocumentMap,
    section: &str,
    key: &str,
) -> Result<Option<Vec<f64>>, RefinementError> {
    match doc.get(section).and_then(|s| s.get(key)) {
        None => Ok(None),
        Some(values) => values
            .iter()
            .map(|v| v.as_float().ok_or_else(|| invalid(section, key, "a list of numbers")))
            .collect::<Result<Vec<f64>, RefinementError>>()
            .map(Some),
    }
}

impl RefinementSettings {
    pub fn from_document(doc: &DocumentMap) -> Result<Self, RefinementError> {
        let mut settings = RefinementSettings::default();
        let known = [
            "refinement",
            "criterion",
            "reducer",
            "strategy",
            "admissible_set",
            "logging",
        ];
        if let Some(unknown) = doc.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(RefinementError::InvalidConfig(format!(
                "unknown section '{}'",
                unknown
            )));
        }

        let mut config = RefinementConfig::default();
        if let Some(points) = uint_value(doc, "refinement", "adapt_points")? {
            config.adapt_points = points as usize;
        }
        if let Some(rate) = float_value(doc, "refinement", "adapt_rate")? {
            config.adapt_rate = rate;
        }
        if let Some(threshold) = float_value(doc, "refinement", "adapt_threshold")? {
            config.adapt_threshold = threshold;
        }
        if let Some(level) = uint_value(doc, "refinement", "max_level")? {
            config = config.with_max_level(level.min(MAX_SUPPORTED_LEVEL as u64) as u32);
        }
        if let Some(window) = float_list(doc, "refinement", "adapt_time_window")? {
            config.adapt_time_window = window;
        }
        if let Some(balancing) = bool_value(doc, "refinement", "balancing")? {
            config.balancing = balancing;
        }
        if let Some(value) = bool_value(doc, "refinement", "average_weightening")? {
            config.average_weightening = value;
        }
        if let Some(value) = bool_value(doc, "refinement", "ref_on_border")? {
            config.ref_on_border = value;
        }
        if let Some(name) = string_value(doc, "refinement", "look_ahead_normalization")? {
            config.look_ahead_normalization = match name.as_str() {
                "global" => LookAheadNormalization::Global,
                "per_candidate" => LookAheadNormalization::PerCandidate,
                _ => return Err(invalid("refinement", "look_ahead_normalization", "global or per_candidate")),
            };
        }
        config.validate()?;
        settings.config = config;

        if let Some(name) = string_value(doc, "criterion", "kind")? {
            settings.criterion = match name.as_str() {
                "surplus" => SurplusRanking.into(),
                "squared_surplus" => SquaredSurplusRanking.into(),
                "volume_weighted" => VolumeWeightedSurplusRanking.into(),
                "relative" => RelativeSurplusRanking::new().into(),
                _ => {
                    return Err(invalid(
                        "criterion",
                        "kind",
                        "surplus, squared_surplus, volume_weighted or relative",
                    ));
                }
            };
        }

        if let Some(name) = string_value(doc, "reducer", "kind")? {
            settings.reducer = match name.as_str() {
                "max" => MaxReducer.into(),
                "mean" => MeanReducer.into(),
                "sum" => SumReducer.into(),
                "weighted" => {
                    let weights = float_list(doc, "reducer", "weights")?
                        .ok_or_else(|| invalid("reducer", "weights", "given for a weighted reducer"))?;
                    WeightedReducer::new(weights).into()
                }
                _ => return Err(invalid("reducer", "kind", "max, mean, sum or weighted")),
            };
        }

        if let Some(name) = string_value(doc, "strategy", "kind")? {
            settings.strategy = match name.as_str() {
                "all_children" => CreateAllChildrenRefinement.into(),
                "anova" => AnovaRefinement.into(),
                "add_node" => AddNode.into(),
                _ => return Err(invalid("strategy", "kind", "all_children, anova or add_node")),
            };
        }

        if let Some(name) = string_value(doc, "admissible_set", "kind")? {
            settings.admissible_set = match name.as_str() {
                "refinable_nodes" => AdmissibleSetChoice::RefinableNodes,
                "sparse_grid_nodes" => AdmissibleSetChoice::SparseGridNodes,
                _ => {
                    return Err(invalid(
                        "admissible_set",
                        "kind",
                        "refinable_nodes or sparse_grid_nodes",
                    ));
                }
            };
        }

        settings.loglevel = string_value(doc, "logging", "level")?;
        if let Some(to_file) = bool_value(doc, "logging", "file")? {
            settings.log_to_file = to_file;
        }
        Ok(settings)
    }

    pub fn from_task_str(input: &str) -> Result<Self, RefinementError> {
        let doc = parse_task(input).map_err(RefinementError::InvalidConfig)?;
        Self::from_document(&doc)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RefinementError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_task_str(&content)
    }
}
