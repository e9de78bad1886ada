//! Local refinement strategies: how a single selected point is refined.
//!
//! Strategies only create the points they are responsible for (children of the refined
//! point, or the node itself). They never insert other hierarchical ancestors, that is
//! the job of [`crate::numerical::sparse_grid::balancing::balance`].
use crate::numerical::sparse_grid::grid::Grid;
use crate::numerical::sparse_grid::grid_point::GridPoint;
use enum_dispatch::enum_dispatch;
use log::debug;

/// Limits every strategy has to respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementLimits {
    /// maximal level per dimension of a created point
    pub max_level: u32,
    /// if false, points lying on the domain boundary are never refined
    pub ref_on_border: bool,
}

impl Default for RefinementLimits {
    fn default() -> Self {
        RefinementLimits {
            max_level: 30,
            ref_on_border: true,
        }
    }
}

#[enum_dispatch]
pub trait LocalRefinementStrategy {
    /// Refines `point` in place and returns the points that were created.
    /// An empty vector means the refinement was a no-op.
    fn refine(&self, grid: &mut Grid, point: &GridPoint, limits: &RefinementLimits)
    -> Vec<GridPoint>;

    fn name(&self) -> &str;
}

/// Built-in strategies
#[enum_dispatch(LocalRefinementStrategy)]
#[derive(Debug, Clone)]
pub enum LocalRefinementKind {
    CreateAllChildren(CreateAllChildrenRefinement),
    Anova(AnovaRefinement),
    AddNode(AddNode),
}

// inserts the children of `point` in dimension `d` that are missing and within limits
fn insert_children(
    grid: &mut Grid,
    point: &GridPoint,
    d: usize,
    limits: &RefinementLimits,
    created: &mut Vec<GridPoint>,
) {
    for child in point.children(d) {
        if child.level(d) > limits.max_level {
            continue;
        }
        if grid.insert(child.clone()) {
            created.push(child);
        }
    }
}

/// Creates all missing children of a point in every dimension.
#[derive(Debug, Clone, Default)]
pub struct CreateAllChildrenRefinement;

impl LocalRefinementStrategy for CreateAllChildrenRefinement {
    fn refine(
        &self,
        grid: &mut Grid,
        point: &GridPoint,
        limits: &RefinementLimits,
    ) -> Vec<GridPoint> {
        let mut created = Vec::new();
        if !limits.ref_on_border && point.is_on_border() {
            debug!("{} lies on the border, not refined", point);
            return created;
        }
        for d in 0..point.dim() {
            insert_children(grid, point, d, limits, &mut created);
        }
        created
    }

    fn name(&self) -> &str {
        "create all children"
    }
}

/// Dimension-adaptive refinement: children are created only in dimensions the point is
/// already active in (level > 1). Points active in no dimension (the root, or points
/// with only level 1 and boundary pairs) are refined in every dimension.
#[derive(Debug, Clone, Default)]
pub struct AnovaRefinement;

impl LocalRefinementStrategy for AnovaRefinement {
    fn refine(
        &self,
        grid: &mut Grid,
        point: &GridPoint,
        limits: &RefinementLimits,
    ) -> Vec<GridPoint> {
        let mut created = Vec::new();
        if !limits.ref_on_border && point.is_on_border() {
            return created;
        }
        let active: Vec<usize> = (0..point.dim()).filter(|&d| point.level(d) > 1).collect();
        let dims: Vec<usize> = if active.is_empty() {
            (0..point.dim()).collect()
        } else {
            active
        };
        for d in dims {
            insert_children(grid, point, d, limits, &mut created);
        }
        created
    }

    fn name(&self) -> &str {
        "anova"
    }
}

/// Inserts the candidate itself. Used when the candidates are nodes outside the grid.
#[derive(Debug, Clone, Default)]
pub struct AddNode;

impl LocalRefinementStrategy for AddNode {
    fn refine(
        &self,
        grid: &mut Grid,
        point: &GridPoint,
        limits: &RefinementLimits,
    ) -> Vec<GridPoint> {
        if point.max_level() > limits.max_level
            || (!limits.ref_on_border && point.is_on_border())
        {
            return Vec::new();
        }
        if grid.insert(point.clone()) {
            vec![point.clone()]
        } else {
            Vec::new()
        }
    }

    fn name(&self) -> &str {
        "add node"
    }
}
