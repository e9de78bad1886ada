//! Pools of candidate points for refinement.
//!
//! Two flavours exist:
//! - [`RefinableNodesSet`]: grid points that still have a missing child (classical
//!   surplus refinement, refined with a children-creating strategy)
//! - [`AdmissibleSparseGridNodeSet`]: points outside the grid whose hierarchical parents
//!   are all in the grid (node-adding refinement, refined with
//!   [`crate::numerical::sparse_grid::local_refinement::AddNode`])
//!
//! Both honour the same [`RefinementLimits`] as the local refinement strategies: points
//! that no strategy may refine (too deep, or on the border when border refinement is
//! off) are never candidates.
use crate::numerical::sparse_grid::grid::Grid;
use crate::numerical::sparse_grid::grid_point::GridPoint;
use crate::numerical::sparse_grid::local_refinement::RefinementLimits;
use enum_dispatch::enum_dispatch;
use log::debug;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissibleSetKind {
    /// candidates are points of the grid
    GridNodes,
    /// candidates are nodes not yet in the grid
    SparseGridNodes,
}

#[enum_dispatch]
pub trait AdmissibleSet {
    /// candidates in enumeration order
    fn values(&self) -> Vec<GridPoint>;
    /// folds newly created points into the pool and retires points no longer eligible
    fn update(&mut self, grid: &Grid, new_points: &[GridPoint]);
    fn size(&self) -> usize;
    fn kind(&self) -> AdmissibleSetKind;
    fn limits(&self) -> RefinementLimits;
    /// Switches to new limits: retires candidates the limits exclude and adds grid-derived
    /// candidates they admit again. Surviving candidates keep their order.
    fn set_limits(&mut self, grid: &Grid, limits: RefinementLimits);
}

#[enum_dispatch(AdmissibleSet)]
#[derive(Debug, Clone)]
pub enum AdmissibleSetEnum {
    RefinableNodes(RefinableNodesSet),
    SparseGridNodes(AdmissibleSparseGridNodeSet),
}

// ordered set: enumeration order is insertion order
#[derive(Debug, Clone, Default)]
struct OrderedPoints {
    points: Vec<GridPoint>,
    members: HashSet<GridPoint>,
}

impl OrderedPoints {
    fn push(&mut self, point: GridPoint) {
        if self.members.insert(point.clone()) {
            self.points.push(point);
        }
    }

    fn retain<F: Fn(&GridPoint) -> bool>(&mut self, keep: F) {
        let members = &mut self.members;
        self.points.retain(|p| {
            let kept = keep(p);
            if !kept {
                members.remove(p);
            }
            kept
        });
    }
}

fn border_allowed(point: &GridPoint, limits: &RefinementLimits) -> bool {
    limits.ref_on_border || !point.is_on_border()
}

fn has_missing_child(grid: &Grid, point: &GridPoint, max_level: u32) -> bool {
    (0..point.dim()).any(|d| {
        point
            .children(d)
            .iter()
            .any(|c| c.level(d) <= max_level && !grid.contains(c))
    })
}

// grid point a children-creating strategy can still refine
fn is_refinable(grid: &Grid, point: &GridPoint, limits: &RefinementLimits) -> bool {
    grid.contains(point)
        && border_allowed(point, limits)
        && has_missing_child(grid, point, limits.max_level)
}

// node outside the grid that can be added without unbalancing it
fn is_admissible_node(grid: &Grid, point: &GridPoint, limits: &RefinementLimits) -> bool {
    !grid.contains(point)
        && point.max_level() <= limits.max_level
        && border_allowed(point, limits)
        && point.parents().iter().all(|p| grid.contains(p))
}

/// Grid points with at least one missing child within the level limit
#[derive(Debug, Clone)]
pub struct RefinableNodesSet {
    limits: RefinementLimits,
    pool: OrderedPoints,
}

impl RefinableNodesSet {
    /// empty pool, border points admitted
    pub fn new(max_level: u32) -> Self {
        RefinableNodesSet::with_limits(RefinementLimits {
            max_level,
            ref_on_border: true,
        })
    }

    pub fn with_limits(limits: RefinementLimits) -> Self {
        RefinableNodesSet {
            limits,
            pool: OrderedPoints::default(),
        }
    }

    pub fn from_grid(grid: &Grid, max_level: u32) -> Self {
        let mut set = RefinableNodesSet::new(max_level);
        set.collect_from(grid);
        set
    }

    pub fn from_grid_with_limits(grid: &Grid, limits: RefinementLimits) -> Self {
        let mut set = RefinableNodesSet::with_limits(limits);
        set.collect_from(grid);
        set
    }

    fn collect_from(&mut self, grid: &Grid) {
        for point in grid.storage() {
            if is_refinable(grid, point, &self.limits) {
                self.pool.push(point.clone());
            }
        }
    }
}

impl AdmissibleSet for RefinableNodesSet {
    fn values(&self) -> Vec<GridPoint> {
        self.pool.points.clone()
    }

    fn update(&mut self, grid: &Grid, new_points: &[GridPoint]) {
        let limits = self.limits;
        let before = self.pool.points.len();
        self.pool.retain(|p| is_refinable(grid, p, &limits));
        for point in new_points {
            if is_refinable(grid, point, &limits) {
                self.pool.push(point.clone());
            }
        }
        debug!(
            "refinable nodes: {} -> {} candidates",
            before,
            self.pool.points.len()
        );
    }

    fn size(&self) -> usize {
        self.pool.points.len()
    }

    fn kind(&self) -> AdmissibleSetKind {
        AdmissibleSetKind::GridNodes
    }

    fn limits(&self) -> RefinementLimits {
        self.limits
    }

    fn set_limits(&mut self, grid: &Grid, limits: RefinementLimits) {
        let before = self.pool.points.len();
        self.limits = limits;
        self.pool.retain(|p| is_refinable(grid, p, &limits));
        self.collect_from(grid);
        debug!(
            "refinable nodes: limits changed to level {} (border {}), {} -> {} candidates",
            limits.max_level,
            limits.ref_on_border,
            before,
            self.pool.points.len()
        );
    }
}

/// Nodes outside the grid whose hierarchical parents are all in the grid
#[derive(Debug, Clone)]
pub struct AdmissibleSparseGridNodeSet {
    limits: RefinementLimits,
    pool: OrderedPoints,
}

impl AdmissibleSparseGridNodeSet {
    /// empty pool, border points admitted
    pub fn new(max_level: u32) -> Self {
        AdmissibleSparseGridNodeSet::with_limits(RefinementLimits {
            max_level,
            ref_on_border: true,
        })
    }

    pub fn with_limits(limits: RefinementLimits) -> Self {
        AdmissibleSparseGridNodeSet {
            limits,
            pool: OrderedPoints::default(),
        }
    }

    pub fn from_grid(grid: &Grid, max_level: u32) -> Self {
        let mut set = AdmissibleSparseGridNodeSet::new(max_level);
        set.collect_from(grid);
        set
    }

    pub fn from_grid_with_limits(grid: &Grid, limits: RefinementLimits) -> Self {
        let mut set = AdmissibleSparseGridNodeSet::with_limits(limits);
        set.collect_from(grid);
        set
    }

    fn collect_from(&mut self, grid: &Grid) {
        for point in grid.storage() {
            self.push_admissible_children(grid, point);
        }
    }

    fn push_admissible_children(&mut self, grid: &Grid, point: &GridPoint) {
        for d in 0..point.dim() {
            for child in point.children(d) {
                if is_admissible_node(grid, &child, &self.limits) {
                    self.pool.push(child);
                }
            }
        }
    }
}

impl AdmissibleSet for AdmissibleSparseGridNodeSet {
    fn values(&self) -> Vec<GridPoint> {
        self.pool.points.clone()
    }

    fn update(&mut self, grid: &Grid, new_points: &[GridPoint]) {
        let before = self.pool.points.len();
        self.pool.retain(|p| !grid.contains(p));
        for point in new_points {
            self.push_admissible_children(grid, point);
        }
        debug!(
            "admissible sparse grid nodes: {} -> {} candidates",
            before,
            self.pool.points.len()
        );
    }

    fn size(&self) -> usize {
        self.pool.points.len()
    }

    fn kind(&self) -> AdmissibleSetKind {
        AdmissibleSetKind::SparseGridNodes
    }

    fn limits(&self) -> RefinementLimits {
        self.limits
    }

    fn set_limits(&mut self, grid: &Grid, limits: RefinementLimits) {
        let before = self.pool.points.len();
        self.limits = limits;
        self.pool.retain(|p| is_admissible_node(grid, p, &limits));
        self.collect_from(grid);
        debug!(
            "admissible sparse grid nodes: limits changed to level {} (border {}), {} -> {} candidates",
            limits.max_level,
            limits.ref_on_border,
            before,
            self.pool.points.len()
        );
    }
}
