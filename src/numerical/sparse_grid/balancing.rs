//! Structural repair of a sparse grid: every point must have all of its hierarchical
//! parents (one per dimension with level > 1) in the grid. Local refinement that only
//! creates children of the refined point can violate this in dimensions other than the
//! refined one; [`balance`] inserts the missing ancestors.
use crate::numerical::sparse_grid::grid::Grid;
use crate::numerical::sparse_grid::grid_point::GridPoint;
use log::debug;
use std::collections::VecDeque;

/// Inserts every missing hierarchical ancestor of every grid point.
///
/// Returns the inserted points in insertion order. Inserted parents are checked as well,
/// so the grid is balanced when the function returns.
pub fn balance(grid: &mut Grid) -> Vec<GridPoint> {
    let mut queue: VecDeque<GridPoint> = grid.storage().iter().cloned().collect();
    let mut added = Vec::new();
    while let Some(point) = queue.pop_front() {
        for parent in point.parents() {
            if grid.insert(parent.clone()) {
                debug!("balancing: inserted {} as parent of {}", parent, point);
                added.push(parent.clone());
                queue.push_back(parent);
            }
        }
    }
    added
}

/// parents missing from the grid, each listed once
pub fn missing_ancestors(grid: &Grid) -> Vec<GridPoint> {
    let mut missing: Vec<GridPoint> = Vec::new();
    for point in grid.storage() {
        for parent in point.parents() {
            if !grid.contains(&parent) && !missing.contains(&parent) {
                missing.push(parent);
            }
        }
    }
    missing
}

pub fn is_balanced(grid: &Grid) -> bool {
    grid.storage()
        .iter()
        .all(|p| p.parents().iter().all(|parent| grid.contains(parent)))
}
