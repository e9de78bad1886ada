use crate::numerical::sparse_grid::grid_point::GridPoint;
use crate::numerical::sparse_grid::grid_storage::GridStorage;
use log::info;
use strum_macros::{Display, EnumIter};

/// Basis families a grid can be built for.
///
/// Only the piecewise linear and polynomial families take part in adaptive refinement,
/// see [`GridType::is_refinement_supported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum GridType {
    Linear,
    LinearL0Boundary,
    LinearBoundary,
    ModLinear,
    Poly,
    PolyBoundary,
    LinearStretched,
    Bspline,
    Wavelet,
    Prewavelet,
}

impl GridType {
    pub fn is_refinement_supported(&self) -> bool {
        matches!(
            self,
            GridType::Linear
                | GridType::LinearL0Boundary
                | GridType::LinearBoundary
                | GridType::ModLinear
                | GridType::Poly
                | GridType::PolyBoundary
        )
    }

    pub fn has_boundary(&self) -> bool {
        matches!(
            self,
            GridType::LinearL0Boundary | GridType::LinearBoundary | GridType::PolyBoundary
        )
    }
    // contribution of a level-0 (boundary) pair to the level sum of a regular grid
    fn boundary_level_cost(&self) -> u32 {
        match self {
            GridType::LinearL0Boundary => 0,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    grid_type: GridType,
    storage: GridStorage,
}

impl Grid {
    /// empty grid of given type and dimension
    pub fn new(grid_type: GridType, dim: usize) -> Self {
        Grid {
            grid_type,
            storage: GridStorage::new(dim),
        }
    }

    /// Regular sparse grid of level `n`: every point whose level sum does not exceed
    /// `n + dim - 1`. Boundary families add level-0 pairs, counted as level 1
    /// (level 0 for `LinearL0Boundary`).
    pub fn regular(grid_type: GridType, dim: usize, n: u32) -> Self {
        let mut grid = Grid::new(grid_type, dim);
        if dim == 0 || n == 0 {
            return grid;
        }
        let budget = n + dim as u32 - 1;
        // partial points: (levels, indices, accumulated cost)
        let mut partial: Vec<(Vec<u32>, Vec<u32>, u32)> = vec![(Vec::new(), Vec::new(), 0)];
        for _ in 0..dim {
            let mut extended = Vec::new();
            for (levels, indices, cost) in partial.iter() {
                if grid_type.has_boundary() {
                    let c = cost + grid_type.boundary_level_cost();
                    if c <= budget {
                        for i in 0..2 {
                            let (mut l, mut idx) = (levels.clone(), indices.clone());
                            l.push(0);
                            idx.push(i);
                            extended.push((l, idx, c));
                        }
                    }
                }
                for level in 1..=n {
                    let c = cost + level;
                    if c > budget {
                        break;
                    }
                    for i in (1..(1u32 << level)).step_by(2) {
                        let (mut l, mut idx) = (levels.clone(), indices.clone());
                        l.push(level);
                        idx.push(i);
                        extended.push((l, idx, c));
                    }
                }
            }
            partial = extended;
        }
        // keep the hierarchical order: coarser points first
        partial.sort_by_key(|(levels, _, cost)| (*cost, levels.clone()));
        for (levels, indices, _) in partial {
            grid.storage.insert(GridPoint::new(levels, indices));
        }
        info!(
            "created regular {} grid of dimension {} and level {} with {} points",
            grid_type,
            dim,
            n,
            grid.size()
        );
        grid
    }

    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    pub fn dim(&self) -> usize {
        self.storage.dim()
    }

    pub fn size(&self) -> usize {
        self.storage.len()
    }

    pub fn storage(&self) -> &GridStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut GridStorage {
        &mut self.storage
    }

    pub fn contains(&self, point: &GridPoint) -> bool {
        self.storage.contains(point)
    }
    /// point by sequence number
    pub fn point(&self, seq: usize) -> Option<&GridPoint> {
        self.storage.get(seq)
    }
    /// inserts a point, returns false if it was already in the grid
    pub fn insert(&mut self, point: GridPoint) -> bool {
        self.storage.insert(point)
    }
}
