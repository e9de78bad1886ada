use crate::numerical::sparse_grid::grid_point::GridPoint;
use std::collections::HashMap;
use std::ops::Index;

/// Insertion-ordered hash storage of grid points.
///
/// The sequence number of a point (its position in insertion order) never changes, so a
/// coefficient vector produced for a grid stays aligned with `get(seq)` after the grid
/// has been refined: new points are only appended.
#[derive(Debug, Clone, Default)]
pub struct GridStorage {
    dim: usize,
    points: Vec<GridPoint>,
    seq_of: HashMap<GridPoint, usize>,
}

impl GridStorage {
    pub fn new(dim: usize) -> Self {
        GridStorage {
            dim,
            points: Vec::new(),
            seq_of: HashMap::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: &GridPoint) -> bool {
        self.seq_of.contains_key(point)
    }
    /// sequence number of a point, None if the point is not stored
    pub fn seq(&self, point: &GridPoint) -> Option<usize> {
        self.seq_of.get(point).copied()
    }

    pub fn get(&self, seq: usize) -> Option<&GridPoint> {
        self.points.get(seq)
    }
    /// inserts a point, returns false if it was already present
    pub fn insert(&mut self, point: GridPoint) -> bool {
        assert_eq!(point.dim(), self.dim, "point dimension mismatch");
        if self.seq_of.contains_key(&point) {
            return false;
        }
        self.seq_of.insert(point.clone(), self.points.len());
        self.points.push(point);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridPoint> {
        self.points.iter()
    }
}

impl Index<usize> for GridStorage {
    type Output = GridPoint;
    fn index(&self, seq: usize) -> &GridPoint {
        &self.points[seq]
    }
}

impl<'a> IntoIterator for &'a GridStorage {
    type Item = &'a GridPoint;
    type IntoIter = std::slice::Iter<'a, GridPoint>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
