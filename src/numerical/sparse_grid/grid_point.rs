//! Level/index identity of a sparse grid point.
//!
//! In every dimension a point is described by a pair `(l, i)`:
//! - `l >= 1`, `i` odd with `1 <= i < 2^l` for inner points, coordinate `i * 2^-l`
//! - `l == 0`, `i` in `{0, 1}` for boundary points, coordinate `i`
//!
//! Hierarchical parent of `(l, i)` with `l > 1` is the unique odd pair one level up,
//! children of `(l, i)` are `(l + 1, 2i - 1)` and `(l + 1, 2i + 1)`. A boundary pair
//! `(0, i)` has the single child `(1, 1)`.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    level: Vec<u32>,
    index: Vec<u32>,
}

impl GridPoint {
    /// creates a point from per-dimension levels and indices
    pub fn new(level: Vec<u32>, index: Vec<u32>) -> Self {
        assert_eq!(
            level.len(),
            index.len(),
            "level and index must have the same dimension"
        );
        GridPoint { level, index }
    }
    /// the root point (1,1) in every dimension
    pub fn root(dim: usize) -> Self {
        GridPoint {
            level: vec![1; dim],
            index: vec![1; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.level.len()
    }

    pub fn level(&self, d: usize) -> u32 {
        self.level[d]
    }

    pub fn index(&self, d: usize) -> u32 {
        self.index[d]
    }

    pub fn levels(&self) -> &[u32] {
        &self.level
    }

    pub fn indices(&self) -> &[u32] {
        &self.index
    }
    /// |l|_1, boundary levels count as zero
    pub fn level_sum(&self) -> u32 {
        self.level.iter().sum()
    }

    pub fn max_level(&self) -> u32 {
        self.level.iter().copied().max().unwrap_or(0)
    }

    pub fn coordinate(&self, d: usize) -> f64 {
        if self.level[d] == 0 {
            self.index[d] as f64
        } else {
            self.index[d] as f64 / (1u64 << self.level[d]) as f64
        }
    }

    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.dim()).map(|d| self.coordinate(d)).collect()
    }
    /// true if the point lies on the boundary of the unit hypercube in any dimension
    pub fn is_on_border(&self) -> bool {
        self.level.iter().any(|&l| l == 0)
    }
    /// hierarchical parent in dimension `d`, None for level 1 and boundary points
    pub fn parent(&self, d: usize) -> Option<GridPoint> {
        let l = self.level[d];
        if l <= 1 {
            return None;
        }
        let i = self.index[d];
        let parent_index = if ((i + 1) / 2) % 2 == 1 {
            (i + 1) / 2
        } else {
            (i - 1) / 2
        };
        let mut parent = self.clone();
        parent.level[d] = l - 1;
        parent.index[d] = parent_index;
        Some(parent)
    }
    /// all hierarchical parents (one per dimension with level > 1)
    pub fn parents(&self) -> Vec<GridPoint> {
        (0..self.dim()).filter_map(|d| self.parent(d)).collect()
    }
    /// children in dimension `d`
    pub fn children(&self, d: usize) -> Vec<GridPoint> {
        let l = self.level[d];
        let i = self.index[d];
        if l == 0 {
            let mut child = self.clone();
            child.level[d] = 1;
            child.index[d] = 1;
            return vec![child];
        }
        let mut left = self.clone();
        left.level[d] = l + 1;
        left.index[d] = 2 * i - 1;
        let mut right = self.clone();
        right.level[d] = l + 1;
        right.index[d] = 2 * i + 1;
        vec![left, right]
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .level
            .iter()
            .zip(self.index.iter())
            .map(|(l, i)| format!("({}, {})", l, i))
            .collect();
        write!(f, "[{}]", pairs.join(", "))
    }
}
