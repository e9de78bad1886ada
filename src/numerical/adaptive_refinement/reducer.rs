use enum_dispatch::enum_dispatch;
use nalgebra::{DMatrix, DVector};

/// Combines the per-timestep ranks of every candidate (one row per candidate, one column
/// per time step) into one score per candidate.
#[enum_dispatch]
pub trait Reducer {
    fn reduce(&self, ranks: &DMatrix<f64>) -> DVector<f64>;
}

/// Built-in reducers
#[enum_dispatch(Reducer)]
#[derive(Debug, Clone)]
pub enum ReducerKind {
    Max(MaxReducer),
    Mean(MeanReducer),
    Sum(SumReducer),
    Weighted(WeightedReducer),
}

impl Default for ReducerKind {
    fn default() -> Self {
        ReducerKind::Max(MaxReducer)
    }
}

/// worst case over the time steps
#[derive(Debug, Clone, Default)]
pub struct MaxReducer;

impl Reducer for MaxReducer {
    fn reduce(&self, ranks: &DMatrix<f64>) -> DVector<f64> {
        DVector::from_iterator(
            ranks.nrows(),
            ranks
                .row_iter()
                .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeanReducer;

impl Reducer for MeanReducer {
    fn reduce(&self, ranks: &DMatrix<f64>) -> DVector<f64> {
        let n = ranks.ncols().max(1) as f64;
        DVector::from_iterator(ranks.nrows(), ranks.row_iter().map(|row| row.sum() / n))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SumReducer;

impl Reducer for SumReducer {
    fn reduce(&self, ranks: &DMatrix<f64>) -> DVector<f64> {
        DVector::from_iterator(ranks.nrows(), ranks.row_iter().map(|row| row.sum()))
    }
}

/// weighted sum over the time steps; weights beyond the number of columns are ignored,
/// missing weights count as zero
#[derive(Debug, Clone, Default)]
pub struct WeightedReducer {
    pub weights: Vec<f64>,
}

impl WeightedReducer {
    pub fn new(weights: Vec<f64>) -> Self {
        WeightedReducer { weights }
    }
}

impl Reducer for WeightedReducer {
    fn reduce(&self, ranks: &DMatrix<f64>) -> DVector<f64> {
        DVector::from_iterator(
            ranks.nrows(),
            ranks
                .row_iter()
                .map(|row| row.iter().zip(self.weights.iter()).map(|(r, w)| r * w).sum()),
        )
    }
}
