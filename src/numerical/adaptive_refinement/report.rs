use crate::numerical::sparse_grid::grid_point::GridPoint;
use tabled::{builder::Builder, settings::Style};

/// Summary of one committed refinement episode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefinementReport {
    pub grid_size_before: usize,
    pub grid_size_after: usize,
    /// candidates above the threshold
    pub candidates: usize,
    /// budget computed for the candidate list
    pub budget: f64,
    /// points whose refinement created at least one point
    pub refined_points: Vec<GridPoint>,
    /// every created point, balancing included
    pub new_points: Vec<GridPoint>,
    /// created by the balancing step alone
    pub balanced_points: usize,
}

impl RefinementReport {
    pub fn added(&self) -> usize {
        self.grid_size_after - self.grid_size_before
    }

    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["quantity".to_string(), "value".to_string()]);
        builder.push_record(["grid size before".to_string(), self.grid_size_before.to_string()]);
        builder.push_record(["grid size after".to_string(), self.grid_size_after.to_string()]);
        builder.push_record(["candidates".to_string(), self.candidates.to_string()]);
        builder.push_record(["budget".to_string(), format!("{}", self.budget)]);
        builder.push_record(["refined points".to_string(), self.refined_points.len().to_string()]);
        builder.push_record(["new points".to_string(), self.new_points.len().to_string()]);
        builder.push_record(["added by balancing".to_string(), self.balanced_points.to_string()]);
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}
