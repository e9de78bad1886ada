use crate::numerical::adaptive_refinement::knowledge::KnowledgeType;
use crate::numerical::sparse_grid::grid::GridType;
use std::fmt;

/// Error types of the refinement engine
#[derive(Debug, Clone, PartialEq)]
pub enum RefinementError {
    /// grid family the engine cannot refine, raised before any mutation
    UnsupportedGridType(GridType),
    /// the grid grew by a different number of points than was reported
    InvariantViolation {
        expected: usize,
        actual: usize,
        context: String,
    },
    MissingKnowledge {
        qoi: String,
        timestep: f64,
        knowledge_type: KnowledgeType,
    },
    /// coefficient vector not aligned with the grid
    CoefficientLength { expected: usize, actual: usize },
    InvalidConfig(String),
    Io(String),
}

impl fmt::Display for RefinementError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RefinementError::UnsupportedGridType(grid_type) => {
                write!(f, "Grid type {} is not supported", grid_type)
            }
            RefinementError::InvariantViolation {
                expected,
                actual,
                context,
            } => write!(
                f,
                "Grid size invariant violated ({}): expected {} new points, grid grew by {}",
                context, expected, actual
            ),
            RefinementError::MissingKnowledge {
                qoi,
                timestep,
                knowledge_type,
            } => write!(
                f,
                "No {} coefficients for quantity '{}' at time step {}",
                knowledge_type, qoi, timestep
            ),
            RefinementError::CoefficientLength { expected, actual } => write!(
                f,
                "Coefficient vector has length {}, grid has {} points",
                actual, expected
            ),
            RefinementError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            RefinementError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RefinementError {}

impl From<std::io::Error> for RefinementError {
    fn from(err: std::io::Error) -> Self {
        RefinementError::Io(err.to_string())
    }
}
