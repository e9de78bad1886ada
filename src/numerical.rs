/// Adaptive refinement of sparse grids: candidate ranking, budgeted refinement episodes,
/// admissible sets and their configuration
pub mod adaptive_refinement;
/// Sparse grid data structures: points, storage, grids, local refinement and balancing
pub mod sparse_grid;
