//! # Adaptive refinement
//!
//! A [`manager::RefinementManager`] turns the hierarchical coefficients of a quantity of
//! interest into a refined grid. One call of
//! [`manager::RefinementManager::refine_grid`] is one episode:
//! ```text
//! admissible set --rank per time step--> ranks --reduce--> scores --threshold/sort-->
//! candidates --budgeted local refinement--> new points --balance--> admissible set update
//! ```
//! The pieces are exchangeable:
//! - [`criterion`] ranks a candidate from its (possibly predicted) surplus
//! - [`reducer`] folds the ranks of all time steps into one score
//! - [`admissible_set`] keeps the candidates between episodes
//! - [`crate::numerical::sparse_grid::local_refinement`] decides what refining a point creates
//! - [`observer`] receives progress events
//!
//! Example
//! ```
//! use RustedSparseRefine::numerical::adaptive_refinement::admissible_set::RefinableNodesSet;
//! use RustedSparseRefine::numerical::adaptive_refinement::criterion::{RankingParams, SurplusRanking};
//! use RustedSparseRefine::numerical::adaptive_refinement::knowledge::{KnowledgeType, MemoryKnowledge};
//! use RustedSparseRefine::numerical::adaptive_refinement::manager::RefinementManager;
//! use RustedSparseRefine::numerical::sparse_grid::grid::{Grid, GridType};
//! use RustedSparseRefine::numerical::sparse_grid::local_refinement::CreateAllChildrenRefinement;
//! use nalgebra::DVector;
//!
//! let mut grid = Grid::regular(GridType::Linear, 2, 3);
//! let alphas = DVector::from_element(grid.size(), 1.0);
//! let knowledge = MemoryKnowledge::new().with_alpha("u", 0.0, KnowledgeType::Simple, alphas);
//! let admissible = RefinableNodesSet::from_grid(&grid, 10);
//! let mut manager = RefinementManager::new(admissible, SurplusRanking, CreateAllChildrenRefinement);
//! manager.set_adapt_points(2);
//! let size = grid.size();
//! let new_points = manager
//!     .refine_grid(&mut grid, &knowledge, &RankingParams::new(), "u", &[0.0])
//!     .unwrap();
//! assert_eq!(grid.size(), size + new_points.len());
//! ```
pub mod admissible_set;
pub mod config;
pub mod criterion;
pub mod error;
pub mod knowledge;
pub mod manager;
pub mod observer;
pub mod ranking_cache;
pub mod reducer;
pub mod report;

mod manager_tests;
