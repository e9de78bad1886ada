//! # Sparse grid collaborators
//!
//! Minimal hash-based sparse grid the refinement engine operates on:
//! - [`grid_point`]: level/index identity of a point and its hierarchy (parents, children)
//! - [`grid_storage`]: insertion-ordered point storage, sequence numbers align coefficients
//! - [`grid`]: typed grid with regular generation
//! - [`local_refinement`]: strategies refining one selected point
//! - [`balancing`]: insertion of missing hierarchical ancestors
//!
//! Basis evaluation and hierarchisation are not part of this crate: coefficients are
//! supplied from outside through a knowledge provider.
pub mod balancing;
pub mod grid;
pub mod grid_point;
pub mod grid_storage;
pub mod local_refinement;
