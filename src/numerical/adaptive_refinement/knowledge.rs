use crate::numerical::adaptive_refinement::error::RefinementError;
use nalgebra::DVector;
use std::collections::HashMap;
use strum_macros::{Display, EnumIter};

/// Kind of coefficients a refinement criterion needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum KnowledgeType {
    /// hierarchical surpluses of the function itself
    Simple,
    /// hierarchical surpluses of the squared function
    Squared,
    /// surpluses weighted by the expectation of the basis functions
    ExpectationValue,
}

/// Source of coefficient vectors aligned with the grid point ordering
pub trait KnowledgeProvider {
    fn get_alpha(
        &self,
        qoi: &str,
        timestep: f64,
        knowledge_type: KnowledgeType,
    ) -> Result<DVector<f64>, RefinementError>;
}

/// In-memory knowledge: coefficients stored per (qoi, time step, knowledge type)
#[derive(Debug, Clone, Default)]
pub struct MemoryKnowledge {
    alphas: HashMap<(String, u64, KnowledgeType), DVector<f64>>,
}

impl MemoryKnowledge {
    pub fn new() -> Self {
        MemoryKnowledge {
            alphas: HashMap::new(),
        }
    }

    pub fn set_alpha(
        &mut self,
        qoi: &str,
        timestep: f64,
        knowledge_type: KnowledgeType,
        alpha: DVector<f64>,
    ) {
        self.alphas
            .insert((qoi.to_string(), timestep.to_bits(), knowledge_type), alpha);
    }
    /// builder-style variant of [`MemoryKnowledge::set_alpha`]
    pub fn with_alpha(
        mut self,
        qoi: &str,
        timestep: f64,
        knowledge_type: KnowledgeType,
        alpha: DVector<f64>,
    ) -> Self {
        self.set_alpha(qoi, timestep, knowledge_type, alpha);
        self
    }

    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }
}

impl KnowledgeProvider for MemoryKnowledge {
    fn get_alpha(
        &self,
        qoi: &str,
        timestep: f64,
        knowledge_type: KnowledgeType,
    ) -> Result<DVector<f64>, RefinementError> {
        self.alphas
            .get(&(qoi.to_string(), timestep.to_bits(), knowledge_type))
            .cloned()
            .ok_or_else(|| RefinementError::MissingKnowledge {
                qoi: qoi.to_string(),
                timestep,
                knowledge_type,
            })
    }
}
