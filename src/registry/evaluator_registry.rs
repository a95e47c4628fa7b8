//! # Evaluator Registry
//!
//! Ordered, thread-safe registry of analysis evaluators.
//!
//! ## Overview
//!
//! The registry owns the canonical evaluator ordering: panel output is
//! always reported in registration order, never completion order, which is
//! what makes fan-out results deterministic. New evaluator kinds register
//! here without any change to the coordinator.
//!
//! ## Usage
//!
//! ```rust
//! use quorum_core::registry::EvaluatorRegistry;
//!
//! # tokio_test::block_on(async {
//! let registry = EvaluatorRegistry::default_panel();
//! assert_eq!(registry.len().await, 6);
//! assert_eq!(registry.ids().await.first().map(String::as_str), Some("architecture"));
//! # });
//! ```

use crate::error::{QuorumError, Result};
use crate::evaluators::{
    ArchitectureEvaluator, DocumentationEvaluator, Evaluator, ImplementationEvaluator,
    PerformanceEvaluator, SecurityEvaluator, TestingEvaluator,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Registry statistics snapshot
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_evaluators: usize,
    pub evaluator_ids: Vec<String>,
}

/// Ordered registry of evaluators
#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    evaluators: Arc<RwLock<Vec<Arc<dyn Evaluator>>>>,
}

impl EvaluatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            evaluators: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a registry holding the six built-in evaluators in canonical
    /// category order
    pub fn default_panel() -> Self {
        let evaluators: Vec<Arc<dyn Evaluator>> = vec![
            Arc::new(ArchitectureEvaluator),
            Arc::new(ImplementationEvaluator),
            Arc::new(TestingEvaluator),
            Arc::new(SecurityEvaluator),
            Arc::new(PerformanceEvaluator),
            Arc::new(DocumentationEvaluator),
        ];
        Self {
            evaluators: Arc::new(RwLock::new(evaluators)),
        }
    }

    /// Register an evaluator at the end of the panel order.
    /// Duplicate ids are refused.
    pub async fn register(&self, evaluator: Arc<dyn Evaluator>) -> Result<()> {
        let mut evaluators = self.evaluators.write().await;

        if evaluators.iter().any(|e| e.id() == evaluator.id()) {
            return Err(QuorumError::Validation(format!(
                "evaluator '{}' is already registered",
                evaluator.id()
            )));
        }

        info!(evaluator_id = evaluator.id(), "Registered evaluator");
        evaluators.push(evaluator);
        Ok(())
    }

    /// Look up a single evaluator by id
    pub async fn get(&self, id: &str) -> Option<Arc<dyn Evaluator>> {
        self.evaluators
            .read()
            .await
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    /// Snapshot the full panel in registration order
    pub async fn snapshot(&self) -> Vec<Arc<dyn Evaluator>> {
        self.evaluators.read().await.clone()
    }

    /// Select a subset by id, preserving registration order.
    /// An unknown id is a validation error; an empty selection is refused.
    pub async fn select(&self, ids: &[&str]) -> Result<Vec<Arc<dyn Evaluator>>> {
        if ids.is_empty() {
            return Err(QuorumError::Validation(
                "evaluator selection must not be empty".to_string(),
            ));
        }

        let evaluators = self.evaluators.read().await;

        for id in ids {
            if !evaluators.iter().any(|e| e.id() == *id) {
                return Err(QuorumError::Validation(format!(
                    "unknown evaluator: '{id}'"
                )));
            }
        }

        Ok(evaluators
            .iter()
            .filter(|e| ids.contains(&e.id()))
            .cloned()
            .collect())
    }

    /// Registered evaluator ids in panel order
    pub async fn ids(&self) -> Vec<String> {
        self.evaluators
            .read()
            .await
            .iter()
            .map(|e| e.id().to_string())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.evaluators.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.evaluators.read().await.is_empty()
    }

    /// Statistics snapshot for diagnostics
    pub async fn stats(&self) -> RegistryStats {
        let ids = self.ids().await;
        RegistryStats {
            total_evaluators: ids.len(),
            evaluator_ids: ids,
        }
    }
}
