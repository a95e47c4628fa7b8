//! # Panel Orchestration
//!
//! Concurrent evaluator fan-out with consensus synthesis. The coordinator
//! isolates per-evaluator failure, keeps output ordering deterministic, and
//! derives the summary and ranked recommendations the workflow engine seeds
//! work items from.

pub mod coordinator;
pub mod types;

pub use coordinator::PanelCoordinator;
pub use types::{AnalysisSummary, Consensus, MultiEvaluatorAnalysis};
