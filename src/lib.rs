#![allow(clippy::doc_markdown)] // Allow technical terms like DashMap, Tokio in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Quorum Core
//!
//! Stateful workflow engine that turns free-text work requests into tracked,
//! dependency-gated work items using a panel of independent evaluators merged
//! into a single consensus.
//!
//! ## Overview
//!
//! A request fans out to every evaluator on the panel concurrently; their
//! scored opinions are synthesized into a consensus, a summary, and a ranked
//! recommendation list. The workflow engine seeds an ordered step sequence
//! from the consensus, gates each step on its dependencies, and recomputes
//! work item progress on every step mutation. A per-project context stack
//! preserves "where the user left off" across disconnected sessions.
//!
//! ## Architecture
//!
//! Four tightly coupled pieces make up the core:
//!
//! - **Panel orchestration** - concurrent evaluator fan-out with per-evaluator
//!   failure isolation and deterministic output ordering
//! - **Confidence scoring** - one pure function every evaluator scores through
//! - **Workflow engine** - the work item / step state machine with dependency
//!   gating and progress propagation
//! - **Context stack** - exactly one active resumption point per project, with
//!   nested push/pop semantics over a read-through cache
//!
//! Persistence is a collaborator, not a component: the engine talks to the
//! [`store`] traits and ships an in-memory implementation for tests and
//! single-process use.
//!
//! ## Module Organization
//!
//! - [`scoring`] - Deterministic confidence scoring
//! - [`evaluators`] - Evaluator contract and the six built-in perspectives
//! - [`registry`] - Ordered, thread-safe evaluator registry
//! - [`orchestration`] - Panel coordinator and consensus synthesis
//! - [`state_machine`] - Work item and step transition tables
//! - [`models`] - Entity records with creation and partial-update structs
//! - [`store`] - Persistence collaborator traits plus [`store::MemoryStore`]
//! - [`workflow`] - Work item lifecycle engine
//! - [`context_stack`] - Per-project resumption stack manager
//! - [`events`] - Broadcast lifecycle event publisher
//! - [`error`] - Structured error handling
//! - [`config`] - Environment-driven configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quorum_core::evaluators::EvaluationContext;
//! use quorum_core::events::EventPublisher;
//! use quorum_core::models::{WorkItemKind, WorkItemPriority};
//! use quorum_core::orchestration::PanelCoordinator;
//! use quorum_core::store::MemoryStore;
//! use quorum_core::workflow::{CreateWorkItemRequest, WorkflowEngine};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = PanelCoordinator::with_default_panel();
//! let context = EvaluationContext::from_description("add retry logic to the importer");
//! let analysis = coordinator.run_all(&context).await?;
//!
//! let engine = WorkflowEngine::new(Arc::new(MemoryStore::new()), EventPublisher::default());
//! let view = engine
//!     .create_work_item(
//!         CreateWorkItemRequest {
//!             project_id: "importer".to_string(),
//!             title: "Add retry logic".to_string(),
//!             kind: WorkItemKind::Feature,
//!             priority: WorkItemPriority::High,
//!         },
//!         &analysis,
//!     )
//!     .await?;
//!
//! println!("{} steps generated", view.steps.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod context_stack;
pub mod error;
pub mod evaluators;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod registry;
pub mod scoring;
pub mod state_machine;
pub mod store;
pub mod validation;
pub mod workflow;

pub use config::QuorumConfig;
pub use constants::{status_groups, system, thresholds, vocabulary};
// Re-export constants events with a distinct name to avoid clashing with the
// events module
pub use constants::events as system_events;
pub use context_stack::ContextStackManager;
pub use error::{QuorumError, Result};
pub use evaluators::{EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
pub use events::{EventPublisher, LifecycleEvent};
pub use models::{
    NewResumptionContext, ResumptionContext, Step, WorkItem, WorkItemKind, WorkItemPriority,
};
pub use orchestration::{AnalysisSummary, Consensus, MultiEvaluatorAnalysis, PanelCoordinator};
pub use registry::EvaluatorRegistry;
pub use scoring::{score, ScoringFactors};
pub use state_machine::{StepState, WorkItemState};
pub use store::MemoryStore;
pub use workflow::{CreateWorkItemRequest, WorkItemView, WorkflowEngine};
