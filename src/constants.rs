//! # System Constants
//!
//! Core constants and fixed vocabularies that define the operational
//! boundaries of the quorum workflow system: lifecycle event names, the
//! keyword lists backing the panel's deterministic heuristics, confidence
//! thresholds, and status groupings used by gating logic.

// Re-export state types for convenience
pub use crate::state_machine::{StepState as StepStatus, WorkItemState as WorkItemStatus};

/// Core system events published on the lifecycle event channel
pub mod events {
    // Panel lifecycle events
    pub const PANEL_ANALYSIS_REQUESTED: &str = "panel.analysis_requested";
    pub const PANEL_ANALYSIS_COMPLETED: &str = "panel.analysis_completed";
    pub const PANEL_EVALUATOR_RECOVERED: &str = "panel.evaluator_recovered";

    // Work item lifecycle events
    pub const WORK_ITEM_CREATED: &str = "work_item.created";
    pub const WORK_ITEM_STARTED: &str = "work_item.started";
    pub const WORK_ITEM_COMPLETED: &str = "work_item.completed";
    pub const WORK_ITEM_CANCELLED: &str = "work_item.cancelled";
    pub const WORK_ITEM_BLOCKED: &str = "work_item.blocked";
    pub const WORK_ITEM_UNBLOCKED: &str = "work_item.unblocked";

    // Step lifecycle events
    pub const STEP_STARTED: &str = "step.started";
    pub const STEP_COMPLETED: &str = "step.completed";
    pub const STEP_FAILED: &str = "step.failed";
    pub const STEP_SKIPPED: &str = "step.skipped";

    // Resumption context events
    pub const CONTEXT_PUSHED: &str = "context.pushed";
    pub const CONTEXT_POPPED: &str = "context.popped";
    pub const CONTEXT_UPDATED: &str = "context.updated";
    pub const CONTEXT_SWEPT: &str = "context.swept";
}

/// Fixed keyword vocabularies behind the panel's deterministic checks.
///
/// The checks themselves are the contract; the particular words are an
/// implementation choice and may grow without breaking callers.
pub mod vocabulary {
    /// Terms counted for the architecture/implementation alignment check
    pub const ALIGNMENT_TERMS: &[&str] = &[
        "module",
        "interface",
        "boundary",
        "dependency",
        "contract",
        "layer",
        "schema",
        "api",
        "migration",
        "refactor",
    ];

    /// Markers that flag the risk-focused evaluator's text
    pub const RISK_MARKERS: &[&str] = &[
        "warning",
        "risk",
        "vulnerability",
        "caution",
        "unsafe",
        "critical",
    ];

    /// Keywords that promote a recommendation ahead of the rest
    pub const URGENCY_KEYWORDS: &[&str] = &[
        "critical",
        "urgent",
        "immediately",
        "security",
        "blocker",
        "must",
    ];
}

/// Confidence thresholds and panel output limits
pub mod thresholds {
    /// Responses at or above this confidence count as high confidence
    pub const HIGH_CONFIDENCE: f64 = 0.70;

    /// Responses below this confidence count as low confidence
    pub const LOW_CONFIDENCE: f64 = 0.50;

    /// Confidence assigned to the degraded substitute for a failed evaluator
    pub const DEGRADED_CONFIDENCE: f64 = 0.10;

    /// Shared alignment-term hits required to call two evaluators aligned
    pub const MIN_ALIGNMENT_MATCHES: usize = 2;

    /// Maximum ranked recommendations returned from one panel run
    pub const MAX_RECOMMENDATIONS: usize = 10;
}

/// System-wide constants
pub mod system {
    /// Unknown value placeholder
    pub const UNKNOWN: &str = "unknown";

    /// Version compatibility marker
    pub const QUORUM_CORE_VERSION: &str = "0.1.0";

    /// Maximum number of steps in a single work item
    pub const MAX_WORK_ITEM_STEPS: usize = 100;

    /// Maximum accepted length for a request description
    pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;
}

/// Status groupings for validation and gating logic
pub mod status_groups {
    use super::{StepStatus, WorkItemStatus};

    /// Step statuses that satisfy downstream dependencies
    pub const VALID_STEP_COMPLETION_STATES: &[StepStatus] = &[StepStatus::Completed];

    /// Step statuses that indicate work still to do
    pub const STEP_STILL_WORKING_STATES: &[StepStatus] = &[
        StepStatus::Pending,
        StepStatus::InProgress,
        StepStatus::Failed,
    ];

    /// Step statuses from which an explicit start is legal
    pub const STARTABLE_STEP_STATES: &[StepStatus] =
        &[StepStatus::Pending, StepStatus::Failed];

    /// Work item statuses that permit step execution
    pub const EXECUTABLE_WORK_ITEM_STATES: &[WorkItemStatus] =
        &[WorkItemStatus::Pending, WorkItemStatus::InProgress];
}
