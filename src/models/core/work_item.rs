//! # Work Item Model
//!
//! A tracked unit of requested work, decomposed into ordered steps.
//!
//! ## Overview
//!
//! A `WorkItem` is created from a panel analysis: the consensus snapshot it
//! carries seeds step generation, and every step status change writes the
//! recomputed progress percentage back here. Work items are never deleted,
//! only moved to a terminal state.

use crate::orchestration::types::Consensus;
use crate::state_machine::WorkItemState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of requested work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    Feature,
    Fix,
    Refactor,
    Analysis,
}

impl WorkItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Fix => "fix",
            Self::Refactor => "refactor",
            Self::Analysis => "analysis",
        }
    }
}

/// Caller-assigned priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl WorkItemPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A trackable unit of requested work.
///
/// `progress_percentage` is always `round(100 * completed_steps /
/// total_steps)` and is forced to 100 when the item completes.
/// `current_step_index` tracks the sequence number the workflow engine
/// considers next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub work_item_id: Uuid,
    pub project_id: String,
    pub title: String,
    pub kind: WorkItemKind,
    pub priority: WorkItemPriority,
    /// Snapshot of the panel consensus this item was created from
    pub consensus: Consensus,
    pub status: WorkItemState,
    pub progress_percentage: i32,
    pub current_step_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New work item for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkItem {
    pub project_id: String,
    pub title: String,
    pub kind: WorkItemKind,
    pub priority: WorkItemPriority,
    pub consensus: Consensus,
}

/// Partial update applied through the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkItemUpdate {
    pub status: Option<WorkItemState>,
    pub progress_percentage: Option<i32>,
    pub current_step_index: Option<i32>,
}

impl WorkItem {
    /// Create a new work item in its initial state
    pub fn new(new_item: NewWorkItem) -> Self {
        let now = Utc::now();
        Self {
            work_item_id: Uuid::new_v4(),
            project_id: new_item.project_id,
            title: new_item.title,
            kind: new_item.kind,
            priority: new_item.priority,
            consensus: new_item.consensus,
            status: WorkItemState::default(),
            progress_percentage: 0,
            current_step_index: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place, refreshing `updated_at`
    pub fn apply_update(&mut self, update: &WorkItemUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress_percentage {
            self.progress_percentage = progress.clamp(0, 100);
        }
        if let Some(index) = update.current_step_index {
            self.current_step_index = index;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> WorkItem {
        WorkItem::new(NewWorkItem {
            project_id: "proj-1".to_string(),
            title: "Add importer retries".to_string(),
            kind: WorkItemKind::Feature,
            priority: WorkItemPriority::High,
            consensus: Consensus::new(),
        })
    }

    #[test]
    fn test_new_work_item_defaults() {
        let item = sample_item();
        assert_eq!(item.status, WorkItemState::Pending);
        assert_eq!(item.progress_percentage, 0);
        assert_eq!(item.current_step_index, 0);
    }

    #[test]
    fn test_apply_update_clamps_progress() {
        let mut item = sample_item();
        item.apply_update(&WorkItemUpdate {
            progress_percentage: Some(140),
            ..Default::default()
        });
        assert_eq!(item.progress_percentage, 100);
    }

    #[test]
    fn test_kind_and_priority_serde() {
        let json = serde_json::to_string(&WorkItemKind::Refactor).unwrap();
        assert_eq!(json, "\"refactor\"");
        let priority: WorkItemPriority = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(priority, WorkItemPriority::Critical);
    }
}
