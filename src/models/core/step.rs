//! # Step Model
//!
//! An ordered, dependency-gated unit of execution within a work item.
//!
//! Sequence numbers are dense and 1-based within a work item. Dependencies
//! may only reference strictly smaller sequence numbers, which rules out
//! cycles and forward references by construction.

use crate::error::{QuorumError, Result};
use crate::state_machine::StepState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One correction attempt recorded after a reported step error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionEntry {
    pub timestamp: DateTime<Utc>,
    pub error: String,
    pub analysis_summary: Option<String>,
}

/// An individual step instance within a work item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: Uuid,
    pub work_item_id: Uuid,
    /// Unique and ordered within the work item, starting at 1, gapless
    pub sequence_number: i32,
    pub title: String,
    /// The evaluator whose consensus contribution produced this step;
    /// the leading planning step has none
    pub owner_evaluator_id: Option<String>,
    pub status: StepState,
    /// Sequence numbers that must be completed before this step may start
    pub dependencies: Vec<i32>,
    pub error_count: i32,
    pub last_error: Option<String>,
    pub correction_log: Vec<CorrectionEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New step for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStep {
    pub work_item_id: Uuid,
    pub sequence_number: i32,
    pub title: String,
    pub owner_evaluator_id: Option<String>,
    pub dependencies: Vec<i32>,
}

/// Partial update applied through the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepUpdate {
    pub status: Option<StepState>,
    pub error_count: Option<i32>,
    pub last_error: Option<String>,
    /// Appended to the correction log, never replacing prior entries
    pub append_correction: Option<CorrectionEntry>,
}

impl Step {
    /// Create a new step, validating the dependency invariant.
    ///
    /// Dependencies must reference strictly smaller sequence numbers; a
    /// forward or self dependency is a validation error.
    pub fn new(new_step: NewStep) -> Result<Self> {
        if new_step.sequence_number < 1 {
            return Err(QuorumError::Validation(format!(
                "step sequence number must be >= 1, got {}",
                new_step.sequence_number
            )));
        }

        if let Some(bad) = new_step
            .dependencies
            .iter()
            .find(|dep| **dep >= new_step.sequence_number || **dep < 1)
        {
            return Err(QuorumError::Validation(format!(
                "step {} may not depend on step {bad}: dependencies must reference \
                 earlier steps only",
                new_step.sequence_number
            )));
        }

        let now = Utc::now();
        Ok(Self {
            step_id: Uuid::new_v4(),
            work_item_id: new_step.work_item_id,
            sequence_number: new_step.sequence_number,
            title: new_step.title,
            owner_evaluator_id: new_step.owner_evaluator_id,
            status: StepState::default(),
            dependencies: new_step.dependencies,
            error_count: 0,
            last_error: None,
            correction_log: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update in place, refreshing `updated_at`
    pub fn apply_update(&mut self, update: &StepUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(count) = update.error_count {
            self.error_count = count;
        }
        if let Some(error) = &update.last_error {
            self.last_error = Some(error.clone());
        }
        if let Some(entry) = &update.append_correction {
            self.correction_log.push(entry.clone());
        }
        self.updated_at = Utc::now();
    }
}
