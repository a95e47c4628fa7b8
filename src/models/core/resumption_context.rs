//! # Resumption Context Model
//!
//! A saved pointer to "where work was left off", forming a per-project
//! stack: each context may name a parent, and at most one context per
//! project is active at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A saved resumption point for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumptionContext {
    pub context_id: Uuid,
    pub project_id: String,
    pub work_item_id: Option<Uuid>,
    pub step_id: Option<Uuid>,
    /// Freeform session state the caller wants restored on resume
    pub session_payload: Value,
    pub next_action_description: String,
    pub notes: Option<String>,
    pub is_active: bool,
    /// Parent depth + 1; 0 for stack roots
    pub stack_depth: i32,
    pub parent_context_id: Option<Uuid>,
    pub saved_at: DateTime<Utc>,
    pub resumed_at: Option<DateTime<Utc>>,
}

/// New resumption context for creation; depth and parent linkage are
/// computed by the context stack manager, not the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResumptionContext {
    pub project_id: String,
    pub work_item_id: Option<Uuid>,
    pub step_id: Option<Uuid>,
    pub session_payload: Value,
    pub next_action_description: String,
    pub notes: Option<String>,
}

/// Partial update a caller may apply to the active context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextUpdate {
    pub session_payload: Option<Value>,
    pub next_action_description: Option<String>,
    pub notes: Option<String>,
}

/// Store-level partial update; activation fields are reserved for the
/// context stack manager's push/pop bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumptionContextUpdate {
    pub session_payload: Option<Value>,
    pub next_action_description: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub resumed_at: Option<DateTime<Utc>>,
}

impl From<ContextUpdate> for ResumptionContextUpdate {
    fn from(update: ContextUpdate) -> Self {
        Self {
            session_payload: update.session_payload,
            next_action_description: update.next_action_description,
            notes: update.notes,
            is_active: None,
            resumed_at: None,
        }
    }
}

impl ResumptionContext {
    /// Create a new active context at the given stack position
    pub fn new(new_context: NewResumptionContext, stack_depth: i32, parent_context_id: Option<Uuid>) -> Self {
        Self {
            context_id: Uuid::new_v4(),
            project_id: new_context.project_id,
            work_item_id: new_context.work_item_id,
            step_id: new_context.step_id,
            session_payload: new_context.session_payload,
            next_action_description: new_context.next_action_description,
            notes: new_context.notes,
            is_active: true,
            stack_depth,
            parent_context_id,
            saved_at: Utc::now(),
            resumed_at: None,
        }
    }

    /// Check whether this context is a stack root
    pub fn is_root(&self) -> bool {
        self.parent_context_id.is_none()
    }

    /// Apply a store-level partial update in place
    pub fn apply_update(&mut self, update: &ResumptionContextUpdate) {
        if let Some(payload) = &update.session_payload {
            self.session_payload = payload.clone();
        }
        if let Some(description) = &update.next_action_description {
            self.next_action_description = description.clone();
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        if let Some(resumed) = update.resumed_at {
            self.resumed_at = Some(resumed);
        }
    }
}
