//! # Persistence Collaborator Interface
//!
//! The core does not own storage. These traits are the seam to whatever
//! store the surrounding system provides: single-row fetches distinguish
//! "not found" from a generic failure, partial updates return the updated
//! row, and collaborator failures propagate unchanged (the core never
//! retries them).
//!
//! [`MemoryStore`] is the in-process implementation used by tests and
//! single-process deployments.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{
    NewResumptionContext, ResumptionContext, ResumptionContextUpdate, Step, StepUpdate, WorkItem,
    WorkItemUpdate,
};
use crate::state_machine::WorkItemState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage operations for work items
#[async_trait]
pub trait WorkItemStore: Send + Sync {
    /// Fetch a work item; `NotFound` if absent
    async fn get_work_item(&self, work_item_id: Uuid) -> Result<WorkItem>;

    async fn insert_work_item(&self, work_item: WorkItem) -> Result<()>;

    /// Apply a partial update and return the updated row
    async fn update_work_item(
        &self,
        work_item_id: Uuid,
        update: WorkItemUpdate,
    ) -> Result<WorkItem>;

    /// List a project's work items, newest first, optionally filtered by status
    async fn list_work_items(
        &self,
        project_id: &str,
        status: Option<WorkItemState>,
    ) -> Result<Vec<WorkItem>>;

    /// Case-insensitive substring search over work item titles
    async fn search_work_items(&self, project_id: &str, query: &str) -> Result<Vec<WorkItem>>;
}

/// Storage operations for steps
#[async_trait]
pub trait StepStore: Send + Sync {
    /// Fetch a step; `NotFound` if absent
    async fn get_step(&self, step_id: Uuid) -> Result<Step>;

    async fn insert_step(&self, step: Step) -> Result<()>;

    /// Apply a partial update and return the updated row
    async fn update_step(&self, step_id: Uuid, update: StepUpdate) -> Result<Step>;

    /// List a work item's steps ordered by sequence number
    async fn list_steps(&self, work_item_id: Uuid) -> Result<Vec<Step>>;
}

/// Storage operations for resumption contexts
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Fetch a context; `NotFound` if absent
    async fn get_context(&self, context_id: Uuid) -> Result<ResumptionContext>;

    /// The project's single active context, if any
    async fn get_active_context(&self, project_id: &str) -> Result<Option<ResumptionContext>>;

    /// Persist a new context as active, atomically deactivating every other
    /// context for the same project. There is no window in which two
    /// contexts for one project are active.
    async fn save_active_context(
        &self,
        new_context: NewResumptionContext,
        stack_depth: i32,
        parent_context_id: Option<Uuid>,
    ) -> Result<ResumptionContext>;

    /// Apply a partial update and return the updated row
    async fn update_context(
        &self,
        context_id: Uuid,
        update: ResumptionContextUpdate,
    ) -> Result<ResumptionContext>;

    /// List a project's contexts, newest first
    async fn list_contexts(&self, project_id: &str) -> Result<Vec<ResumptionContext>>;

    /// Delete contexts saved before the cutoff; with `only_inactive` set,
    /// active contexts survive regardless of age. Returns the delete count.
    async fn delete_contexts_older_than(
        &self,
        project_id: &str,
        cutoff: DateTime<Utc>,
        only_inactive: bool,
    ) -> Result<usize>;
}

/// Everything the workflow engine needs from one collaborator
pub trait Store: WorkItemStore + StepStore + ContextStore {}

impl<T: WorkItemStore + StepStore + ContextStore> Store for T {}
