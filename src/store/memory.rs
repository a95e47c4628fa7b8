//! In-memory store implementation.
//!
//! Backs tests and single-process deployments. Each entity family lives
//! behind its own async `RwLock`; `save_active_context` performs its
//! deactivate-and-insert under one write lock, which is what makes the
//! single-active-context invariant atomic here.

use super::{ContextStore, StepStore, WorkItemStore};
use crate::error::{QuorumError, Result};
use crate::models::{
    NewResumptionContext, ResumptionContext, ResumptionContextUpdate, Step, StepUpdate, WorkItem,
    WorkItemUpdate,
};
use crate::state_machine::WorkItemState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store over hash maps
#[derive(Default)]
pub struct MemoryStore {
    work_items: RwLock<HashMap<Uuid, WorkItem>>,
    steps: RwLock<HashMap<Uuid, Step>>,
    contexts: RwLock<HashMap<Uuid, ResumptionContext>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkItemStore for MemoryStore {
    async fn get_work_item(&self, work_item_id: Uuid) -> Result<WorkItem> {
        self.work_items
            .read()
            .await
            .get(&work_item_id)
            .cloned()
            .ok_or_else(|| QuorumError::not_found("WorkItem", work_item_id))
    }

    async fn insert_work_item(&self, work_item: WorkItem) -> Result<()> {
        self.work_items
            .write()
            .await
            .insert(work_item.work_item_id, work_item);
        Ok(())
    }

    async fn update_work_item(
        &self,
        work_item_id: Uuid,
        update: WorkItemUpdate,
    ) -> Result<WorkItem> {
        let mut work_items = self.work_items.write().await;
        let work_item = work_items
            .get_mut(&work_item_id)
            .ok_or_else(|| QuorumError::not_found("WorkItem", work_item_id))?;
        work_item.apply_update(&update);
        Ok(work_item.clone())
    }

    async fn list_work_items(
        &self,
        project_id: &str,
        status: Option<WorkItemState>,
    ) -> Result<Vec<WorkItem>> {
        let mut items: Vec<WorkItem> = self
            .work_items
            .read()
            .await
            .values()
            .filter(|item| item.project_id == project_id)
            .filter(|item| status.map_or(true, |s| item.status == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn search_work_items(&self, project_id: &str, query: &str) -> Result<Vec<WorkItem>> {
        let needle = query.to_lowercase();
        let mut items: Vec<WorkItem> = self
            .work_items
            .read()
            .await
            .values()
            .filter(|item| item.project_id == project_id)
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[async_trait]
impl StepStore for MemoryStore {
    async fn get_step(&self, step_id: Uuid) -> Result<Step> {
        self.steps
            .read()
            .await
            .get(&step_id)
            .cloned()
            .ok_or_else(|| QuorumError::not_found("Step", step_id))
    }

    async fn insert_step(&self, step: Step) -> Result<()> {
        self.steps.write().await.insert(step.step_id, step);
        Ok(())
    }

    async fn update_step(&self, step_id: Uuid, update: StepUpdate) -> Result<Step> {
        let mut steps = self.steps.write().await;
        let step = steps
            .get_mut(&step_id)
            .ok_or_else(|| QuorumError::not_found("Step", step_id))?;
        step.apply_update(&update);
        Ok(step.clone())
    }

    async fn list_steps(&self, work_item_id: Uuid) -> Result<Vec<Step>> {
        let mut steps: Vec<Step> = self
            .steps
            .read()
            .await
            .values()
            .filter(|step| step.work_item_id == work_item_id)
            .cloned()
            .collect();
        steps.sort_by_key(|step| step.sequence_number);
        Ok(steps)
    }
}

#[async_trait]
impl ContextStore for MemoryStore {
    async fn get_context(&self, context_id: Uuid) -> Result<ResumptionContext> {
        self.contexts
            .read()
            .await
            .get(&context_id)
            .cloned()
            .ok_or_else(|| QuorumError::not_found("ResumptionContext", context_id))
    }

    async fn get_active_context(&self, project_id: &str) -> Result<Option<ResumptionContext>> {
        Ok(self
            .contexts
            .read()
            .await
            .values()
            .find(|ctx| ctx.project_id == project_id && ctx.is_active)
            .cloned())
    }

    async fn save_active_context(
        &self,
        new_context: NewResumptionContext,
        stack_depth: i32,
        parent_context_id: Option<Uuid>,
    ) -> Result<ResumptionContext> {
        let mut contexts = self.contexts.write().await;

        let project_id = new_context.project_id.clone();
        for ctx in contexts.values_mut() {
            if ctx.project_id == project_id && ctx.is_active {
                ctx.is_active = false;
            }
        }

        let context = ResumptionContext::new(new_context, stack_depth, parent_context_id);
        contexts.insert(context.context_id, context.clone());
        Ok(context)
    }

    async fn update_context(
        &self,
        context_id: Uuid,
        update: ResumptionContextUpdate,
    ) -> Result<ResumptionContext> {
        let mut contexts = self.contexts.write().await;
        let context = contexts
            .get_mut(&context_id)
            .ok_or_else(|| QuorumError::not_found("ResumptionContext", context_id))?;
        context.apply_update(&update);
        Ok(context.clone())
    }

    async fn list_contexts(&self, project_id: &str) -> Result<Vec<ResumptionContext>> {
        let mut contexts: Vec<ResumptionContext> = self
            .contexts
            .read()
            .await
            .values()
            .filter(|ctx| ctx.project_id == project_id)
            .cloned()
            .collect();
        contexts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(contexts)
    }

    async fn delete_contexts_older_than(
        &self,
        project_id: &str,
        cutoff: DateTime<Utc>,
        only_inactive: bool,
    ) -> Result<usize> {
        let mut contexts = self.contexts.write().await;
        let before = contexts.len();
        contexts.retain(|_, ctx| {
            let sweepable = ctx.project_id == project_id
                && ctx.saved_at < cutoff
                && (!only_inactive || !ctx.is_active);
            !sweepable
        });
        Ok(before - contexts.len())
    }
}
