//! # Context Stack Manager
//!
//! Tracks the single active resumption point per project and the nested
//! push/pop stack behind it.
//!
//! ## Overview
//!
//! Every meaningful checkpoint (work item creation, step start,
//! confirmation, error report) pushes a new context whose parent is the
//! previously active one, so a project's contexts form a tree walked as a
//! stack. The store is authoritative; the manager keeps a per-project
//! read-through cache that is refreshed in place on writes and invalidated
//! wholesale on sweeps.
//!
//! ## Invariant
//!
//! At most one context per project is active at any time. The store's
//! `save_active_context` deactivates the others atomically, so there is no
//! window with two active contexts for one project.

use crate::constants::events;
use crate::error::{QuorumError, Result};
use crate::events::EventPublisher;
use crate::logging::log_context_operation;
use crate::models::{
    ContextUpdate, NewResumptionContext, ResumptionContext, ResumptionContextUpdate,
};
use crate::store::ContextStore;
use crate::validation::validate_session_payload;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Manages the per-project resumption stack over a context store
pub struct ContextStackManager<S: ContextStore> {
    store: Arc<S>,
    event_publisher: EventPublisher,
    /// project_id -> active context, mirror of store state, never authoritative
    cache: DashMap<String, ResumptionContext>,
    cache_enabled: bool,
}

impl<S: ContextStore> ContextStackManager<S> {
    pub fn new(store: Arc<S>, event_publisher: EventPublisher) -> Self {
        Self {
            store,
            event_publisher,
            cache: DashMap::new(),
            cache_enabled: true,
        }
    }

    /// Disable the read-through cache; every read goes to the store
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Push a new context onto the project's stack and make it active.
    ///
    /// Stack depth is the current active context's depth + 1, or 0 when the
    /// project has no active context; the current active context becomes
    /// the parent.
    pub async fn push(&self, new_context: NewResumptionContext) -> Result<ResumptionContext> {
        validate_session_payload(&new_context.session_payload)?;

        let current = self.get_active(&new_context.project_id).await?;
        let (stack_depth, parent_context_id) = match &current {
            Some(active) => (active.stack_depth + 1, Some(active.context_id)),
            None => (0, None),
        };

        let saved = self
            .store
            .save_active_context(new_context, stack_depth, parent_context_id)
            .await?;

        if self.cache_enabled {
            self.cache.insert(saved.project_id.clone(), saved.clone());
        }

        log_context_operation(
            "push",
            &saved.project_id,
            Some(saved.context_id),
            Some(saved.stack_depth),
            "active",
        );
        self.event_publisher.publish(
            events::CONTEXT_PUSHED,
            json!({
                "project_id": saved.project_id,
                "context_id": saved.context_id,
                "stack_depth": saved.stack_depth,
            }),
        );

        Ok(saved)
    }

    /// Pop the active context, reactivating its parent.
    ///
    /// Fails with a state conflict when the active context is a stack root,
    /// and with not-found when the project has no active context; state is
    /// left unchanged in both cases.
    pub async fn pop(&self, project_id: &str) -> Result<ResumptionContext> {
        let current = self.get_active(project_id).await?.ok_or_else(|| {
            QuorumError::not_found("ResumptionContext", format!("active for {project_id}"))
        })?;

        let parent_context_id = current.parent_context_id.ok_or_else(|| {
            QuorumError::StateConflict(format!(
                "context {} has no parent to pop to",
                current.context_id
            ))
        })?;

        // Resolve the parent before touching anything so a missing parent
        // leaves the stack unchanged
        self.store.get_context(parent_context_id).await?;

        self.store
            .update_context(
                current.context_id,
                ResumptionContextUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;

        let reactivated = self
            .store
            .update_context(
                parent_context_id,
                ResumptionContextUpdate {
                    is_active: Some(true),
                    resumed_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        if self.cache_enabled {
            self.cache
                .insert(reactivated.project_id.clone(), reactivated.clone());
        }

        log_context_operation(
            "pop",
            project_id,
            Some(reactivated.context_id),
            Some(reactivated.stack_depth),
            "reactivated",
        );
        self.event_publisher.publish(
            events::CONTEXT_POPPED,
            json!({
                "project_id": project_id,
                "context_id": reactivated.context_id,
            }),
        );

        Ok(reactivated)
    }

    /// The project's active context, through the cache when enabled
    pub async fn get_active(&self, project_id: &str) -> Result<Option<ResumptionContext>> {
        if self.cache_enabled {
            if let Some(cached) = self.cache.get(project_id) {
                debug!(project_id, "context cache hit");
                return Ok(Some(cached.clone()));
            }
        }

        let fetched = self.store.get_active_context(project_id).await?;
        if self.cache_enabled {
            if let Some(context) = &fetched {
                self.cache.insert(project_id.to_string(), context.clone());
            }
        }
        Ok(fetched)
    }

    /// Apply a partial update to the active context.
    ///
    /// Returns `None` without touching anything when the project has no
    /// active context.
    pub async fn update_current(
        &self,
        project_id: &str,
        update: ContextUpdate,
    ) -> Result<Option<ResumptionContext>> {
        if let Some(payload) = &update.session_payload {
            validate_session_payload(payload)?;
        }

        let Some(current) = self.get_active(project_id).await? else {
            return Ok(None);
        };

        let updated = self
            .store
            .update_context(current.context_id, update.into())
            .await?;

        if self.cache_enabled {
            self.cache.insert(project_id.to_string(), updated.clone());
        }

        self.event_publisher.publish(
            events::CONTEXT_UPDATED,
            json!({
                "project_id": project_id,
                "context_id": updated.context_id,
            }),
        );

        Ok(Some(updated))
    }

    /// Delete inactive contexts saved before the cutoff, then invalidate
    /// the project's cache entry wholesale. Returns the delete count.
    pub async fn sweep(&self, project_id: &str, cutoff: DateTime<Utc>) -> Result<usize> {
        let removed = self
            .store
            .delete_contexts_older_than(project_id, cutoff, true)
            .await?;

        self.cache.remove(project_id);

        log_context_operation("sweep", project_id, None, None, "swept");
        self.event_publisher.publish(
            events::CONTEXT_SWEPT,
            json!({ "project_id": project_id, "removed": removed }),
        );

        Ok(removed)
    }

    /// Drop the project's cached entry; the next read goes to the store
    pub fn invalidate_cache(&self, project_id: &str) {
        self.cache.remove(project_id);
    }

    /// Fetch a context by id, bypassing the cache
    pub async fn get_context(&self, context_id: Uuid) -> Result<ResumptionContext> {
        self.store.get_context(context_id).await
    }
}
