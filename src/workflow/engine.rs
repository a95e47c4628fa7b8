//! # Workflow Engine
//!
//! ## Architecture: Work Item and Step Lifecycle Management
//!
//! The WorkflowEngine owns the work item state machine end to end: creation
//! from a panel analysis, dependency-gated step execution, completion
//! propagation, and progress computation. It composes the pure state
//! machines with the store collaborator and records a resumption checkpoint
//! at every meaningful lifecycle point.
//!
//! ## Step Generation
//!
//! A work item's steps are generated deterministically from the consensus
//! snapshot: a planning step always comes first, then one step per
//! evaluator contribution present in the consensus, in canonical category
//! order. Each generated step depends on the immediately preceding one, and
//! sequence numbers are dense starting at 1.
//!
//! ## Failure Semantics
//!
//! Gate violations and illegal transitions come back as state conflicts
//! with the unmet condition enumerated; missing targets come back as
//! not-found; store failures propagate unchanged.

use crate::config::QuorumConfig;
use crate::constants::{events, status_groups};
use crate::context_stack::ContextStackManager;
use crate::error::{QuorumError, Result};
use crate::evaluators::EvaluatorCategory;
use crate::events::EventPublisher;
use crate::logging::{log_step_operation, log_work_item_operation};
use crate::models::{
    CorrectionEntry, NewResumptionContext, NewStep, NewWorkItem, Step, StepUpdate, WorkItem,
    WorkItemKind, WorkItemPriority, WorkItemUpdate,
};
use crate::orchestration::MultiEvaluatorAnalysis;
use crate::state_machine::{
    StepEvent, StepState, StepStateMachine, WorkItemEvent, WorkItemState, WorkItemStateMachine,
};
use crate::store::Store;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Caller-facing request to create a work item
#[derive(Debug, Clone)]
pub struct CreateWorkItemRequest {
    pub project_id: String,
    pub title: String,
    pub kind: WorkItemKind,
    pub priority: WorkItemPriority,
}

/// A work item with its steps and the steps currently eligible to start
#[derive(Debug, Clone)]
pub struct WorkItemView {
    pub work_item: WorkItem,
    pub steps: Vec<Step>,
    pub startable_step_ids: Vec<Uuid>,
}

/// Result of confirming a step: the updated step plus the work item with
/// its recomputed progress
#[derive(Debug, Clone)]
pub struct StepConfirmation {
    pub step: Step,
    pub work_item: WorkItem,
}

/// Drives the work item and step lifecycle over a store collaborator
pub struct WorkflowEngine<S: Store> {
    store: Arc<S>,
    context_stack: ContextStackManager<S>,
    event_publisher: EventPublisher,
    work_item_machine: WorkItemStateMachine,
    step_machine: StepStateMachine,
    max_steps: usize,
}

impl<S: Store> WorkflowEngine<S> {
    pub fn new(store: Arc<S>, event_publisher: EventPublisher) -> Self {
        Self::with_config(store, event_publisher, &QuorumConfig::default())
    }

    /// Engine honoring a caller-supplied configuration
    pub fn with_config(
        store: Arc<S>,
        event_publisher: EventPublisher,
        config: &QuorumConfig,
    ) -> Self {
        let mut context_stack =
            ContextStackManager::new(Arc::clone(&store), event_publisher.clone());
        if !config.context_cache_enabled {
            context_stack = context_stack.without_cache();
        }
        Self {
            store,
            context_stack,
            event_publisher,
            work_item_machine: WorkItemStateMachine::new(),
            step_machine: StepStateMachine::new(),
            max_steps: config.max_work_item_steps,
        }
    }

    /// The context stack this engine records checkpoints through
    pub fn context_stack(&self) -> &ContextStackManager<S> {
        &self.context_stack
    }

    /// Create a work item from a panel analysis and generate its steps.
    ///
    /// Also pushes the first resumption checkpoint pointing at step 1.
    pub async fn create_work_item(
        &self,
        request: CreateWorkItemRequest,
        analysis: &MultiEvaluatorAnalysis,
    ) -> Result<WorkItemView> {
        if request.title.trim().is_empty() {
            return Err(QuorumError::Validation(
                "work item title must not be empty".to_string(),
            ));
        }

        let mut work_item = WorkItem::new(NewWorkItem {
            project_id: request.project_id.clone(),
            title: request.title.clone(),
            kind: request.kind,
            priority: request.priority,
            consensus: analysis.consensus.clone(),
        });

        let mut steps = Vec::new();
        let mut sequence_number = 1;

        steps.push(Step::new(NewStep {
            work_item_id: work_item.work_item_id,
            sequence_number,
            title: format!("Plan: {}", request.title),
            owner_evaluator_id: None,
            dependencies: Vec::new(),
        })?);

        // One step per evaluator contribution in the consensus, each gated
        // on the immediately preceding step
        for category in EvaluatorCategory::ORDER {
            if !analysis.consensus.contains(category.as_str()) {
                continue;
            }
            let previous = sequence_number;
            sequence_number += 1;
            steps.push(Step::new(NewStep {
                work_item_id: work_item.work_item_id,
                sequence_number,
                title: step_title(*category).to_string(),
                owner_evaluator_id: Some(category.as_str().to_string()),
                dependencies: vec![previous],
            })?);
        }

        if steps.len() > self.max_steps {
            return Err(QuorumError::Validation(format!(
                "work item would have {} steps (max: {})",
                steps.len(),
                self.max_steps
            )));
        }

        work_item.current_step_index = 1;
        self.store.insert_work_item(work_item.clone()).await?;
        for step in &steps {
            self.store.insert_step(step.clone()).await?;
        }

        let first_step = &steps[0];
        self.context_stack
            .push(NewResumptionContext {
                project_id: request.project_id.clone(),
                work_item_id: Some(work_item.work_item_id),
                step_id: Some(first_step.step_id),
                session_payload: json!({}),
                next_action_description: format!("Start step 1: {}", first_step.title),
                notes: None,
            })
            .await?;

        log_work_item_operation(
            "create_work_item",
            Some(work_item.work_item_id),
            Some(&request.project_id),
            "pending",
            Some(&format!("{} steps generated", steps.len())),
        );
        self.event_publisher.publish(
            events::WORK_ITEM_CREATED,
            json!({
                "work_item_id": work_item.work_item_id,
                "project_id": request.project_id,
                "step_count": steps.len(),
            }),
        );

        let startable_step_ids = vec![first_step.step_id];
        Ok(WorkItemView {
            work_item,
            steps,
            startable_step_ids,
        })
    }

    /// Start a step, enforcing the dependency gate unless overridden.
    ///
    /// Also moves a pending work item to in_progress and records a
    /// checkpoint for the execution.
    pub async fn start_step(&self, step_id: Uuid, override_gate: bool) -> Result<Step> {
        let step = self.store.get_step(step_id).await?;
        let work_item = self.store.get_work_item(step.work_item_id).await?;

        if !work_item.status.allows_step_execution() {
            return Err(QuorumError::StateConflict(format!(
                "work item {} is {} and does not accept step execution",
                work_item.work_item_id, work_item.status
            )));
        }

        let target = self
            .step_machine
            .determine_target_state(step.status, &StepEvent::Start)?;

        let siblings = self.store.list_steps(step.work_item_id).await?;
        let sibling_states: HashMap<i32, StepState> = siblings
            .iter()
            .map(|s| (s.sequence_number, s.status))
            .collect();
        self.step_machine
            .check_dependency_gate(&step, &sibling_states, override_gate)?;

        let updated_step = self
            .store
            .update_step(
                step_id,
                StepUpdate {
                    status: Some(target),
                    ..Default::default()
                },
            )
            .await?;

        if work_item.status == WorkItemState::Pending {
            let started = self
                .work_item_machine
                .determine_target_state(work_item.status, &WorkItemEvent::Start)?;
            self.store
                .update_work_item(
                    work_item.work_item_id,
                    WorkItemUpdate {
                        status: Some(started),
                        current_step_index: Some(step.sequence_number),
                        ..Default::default()
                    },
                )
                .await?;
            self.event_publisher.publish(
                events::WORK_ITEM_STARTED,
                json!({ "work_item_id": work_item.work_item_id }),
            );
        } else {
            self.store
                .update_work_item(
                    work_item.work_item_id,
                    WorkItemUpdate {
                        current_step_index: Some(step.sequence_number),
                        ..Default::default()
                    },
                )
                .await?;
        }

        self.context_stack
            .push(NewResumptionContext {
                project_id: work_item.project_id.clone(),
                work_item_id: Some(work_item.work_item_id),
                step_id: Some(step_id),
                session_payload: json!({}),
                next_action_description: format!(
                    "Execute step {}: {}",
                    updated_step.sequence_number, updated_step.title
                ),
                notes: None,
            })
            .await?;

        log_step_operation(
            "start_step",
            Some(work_item.work_item_id),
            Some(step_id),
            Some(updated_step.sequence_number),
            "in_progress",
            override_gate.then_some("dependency gate overridden"),
        );
        self.event_publisher.publish(
            events::STEP_STARTED,
            json!({
                "work_item_id": work_item.work_item_id,
                "step_id": step_id,
                "sequence_number": updated_step.sequence_number,
                "override_gate": override_gate,
            }),
        );

        Ok(updated_step)
    }

    /// Confirm an in-progress step as completed, recompute progress, and
    /// complete the work item when every step is done.
    pub async fn confirm_step(&self, step_id: Uuid) -> Result<StepConfirmation> {
        let step = self.store.get_step(step_id).await?;
        let work_item = self.store.get_work_item(step.work_item_id).await?;

        if !work_item.status.allows_step_execution() {
            return Err(QuorumError::StateConflict(format!(
                "work item {} is {} and does not accept step execution",
                work_item.work_item_id, work_item.status
            )));
        }

        let target = self
            .step_machine
            .determine_target_state(step.status, &StepEvent::Confirm)?;

        let confirmed = self
            .store
            .update_step(
                step_id,
                StepUpdate {
                    status: Some(target),
                    ..Default::default()
                },
            )
            .await?;

        let steps = self.store.list_steps(work_item.work_item_id).await?;
        let (progress, all_completed) = compute_progress(&steps);
        let next_index = next_step_index(&steps);

        let updated_item = if all_completed {
            let completed_state = self
                .work_item_machine
                .determine_target_state(work_item.status, &WorkItemEvent::Complete)?;
            let updated = self
                .store
                .update_work_item(
                    work_item.work_item_id,
                    WorkItemUpdate {
                        status: Some(completed_state),
                        progress_percentage: Some(100),
                        current_step_index: Some(next_index),
                    },
                )
                .await?;
            self.event_publisher.publish(
                events::WORK_ITEM_COMPLETED,
                json!({ "work_item_id": work_item.work_item_id }),
            );
            info!(
                work_item_id = %work_item.work_item_id,
                "📋 Work item completed"
            );
            updated
        } else {
            self.store
                .update_work_item(
                    work_item.work_item_id,
                    WorkItemUpdate {
                        progress_percentage: Some(progress),
                        current_step_index: Some(next_index),
                        ..Default::default()
                    },
                )
                .await?
        };

        let next_action = if all_completed {
            format!("Review and close out \"{}\"", work_item.title)
        } else {
            match steps
                .iter()
                .find(|s| s.sequence_number == next_index && !s.status.is_terminal())
            {
                Some(next) => format!("Start step {}: {}", next.sequence_number, next.title),
                None => "Resume remaining steps".to_string(),
            }
        };
        self.context_stack
            .push(NewResumptionContext {
                project_id: work_item.project_id.clone(),
                work_item_id: Some(work_item.work_item_id),
                step_id: Some(step_id),
                session_payload: json!({}),
                next_action_description: next_action,
                notes: None,
            })
            .await?;

        log_step_operation(
            "confirm_step",
            Some(work_item.work_item_id),
            Some(step_id),
            Some(confirmed.sequence_number),
            "completed",
            Some(&format!("progress {progress}%")),
        );
        self.event_publisher.publish(
            events::STEP_COMPLETED,
            json!({
                "work_item_id": work_item.work_item_id,
                "step_id": step_id,
                "progress_percentage": updated_item.progress_percentage,
            }),
        );

        Ok(StepConfirmation {
            step: confirmed,
            work_item: updated_item,
        })
    }

    /// Report an error against an in-progress step.
    ///
    /// The step moves to failed and stays eligible for a retried start; the
    /// error count grows and a correction entry is appended.
    pub async fn report_step_error(
        &self,
        step_id: Uuid,
        error: &str,
        analysis_summary: Option<String>,
    ) -> Result<Step> {
        let step = self.store.get_step(step_id).await?;
        let work_item = self.store.get_work_item(step.work_item_id).await?;

        if !work_item.status.allows_step_execution() {
            return Err(QuorumError::StateConflict(format!(
                "work item {} is {} and does not accept step execution",
                work_item.work_item_id, work_item.status
            )));
        }

        let target = self
            .step_machine
            .determine_target_state(step.status, &StepEvent::fail_with_error(error))?;

        let failed = self
            .store
            .update_step(
                step_id,
                StepUpdate {
                    status: Some(target),
                    error_count: Some(step.error_count + 1),
                    last_error: Some(error.to_string()),
                    append_correction: Some(CorrectionEntry {
                        timestamp: Utc::now(),
                        error: error.to_string(),
                        analysis_summary,
                    }),
                },
            )
            .await?;

        self.context_stack
            .push(NewResumptionContext {
                project_id: work_item.project_id.clone(),
                work_item_id: Some(work_item.work_item_id),
                step_id: Some(step_id),
                session_payload: json!({}),
                next_action_description: format!(
                    "Retry step {} after correcting: {error}",
                    failed.sequence_number
                ),
                notes: None,
            })
            .await?;

        log_step_operation(
            "report_step_error",
            Some(work_item.work_item_id),
            Some(step_id),
            Some(failed.sequence_number),
            "failed",
            Some(error),
        );
        self.event_publisher.publish(
            events::STEP_FAILED,
            json!({
                "work_item_id": work_item.work_item_id,
                "step_id": step_id,
                "error_count": failed.error_count,
            }),
        );

        Ok(failed)
    }

    /// Skip a pending step. A skipped step never satisfies dependencies.
    pub async fn skip_step(&self, step_id: Uuid) -> Result<Step> {
        let step = self.store.get_step(step_id).await?;
        let work_item = self.store.get_work_item(step.work_item_id).await?;

        let target = self
            .step_machine
            .determine_target_state(step.status, &StepEvent::Skip)?;

        let skipped = self
            .store
            .update_step(
                step_id,
                StepUpdate {
                    status: Some(target),
                    ..Default::default()
                },
            )
            .await?;

        // Progress counts completed steps only, but is still recomputed and
        // written back on every status change
        let steps = self.store.list_steps(work_item.work_item_id).await?;
        let (progress, _) = compute_progress(&steps);
        self.store
            .update_work_item(
                work_item.work_item_id,
                WorkItemUpdate {
                    progress_percentage: Some(progress),
                    ..Default::default()
                },
            )
            .await?;

        self.event_publisher.publish(
            events::STEP_SKIPPED,
            json!({
                "work_item_id": work_item.work_item_id,
                "step_id": step_id,
            }),
        );

        Ok(skipped)
    }

    /// Cancel a pending or in-progress work item
    pub async fn cancel_work_item(&self, work_item_id: Uuid) -> Result<WorkItem> {
        self.transition_work_item(work_item_id, WorkItemEvent::Cancel, events::WORK_ITEM_CANCELLED)
            .await
    }

    /// Block a work item; reversible via [`Self::unblock_work_item`]
    pub async fn block_work_item(&self, work_item_id: Uuid) -> Result<WorkItem> {
        self.transition_work_item(work_item_id, WorkItemEvent::Block, events::WORK_ITEM_BLOCKED)
            .await
    }

    /// Release a blocked work item back to in_progress
    pub async fn unblock_work_item(&self, work_item_id: Uuid) -> Result<WorkItem> {
        self.transition_work_item(
            work_item_id,
            WorkItemEvent::Unblock,
            events::WORK_ITEM_UNBLOCKED,
        )
        .await
    }

    /// The work item with its steps and the currently startable step ids
    pub async fn get_active_work_item_view(&self, work_item_id: Uuid) -> Result<WorkItemView> {
        let work_item = self.store.get_work_item(work_item_id).await?;
        let steps = self.store.list_steps(work_item_id).await?;

        let sibling_states: HashMap<i32, StepState> = steps
            .iter()
            .map(|s| (s.sequence_number, s.status))
            .collect();

        let startable_step_ids = if work_item.status.allows_step_execution() {
            steps
                .iter()
                .filter(|s| status_groups::STARTABLE_STEP_STATES.contains(&s.status))
                .filter(|s| {
                    self.step_machine
                        .unsatisfied_dependencies(s, &sibling_states)
                        .is_empty()
                })
                .map(|s| s.step_id)
                .collect()
        } else {
            Vec::new()
        };

        Ok(WorkItemView {
            work_item,
            steps,
            startable_step_ids,
        })
    }

    async fn transition_work_item(
        &self,
        work_item_id: Uuid,
        event: WorkItemEvent,
        event_name: &str,
    ) -> Result<WorkItem> {
        let work_item = self.store.get_work_item(work_item_id).await?;
        let target = self
            .work_item_machine
            .determine_target_state(work_item.status, &event)?;

        let updated = self
            .store
            .update_work_item(
                work_item_id,
                WorkItemUpdate {
                    status: Some(target),
                    ..Default::default()
                },
            )
            .await?;

        log_work_item_operation(
            event.event_type(),
            Some(work_item_id),
            Some(&updated.project_id),
            &target.to_string(),
            None,
        );
        self.event_publisher
            .publish(event_name, json!({ "work_item_id": work_item_id }));

        Ok(updated)
    }
}

/// Title for a category-owned generated step
fn step_title(category: EvaluatorCategory) -> &'static str {
    match category {
        EvaluatorCategory::Architecture => "Architecture review",
        EvaluatorCategory::Implementation => "Implementation pass",
        EvaluatorCategory::Testing => "Test coverage",
        EvaluatorCategory::Security => "Security review",
        EvaluatorCategory::Performance => "Performance check",
        EvaluatorCategory::Documentation => "Documentation update",
    }
}

/// Progress percentage and whether every step is completed
fn compute_progress(steps: &[Step]) -> (i32, bool) {
    let total = steps.len();
    if total == 0 {
        return (0, false);
    }
    let completed = steps
        .iter()
        .filter(|s| s.status == StepState::Completed)
        .count();
    let progress = ((100.0 * completed as f64) / total as f64).round() as i32;
    (progress, completed == total)
}

/// Sequence number the engine considers next: the lowest non-terminal step,
/// or the last sequence when nothing is left to do
fn next_step_index(steps: &[Step]) -> i32 {
    steps
        .iter()
        .filter(|s| !s.status.is_terminal())
        .map(|s| s.sequence_number)
        .min()
        .unwrap_or_else(|| steps.iter().map(|s| s.sequence_number).max().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(sequence_number: i32, status: StepState) -> Step {
        let mut step = Step::new(NewStep {
            work_item_id: Uuid::new_v4(),
            sequence_number,
            title: format!("step {sequence_number}"),
            owner_evaluator_id: None,
            dependencies: Vec::new(),
        })
        .unwrap();
        step.status = status;
        step
    }

    #[test]
    fn test_compute_progress_rounds() {
        let steps = vec![
            step(1, StepState::Completed),
            step(2, StepState::Pending),
            step(3, StepState::Pending),
        ];
        let (progress, all) = compute_progress(&steps);
        assert_eq!(progress, 33);
        assert!(!all);
    }

    #[test]
    fn test_compute_progress_complete() {
        let steps = vec![step(1, StepState::Completed), step(2, StepState::Completed)];
        assert_eq!(compute_progress(&steps), (100, true));
    }

    #[test]
    fn test_skipped_steps_block_full_progress() {
        let steps = vec![step(1, StepState::Completed), step(2, StepState::Skipped)];
        let (progress, all) = compute_progress(&steps);
        assert_eq!(progress, 50);
        assert!(!all);
    }

    #[test]
    fn test_next_step_index_picks_lowest_open() {
        let steps = vec![
            step(1, StepState::Completed),
            step(2, StepState::Failed),
            step(3, StepState::Pending),
        ];
        assert_eq!(next_step_index(&steps), 2);
    }

    #[test]
    fn test_next_step_index_when_all_terminal() {
        let steps = vec![step(1, StepState::Completed), step(2, StepState::Skipped)];
        assert_eq!(next_step_index(&steps), 2);
    }
}
