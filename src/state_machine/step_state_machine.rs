use super::events::StepEvent;
use super::states::StepState;
use crate::error::{QuorumError, Result};
use crate::models::core::step::Step;
use std::collections::HashMap;

/// Pure transition table and dependency gate for the step lifecycle.
///
/// Like the work item machine, this holds no storage handle. The workflow
/// engine loads the sibling steps, builds the sequence-number -> state map,
/// and lets the machine decide whether the gate is satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepStateMachine;

impl StepStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// Determine the target state for an event, or refuse the transition.
    pub fn determine_target_state(
        &self,
        current_state: StepState,
        event: &StepEvent,
    ) -> Result<StepState> {
        let target = match (current_state, event) {
            // Start transitions; a failed step remains eligible for retry
            (StepState::Pending, StepEvent::Start) => StepState::InProgress,
            (StepState::Failed, StepEvent::Start) => StepState::InProgress,

            // Confirm transitions
            (StepState::InProgress, StepEvent::Confirm) => StepState::Completed,

            // Failure transitions
            (StepState::InProgress, StepEvent::Fail(_)) => StepState::Failed,

            // Skip transitions
            (StepState::Pending, StepEvent::Skip) => StepState::Skipped,

            // Invalid transitions
            (from_state, event) => {
                return Err(QuorumError::StateConflict(format!(
                    "cannot apply event '{}' to step in state '{from_state}'",
                    event.event_type()
                )))
            }
        };

        Ok(target)
    }

    /// Check the dependency gate for starting a step.
    ///
    /// Every dependency sequence number must map to a state that satisfies
    /// dependencies (completed). A dependency absent from the map counts as
    /// unmet. When `override_gate` is set the check always passes; the
    /// engine reports the unmet list otherwise.
    pub fn check_dependency_gate(
        &self,
        step: &Step,
        sibling_states: &HashMap<i32, StepState>,
        override_gate: bool,
    ) -> Result<()> {
        let unmet = self.unsatisfied_dependencies(step, sibling_states);

        if unmet.is_empty() || override_gate {
            return Ok(());
        }

        Err(QuorumError::UnmetDependencies {
            step_id: step.step_id,
            unmet,
        })
    }

    /// List the dependency sequence numbers that are not yet satisfied.
    pub fn unsatisfied_dependencies(
        &self,
        step: &Step,
        sibling_states: &HashMap<i32, StepState>,
    ) -> Vec<i32> {
        step.dependencies
            .iter()
            .copied()
            .filter(|seq| {
                !sibling_states
                    .get(seq)
                    .is_some_and(StepState::satisfies_dependencies)
            })
            .collect()
    }
}
