use super::events::WorkItemEvent;
use super::states::WorkItemState;
use crate::error::{QuorumError, Result};

/// Pure transition table for the work item lifecycle.
///
/// The machine carries no storage handle: the workflow engine resolves the
/// current state, asks the machine for the target state, and persists the
/// outcome itself. Illegal pairs come back as state conflicts with the
/// offending state and event named.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkItemStateMachine;

impl WorkItemStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// Determine the target state for an event, or refuse the transition.
    pub fn determine_target_state(
        &self,
        current_state: WorkItemState,
        event: &WorkItemEvent,
    ) -> Result<WorkItemState> {
        let target = match (current_state, event) {
            // Start transitions
            (WorkItemState::Pending, WorkItemEvent::Start) => WorkItemState::InProgress,

            // Complete transitions
            (WorkItemState::InProgress, WorkItemEvent::Complete) => WorkItemState::Completed,

            // Cancel transitions
            (WorkItemState::Pending, WorkItemEvent::Cancel) => WorkItemState::Cancelled,
            (WorkItemState::InProgress, WorkItemEvent::Cancel) => WorkItemState::Cancelled,

            // Block transitions, reversible via Unblock
            (WorkItemState::Pending, WorkItemEvent::Block) => WorkItemState::Blocked,
            (WorkItemState::InProgress, WorkItemEvent::Block) => WorkItemState::Blocked,
            (WorkItemState::Blocked, WorkItemEvent::Unblock) => WorkItemState::InProgress,

            // Invalid transitions
            (from_state, event) => {
                return Err(QuorumError::StateConflict(format!(
                    "cannot apply event '{}' to work item in state '{from_state}'",
                    event.event_type()
                )))
            }
        };

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let machine = WorkItemStateMachine::new();
        assert_eq!(
            machine
                .determine_target_state(WorkItemState::Pending, &WorkItemEvent::Start)
                .unwrap(),
            WorkItemState::InProgress
        );
        assert_eq!(
            machine
                .determine_target_state(WorkItemState::InProgress, &WorkItemEvent::Complete)
                .unwrap(),
            WorkItemState::Completed
        );
    }

    #[test]
    fn test_block_is_reversible() {
        let machine = WorkItemStateMachine::new();
        let blocked = machine
            .determine_target_state(WorkItemState::InProgress, &WorkItemEvent::Block)
            .unwrap();
        assert_eq!(blocked, WorkItemState::Blocked);
        assert_eq!(
            machine
                .determine_target_state(blocked, &WorkItemEvent::Unblock)
                .unwrap(),
            WorkItemState::InProgress
        );
    }

    #[test]
    fn test_terminal_states_refuse_events() {
        let machine = WorkItemStateMachine::new();
        for state in [WorkItemState::Completed, WorkItemState::Cancelled] {
            let err = machine
                .determine_target_state(state, &WorkItemEvent::Start)
                .unwrap_err();
            assert!(err.is_state_conflict());
        }
    }

    #[test]
    fn test_cancel_from_blocked_is_refused() {
        let machine = WorkItemStateMachine::new();
        assert!(machine
            .determine_target_state(WorkItemState::Blocked, &WorkItemEvent::Cancel)
            .is_err());
    }
}
