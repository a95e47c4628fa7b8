// State machine module for work item and step lifecycle management
//
// Pure transition tables with dependency gating. Persistence of the outcome
// belongs to the workflow engine; the machines only decide legality.

pub mod events;
pub mod states;
pub mod step_state_machine;
pub mod work_item_state_machine;

// Re-export main types for convenient access
pub use events::{StepEvent, WorkItemEvent};
pub use states::{StepState, WorkItemState};
pub use step_state_machine::StepStateMachine;
pub use work_item_state_machine::WorkItemStateMachine;
