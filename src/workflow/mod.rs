//! Work item lifecycle orchestration

pub mod engine;

pub use engine::{CreateWorkItemRequest, StepConfirmation, WorkItemView, WorkflowEngine};
