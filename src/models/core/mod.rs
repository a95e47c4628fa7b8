//! Core entity models

pub mod resumption_context;
pub mod step;
pub mod work_item;

pub use resumption_context::{
    ContextUpdate, NewResumptionContext, ResumptionContext, ResumptionContextUpdate,
};
pub use step::{CorrectionEntry, NewStep, Step, StepUpdate};
pub use work_item::{NewWorkItem, WorkItem, WorkItemKind, WorkItemPriority, WorkItemUpdate};
