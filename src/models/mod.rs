//! Data layer: entity records plus their creation and partial-update structs

pub mod core;

pub use core::{
    ContextUpdate, CorrectionEntry, NewResumptionContext, NewStep, NewWorkItem, ResumptionContext,
    ResumptionContextUpdate, Step, StepUpdate, WorkItem, WorkItemKind, WorkItemPriority,
    WorkItemUpdate,
};
