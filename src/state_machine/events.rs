use serde::{Deserialize, Serialize};

/// Events that can trigger work item state transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WorkItemEvent {
    /// First step has started
    Start,
    /// Every step is complete
    Complete,
    /// Explicitly cancel the work item
    Cancel,
    /// Explicitly block the work item
    Block,
    /// Release a blocked work item back to in_progress
    Unblock,
}

impl WorkItemEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
            Self::Block => "block",
            Self::Unblock => "unblock",
        }
    }

    /// Check if this event represents a terminal transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancel)
    }
}

/// Events that can trigger step state transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StepEvent {
    /// Start executing the step (also retries a failed step)
    Start,
    /// Confirm the step as complete
    Confirm,
    /// Report a step failure with an error message
    Fail(String),
    /// Skip the step without executing it
    Skip,
}

impl StepEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Confirm => "confirm",
            Self::Fail(_) => "fail",
            Self::Skip => "skip",
        }
    }

    /// Extract the error message if this is a failure event
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Fail(msg) => Some(msg),
            _ => None,
        }
    }

    /// Check if this event represents a terminal transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirm | Self::Skip)
    }

    /// Create a failure event with the given error message
    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }
}
