//! Lifecycle event system

pub mod publisher;

pub use publisher::{EventPublisher, LifecycleEvent};
