//! Component registration and discovery

pub mod evaluator_registry;

pub use evaluator_registry::{EvaluatorRegistry, RegistryStats};
