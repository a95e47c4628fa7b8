//! # Structured Logging Module
//!
//! Environment-aware structured logging for debugging panel fan-out and
//! workflow state transitions. Console output always; JSON formatting in
//! production environments where log aggregation expects it.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level.clone()));

        let result = if environment == "production" {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(false)
                        .json(),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(true),
                )
                .with(filter)
                .try_init()
        };

        // A global subscriber may already be set by the embedding process;
        // that is not an error
        if result.is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("QUORUM_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for panel operations
pub fn log_panel_operation(
    operation: &str,
    evaluator_count: usize,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        evaluator_count = evaluator_count,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🗳️ PANEL_OPERATION"
    );
}

/// Log structured data for work item operations
pub fn log_work_item_operation(
    operation: &str,
    work_item_id: Option<Uuid>,
    project_id: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        work_item_id = work_item_id.map(|id| id.to_string()),
        project_id = project_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📋 WORK_ITEM_OPERATION"
    );
}

/// Log structured data for step operations
pub fn log_step_operation(
    operation: &str,
    work_item_id: Option<Uuid>,
    step_id: Option<Uuid>,
    sequence_number: Option<i32>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        work_item_id = work_item_id.map(|id| id.to_string()),
        step_id = step_id.map(|id| id.to_string()),
        sequence_number = sequence_number,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🔧 STEP_OPERATION"
    );
}

/// Log structured data for resumption context operations
pub fn log_context_operation(
    operation: &str,
    project_id: &str,
    context_id: Option<Uuid>,
    stack_depth: Option<i32>,
    status: &str,
) {
    tracing::info!(
        operation = %operation,
        project_id = %project_id,
        context_id = context_id.map(|id| id.to_string()),
        stack_depth = stack_depth,
        status = %status,
        timestamp = %Utc::now().to_rfc3339(),
        "📌 CONTEXT_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("unknown"), "debug");
    }
}
