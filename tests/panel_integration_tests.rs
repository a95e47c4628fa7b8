//! Integration tests for the panel coordinator: fan-out, failure isolation,
//! consensus construction, and recommendation ranking.

use std::sync::Arc;

use async_trait::async_trait;
use quorum_core::error::{QuorumError, Result};
use quorum_core::evaluators::{
    ArchitectureEvaluator, DocumentationEvaluator, EvaluationContext, Evaluator,
    EvaluatorCategory, EvaluatorResponse, ImplementationEvaluator, PerformanceEvaluator,
    SecurityEvaluator,
};
use quorum_core::events::EventPublisher;
use quorum_core::orchestration::PanelCoordinator;
use quorum_core::registry::EvaluatorRegistry;

/// Evaluator that always fails, standing in for a defective panel member
struct FaultyEvaluator;

#[async_trait]
impl Evaluator for FaultyEvaluator {
    fn id(&self) -> &'static str {
        "testing"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Testing
    }

    async fn analyze(&self, _context: &EvaluationContext) -> Result<EvaluatorResponse> {
        Err(QuorumError::Collaborator(
            "simulated evaluator defect".to_string(),
        ))
    }
}

/// Panel identical to the default one except the testing seat always fails
async fn panel_with_faulty_testing_seat() -> PanelCoordinator {
    let registry = EvaluatorRegistry::new();
    registry
        .register(Arc::new(ArchitectureEvaluator))
        .await
        .unwrap();
    registry
        .register(Arc::new(ImplementationEvaluator))
        .await
        .unwrap();
    registry.register(Arc::new(FaultyEvaluator)).await.unwrap();
    registry
        .register(Arc::new(SecurityEvaluator))
        .await
        .unwrap();
    registry
        .register(Arc::new(PerformanceEvaluator))
        .await
        .unwrap();
    registry
        .register(Arc::new(DocumentationEvaluator))
        .await
        .unwrap();
    PanelCoordinator::new(registry, EventPublisher::default())
}

fn context() -> EvaluationContext {
    EvaluationContext::from_description(
        "add retry logic with exponential backoff to the importer module interface",
    )
}

#[tokio::test]
async fn run_all_returns_one_response_per_evaluator_in_panel_order() {
    let coordinator = PanelCoordinator::with_default_panel();
    let analysis = coordinator.run_all(&context()).await.unwrap();

    let expected = vec![
        "architecture",
        "implementation",
        "testing",
        "security",
        "performance",
        "documentation",
    ];

    let response_ids: Vec<_> = analysis
        .responses
        .iter()
        .map(|r| r.evaluator_id.as_str())
        .collect();
    assert_eq!(response_ids, expected);

    let consensus_keys: Vec<_> = analysis.consensus.keys().collect();
    assert_eq!(consensus_keys, expected);
}

#[tokio::test]
async fn failing_evaluator_is_replaced_by_degraded_response() {
    let coordinator = panel_with_faulty_testing_seat().await;
    let analysis = coordinator.run_all(&context()).await.unwrap();

    // The batch still returns six responses, one per requested evaluator
    assert_eq!(analysis.responses.len(), 6);

    let degraded = analysis
        .responses
        .iter()
        .find(|r| r.evaluator_id == "testing")
        .expect("degraded response present");
    assert_eq!(degraded.confidence, 0.10);
    assert!(degraded
        .suggestions
        .iter()
        .any(|s| s.to_lowercase().contains("manual review")));

    // The failure never surfaces as an error and the other seats are intact
    assert!(analysis
        .responses
        .iter()
        .filter(|r| r.evaluator_id != "testing")
        .all(|r| r.confidence > 0.10 || !r.suggestions.is_empty()));
}

#[tokio::test]
async fn consensus_keys_match_the_selection_exactly() {
    let coordinator = PanelCoordinator::with_default_panel();
    let analysis = coordinator
        .run_selected(&context(), &["security", "architecture"])
        .await
        .unwrap();

    // Registry order wins over selection order
    let keys: Vec<_> = analysis.consensus.keys().collect();
    assert_eq!(keys, vec!["architecture", "security"]);
    assert_eq!(analysis.responses.len(), 2);
}

#[tokio::test]
async fn consensus_text_is_stripped_of_decoration() {
    let coordinator = PanelCoordinator::with_default_panel();
    let analysis = coordinator.run_all(&context()).await.unwrap();

    for (evaluator_id, text) in analysis.consensus.iter() {
        assert!(
            text.chars().next().is_some_and(char::is_alphanumeric),
            "{evaluator_id} consensus text still decorated: {text:?}"
        );
    }

    // The raw response keeps its decoration; only the consensus is stripped
    let raw = &analysis.responses[0].text;
    assert!(raw.contains(':'));
}

#[tokio::test]
async fn empty_selection_is_a_validation_error() {
    let coordinator = PanelCoordinator::with_default_panel();
    let err = coordinator
        .run_selected(&context(), &[])
        .await
        .unwrap_err();
    assert_eq!(err.error_kind(), "validation");
}

#[tokio::test]
async fn unknown_evaluator_id_is_a_validation_error() {
    let coordinator = PanelCoordinator::with_default_panel();
    let err = coordinator
        .run_selected(&context(), &["architecture", "astrology"])
        .await
        .unwrap_err();
    assert_eq!(err.error_kind(), "validation");
}

#[tokio::test]
async fn empty_description_is_rejected_before_fan_out() {
    let coordinator = PanelCoordinator::with_default_panel();
    let err = coordinator
        .run_all(&EvaluationContext::from_description("   "))
        .await
        .unwrap_err();
    assert_eq!(err.error_kind(), "validation");
}

#[tokio::test]
async fn recommendations_are_deduplicated_and_capped() {
    let coordinator = PanelCoordinator::with_default_panel();
    let analysis = coordinator.run_all(&context()).await.unwrap();

    assert!(analysis.recommendations.len() <= 10);

    let mut sorted = analysis.recommendations.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), analysis.recommendations.len());
}

#[tokio::test]
async fn risky_request_flags_risk_and_promotes_urgent_suggestions() {
    let coordinator = PanelCoordinator::with_default_panel();
    let risky = EvaluationContext::from_description(
        "rework production payment auth validation before the migration window closes",
    );
    let analysis = coordinator.run_all(&risky).await.unwrap();

    assert!(analysis.summary.risk_flagged);

    // The security evaluator's urgent suggestion sorts ahead of the rest
    let first = analysis
        .recommendations
        .first()
        .expect("recommendations present");
    assert!(first.to_lowercase().contains("critical"));
}

#[tokio::test]
async fn repeated_runs_are_deterministic() {
    let coordinator = PanelCoordinator::with_default_panel();
    let first = coordinator.run_all(&context()).await.unwrap();
    let second = coordinator.run_all(&context()).await.unwrap();

    assert_eq!(first.consensus, second.consensus);
    assert_eq!(first.recommendations, second.recommendations);
    assert_eq!(
        first.summary.mean_confidence,
        second.summary.mean_confidence
    );
}

#[tokio::test]
async fn summary_reports_alignment_between_architecture_and_implementation() {
    let coordinator = PanelCoordinator::with_default_panel();
    let analysis = coordinator
        .run_selected(&context(), &["architecture", "implementation"])
        .await
        .unwrap();

    // Both perspectives are present, so an alignment verdict must exist
    assert!(analysis.summary.alignment.is_some());
}

#[tokio::test]
async fn summary_omits_alignment_when_a_perspective_is_missing() {
    let coordinator = PanelCoordinator::with_default_panel();
    let analysis = coordinator
        .run_selected(&context(), &["architecture", "security"])
        .await
        .unwrap();

    assert!(analysis.summary.alignment.is_none());
}

#[tokio::test]
async fn panel_runs_publish_lifecycle_events() {
    let coordinator = PanelCoordinator::with_default_panel();
    let publisher = EventPublisher::default();
    let coordinator_with_events =
        PanelCoordinator::new(coordinator.registry().clone(), publisher.clone());
    let mut receiver = publisher.subscribe();

    coordinator_with_events.run_all(&context()).await.unwrap();

    let requested = receiver.recv().await.unwrap();
    assert_eq!(requested.name, "panel.analysis_requested");
    let completed = receiver.recv().await.unwrap();
    assert_eq!(completed.name, "panel.analysis_completed");
    assert_eq!(completed.payload["evaluator_count"], 6);
}
