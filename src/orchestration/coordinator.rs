//! # Panel Coordinator
//!
//! ## Architecture: Evaluator Fan-Out and Consensus Synthesis
//!
//! The PanelCoordinator fans one evaluation context out to every selected
//! evaluator concurrently, waits at a single join point for all of them to
//! settle, and synthesizes the settled responses into a consensus, a
//! summary, and a ranked recommendation list.
//!
//! ## Failure Isolation
//!
//! Each evaluator runs in its own task. An evaluator that returns an error
//! or panics is replaced by a fixed degraded response (confidence 0.10,
//! manual-review suggestion); the batch always completes with exactly one
//! response per requested evaluator. The coordinator itself fails only on
//! empty selection or invalid input.
//!
//! ## Ordering
//!
//! Responses and consensus entries follow registry order, never completion
//! order, so a run over the same panel is deterministic regardless of which
//! evaluator finishes first.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quorum_core::evaluators::EvaluationContext;
//! use quorum_core::orchestration::PanelCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = PanelCoordinator::with_default_panel();
//! let context = EvaluationContext::from_description("add retry logic to the importer");
//!
//! let analysis = coordinator.run_all(&context).await?;
//! println!("mean confidence: {}", analysis.summary.mean_confidence);
//! # Ok(())
//! # }
//! ```

use crate::constants::{events, thresholds, vocabulary};
use crate::error::{QuorumError, Result};
use crate::evaluators::{EvaluationContext, Evaluator, EvaluatorResponse};
use crate::events::EventPublisher;
use crate::logging::log_panel_operation;
use crate::orchestration::types::{AnalysisSummary, Consensus, MultiEvaluatorAnalysis};
use crate::registry::EvaluatorRegistry;
use crate::validation::validate_description;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Suggestion substituted when an evaluator fails
const MANUAL_REVIEW_SUGGESTION: &str = "Manual review required";

/// Orchestrates concurrent evaluator runs into a single analysis
#[derive(Clone)]
pub struct PanelCoordinator {
    registry: EvaluatorRegistry,
    event_publisher: EventPublisher,
}

impl PanelCoordinator {
    pub fn new(registry: EvaluatorRegistry, event_publisher: EventPublisher) -> Self {
        Self {
            registry,
            event_publisher,
        }
    }

    /// Coordinator over the six built-in evaluators
    pub fn with_default_panel() -> Self {
        Self::new(EvaluatorRegistry::default_panel(), EventPublisher::default())
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    /// Run every registered evaluator against the context
    pub async fn run_all(&self, context: &EvaluationContext) -> Result<MultiEvaluatorAnalysis> {
        let evaluators = self.registry.snapshot().await;
        self.run_panel(evaluators, context).await
    }

    /// Run a subset of evaluators, selected by id, in registry order
    pub async fn run_selected(
        &self,
        context: &EvaluationContext,
        evaluator_ids: &[&str],
    ) -> Result<MultiEvaluatorAnalysis> {
        let evaluators = self.registry.select(evaluator_ids).await?;
        self.run_panel(evaluators, context).await
    }

    async fn run_panel(
        &self,
        evaluators: Vec<Arc<dyn Evaluator>>,
        context: &EvaluationContext,
    ) -> Result<MultiEvaluatorAnalysis> {
        validate_description(&context.description)?;

        if evaluators.is_empty() {
            return Err(QuorumError::Validation(
                "evaluator selection must not be empty".to_string(),
            ));
        }

        self.event_publisher.publish(
            events::PANEL_ANALYSIS_REQUESTED,
            json!({ "evaluator_count": evaluators.len() }),
        );

        // Fan out: one task per evaluator, no shared mutable state. The only
        // suspension point is the in-order join below, so output order is
        // insertion order over the evaluator set.
        let handles: Vec<_> = evaluators
            .iter()
            .map(|evaluator| {
                let evaluator = Arc::clone(evaluator);
                let context = context.clone();
                tokio::spawn(async move { evaluator.analyze(&context).await })
            })
            .collect();

        let settled = futures::future::join_all(handles).await;

        let mut responses = Vec::with_capacity(evaluators.len());
        for (evaluator, outcome) in evaluators.iter().zip(settled) {
            let response = match outcome {
                Ok(Ok(response)) => response,
                Ok(Err(error)) => {
                    warn!(
                        evaluator_id = evaluator.id(),
                        error = %error,
                        "Evaluator failed; substituting degraded response"
                    );
                    self.recovered(evaluator.id())
                }
                Err(join_error) => {
                    warn!(
                        evaluator_id = evaluator.id(),
                        error = %join_error,
                        "Evaluator task aborted; substituting degraded response"
                    );
                    self.recovered(evaluator.id())
                }
            };
            responses.push(response);
        }

        let mut consensus = Consensus::new();
        for response in &responses {
            consensus.insert(&response.evaluator_id, strip_decoration(&response.text));
        }

        let summary = synthesize_summary(&responses);
        let recommendations = rank_recommendations(&responses);

        debug!(
            responses = responses.len(),
            mean_confidence = summary.mean_confidence,
            "🗳️ Panel run complete"
        );
        log_panel_operation("run_panel", responses.len(), "completed", None);
        self.event_publisher.publish(
            events::PANEL_ANALYSIS_COMPLETED,
            json!({
                "evaluator_count": responses.len(),
                "mean_confidence": summary.mean_confidence,
            }),
        );

        Ok(MultiEvaluatorAnalysis {
            consensus,
            responses,
            summary,
            recommendations,
        })
    }

    /// Fixed degraded substitute for a failed evaluator
    fn recovered(&self, evaluator_id: &str) -> EvaluatorResponse {
        self.event_publisher.publish(
            events::PANEL_EVALUATOR_RECOVERED,
            json!({ "evaluator_id": evaluator_id }),
        );
        EvaluatorResponse {
            evaluator_id: evaluator_id.to_string(),
            text: "Analysis unavailable because the evaluator failed to produce a response."
                .to_string(),
            confidence: thresholds::DEGRADED_CONFIDENCE,
            suggestions: vec![MANUAL_REVIEW_SUGGESTION.to_string()],
        }
    }
}

/// Strip leading visual/name decoration from an evaluator's text, leaving
/// the substantive analysis only. Evaluators prefix their output with an
/// emoji and a short name followed by a colon; consensus entries carry
/// neither.
fn strip_decoration(text: &str) -> String {
    let stripped = text.trim_start_matches(|c: char| !c.is_alphanumeric());
    let stripped = match stripped.split_once(':') {
        Some((prefix, rest))
            if prefix.len() <= 24
                && prefix
                    .chars()
                    .all(|c| c.is_alphanumeric() || c.is_whitespace()) =>
        {
            rest
        }
        _ => stripped,
    };
    stripped.trim().to_string()
}

/// Synthesize the confidence partitions, alignment check, and risk flag
fn synthesize_summary(responses: &[EvaluatorResponse]) -> AnalysisSummary {
    let mean_confidence = if responses.is_empty() {
        0.0
    } else {
        let sum: f64 = responses.iter().map(|r| r.confidence).sum();
        ((sum / responses.len() as f64) * 100.0).round() / 100.0
    };

    let high_confidence: Vec<String> = responses
        .iter()
        .filter(|r| r.confidence >= thresholds::HIGH_CONFIDENCE)
        .map(|r| r.evaluator_id.clone())
        .collect();

    let low_confidence: Vec<String> = responses
        .iter()
        .filter(|r| r.confidence < thresholds::LOW_CONFIDENCE)
        .map(|r| r.evaluator_id.clone())
        .collect();

    let architecture = responses.iter().find(|r| r.evaluator_id == "architecture");
    let implementation = responses
        .iter()
        .find(|r| r.evaluator_id == "implementation");
    let alignment = match (architecture, implementation) {
        (Some(a), Some(b)) => {
            let a_text = a.text.to_lowercase();
            let b_text = b.text.to_lowercase();
            let matches = vocabulary::ALIGNMENT_TERMS
                .iter()
                .filter(|term| a_text.contains(**term) && b_text.contains(**term))
                .count();
            Some(matches >= thresholds::MIN_ALIGNMENT_MATCHES)
        }
        _ => None,
    };

    let risk_flagged = responses
        .iter()
        .find(|r| r.evaluator_id == "security")
        .map(|r| {
            let text = r.text.to_lowercase();
            vocabulary::RISK_MARKERS
                .iter()
                .any(|marker| text.contains(marker))
        })
        .unwrap_or(false);

    let mut text = format!(
        "Panel of {} evaluator(s) responded with mean confidence {mean_confidence:.2}.",
        responses.len()
    );
    if !high_confidence.is_empty() {
        text.push_str(&format!(" High confidence: {}.", high_confidence.join(", ")));
    }
    if !low_confidence.is_empty() {
        text.push_str(&format!(" Low confidence: {}.", low_confidence.join(", ")));
    }
    match alignment {
        Some(true) => text.push_str(" Architecture and implementation perspectives align."),
        Some(false) => text.push_str(
            " Divergence warning: architecture and implementation perspectives disagree.",
        ),
        None => {}
    }
    if risk_flagged {
        text.push_str(" Risk markers present in the security analysis.");
    }

    AnalysisSummary {
        mean_confidence,
        high_confidence,
        low_confidence,
        alignment,
        risk_flagged,
        text,
    }
}

/// Union, dedup, urgency-rank, and cap the panel's suggestions
fn rank_recommendations(responses: &[EvaluatorResponse]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut recommendations: Vec<String> = Vec::new();

    for response in responses {
        for suggestion in &response.suggestions {
            if seen.insert(suggestion.clone()) {
                recommendations.push(suggestion.clone());
            }
        }
    }

    // Stable sort: urgent suggestions first, original order preserved
    // within each partition
    recommendations.sort_by_key(|s| !contains_urgency_keyword(s));
    recommendations.truncate(thresholds::MAX_RECOMMENDATIONS);
    recommendations
}

fn contains_urgency_keyword(suggestion: &str) -> bool {
    let lower = suggestion.to_lowercase();
    vocabulary::URGENCY_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(id: &str, text: &str, confidence: f64, suggestions: &[&str]) -> EvaluatorResponse {
        EvaluatorResponse {
            evaluator_id: id.to_string(),
            text: text.to_string(),
            confidence,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_strip_decoration_removes_emoji_and_name() {
        assert_eq!(
            strip_decoration("🏛️ Architecture: split along module boundaries"),
            "split along module boundaries"
        );
        assert_eq!(strip_decoration("plain analysis text"), "plain analysis text");
    }

    #[test]
    fn test_strip_decoration_keeps_long_prefixes() {
        let text = "a sentence that happens to contain within it: a colon";
        assert_eq!(strip_decoration(text), text);
    }

    #[test]
    fn test_summary_partitions_by_threshold() {
        let responses = vec![
            response("architecture", "module interface", 0.85, &[]),
            response("testing", "cover it", 0.55, &[]),
            response("security", "warning: risk here", 0.30, &[]),
        ];
        let summary = synthesize_summary(&responses);

        assert_eq!(summary.high_confidence, vec!["architecture"]);
        assert_eq!(summary.low_confidence, vec!["security"]);
        assert!(summary.risk_flagged);
        // Implementation missing, so no alignment verdict
        assert_eq!(summary.alignment, None);
        assert_eq!(summary.mean_confidence, 0.57);
    }

    #[test]
    fn test_alignment_requires_two_shared_terms() {
        let aligned = synthesize_summary(&[
            response("architecture", "module and interface work", 0.8, &[]),
            response("implementation", "module behind the interface", 0.8, &[]),
        ]);
        assert_eq!(aligned.alignment, Some(true));

        let divergent = synthesize_summary(&[
            response("architecture", "module split", 0.8, &[]),
            response("implementation", "rewrite the parser", 0.8, &[]),
        ]);
        assert_eq!(divergent.alignment, Some(false));
        assert!(divergent.text.contains("Divergence warning"));
    }

    #[test]
    fn test_recommendations_dedup_and_urgency_order() {
        let responses = vec![
            response("a", "", 0.8, &["Write docs", "Critical: patch auth now"]),
            response("b", "", 0.8, &["Write docs", "Benchmark the hot path"]),
        ];
        let ranked = rank_recommendations(&responses);

        assert_eq!(
            ranked,
            vec![
                "Critical: patch auth now",
                "Write docs",
                "Benchmark the hot path"
            ]
        );
    }

    #[test]
    fn test_recommendations_capped_at_ten() {
        let suggestions: Vec<String> = (0..15).map(|i| format!("suggestion {i}")).collect();
        let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
        let responses = vec![response("a", "", 0.8, &refs)];

        assert_eq!(rank_recommendations(&responses).len(), 10);
    }
}
