//! Architecture perspective: decomposition, module boundaries, and the
//! interface contracts a change will touch.

use super::{base_factors, request_gist, score_with, EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
use crate::error::Result;
use async_trait::async_trait;

pub struct ArchitectureEvaluator;

#[async_trait]
impl Evaluator for ArchitectureEvaluator {
    fn id(&self) -> &'static str {
        "architecture"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Architecture
    }

    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse> {
        let base = base_factors(context);
        // Structural work reads as familiar territory for this perspective
        let confidence = score_with(base, None, Some(4), None, None);

        let text = format!(
            "🏛️ Architecture: Decompose \"{}\" along existing module boundaries. \
             Identify each interface the change crosses, pin the contract for every \
             dependency it introduces, and keep the new surface in its own layer \
             rather than widening an existing one.",
            request_gist(&context.description)
        );

        Ok(EvaluatorResponse {
            evaluator_id: self.id().to_string(),
            text,
            confidence,
            suggestions: vec![
                "Define module boundaries before writing code".to_string(),
                "Document the interface contract for downstream consumers".to_string(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_response_carries_alignment_vocabulary() {
        let ctx = EvaluationContext::from_description("split the importer into stages");
        let response = ArchitectureEvaluator.analyze(&ctx).await.unwrap();

        assert_eq!(response.evaluator_id, "architecture");
        let lower = response.text.to_lowercase();
        assert!(lower.contains("module"));
        assert!(lower.contains("interface"));
        assert!((0.10..=1.0).contains(&response.confidence));
    }
}
