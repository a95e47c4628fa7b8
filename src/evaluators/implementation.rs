//! Implementation perspective: the concrete change plan.

use super::{base_factors, request_gist, score_with, EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
use crate::error::Result;
use async_trait::async_trait;

pub struct ImplementationEvaluator;

#[async_trait]
impl Evaluator for ImplementationEvaluator {
    fn id(&self) -> &'static str {
        "implementation"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Implementation
    }

    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse> {
        let base = base_factors(context);
        // Writing the code is one notch harder than describing it
        let complexity = (base.complexity() + 1).min(5);
        let confidence = score_with(base, Some(complexity), None, None, None);

        let text = format!(
            "🔨 Implementation: Work \"{}\" as a short dependency-ordered sequence: \
             land the data model first, then the module logic behind its interface, \
             then wire the call sites. Keep each commit compiling and avoid touching \
             unrelated layers.",
            request_gist(&context.description)
        );

        Ok(EvaluatorResponse {
            evaluator_id: self.id().to_string(),
            text,
            confidence,
            suggestions: vec![
                "Land the change behind a feature flag".to_string(),
                "Add regression tests covering the failure path".to_string(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complexity_bias_lowers_confidence() {
        let ctx = EvaluationContext::from_description(
            "refactor the module interface used by the importer",
        );
        let implementation = ImplementationEvaluator.analyze(&ctx).await.unwrap();
        let architecture = super::super::ArchitectureEvaluator
            .analyze(&ctx)
            .await
            .unwrap();
        assert!(implementation.confidence <= architecture.confidence);
    }
}
