//! Performance perspective.

use super::{base_factors, request_gist, score_with, EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
use crate::error::Result;
use async_trait::async_trait;

pub struct PerformanceEvaluator;

#[async_trait]
impl Evaluator for PerformanceEvaluator {
    fn id(&self) -> &'static str {
        "performance"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Performance
    }

    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse> {
        let base = base_factors(context);
        let confidence = score_with(base, None, None, None, None);

        let text = format!(
            "⚡ Performance: For \"{}\", measure before optimizing: capture a baseline \
             on the hot path, watch allocation counts across the boundary, and reject \
             any regression the baseline exposes. Avoid speculative caching until the \
             numbers ask for it.",
            request_gist(&context.description)
        );

        Ok(EvaluatorResponse {
            evaluator_id: self.id().to_string(),
            text,
            confidence,
            suggestions: vec![
                "Benchmark the hot path before and after the change".to_string(),
            ],
        })
    }
}
