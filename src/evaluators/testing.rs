//! Testing perspective: coverage for the change and its failure paths.

use super::{base_factors, request_gist, score_with, EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
use crate::error::Result;
use async_trait::async_trait;

pub struct TestingEvaluator;

#[async_trait]
impl Evaluator for TestingEvaluator {
    fn id(&self) -> &'static str {
        "testing"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Testing
    }

    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse> {
        let base = base_factors(context);
        let confidence = score_with(base, None, None, None, None);

        let text = format!(
            "🧪 Testing: For \"{}\", enumerate observable behaviors before touching \
             code: the happy path, each error branch, and the boundary values. Cover \
             them at the lowest level that can observe the behavior, and add one \
             end-to-end check for the user-visible flow.",
            request_gist(&context.description)
        );

        Ok(EvaluatorResponse {
            evaluator_id: self.id().to_string(),
            text,
            confidence,
            suggestions: vec![
                "Add regression tests covering the failure path".to_string(),
                "Run the full suite before confirming each step".to_string(),
            ],
        })
    }
}
