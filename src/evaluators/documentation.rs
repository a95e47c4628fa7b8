//! Documentation perspective.

use super::{base_factors, request_gist, score_with, EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
use crate::error::Result;
use async_trait::async_trait;

pub struct DocumentationEvaluator;

#[async_trait]
impl Evaluator for DocumentationEvaluator {
    fn id(&self) -> &'static str {
        "documentation"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Documentation
    }

    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse> {
        let base = base_factors(context);
        // Describing a change is simpler than making it
        let complexity = base.complexity().saturating_sub(1).max(1);
        let confidence = score_with(base, Some(complexity), None, None, None);

        let text = format!(
            "📝 Documentation: Record why \"{}\" is happening, not just what changed: \
             update the module docs at the touched interface, note any behavior change \
             in the changelog, and leave a migration note if callers must adapt.",
            request_gist(&context.description)
        );

        Ok(EvaluatorResponse {
            evaluator_id: self.id().to_string(),
            text,
            confidence,
            suggestions: vec![
                "Update the changelog and module docs".to_string(),
            ],
        })
    }
}
