//! Security perspective: the risk-focused member of the panel.
//!
//! This evaluator's text carries explicit risk markers when the request
//! touches sensitive territory; the coordinator's summary synthesis looks
//! for those markers when deciding whether to raise the risk flag.

use super::{base_factors, request_gist, score_with, EvaluationContext, Evaluator, EvaluatorCategory, EvaluatorResponse};
use crate::error::Result;
use async_trait::async_trait;

pub struct SecurityEvaluator;

#[async_trait]
impl Evaluator for SecurityEvaluator {
    fn id(&self) -> &'static str {
        "security"
    }

    fn category(&self) -> EvaluatorCategory {
        EvaluatorCategory::Security
    }

    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse> {
        let base = base_factors(context);
        // This perspective weighs risk one notch above the baseline
        let risk_level = (base.risk_level() + 1).min(5);
        let confidence = score_with(base, None, None, Some(risk_level), None);

        let gist = request_gist(&context.description);
        let text = if risk_level >= 3 {
            format!(
                "🛡️ Security: Warning - \"{gist}\" carries elevated risk. Treat every \
                 external input as hostile, review the authentication and authorization \
                 paths it touches, and stage the rollout so a vulnerability can be \
                 contained before full exposure."
            )
        } else {
            format!(
                "🛡️ Security: Request \"{gist}\" looks low risk. Still validate inputs \
                 at the boundary and keep secrets out of logs and error messages."
            )
        };

        let mut suggestions = vec!["Audit dependencies for known vulnerabilities".to_string()];
        if risk_level >= 3 {
            suggestions.insert(
                0,
                "Critical: review authentication and input validation paths".to_string(),
            );
        }

        Ok(EvaluatorResponse {
            evaluator_id: self.id().to_string(),
            text,
            confidence,
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_risky_request_gets_warning_marker() {
        let ctx = EvaluationContext::from_description(
            "rework production auth token validation during the migration",
        );
        let response = SecurityEvaluator.analyze(&ctx).await.unwrap();
        assert!(response.text.to_lowercase().contains("warning"));
        assert!(response
            .suggestions
            .iter()
            .any(|s| s.starts_with("Critical:")));
    }

    #[tokio::test]
    async fn test_calm_request_has_no_urgent_suggestion() {
        let ctx = EvaluationContext::from_description("rename a helper function");
        let response = SecurityEvaluator.analyze(&ctx).await.unwrap();
        assert!(!response.suggestions.iter().any(|s| s.starts_with("Critical:")));
    }
}
