//! # Evaluator Contract and Built-in Panel
//!
//! An evaluator is one independent analysis perspective: it reads an
//! evaluation context and produces a scored opinion with suggestions. Six
//! built-in evaluators cover the fixed category order; new kinds register
//! through [`crate::registry::EvaluatorRegistry`] without touching the
//! coordinator.
//!
//! Every confidence value is produced through [`crate::scoring`]; evaluators
//! never invent scores. A defective evaluator may return an error, which the
//! panel coordinator converts into a degraded response so one bad evaluator
//! can never abort a batch.

use crate::error::Result;
use crate::scoring::{self, ScoringFactors};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub mod architecture;
pub mod documentation;
pub mod implementation;
pub mod performance;
pub mod security;
pub mod testing;

pub use architecture::ArchitectureEvaluator;
pub use documentation::DocumentationEvaluator;
pub use implementation::ImplementationEvaluator;
pub use performance::PerformanceEvaluator;
pub use security::SecurityEvaluator;
pub use testing::TestingEvaluator;

/// The fixed evaluator categories, in canonical panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorCategory {
    Architecture,
    Implementation,
    Testing,
    Security,
    Performance,
    Documentation,
}

impl EvaluatorCategory {
    /// Canonical panel order; step generation follows this ordering
    pub const ORDER: &'static [EvaluatorCategory] = &[
        Self::Architecture,
        Self::Implementation,
        Self::Testing,
        Self::Security,
        Self::Performance,
        Self::Documentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Implementation => "implementation",
            Self::Testing => "testing",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Documentation => "documentation",
        }
    }
}

impl fmt::Display for EvaluatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The input every evaluator analyzes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Free-text work request; validated non-empty before fan-out
    pub description: String,
    pub work_item_id: Option<Uuid>,
    pub step_id: Option<Uuid>,
    /// Extra caller-supplied signal, e.g. prior step errors
    pub metadata: Value,
}

impl EvaluationContext {
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            work_item_id: None,
            step_id: None,
            metadata: Value::Null,
        }
    }
}

/// A single evaluator's scored opinion. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorResponse {
    pub evaluator_id: String,
    pub text: String,
    /// In [0.10, 1.00], always produced by the scoring function
    pub confidence: f64,
    pub suggestions: Vec<String>,
}

/// One independent analysis perspective
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Stable identifier, used as the consensus key
    fn id(&self) -> &'static str;

    fn category(&self) -> EvaluatorCategory;

    /// Analyze the context into a scored response.
    ///
    /// Implementations should contain their own failures; an `Err` escaping
    /// here is recovered by the coordinator as a degraded response.
    async fn analyze(&self, context: &EvaluationContext) -> Result<EvaluatorResponse>;
}

/// Derive the shared baseline scoring factors from a context.
///
/// Deterministic text heuristics only: word count drives complexity, risk
/// vocabulary drives risk, concrete detail (paths, metadata, length) drives
/// data quality. Individual evaluators bias these for their perspective.
pub(crate) fn base_factors(context: &EvaluationContext) -> ScoringFactors {
    let description = context.description.to_lowercase();
    let words = description.split_whitespace().count();

    let complexity = match words {
        0..=11 => 2,
        12..=39 => 3,
        40..=119 => 4,
        _ => 5,
    };

    let familiarity = if crate::constants::vocabulary::ALIGNMENT_TERMS
        .iter()
        .any(|term| description.contains(term))
    {
        4
    } else {
        3
    };

    let risk_hits = ["security", "auth", "payment", "delete", "migration", "production"]
        .iter()
        .filter(|marker| description.contains(*marker))
        .count();
    let risk_level = (1 + risk_hits).min(5) as u8;

    let mut data_quality = 2u8;
    if words > 15 {
        data_quality += 1;
    }
    if description.contains('/') || description.contains('.') {
        data_quality += 1;
    }
    if context.metadata.as_object().is_some_and(|m| !m.is_empty()) {
        data_quality += 1;
    }

    ScoringFactors::new(complexity, familiarity, risk_level, data_quality)
}

/// Score with one or more factors overridden relative to the baseline
pub(crate) fn score_with(
    base: ScoringFactors,
    complexity: Option<u8>,
    familiarity: Option<u8>,
    risk_level: Option<u8>,
    data_quality: Option<u8>,
) -> f64 {
    scoring::score(ScoringFactors::new(
        complexity.unwrap_or_else(|| base.complexity()),
        familiarity.unwrap_or_else(|| base.familiarity()),
        risk_level.unwrap_or_else(|| base.risk_level()),
        data_quality.unwrap_or_else(|| base.data_quality()),
    ))
}

/// Short echo of the request used inside evaluator text templates
pub(crate) fn request_gist(description: &str) -> String {
    const GIST_LENGTH: usize = 72;
    let trimmed = description.trim();
    if trimmed.len() <= GIST_LENGTH {
        trimmed.to_string()
    } else {
        let mut end = GIST_LENGTH;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_order_covers_all_six() {
        assert_eq!(EvaluatorCategory::ORDER.len(), 6);
        assert_eq!(EvaluatorCategory::ORDER[0], EvaluatorCategory::Architecture);
        assert_eq!(
            EvaluatorCategory::ORDER[5],
            EvaluatorCategory::Documentation
        );
    }

    #[test]
    fn test_base_factors_are_deterministic() {
        let ctx = EvaluationContext::from_description(
            "migrate the auth module to the new schema and delete legacy rows",
        );
        assert_eq!(base_factors(&ctx), base_factors(&ctx));
    }

    #[test]
    fn test_risk_vocabulary_raises_risk_factor() {
        let calm = EvaluationContext::from_description("rename a local variable");
        let risky = EvaluationContext::from_description(
            "change production payment auth before the migration window",
        );
        assert!(base_factors(&risky).risk_level() > base_factors(&calm).risk_level());
    }

    #[test]
    fn test_metadata_improves_data_quality() {
        let bare = EvaluationContext::from_description("tune the importer retry loop");
        let mut detailed = bare.clone();
        detailed.metadata = json!({ "error": "timeout after 30s" });
        assert!(base_factors(&detailed).data_quality() >= base_factors(&bare).data_quality());
    }

    #[test]
    fn test_request_gist_truncates_long_text() {
        let gist = request_gist(&"word ".repeat(40));
        assert!(gist.len() <= 76);
        assert!(gist.ends_with("..."));
    }
}
