//! Panel output types: consensus, summary, and the combined analysis.

use crate::evaluators::EvaluatorResponse;
use serde::{Deserialize, Serialize};

/// Keyed collection of each evaluator's opinion text for one request.
///
/// Keys are unique evaluator ids; iteration order is insertion order (the
/// panel order), which keeps downstream step generation deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Consensus {
    entries: Vec<(String, String)>,
}

impl Consensus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an evaluator's text, replacing any previous entry for the id
    pub fn insert(&mut self, evaluator_id: impl Into<String>, text: impl Into<String>) {
        let evaluator_id = evaluator_id.into();
        let text = text.into();
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == evaluator_id) {
            entry.1 = text;
        } else {
            self.entries.push((evaluator_id, text));
        }
    }

    pub fn get(&self, evaluator_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == evaluator_id)
            .map(|(_, text)| text.as_str())
    }

    pub fn contains(&self, evaluator_id: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == evaluator_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derived synthesis across one panel run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Mean confidence across all responses, rounded to 2 decimals
    pub mean_confidence: f64,
    /// Evaluator ids at or above the high-confidence threshold
    pub high_confidence: Vec<String>,
    /// Evaluator ids below the low-confidence threshold
    pub low_confidence: Vec<String>,
    /// Architecture/implementation alignment; `None` when either
    /// perspective was not part of the run
    pub alignment: Option<bool>,
    /// Whether the risk-focused evaluator's text carried risk markers
    pub risk_flagged: bool,
    /// Human-readable synthesis of the above
    pub text: String,
}

/// The complete result of one panel run. Ephemeral: callers may persist it,
/// the core does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiEvaluatorAnalysis {
    pub consensus: Consensus,
    pub responses: Vec<EvaluatorResponse>,
    pub summary: AnalysisSummary,
    /// Deduplicated, urgency-ranked suggestions, at most 10
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consensus_preserves_insertion_order() {
        let mut consensus = Consensus::new();
        consensus.insert("security", "watch the auth path");
        consensus.insert("architecture", "one module per stage");

        let keys: Vec<_> = consensus.keys().collect();
        assert_eq!(keys, vec!["security", "architecture"]);
    }

    #[test]
    fn test_consensus_keys_stay_unique() {
        let mut consensus = Consensus::new();
        consensus.insert("testing", "first opinion");
        consensus.insert("testing", "revised opinion");

        assert_eq!(consensus.len(), 1);
        assert_eq!(consensus.get("testing"), Some("revised opinion"));
    }
}
