use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::{
    IssueComparison, MatchExplanation, MatchScore, ScoringConfig, ScoringMode, Weights,
};

/// Scored match as emitted to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub score: MatchScore,
    pub mode: ScoringMode,
    pub weights: Weights,
    /// Per-organization-issue breakdown; only filled when an explanation
    /// was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<MatchDetails>,
    pub engine_version: String,
    pub scored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub scale_factor: f64,
    pub user_max_rank: f64,
    pub org_max_rank: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_pairs: Option<usize>,
    pub issues: Vec<IssueComparison>,
}

impl From<MatchExplanation> for MatchDetails {
    fn from(value: MatchExplanation) -> Self {
        Self {
            scale_factor: value.scale_factor,
            user_max_rank: value.user_max_rank,
            org_max_rank: value.org_max_rank,
            action_similarity: value.action_similarity,
            value_pairs: value.value_pairs,
            issues: value.issues,
        }
    }
}

impl MatchResponse {
    pub fn from_score(score: MatchScore, config: &ScoringConfig, scored_at: DateTime<Utc>) -> Self {
        Self {
            score,
            mode: config.mode,
            weights: config.weights,
            details: None,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            scored_at,
        }
    }

    pub fn from_explanation(
        explanation: MatchExplanation,
        config: &ScoringConfig,
        scored_at: DateTime<Utc>,
    ) -> Self {
        let mut response = Self::from_score(explanation.score, config, scored_at);
        response.details = Some(MatchDetails::from(explanation));
        response
    }
}
