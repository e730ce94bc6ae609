use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    actions::score_actions,
    config::ScoringConfig,
    issues::{score_issues, IssueComparison},
    values::score_values,
};
use crate::{error::MatchError, taxonomy::CategoryIndex, Profile};

/// Rounds to 2 decimals on the exact stored value.
///
/// `(value * 100.0).round()` would round the product, which carries its own
/// error: 2.675 is stored as 2.67499... but times 100 lands on 267.5.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Final, rounded result of one user/organization comparison.
/// Lower is a closer match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub issue_score: f64,
    pub action_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
    pub total_score: f64,
}

impl MatchScore {
    /// Rounds each part for display. The total is rounded from the
    /// unrounded sum, so it can differ from the sum of the rounded parts
    /// by up to 0.02.
    pub fn from_raw(issue: f64, action: f64, value: Option<f64>) -> Self {
        let total = issue + action + value.unwrap_or(0.0);
        Self {
            issue_score: round2(issue),
            action_score: round2(action),
            value_score: value.map(round2),
            total_score: round2(total),
        }
    }
}

/// Score plus the intermediate numbers behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExplanation {
    pub score: MatchScore,
    pub scale_factor: f64,
    pub user_max_rank: f64,
    pub org_max_rank: f64,
    pub issues: Vec<IssueComparison>,
    pub action_similarity: Option<f64>,
    pub value_pairs: Option<usize>,
}

/// Scores user profiles against organization profiles.
///
/// Holds a validated, immutable config and a shared category index, so a
/// single scorer can be reused across calls and threads.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    config: ScoringConfig,
    index: Arc<CategoryIndex>,
}

impl MatchScorer {
    pub fn new(config: ScoringConfig, index: Arc<CategoryIndex>) -> Result<Self, MatchError> {
        config.weights.validate()?;

        for (group, sum) in config.weights.sum_drift(config.mode.includes_values()) {
            warn!(
                mode = config.mode.as_ref(),
                group,
                sum,
                "weights do not sum to 1; scores will not be comparable with defaults"
            );
        }

        Ok(Self { config, index })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, user: &Profile, org: &Profile) -> Result<MatchScore, MatchError> {
        self.explain(user, org).map(|explanation| explanation.score)
    }

    pub fn explain(&self, user: &Profile, org: &Profile) -> Result<MatchExplanation, MatchError> {
        let weights = &self.config.weights;

        let issues = score_issues(user, org, &self.index, weights)?;
        let actions = score_actions(&user.actions, &org.actions, weights.action_weight);
        let values = self
            .config
            .mode
            .includes_values()
            .then(|| score_values(user, org, weights.value_weight));

        let score = MatchScore::from_raw(issues.score, actions.score, values.map(|v| v.score));

        debug!(
            mode = self.config.mode.as_ref(),
            org_issues = org.rankings.len(),
            user_issues = user.rankings.len(),
            scale_factor = issues.scale_factor,
            issue_score = score.issue_score,
            action_score = score.action_score,
            value_score = ?score.value_score,
            total_score = score.total_score,
            "scored match"
        );

        Ok(MatchExplanation {
            score,
            scale_factor: issues.scale_factor,
            user_max_rank: issues.user_max_rank,
            org_max_rank: issues.org_max_rank,
            issues: issues.comparisons,
            action_similarity: actions.similarity,
            value_pairs: values.map(|v| v.answered_pairs),
        })
    }
}

/// Two-factor score (issue + action) with default weights.
pub fn calculate_issue_action_score(
    user: &Profile,
    org: &Profile,
    index: Arc<CategoryIndex>,
) -> Result<MatchScore, MatchError> {
    MatchScorer::new(ScoringConfig::issue_action(), index)?.score(user, org)
}

/// Three-factor score (issue + action + value) with default weights.
pub fn calculate_issue_action_value_score(
    user: &Profile,
    org: &Profile,
    index: Arc<CategoryIndex>,
) -> Result<MatchScore, MatchError> {
    MatchScorer::new(ScoringConfig::issue_action_value(), index)?.score(user, org)
}
