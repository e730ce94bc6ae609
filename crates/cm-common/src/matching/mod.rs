pub mod actions;
pub mod config;
pub mod issues;
pub mod scoring;
pub mod values;
pub mod weights;

pub use actions::{action_similarity, score_actions, ActionScore};
pub use config::{ScoringConfig, ScoringMode, UnknownScoringMode};
pub use issues::{scale_factor, score_issues, IssueComparison, IssueScore};
pub use scoring::{
    calculate_issue_action_score, calculate_issue_action_value_score, round2, MatchExplanation,
    MatchScore, MatchScorer,
};
pub use values::{score_values, ValueScore, NEUTRAL_VALUE_PENALTY};
pub use weights::{WeightOverrides, Weights, ISSUE_ACTION_VALUE_WEIGHTS, ISSUE_ACTION_WEIGHTS};
