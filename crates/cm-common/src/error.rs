use thiserror::Error;

use crate::ValueQuestion;

/// Reasons a match cannot be scored. Every variant is an input problem;
/// nothing here is transient, so callers should not retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("invalid input: empty organization rankings")]
    EmptyOrganizationRankings,
    #[error("invalid input: empty user rankings")]
    EmptyUserRankings,
    #[error("invalid input: weight `{name}` must be a finite value in [0, 1], got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("invalid input: {party} rank for `{issue}` must be finite, got {value}")]
    InvalidRank {
        party: &'static str,
        issue: String,
        value: f64,
    },
    #[error("invalid input: {party} {question:?} response for `{issue}` must be finite, got {value}")]
    InvalidValueResponse {
        party: &'static str,
        issue: String,
        question: ValueQuestion,
        value: f64,
    },
    #[error("invalid input: {party} declared max rank must be finite and positive, got {value}")]
    InvalidMaxRank { party: &'static str, value: f64 },
}

impl MatchError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MatchError::EmptyOrganizationRankings
                | MatchError::EmptyUserRankings
                | MatchError::InvalidWeight { .. }
                | MatchError::InvalidRank { .. }
                | MatchError::InvalidValueResponse { .. }
                | MatchError::InvalidMaxRank { .. }
        )
    }
}
