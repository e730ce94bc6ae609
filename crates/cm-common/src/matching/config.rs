use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use super::weights::{
    WeightOverrides, Weights, ISSUE_ACTION_VALUE_WEIGHTS, ISSUE_ACTION_WEIGHTS,
};

pub const ENV_SCORING_MODE: &str = "CM_SCORING_MODE";

/// Which sub-scores make up the total.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringMode {
    /// issue + action
    #[default]
    IssueAction,
    /// issue + action + value questions
    IssueActionValue,
}

impl ScoringMode {
    pub fn default_weights(self) -> Weights {
        match self {
            ScoringMode::IssueAction => ISSUE_ACTION_WEIGHTS,
            ScoringMode::IssueActionValue => ISSUE_ACTION_VALUE_WEIGHTS,
        }
    }

    pub fn includes_values(self) -> bool {
        matches!(self, ScoringMode::IssueActionValue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scoring mode `{0}` (expected issue_action or issue_action_value)")]
pub struct UnknownScoringMode(pub String);

impl FromStr for ScoringMode {
    type Err = UnknownScoringMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "issue_action" | "two_factor" => Ok(ScoringMode::IssueAction),
            "issue_action_value" | "three_factor" => Ok(ScoringMode::IssueActionValue),
            _ => Err(UnknownScoringMode(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub mode: ScoringMode,
    pub weights: Weights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::for_mode(ScoringMode::default())
    }
}

impl ScoringConfig {
    pub fn for_mode(mode: ScoringMode) -> Self {
        Self {
            mode,
            weights: mode.default_weights(),
        }
    }

    pub fn issue_action() -> Self {
        Self::for_mode(ScoringMode::IssueAction)
    }

    pub fn issue_action_value() -> Self {
        Self::for_mode(ScoringMode::IssueActionValue)
    }

    pub fn with_overrides(self, overrides: &WeightOverrides) -> Self {
        Self {
            weights: self.weights.with_overrides(overrides),
            ..self
        }
    }

    /// `CM_SCORING_MODE` picks the mode (falls back to the default with a
    /// warning when unrecognised), then `CM_WEIGHT_*` adjusts its weights.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(ENV_SCORING_MODE) {
            Some(raw) => raw.parse::<ScoringMode>().unwrap_or_else(|err: UnknownScoringMode| {
                tracing::warn!(error = %err, "falling back to default scoring mode");
                ScoringMode::default()
            }),
            None => ScoringMode::default(),
        };

        Self::for_mode(mode).with_overrides(&WeightOverrides::from_lookup(lookup))
    }
}
