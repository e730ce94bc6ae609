use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Issue + action weights (two-factor scoring).
pub const ISSUE_ACTION_WEIGHTS: Weights = Weights {
    exact_match: 0.7,
    category_match: 0.3,
    issue_weight: 0.7,
    action_weight: 0.3,
    value_weight: 0.0,
};

/// Issue + action + value weights (three-factor scoring).
/// Issue and action give up 0.1 each to make room for value questions.
pub const ISSUE_ACTION_VALUE_WEIGHTS: Weights = Weights {
    exact_match: 0.7,
    category_match: 0.3,
    issue_weight: 0.6,
    action_weight: 0.2,
    value_weight: 0.2,
};

const SUM_TOLERANCE: f64 = 1e-6;

/// Inner (`exact_match`, `category_match`) and outer (`*_weight`)
/// coefficients. A plain value: copy it, never share and mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub exact_match: f64,
    pub category_match: f64,
    pub issue_weight: f64,
    pub action_weight: f64,
    pub value_weight: f64,
}

impl Default for Weights {
    fn default() -> Self {
        ISSUE_ACTION_WEIGHTS
    }
}

impl Weights {
    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("exact_match", self.exact_match),
            ("category_match", self.category_match),
            ("issue_weight", self.issue_weight),
            ("action_weight", self.action_weight),
            ("value_weight", self.value_weight),
        ]
    }

    pub fn match_sum(&self) -> f64 {
        self.exact_match + self.category_match
    }

    pub fn outer_sum(&self, include_values: bool) -> f64 {
        let base = self.issue_weight + self.action_weight;
        if include_values {
            base + self.value_weight
        } else {
            base
        }
    }

    /// Every coefficient must be finite and within [0, 1]. The sums are
    /// expected to be 1 but are not enforced; see [`Weights::sum_drift`].
    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, value) in self.named() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }

    /// Groups whose sum is not 1, as `(group, sum)`.
    pub fn sum_drift(&self, include_values: bool) -> Vec<(&'static str, f64)> {
        let mut drift = Vec::new();
        let inner = self.match_sum();
        if (inner - 1.0).abs() > SUM_TOLERANCE {
            drift.push(("match", inner));
        }
        let outer = self.outer_sum(include_values);
        if (outer - 1.0).abs() > SUM_TOLERANCE {
            drift.push(("outer", outer));
        }
        drift
    }

    pub fn with_overrides(mut self, overrides: &WeightOverrides) -> Self {
        if let Some(v) = overrides.exact_match {
            self.exact_match = v;
        }
        if let Some(v) = overrides.category_match {
            self.category_match = v;
        }
        if let Some(v) = overrides.issue_weight {
            self.issue_weight = v;
        }
        if let Some(v) = overrides.action_weight {
            self.action_weight = v;
        }
        if let Some(v) = overrides.value_weight {
            self.value_weight = v;
        }
        self
    }
}

/// Partial weights supplied by a request or the environment; unset fields
/// keep the mode's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_match: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_weight: Option<f64>,
}

impl WeightOverrides {
    pub const ENV_EXACT_MATCH: &'static str = "CM_WEIGHT_EXACT_MATCH";
    pub const ENV_CATEGORY_MATCH: &'static str = "CM_WEIGHT_CATEGORY_MATCH";
    pub const ENV_ISSUE: &'static str = "CM_WEIGHT_ISSUE";
    pub const ENV_ACTION: &'static str = "CM_WEIGHT_ACTION";
    pub const ENV_VALUE: &'static str = "CM_WEIGHT_VALUE";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `CM_WEIGHT_*` keys through `lookup`. Values that do not parse
    /// as numbers are skipped with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| -> Option<f64> {
            let raw = lookup(key)?;
            match raw.trim().parse::<f64>() {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(key, raw = %raw, error = %err, "ignoring unparsable weight override");
                    None
                }
            }
        };

        Self {
            exact_match: read(Self::ENV_EXACT_MATCH),
            category_match: read(Self::ENV_CATEGORY_MATCH),
            issue_weight: read(Self::ENV_ISSUE),
            action_weight: read(Self::ENV_ACTION),
            value_weight: read(Self::ENV_VALUE),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
