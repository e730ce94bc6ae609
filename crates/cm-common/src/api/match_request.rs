use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    matching::{ScoringConfig, ScoringMode, WeightOverrides, Weights},
    taxonomy::CategoryIndex,
    Profile,
};

/// One user/organization pair to score, as read from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub user: Profile,
    pub organization: Profile,
    /// issue -> category
    #[serde(default)]
    pub issue_categories: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ScoringMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightOverrides>,
}

impl MatchRequest {
    /// Fallback weights that differ from their mode's defaults and are lost
    /// because the request switches to another mode.
    pub fn discarded_weights(&self, fallback: &ScoringConfig) -> Option<Weights> {
        let switches_mode = self.mode.is_some_and(|mode| mode != fallback.mode);
        let customised = fallback.weights != fallback.mode.default_weights();
        (switches_mode && customised).then_some(fallback.weights)
    }

    /// A request that names a mode starts from that mode's defaults;
    /// otherwise `fallback` is used. Request weights are applied last.
    pub fn resolve_config(&self, fallback: ScoringConfig) -> ScoringConfig {
        if let Some(weights) = self.discarded_weights(&fallback) {
            warn!(
                fallback_mode = fallback.mode.as_ref(),
                ?weights,
                "request selects another scoring mode; configured weight overrides are dropped"
            );
        }

        let base = match self.mode {
            Some(mode) if mode != fallback.mode => ScoringConfig::for_mode(mode),
            _ => fallback,
        };

        match &self.weights {
            Some(overrides) => base.with_overrides(overrides),
            None => base,
        }
    }

    pub fn category_index(&self) -> CategoryIndex {
        CategoryIndex::from_taxonomy(
            self.issue_categories
                .iter()
                .map(|(issue, category)| (issue.as_str(), category.as_str())),
        )
    }
}
