pub mod api;
pub mod error;
pub mod logging;
pub mod matching;
pub mod taxonomy;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub use error::MatchError;
pub use taxonomy::CategoryIndex;

/// Issue id -> rank. Smaller ranks are higher priority.
pub type IssueRankings = BTreeMap<String, f64>;

/// Preferred engagement methods ("volunteer", "donate", ...).
pub type ActionSet = BTreeSet<String>;

/// Issue id -> question -> response (0-9 by convention, not enforced).
pub type ValueResponses = BTreeMap<String, BTreeMap<ValueQuestion, f64>>;

/// The fixed value-alignment questions asked per issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueQuestion {
    Q1,
    Q2,
}

impl ValueQuestion {
    pub const ALL: [ValueQuestion; 2] = [ValueQuestion::Q1, ValueQuestion::Q2];
}

/// One party's side of a match: either the user or the organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub rankings: IssueRankings,
    #[serde(default)]
    pub actions: ActionSet,
    #[serde(default)]
    pub values: ValueResponses,
    /// Explicit rank ceiling from the older profile format.
    /// When absent the number of ranked issues is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_max_rank: Option<f64>,
}

impl Profile {
    pub fn new<I, K>(rankings: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            rankings: rankings.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::default()
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value<S: Into<String>>(
        mut self,
        issue: S,
        question: ValueQuestion,
        response: f64,
    ) -> Self {
        self.values
            .entry(issue.into())
            .or_default()
            .insert(question, response);
        self
    }

    pub fn with_declared_max_rank(mut self, max_rank: f64) -> Self {
        self.declared_max_rank = Some(max_rank);
        self
    }

    pub fn rank(&self, issue: &str) -> Option<f64> {
        self.rankings.get(issue).copied()
    }

    pub fn value(&self, issue: &str, question: ValueQuestion) -> Option<f64> {
        self.values
            .get(issue)
            .and_then(|answers| answers.get(&question))
            .copied()
    }

    /// Scale reference and worst-case penalty for this party.
    pub fn max_rank(&self) -> f64 {
        self.declared_max_rank.unwrap_or(self.rankings.len() as f64)
    }
}
