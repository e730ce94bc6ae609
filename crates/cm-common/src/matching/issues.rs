use serde::{Deserialize, Serialize};

use super::weights::Weights;
use crate::{error::MatchError, taxonomy::CategoryIndex, Profile};

/// How one organization issue lined up against the user's rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueComparison {
    pub org_issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub scaled_org_rank: f64,
    /// `user_max_rank` when the user did not rank this issue.
    pub exact_distance: f64,
    /// Capped at `user_max_rank`.
    pub category_distance: f64,
    /// Closest user-ranked issue in the same category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_user_issue: Option<String>,
    pub weighted_distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueScore {
    /// `(Σ weighted_distance / user_max_rank) * issue_weight`, unrounded.
    pub score: f64,
    pub user_max_rank: f64,
    pub org_max_rank: f64,
    pub scale_factor: f64,
    pub comparisons: Vec<IssueComparison>,
}

fn check_profile(party: &'static str, profile: &Profile) -> Result<(), MatchError> {
    if let Some((issue, &value)) = profile.rankings.iter().find(|(_, rank)| !rank.is_finite()) {
        return Err(MatchError::InvalidRank {
            party,
            issue: issue.clone(),
            value,
        });
    }

    for (issue, answers) in &profile.values {
        if let Some((&question, &value)) = answers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(MatchError::InvalidValueResponse {
                party,
                issue: issue.clone(),
                question,
                value,
            });
        }
    }

    if let Some(value) = profile.declared_max_rank {
        if !value.is_finite() || value <= 0.0 {
            return Err(MatchError::InvalidMaxRank { party, value });
        }
    }

    Ok(())
}

/// Ratio that maps organization ranks onto the user's scale.
///
/// A party that ranked 10 issues and one that ranked 4 are compared on
/// relative position, not raw rank magnitude.
pub fn scale_factor(user: &Profile, org: &Profile) -> Result<f64, MatchError> {
    check_profile("organization", org)?;
    check_profile("user", user)?;

    if org.rankings.is_empty() {
        return Err(MatchError::EmptyOrganizationRankings);
    }
    if user.rankings.is_empty() {
        return Err(MatchError::EmptyUserRankings);
    }

    Ok(user.max_rank() / org.max_rank())
}

/// Issue-alignment distance: exact match first, nearest same-category user
/// issue as fallback, worst-case penalty (`user_max_rank`) otherwise.
pub fn score_issues(
    user: &Profile,
    org: &Profile,
    index: &CategoryIndex,
    weights: &Weights,
) -> Result<IssueScore, MatchError> {
    let scale = scale_factor(user, org)?;
    let user_max_rank = user.max_rank();

    let mut total_distance = 0.0;
    let mut comparisons = Vec::with_capacity(org.rankings.len());

    for (org_issue, org_rank) in &org.rankings {
        let scaled = org_rank * scale;

        let exact_distance = match user.rank(org_issue) {
            Some(user_rank) => (user_rank - scaled).abs(),
            None => user_max_rank,
        };

        let category = index.category_of(org_issue);
        let closest = category.and_then(|category| {
            index
                .issues_in(category)
                .filter_map(|issue| user.rank(issue).map(|rank| (issue, (rank - scaled).abs())))
                .min_by(|a, b| a.1.total_cmp(&b.1))
        });
        let category_distance = closest
            .map(|(_, distance)| distance.min(user_max_rank))
            .unwrap_or(user_max_rank);

        let weighted_distance =
            exact_distance * weights.exact_match + category_distance * weights.category_match;
        total_distance += weighted_distance;

        comparisons.push(IssueComparison {
            org_issue: org_issue.clone(),
            category: category.map(str::to_string),
            scaled_org_rank: scaled,
            exact_distance,
            category_distance,
            closest_user_issue: closest.map(|(issue, _)| issue.to_string()),
            weighted_distance,
        });
    }

    Ok(IssueScore {
        score: (total_distance / user_max_rank) * weights.issue_weight,
        user_max_rank,
        org_max_rank: org.max_rank(),
        scale_factor: scale,
        comparisons,
    })
}
