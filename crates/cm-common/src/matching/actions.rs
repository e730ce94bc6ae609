use crate::ActionSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionScore {
    /// `raw * action_weight`, unrounded.
    pub score: f64,
    /// Jaccard similarity; `None` when either side has no actions.
    pub similarity: Option<f64>,
}

/// |∩| / |∪|, or `None` when either set is empty.
pub fn action_similarity(user: &ActionSet, org: &ActionSet) -> Option<f64> {
    if user.is_empty() || org.is_empty() {
        return None;
    }

    let intersection = user.intersection(org).count();
    let union = user.union(org).count();
    Some(intersection as f64 / union as f64)
}

/// Jaccard complement scaled by the number of user actions.
///
/// An empty side gets no overlap credit: the raw score is `|user|`, which is
/// 0 when the user listed no actions at all.
pub fn score_actions(user: &ActionSet, org: &ActionSet, action_weight: f64) -> ActionScore {
    let similarity = action_similarity(user, org);
    let user_count = user.len() as f64;
    let raw = match similarity {
        Some(similarity) => (1.0 - similarity) * user_count,
        None => user_count,
    };

    ActionScore {
        score: raw * action_weight,
        similarity,
    }
}
