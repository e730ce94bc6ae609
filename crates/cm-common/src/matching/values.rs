use crate::{Profile, ValueQuestion};

/// Midpoint of the 0-9 response range, used when no answers overlap.
pub const NEUTRAL_VALUE_PENALTY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScore {
    /// Mean response distance times `value_weight`, unrounded.
    pub score: f64,
    /// Issue/question pairs both parties answered.
    pub answered_pairs: usize,
}

/// Average distance over value questions both parties answered, restricted
/// to issues both parties ranked.
pub fn score_values(user: &Profile, org: &Profile, value_weight: f64) -> ValueScore {
    let mut total_distance = 0.0;
    let mut answered_pairs = 0usize;

    for issue in org.rankings.keys().filter(|issue| user.rankings.contains_key(*issue)) {
        for question in ValueQuestion::ALL {
            if let (Some(user_value), Some(org_value)) =
                (user.value(issue, question), org.value(issue, question))
            {
                total_distance += (user_value - org_value).abs();
                answered_pairs += 1;
            }
        }
    }

    let mean = if answered_pairs > 0 {
        total_distance / answered_pairs as f64
    } else {
        NEUTRAL_VALUE_PENALTY
    };

    ValueScore {
        score: mean * value_weight,
        answered_pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValueQuestion::{Q1, Q2};

    fn user() -> Profile {
        Profile::new([("Ocean Conservation", 1.0), ("Mental Health", 2.0)])
            .with_value("Ocean Conservation", Q1, 8.0)
            .with_value("Ocean Conservation", Q2, 9.0)
            .with_value("Mental Health", Q1, 7.0)
    }

    #[test]
    fn averages_over_shared_answers() {
        let org = Profile::new([("Ocean Conservation", 1.0), ("Depression Awareness", 2.0)])
            .with_value("Ocean Conservation", Q1, 7.0)
            .with_value("Ocean Conservation", Q2, 5.0)
            .with_value("Depression Awareness", Q1, 6.0);

        let result = score_values(&user(), &org, 0.2);
        assert_eq!(result.answered_pairs, 2);
        // ((8-7) + (9-5)) / 2 * 0.2
        assert!((result.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_overlap_uses_neutral_penalty() {
        let org = Profile::new([("Climate Change", 1.0)]).with_value("Climate Change", Q1, 3.0);

        let result = score_values(&user(), &org, 0.2);
        assert_eq!(result.answered_pairs, 0);
        assert!((result.score - NEUTRAL_VALUE_PENALTY * 0.2).abs() < 1e-12);
    }

    #[test]
    fn answers_on_issues_not_ranked_by_both_are_ignored() {
        // The org answered for Mental Health but never ranked it.
        let org = Profile::new([("Ocean Conservation", 1.0)])
            .with_value("Mental Health", Q1, 0.0)
            .with_value("Ocean Conservation", Q2, 9.0);

        let result = score_values(&user(), &org, 1.0);
        assert_eq!(result.answered_pairs, 1);
        assert_eq!(result.score, 0.0);
    }
}
