use std::sync::Arc;

use cm_common::api::{MatchRequest, MatchResponse};
use cm_common::matching::{
    calculate_issue_action_score, calculate_issue_action_value_score, MatchScorer, ScoringConfig,
    WeightOverrides, NEUTRAL_VALUE_PENALTY,
};
use cm_common::{CategoryIndex, MatchError, Profile, ValueQuestion};
use serde_json::json;

fn civic_taxonomy() -> Arc<CategoryIndex> {
    Arc::new(CategoryIndex::from_taxonomy([
        ("Gun Control", "Public Safety"),
        ("Gun Violence Prevention", "Public Safety"),
        ("Mental Health", "Healthcare"),
        ("Depression Awareness", "Healthcare"),
        ("LGBTQ Rights", "Civil Rights"),
        ("Marriage Equality", "Civil Rights"),
        ("Gender Identity", "Civil Rights"),
        ("Ocean Conservation", "Environmental"),
    ]))
}

fn actions_user() -> [&'static str; 3] {
    ["volunteer", "donate", "social media"]
}

fn actions_org() -> [&'static str; 4] {
    ["volunteer", "lobby", "campaign", "social media"]
}

fn gun_control_user() -> Profile {
    Profile::new([("Gun Control", 1.0), ("Mental Health", 2.0), ("LGBTQ Rights", 3.0)])
        .with_actions(actions_user())
}

fn gun_violence_org() -> Profile {
    Profile::new([
        ("Gun Violence Prevention", 1.0),
        ("Depression Awareness", 2.0),
        ("Marriage Equality", 3.0),
        ("Gender Identity", 4.0),
    ])
    .with_actions(actions_org())
}

#[test]
fn two_factor_reference_scenario() {
    let score =
        calculate_issue_action_score(&gun_control_user(), &gun_violence_org(), civic_taxonomy())
            .unwrap();

    // distances 2.175 + 2.25 + 2.325 + 2.1 = 8.85; 8.85 / 3 * 0.7 ≈ 2.065
    assert_eq!(score.issue_score, 2.06);
    // (1 - 2/5) * 3 * 0.3
    assert_eq!(score.action_score, 0.54);
    assert_eq!(score.value_score, None);
    assert_eq!(score.total_score, 2.6);
}

#[test]
fn three_factor_without_value_answers_uses_neutral_penalty() {
    let score = calculate_issue_action_value_score(
        &gun_control_user(),
        &gun_violence_org(),
        civic_taxonomy(),
    )
    .unwrap();

    assert_eq!(score.issue_score, 1.77);
    assert_eq!(score.action_score, 0.36);
    assert_eq!(score.value_score, Some(NEUTRAL_VALUE_PENALTY * 0.2));
    assert_eq!(score.total_score, 3.13);
}

#[test]
fn three_factor_with_value_answers() {
    use ValueQuestion::{Q1, Q2};

    let user = Profile::new([
        ("Ocean Conservation", 1.0),
        ("Mental Health", 2.0),
        ("LGBTQ Rights", 3.0),
    ])
    .with_actions(actions_user())
    .with_value("Ocean Conservation", Q1, 8.0)
    .with_value("Ocean Conservation", Q2, 9.0)
    .with_value("Mental Health", Q1, 7.0)
    .with_value("Mental Health", Q2, 8.0);

    let org = Profile::new([
        ("Ocean Conservation", 1.0),
        ("Depression Awareness", 2.0),
        ("Marriage Equality", 3.0),
        ("Gender Identity", 4.0),
    ])
    .with_actions(actions_org())
    .with_value("Ocean Conservation", Q1, 7.0)
    .with_value("Ocean Conservation", Q2, 8.0)
    .with_value("Depression Awareness", Q1, 6.0)
    .with_value("Depression Awareness", Q2, 7.0);

    let score = calculate_issue_action_value_score(&user, &org, civic_taxonomy()).unwrap();

    assert_eq!(score.issue_score, 1.38);
    assert_eq!(score.action_score, 0.36);
    assert_eq!(score.value_score, Some(0.2));
    assert_eq!(score.total_score, 1.94);
}

#[test]
fn identical_profiles_have_zero_issue_and_action_score() {
    let user = gun_control_user();
    let score = calculate_issue_action_score(&user, &user.clone(), civic_taxonomy()).unwrap();

    assert_eq!(score.issue_score, 0.0);
    assert_eq!(score.action_score, 0.0);
    assert_eq!(score.total_score, 0.0);
}

#[test]
fn category_fallback_scores_better_than_no_match() {
    let user = Profile::new([("Gun Control", 1.0), ("Mental Health", 2.0)]);
    let near = Profile::new([("Gun Violence Prevention", 1.0), ("Depression Awareness", 2.0)]);
    let unrelated = Profile::new([("Tax Reform", 1.0), ("Zoning", 2.0)]);

    let near_score = calculate_issue_action_score(&user, &near, civic_taxonomy()).unwrap();
    let unrelated_score =
        calculate_issue_action_score(&user, &unrelated, civic_taxonomy()).unwrap();

    assert!(near_score.issue_score < unrelated_score.issue_score);
    // No exact and no category match: full penalty on both terms.
    assert_eq!(unrelated_score.issue_score, 1.4);
}

#[test]
fn empty_organization_rankings_are_rejected() {
    let err = calculate_issue_action_score(&gun_control_user(), &Profile::default(), civic_taxonomy())
        .unwrap_err();

    assert_eq!(err, MatchError::EmptyOrganizationRankings);
    assert!(err.is_invalid_input());
}

#[test]
fn custom_weights_shift_the_total() {
    let config = ScoringConfig::issue_action().with_overrides(&WeightOverrides {
        exact_match: Some(0.8),
        category_match: Some(0.2),
        issue_weight: Some(0.6),
        action_weight: Some(0.4),
        ..WeightOverrides::default()
    });
    let scorer = MatchScorer::new(config, civic_taxonomy()).unwrap();

    let custom = scorer.score(&gun_control_user(), &gun_violence_org()).unwrap();
    let default =
        calculate_issue_action_score(&gun_control_user(), &gun_violence_org(), civic_taxonomy())
            .unwrap();

    assert_eq!(custom.action_score, 0.72);
    assert_ne!(custom.total_score, default.total_score);
}

#[test]
fn json_request_scores_end_to_end() {
    let request: MatchRequest = serde_json::from_value(json!({
        "user": {
            "rankings": { "Gun Control": 1, "Mental Health": 2, "LGBTQ Rights": 3 },
            "actions": ["volunteer", "donate", "social media"]
        },
        "organization": {
            "rankings": {
                "Gun Violence Prevention": 1,
                "Depression Awareness": 2,
                "Marriage Equality": 3,
                "Gender Identity": 4
            },
            "actions": ["volunteer", "lobby", "campaign", "social media"]
        },
        "issue_categories": {
            "Gun Control": "Public Safety",
            "Gun Violence Prevention": "Public Safety",
            "Mental Health": "Healthcare",
            "Depression Awareness": "Healthcare",
            "LGBTQ Rights": "Civil Rights",
            "Marriage Equality": "Civil Rights",
            "Gender Identity": "Civil Rights"
        }
    }))
    .unwrap();

    let config = request.resolve_config(ScoringConfig::default());
    let scorer = MatchScorer::new(config, Arc::new(request.category_index())).unwrap();
    let explanation = scorer.explain(&request.user, &request.organization).unwrap();
    let response = MatchResponse::from_explanation(explanation, &config, chrono::Utc::now());

    assert_eq!(response.score.total_score, 2.6);
    let details = response.details.as_ref().unwrap();
    assert_eq!(details.scale_factor, 0.75);
    assert_eq!(details.issues.len(), 4);
    assert!(details
        .issues
        .iter()
        .all(|issue| issue.closest_user_issue.is_some()));
}
