// Unit tests for Roomie Match

use roomie_match::config::ScoringSettings;
use roomie_match::core::{
    distance::{haversine_distance, within_radius},
    filters::passes_dealbreakers,
    normalizer::{normalize_text, NormalizeError, Normalizer},
    scoring::{budget_score, calculate_breakdown, cleanliness_score, interests_score},
    weighting::{CategoryWeights, ImportanceWeights},
};
use roomie_match::models::{
    BudgetRange, Candidate, Category, Cleanliness, CompatibilityBreakdown, Dimension, GeoPoint,
    Importance, PreferenceValue, RawListing, RawPreferences, RawProfile,
};
use serde_json::json;
use std::collections::BTreeSet;

fn profile_from(value: serde_json::Value) -> RawProfile {
    serde_json::from_value(value).unwrap()
}

fn preferences_from(value: serde_json::Value) -> RawPreferences {
    serde_json::from_value(json!({ "userId": "u1", "preferences": value })).unwrap()
}

#[test]
fn test_haversine_distance_zero() {
    let nyc = GeoPoint { latitude: 40.7128, longitude: -74.0060 };
    assert!(haversine_distance(&nyc, &nyc) < 0.01);
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    // Manhattan to Brooklyn is approximately 5-10 km
    let manhattan = GeoPoint { latitude: 40.7580, longitude: -73.9855 };
    let brooklyn = GeoPoint { latitude: 40.6782, longitude: -73.9442 };

    let distance = haversine_distance(&manhattan, &brooklyn);
    assert!(distance > 5.0 && distance < 15.0);
    assert!(within_radius(&manhattan, &brooklyn, 15.0));
    assert!(!within_radius(&manhattan, &brooklyn, 5.0));
}

#[test]
fn test_normalize_text() {
    assert_eq!(normalize_text("  Downtown,\u{200B}  Austin "), "downtown, austin");
    assert_eq!(normalize_text("EAST\tSIDE"), "east side");
}

#[test]
fn test_profile_field_aliases() {
    let snake = profile_from(json!({
        "user_id": "u1",
        "budget_min": 800,
        "budget_max": 1200,
        "preferredLocations": ["Downtown, Austin"],
        "pets": "yes",
    }));
    let camel = profile_from(json!({
        "userId": "u1",
        "budgetMin": 800,
        "budgetMax": 1200,
        "locations": "downtown,   austin",
        "hasPets": true,
    }));

    let normalizer = Normalizer::default();
    assert_eq!(normalizer.profile(&snake).unwrap(), normalizer.profile(&camel).unwrap());
}

#[test]
fn test_profile_defaults_are_filled() {
    let profile = Normalizer::default()
        .profile(&profile_from(json!({ "userId": "u1" })))
        .unwrap();

    assert_eq!(profile.budget, BudgetRange::new(0.0, 10_000.0));
    assert_eq!(profile.cleanliness, Cleanliness::MEDIAN);
    assert!(!profile.lifestyle.smoking);
    assert!(profile.locations.is_empty());
    assert!(profile.demographics.age.is_none());
}

#[test]
fn test_profile_missing_identity_is_rejected() {
    let err = Normalizer::default()
        .profile(&profile_from(json!({ "budgetMin": 800 })))
        .unwrap_err();
    assert!(matches!(err, NormalizeError::MissingField(_)));
}

#[test]
fn test_profile_unreadable_enum_is_rejected() {
    let err = Normalizer::default()
        .profile(&profile_from(json!({ "userId": "u1", "workSchedule": "sometimes" })))
        .unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidValue { .. }));
}

#[test]
fn test_profile_out_of_range_age_is_rejected() {
    let err = Normalizer::default()
        .profile(&profile_from(json!({ "userId": "u1", "age": 9 })))
        .unwrap_err();
    assert!(matches!(err, NormalizeError::Invalid(_)));
}

#[test]
fn test_preferences_sentinels_and_dealbreakers() {
    let prefs = Normalizer::default()
        .preferences(&preferences_from(json!({
            "gender": { "value": "No Preference", "importance": "dealBreaker" },
            "smoking": { "value": "noSmoking", "importance": "dealBreaker" },
            "diet": { "value": ["Vegan", "vegetarian"], "importance": "important" },
            "favouriteColour": { "value": "blue", "importance": "important" },
            "religion": { "value": "any" },
        })))
        .unwrap();

    assert_eq!(prefs.get(Dimension::Gender).unwrap().value, PreferenceValue::NoPreference);
    assert_eq!(prefs.get(Dimension::Smoking).unwrap().value, PreferenceValue::Excluded);
    assert_eq!(prefs.importance(Dimension::Diet), Some(Importance::Important));
    assert!(prefs.get(Dimension::Religion).is_none());
    assert_eq!(prefs.entries.len(), 3);

    let dealbreakers: Vec<Dimension> = prefs.dealbreakers().map(|(d, _)| d).collect();
    assert_eq!(dealbreakers, vec![Dimension::Smoking, Dimension::Gender]);
}

#[test]
fn test_preferences_bad_importance_is_fatal() {
    let err = Normalizer::default()
        .preferences(&preferences_from(json!({
            "budget": { "value": [800, 1200], "importance": "urgent" },
        })))
        .unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidValue { field: "importance", .. }));
}

#[test]
fn test_preferences_range_forms() {
    let prefs = Normalizer::default()
        .preferences(&preferences_from(json!({
            "budget": { "value": 1200, "importance": "important" },
            "ageRange": { "value": "35-25", "importance": "dealBreaker" },
            "cleanliness": { "value": "tidy", "importance": "notImportant" },
        })))
        .unwrap();

    assert_eq!(
        prefs.get(Dimension::Budget).unwrap().value,
        PreferenceValue::Range { min: 0.0, max: 1200.0 }
    );
    assert_eq!(
        prefs.get(Dimension::AgeRange).unwrap().value,
        PreferenceValue::Range { min: 25.0, max: 35.0 }
    );
    assert_eq!(
        prefs.get(Dimension::Cleanliness).unwrap().value,
        PreferenceValue::Range { min: 4.0, max: 5.0 }
    );
}

#[test]
fn test_listing_requires_id_and_price() {
    let normalizer = Normalizer::default();

    let no_id = RawListing {
        price: Some(1000.0),
        ..Default::default()
    };
    assert!(matches!(normalizer.listing(&no_id), Err(NormalizeError::MissingField(_))));

    let no_price = RawListing {
        id: Some("0d6f0b8e-3c1a-4e5b-9f2d-7a8b9c0d1e01".to_string()),
        ..Default::default()
    };
    assert!(matches!(normalizer.listing(&no_price), Err(NormalizeError::MissingField("price"))));

    let bad_id = RawListing {
        id: Some("listing-7".to_string()),
        price: Some(1000.0),
        ..Default::default()
    };
    assert!(matches!(normalizer.listing(&bad_id), Err(NormalizeError::InvalidValue { .. })));
}

#[test]
fn test_budget_score_is_symmetric() {
    let a = BudgetRange::new(900.0, 1300.0);
    let b = BudgetRange::new(1100.0, 1800.0);
    assert_eq!(budget_score(&a, &b), budget_score(&b, &a));
}

#[test]
fn test_interests_and_cleanliness_scores() {
    let tags = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
    assert_eq!(interests_score(&tags(&["a"]), &tags(&["b"])), 0.0);
    assert_eq!(interests_score(&tags(&["a", "b"]), &tags(&["b", "a"])), 20.0);

    let tier = |t| Cleanliness::new(t).unwrap();
    assert_eq!(cleanliness_score(tier(2), tier(5)), 5.0);
}

#[test]
fn test_breakdown_for_identical_profiles() {
    let profile = Normalizer::default()
        .profile(&profile_from(json!({
            "userId": "u1",
            "budgetMin": 800,
            "budgetMax": 1200,
            "locations": "Downtown, Austin",
            "interests": ["jazz"],
        })))
        .unwrap();

    let breakdown =
        calculate_breakdown(&profile, &Candidate::person(&profile), &ScoringSettings::default());
    for (category, score) in breakdown.iter() {
        assert_eq!(score, 20.0, "{:?} should be perfect", category);
    }
}

#[test]
fn test_breakdown_percentages() {
    let breakdown = CompatibilityBreakdown {
        budget: 20.0,
        location: 10.0,
        lifestyle: 12.5,
        ..Default::default()
    };
    let pct = breakdown.percentages();

    assert_eq!(pct[0], (Category::Budget, 100.0));
    assert_eq!(pct[1], (Category::Location, 50.0));
    assert_eq!(pct[2], (Category::Lifestyle, 62.5));
    assert_eq!(pct[5], (Category::Cleanliness, 0.0));
}

#[test]
fn test_category_weights_from_importance() {
    let prefs = Normalizer::default()
        .preferences(&preferences_from(json!({
            "smoking": { "value": "noSmoking", "importance": "notImportant" },
            "pets": { "value": "noPets", "importance": "important" },
            "interests": { "value": ["jazz"], "importance": "notImportant" },
            "budget": { "value": [800, 1200], "importance": "dealBreaker" },
        })))
        .unwrap();

    let weights = CategoryWeights::from_preferences(&prefs, &ImportanceWeights::default());
    // Lifestyle takes the strongest of its stated dimensions
    assert_eq!(weights.lifestyle, 2.0);
    assert_eq!(weights.interests, 0.5);
    assert_eq!(weights.budget, 1.0);
    assert_eq!(weights.location, 1.0);
}

#[test]
fn test_dealbreaker_filter_from_raw_preferences() {
    let normalizer = Normalizer::default();
    let prefs = normalizer
        .preferences(&preferences_from(json!({
            "language": { "value": ["spanish", "portuguese"], "importance": "dealBreaker" },
        })))
        .unwrap();

    let speaker = normalizer
        .profile(&profile_from(json!({ "userId": "a", "languages": ["English", "Spanish"] })))
        .unwrap();
    let other = normalizer
        .profile(&profile_from(json!({ "userId": "b", "language": "German" })))
        .unwrap();

    assert!(passes_dealbreakers(&Candidate::person(&speaker), &prefs));
    assert!(!passes_dealbreakers(&Candidate::person(&other), &prefs));
}
