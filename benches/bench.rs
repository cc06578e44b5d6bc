// Criterion benchmarks for Roomie Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roomie_match::config::ScoringSettings;
use roomie_match::core::{
    distance::haversine_distance, scoring::calculate_breakdown, Matcher, Normalizer,
};
use roomie_match::models::{
    Candidate, GeoPoint, OneOrMany, RawFlag, RawListing, RawLocation, RawPreferenceEntry,
    RawPreferences, RawProfile,
};
use serde_json::json;

const PLACES: [&str; 4] = [
    "Downtown, Austin",
    "East Side, Austin",
    "Hyde Park, Austin",
    "Mission, San Francisco",
];

fn create_candidate(id: usize) -> RawProfile {
    let low = 600.0 + (id % 10) as f64 * 80.0;
    RawProfile {
        user_id: Some(format!("user-{}", id)),
        budget_min: Some(low),
        budget_max: Some(low + 500.0),
        locations: Some(OneOrMany::One(RawLocation::Name(
            PLACES[id % PLACES.len()].to_string(),
        ))),
        smoking: Some(RawFlag::Bool(id % 7 == 0)),
        has_pets: Some(RawFlag::Bool(id % 3 == 0)),
        interests: vec!["cooking".to_string(), "jazz".to_string()]
            .into_iter()
            .take(id % 3)
            .collect(),
        age: Some(20 + (id % 20) as u8),
        ..Default::default()
    }
}

fn create_listing(id: usize) -> RawListing {
    RawListing {
        id: Some(format!("00000000-0000-4000-8000-{:012}", id)),
        address: Some(PLACES[id % PLACES.len()].to_string()),
        price: Some(1500.0 + (id % 8) as f64 * 250.0),
        occupancy: Some(1 + (id % 3) as u8),
        smoking_allowed: Some(RawFlag::Bool(id % 5 == 0)),
        ..Default::default()
    }
}

fn create_profile() -> RawProfile {
    RawProfile {
        user_id: Some("current_user".to_string()),
        ..create_candidate(1)
    }
}

fn create_preferences() -> RawPreferences {
    let entry = |value: serde_json::Value, importance: &str| RawPreferenceEntry {
        value,
        importance: Some(importance.to_string()),
    };

    RawPreferences {
        user_id: Some("current_user".to_string()),
        preferences: [
            ("smoking".to_string(), entry(json!("noSmoking"), "dealBreaker")),
            ("ageRange".to_string(), entry(json!([21, 35]), "dealBreaker")),
            ("budget".to_string(), entry(json!([800, 1400]), "important")),
            ("interests".to_string(), entry(json!(["jazz"]), "notImportant")),
        ]
        .into_iter()
        .collect(),
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    let a = GeoPoint { latitude: 40.7128, longitude: -74.0060 };
    let b = GeoPoint { latitude: 40.72, longitude: -74.01 };

    c.bench_function("haversine_distance", |bench| {
        bench.iter(|| haversine_distance(black_box(&a), black_box(&b)));
    });
}

fn bench_breakdown(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let settings = ScoringSettings::default();
    let me = normalizer.profile(&create_profile()).unwrap();
    let other = normalizer.profile(&create_candidate(2)).unwrap();

    c.bench_function("calculate_breakdown", |b| {
        b.iter(|| {
            calculate_breakdown(
                black_box(&me),
                black_box(&Candidate::person(&other)),
                black_box(&settings),
            )
        });
    });
}

fn bench_roommate_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_settings();
    let profile = create_profile();
    let preferences = create_preferences();

    let mut group = c.benchmark_group("roommate_matching");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<RawProfile> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("find_roommate_matches", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    matcher.find_roommate_matches(
                        black_box(&profile),
                        black_box(&preferences),
                        black_box(&candidates),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_property_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_settings();
    let profile = create_profile();
    let preferences = create_preferences();

    let mut group = c.benchmark_group("property_matching");

    for listing_count in [10, 100, 1000].iter() {
        let listings: Vec<RawListing> = (0..*listing_count).map(create_listing).collect();

        group.bench_with_input(
            BenchmarkId::new("find_property_share_matches", listing_count),
            listing_count,
            |b, _| {
                b.iter(|| {
                    matcher.find_property_share_matches(
                        black_box(&profile),
                        black_box(&preferences),
                        black_box(&listings),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_breakdown,
    bench_roommate_matching,
    bench_property_matching
);

criterion_main!(benches);
