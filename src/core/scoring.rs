use std::collections::BTreeSet;

use crate::config::ScoringSettings;
use crate::core::distance::within_radius;
use crate::models::{
    BudgetRange, Candidate, Category, Cleanliness, CompatibilityBreakdown, Dimension, Lifestyle,
    Location, Profile, WorkSchedule, MAX_SUB_SCORE,
};

/// Points available to each of the four lifestyle checks
const LIFESTYLE_CHECK_POINTS: f64 = MAX_SUB_SCORE / 4.0;

/// Penalty per tier of cleanliness difference; the widest gap (1 vs 5) scores zero
const CLEANLINESS_STEP: f64 = MAX_SUB_SCORE / (Cleanliness::MAX - Cleanliness::MIN) as f64;

/// Score every category for one candidate
///
/// Categories and lifestyle checks the candidate does not declare (listing
/// pseudo-profiles) receive the configured neutral contribution instead of
/// being compared.
pub fn calculate_breakdown(
    profile: &Profile,
    candidate: &Candidate,
    settings: &ScoringSettings,
) -> CompatibilityBreakdown {
    let other = &candidate.profile;
    let neutral = settings.neutral_sub_score;

    let location = if candidate.declares(Dimension::Location) {
        location_score(&profile.locations, &other.locations, settings)
    } else {
        neutral
    };

    let lifestyle = lifestyle_checks(&profile.lifestyle, &other.lifestyle)
        .masked(candidate, neutral / 4.0)
        .total();

    let schedule = if candidate.declares(Dimension::WorkSchedule) {
        schedule_score(
            profile.work_schedule,
            other.work_schedule,
            settings.schedule_adjacent_credit,
        )
    } else {
        neutral
    };

    let interests = if candidate.declares(Dimension::Interests) {
        interests_score(&profile.interests, &other.interests)
    } else {
        neutral
    };

    let cleanliness = if candidate.declares(Dimension::Cleanliness) {
        cleanliness_score(profile.cleanliness, other.cleanliness)
    } else {
        neutral
    };

    let mut breakdown = CompatibilityBreakdown {
        budget: budget_score(&profile.budget, &other.budget),
        location,
        lifestyle,
        schedule,
        interests,
        cleanliness,
    };

    for category in Category::ALL {
        breakdown.set(category, round_score(clamp_sub_score(breakdown.get(category))));
    }

    breakdown
}

/// Budget compatibility (0-20)
///
/// Overlap of the two ranges relative to the shorter one, so a range fully
/// contained in the other scores 20 and disjoint ranges score 0.
#[inline]
pub fn budget_score(a: &BudgetRange, b: &BudgetRange) -> f64 {
    let shorter = a.width().min(b.width());

    if shorter <= 0.0 {
        // A single price point either sits inside the other range or not
        let hit = if a.width() <= 0.0 {
            b.contains(a.min)
        } else {
            a.contains(b.min)
        };
        return if hit { MAX_SUB_SCORE } else { 0.0 };
    }

    clamp_sub_score(a.overlap(b) / shorter * MAX_SUB_SCORE)
}

/// Location compatibility (0-20)
///
/// Exact match on a normalized place name scores full marks. Sharing a
/// region, or sitting within `nearby_radius_km` of each other, earns the
/// configured regional credit.
pub fn location_score(a: &[Location], b: &[Location], settings: &ScoringSettings) -> f64 {
    let exact = a
        .iter()
        .any(|left| b.iter().any(|right| left.name == right.name));
    if exact {
        return MAX_SUB_SCORE;
    }

    let regional = a.iter().any(|left| {
        b.iter().any(|right| {
            let same_region = matches!(
                (&left.region, &right.region),
                (Some(l), Some(r)) if l == r
            );
            let nearby = match (&left.coordinates, &right.coordinates) {
                (Some(l), Some(r)) => within_radius(l, r, settings.nearby_radius_km),
                _ => false,
            };
            same_region || nearby
        })
    });

    if regional {
        clamp_sub_score(settings.region_credit)
    } else {
        0.0
    }
}

/// Points earned by each of the four lifestyle checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifestyleChecks {
    pub smoking: f64,
    pub pets: f64,
    pub guests: f64,
    pub sleep: f64,
}

impl LifestyleChecks {
    pub fn total(&self) -> f64 {
        self.smoking + self.pets + self.guests + self.sleep
    }

    /// Replace checks for dimensions the candidate does not declare
    fn masked(mut self, candidate: &Candidate, neutral: f64) -> Self {
        if !candidate.declares(Dimension::Smoking) {
            self.smoking = neutral;
        }
        if !candidate.declares(Dimension::Pets) {
            self.pets = neutral;
        }
        if !candidate.declares(Dimension::OvernightGuests) {
            self.guests = neutral;
        }
        if !candidate.declares(Dimension::SleepSchedule) {
            self.sleep = neutral;
        }
        self
    }
}

pub fn lifestyle_checks(a: &Lifestyle, b: &Lifestyle) -> LifestyleChecks {
    let agreement = |same: bool| if same { LIFESTYLE_CHECK_POINTS } else { 0.0 };

    LifestyleChecks {
        smoking: agreement(a.smoking == b.smoking),
        pets: agreement(a.has_pets == b.has_pets),
        guests: banded(a.overnight_guests.band().abs_diff(b.overnight_guests.band())),
        sleep: banded(a.sleep_schedule.distance(&b.sleep_schedule)),
    }
}

/// Lifestyle compatibility (0-20): four checks worth 5 points each
#[inline]
pub fn lifestyle_score(a: &Lifestyle, b: &Lifestyle) -> f64 {
    lifestyle_checks(a, b).total()
}

/// Same band earns the full check, one band apart half, further nothing
#[inline]
fn banded(distance: u8) -> f64 {
    match distance {
        0 => LIFESTYLE_CHECK_POINTS,
        1 => LIFESTYLE_CHECK_POINTS / 2.0,
        _ => 0.0,
    }
}

/// Work schedule compatibility (0-20)
///
/// Identical schedules score 20. Shifts that leave shared at-home hours earn
/// `adjacent_credit`; day shift against overnight shift (and hybrid against
/// overnight) share none and score 0.
pub fn schedule_score(a: WorkSchedule, b: WorkSchedule, adjacent_credit: f64) -> f64 {
    use WorkSchedule::*;

    if a == b {
        return MAX_SUB_SCORE;
    }

    match (a, b) {
        (DayShift, OvernightShift)
        | (OvernightShift, DayShift)
        | (Hybrid, OvernightShift)
        | (OvernightShift, Hybrid) => 0.0,
        _ => clamp_sub_score(adjacent_credit),
    }
}

/// Shared interests (0-20), Jaccard index scaled to the sub-score range
pub fn interests_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let shared = a.intersection(b).count();

    shared as f64 / union as f64 * MAX_SUB_SCORE
}

/// Cleanliness compatibility (0-20): 20 minus a fixed penalty per tier apart
#[inline]
pub fn cleanliness_score(a: Cleanliness, b: Cleanliness) -> f64 {
    let gap = f64::from(a.tier().abs_diff(b.tier()));
    clamp_sub_score(MAX_SUB_SCORE - gap * CLEANLINESS_STEP)
}

#[inline]
fn clamp_sub_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_SUB_SCORE)
}

/// Round to two decimals so that equal-looking scores compare equal
#[inline]
pub(crate) fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
