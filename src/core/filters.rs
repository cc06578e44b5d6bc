use std::collections::BTreeSet;

use crate::models::{Candidate, Dimension, PreferenceSet, PreferenceValue, Profile};

/// Check a candidate against every deal-breaker of the acting user
///
/// This is the hard filter stage of the pipeline. Deal-breakers are
/// evaluated in dimension order and evaluation stops at the first failure.
#[inline]
pub fn passes_dealbreakers(candidate: &Candidate, preferences: &PreferenceSet) -> bool {
    first_violation(candidate, preferences).is_none()
}

/// The first deal-breaker dimension the candidate violates, if any
pub fn first_violation(candidate: &Candidate, preferences: &PreferenceSet) -> Option<Dimension> {
    preferences
        .dealbreakers()
        .find(|(dimension, value)| !satisfies(candidate, *dimension, value))
        .map(|(dimension, _)| dimension)
}

/// Evaluate one constraint. Total: anything that cannot be confirmed fails.
pub fn satisfies(candidate: &Candidate, dimension: Dimension, value: &PreferenceValue) -> bool {
    if matches!(value, PreferenceValue::NoPreference) {
        return true;
    }
    if !candidate.declares(dimension) {
        return true;
    }

    let profile = &candidate.profile;
    let verdict = match (dimension, value) {
        (_, PreferenceValue::Unrecognized(raw)) => {
            tracing::warn!(
                "Unrecognized {:?} deal-breaker value {:?}, excluding candidate {}",
                dimension,
                raw,
                profile.user_id
            );
            return false;
        }

        (Dimension::Smoking, PreferenceValue::Excluded) => Some(!profile.lifestyle.smoking),
        (Dimension::Pets, PreferenceValue::Excluded) => Some(!profile.lifestyle.has_pets),

        (Dimension::Budget, PreferenceValue::Range { min, max }) => {
            Some(profile.budget.min <= *max && *min <= profile.budget.max)
        }
        (Dimension::AgeRange, PreferenceValue::Range { min, max }) => profile
            .demographics
            .age
            .map(|age| within(f64::from(age), *min, *max)),
        (Dimension::Cleanliness, PreferenceValue::Range { min, max }) => {
            Some(within(f64::from(profile.cleanliness.tier()), *min, *max))
        }

        (Dimension::Location, PreferenceValue::AnyOf(wanted)) => Some(
            profile.locations.iter().any(|location| {
                wanted.contains(&location.name)
                    || location.region.as_ref().is_some_and(|r| wanted.contains(r))
            }),
        ),
        (Dimension::HousingType, PreferenceValue::AnyOf(wanted)) => {
            one_of(profile.housing_type.as_ref(), wanted)
        }
        (Dimension::Language, PreferenceValue::AnyOf(wanted)) => {
            Some(!profile.demographics.languages.is_disjoint(wanted))
        }
        (Dimension::Interests, PreferenceValue::AnyOf(wanted)) => {
            Some(!profile.interests.is_disjoint(wanted))
        }
        (Dimension::Gender, PreferenceValue::AnyOf(wanted))
        | (Dimension::Nationality, PreferenceValue::AnyOf(wanted))
        | (Dimension::Diet, PreferenceValue::AnyOf(wanted))
        | (Dimension::Occupation, PreferenceValue::AnyOf(wanted))
        | (Dimension::Ethnicity, PreferenceValue::AnyOf(wanted))
        | (Dimension::Religion, PreferenceValue::AnyOf(wanted)) => {
            one_of(demographic(profile, dimension), wanted)
        }

        (Dimension::WorkSchedule, PreferenceValue::Schedules(wanted)) => {
            Some(wanted.contains(&profile.work_schedule))
        }
        (Dimension::OvernightGuests, PreferenceValue::Guests(wanted)) => {
            Some(wanted.contains(&profile.lifestyle.overnight_guests))
        }
        (Dimension::SleepSchedule, PreferenceValue::Sleep(wanted)) => {
            Some(wanted.contains(&profile.lifestyle.sleep_schedule))
        }

        (dimension, value) => {
            tracing::warn!(
                "Deal-breaker {:?} has a value of the wrong shape ({:?}), excluding {}",
                dimension,
                value,
                profile.user_id
            );
            return false;
        }
    };

    verdict.unwrap_or_else(|| {
        tracing::debug!(
            "Candidate {} does not state {:?}, deal-breaker cannot be confirmed",
            profile.user_id,
            dimension
        );
        false
    })
}

#[inline]
fn within(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

#[inline]
fn one_of(value: Option<&String>, wanted: &BTreeSet<String>) -> Option<bool> {
    value.map(|v| wanted.contains(v))
}

fn demographic(profile: &Profile, dimension: Dimension) -> Option<&String> {
    let demographics = &profile.demographics;
    match dimension {
        Dimension::Gender => demographics.gender.as_ref(),
        Dimension::Nationality => demographics.nationality.as_ref(),
        Dimension::Diet => demographics.diet.as_ref(),
        Dimension::Occupation => demographics.occupation.as_ref(),
        Dimension::Ethnicity => demographics.ethnicity.as_ref(),
        Dimension::Religion => demographics.religion.as_ref(),
        _ => None,
    }
}
