use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::{MatchingSettings, ScoringSettings, Settings};
use crate::core::{
    filters::first_violation,
    normalizer::{NormalizeError, Normalizer},
    ranking::{aggregate, rank},
    scoring::calculate_breakdown,
    weighting::CategoryWeights,
};
use crate::models::{
    BudgetRange, Candidate, CompatibilityBreakdown, DataQualityWarning, Demographics, Dimension,
    GuestFrequency, Lifestyle, Listing, MatchCandidate, MatchResult, MatchSet, PreferenceSet,
    Profile, RawListing, RawPreferences, RawProfile, SleepSchedule, WorkSchedule,
};

/// Dimensions a listing can never speak to
const DEMOGRAPHIC_DIMENSIONS: [Dimension; 8] = [
    Dimension::AgeRange,
    Dimension::Gender,
    Dimension::Nationality,
    Dimension::Language,
    Dimension::Diet,
    Dimension::Occupation,
    Dimension::Ethnicity,
    Dimension::Religion,
];

/// Failures that abort a whole matcher invocation
///
/// Problems with individual candidates never surface here; those records are
/// skipped and reported as [`DataQualityWarning`]s on the [`MatchSet`].
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("acting user profile is invalid: {0}")]
    InvalidProfile(#[source] NormalizeError),

    #[error("acting user preferences are invalid: {0}")]
    InvalidPreferences(#[source] NormalizeError),

    #[error("preferences belong to {preferences} but the acting profile is {profile}")]
    MismatchedUser { profile: String, preferences: String },
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Normalization of the acting user and every candidate
/// 2. Supersession and self-exclusion
/// 3. Deal-breaker filtering
/// 4. Category scoring and weighted aggregation
/// 5. Deterministic ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    normalizer: Normalizer,
    scoring: ScoringSettings,
    matching: MatchingSettings,
}

impl Matcher {
    pub fn new(settings: &Settings) -> Self {
        Self {
            normalizer: Normalizer::new(settings.normalization),
            scoring: settings.scoring,
            matching: settings.matching.clone(),
        }
    }

    pub fn with_default_settings() -> Self {
        Self::new(&Settings::default())
    }

    /// Rank roommate candidates for the acting user
    ///
    /// # Arguments
    /// * `profile` - The acting user's raw profile
    /// * `preferences` - The acting user's raw preference rows
    /// * `candidates` - Raw roommate profiles to consider
    ///
    /// # Returns
    /// MatchSet with candidates that passed every deal-breaker, best first
    pub fn find_roommate_matches(
        &self,
        profile: &RawProfile,
        preferences: &RawPreferences,
        candidates: &[RawProfile],
    ) -> Result<MatchSet<Profile>, MatchError> {
        let (profile, preferences) = self.prepare(profile, preferences)?;
        let mut warnings = Vec::new();

        let pool: Vec<Profile> = candidates
            .iter()
            .filter_map(|raw| {
                self.normalizer
                    .profile(raw)
                    .map_err(|err| warnings.push(skipped(raw.user_id.clone(), &err)))
                    .ok()
            })
            .collect();

        let pool: Vec<Profile> = latest_records(pool, |p| p.user_id.clone(), |p| p.updated_at)
            .into_iter()
            .filter(|candidate| {
                let is_self = candidate.user_id == profile.user_id;
                if is_self {
                    tracing::debug!("Excluding acting user {} from own results", profile.user_id);
                }
                !is_self
            })
            .collect();

        let set = self.score_pool(
            &profile,
            &preferences,
            candidates.len(),
            pool,
            warnings,
            |candidate: &Profile| Candidate::person(candidate),
        );

        tracing::info!(
            "Returning {} roommate matches for user {} (from {} candidates, {} filtered)",
            set.matches.len(),
            profile.user_id,
            set.total_candidates,
            set.filtered_out
        );

        Ok(set)
    }

    /// Rank property listings for the acting user
    ///
    /// Each listing is compared through its pseudo-profile, see
    /// [`Matcher::pseudo_profile`].
    pub fn find_property_share_matches(
        &self,
        profile: &RawProfile,
        preferences: &RawPreferences,
        listings: &[RawListing],
    ) -> Result<MatchSet<Listing>, MatchError> {
        let (profile, preferences) = self.prepare(profile, preferences)?;
        let mut warnings = Vec::new();

        let pool: Vec<Listing> = listings
            .iter()
            .filter_map(|raw| {
                self.normalizer
                    .listing(raw)
                    .map_err(|err| warnings.push(skipped(raw.id.clone(), &err)))
                    .ok()
            })
            .collect();

        let pool = latest_records(pool, |l| l.candidate_id(), |l| l.updated_at);

        let set = self.score_pool(
            &profile,
            &preferences,
            listings.len(),
            pool,
            warnings,
            |listing: &Listing| self.pseudo_profile(listing),
        );

        tracing::info!(
            "Returning {} property matches for user {} (from {} listings, {} filtered)",
            set.matches.len(),
            profile.user_id,
            set.total_candidates,
            set.filtered_out
        );

        Ok(set)
    }

    /// Derive the comparable pseudo-profile of a listing
    ///
    /// The budget is a band of `listing_budget_tolerance` around the
    /// per-occupant share. House rules stand in for lifestyle. Anything the
    /// listing leaves unset, and every demographic, is marked undeclared.
    pub fn pseudo_profile(&self, listing: &Listing) -> Candidate<'static> {
        let mut undeclared: BTreeSet<Dimension> = DEMOGRAPHIC_DIMENSIONS.into_iter().collect();
        let rules = &listing.house_rules;

        let lifestyle = Lifestyle {
            smoking: declared(rules.smoking_allowed, Dimension::Smoking, false, &mut undeclared),
            has_pets: declared(rules.pets_allowed, Dimension::Pets, false, &mut undeclared),
            overnight_guests: declared(
                rules.overnight_guests,
                Dimension::OvernightGuests,
                GuestFrequency::Occasionally,
                &mut undeclared,
            ),
            sleep_schedule: declared(
                rules.quiet_hours,
                Dimension::SleepSchedule,
                SleepSchedule::Regular,
                &mut undeclared,
            ),
        };

        let work_schedule = declared(
            listing.work_schedule,
            Dimension::WorkSchedule,
            WorkSchedule::DayShift,
            &mut undeclared,
        );
        let cleanliness = declared(
            listing.cleanliness,
            Dimension::Cleanliness,
            Default::default(),
            &mut undeclared,
        );

        if listing.housing_type.is_none() {
            undeclared.insert(Dimension::HousingType);
        }
        if listing.amenities.is_empty() {
            undeclared.insert(Dimension::Interests);
        }

        let locations = if listing.location.name.is_empty() {
            undeclared.insert(Dimension::Location);
            Vec::new()
        } else {
            vec![listing.location.clone()]
        };

        let profile = Profile {
            user_id: listing.candidate_id(),
            budget: BudgetRange::around(
                listing.per_occupant_share(),
                self.scoring.listing_budget_tolerance,
            ),
            locations,
            lifestyle,
            work_schedule,
            cleanliness,
            interests: listing.amenities.clone(),
            traits: BTreeSet::new(),
            demographics: Demographics::default(),
            housing_type: listing.housing_type.clone(),
            updated_at: listing.updated_at,
        };

        Candidate::owned(profile, undeclared)
    }

    /// Filter and score a single canonical candidate
    ///
    /// Returns `None` when the candidate violates a deal-breaker.
    pub fn evaluate(
        &self,
        profile: &Profile,
        preferences: &PreferenceSet,
        candidate: &Candidate,
    ) -> Option<(f64, CompatibilityBreakdown)> {
        let weights = CategoryWeights::from_preferences(preferences, &self.scoring.importance);
        self.evaluate_with(profile, preferences, &weights, candidate)
    }

    fn evaluate_with(
        &self,
        profile: &Profile,
        preferences: &PreferenceSet,
        weights: &CategoryWeights,
        candidate: &Candidate,
    ) -> Option<(f64, CompatibilityBreakdown)> {
        if let Some(dimension) = first_violation(candidate, preferences) {
            tracing::debug!(
                "Candidate {} excluded by {:?} deal-breaker",
                candidate.profile.user_id,
                dimension
            );
            return None;
        }

        let breakdown = calculate_breakdown(profile, candidate, &self.scoring);
        Some((aggregate(&breakdown, weights), breakdown))
    }

    fn prepare(
        &self,
        profile: &RawProfile,
        preferences: &RawPreferences,
    ) -> Result<(Profile, PreferenceSet), MatchError> {
        let profile = self
            .normalizer
            .profile(profile)
            .map_err(MatchError::InvalidProfile)?;
        let preferences = self
            .normalizer
            .preferences(preferences)
            .map_err(MatchError::InvalidPreferences)?;

        if preferences.user_id != profile.user_id {
            return Err(MatchError::MismatchedUser {
                profile: profile.user_id,
                preferences: preferences.user_id,
            });
        }

        Ok((profile, preferences))
    }

    fn score_pool<T, F>(
        &self,
        profile: &Profile,
        preferences: &PreferenceSet,
        total_candidates: usize,
        pool: Vec<T>,
        warnings: Vec<DataQualityWarning>,
        candidate_of: F,
    ) -> MatchSet<T>
    where
        T: MatchCandidate,
        F: Fn(&T) -> Candidate<'_>,
    {
        let weights = CategoryWeights::from_preferences(preferences, &self.scoring.importance);
        let min_score = self.matching.min_score;

        let mut filtered_out = 0;
        let mut matches = Vec::with_capacity(pool.len());

        for item in pool {
            let evaluated = {
                let candidate = candidate_of(&item);
                self.evaluate_with(profile, preferences, &weights, &candidate)
            };

            match evaluated {
                None => filtered_out += 1,
                Some((overall_score, _)) if overall_score < min_score => {
                    tracing::debug!(
                        "Candidate {} scored {} below floor {}",
                        item.candidate_id(),
                        overall_score,
                        min_score
                    );
                }
                Some((overall_score, breakdown)) => matches.push(MatchResult {
                    candidate: item,
                    overall_score,
                    breakdown,
                }),
            }
        }

        rank(&mut matches);
        if let Some(limit) = self.matching.max_results {
            matches.truncate(limit);
        }

        MatchSet {
            matches,
            total_candidates,
            filtered_out,
            warnings,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_settings()
    }
}

fn declared<T>(
    value: Option<T>,
    dimension: Dimension,
    fallback: T,
    undeclared: &mut BTreeSet<Dimension>,
) -> T {
    value.unwrap_or_else(|| {
        undeclared.insert(dimension);
        fallback
    })
}

fn skipped(candidate_id: Option<String>, err: &NormalizeError) -> DataQualityWarning {
    tracing::warn!(
        "Skipping candidate {}: {}",
        candidate_id.as_deref().unwrap_or("<unidentified>"),
        err
    );
    DataQualityWarning {
        candidate_id,
        reason: err.to_string(),
    }
}

/// Keep one record per id, the one with the latest `updated_at`
///
/// Records without a timestamp lose to any timestamped one; exact ties keep
/// the record seen first. First-seen order is preserved.
fn latest_records<T>(
    records: Vec<T>,
    key: impl Fn(&T) -> String,
    stamp: impl Fn(&T) -> Option<DateTime<Utc>>,
) -> Vec<T> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut latest: Vec<T> = Vec::with_capacity(records.len());

    for record in records {
        let id = key(&record);
        match index.get(&id).copied() {
            Some(slot) => {
                if stamp(&record) > stamp(&latest[slot]) {
                    tracing::debug!("Record {} superseded by a newer version", id);
                    latest[slot] = record;
                }
            }
            None => {
                index.insert(id, latest.len());
                latest.push(record);
            }
        }
    }

    latest
}
