use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{squash, GuestFrequency, SleepSchedule, WorkSchedule};
use super::results::Category;

/// How much a user cares about one preference dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Importance {
    NotImportant,
    Important,
    DealBreaker,
}

impl Importance {
    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "notimportant" | "low" | "nicetohave" => Some(Self::NotImportant),
            "important" | "high" => Some(Self::Important),
            "dealbreaker" | "mandatory" | "required" | "must" => Some(Self::DealBreaker),
            _ => None,
        }
    }
}

/// A preference dimension. Declaration order is evaluation order for the
/// deal-breaker filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Smoking,
    Pets,
    Budget,
    Location,
    HousingType,
    AgeRange,
    Gender,
    Nationality,
    Language,
    Diet,
    Occupation,
    WorkSchedule,
    Ethnicity,
    Religion,
    Cleanliness,
    Interests,
    OvernightGuests,
    SleepSchedule,
}

impl Dimension {
    pub const ALL: [Dimension; 18] = [
        Self::Smoking,
        Self::Pets,
        Self::Budget,
        Self::Location,
        Self::HousingType,
        Self::AgeRange,
        Self::Gender,
        Self::Nationality,
        Self::Language,
        Self::Diet,
        Self::Occupation,
        Self::WorkSchedule,
        Self::Ethnicity,
        Self::Religion,
        Self::Cleanliness,
        Self::Interests,
        Self::OvernightGuests,
        Self::SleepSchedule,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "smoking" | "smoke" => Some(Self::Smoking),
            "pets" | "pet" => Some(Self::Pets),
            "budget" | "rent" => Some(Self::Budget),
            "location" | "area" | "neighborhood" | "neighbourhood" => Some(Self::Location),
            "housingtype" | "housing" | "propertytype" => Some(Self::HousingType),
            "agerange" | "age" => Some(Self::AgeRange),
            "gender" => Some(Self::Gender),
            "nationality" => Some(Self::Nationality),
            "language" | "languages" => Some(Self::Language),
            "diet" | "dietary" => Some(Self::Diet),
            "occupation" | "profession" => Some(Self::Occupation),
            "workschedule" | "schedule" => Some(Self::WorkSchedule),
            "ethnicity" => Some(Self::Ethnicity),
            "religion" => Some(Self::Religion),
            "cleanliness" | "tidiness" => Some(Self::Cleanliness),
            "interests" | "hobbies" => Some(Self::Interests),
            "overnightguests" | "guests" => Some(Self::OvernightGuests),
            "sleepschedule" | "sleep" => Some(Self::SleepSchedule),
            _ => None,
        }
    }

    /// Scoring category whose weight this dimension influences, if any
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Budget => Some(Category::Budget),
            Self::Location | Self::HousingType => Some(Category::Location),
            Self::Smoking | Self::Pets | Self::OvernightGuests | Self::SleepSchedule => {
                Some(Category::Lifestyle)
            }
            Self::WorkSchedule => Some(Category::Schedule),
            Self::Interests => Some(Category::Interests),
            Self::Cleanliness => Some(Category::Cleanliness),
            Self::AgeRange
            | Self::Gender
            | Self::Nationality
            | Self::Language
            | Self::Diet
            | Self::Occupation
            | Self::Ethnicity
            | Self::Religion => None,
        }
    }
}

/// The constraint a user places on one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PreferenceValue {
    /// "No constraint" sentinel; always satisfied
    NoPreference,
    Range { min: f64, max: f64 },
    AnyOf(BTreeSet<String>),
    Schedules(BTreeSet<WorkSchedule>),
    Guests(BTreeSet<GuestFrequency>),
    Sleep(BTreeSet<SleepSchedule>),
    /// The candidate must not exhibit the attribute (no smoking, no pets)
    Excluded,
    /// Raw value the normalizer could not interpret
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub value: PreferenceValue,
    pub importance: Importance,
}

/// Desired-roommate criteria of the acting user, one entry per dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSet {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub entries: BTreeMap<Dimension, PreferenceEntry>,
}

impl PreferenceSet {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and fixtures
    pub fn with(
        mut self,
        dimension: Dimension,
        value: PreferenceValue,
        importance: Importance,
    ) -> Self {
        self.entries
            .insert(dimension, PreferenceEntry { value, importance });
        self
    }

    pub fn get(&self, dimension: Dimension) -> Option<&PreferenceEntry> {
        self.entries.get(&dimension)
    }

    pub fn importance(&self, dimension: Dimension) -> Option<Importance> {
        self.entries.get(&dimension).map(|entry| entry.importance)
    }

    /// Deal-breaker entries in evaluation order
    pub fn dealbreakers(&self) -> impl Iterator<Item = (Dimension, &PreferenceValue)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.importance == Importance::DealBreaker)
            .map(|(dimension, entry)| (*dimension, &entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dealbreakers_iterate_in_dimension_order() {
        let prefs = PreferenceSet::new("u1")
            .with(Dimension::Religion, PreferenceValue::NoPreference, Importance::DealBreaker)
            .with(Dimension::Budget, PreferenceValue::NoPreference, Importance::Important)
            .with(Dimension::Smoking, PreferenceValue::Excluded, Importance::DealBreaker);

        let order: Vec<Dimension> = prefs.dealbreakers().map(|(d, _)| d).collect();
        assert_eq!(order, vec![Dimension::Smoking, Dimension::Religion]);
    }

    #[test]
    fn test_dimension_parse_aliases() {
        assert_eq!(Dimension::parse("work_schedule"), Some(Dimension::WorkSchedule));
        assert_eq!(Dimension::parse("Age Range"), Some(Dimension::AgeRange));
        assert_eq!(Dimension::parse("favourite colour"), None);
    }

    #[test]
    fn test_every_scored_category_has_a_dimension() {
        for category in Category::ALL {
            assert!(Dimension::ALL.iter().any(|d| d.category() == Some(category)));
        }
    }

    #[test]
    fn test_importance_parse() {
        assert_eq!(Importance::parse("dealBreaker"), Some(Importance::DealBreaker));
        assert_eq!(Importance::parse("not_important"), Some(Importance::NotImportant));
        assert_eq!(Importance::parse("whatever"), None);
    }
}
