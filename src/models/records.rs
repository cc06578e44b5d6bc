use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::domain::Profile;

/// A value that some sources send as a scalar and others as a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => std::slice::from_ref(value),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// Yes/no answers arrive as booleans or as form strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    Bool(bool),
    Text(String),
}

/// Cleanliness arrives as an ordinal or as a named tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTier {
    Number(i64),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLocation {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        latitude: Option<f64>,
        #[serde(default)]
        longitude: Option<f64>,
    },
}

/// Profile row as stored by the onboarding forms
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RawProfile {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "budget_min", rename = "budgetMin", default)]
    pub budget_min: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "budget_max", rename = "budgetMax", default)]
    pub budget_max: Option<f64>,
    #[serde(alias = "preferredLocations", alias = "location", default)]
    pub locations: Option<OneOrMany<RawLocation>>,
    #[serde(default)]
    pub smoking: Option<RawFlag>,
    #[serde(alias = "has_pets", alias = "pets", rename = "hasPets", default)]
    pub has_pets: Option<RawFlag>,
    #[serde(alias = "overnight_guests", rename = "overnightGuests", default)]
    pub overnight_guests: Option<String>,
    #[serde(alias = "sleep_schedule", rename = "sleepSchedule", default)]
    pub sleep_schedule: Option<String>,
    #[serde(alias = "work_schedule", rename = "workSchedule", default)]
    pub work_schedule: Option<String>,
    #[serde(default)]
    pub cleanliness: Option<RawTier>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[validate(range(min = 16, max = 120))]
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(alias = "language", default)]
    pub languages: Option<OneOrMany<String>>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(alias = "housing_type", rename = "housingType", default)]
    pub housing_type: Option<String>,
    #[serde(alias = "updated_at", rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPreferenceEntry {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub importance: Option<String>,
}

/// Preference rows keyed by dimension name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPreferences {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(alias = "entries", default)]
    pub preferences: BTreeMap<String, RawPreferenceEntry>,
}

/// Property listing row
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RawListing {
    #[serde(alias = "listingId", alias = "listing_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "totalPrice", alias = "rent", default)]
    pub price: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(alias = "intendedOccupancy", alias = "intended_occupancy", default)]
    pub occupancy: Option<u8>,
    #[serde(alias = "housing_type", rename = "housingType", default)]
    pub housing_type: Option<String>,
    #[serde(alias = "smoking_allowed", rename = "smokingAllowed", default)]
    pub smoking_allowed: Option<RawFlag>,
    #[serde(alias = "pets_allowed", rename = "petsAllowed", default)]
    pub pets_allowed: Option<RawFlag>,
    #[serde(alias = "overnight_guests", rename = "overnightGuests", default)]
    pub overnight_guests: Option<String>,
    #[serde(alias = "quiet_hours", rename = "quietHours", default)]
    pub quiet_hours: Option<String>,
    #[serde(default)]
    pub cleanliness: Option<RawTier>,
    #[serde(alias = "tags", default)]
    pub amenities: Vec<String>,
    #[serde(alias = "work_schedule", rename = "workSchedule", default)]
    pub work_schedule: Option<String>,
    #[serde(alias = "updated_at", rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Known record shapes arriving from the heterogeneous profile tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProfileRecord {
    Roommate(RawProfile),
    Listing(RawListing),
}

impl From<&Profile> for RawProfile {
    fn from(profile: &Profile) -> Self {
        let demographics = &profile.demographics;
        let locations = profile
            .locations
            .iter()
            .map(|location| RawLocation::Detailed {
                name: location.name.clone(),
                region: location.region.clone(),
                latitude: location.coordinates.map(|c| c.latitude),
                longitude: location.coordinates.map(|c| c.longitude),
            })
            .collect();

        Self {
            user_id: Some(profile.user_id.clone()),
            budget_min: Some(profile.budget.min),
            budget_max: Some(profile.budget.max),
            locations: Some(OneOrMany::Many(locations)),
            smoking: Some(RawFlag::Bool(profile.lifestyle.smoking)),
            has_pets: Some(RawFlag::Bool(profile.lifestyle.has_pets)),
            overnight_guests: Some(profile.lifestyle.overnight_guests.as_str().to_string()),
            sleep_schedule: Some(profile.lifestyle.sleep_schedule.as_str().to_string()),
            work_schedule: Some(profile.work_schedule.as_str().to_string()),
            cleanliness: Some(RawTier::Number(i64::from(profile.cleanliness.tier()))),
            interests: profile.interests.iter().cloned().collect(),
            traits: profile.traits.iter().cloned().collect(),
            age: demographics.age,
            gender: demographics.gender.clone(),
            nationality: demographics.nationality.clone(),
            languages: Some(OneOrMany::Many(demographics.languages.iter().cloned().collect())),
            diet: demographics.diet.clone(),
            occupation: demographics.occupation.clone(),
            ethnicity: demographics.ethnicity.clone(),
            religion: demographics.religion.clone(),
            housing_type: profile.housing_type.clone(),
            updated_at: profile.updated_at,
        }
    }
}
