use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::config::NormalizationSettings;
use crate::models::domain::squash;
use crate::models::{
    BudgetRange, Cleanliness, Demographics, Dimension, GeoPoint, GuestFrequency, HouseRules,
    Importance, Lifestyle, Listing, Location, PreferenceEntry, PreferenceSet, PreferenceValue,
    Profile, RawFlag, RawListing, RawLocation, RawPreferences, RawProfile, RawTier,
    SleepSchedule, WorkSchedule,
};

/// Errors raised while turning raw records into canonical ones
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("validation failed: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl NormalizeError {
    fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}

/// Values that mean "no constraint" wherever a preference value is expected
const NO_PREFERENCE_SENTINELS: &[&str] = &[
    "",
    "nopreference",
    "nopref",
    "any",
    "anything",
    "doesntmatter",
    "dontcare",
    "either",
    "noconstraint",
    "open",
];

/// Resolves absent fields once, at the boundary
///
/// Downstream stages never check for missing data: every scored field of a
/// [`Profile`] carries a concrete value once it leaves here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    defaults: NormalizationSettings,
}

impl Normalizer {
    pub fn new(defaults: NormalizationSettings) -> Self {
        Self { defaults }
    }

    /// Canonicalize a profile row. Only a missing user id is fatal; absent
    /// fields are defaulted, present-but-unreadable ones are rejected.
    pub fn profile(&self, raw: &RawProfile) -> Result<Profile, NormalizeError> {
        let user_id = required_id(raw.user_id.as_deref(), "userId")?;
        raw.validate()?;

        let budget = self.budget(raw.budget_min, raw.budget_max)?;

        let mut locations: Vec<Location> = Vec::new();
        for raw_location in raw.locations.iter().flat_map(|l| l.as_slice()) {
            if let Some(location) = normalize_location(raw_location)? {
                if !locations.iter().any(|l| l.name == location.name) {
                    locations.push(location);
                }
            }
        }

        let lifestyle = Lifestyle {
            smoking: optional_flag("smoking", raw.smoking.as_ref())?.unwrap_or(false),
            has_pets: optional_flag("hasPets", raw.has_pets.as_ref())?.unwrap_or(false),
            overnight_guests: parse_optional(
                "overnightGuests",
                raw.overnight_guests.as_deref(),
                GuestFrequency::parse,
            )?
            .unwrap_or(GuestFrequency::Occasionally),
            sleep_schedule: parse_optional(
                "sleepSchedule",
                raw.sleep_schedule.as_deref(),
                SleepSchedule::parse,
            )?
            .unwrap_or(SleepSchedule::Regular),
        };

        let work_schedule =
            parse_optional("workSchedule", raw.work_schedule.as_deref(), WorkSchedule::parse)?
                .unwrap_or(WorkSchedule::DayShift);

        let cleanliness = match raw.cleanliness.as_ref() {
            Some(tier) => parse_tier(tier)?,
            None => self.default_cleanliness(),
        };

        let demographics = Demographics {
            age: raw.age,
            gender: normalize_optional(raw.gender.as_deref()),
            nationality: normalize_optional(raw.nationality.as_deref()),
            languages: normalize_tags(raw.languages.iter().flat_map(|l| l.as_slice())),
            diet: normalize_optional(raw.diet.as_deref()),
            occupation: normalize_optional(raw.occupation.as_deref()),
            ethnicity: normalize_optional(raw.ethnicity.as_deref()),
            religion: normalize_optional(raw.religion.as_deref()),
        };

        Ok(Profile {
            user_id,
            budget,
            locations,
            lifestyle,
            work_schedule,
            cleanliness,
            interests: normalize_tags(&raw.interests),
            traits: normalize_tags(&raw.traits),
            demographics,
            housing_type: normalize_optional(raw.housing_type.as_deref()),
            updated_at: raw.updated_at,
        })
    }

    /// Canonicalize a preference set
    ///
    /// Unknown dimensions and entries without a stated importance are dropped;
    /// values that cannot be read are kept as [`PreferenceValue::Unrecognized`]
    /// so the filter can treat them conservatively.
    pub fn preferences(&self, raw: &RawPreferences) -> Result<PreferenceSet, NormalizeError> {
        let user_id = required_id(raw.user_id.as_deref(), "userId")?;
        let mut preferences = PreferenceSet::new(user_id);

        for (key, entry) in &raw.preferences {
            let Some(dimension) = Dimension::parse(key) else {
                tracing::debug!("Dropping unknown preference dimension: {}", key);
                continue;
            };

            let importance = match entry.importance.as_deref() {
                Some(raw_importance) => Importance::parse(raw_importance)
                    .ok_or_else(|| NormalizeError::invalid("importance", raw_importance))?,
                None => {
                    tracing::debug!("Dropping preference {:?} without importance", dimension);
                    continue;
                }
            };

            let value = preference_value(dimension, &entry.value);
            if let PreferenceValue::Unrecognized(raw_value) = &value {
                tracing::warn!(
                    "Unrecognized {:?} preference value {:?} for user {}",
                    dimension,
                    raw_value,
                    preferences.user_id
                );
            }

            preferences
                .entries
                .insert(dimension, PreferenceEntry { value, importance });
        }

        Ok(preferences)
    }

    /// Canonicalize a listing row. Identity and price are required.
    pub fn listing(&self, raw: &RawListing) -> Result<Listing, NormalizeError> {
        let id = required_id(raw.id.as_deref(), "id")?;
        let listing_id = Uuid::parse_str(&id).map_err(|_| NormalizeError::invalid("id", &id))?;
        raw.validate()?;

        let total_price = raw.price.ok_or(NormalizeError::MissingField("price"))?;
        if !total_price.is_finite() {
            return Err(NormalizeError::invalid("price", total_price));
        }

        let name = raw.address.as_deref().map(normalize_text).unwrap_or_default();
        let region = normalize_optional(raw.region.as_deref()).or_else(|| derive_region(&name));
        let location = Location {
            name,
            region,
            coordinates: coordinates(raw.latitude, raw.longitude)?,
        };

        let house_rules = HouseRules {
            smoking_allowed: optional_flag("smokingAllowed", raw.smoking_allowed.as_ref())?,
            pets_allowed: optional_flag("petsAllowed", raw.pets_allowed.as_ref())?,
            overnight_guests: parse_optional(
                "overnightGuests",
                raw.overnight_guests.as_deref(),
                GuestFrequency::parse,
            )?,
            quiet_hours: parse_optional(
                "quietHours",
                raw.quiet_hours.as_deref(),
                SleepSchedule::parse,
            )?,
        };

        Ok(Listing {
            listing_id,
            title: raw.title.as_deref().map(str::trim).unwrap_or_default().to_string(),
            location,
            total_price,
            occupancy: raw.occupancy.unwrap_or(1).max(1),
            housing_type: normalize_optional(raw.housing_type.as_deref()),
            house_rules,
            cleanliness: raw.cleanliness.as_ref().map(parse_tier).transpose()?,
            amenities: normalize_tags(&raw.amenities),
            work_schedule: parse_optional(
                "workSchedule",
                raw.work_schedule.as_deref(),
                WorkSchedule::parse,
            )?,
            updated_at: raw.updated_at,
        })
    }

    fn budget(&self, min: Option<f64>, max: Option<f64>) -> Result<BudgetRange, NormalizeError> {
        for value in [min, max].into_iter().flatten() {
            if !value.is_finite() {
                return Err(NormalizeError::invalid("budget", value));
            }
        }

        let defaults = &self.defaults;
        Ok(match (min, max) {
            (Some(min), Some(max)) => BudgetRange::new(min, max),
            (Some(min), None) => BudgetRange::new(min, defaults.default_budget_max.max(min)),
            (None, Some(max)) => BudgetRange::new(defaults.default_budget_min.min(max), max),
            (None, None) => {
                BudgetRange::new(defaults.default_budget_min, defaults.default_budget_max)
            }
        })
    }

    fn default_cleanliness(&self) -> Cleanliness {
        Cleanliness::new(self.defaults.default_cleanliness).unwrap_or_default()
    }
}

/// Trim, drop zero-width characters, collapse whitespace and lowercase
pub fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    value.map(normalize_text).filter(|v| !v.is_empty())
}

fn normalize_tags<'a, I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    values
        .into_iter()
        .map(|v| normalize_text(v.as_ref()))
        .filter(|v| !v.is_empty())
        .collect()
}

fn required_id(value: Option<&str>, field: &'static str) -> Result<String, NormalizeError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(NormalizeError::MissingField(field))
}

/// Broader region of a place: the last comma-separated component, or the
/// whole name when it is a single place ("austin" is its own region)
fn derive_region(name: &str) -> Option<String> {
    let region = name.rsplit(',').next().unwrap_or(name).trim();
    (!region.is_empty()).then(|| region.to_string())
}

fn normalize_location(raw: &RawLocation) -> Result<Option<Location>, NormalizeError> {
    let (name, region, latitude, longitude) = match raw {
        RawLocation::Name(name) => (name.as_str(), None, None, None),
        RawLocation::Detailed {
            name,
            region,
            latitude,
            longitude,
        } => (name.as_str(), region.as_deref(), *latitude, *longitude),
    };

    let name = normalize_text(name);
    if name.is_empty() {
        return Ok(None);
    }
    let region = normalize_optional(region).or_else(|| derive_region(&name));

    Ok(Some(Location {
        name,
        region,
        coordinates: coordinates(latitude, longitude)?,
    }))
}

fn coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<GeoPoint>, NormalizeError> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(NormalizeError::invalid("latitude", latitude));
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(NormalizeError::invalid("longitude", longitude));
            }
            Ok(Some(GeoPoint { latitude, longitude }))
        }
        // A lone coordinate cannot place anything
        _ => Ok(None),
    }
}

fn parse_flag(field: &'static str, raw: &RawFlag) -> Result<bool, NormalizeError> {
    match raw {
        RawFlag::Bool(value) => Ok(*value),
        RawFlag::Text(text) => match squash(text).as_str() {
            "yes" | "y" | "true" | "1" | "smoker" | "smokes" | "allowed" | "ok" => Ok(true),
            "no" | "n" | "false" | "0" | "nonsmoker" | "never" | "none" | "notallowed" => {
                Ok(false)
            }
            _ => Err(NormalizeError::invalid(field, text)),
        },
    }
}

fn optional_flag(
    field: &'static str,
    raw: Option<&RawFlag>,
) -> Result<Option<bool>, NormalizeError> {
    raw.map(|flag| parse_flag(field, flag)).transpose()
}

fn parse_optional<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, NormalizeError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| NormalizeError::invalid(field, value)),
    }
}

fn parse_tier(raw: &RawTier) -> Result<Cleanliness, NormalizeError> {
    match raw {
        RawTier::Number(n) => u8::try_from(*n)
            .ok()
            .and_then(Cleanliness::new)
            .ok_or_else(|| NormalizeError::invalid("cleanliness", n)),
        RawTier::Named(name) => Cleanliness::parse_named(name)
            .ok_or_else(|| NormalizeError::invalid("cleanliness", name)),
    }
}

fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => NO_PREFERENCE_SENTINELS.contains(&squash(s).as_str()),
        Value::Array(items) => items.is_empty() || items.iter().all(is_sentinel),
        _ => false,
    }
}

fn unrecognized(value: &Value) -> PreferenceValue {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    PreferenceValue::Unrecognized(text)
}

/// Strings carried by a scalar-or-list JSON value
fn strings(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(s) => Some(vec![s.as_str()]),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}

fn preference_value(dimension: Dimension, value: &Value) -> PreferenceValue {
    if is_sentinel(value) {
        return PreferenceValue::NoPreference;
    }

    let parsed = match dimension {
        Dimension::AgeRange | Dimension::Budget | Dimension::Cleanliness => {
            range_preference(dimension, value)
        }
        Dimension::Smoking | Dimension::Pets => exclusion_preference(value),
        Dimension::WorkSchedule => {
            enum_set(value, WorkSchedule::parse).map(PreferenceValue::Schedules)
        }
        Dimension::OvernightGuests => {
            enum_set(value, GuestFrequency::parse).map(PreferenceValue::Guests)
        }
        Dimension::SleepSchedule => {
            enum_set(value, SleepSchedule::parse).map(PreferenceValue::Sleep)
        }
        Dimension::Location
        | Dimension::HousingType
        | Dimension::Gender
        | Dimension::Nationality
        | Dimension::Language
        | Dimension::Diet
        | Dimension::Occupation
        | Dimension::Ethnicity
        | Dimension::Religion
        | Dimension::Interests => strings(value)
            .map(|items| normalize_tags(items.iter().copied()))
            .filter(|tags| !tags.is_empty())
            .map(PreferenceValue::AnyOf),
    };

    parsed.unwrap_or_else(|| unrecognized(value))
}

fn enum_set<T: Ord>(value: &Value, parse: impl Fn(&str) -> Option<T>) -> Option<BTreeSet<T>> {
    strings(value)?
        .into_iter()
        .map(|item| parse(item))
        .collect::<Option<BTreeSet<T>>>()
        .filter(|set| !set.is_empty())
}

/// "noSmoking" and "noPets" read as constraints against the attribute, not as "no preference"
fn exclusion_preference(value: &Value) -> Option<PreferenceValue> {
    match value {
        Value::Bool(false) => Some(PreferenceValue::Excluded),
        Value::Bool(true) => Some(PreferenceValue::NoPreference),
        Value::String(s) => match squash(s).as_str() {
            "nosmoking" | "nonsmoker" | "nosmokers" | "smokefree" | "nopets" | "petfree"
            | "no" | "false" | "notallowed" => Some(PreferenceValue::Excluded),
            "smokingok" | "smokingallowed" | "outdoorsonly" | "petsok" | "petfriendly"
            | "petsallowed" | "yes" | "true" | "allowed" => Some(PreferenceValue::NoPreference),
            _ => None,
        },
        _ => None,
    }
}

fn range_preference(dimension: Dimension, value: &Value) -> Option<PreferenceValue> {
    let (upper_open, single_is_max) = match dimension {
        Dimension::Cleanliness => (f64::from(Cleanliness::MAX), false),
        Dimension::Budget => (f64::MAX, true),
        _ => (f64::MAX, false),
    };

    let bound = |v: &Value| -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if dimension == Dimension::Cleanliness => {
                Cleanliness::parse_named(s).map(|c| f64::from(c.tier()))
            }
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    };

    let (min, max) = match value {
        Value::Object(map) => {
            let min = map.get("min").map(bound).unwrap_or(Some(0.0))?;
            let max = map.get("max").map(bound).unwrap_or(Some(upper_open))?;
            (min, max)
        }
        Value::Array(items) if items.len() == 2 => (bound(&items[0])?, bound(&items[1])?),
        Value::String(s) if s.contains('-') => {
            let (lo, hi) = s.split_once('-')?;
            (lo.trim().parse().ok()?, hi.trim().parse().ok()?)
        }
        single => {
            let n = bound(single)?;
            if single_is_max {
                (0.0, n)
            } else if dimension == Dimension::Cleanliness {
                (n, upper_open)
            } else {
                (n, n)
            }
        }
    };

    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    let range = BudgetRange::new(min, max);
    Some(PreferenceValue::Range {
        min: range.min,
        max: range.max,
    })
}
