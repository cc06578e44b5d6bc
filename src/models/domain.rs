use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::preferences::Dimension;

/// Canonical, comparison-ready profile of a roommate seeker
///
/// Produced only by the normalizer. Every field carries a concrete value;
/// optional demographics stay `None` when the user never stated them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub budget: BudgetRange,
    pub locations: Vec<Location>,
    pub lifestyle: Lifestyle,
    #[serde(rename = "workSchedule")]
    pub work_schedule: WorkSchedule,
    pub cleanliness: Cleanliness,
    pub interests: BTreeSet<String>,
    pub traits: BTreeSet<String>,
    pub demographics: Demographics,
    #[serde(rename = "housingType")]
    pub housing_type: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Monthly budget range in currency units, `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    /// Build a range, swapping the bounds if they arrive inverted
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Symmetric band around a midpoint
    pub fn around(midpoint: f64, tolerance: f64) -> Self {
        let spread = midpoint.abs() * tolerance.max(0.0);
        Self::new(midpoint - spread, midpoint + spread)
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Length of the shared interval, zero when disjoint
    pub fn overlap(&self, other: &BudgetRange) -> f64 {
        (self.max.min(other.max) - self.min.max(other.min)).max(0.0)
    }

    pub fn intersects(&self, other: &BudgetRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A normalized place name with its broader region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifestyle {
    pub smoking: bool,
    #[serde(rename = "hasPets")]
    pub has_pets: bool,
    #[serde(rename = "overnightGuests")]
    pub overnight_guests: GuestFrequency,
    #[serde(rename = "sleepSchedule")]
    pub sleep_schedule: SleepSchedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestFrequency {
    Never,
    Occasionally,
    Often,
}

impl GuestFrequency {
    pub const ALL: [GuestFrequency; 3] = [Self::Never, Self::Occasionally, Self::Often];

    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "never" | "no" | "none" => Some(Self::Never),
            "occasionally" | "sometimes" | "rarely" => Some(Self::Occasionally),
            "often" | "frequently" | "always" => Some(Self::Often),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Occasionally => "occasionally",
            Self::Often => "often",
        }
    }

    /// Ordinal position on the never..often scale
    pub fn band(&self) -> u8 {
        match self {
            Self::Never => 0,
            Self::Occasionally => 1,
            Self::Often => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SleepSchedule {
    Early,
    Regular,
    Late,
    Irregular,
}

impl SleepSchedule {
    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "early" | "earlybird" | "earlyriser" => Some(Self::Early),
            "regular" | "normal" | "average" => Some(Self::Regular),
            "late" | "nightowl" => Some(Self::Late),
            "irregular" | "varies" | "flexible" => Some(Self::Irregular),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Regular => "regular",
            Self::Late => "late",
            Self::Irregular => "irregular",
        }
    }

    /// Band distance between two schedules; irregular sits one band from everything
    pub fn distance(&self, other: &SleepSchedule) -> u8 {
        match (self, other) {
            (a, b) if a == b => 0,
            (Self::Irregular, _) | (_, Self::Irregular) => 1,
            (a, b) => a.position().abs_diff(b.position()),
        }
    }

    fn position(&self) -> u8 {
        match self {
            Self::Early => 0,
            Self::Regular | Self::Irregular => 1,
            Self::Late => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkSchedule {
    DayShift,
    AfternoonShift,
    OvernightShift,
    Remote,
    Hybrid,
}

impl WorkSchedule {
    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "dayshift" | "day" | "daytime" | "nine2five" | "9to5" => Some(Self::DayShift),
            "afternoonshift" | "afternoon" | "eveningshift" | "evening" => {
                Some(Self::AfternoonShift)
            }
            "overnightshift" | "overnight" | "nightshift" | "night" => Some(Self::OvernightShift),
            "remote" | "wfh" | "workfromhome" => Some(Self::Remote),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayShift => "dayShift",
            Self::AfternoonShift => "afternoonShift",
            Self::OvernightShift => "overnightShift",
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Self-rated tidiness tier, 1 (messy) to 5 (spotless)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cleanliness(u8);

impl Cleanliness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const MEDIAN: Cleanliness = Cleanliness(3);

    pub fn new(tier: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&tier).then_some(Self(tier))
    }

    /// Named tiers used by the onboarding forms
    pub fn parse_named(raw: &str) -> Option<Self> {
        let tier = match squash(raw).as_str() {
            "messy" | "verymessy" => 1,
            "relaxed" | "casual" => 2,
            "average" | "moderate" | "normal" => 3,
            "tidy" | "clean" => 4,
            "spotless" | "veryclean" | "neatfreak" => 5,
            other => other.parse::<u8>().ok()?,
        };
        Self::new(tier)
    }

    pub fn tier(&self) -> u8 {
        self.0
    }
}

impl Default for Cleanliness {
    fn default() -> Self {
        Self::MEDIAN
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub languages: BTreeSet<String>,
    pub diet: Option<String>,
    pub occupation: Option<String>,
    pub ethnicity: Option<String>,
    pub religion: Option<String>,
}

/// Canonical property listing offered for sharing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "listingId")]
    pub listing_id: Uuid,
    pub title: String,
    pub location: Location,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    pub occupancy: u8,
    #[serde(rename = "housingType")]
    pub housing_type: Option<String>,
    #[serde(rename = "houseRules")]
    pub house_rules: HouseRules,
    pub cleanliness: Option<Cleanliness>,
    pub amenities: BTreeSet<String>,
    #[serde(rename = "workSchedule")]
    pub work_schedule: Option<WorkSchedule>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Listing {
    /// Price each occupant is expected to pay
    pub fn per_occupant_share(&self) -> f64 {
        self.total_price / f64::from(self.occupancy.max(1))
    }
}

/// Rules a listing declares; `None` means the listing makes no claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseRules {
    #[serde(rename = "smokingAllowed")]
    pub smoking_allowed: Option<bool>,
    #[serde(rename = "petsAllowed")]
    pub pets_allowed: Option<bool>,
    #[serde(rename = "overnightGuests")]
    pub overnight_guests: Option<GuestFrequency>,
    #[serde(rename = "quietHours")]
    pub quiet_hours: Option<SleepSchedule>,
}

/// What the engine compares against: a roommate profile, or the
/// pseudo-profile derived from a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub profile: Cow<'a, Profile>,
    /// Dimensions the candidate makes no claim about
    pub undeclared: BTreeSet<Dimension>,
}

impl<'a> Candidate<'a> {
    /// A person declares every dimension, even when a field was left blank
    pub fn person(profile: &'a Profile) -> Self {
        Self {
            profile: Cow::Borrowed(profile),
            undeclared: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn declares(&self, dimension: Dimension) -> bool {
        !self.undeclared.contains(&dimension)
    }
}

impl Candidate<'static> {
    pub fn owned(profile: Profile, undeclared: BTreeSet<Dimension>) -> Self {
        Self {
            profile: Cow::Owned(profile),
            undeclared,
        }
    }
}

/// Lowercase and strip everything but ASCII alphanumerics, so that
/// `"Day Shift"`, `"day_shift"` and `"dayShift"` compare equal
pub(crate) fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_range_swaps_inverted_bounds() {
        let range = BudgetRange::new(1500.0, 900.0);
        assert_eq!(range.min, 900.0);
        assert_eq!(range.max, 1500.0);
    }

    #[test]
    fn test_budget_overlap() {
        let a = BudgetRange::new(900.0, 1500.0);
        let b = BudgetRange::new(1000.0, 1400.0);
        let c = BudgetRange::new(1600.0, 1800.0);

        assert_eq!(a.overlap(&b), 400.0);
        assert_eq!(a.overlap(&c), 0.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_budget_around_keeps_midpoint() {
        let range = BudgetRange::around(1000.0, 0.1);
        assert_eq!(range.midpoint(), 1000.0);
        assert_eq!(range.min, 900.0);
    }

    #[test]
    fn test_enum_parsing_is_lenient_about_case_and_separators() {
        assert_eq!(WorkSchedule::parse("Day Shift"), Some(WorkSchedule::DayShift));
        assert_eq!(WorkSchedule::parse("overnight_shift"), Some(WorkSchedule::OvernightShift));
        assert_eq!(GuestFrequency::parse("OFTEN"), Some(GuestFrequency::Often));
        assert_eq!(SleepSchedule::parse("night-owl"), Some(SleepSchedule::Late));
        assert_eq!(WorkSchedule::parse("astronaut"), None);
    }

    #[test]
    fn test_cleanliness_tiers() {
        assert_eq!(Cleanliness::parse_named("Spotless").map(|c| c.tier()), Some(5));
        assert_eq!(Cleanliness::parse_named("2").map(|c| c.tier()), Some(2));
        assert!(Cleanliness::parse_named("9").is_none());
        assert_eq!(Cleanliness::default().tier(), 3);
    }

    #[test]
    fn test_sleep_distance() {
        assert_eq!(SleepSchedule::Early.distance(&SleepSchedule::Late), 2);
        assert_eq!(SleepSchedule::Early.distance(&SleepSchedule::Regular), 1);
        assert_eq!(SleepSchedule::Irregular.distance(&SleepSchedule::Late), 1);
        assert_eq!(SleepSchedule::Irregular.distance(&SleepSchedule::Irregular), 0);
    }
}
