// Model exports
pub mod domain;
pub mod preferences;
pub mod records;
pub mod results;

pub use domain::{
    BudgetRange, Candidate, Cleanliness, Demographics, GeoPoint, GuestFrequency, HouseRules,
    Lifestyle, Listing, Location, Profile, SleepSchedule, WorkSchedule,
};
pub use preferences::{Dimension, Importance, PreferenceEntry, PreferenceSet, PreferenceValue};
pub use records::{
    OneOrMany, ProfileRecord, RawFlag, RawListing, RawLocation, RawPreferenceEntry,
    RawPreferences, RawProfile, RawTier,
};
pub use results::{
    Category, CompatibilityBreakdown, DataQualityWarning, MatchCandidate, MatchResult, MatchSet,
    MAX_SUB_SCORE,
};
