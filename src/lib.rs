//! Roomie Match - compatibility engine for roommate and co-living matching
//!
//! This library normalizes heterogeneous profile records, applies deal-breaker
//! filters, scores candidates across six categories and ranks them
//! deterministically. Both roommate profiles and property listings can be
//! matched against an acting user.

pub mod batch;
pub mod config;
pub mod core;
pub mod models;

// Re-export commonly used types
pub use config::Settings;
pub use core::{MatchError, Matcher, NormalizeError, Normalizer};
pub use models::{
    CompatibilityBreakdown, Listing, MatchResult, MatchSet, PreferenceSet, Profile,
    ProfileRecord, RawListing, RawPreferences, RawProfile,
};
