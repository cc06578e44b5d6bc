// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod normalizer;
pub mod ranking;
pub mod scoring;
pub mod weighting;

pub use distance::{haversine_distance, within_radius};
pub use filters::{first_violation, passes_dealbreakers, satisfies};
pub use matcher::{MatchError, Matcher};
pub use normalizer::{normalize_text, NormalizeError, Normalizer};
pub use ranking::{aggregate, compare, rank};
pub use scoring::calculate_breakdown;
pub use weighting::{CategoryWeights, ImportanceWeights};
