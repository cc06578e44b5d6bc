use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{MatchError, Matcher};
use crate::models::{
    DataQualityWarning, Listing, MatchSet, Profile, ProfileRecord, RawListing, RawPreferences,
    RawProfile,
};

/// Which matcher(s) a batch run invokes
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Roommate,
    Property,
    All,
}

/// Batch input: one acting user and a mixed candidate table
///
/// Candidate rows stay untyped until [`CandidatePools::from_rows`] so that a
/// single ill-typed row cannot sink the whole batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchInput {
    pub profile: RawProfile,
    pub preferences: RawPreferences,
    #[serde(default)]
    pub candidates: Vec<Value>,
}

/// Candidate rows split by record kind
#[derive(Debug, Clone, Default)]
pub struct CandidatePools {
    pub roommates: Vec<RawProfile>,
    pub listings: Vec<RawListing>,
    /// Rows that did not match any known record shape
    pub rejected: Vec<DataQualityWarning>,
}

impl CandidatePools {
    pub fn from_rows(rows: Vec<Value>) -> Self {
        let mut pools = Self::default();

        for row in rows {
            let candidate_id = row_id(&row);
            match serde_json::from_value::<ProfileRecord>(row) {
                Ok(ProfileRecord::Roommate(profile)) => pools.roommates.push(profile),
                Ok(ProfileRecord::Listing(listing)) => pools.listings.push(listing),
                Err(err) => {
                    tracing::warn!(
                        "Skipping candidate row {}: {}",
                        candidate_id.as_deref().unwrap_or("<unidentified>"),
                        err
                    );
                    pools.rejected.push(DataQualityWarning {
                        candidate_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        pools
    }
}

/// Best-effort identity of a row that may not deserialize
fn row_id(row: &Value) -> Option<String> {
    ["userId", "user_id", "listingId", "listing_id", "id"]
        .iter()
        .find_map(|key| row.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// JSON report printed by the batch runner
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roommates: Option<MatchSet<Profile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<MatchSet<Listing>>,
    /// Candidate rows dropped before reaching either matcher
    pub rejected: Vec<DataQualityWarning>,
}

/// Run the selected matchers over one batch
pub fn run_batch(
    matcher: &Matcher,
    batch: BatchInput,
    mode: Mode,
) -> Result<BatchReport, MatchError> {
    let pools = CandidatePools::from_rows(batch.candidates);

    tracing::info!(
        "Loaded {} roommate and {} listing candidates ({} rows rejected)",
        pools.roommates.len(),
        pools.listings.len(),
        pools.rejected.len()
    );

    let mut report = BatchReport {
        rejected: pools.rejected,
        ..Default::default()
    };

    if matches!(mode, Mode::Roommate | Mode::All) {
        report.roommates = Some(matcher.find_roommate_matches(
            &batch.profile,
            &batch.preferences,
            &pools.roommates,
        )?);
    }
    if matches!(mode, Mode::Property | Mode::All) {
        report.properties = Some(matcher.find_property_share_matches(
            &batch.profile,
            &batch.preferences,
            &pools.listings,
        )?);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ill_typed_rows_are_rejected_individually() {
        let rows = vec![
            json!({"kind": "roommate", "userId": "good"}),
            json!({"kind": "roommate", "userId": "bad-age", "age": "twenty"}),
            json!({"kind": "roommate", "userId": "bad-tier", "cleanliness": 3.5}),
            json!({"kind": "spaceship", "id": "x"}),
            json!({
                "kind": "listing",
                "listingId": "0d6f0b8e-3c1a-4e5b-9f2d-7a8b9c0d1e01",
                "price": 900,
            }),
        ];

        let pools = CandidatePools::from_rows(rows);

        assert_eq!(pools.roommates.len(), 1);
        assert_eq!(pools.listings.len(), 1);
        let ids: Vec<Option<&str>> = pools
            .rejected
            .iter()
            .map(|w| w.candidate_id.as_deref())
            .collect();
        assert_eq!(ids, vec![Some("bad-age"), Some("bad-tier"), Some("x")]);
    }

    #[test]
    fn test_run_batch_respects_mode() {
        let batch: BatchInput = serde_json::from_value(json!({
            "profile": {"userId": "me"},
            "preferences": {"userId": "me"},
            "candidates": [{"kind": "roommate", "userId": "you"}],
        }))
        .unwrap();

        let report = run_batch(&Matcher::default(), batch, Mode::Roommate).unwrap();
        assert!(report.properties.is_none());
        assert_eq!(report.roommates.map(|set| set.matches.len()), Some(1));
    }
}
