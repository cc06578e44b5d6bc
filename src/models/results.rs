use serde::{Deserialize, Serialize};

use super::domain::{Listing, Profile};

/// Upper bound of every category sub-score
pub const MAX_SUB_SCORE: f64 = 20.0;

/// Scoring categories, declared in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Budget,
    Location,
    Lifestyle,
    Schedule,
    Interests,
    Cleanliness,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Budget,
        Self::Location,
        Self::Lifestyle,
        Self::Schedule,
        Self::Interests,
        Self::Cleanliness,
    ];
}

/// Six category sub-scores, each in [0, 20]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    pub budget: f64,
    pub location: f64,
    pub lifestyle: f64,
    pub schedule: f64,
    pub interests: f64,
    pub cleanliness: f64,
}

impl CompatibilityBreakdown {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Budget => self.budget,
            Category::Location => self.location,
            Category::Lifestyle => self.lifestyle,
            Category::Schedule => self.schedule,
            Category::Interests => self.interests,
            Category::Cleanliness => self.cleanliness,
        }
    }

    pub fn set(&mut self, category: Category, score: f64) {
        let slot = match category {
            Category::Budget => &mut self.budget,
            Category::Location => &mut self.location,
            Category::Lifestyle => &mut self.lifestyle,
            Category::Schedule => &mut self.schedule,
            Category::Interests => &mut self.interests,
            Category::Cleanliness => &mut self.cleanliness,
        };
        *slot = score;
    }

    /// Sub-scores in tie-break priority order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Sub-scores on the 0-100 display scale used by the detail view
    pub fn percentages(&self) -> Vec<(Category, f64)> {
        self.iter()
            .map(|(c, score)| (c, score * (100.0 / MAX_SUB_SCORE)))
            .collect()
    }
}

/// Anything that can be ranked needs a stable identity for the final tie-break
pub trait MatchCandidate {
    fn candidate_id(&self) -> String;
}

impl MatchCandidate for Profile {
    fn candidate_id(&self) -> String {
        self.user_id.clone()
    }
}

impl MatchCandidate for Listing {
    fn candidate_id(&self) -> String {
        self.listing_id.to_string()
    }
}

/// One scored candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult<C> {
    pub candidate: C,
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
    pub breakdown: CompatibilityBreakdown,
}

/// A candidate record that was left out of the run because it could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    #[serde(rename = "candidateId")]
    pub candidate_id: Option<String>,
    pub reason: String,
}

/// Outcome of one matcher invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSet<C> {
    pub matches: Vec<MatchResult<C>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "filteredOut")]
    pub filtered_out: usize,
    pub warnings: Vec<DataQualityWarning>,
}
