use std::cmp::Ordering;

use crate::core::scoring::round_score;
use crate::core::weighting::CategoryWeights;
use crate::models::{Category, CompatibilityBreakdown, MatchCandidate, MatchResult, MAX_SUB_SCORE};

/// Combine sub-scores into an overall score (0-100)
///
/// Weighted mean of the six categories renormalized to a percentage:
/// `overall = S / (W * 20) * 100` where `S` is the weighted sum and `W` the
/// weight sum. Scaling every weight by the same factor leaves the result
/// unchanged.
pub fn aggregate(breakdown: &CompatibilityBreakdown, weights: &CategoryWeights) -> f64 {
    let weight_sum = weights.sum();
    if !(weight_sum > 0.0) {
        return 0.0;
    }

    let weighted_sum: f64 = breakdown
        .iter()
        .map(|(category, score)| score * weights.get(category))
        .sum();

    let overall = weighted_sum / (weight_sum * MAX_SUB_SCORE) * 100.0;
    round_score(overall.clamp(0.0, 100.0))
}

/// Fixed ordering: overall score descending, then each sub-score descending in
/// category priority order, then candidate id ascending
pub fn compare<C: MatchCandidate>(a: &MatchResult<C>, b: &MatchResult<C>) -> Ordering {
    b.overall_score
        .total_cmp(&a.overall_score)
        .then_with(|| {
            Category::ALL
                .iter()
                .map(|category| {
                    b.breakdown
                        .get(*category)
                        .total_cmp(&a.breakdown.get(*category))
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.candidate.candidate_id().cmp(&b.candidate.candidate_id()))
}

/// Sort results in place into their final deterministic order
pub fn rank<C: MatchCandidate>(results: &mut [MatchResult<C>]) {
    results.sort_by(compare);
}
