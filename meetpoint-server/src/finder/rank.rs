//! Station scoring and ranking.
//!
//! A station's score is its aggregate transit time divided by one plus its
//! weighted amenity appeal:
//!
//! ```text
//! score = aggregate_minutes / (1 + Σ weight_f × value_f)
//! ```
//!
//! Lower is better. Stations are ranked ascending by score; equal scores
//! keep their discovery order.

use tracing::{trace, warn};

use crate::domain::{CandidateStation, FactorId, FactorWeights, StationFactors};

/// One requested factor as it contributed to a station's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedFactor {
    pub id: FactorId,
    pub weight: f64,
    pub value: f64,
}

/// Everything needed to score one station.
#[derive(Debug, Clone)]
pub struct ScoringInput {
    pub station: CandidateStation,
    pub factors: StationFactors,
    pub aggregate_minutes: u32,
}

/// A station with its final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredStation {
    pub station: CandidateStation,
    pub aggregate_minutes: u32,
    pub final_score: f64,
    pub applied_factors: Vec<AppliedFactor>,
}

/// The factors a request applies to one station, in request order.
pub fn applied_factors(
    factors: &StationFactors,
    requested: &[FactorId],
    weights: &FactorWeights,
) -> Vec<AppliedFactor> {
    requested
        .iter()
        .map(|&id| AppliedFactor {
            id,
            weight: weights.weight(id),
            value: factors.value(id),
        })
        .collect()
}

/// Score from an aggregate time and the applied factors.
///
/// Returns `None` when the denominator is not positive or the result is not
/// finite; such a station cannot be ordered meaningfully.
pub fn final_score(aggregate_minutes: u32, applied: &[AppliedFactor]) -> Option<f64> {
    let appeal: f64 = applied.iter().map(|f| f.weight * f.value).sum();
    let denominator = 1.0 + appeal;

    if denominator.is_nan() || denominator <= 0.0 {
        return None;
    }

    let score = f64::from(aggregate_minutes) / denominator;
    score.is_finite().then_some(score)
}

/// Score and rank stations, keeping at most `max_results`.
///
/// `inputs` must be in discovery order; that order breaks ties. Stations
/// whose score is undefined are dropped.
pub fn rank_stations(
    inputs: Vec<ScoringInput>,
    requested: &[FactorId],
    weights: &FactorWeights,
    max_results: usize,
) -> Vec<ScoredStation> {
    let mut scored: Vec<ScoredStation> = inputs
        .into_iter()
        .filter_map(|input| {
            let applied = applied_factors(&input.factors, requested, weights);
            let Some(final_score) = final_score(input.aggregate_minutes, &applied) else {
                warn!(
                    station = %input.station.name,
                    "excluding station with undefined score"
                );
                return None;
            };

            trace!(
                station = %input.station.name,
                aggregate = input.aggregate_minutes,
                score = final_score,
                "scored station"
            );

            Some(ScoredStation {
                station: input.station,
                aggregate_minutes: input.aggregate_minutes,
                final_score,
                applied_factors: applied,
            })
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| a.final_score.total_cmp(&b.final_score));
    scored.truncate(max_results);
    scored
}
