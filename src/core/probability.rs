use crate::core::dimensions::round_score;
use crate::models::{CompetitionStats, DimensionScores, SuccessTier};

/// Factor used when nothing is known about the applicant pool
pub const NEUTRAL_COMPETITION: f64 = 1.0;

/// No award is ever a sure thing
pub const MAX_PROBABILITY: u8 = 95;

/// Ceiling applied when the student fails a dimension outright
pub const INELIGIBLE_PROBABILITY_CAP: u8 = 5;

/// Acceptance-rate floors and the factor each band maps to, most generous first
const COMPETITION_BANDS: &[(f64, f64)] = &[
    (0.50, 1.30),
    (0.25, 1.15),
    (0.10, 1.00),
    (0.05, 0.85),
    (0.01, 0.70),
];
const MOST_COMPETITIVE: f64 = 0.50;

/// Acceptance rate for a scholarship, if it can be known
///
/// An explicit rate wins; otherwise awards / applicants. Rates above 1 are
/// read as percentages.
pub fn acceptance_rate(stats: &CompetitionStats) -> Option<f64> {
    let rate = match stats.acceptance_rate {
        Some(rate) if rate > 1.0 => Some(rate / 100.0),
        Some(rate) => Some(rate),
        None => match (stats.awards_available, stats.applicant_pool_size) {
            (Some(awards), Some(pool)) if pool > 0 => Some(awards as f64 / pool as f64),
            _ => None,
        },
    };

    rate.filter(|r| r.is_finite() && *r >= 0.0).map(|r| r.min(1.0))
}

/// Competition factor: boosts match quality for easy pools and dampens it
/// for crowded ones.
pub fn competition_factor(stats: &CompetitionStats) -> f64 {
    let Some(rate) = acceptance_rate(stats) else {
        return NEUTRAL_COMPETITION;
    };

    COMPETITION_BANDS
        .iter()
        .find(|(floor, _)| rate >= *floor)
        .map(|(_, factor)| *factor)
        .unwrap_or(MOST_COMPETITIVE)
}

/// Award probability in 0..=95
///
/// A zero in any dimension means the student misses an outright
/// requirement, so the probability is capped at
/// [`INELIGIBLE_PROBABILITY_CAP`].
pub fn success_probability(overall: u8, competition_factor: f64, dimensions: &DimensionScores) -> u8 {
    let raw = round_score(overall as f64 * competition_factor).min(MAX_PROBABILITY);

    if dimensions.iter().any(|(_, score)| score == 0) {
        raw.min(INELIGIBLE_PROBABILITY_CAP)
    } else {
        raw
    }
}

pub fn success_tier(probability: u8) -> SuccessTier {
    match probability {
        75..=u8::MAX => SuccessTier::VeryHigh,
        50..=74 => SuccessTier::High,
        25..=49 => SuccessTier::Moderate,
        10..=24 => SuccessTier::Low,
        _ => SuccessTier::VeryLow,
    }
}
