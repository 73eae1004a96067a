use crate::models::{ApplicationEffort, ApplicationRequirements, EffortBreakdown, StrategicValueTier};

/// Strategic value is expressed on a 0-10 scale
pub const MAX_STRATEGIC_VALUE: f64 = 10.0;

/// Dollars of effort-adjusted expected value per strategic-value point
const DOLLARS_PER_POINT: f64 = 1000.0;

/// Share of the match score added by the match-boosted variant
const MATCH_BOOST: f64 = 0.1;

// Hours per requirement
const BASE_HOURS: f64 = 1.0;
const HOURS_PER_ESSAY: f64 = 4.0;
const HOURS_PER_DOCUMENT: f64 = 0.5;
const HOURS_PER_RECOMMENDATION: f64 = 1.0;
const INTERVIEW_HOURS: f64 = 3.0;
const PORTFOLIO_HOURS: f64 = 6.0;

/// Effort-adjusted value of applying to one scholarship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategicValue {
    pub expected_value: f64,
    pub effort_adjusted_value: f64,
    pub strategic_value: f64,
    pub tier: StrategicValueTier,
}

impl StrategicValue {
    pub const ZERO: StrategicValue = StrategicValue {
        expected_value: 0.0,
        effort_adjusted_value: 0.0,
        strategic_value: 0.0,
        tier: StrategicValueTier::Poor,
    };
}

/// Estimate how much work an application takes from its requirements
pub fn estimate_effort(requirements: &ApplicationRequirements) -> (ApplicationEffort, EffortBreakdown) {
    let estimated_hours = BASE_HOURS
        + requirements.essay_count as f64 * HOURS_PER_ESSAY
        + requirements.document_count as f64 * HOURS_PER_DOCUMENT
        + requirements.recommendation_count as f64 * HOURS_PER_RECOMMENDATION
        + if requirements.interview_required { INTERVIEW_HOURS } else { 0.0 }
        + if requirements.portfolio_required { PORTFOLIO_HOURS } else { 0.0 };

    let effort = if estimated_hours <= 3.0 {
        ApplicationEffort::Low
    } else if estimated_hours <= 8.0 {
        ApplicationEffort::Medium
    } else if estimated_hours <= 16.0 {
        ApplicationEffort::High
    } else {
        ApplicationEffort::VeryHigh
    };

    let breakdown = EffortBreakdown {
        essays: requirements.essay_count,
        documents: requirements.document_count,
        recommendations: requirements.recommendation_count,
        interview: requirements.interview_required,
        portfolio: requirements.portfolio_required,
        estimated_hours,
    };

    (effort, breakdown)
}

pub fn effort_multiplier(effort: ApplicationEffort) -> f64 {
    match effort {
        ApplicationEffort::Low => 1.0,
        ApplicationEffort::Medium => 0.75,
        ApplicationEffort::High => 0.5,
        ApplicationEffort::VeryHigh => 0.3,
    }
}

/// `min(award * p / 100 * effort_multiplier / 1000, 10)`
///
/// A non-positive award or a zero probability yields [`StrategicValue::ZERO`].
pub fn strategic_value(award_amount: f64, success_probability: u8, effort: ApplicationEffort) -> StrategicValue {
    if !award_amount.is_finite() || award_amount <= 0.0 || success_probability == 0 {
        return StrategicValue::ZERO;
    }

    let expected_value = award_amount * (success_probability as f64 / 100.0);
    let effort_adjusted_value = expected_value * effort_multiplier(effort);
    let strategic_value = (effort_adjusted_value / DOLLARS_PER_POINT).min(MAX_STRATEGIC_VALUE);

    StrategicValue {
        expected_value,
        effort_adjusted_value,
        strategic_value,
        tier: strategic_value_tier(strategic_value),
    }
}

/// Match-boosted variant: `value * (1 + match/100 * 0.1)`, capped at 10
pub fn boosted_strategic_value(value: f64, match_score: u8) -> f64 {
    (value * (1.0 + match_score as f64 / 100.0 * MATCH_BOOST)).min(MAX_STRATEGIC_VALUE)
}

pub fn strategic_value_tier(value: f64) -> StrategicValueTier {
    if value >= 7.0 {
        StrategicValueTier::Excellent
    } else if value >= 4.0 {
        StrategicValueTier::Good
    } else if value >= 1.5 {
        StrategicValueTier::Fair
    } else {
        StrategicValueTier::Poor
    }
}
