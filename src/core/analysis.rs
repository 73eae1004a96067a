use chrono::Utc;

use crate::core::composite::{overall_match_score, DimensionWeights};
use crate::core::dimensions::{evaluate_dimension, Narrative, Shortfall};
use crate::models::{
    CompetitivePositioning, Dimension, DimensionAnalysis, DimensionScores, EligibilityAnalysis,
    EligibilityCriteria, GapAnalysis, OverallAssessment, StudentProfile,
};

const PERCENTILE_SCALE: f64 = 0.9;

const NO_GAPS_RECOMMENDATION: &str =
    "You meet every stated requirement. Focus on a strong, on-time application.";

/// Build the narrative eligibility breakdown for one pair.
///
/// Runs the same six scorers as the match score, collecting met and missing
/// statements along the way, so the numbers always agree with [`MatchScore`].
///
/// [`MatchScore`]: crate::models::MatchScore
pub fn analyze_eligibility(
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
    weights: &DimensionWeights,
) -> EligibilityAnalysis {
    let narratives: Vec<(Dimension, u8, Narrative)> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let mut narrative = Narrative::default();
            let score = evaluate_dimension(dimension, profile, criteria, &mut narrative);
            (dimension, score, narrative)
        })
        .collect();

    let scores = DimensionScores {
        academic_score: narratives[0].1,
        demographic_score: narratives[1].1,
        major_field_score: narratives[2].1,
        experience_score: narratives[3].1,
        financial_score: narratives[4].1,
        special_criteria_score: narratives[5].1,
    };
    let overall_score = overall_match_score(&scores, weights);

    let gap_analysis = gap_analysis(&narratives);
    let recommendations = recommendations(&narratives, weights);
    let has_failed_dimension = scores.iter().any(|(_, score)| score == 0);
    let overall_assessment =
        assess(overall_score, gap_analysis.missing_criteria.len(), has_failed_dimension);
    let competitive_positioning = competitive_positioning(overall_score);

    let mut analyses = narratives
        .into_iter()
        .map(|(dimension, score, narrative)| dimension_analysis(dimension, score, narrative));

    // Dimension::ALL order
    let mut next = || analyses.next().unwrap_or_else(empty_analysis);
    let academic = next();
    let demographic = next();
    let major_field = next();
    let experience = next();
    let financial = next();
    let special = next();

    EligibilityAnalysis {
        scholarship_id: None,
        overall_score,
        overall_assessment,
        academic,
        demographic,
        major_field,
        experience,
        financial,
        special,
        gap_analysis,
        recommendations,
        competitive_positioning,
        calculated_at: Utc::now(),
    }
}

fn dimension_analysis(dimension: Dimension, score: u8, narrative: Narrative) -> DimensionAnalysis {
    let label = dimension.label().to_lowercase();
    let stated = !narrative.met.is_empty() || !narrative.missing.is_empty();

    let explanation = if !stated {
        format!("No {label} requirements for this scholarship")
    } else if score >= 100 {
        format!("Meets all {label} requirements")
    } else if score >= 70 {
        format!("Meets most {label} requirements")
    } else if score > 0 {
        format!("Partially meets {label} requirements")
    } else {
        format!("Does not meet {label} requirements")
    };

    DimensionAnalysis {
        score,
        explanation,
        met_criteria: narrative.met,
        missing_criteria: narrative.missing.into_iter().map(|s| s.statement).collect(),
        details: narrative.details,
    }
}

fn empty_analysis() -> DimensionAnalysis {
    DimensionAnalysis {
        score: 100,
        explanation: String::new(),
        met_criteria: Vec::new(),
        missing_criteria: Vec::new(),
        details: Default::default(),
    }
}

fn gap_analysis(narratives: &[(Dimension, u8, Narrative)]) -> GapAnalysis {
    let met_criteria: usize = narratives.iter().map(|(_, _, n)| n.met.len()).sum();
    let missing_criteria: Vec<String> = narratives
        .iter()
        .flat_map(|(dimension, _, n)| {
            n.missing
                .iter()
                .map(move |s| format!("{}: {}", dimension.label(), s.statement))
        })
        .collect();

    GapAnalysis {
        total_criteria: met_criteria + missing_criteria.len(),
        met_criteria,
        missing_criteria,
    }
}

/// Actionable items first (most heavily weighted dimension first), then
/// notes on requirements the student cannot change, then a fallback when
/// nothing is missing.
fn recommendations(narratives: &[(Dimension, u8, Narrative)], weights: &DimensionWeights) -> Vec<String> {
    let shortfalls = |dimension: Dimension| -> &[Shortfall] {
        narratives
            .iter()
            .find(|(d, _, _)| *d == dimension)
            .map(|(_, _, n)| n.missing.as_slice())
            .unwrap_or(&[])
    };

    let order = weights.by_importance();
    let mut recommendations: Vec<String> = Vec::new();

    for dimension in order {
        for action in shortfalls(dimension).iter().filter_map(|s| s.action.as_ref()) {
            if !recommendations.contains(action) {
                recommendations.push(action.clone());
            }
        }
    }

    for dimension in order {
        for shortfall in shortfalls(dimension).iter().filter(|s| s.action.is_none()) {
            recommendations.push(format!(
                "Note ({}): {}. This requirement cannot be changed by improving your profile.",
                dimension.label(),
                shortfall.statement
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push(NO_GAPS_RECOMMENDATION.to_string());
    }
    recommendations
}

/// HighlyEligible needs both a score of at least 90 and nothing missing.
/// Failing any dimension outright makes the student NotEligible.
pub fn assess(overall_score: u8, missing_count: usize, has_failed_dimension: bool) -> OverallAssessment {
    if has_failed_dimension {
        OverallAssessment::NotEligible
    } else if overall_score >= 90 && missing_count == 0 {
        OverallAssessment::HighlyEligible
    } else if overall_score >= 75 {
        OverallAssessment::Competitive
    } else if overall_score >= 50 {
        OverallAssessment::NeedsImprovement
    } else {
        OverallAssessment::NotEligible
    }
}

/// Simplified percentile: `round(overall * 0.9)`
pub fn competitive_positioning(overall_score: u8) -> CompetitivePositioning {
    let percentile = (overall_score as f64 * PERCENTILE_SCALE).round().clamp(0.0, 100.0) as u8;

    let message = match percentile {
        90..=u8::MAX => "Top 10% of likely applicants",
        75..=89 => "Top 25% of likely applicants",
        50..=74 => "Above the median applicant",
        25..=49 => "Below the median applicant",
        _ => "Bottom quartile of likely applicants",
    };

    CompetitivePositioning {
        percentile,
        message: message.to_string(),
        context: format!(
            "Estimated from an overall match of {overall_score}/100 against a typical applicant pool"
        ),
    }
}
