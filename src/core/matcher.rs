use chrono::Utc;
use tracing::debug;

use crate::core::analysis::analyze_eligibility;
use crate::core::composite::{overall_match_score, DimensionWeights};
use crate::core::criteria::parse_criteria;
use crate::core::dimensions::score_dimensions;
use crate::core::probability::{competition_factor, success_probability, success_tier};
use crate::core::strategic::{
    boosted_strategic_value, estimate_effort, strategic_value, strategic_value_tier,
};
use crate::error::{EngineError, Result};
use crate::models::{EligibilityAnalysis, MatchScore, Scholarship, StudentProfile};

/// Library-level engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: DimensionWeights,
    /// Batch worker pool size. `None` uses the available parallelism.
    pub batch_workers: Option<usize>,
    /// Apply the match-quality boost to strategic value
    pub match_boost: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::DEFAULT,
            batch_workers: None,
            match_boost: false,
        }
    }
}

/// Match orchestrator: parses criteria and runs every scorer for one
/// student/scholarship pair.
///
/// # Pipeline
/// 1. Criteria parsing
/// 2. Six dimension scores
/// 3. Composite score
/// 4. Competition factor and success probability
/// 5. Effort estimate and strategic value
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: EngineConfig,
}

impl Matcher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn with_default_weights() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score one scholarship for one student
    ///
    /// # Errors
    /// [`EngineError::MissingProfile`] when `profile` is `None`,
    /// [`EngineError::MalformedCriteria`] when the criteria payload is not
    /// valid JSON.
    pub fn compute_match_score(
        &self,
        profile: Option<&StudentProfile>,
        scholarship: &Scholarship,
    ) -> Result<MatchScore> {
        let profile = profile.ok_or(EngineError::MissingProfile)?;
        let criteria = parse_criteria(&scholarship.criteria)?;

        let dimensions = score_dimensions(profile, &criteria);
        let overall = overall_match_score(&dimensions, &self.config.weights);

        let factor = competition_factor(&scholarship.competition);
        let probability = success_probability(overall, factor, &dimensions);

        let (effort, effort_breakdown) = estimate_effort(&scholarship.requirements);
        let value = strategic_value(scholarship.award_amount.unwrap_or(0.0), probability, effort);
        let strategic = if self.config.match_boost {
            boosted_strategic_value(value.strategic_value, overall)
        } else {
            value.strategic_value
        };

        debug!(
            scholarship = scholarship.label(),
            overall,
            probability,
            strategic_value = strategic,
            "Scored scholarship"
        );

        Ok(MatchScore {
            scholarship_id: scholarship.id.clone(),
            overall_match_score: overall,
            dimensions,
            success_probability: probability,
            success_tier: success_tier(probability),
            competition_factor: factor,
            strategic_value: strategic,
            application_effort: effort,
            effort_breakdown,
            strategic_value_tier: strategic_value_tier(strategic),
            calculated_at: Utc::now(),
        })
    }

    /// Narrative eligibility breakdown for one pair
    ///
    /// Fails under the same conditions as [`Matcher::compute_match_score`].
    pub fn compute_eligibility_analysis(
        &self,
        profile: Option<&StudentProfile>,
        scholarship: &Scholarship,
    ) -> Result<EligibilityAnalysis> {
        let profile = profile.ok_or(EngineError::MissingProfile)?;
        let criteria = parse_criteria(&scholarship.criteria)?;

        let mut analysis = analyze_eligibility(profile, &criteria, &self.config.weights);
        analysis.scholarship_id = scholarship.id.clone();

        debug!(
            scholarship = scholarship.label(),
            overall = analysis.overall_score,
            missing = analysis.gap_analysis.missing_criteria.len(),
            "Analyzed eligibility"
        );

        Ok(analysis)
    }
}

/// [`Matcher::compute_match_score`] with the default configuration
pub fn compute_match_score(
    profile: Option<&StudentProfile>,
    scholarship: &Scholarship,
) -> Result<MatchScore> {
    Matcher::default().compute_match_score(profile, scholarship)
}

/// [`Matcher::compute_eligibility_analysis`] with the default configuration
pub fn compute_eligibility_analysis(
    profile: Option<&StudentProfile>,
    scholarship: &Scholarship,
) -> Result<EligibilityAnalysis> {
    Matcher::default().compute_eligibility_analysis(profile, scholarship)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AcademicCriteria, ApplicationEffort, CompetitionStats, CriteriaInput, DimensionScores,
        EligibilityCriteria, StrategicValueTier, SuccessTier,
    };

    fn student() -> StudentProfile {
        StudentProfile {
            gpa: Some(3.3),
            ..Default::default()
        }
    }

    fn gpa_scholarship() -> Scholarship {
        Scholarship::new(EligibilityCriteria {
            academic: Some(AcademicCriteria {
                min_gpa: Some(3.5),
                ..Default::default()
            }),
            ..Default::default()
        })
        .with_id("gpa-35")
        .with_award(10_000.0)
    }

    #[test]
    fn test_missing_profile_fails() {
        let result = compute_match_score(None, &gpa_scholarship());
        assert_eq!(result.unwrap_err(), EngineError::MissingProfile);

        let result = compute_eligibility_analysis(None, &gpa_scholarship());
        assert_eq!(result.unwrap_err(), EngineError::MissingProfile);
    }

    #[test]
    fn test_malformed_criteria_fails() {
        let scholarship = Scholarship::new(CriteriaInput::Json("{not json".to_string()));
        let result = compute_match_score(Some(&student()), &scholarship);
        assert!(matches!(result, Err(EngineError::MalformedCriteria(_))));
    }

    #[test]
    fn test_empty_criteria_is_perfect() {
        let scholarship = Scholarship::new(CriteriaInput::Json("{}".to_string()));
        let score = compute_match_score(Some(&student()), &scholarship).unwrap();

        assert_eq!(score.overall_match_score, 100);
        assert_eq!(score.dimensions, DimensionScores::PERFECT);
        assert_eq!(score.success_probability, 95);
        assert_eq!(score.success_tier, SuccessTier::VeryHigh);
        assert_eq!(score.competition_factor, 1.0);
    }

    #[test]
    fn test_full_pipeline() {
        let score = compute_match_score(Some(&student()), &gpa_scholarship()).unwrap();

        assert_eq!(score.scholarship_id.as_deref(), Some("gpa-35"));
        assert_eq!(score.dimensions.academic_score, 94);
        assert_eq!(score.overall_match_score, 98);
        assert_eq!(score.success_probability, 95);
        assert_eq!(score.application_effort, ApplicationEffort::Low);
        // 10000 * 0.95 * 1.0 / 1000
        assert!((score.strategic_value - 9.5).abs() < 1e-9);
        assert_eq!(score.strategic_value_tier, StrategicValueTier::Excellent);
    }

    #[test]
    fn test_competition_lowers_probability() {
        let mut scholarship = gpa_scholarship();
        scholarship.competition = CompetitionStats {
            awards_available: Some(1),
            applicant_pool_size: Some(1000),
            ..Default::default()
        };
        let score = compute_match_score(Some(&student()), &scholarship).unwrap();
        assert_eq!(score.competition_factor, 0.5);
        assert_eq!(score.success_probability, 49);
        assert_eq!(score.success_tier, SuccessTier::Moderate);
    }

    #[test]
    fn test_match_boost_flag() {
        let mut scholarship = gpa_scholarship();
        scholarship.award_amount = Some(5_000.0);

        let plain = Matcher::default()
            .compute_match_score(Some(&student()), &scholarship)
            .unwrap();
        let boosted = Matcher::new(EngineConfig {
            match_boost: true,
            ..Default::default()
        })
        .compute_match_score(Some(&student()), &scholarship)
        .unwrap();

        assert!(boosted.strategic_value > plain.strategic_value);
    }

    #[test]
    fn test_analysis_carries_scholarship_id() {
        let analysis = compute_eligibility_analysis(Some(&student()), &gpa_scholarship()).unwrap();
        assert_eq!(analysis.scholarship_id.as_deref(), Some("gpa-35"));
        assert_eq!(analysis.overall_score, 98);
    }
}
