//! ScholarMatch - scholarship eligibility scoring engine
//!
//! Scores how well a student profile matches a scholarship's eligibility
//! criteria across six dimensions, estimates the chance of winning and the
//! strategic value of applying, and explains the gaps.
//!
//! The engine is pure computation. With `default-features = false` it has no
//! web framework dependencies; the `server` feature adds the HTTP shell.

#[cfg(feature = "server")]
pub mod config;
pub mod core;
pub mod error;
pub mod models;
#[cfg(feature = "server")]
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    compute_eligibility_analysis, compute_match_score, compute_match_scores_batch, BatchRunner,
    DimensionWeights, EngineConfig, Matcher,
};
pub use error::{EngineError, Result};
pub use models::{
    CriteriaInput, EligibilityAnalysis, EligibilityCriteria, MatchScore, Scholarship,
    StudentProfile,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profile = StudentProfile::default();
        let score = compute_match_score(Some(&profile), &Scholarship::default()).unwrap();
        assert_eq!(score.overall_match_score, 100);
    }
}
