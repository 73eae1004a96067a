// Model exports
pub mod criteria;
pub mod domain;
pub mod score;
#[cfg(feature = "server")]
pub mod requests;
#[cfg(feature = "server")]
pub mod responses;

pub use criteria::{
    AcademicCriteria, ApplicationRequirements, CompetitionStats, CriteriaInput,
    DemographicCriteria, EligibilityCriteria, ExperienceCriteria, FinancialCriteria,
    MajorFieldCriteria, Scholarship, SpecialCriteria,
};
pub use domain::{
    AwardHonor, Extracurricular, FinancialNeed, LeadershipRole, StudentProfile, WorkExperience,
};
pub use score::{
    ApplicationEffort, CompetitivePositioning, Dimension, DimensionAnalysis, DimensionScores,
    EffortBreakdown, EligibilityAnalysis, GapAnalysis, MatchScore, OverallAssessment,
    StrategicValueTier, SuccessTier,
};
#[cfg(feature = "server")]
pub use requests::{AnalysisRequest, BatchScoreRequest, ScoreRequest};
#[cfg(feature = "server")]
pub use responses::{BatchScoreResponse, ErrorResponse, HealthResponse};
