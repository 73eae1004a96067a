use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Scholarship, StudentProfile};

/// Request to score one scholarship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub profile: Option<StudentProfile>,
    pub scholarship: Scholarship,
}

/// Request to score many scholarships for one student
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchScoreRequest {
    #[serde(default)]
    pub profile: Option<StudentProfile>,
    #[validate(length(min = 1, max = 500))]
    pub scholarships: Vec<Scholarship>,
}

/// Request for the narrative eligibility breakdown
pub type AnalysisRequest = ScoreRequest;
