use serde::{Deserialize, Serialize};

/// Student profile as loaded by the caller.
///
/// Every attribute is optional. An absent value means "unknown", which the
/// scorers treat as an unmet sub-criterion rather than as zero or an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub student_id: Option<String>,

    // Academic
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub gpa_scale: Option<f64>,
    #[serde(default)]
    pub sat_score: Option<u32>,
    #[serde(default)]
    pub act_score: Option<u32>,
    #[serde(default)]
    pub class_rank: Option<u32>,
    #[serde(default)]
    pub class_size: Option<u32>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub current_grade: Option<String>,

    // Demographic
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub ethnicity: Vec<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,

    // Financial
    #[serde(default)]
    pub financial_need: Option<FinancialNeed>,
    #[serde(default)]
    pub pell_grant_eligible: Option<bool>,
    #[serde(default)]
    pub efc_range: Option<String>,

    // Major / field
    #[serde(default)]
    pub intended_major: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub career_goals: Option<String>,

    // Experience
    #[serde(default)]
    pub volunteer_hours: Option<f64>,
    #[serde(default)]
    pub leadership_roles: Vec<LeadershipRole>,
    #[serde(default)]
    pub extracurriculars: Vec<Extracurricular>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub awards_honors: Vec<AwardHonor>,

    // Special circumstances
    #[serde(default)]
    pub first_generation: Option<bool>,
    #[serde(default)]
    pub military_affiliation: Option<String>,
    #[serde(default)]
    pub disabilities: Option<Vec<String>>,
}

impl StudentProfile {
    /// GPA expressed on a 4.0 scale, using `gpa_scale` when it is known.
    pub fn normalized_gpa(&self) -> Option<f64> {
        let gpa = self.gpa?;
        match self.gpa_scale {
            Some(scale) if scale > 0.0 && (scale - 4.0).abs() > f64::EPSILON => {
                Some(gpa * 4.0 / scale)
            }
            _ => Some(gpa),
        }
    }

    /// Percentage of the class ranked at or above the student (1.0 = top 1%).
    pub fn class_standing_percent(&self) -> Option<f64> {
        match (self.class_rank, self.class_size) {
            (Some(rank), Some(size)) if rank > 0 && size > 0 => {
                Some(rank as f64 / size as f64 * 100.0)
            }
            _ => None,
        }
    }

    /// Total months across all work experience entries with a known duration.
    pub fn work_experience_months(&self) -> u32 {
        self.work_experience
            .iter()
            .filter_map(|w| w.months)
            .fold(0u32, u32::saturating_add)
    }
}

/// Self-reported financial need band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialNeed {
    #[serde(alias = "low", alias = "Low")]
    Low,
    #[serde(alias = "moderate", alias = "Moderate", alias = "MEDIUM", alias = "medium")]
    Moderate,
    #[serde(alias = "high", alias = "High")]
    High,
    #[serde(alias = "very_high", alias = "VeryHigh", alias = "veryHigh")]
    VeryHigh,
}

impl FinancialNeed {
    /// Ordinal rank used for partial matching (LOW = 1 .. VERY_HIGH = 4)
    pub fn rank(self) -> u8 {
        match self {
            FinancialNeed::Low => 1,
            FinancialNeed::Moderate => 2,
            FinancialNeed::High => 3,
            FinancialNeed::VeryHigh => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FinancialNeed::Low => "low",
            FinancialNeed::Moderate => "moderate",
            FinancialNeed::High => "high",
            FinancialNeed::VeryHigh => "very high",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipRole {
    pub title: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub years: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extracurricular {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub years: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default)]
    pub employer: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub months: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardHonor {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}
