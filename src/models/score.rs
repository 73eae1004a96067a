use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six independent scoring axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Academic,
    Demographic,
    MajorField,
    Experience,
    Financial,
    Special,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Academic,
        Dimension::Demographic,
        Dimension::MajorField,
        Dimension::Experience,
        Dimension::Financial,
        Dimension::Special,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Academic => "Academic",
            Dimension::Demographic => "Demographic",
            Dimension::MajorField => "Major/Field",
            Dimension::Experience => "Experience",
            Dimension::Financial => "Financial",
            Dimension::Special => "Special Criteria",
        }
    }
}

/// Per-dimension scores, each in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub academic_score: u8,
    pub demographic_score: u8,
    pub major_field_score: u8,
    pub experience_score: u8,
    pub financial_score: u8,
    pub special_criteria_score: u8,
}

impl DimensionScores {
    /// All six dimensions fully satisfied
    pub const PERFECT: DimensionScores = DimensionScores {
        academic_score: 100,
        demographic_score: 100,
        major_field_score: 100,
        experience_score: 100,
        financial_score: 100,
        special_criteria_score: 100,
    };

    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Academic => self.academic_score,
            Dimension::Demographic => self.demographic_score,
            Dimension::MajorField => self.major_field_score,
            Dimension::Experience => self.experience_score,
            Dimension::Financial => self.financial_score,
            Dimension::Special => self.special_criteria_score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Coarse award-likelihood classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuccessTier {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

/// How much work an application takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationEffort {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategicValueTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// The inputs behind an effort estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortBreakdown {
    pub essays: u32,
    pub documents: u32,
    pub recommendations: u32,
    pub interview: bool,
    pub portfolio: bool,
    pub estimated_hours: f64,
}

/// Result of scoring one student against one scholarship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_id: Option<String>,
    pub overall_match_score: u8,
    #[serde(flatten)]
    pub dimensions: DimensionScores,
    pub success_probability: u8,
    pub success_tier: SuccessTier,
    pub competition_factor: f64,
    pub strategic_value: f64,
    pub application_effort: ApplicationEffort,
    pub effort_breakdown: EffortBreakdown,
    pub strategic_value_tier: StrategicValueTier,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallAssessment {
    HighlyEligible,
    Competitive,
    NeedsImprovement,
    NotEligible,
}

/// Narrative result for one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAnalysis {
    pub score: u8,
    pub explanation: String,
    pub met_criteria: Vec<String>,
    pub missing_criteria: Vec<String>,
    pub details: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    pub total_criteria: usize,
    pub met_criteria: usize,
    /// Unmet criteria, each prefixed with its dimension label
    pub missing_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitivePositioning {
    pub percentile: u8,
    pub message: String,
    pub context: String,
}

/// Explanation-oriented sibling of [`MatchScore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_id: Option<String>,
    pub overall_score: u8,
    pub overall_assessment: OverallAssessment,
    pub academic: DimensionAnalysis,
    pub demographic: DimensionAnalysis,
    pub major_field: DimensionAnalysis,
    pub experience: DimensionAnalysis,
    pub financial: DimensionAnalysis,
    pub special: DimensionAnalysis,
    pub gap_analysis: GapAnalysis,
    pub recommendations: Vec<String>,
    pub competitive_positioning: CompetitivePositioning,
    pub calculated_at: DateTime<Utc>,
}

impl EligibilityAnalysis {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionAnalysis {
        match dimension {
            Dimension::Academic => &self.academic,
            Dimension::Demographic => &self.demographic,
            Dimension::MajorField => &self.major_field,
            Dimension::Experience => &self.experience,
            Dimension::Financial => &self.financial,
            Dimension::Special => &self.special,
        }
    }
}
