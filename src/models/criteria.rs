use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::models::domain::FinancialNeed;

/// Eligibility criteria for one scholarship, split into six optional groups.
///
/// A group set to `None` states no requirement for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic: Option<AcademicCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic: Option<DemographicCriteria>,
    #[serde(default, alias = "major_field", alias = "major", skip_serializing_if = "Option::is_none")]
    pub major_field: Option<MajorFieldCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial: Option<FinancialCriteria>,
    #[serde(default, alias = "specialCriteria", alias = "special_criteria", skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialCriteria>,
}

impl EligibilityCriteria {
    /// True when no dimension states any requirement
    pub fn is_empty(&self) -> bool {
        self.academic.is_none()
            && self.demographic.is_none()
            && self.major_field.is_none()
            && self.experience.is_none()
            && self.financial.is_none()
            && self.special.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicCriteria {
    #[serde(rename = "minGPA", alias = "minGpa", alias = "min_gpa", default, deserialize_with = "lenient::opt_f64")]
    pub min_gpa: Option<f64>,
    #[serde(rename = "maxGPA", alias = "maxGpa", alias = "max_gpa", default, deserialize_with = "lenient::opt_f64")]
    pub max_gpa: Option<f64>,
    #[serde(rename = "minSAT", alias = "minSat", alias = "min_sat", default, deserialize_with = "lenient::opt_u32")]
    pub min_sat: Option<u32>,
    #[serde(rename = "maxSAT", alias = "maxSat", alias = "max_sat", default, deserialize_with = "lenient::opt_u32")]
    pub max_sat: Option<u32>,
    #[serde(rename = "minACT", alias = "minAct", alias = "min_act", default, deserialize_with = "lenient::opt_u32")]
    pub min_act: Option<u32>,
    #[serde(rename = "maxACT", alias = "maxAct", alias = "max_act", default, deserialize_with = "lenient::opt_u32")]
    pub max_act: Option<u32>,
    /// "Top X percent" of the graduating class
    #[serde(rename = "classRankPercentile", alias = "class_rank_percentile", default, deserialize_with = "lenient::opt_f64")]
    pub class_rank_percentile: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicCriteria {
    #[serde(default, alias = "required_gender", deserialize_with = "lenient::opt_string")]
    pub required_gender: Option<String>,
    #[serde(default, alias = "required_ethnicity", deserialize_with = "lenient::string_list")]
    pub required_ethnicity: Vec<String>,
    #[serde(default, alias = "required_state", deserialize_with = "lenient::string_list")]
    pub required_state: Vec<String>,
    #[serde(default, alias = "required_city", deserialize_with = "lenient::string_list")]
    pub required_city: Vec<String>,
    #[serde(default, alias = "age_min", deserialize_with = "lenient::opt_u32")]
    pub age_min: Option<u32>,
    #[serde(default, alias = "age_max", deserialize_with = "lenient::opt_u32")]
    pub age_max: Option<u32>,
    #[serde(default, alias = "residency_required", deserialize_with = "lenient::opt_bool")]
    pub residency_required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorFieldCriteria {
    #[serde(default, alias = "eligible_majors", deserialize_with = "lenient::string_list")]
    pub eligible_majors: Vec<String>,
    #[serde(default, alias = "excluded_majors", deserialize_with = "lenient::string_list")]
    pub excluded_majors: Vec<String>,
    #[serde(default, alias = "required_field_of_study", deserialize_with = "lenient::string_list")]
    pub required_field_of_study: Vec<String>,
    #[serde(default, alias = "career_goals_keywords", deserialize_with = "lenient::string_list")]
    pub career_goals_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceCriteria {
    #[serde(default, alias = "min_volunteer_hours", deserialize_with = "lenient::opt_f64")]
    pub min_volunteer_hours: Option<f64>,
    #[serde(default, alias = "leadership_required", deserialize_with = "lenient::opt_bool")]
    pub leadership_required: Option<bool>,
    #[serde(default, alias = "required_extracurriculars", deserialize_with = "lenient::string_list")]
    pub required_extracurriculars: Vec<String>,
    /// Minimum total months of work experience
    #[serde(default, alias = "min_work_experience", deserialize_with = "lenient::opt_u32")]
    pub min_work_experience: Option<u32>,
    #[serde(default, alias = "awards_honors_required", deserialize_with = "lenient::opt_bool")]
    pub awards_honors_required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialCriteria {
    #[serde(rename = "requiresFinancialNeed", alias = "requires_financial_need", default, deserialize_with = "lenient::opt_bool")]
    pub requires_financial_need: Option<bool>,
    #[serde(rename = "financialNeedLevel", alias = "financial_need_level", default)]
    pub financial_need_level: Option<FinancialNeed>,
    #[serde(rename = "pellGrantRequired", alias = "pell_grant_required", default, deserialize_with = "lenient::opt_bool")]
    pub pell_grant_required: Option<bool>,
    #[serde(rename = "maxEFC", alias = "maxEfc", alias = "max_efc", default, deserialize_with = "lenient::opt_f64")]
    pub max_efc: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialCriteria {
    #[serde(default, alias = "first_generation_required", deserialize_with = "lenient::opt_bool")]
    pub first_generation_required: Option<bool>,
    #[serde(default, alias = "military_affiliation", deserialize_with = "lenient::opt_string")]
    pub military_affiliation: Option<String>,
    #[serde(default, alias = "disability_required", deserialize_with = "lenient::opt_bool")]
    pub disability_required: Option<bool>,
    #[serde(default, alias = "citizenship_required", deserialize_with = "lenient::string_list")]
    pub citizenship_required: Vec<String>,
}

/// Criteria as handed to the engine: already typed, a raw JSON document,
/// or an already-decoded JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CriteriaInput {
    Typed(EligibilityCriteria),
    Json(String),
    Value(serde_json::Value),
}

impl Default for CriteriaInput {
    fn default() -> Self {
        CriteriaInput::Typed(EligibilityCriteria::default())
    }
}

impl From<EligibilityCriteria> for CriteriaInput {
    fn from(criteria: EligibilityCriteria) -> Self {
        CriteriaInput::Typed(criteria)
    }
}

impl<'de> Deserialize<'de> for CriteriaInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Typed decoding is deferred to the criteria parser so that a bad
        // payload surfaces as MalformedCriteria instead of a transport error.
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) => Ok(CriteriaInput::Json(raw)),
            other => Ok(CriteriaInput::Value(other)),
        }
    }
}

/// A scholarship as seen by the scoring engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub award_amount: Option<f64>,
    #[serde(default)]
    pub criteria: CriteriaInput,
    #[serde(default)]
    pub requirements: ApplicationRequirements,
    #[serde(default)]
    pub competition: CompetitionStats,
}

impl Scholarship {
    pub fn new(criteria: impl Into<CriteriaInput>) -> Self {
        Self {
            criteria: criteria.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_award(mut self, amount: f64) -> Self {
        self.award_amount = Some(amount);
        self
    }

    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<unnamed>")
    }
}

/// What an applicant has to submit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequirements {
    #[serde(default)]
    pub essay_count: u32,
    #[serde(default)]
    pub document_count: u32,
    #[serde(default)]
    pub recommendation_count: u32,
    #[serde(default)]
    pub interview_required: bool,
    #[serde(default)]
    pub portfolio_required: bool,
}

/// Applicant pool metadata used to derive the competition factor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStats {
    #[serde(default)]
    pub applicant_pool_size: Option<u32>,
    #[serde(default)]
    pub awards_available: Option<u32>,
    /// Fraction in (0, 1]; values above 1 are read as percentages
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub acceptance_rate: Option<f64>,
}

/// Field decoders that accept the loosely-typed shapes criteria payloads
/// arrive in: numeric strings, single strings for lists, "yes"/"no" flags.
pub(crate) mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Number(f64),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Number(n)) if n.is_finite() => Ok(Some(n)),
            Some(Scalar::Number(n)) => Err(de::Error::custom(format!("non-finite number {n}"))),
            Some(Scalar::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("expected a number, found {text:?}")))
            }
            Some(Scalar::Bool(b)) => Err(de::Error::custom(format!("expected a number, found {b}"))),
        }
    }

    pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match opt_f64(deserializer)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n <= u32::MAX as f64 => Ok(Some(n.round() as u32)),
            Some(n) => Err(de::Error::custom(format!("expected a non-negative integer, found {n}"))),
        }
    }

    pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Bool(b)) => Ok(Some(b)),
            Some(Scalar::Number(n)) => Ok(Some(n != 0.0)),
            Some(Scalar::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" | "yes" | "y" | "1" => Ok(Some(true)),
                "false" | "no" | "n" | "0" => Ok(Some(false)),
                _ => Err(de::Error::custom(format!("expected a boolean, found {text:?}"))),
            },
        }
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(value)) => vec![value],
            Some(OneOrMany::Many(values)) => values,
        };

        Ok(values
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_accepts_numeric_strings() {
        let academic: AcademicCriteria =
            serde_json::from_str(r#"{"minGPA": "3.5", "minSAT": 1200, "maxACT": null}"#).unwrap();
        assert_eq!(academic.min_gpa, Some(3.5));
        assert_eq!(academic.min_sat, Some(1200));
        assert_eq!(academic.max_act, None);
    }

    #[test]
    fn test_string_list_accepts_single_value() {
        let demographic: DemographicCriteria =
            serde_json::from_str(r#"{"requiredState": "CA", "requiredCity": ["", " Fresno "]}"#)
                .unwrap();
        assert_eq!(demographic.required_state, vec!["CA"]);
        assert_eq!(demographic.required_city, vec!["Fresno"]);
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let result: Result<AcademicCriteria, _> = serde_json::from_str(r#"{"minGPA": "high"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_criteria_input_keeps_strings_raw() {
        let input: CriteriaInput = serde_json::from_str(r#""{\"academic\":{}}""#).unwrap();
        assert_eq!(input, CriteriaInput::Json(r#"{"academic":{}}"#.to_string()));

        let input: CriteriaInput = serde_json::from_str(r#"{"academic":{}}"#).unwrap();
        assert!(matches!(input, CriteriaInput::Value(_)));
    }
}
