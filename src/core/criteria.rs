use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::models::{CriteriaInput, DemographicCriteria, EligibilityCriteria, SpecialCriteria};

/// Turn a criteria payload into the six typed dimension groups.
///
/// Malformed JSON is an error. A structurally valid but empty document
/// (`{}`, `null`, blank string) means "no requirements".
pub fn parse_criteria(input: &CriteriaInput) -> Result<EligibilityCriteria> {
    let criteria = match input {
        CriteriaInput::Typed(criteria) => criteria.clone(),
        CriteriaInput::Json(raw) => parse_json(raw)?,
        CriteriaInput::Value(value) => parse_value(value)?,
    };

    Ok(normalize(criteria))
}

/// Parse a JSON-encoded criteria document
pub fn parse_json(raw: &str) -> Result<EligibilityCriteria> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(EligibilityCriteria::default());
    }

    let value: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
        tracing::warn!("Rejecting criteria payload: {}", e);
        EngineError::from(e)
    })?;

    parse_value(&value)
}

fn parse_value(value: &serde_json::Value) -> Result<EligibilityCriteria> {
    match value {
        serde_json::Value::Null => Ok(EligibilityCriteria::default()),
        serde_json::Value::Object(_) => EligibilityCriteria::deserialize(value).map_err(|e| {
            tracing::warn!("Rejecting criteria payload: {}", e);
            EngineError::from(e)
        }),
        other => Err(EngineError::MalformedCriteria(format!(
            "expected a criteria object, found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Apply the same cleanup to typed and decoded criteria
fn normalize(mut criteria: EligibilityCriteria) -> EligibilityCriteria {
    if let Some(demographic) = criteria.demographic.as_mut() {
        normalize_demographic(demographic);
    }
    if let Some(major) = criteria.major_field.as_mut() {
        strip_blank(&mut major.eligible_majors);
        strip_blank(&mut major.excluded_majors);
        strip_blank(&mut major.required_field_of_study);
        strip_blank(&mut major.career_goals_keywords);
    }
    if let Some(experience) = criteria.experience.as_mut() {
        strip_blank(&mut experience.required_extracurriculars);
    }
    if let Some(special) = criteria.special.as_mut() {
        normalize_special(special);
    }
    criteria
}

fn normalize_demographic(demographic: &mut DemographicCriteria) {
    let unrestricted = demographic
        .required_gender
        .as_deref()
        .map(|g| {
            let g = g.trim();
            g.is_empty() || g.eq_ignore_ascii_case("any") || g.eq_ignore_ascii_case("all")
        })
        .unwrap_or(false);
    if unrestricted {
        demographic.required_gender = None;
    }

    strip_blank(&mut demographic.required_ethnicity);
    strip_blank(&mut demographic.required_state);
    strip_blank(&mut demographic.required_city);
}

fn normalize_special(special: &mut SpecialCriteria) {
    if special
        .military_affiliation
        .as_deref()
        .map(|m| m.trim().is_empty() || m.eq_ignore_ascii_case("none"))
        .unwrap_or(false)
    {
        special.military_affiliation = None;
    }
    strip_blank(&mut special.citizenship_required);
}

fn strip_blank(values: &mut Vec<String>) {
    values.retain(|v| !v.trim().is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AcademicCriteria;

    #[test]
    fn test_empty_object_means_no_requirements() {
        let criteria = parse_criteria(&CriteriaInput::Json("{}".to_string())).unwrap();
        assert!(criteria.is_empty());

        let criteria = parse_criteria(&CriteriaInput::Json("   ".to_string())).unwrap();
        assert!(criteria.is_empty());

        let criteria = parse_criteria(&CriteriaInput::Value(serde_json::Value::Null)).unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_criteria(&CriteriaInput::Json("{\"academic\": ".to_string())).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCriteria(_)));
    }

    #[test]
    fn test_non_object_payload_is_an_error() {
        let err = parse_criteria(&CriteriaInput::Json("[1, 2]".to_string())).unwrap_err();
        assert_eq!(
            err,
            EngineError::MalformedCriteria("expected a criteria object, found an array".to_string())
        );
    }

    #[test]
    fn test_json_string_parses_groups() {
        let raw = r#"{
            "academic": {"minGPA": 3.5, "minSAT": "1200"},
            "majorField": {"eligibleMajors": "Biology"},
            "specialCriteria": {"firstGenerationRequired": "yes"}
        }"#;
        let criteria = parse_criteria(&CriteriaInput::Json(raw.to_string())).unwrap();

        let academic = criteria.academic.unwrap();
        assert_eq!(academic.min_gpa, Some(3.5));
        assert_eq!(academic.min_sat, Some(1200));
        assert_eq!(criteria.major_field.unwrap().eligible_majors, vec!["Biology"]);
        assert_eq!(criteria.special.unwrap().first_generation_required, Some(true));
        assert!(criteria.demographic.is_none());
    }

    #[test]
    fn test_any_gender_is_dropped() {
        let criteria = EligibilityCriteria {
            demographic: Some(DemographicCriteria {
                required_gender: Some("Any".to_string()),
                required_state: vec!["".to_string(), "TX".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let parsed = parse_criteria(&CriteriaInput::Typed(criteria)).unwrap();
        let demographic = parsed.demographic.unwrap();
        assert_eq!(demographic.required_gender, None);
        assert_eq!(demographic.required_state, vec!["TX"]);
    }

    #[test]
    fn test_typed_input_passes_through() {
        let criteria = EligibilityCriteria {
            academic: Some(AcademicCriteria {
                min_gpa: Some(3.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let parsed = parse_criteria(&criteria.clone().into()).unwrap();
        assert_eq!(parsed, criteria);
    }
}
