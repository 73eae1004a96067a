use serde_json::json;

use super::{in_list, max_requirement, min_requirement, same_text, Findings, NoFindings, Shortfall, SubScores};
use crate::models::{DemographicCriteria, StudentProfile};

/// Demographic dimension score (0-100)
///
/// Unweighted mean over the stated checks: gender, ethnicity, state, city,
/// age range and residency.
pub fn score_demographic(profile: &StudentProfile, criteria: Option<&DemographicCriteria>) -> u8 {
    evaluate_demographic(profile, criteria, &mut NoFindings)
}

pub fn evaluate_demographic<F: Findings>(
    profile: &StudentProfile,
    criteria: Option<&DemographicCriteria>,
    findings: &mut F,
) -> u8 {
    let Some(criteria) = criteria else {
        return 100;
    };

    let mut scores = SubScores::default();

    if let Some(required) = criteria.required_gender.as_deref() {
        scores.add_equal(gender_score(profile, required, findings));
    }

    if !criteria.required_ethnicity.is_empty() {
        scores.add_equal(ethnicity_score(profile, &criteria.required_ethnicity, findings));
    }

    if !criteria.required_state.is_empty() {
        scores.add_equal(membership_score(
            "State",
            profile.state.as_deref(),
            &criteria.required_state,
            findings,
        ));
    }

    if !criteria.required_city.is_empty() {
        scores.add_equal(membership_score(
            "City",
            profile.city.as_deref(),
            &criteria.required_city,
            findings,
        ));
    }

    if criteria.age_min.is_some() || criteria.age_max.is_some() {
        scores.add_equal(age_score(profile, criteria.age_min, criteria.age_max, findings));
    }

    if criteria.residency_required == Some(true) {
        scores.add_equal(residency_score(profile, &criteria.required_state, findings));
    }

    scores.finish()
}

fn gender_score<F: Findings>(profile: &StudentProfile, required: &str, findings: &mut F) -> f64 {
    findings.detail("requiredGender", || json!(required));

    match profile.gender.as_deref() {
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    format!("Gender not provided ({required} applicants only)"),
                    "Add your gender to your profile",
                )
            });
            0.0
        }
        Some(gender) if same_text(gender, required) => {
            findings.met(|| format!("Gender matches requirement ({required})"));
            100.0
        }
        Some(_) => {
            findings.missing(|| Shortfall::fixed(format!("Open only to {required} applicants")));
            0.0
        }
    }
}

fn ethnicity_score<F: Findings>(profile: &StudentProfile, required: &[String], findings: &mut F) -> f64 {
    findings.detail("requiredEthnicity", || json!(required));

    if profile.ethnicity.is_empty() {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Ethnicity not provided (requires one of: {})", required.join(", ")),
                "Add your ethnicity to your profile",
            )
        });
        return 0.0;
    }

    match profile.ethnicity.iter().find(|e| in_list(e, required)) {
        Some(matched) => {
            findings.met(|| format!("Ethnicity matches requirement ({matched})"));
            100.0
        }
        None => {
            findings.missing(|| {
                Shortfall::fixed(format!("Open only to applicants who are {}", required.join(", ")))
            });
            0.0
        }
    }
}

fn membership_score<F: Findings>(
    label: &'static str,
    value: Option<&str>,
    required: &[String],
    findings: &mut F,
) -> f64 {
    match value {
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    format!("{label} not provided (requires one of: {})", required.join(", ")),
                    format!("Add your {} to your profile", label.to_lowercase()),
                )
            });
            0.0
        }
        Some(value) if in_list(value, required) => {
            findings.met(|| format!("{label} {value} is eligible"));
            100.0
        }
        Some(value) => {
            findings.missing(|| {
                Shortfall::fixed(format!(
                    "{label} {value} not eligible (requires one of: {})",
                    required.join(", ")
                ))
            });
            0.0
        }
    }
}

fn age_score<F: Findings>(
    profile: &StudentProfile,
    min: Option<u32>,
    max: Option<u32>,
    findings: &mut F,
) -> f64 {
    let range = || match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!("{min}+"),
        (None, Some(max)) => format!("up to {max}"),
        (None, None) => String::new(),
    };

    let Some(age) = profile.age else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Age not provided (ages {} eligible)", range()),
                "Add your age to your profile",
            )
        });
        return 0.0;
    };
    findings.detail("age", || json!(age));

    let mut score = 100.0;
    if let Some(min) = min {
        score = f64::min(score, min_requirement(age as f64, min as f64));
    }
    if let Some(max) = max {
        score = f64::min(score, max_requirement(age as f64, max as f64));
    }

    if score < 100.0 {
        findings.missing(|| Shortfall::fixed(format!("Age {age} outside eligible range {}", range())));
    } else {
        findings.met(|| format!("Age {age} within eligible range {}", range()));
    }
    score
}

/// Residency is satisfied by a known state of residence, which must be one
/// of the required states when the scholarship lists any.
fn residency_score<F: Findings>(profile: &StudentProfile, states: &[String], findings: &mut F) -> f64 {
    match profile.state.as_deref() {
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    "State of residence not provided (residency required)",
                    "Add your state of residence to your profile",
                )
            });
            0.0
        }
        Some(state) if states.is_empty() || in_list(state, states) => {
            findings.met(|| format!("Residency requirement met ({state})"));
            100.0
        }
        Some(state) => {
            findings.missing(|| Shortfall::fixed(format!("Residency in {state} does not qualify")));
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dimensions::Narrative;

    fn profile() -> StudentProfile {
        StudentProfile {
            gender: Some("Female".to_string()),
            ethnicity: vec!["Hispanic".to_string()],
            state: Some("CA".to_string()),
            city: Some("Fresno".to_string()),
            age: Some(19),
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_criteria_scores_100() {
        assert_eq!(score_demographic(&profile(), None), 100);
    }

    #[test]
    fn test_gender_mismatch_scores_zero() {
        let criteria = DemographicCriteria {
            required_gender: Some("Male".to_string()),
            ..Default::default()
        };
        assert_eq!(score_demographic(&profile(), Some(&criteria)), 0);
    }

    #[test]
    fn test_mean_over_present_checks() {
        let criteria = DemographicCriteria {
            required_gender: Some("female".to_string()),
            required_state: vec!["TX".to_string()],
            ..Default::default()
        };
        assert_eq!(score_demographic(&profile(), Some(&criteria)), 50);
    }

    #[test]
    fn test_case_insensitive_membership() {
        let criteria = DemographicCriteria {
            required_ethnicity: vec!["hispanic".to_string(), "Black".to_string()],
            required_city: vec!["FRESNO".to_string()],
            ..Default::default()
        };
        assert_eq!(score_demographic(&profile(), Some(&criteria)), 100);
    }

    #[test]
    fn test_age_range() {
        let criteria = DemographicCriteria {
            age_min: Some(17),
            age_max: Some(18),
            ..Default::default()
        };
        // one year over an 18 cap: 100 - 100 / 18
        assert_eq!(score_demographic(&profile(), Some(&criteria)), 94);
    }

    #[test]
    fn test_unknown_attribute_scores_zero() {
        let criteria = DemographicCriteria {
            required_state: vec!["CA".to_string()],
            ..Default::default()
        };
        let unknown = StudentProfile::default();
        assert_eq!(score_demographic(&unknown, Some(&criteria)), 0);
    }

    #[test]
    fn test_residency_uses_required_states() {
        let criteria = DemographicCriteria {
            residency_required: Some(true),
            ..Default::default()
        };
        assert_eq!(score_demographic(&profile(), Some(&criteria)), 100);

        let criteria = DemographicCriteria {
            residency_required: Some(true),
            required_state: vec!["NY".to_string()],
            ..Default::default()
        };
        assert_eq!(score_demographic(&profile(), Some(&criteria)), 0);
    }

    #[test]
    fn test_gender_mismatch_is_not_actionable() {
        let criteria = DemographicCriteria {
            required_gender: Some("Male".to_string()),
            ..Default::default()
        };
        let mut narrative = Narrative::default();
        evaluate_demographic(&profile(), Some(&criteria), &mut narrative);
        assert_eq!(narrative.missing.len(), 1);
        assert!(narrative.missing[0].action.is_none());
    }
}
