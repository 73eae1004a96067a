use serde_json::json;

use super::{in_list, same_text, Findings, NoFindings, Shortfall, SubScores};
use crate::models::{SpecialCriteria, StudentProfile};

const RELATED_AFFILIATION: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affiliation {
    ActiveDuty,
    Veteran,
    Reserve,
    NationalGuard,
    Spouse,
    Dependent,
}

impl Affiliation {
    fn classify(raw: &str) -> Option<Self> {
        let lowered = raw.to_lowercase();
        // Family labels often name the member's status, so they go first
        if lowered.contains("spouse") {
            Some(Affiliation::Spouse)
        } else if lowered.contains("dependent") || lowered.contains("child") {
            Some(Affiliation::Dependent)
        } else if lowered.contains("veteran") {
            Some(Affiliation::Veteran)
        } else if lowered.contains("guard") {
            Some(Affiliation::NationalGuard)
        } else if lowered.contains("reserv") {
            Some(Affiliation::Reserve)
        } else if lowered.contains("active") {
            Some(Affiliation::ActiveDuty)
        } else {
            None
        }
    }

    /// Whether a student with `self` partially satisfies a `required` affiliation
    fn related_to(self, required: Affiliation) -> bool {
        use Affiliation::*;
        matches!(
            (self, required),
            (ActiveDuty | Reserve | NationalGuard, Veteran)
                | (Reserve | NationalGuard, ActiveDuty)
                | (Spouse, Dependent)
                | (Dependent, Spouse)
        )
    }
}

/// Special-criteria dimension score (0-100)
///
/// Unweighted mean over the stated checks: first generation, military
/// affiliation, disability and citizenship.
pub fn score_special(profile: &StudentProfile, criteria: Option<&SpecialCriteria>) -> u8 {
    evaluate_special(profile, criteria, &mut NoFindings)
}

pub fn evaluate_special<F: Findings>(
    profile: &StudentProfile,
    criteria: Option<&SpecialCriteria>,
    findings: &mut F,
) -> u8 {
    let Some(criteria) = criteria else {
        return 100;
    };

    let mut scores = SubScores::default();

    if criteria.first_generation_required == Some(true) {
        scores.add_equal(first_generation_score(profile, findings));
    }

    if let Some(required) = criteria.military_affiliation.as_deref() {
        scores.add_equal(military_score(profile, required, findings));
    }

    if criteria.disability_required == Some(true) {
        scores.add_equal(disability_score(profile, findings));
    }

    if !criteria.citizenship_required.is_empty() {
        scores.add_equal(citizenship_score(profile, &criteria.citizenship_required, findings));
    }

    scores.finish()
}

fn first_generation_score<F: Findings>(profile: &StudentProfile, findings: &mut F) -> f64 {
    match profile.first_generation {
        Some(true) => {
            findings.met(|| "First-generation college student".to_string());
            100.0
        }
        Some(false) => {
            findings.missing(|| Shortfall::fixed("Open only to first-generation college students"));
            0.0
        }
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    "First-generation status not provided (required)",
                    "Add your first-generation status to your profile",
                )
            });
            0.0
        }
    }
}

fn military_score<F: Findings>(profile: &StudentProfile, required: &str, findings: &mut F) -> f64 {
    findings.detail("militaryAffiliation", || json!(required));

    let student = profile
        .military_affiliation
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case("none"));

    let Some(student) = student else {
        findings.missing(|| {
            Shortfall::fixed(format!("Requires military affiliation ({required})"))
        });
        return 0.0;
    };

    let score = if same_text(required, "any") || same_text(student, required) {
        100.0
    } else {
        match (Affiliation::classify(student), Affiliation::classify(required)) {
            (Some(s), Some(r)) if s == r => 100.0,
            (Some(s), Some(r)) if s.related_to(r) => RELATED_AFFILIATION,
            _ => 0.0,
        }
    };

    if score >= 100.0 {
        findings.met(|| format!("Military affiliation matches ({student})"));
    } else if score > 0.0 {
        findings.missing(|| {
            Shortfall::fixed(format!("{student} affiliation is related to required {required}"))
        });
    } else {
        findings.missing(|| {
            Shortfall::fixed(format!("{student} affiliation does not meet required {required}"))
        });
    }
    score
}

fn disability_score<F: Findings>(profile: &StudentProfile, findings: &mut F) -> f64 {
    match profile.disabilities.as_deref() {
        Some(list) if !list.is_empty() => {
            findings.met(|| "Disability requirement met".to_string());
            100.0
        }
        Some(_) => {
            findings.missing(|| Shortfall::fixed("Open only to students with a documented disability"));
            0.0
        }
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    "Disability status not provided (required)",
                    "Add your disability status to your profile",
                )
            });
            0.0
        }
    }
}

fn citizenship_score<F: Findings>(profile: &StudentProfile, required: &[String], findings: &mut F) -> f64 {
    findings.detail("citizenshipRequired", || json!(required));

    let Some(citizenship) = profile.citizenship.as_deref() else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Citizenship not provided (requires: {})", required.join(", ")),
                "Add your citizenship status to your profile",
            )
        });
        return 0.0;
    };

    // A citizen satisfies any permanent-resident requirement.
    let qualifies = in_list(citizenship, required)
        || (is_us_citizen(citizenship) && required.iter().any(|r| is_us_citizen(r) || is_permanent_resident(r)));

    if qualifies {
        findings.met(|| format!("Citizenship requirement met ({citizenship})"));
        100.0
    } else {
        findings.missing(|| {
            Shortfall::fixed(format!("Requires citizenship status: {}", required.join(", ")))
        });
        0.0
    }
}

fn is_us_citizen(value: &str) -> bool {
    let lowered = value.to_lowercase().replace('.', "");
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    words.contains(&"citizen")
        && !words.contains(&"non")
        && (words.contains(&"us") || lowered.contains("united states") || words == ["citizen"])
}

fn is_permanent_resident(value: &str) -> bool {
    let lowered = value.to_lowercase();
    lowered.contains("permanent resident") || lowered.contains("green card")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn military(student: &str, required: &str) -> u8 {
        let profile = StudentProfile {
            military_affiliation: Some(student.to_string()),
            ..Default::default()
        };
        let criteria = SpecialCriteria {
            military_affiliation: Some(required.to_string()),
            ..Default::default()
        };
        score_special(&profile, Some(&criteria))
    }

    #[test]
    fn test_absent_criteria_scores_100() {
        assert_eq!(score_special(&StudentProfile::default(), None), 100);
    }

    #[test]
    fn test_military_tiers() {
        assert_eq!(military("Veteran", "veteran"), 100);
        assert_eq!(military("Active Duty", "Veteran"), 75);
        assert_eq!(military("National Guard", "Active Duty"), 75);
        assert_eq!(military("Military Spouse", "Military Dependent"), 75);
        assert_eq!(military("Veteran", "Active Duty"), 0);
        assert_eq!(military("Reserve", "Any"), 100);
        assert_eq!(military("None", "Veteran"), 0);
    }

    #[test]
    fn test_family_labels_are_not_service_status() {
        assert_eq!(military("Child of a Veteran", "Veteran"), 0);
        assert_eq!(military("Veteran", "Veteran Dependent"), 0);
        assert_eq!(military("Spouse of Active Duty member", "Military Spouse"), 100);
        assert_eq!(military("Child of a Veteran", "Military Spouse"), 75);
    }

    #[test]
    fn test_mean_over_checks() {
        let profile = StudentProfile {
            first_generation: Some(true),
            disabilities: Some(vec![]),
            ..Default::default()
        };
        let criteria = SpecialCriteria {
            first_generation_required: Some(true),
            disability_required: Some(true),
            ..Default::default()
        };
        assert_eq!(score_special(&profile, Some(&criteria)), 50);
    }

    #[test]
    fn test_citizenship() {
        let criteria = SpecialCriteria {
            citizenship_required: vec!["Permanent Resident".to_string()],
            ..Default::default()
        };
        let citizen = StudentProfile {
            citizenship: Some("U.S. Citizen".to_string()),
            ..Default::default()
        };
        assert_eq!(score_special(&citizen, Some(&criteria)), 100);

        let international = StudentProfile {
            citizenship: Some("International".to_string()),
            ..Default::default()
        };
        assert_eq!(score_special(&international, Some(&criteria)), 0);
        assert_eq!(score_special(&StudentProfile::default(), Some(&criteria)), 0);
    }

    #[test]
    fn test_non_citizen_is_not_a_citizen() {
        assert!(!is_us_citizen("Non-citizen"));
        assert!(is_us_citizen("US Citizen"));
        assert!(is_us_citizen("Citizen"));
    }
}
