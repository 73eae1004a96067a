use serde_json::json;

use super::{contains_text, in_list, same_text, Findings, NoFindings, Shortfall, SubScores};
use crate::models::{MajorFieldCriteria, StudentProfile};

const MAJOR_WEIGHT: f64 = 0.50;
const FIELD_WEIGHT: f64 = 0.30;
const CAREER_WEIGHT: f64 = 0.20;

const EXACT_MATCH: f64 = 100.0;
const PARTIAL_MATCH: f64 = 75.0;
const RELATED_MATCH: f64 = 50.0;

/// Broad groupings used for "related field" matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldFamily {
    Stem,
    Engineering,
    Business,
    Health,
    Arts,
    Humanities,
    SocialSciences,
    Education,
}

// Keywords of four or more characters also match as word prefixes
// ("math" -> "mathematics"); shorter ones must match a whole word.
const FAMILY_KEYWORDS: &[(FieldFamily, &[&str])] = &[
    (
        FieldFamily::Stem,
        &[
            "biology", "bio", "chemistry", "chem", "physics", "math", "statistics", "computer",
            "computing", "data", "astronomy", "geology", "environmental", "neuroscience",
            "biochemistry", "stem", "information", "technology",
        ],
    ),
    (
        FieldFamily::Engineering,
        &[
            "engineering", "engineer", "mechanical", "electrical", "civil", "aerospace", "robotics",
            "biomedical",
        ],
    ),
    (
        FieldFamily::Business,
        &[
            "business", "finance", "accounting", "economics", "marketing", "management",
            "entrepreneurship", "administration",
        ],
    ),
    (
        FieldFamily::Health,
        &[
            "nursing", "medicine", "medical", "premed", "pre-med", "health", "pharmacy", "dental",
            "dentistry", "kinesiology", "biomedical", "nutrition", "therapy",
        ],
    ),
    (
        FieldFamily::Arts,
        &[
            "art", "arts", "music", "theater", "theatre", "dance", "design", "film", "photography",
            "fine",
        ],
    ),
    (
        FieldFamily::Humanities,
        &[
            "english", "history", "philosophy", "literature", "languages", "classics", "religion",
            "linguistics", "humanities", "writing",
        ],
    ),
    (
        FieldFamily::SocialSciences,
        &[
            "psychology", "sociology", "political", "anthropology", "criminal", "social",
            "geography", "communication",
        ],
    ),
    (
        FieldFamily::Education,
        &["education", "teaching", "pedagogy"],
    ),
];

/// Major/field dimension score (0-100)
///
/// An intended major on the exclusion list scores 0 before anything else is
/// looked at. Otherwise: eligible majors 50%, field of study 30%, career
/// goal keywords 20%, over the stated sub-criteria.
pub fn score_major_field(profile: &StudentProfile, criteria: Option<&MajorFieldCriteria>) -> u8 {
    evaluate_major_field(profile, criteria, &mut NoFindings)
}

pub fn evaluate_major_field<F: Findings>(
    profile: &StudentProfile,
    criteria: Option<&MajorFieldCriteria>,
    findings: &mut F,
) -> u8 {
    let Some(criteria) = criteria else {
        return 100;
    };

    if let Some(major) = profile.intended_major.as_deref() {
        if in_list(major, &criteria.excluded_majors) {
            findings.detail("excluded", || json!(true));
            findings.missing(|| Shortfall::fixed(format!("{major} is excluded from eligibility")));
            return 0;
        }
    }

    let mut scores = SubScores::default();

    if !criteria.eligible_majors.is_empty() {
        scores.add(
            MAJOR_WEIGHT,
            tiered_score(
                "Intended major",
                profile.intended_major.as_deref(),
                &criteria.eligible_majors,
                findings,
            ),
        );
    }

    if !criteria.required_field_of_study.is_empty() {
        // Students often only fill in an intended major.
        let field = profile
            .field_of_study
            .as_deref()
            .or(profile.intended_major.as_deref());
        scores.add(
            FIELD_WEIGHT,
            tiered_score("Field of study", field, &criteria.required_field_of_study, findings),
        );
    }

    if !criteria.career_goals_keywords.is_empty() {
        scores.add(
            CAREER_WEIGHT,
            career_score(profile, &criteria.career_goals_keywords, findings),
        );
    }

    scores.finish()
}

/// Best tier across the accepted values: exact, partial, related family, none
fn tiered_score<F: Findings>(
    label: &'static str,
    value: Option<&str>,
    accepted: &[String],
    findings: &mut F,
) -> f64 {
    let Some(value) = value else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("{label} not provided (eligible: {})", accepted.join(", ")),
                format!("Add your {} to your profile", label.to_lowercase()),
            )
        });
        return 0.0;
    };

    let (best, matched) = accepted
        .iter()
        .map(|candidate| (match_tier(value, candidate), candidate))
        .fold((0.0, None), |(best, matched), (tier, candidate)| {
            if tier > best {
                (tier, Some(candidate))
            } else {
                (best, matched)
            }
        });

    match matched {
        Some(_) if best >= EXACT_MATCH => {
            findings.met(|| format!("{label} {value} is an eligible field"));
        }
        Some(candidate) if best >= PARTIAL_MATCH => {
            findings.missing(|| {
                Shortfall::actionable(
                    format!("{label} {value} only partially matches {candidate}"),
                    format!("Confirm with the sponsor that {value} counts as {candidate}"),
                )
            });
        }
        Some(candidate) => {
            findings.missing(|| {
                Shortfall::actionable(
                    format!("{label} {value} is only related to {candidate}"),
                    format!("Consider coursework or a minor in {candidate}"),
                )
            });
        }
        None => {
            findings.missing(|| {
                Shortfall::fixed(format!(
                    "{label} {value} not among eligible fields ({})",
                    accepted.join(", ")
                ))
            });
        }
    }

    best
}

fn match_tier(value: &str, candidate: &str) -> f64 {
    if same_text(value, candidate) {
        EXACT_MATCH
    } else if contains_text(value, candidate) || contains_text(candidate, value) {
        PARTIAL_MATCH
    } else if shares_family(value, candidate) {
        RELATED_MATCH
    } else {
        0.0
    }
}

fn shares_family(a: &str, b: &str) -> bool {
    let b_families: Vec<FieldFamily> = families(b).collect();
    families(a).any(|f| b_families.contains(&f))
}

fn families(field: &str) -> impl Iterator<Item = FieldFamily> + '_ {
    let lowered = field.to_lowercase();
    let words: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    FAMILY_KEYWORDS
        .iter()
        .filter(move |(_, keywords)| {
            keywords.iter().any(|keyword| {
                words
                    .iter()
                    .any(|w| w == keyword || (keyword.len() >= 4 && w.starts_with(keyword)))
            })
        })
        .map(|(family, _)| *family)
}

fn career_score<F: Findings>(profile: &StudentProfile, keywords: &[String], findings: &mut F) -> f64 {
    let Some(goals) = profile.career_goals.as_deref() else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Career goals not provided (looking for: {})", keywords.join(", ")),
                "Describe your career goals in your profile",
            )
        });
        return 0.0;
    };

    let (found, absent): (Vec<&String>, Vec<&String>) =
        keywords.iter().partition(|k| contains_text(goals, k));
    findings.detail("careerKeywordsMatched", || json!(found));

    if absent.is_empty() {
        findings.met(|| "Career goals align with the scholarship's focus".to_string());
    } else {
        findings.missing(|| {
            let absent: Vec<&str> = absent.iter().map(|s| s.as_str()).collect();
            Shortfall::actionable(
                format!("Career goals do not mention: {}", absent.join(", ")),
                format!("Connect your career goals to {}", absent.join(", ")),
            )
        });
    }

    100.0 * found.len() as f64 / keywords.len() as f64
}
