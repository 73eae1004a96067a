use serde_json::json;

use super::{contains_text, fmt_num, min_requirement, Findings, NoFindings, Shortfall, SubScores};
use crate::models::{ExperienceCriteria, StudentProfile};

const VOLUNTEER_WEIGHT: f64 = 0.30;
const LEADERSHIP_WEIGHT: f64 = 0.25;
const EXTRACURRICULAR_WEIGHT: f64 = 0.20;
const WORK_WEIGHT: f64 = 0.15;
const AWARDS_WEIGHT: f64 = 0.10;

/// Experience dimension score (0-100)
pub fn score_experience(profile: &StudentProfile, criteria: Option<&ExperienceCriteria>) -> u8 {
    evaluate_experience(profile, criteria, &mut NoFindings)
}

pub fn evaluate_experience<F: Findings>(
    profile: &StudentProfile,
    criteria: Option<&ExperienceCriteria>,
    findings: &mut F,
) -> u8 {
    let Some(criteria) = criteria else {
        return 100;
    };

    let mut scores = SubScores::default();

    if let Some(min) = criteria.min_volunteer_hours.filter(|h| *h > 0.0) {
        scores.add(VOLUNTEER_WEIGHT, volunteer_score(profile, min, findings));
    }

    if criteria.leadership_required == Some(true) {
        scores.add(LEADERSHIP_WEIGHT, leadership_score(profile, findings));
    }

    if !criteria.required_extracurriculars.is_empty() {
        scores.add(
            EXTRACURRICULAR_WEIGHT,
            extracurricular_score(profile, &criteria.required_extracurriculars, findings),
        );
    }

    if let Some(min) = criteria.min_work_experience.filter(|m| *m > 0) {
        scores.add(WORK_WEIGHT, work_score(profile, min, findings));
    }

    if criteria.awards_honors_required == Some(true) {
        scores.add(AWARDS_WEIGHT, awards_score(profile, findings));
    }

    scores.finish()
}

fn volunteer_score<F: Findings>(profile: &StudentProfile, min: f64, findings: &mut F) -> f64 {
    findings.detail("minVolunteerHours", || json!(min));

    let Some(hours) = profile.volunteer_hours else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Volunteer hours not provided (minimum {} required)", fmt_num(min)),
                "Add your volunteer hours to your profile",
            )
        });
        return 0.0;
    };
    findings.detail("volunteerHours", || json!(hours));

    let score = min_requirement(hours, min);
    if score < 100.0 {
        let gap = min - hours;
        findings.missing(|| {
            Shortfall::actionable(
                format!(
                    "{} volunteer hours below minimum {}, need {} more",
                    fmt_num(hours),
                    fmt_num(min),
                    fmt_num(gap)
                ),
                format!("Gain {} more volunteer hours", fmt_num(gap)),
            )
        });
    } else {
        findings.met(|| format!("{} volunteer hours meets minimum {}", fmt_num(hours), fmt_num(min)));
    }
    score
}

fn leadership_score<F: Findings>(profile: &StudentProfile, findings: &mut F) -> f64 {
    let count = profile.leadership_roles.len();
    findings.detail("leadershipRoles", || json!(count));

    if count > 0 {
        findings.met(|| match count {
            1 => format!("Leadership experience ({})", profile.leadership_roles[0].title),
            n => format!("Leadership experience ({n} roles)"),
        });
        100.0
    } else {
        findings.missing(|| {
            Shortfall::actionable(
                "No leadership roles listed (leadership required)",
                "Take on a leadership role in a club, team, or organization",
            )
        });
        0.0
    }
}

fn extracurricular_score<F: Findings>(
    profile: &StudentProfile,
    required: &[String],
    findings: &mut F,
) -> f64 {
    let (found, absent): (Vec<&String>, Vec<&String>) = required.iter().partition(|activity| {
        profile
            .extracurriculars
            .iter()
            .any(|e| contains_text(&e.name, activity) || contains_text(activity, &e.name))
    });
    findings.detail("extracurricularsMatched", || json!(found));

    if !found.is_empty() {
        findings.met(|| {
            let names: Vec<&str> = found.iter().map(|s| s.as_str()).collect();
            format!("Participates in {}", names.join(", "))
        });
    }
    if !absent.is_empty() {
        findings.missing(|| {
            let names: Vec<&str> = absent.iter().map(|s| s.as_str()).collect();
            Shortfall::actionable(
                format!("Missing required activities: {}", names.join(", ")),
                format!("Get involved in {}", names.join(", ")),
            )
        });
    }

    100.0 * found.len() as f64 / required.len() as f64
}

fn work_score<F: Findings>(profile: &StudentProfile, min_months: u32, findings: &mut F) -> f64 {
    findings.detail("minWorkExperienceMonths", || json!(min_months));

    if profile.work_experience.is_empty() {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Work experience not provided ({min_months} months required)"),
                "Add your work history to your profile",
            )
        });
        return 0.0;
    }

    let months = profile.work_experience_months();
    findings.detail("workExperienceMonths", || json!(months));

    let score = min_requirement(months as f64, min_months as f64);
    if score < 100.0 {
        let gap = min_months - months;
        findings.missing(|| {
            Shortfall::actionable(
                format!("{months} months of work experience, need {gap} more"),
                format!("Gain {gap} more months of work experience"),
            )
        });
    } else {
        findings.met(|| format!("{months} months of work experience meets minimum {min_months}"));
    }
    score
}

fn awards_score<F: Findings>(profile: &StudentProfile, findings: &mut F) -> f64 {
    if profile.awards_honors.is_empty() {
        findings.missing(|| {
            Shortfall::actionable(
                "No awards or honors listed (required)",
                "Pursue academic or community recognition and list it on your profile",
            )
        });
        0.0
    } else {
        findings.met(|| format!("{} awards or honors listed", profile.awards_honors.len()));
        100.0
    }
}
