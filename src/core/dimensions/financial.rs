use serde_json::json;

use super::{fmt_num, max_requirement, min_requirement, Findings, NoFindings, Shortfall, SubScores};
use crate::models::{FinancialCriteria, FinancialNeed, StudentProfile};

const NEED_WEIGHT: f64 = 0.35;
const NEED_LEVEL_WEIGHT: f64 = 0.25;
const PELL_WEIGHT: f64 = 0.20;
const EFC_WEIGHT: f64 = 0.20;

/// Partial credit when need is required but the student reports low need
const LOW_NEED_SCORE: f64 = 50.0;

/// Financial dimension score (0-100)
pub fn score_financial(profile: &StudentProfile, criteria: Option<&FinancialCriteria>) -> u8 {
    evaluate_financial(profile, criteria, &mut NoFindings)
}

pub fn evaluate_financial<F: Findings>(
    profile: &StudentProfile,
    criteria: Option<&FinancialCriteria>,
    findings: &mut F,
) -> u8 {
    let Some(criteria) = criteria else {
        return 100;
    };

    let mut scores = SubScores::default();

    if criteria.requires_financial_need == Some(true) {
        scores.add(NEED_WEIGHT, need_score(profile, findings));
    }

    if let Some(level) = criteria.financial_need_level {
        scores.add(NEED_LEVEL_WEIGHT, need_level_score(profile, level, findings));
    }

    if criteria.pell_grant_required == Some(true) {
        scores.add(PELL_WEIGHT, pell_score(profile, findings));
    }

    if let Some(max_efc) = criteria.max_efc {
        scores.add(EFC_WEIGHT, efc_score(profile, max_efc, findings));
    }

    scores.finish()
}

fn need_score<F: Findings>(profile: &StudentProfile, findings: &mut F) -> f64 {
    match profile.financial_need {
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    "Financial need not provided (demonstrated need required)",
                    "Add your financial need level to your profile",
                )
            });
            0.0
        }
        Some(FinancialNeed::Low) => {
            findings.missing(|| {
                Shortfall::fixed("Reported financial need is low; this award targets demonstrated need")
            });
            LOW_NEED_SCORE
        }
        Some(need) => {
            findings.met(|| format!("Demonstrated financial need ({})", need.label()));
            100.0
        }
    }
}

fn need_level_score<F: Findings>(profile: &StudentProfile, required: FinancialNeed, findings: &mut F) -> f64 {
    findings.detail("financialNeedLevel", || json!(required));

    let Some(need) = profile.financial_need else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Financial need not provided ({} need required)", required.label()),
                "Add your financial need level to your profile",
            )
        });
        return 0.0;
    };

    let score = min_requirement(need.rank() as f64, required.rank() as f64);
    if score < 100.0 {
        findings.missing(|| {
            Shortfall::fixed(format!(
                "Financial need is {}, {} or higher required",
                need.label(),
                required.label()
            ))
        });
    } else {
        findings.met(|| format!("Financial need level {} meets {}", need.label(), required.label()));
    }
    score
}

fn pell_score<F: Findings>(profile: &StudentProfile, findings: &mut F) -> f64 {
    match profile.pell_grant_eligible {
        Some(true) => {
            findings.met(|| "Pell Grant eligible".to_string());
            100.0
        }
        Some(false) => {
            findings.missing(|| Shortfall::fixed("Not Pell Grant eligible (required)"));
            0.0
        }
        None => {
            findings.missing(|| {
                Shortfall::actionable(
                    "Pell Grant eligibility not provided (required)",
                    "Complete the FAFSA to confirm Pell Grant eligibility",
                )
            });
            0.0
        }
    }
}

fn efc_score<F: Findings>(profile: &StudentProfile, max_efc: f64, findings: &mut F) -> f64 {
    findings.detail("maxEFC", || json!(max_efc));

    let Some((low, high)) = profile.efc_range.as_deref().and_then(parse_efc_range) else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Expected Family Contribution not provided (maximum ${} allowed)", fmt_num(max_efc)),
                "Complete the FAFSA and add your EFC to your profile",
            )
        });
        return 0.0;
    };

    let midpoint = (low + high) / 2.0;
    findings.detail("efcEstimate", || json!(midpoint));

    let score = max_requirement(midpoint, max_efc);
    if score < 100.0 {
        findings.missing(|| {
            Shortfall::fixed(format!(
                "Estimated EFC ${} exceeds maximum ${}",
                fmt_num(midpoint),
                fmt_num(max_efc)
            ))
        });
    } else {
        findings.met(|| format!("Estimated EFC ${} within maximum ${}", fmt_num(midpoint), fmt_num(max_efc)));
    }
    score
}

/// Parse an EFC range such as `"0-5000"`, `"$5,000 - $10,000"`, `"20000+"`
/// or a single figure into `(low, high)`.
pub fn parse_efc_range(raw: &str) -> Option<(f64, f64)> {
    let cleaned: String = raw
        .to_lowercase()
        .replace(" to ", "-")
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    if let Some(open) = cleaned.strip_suffix('+') {
        let low = open.parse::<f64>().ok()?;
        return Some((low, low));
    }

    let bounds = match cleaned.split_once('-') {
        Some((low, high)) => (low.parse::<f64>().ok()?, high.parse::<f64>().ok()?),
        None => {
            let value = cleaned.parse::<f64>().ok()?;
            (value, value)
        }
    };

    let (low, high) = if bounds.0 <= bounds.1 { bounds } else { (bounds.1, bounds.0) };
    if low < 0.0 || !high.is_finite() {
        return None;
    }
    Some((low, high))
}
