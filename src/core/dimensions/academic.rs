use serde_json::json;

use super::{fmt_num, max_requirement, min_requirement, Findings, NoFindings, Shortfall, SubScores};
use crate::models::{AcademicCriteria, StudentProfile};

const GPA_WEIGHT: f64 = 0.40;
const SAT_WEIGHT: f64 = 0.30;
const ACT_WEIGHT: f64 = 0.30;
// With a class-rank requirement the split becomes GPA / rank / best test.
const RANK_WEIGHT: f64 = 0.30;
const BEST_TEST_WEIGHT: f64 = 0.30;

/// Academic dimension score (0-100)
///
/// Baseline split is GPA 40% / SAT 30% / ACT 30%. When the scholarship
/// states a class-rank percentile the split becomes GPA 40% / rank 30% /
/// best of SAT and ACT 30%. Only stated requirements take part; their
/// weights are renormalised.
pub fn score_academic(profile: &StudentProfile, criteria: Option<&AcademicCriteria>) -> u8 {
    evaluate_academic(profile, criteria, &mut NoFindings)
}

pub fn evaluate_academic<F: Findings>(
    profile: &StudentProfile,
    criteria: Option<&AcademicCriteria>,
    findings: &mut F,
) -> u8 {
    let Some(criteria) = criteria else {
        return 100;
    };

    let mut scores = SubScores::default();

    if let Some(gpa) = gpa_score(profile, criteria, findings) {
        scores.add(GPA_WEIGHT, gpa);
    }

    match criteria.class_rank_percentile {
        Some(top_percent) => {
            scores.add(RANK_WEIGHT, rank_score(profile, top_percent, findings));
            if let Some(test) = best_test_score(profile, criteria, findings) {
                scores.add(BEST_TEST_WEIGHT, test);
            }
        }
        None => {
            if let Some(sat) = test_score("SAT", profile.sat_score, criteria.min_sat, criteria.max_sat, findings) {
                scores.add(SAT_WEIGHT, sat);
            }
            if let Some(act) = test_score("ACT", profile.act_score, criteria.min_act, criteria.max_act, findings) {
                scores.add(ACT_WEIGHT, act);
            }
        }
    }

    scores.finish()
}

/// GPA sub-score, or `None` when the scholarship states no GPA bound
fn gpa_score<F: Findings>(
    profile: &StudentProfile,
    criteria: &AcademicCriteria,
    findings: &mut F,
) -> Option<f64> {
    if criteria.min_gpa.is_none() && criteria.max_gpa.is_none() {
        return None;
    }

    let Some(gpa) = profile.normalized_gpa() else {
        findings.missing(|| {
            Shortfall::actionable(
                match criteria.min_gpa {
                    Some(min) => format!("GPA not provided (minimum {} required)", fmt_num(min)),
                    None => "GPA not provided".to_string(),
                },
                "Add your GPA to your profile",
            )
        });
        return Some(0.0);
    };
    findings.detail("gpa", || json!(gpa));

    let mut score = 100.0;

    if let Some(min) = criteria.min_gpa {
        findings.detail("minGPA", || json!(min));
        let sub = min_requirement(gpa, min);
        if sub < 100.0 {
            let gap = min - gpa;
            findings.missing(|| {
                Shortfall::actionable(
                    format!("GPA {} below minimum {}, need {} more", fmt_num(gpa), fmt_num(min), fmt_num(gap)),
                    format!("Raise your GPA by {} to reach {}", fmt_num(gap), fmt_num(min)),
                )
            });
        } else {
            findings.met(|| format!("GPA {} meets minimum {}", fmt_num(gpa), fmt_num(min)));
        }
        score = f64::min(score, sub);
    }

    if let Some(max) = criteria.max_gpa {
        findings.detail("maxGPA", || json!(max));
        let sub = max_requirement(gpa, max);
        if sub < 100.0 {
            findings.missing(|| {
                Shortfall::fixed(format!("GPA {} above maximum {}", fmt_num(gpa), fmt_num(max)))
            });
        } else {
            findings.met(|| format!("GPA {} within maximum {}", fmt_num(gpa), fmt_num(max)));
        }
        score = f64::min(score, sub);
    }

    Some(score)
}

/// SAT or ACT sub-score, or `None` when the test has no stated bound
fn test_score<F: Findings>(
    test: &'static str,
    value: Option<u32>,
    min: Option<u32>,
    max: Option<u32>,
    findings: &mut F,
) -> Option<f64> {
    if min.is_none() && max.is_none() {
        return None;
    }

    let Some(value) = value else {
        findings.missing(|| {
            Shortfall::actionable(
                match min {
                    Some(min) => format!("{test} score not provided (minimum {min} required)"),
                    None => format!("{test} score not provided"),
                },
                format!("Add your {test} score to your profile"),
            )
        });
        return Some(0.0);
    };

    let mut score = 100.0;

    if let Some(min) = min {
        let sub = min_requirement(value as f64, min as f64);
        if sub < 100.0 {
            let gap = min - value;
            findings.missing(|| {
                Shortfall::actionable(
                    format!("{test} {value} below minimum {min}, need {gap} more points"),
                    format!("Retake the {test} to gain {gap} points and reach {min}"),
                )
            });
        } else {
            findings.met(|| format!("{test} {value} meets minimum {min}"));
        }
        score = f64::min(score, sub);
    }

    if let Some(max) = max {
        let sub = max_requirement(value as f64, max as f64);
        if sub < 100.0 {
            findings.missing(|| Shortfall::fixed(format!("{test} {value} above maximum {max}")));
        } else {
            findings.met(|| format!("{test} {value} within maximum {max}"));
        }
        score = f64::min(score, sub);
    }

    Some(score)
}

/// Best of the stated SAT/ACT sub-scores, reported as one finding
fn best_test_score<F: Findings>(
    profile: &StudentProfile,
    criteria: &AcademicCriteria,
    findings: &mut F,
) -> Option<f64> {
    let sat = test_score("SAT", profile.sat_score, criteria.min_sat, criteria.max_sat, &mut NoFindings);
    let act = test_score("ACT", profile.act_score, criteria.min_act, criteria.max_act, &mut NoFindings);

    let (test, best) = match (sat, act) {
        (None, None) => return None,
        (Some(sat), None) => ("SAT", sat),
        (None, Some(act)) => ("ACT", act),
        (Some(sat), Some(act)) if act > sat => ("ACT", act),
        (Some(sat), Some(_)) => ("SAT", sat),
    };

    // Re-run the winning test so its statements land in the caller's sink.
    match test {
        "ACT" => test_score("ACT", profile.act_score, criteria.min_act, criteria.max_act, findings),
        _ => test_score("SAT", profile.sat_score, criteria.min_sat, criteria.max_sat, findings),
    };

    Some(best)
}

fn rank_score<F: Findings>(profile: &StudentProfile, top_percent: f64, findings: &mut F) -> f64 {
    findings.detail("classRankPercentile", || json!(top_percent));

    let Some(standing) = profile.class_standing_percent() else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Class rank not provided (top {}% required)", fmt_num(top_percent)),
                "Add your class rank and class size to your profile",
            )
        });
        return 0.0;
    };
    findings.detail("classStanding", || json!(standing));

    if standing <= top_percent {
        findings.met(|| {
            format!("Ranked in top {}% (top {}% required)", fmt_num(standing), fmt_num(top_percent))
        });
        100.0
    } else {
        findings.missing(|| {
            Shortfall::actionable(
                format!("Ranked in top {}%, top {}% required", fmt_num(standing), fmt_num(top_percent)),
                format!("Improve your class rank into the top {}%", fmt_num(top_percent)),
            )
        });
        if top_percent <= 0.0 {
            0.0
        } else {
            100.0 * top_percent / standing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dimensions::Narrative;

    fn student(gpa: Option<f64>, sat: Option<u32>, act: Option<u32>) -> StudentProfile {
        StudentProfile {
            gpa,
            sat_score: sat,
            act_score: act,
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_criteria_scores_100() {
        assert_eq!(score_academic(&student(None, None, None), None), 100);
    }

    #[test]
    fn test_empty_group_scores_100() {
        let criteria = AcademicCriteria::default();
        assert_eq!(score_academic(&student(None, None, None), Some(&criteria)), 100);
    }

    #[test]
    fn test_gpa_below_minimum_interpolates() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.5),
            ..Default::default()
        };
        assert_eq!(score_academic(&student(Some(3.3), None, None), Some(&criteria)), 94);
        assert_eq!(score_academic(&student(Some(3.5), None, None), Some(&criteria)), 100);
    }

    #[test]
    fn test_missing_gpa_scores_zero() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.0),
            ..Default::default()
        };
        assert_eq!(score_academic(&student(None, Some(1500), None), Some(&criteria)), 0);
    }

    #[test]
    fn test_baseline_split_gpa_sat_act() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.0),
            min_sat: Some(1200),
            min_act: Some(26),
            ..Default::default()
        };
        // GPA met (40), SAT met (30), ACT unknown (0)
        assert_eq!(score_academic(&student(Some(3.6), Some(1300), None), Some(&criteria)), 70);
    }

    #[test]
    fn test_two_of_three_renormalizes() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.0),
            min_sat: Some(1200),
            ..Default::default()
        };
        // 0.4 * 100 + 0.3 * 0 over 0.7
        assert_eq!(score_academic(&student(Some(3.6), None, None), Some(&criteria)), 57);
    }

    #[test]
    fn test_class_rank_uses_best_test() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.0),
            min_sat: Some(1400),
            min_act: Some(30),
            class_rank_percentile: Some(10.0),
            ..Default::default()
        };
        let profile = StudentProfile {
            gpa: Some(3.8),
            sat_score: Some(1200),
            act_score: Some(32),
            class_rank: Some(5),
            class_size: Some(200),
            ..Default::default()
        };
        // ACT satisfies the test slot even though SAT falls short
        assert_eq!(score_academic(&profile, Some(&criteria)), 100);
    }

    #[test]
    fn test_class_rank_and_gpa_only() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.0),
            class_rank_percentile: Some(10.0),
            ..Default::default()
        };
        let profile = StudentProfile {
            gpa: Some(3.8),
            class_rank: Some(40),
            class_size: Some(200),
            ..Default::default()
        };
        // rank standing 20% vs top 10% => 50; (0.4*100 + 0.3*50) / 0.7
        assert_eq!(score_academic(&profile, Some(&criteria)), 79);
    }

    #[test]
    fn test_sat_above_maximum_is_penalized() {
        let criteria = AcademicCriteria {
            max_sat: Some(1200),
            ..Default::default()
        };
        assert_eq!(score_academic(&student(None, Some(1300), None), Some(&criteria)), 92);
    }

    #[test]
    fn test_gpa_monotonic_until_satisfied() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.5),
            min_sat: Some(1200),
            ..Default::default()
        };
        let mut last = 0;
        for step in 0..=40 {
            let gpa = step as f64 * 0.1;
            let score = score_academic(&student(Some(gpa), Some(1100), None), Some(&criteria));
            assert!(score >= last, "score dropped at gpa {gpa}");
            last = score;
        }
    }

    #[test]
    fn test_narrative_reports_gpa_gap() {
        let criteria = AcademicCriteria {
            min_gpa: Some(3.5),
            ..Default::default()
        };
        let mut narrative = Narrative::default();
        let score = evaluate_academic(&student(Some(3.3), None, None), Some(&criteria), &mut narrative);

        assert_eq!(score, 94);
        assert_eq!(narrative.missing.len(), 1);
        assert_eq!(
            narrative.missing[0].statement,
            "GPA 3.3 below minimum 3.5, need 0.2 more"
        );
        assert_eq!(
            narrative.missing[0].action.as_deref(),
            Some("Raise your GPA by 0.2 to reach 3.5")
        );
    }
}
