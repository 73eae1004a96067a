//! The six dimensional scorers.
//!
//! Every scorer has the same contract: `(profile, criteria?) -> 0..=100`.
//! An absent criteria group scores 100, an unknown student attribute scores
//! zero for the sub-criterion it feeds. Each scorer is written once, generic
//! over a [`Findings`] sink: the scoring path passes [`NoFindings`] and pays
//! nothing for narrative text, the eligibility analyzer passes a
//! [`Narrative`] and gets met/missing statements for free.

pub mod academic;
pub mod demographic;
pub mod experience;
pub mod financial;
pub mod major;
pub mod special;

use std::collections::BTreeMap;

use crate::models::{Dimension, DimensionScores, EligibilityCriteria, StudentProfile};

pub use academic::{evaluate_academic, score_academic};
pub use demographic::{evaluate_demographic, score_demographic};
pub use experience::{evaluate_experience, score_experience};
pub use financial::{evaluate_financial, score_financial};
pub use major::{evaluate_major_field, score_major_field};
pub use special::{evaluate_special, score_special};

/// An unmet sub-criterion
#[derive(Debug, Clone, PartialEq)]
pub struct Shortfall {
    pub statement: String,
    /// What the student can do about it; `None` when nothing can be done
    pub action: Option<String>,
}

impl Shortfall {
    pub fn actionable(statement: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            action: Some(action.into()),
        }
    }

    pub fn fixed(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            action: None,
        }
    }
}

/// Sink for per-sub-criterion outcomes.
///
/// Arguments are closures so that a sink which discards them never builds
/// the strings.
pub trait Findings {
    fn met(&mut self, statement: impl FnOnce() -> String);
    fn missing(&mut self, shortfall: impl FnOnce() -> Shortfall);
    fn detail(&mut self, key: &'static str, value: impl FnOnce() -> serde_json::Value);
}

/// Discards everything; used on the hot scoring path
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFindings;

impl Findings for NoFindings {
    #[inline]
    fn met(&mut self, _statement: impl FnOnce() -> String) {}

    #[inline]
    fn missing(&mut self, _shortfall: impl FnOnce() -> Shortfall) {}

    #[inline]
    fn detail(&mut self, _key: &'static str, _value: impl FnOnce() -> serde_json::Value) {}
}

/// Collects statements for the eligibility analyzer
#[derive(Debug, Default, Clone)]
pub struct Narrative {
    pub met: Vec<String>,
    pub missing: Vec<Shortfall>,
    pub details: BTreeMap<String, serde_json::Value>,
}

impl Findings for Narrative {
    fn met(&mut self, statement: impl FnOnce() -> String) {
        self.met.push(statement());
    }

    fn missing(&mut self, shortfall: impl FnOnce() -> Shortfall) {
        self.missing.push(shortfall());
    }

    fn detail(&mut self, key: &'static str, value: impl FnOnce() -> serde_json::Value) {
        self.details.insert(key.to_string(), value());
    }
}

/// Score all six dimensions for one pair
pub fn score_dimensions(profile: &StudentProfile, criteria: &EligibilityCriteria) -> DimensionScores {
    DimensionScores {
        academic_score: score_academic(profile, criteria.academic.as_ref()),
        demographic_score: score_demographic(profile, criteria.demographic.as_ref()),
        major_field_score: score_major_field(profile, criteria.major_field.as_ref()),
        experience_score: score_experience(profile, criteria.experience.as_ref()),
        financial_score: score_financial(profile, criteria.financial.as_ref()),
        special_criteria_score: score_special(profile, criteria.special.as_ref()),
    }
}

/// Run one dimension's scorer against an arbitrary findings sink
pub fn evaluate_dimension<F: Findings>(
    dimension: Dimension,
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
    findings: &mut F,
) -> u8 {
    match dimension {
        Dimension::Academic => evaluate_academic(profile, criteria.academic.as_ref(), findings),
        Dimension::Demographic => {
            evaluate_demographic(profile, criteria.demographic.as_ref(), findings)
        }
        Dimension::MajorField => {
            evaluate_major_field(profile, criteria.major_field.as_ref(), findings)
        }
        Dimension::Experience => {
            evaluate_experience(profile, criteria.experience.as_ref(), findings)
        }
        Dimension::Financial => evaluate_financial(profile, criteria.financial.as_ref(), findings),
        Dimension::Special => evaluate_special(profile, criteria.special.as_ref(), findings),
    }
}

/// Weighted accumulator over the sub-criteria a scholarship actually states.
///
/// Weights of absent sub-criteria are dropped and the rest renormalised, so a
/// group with a single stated sub-criterion scores exactly that sub-score.
/// Rounding happens once, in [`SubScores::finish`].
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SubScores {
    total: f64,
    weight: f64,
}

impl SubScores {
    #[inline]
    pub(crate) fn add(&mut self, weight: f64, score: f64) {
        self.total += weight * score.clamp(0.0, 100.0);
        self.weight += weight;
    }

    /// Equal-weight variant for mean-combined dimensions
    #[inline]
    pub(crate) fn add_equal(&mut self, score: f64) {
        self.add(1.0, score);
    }

    /// Final rounded score; a group with no stated sub-criteria is satisfied
    #[inline]
    pub(crate) fn finish(self) -> u8 {
        if self.weight <= 0.0 {
            return 100;
        }
        round_score(self.total / self.weight)
    }
}

/// Sub-score for a "minimum X" requirement: 100 when met, otherwise
/// proportional to how close the student is.
#[inline]
pub(crate) fn min_requirement(value: f64, min: f64) -> f64 {
    if min <= 0.0 || value >= min {
        100.0
    } else {
        (100.0 * value / min).max(0.0)
    }
}

/// Sub-score for a "maximum X" requirement: linear penalty past the cap
#[inline]
pub(crate) fn max_requirement(value: f64, max: f64) -> f64 {
    if value <= max {
        100.0
    } else if max <= 0.0 {
        0.0
    } else {
        (100.0 - 100.0 * (value - max) / max).max(0.0)
    }
}

#[inline]
pub(crate) fn round_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Case-insensitive, whitespace-tolerant equality
#[inline]
pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[inline]
pub(crate) fn contains_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub(crate) fn in_list(value: &str, list: &[String]) -> bool {
    list.iter().any(|item| same_text(item, value))
}

/// Human formatting for gaps: at most two decimals, trailing zeros dropped
pub(crate) fn fmt_num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
