use serde::{Deserialize, Serialize};

use crate::core::dimensions::round_score;
use crate::models::{Dimension, DimensionScores};

/// Tolerance used when checking that a weight table sums to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Global weight of each dimension in the overall match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub academic: f64,
    pub major_field: f64,
    pub demographic: f64,
    pub experience: f64,
    pub financial: f64,
    pub special: f64,
}

impl DimensionWeights {
    pub const DEFAULT: DimensionWeights = DimensionWeights {
        academic: 0.30,
        major_field: 0.20,
        demographic: 0.15,
        experience: 0.15,
        financial: 0.10,
        special: 0.10,
    };

    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Academic => self.academic,
            Dimension::Demographic => self.demographic,
            Dimension::MajorField => self.major_field,
            Dimension::Experience => self.experience,
            Dimension::Financial => self.financial,
            Dimension::Special => self.special,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.weight(*d)).sum()
    }

    /// Check that no weight is negative and that the table sums to one
    pub fn validate(&self) -> Result<(), String> {
        if let Some(d) = Dimension::ALL.iter().find(|d| {
            let w = self.weight(**d);
            w.is_nan() || w < 0.0
        }) {
            return Err(format!("weight for {} must be non-negative", d.label()));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("dimension weights must sum to 1.0, got {sum}"));
        }
        Ok(())
    }

    /// Dimensions ordered by descending weight, ties in declaration order
    pub fn by_importance(&self) -> [Dimension; 6] {
        let mut order = Dimension::ALL;
        order.sort_by(|a, b| {
            self.weight(*b)
                .partial_cmp(&self.weight(*a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Overall match score: `round(sum(score_i * weight_i))`
///
/// Order-independent. When every dimension is 100 the result is exactly 100.
pub fn overall_match_score(scores: &DimensionScores, weights: &DimensionWeights) -> u8 {
    let total: f64 = scores
        .iter()
        .map(|(dimension, score)| score as f64 * weights.weight(dimension))
        .sum();

    round_score(total)
}
