// Core algorithm exports
pub mod analysis;
pub mod batch;
pub mod composite;
pub mod criteria;
pub mod dimensions;
pub mod matcher;
pub mod probability;
pub mod strategic;

pub use analysis::analyze_eligibility;
pub use batch::{compute_match_scores_batch, BatchRunner};
pub use composite::{overall_match_score, DimensionWeights};
pub use criteria::parse_criteria;
pub use dimensions::{score_dimensions, Findings, Narrative, NoFindings, Shortfall};
pub use matcher::{compute_eligibility_analysis, compute_match_score, EngineConfig, Matcher};
pub use probability::{competition_factor, success_probability, success_tier};
pub use strategic::{estimate_effort, strategic_value, StrategicValue};
