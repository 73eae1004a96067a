use thiserror::Error;

/// Errors the scoring engine can return
///
/// Missing student attributes are never errors; they score zero for the
/// affected sub-criterion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no student profile: create a profile before requesting scores")]
    MissingProfile,

    #[error("malformed criteria: {0}")]
    MalformedCriteria(String),

    #[error("batch interrupted: {unscored} of {total} scholarships were not scored")]
    BatchInterrupted { unscored: usize, total: usize },
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::MalformedCriteria(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
