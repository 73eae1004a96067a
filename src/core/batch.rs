use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::core::matcher::{EngineConfig, Matcher};
use crate::error::{EngineError, Result};
use crate::models::{MatchScore, Scholarship, StudentProfile};

/// Scores many scholarships for one student on a fixed-size worker pool.
///
/// Output order always equals input order. Dropping the future returned by
/// [`BatchRunner::run`] stops the workers after their current item.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    matcher: Arc<Matcher>,
}

/// Sets the shared stop flag when the owning batch future goes away
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl BatchRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self::from_matcher(Matcher::new(config))
    }

    pub fn from_matcher(matcher: Matcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Pool size for a batch of `len` items
    pub fn worker_count(&self, len: usize) -> usize {
        let configured = self.matcher.config().batch_workers.filter(|n| *n > 0);
        let workers = configured.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        workers.min(len).max(1)
    }

    /// Score every scholarship for `profile`
    ///
    /// Fails as a whole when the profile is missing or any criteria payload
    /// is malformed; the error for the lowest failing index is returned.
    pub async fn run(
        &self,
        profile: Option<&StudentProfile>,
        scholarships: Vec<Scholarship>,
    ) -> Result<Vec<MatchScore>> {
        let profile = Arc::new(profile.cloned().ok_or(EngineError::MissingProfile)?);
        let len = scholarships.len();
        if len == 0 {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let workers = self.worker_count(len);
        let scholarships: Arc<[Scholarship]> = scholarships.into();
        let next = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let _guard = StopOnDrop(stop.clone());

        let mut pool = JoinSet::new();
        for _ in 0..workers {
            let matcher = self.matcher.clone();
            let profile = profile.clone();
            let scholarships = scholarships.clone();
            let next = next.clone();
            let stop = stop.clone();

            pool.spawn_blocking(move || {
                let mut scored = Vec::new();
                while !stop.load(Ordering::Relaxed) {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    if index >= scholarships.len() {
                        break;
                    }
                    let result = matcher.compute_match_score(Some(&profile), &scholarships[index]);
                    if result.is_err() {
                        stop.store(true, Ordering::Relaxed);
                    }
                    scored.push((index, result));
                }
                scored
            });
        }

        let mut slots: Vec<Option<MatchScore>> = vec![None; len];
        let mut first_error: Option<(usize, EngineError)> = None;

        while let Some(joined) = pool.join_next().await {
            let scored = match joined {
                Ok(scored) => scored,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => {
                    warn!(error = %err, "Batch worker cancelled");
                    continue;
                }
            };
            for (index, result) in scored {
                match result {
                    Ok(score) => slots[index] = Some(score),
                    Err(err) => {
                        if first_error.as_ref().map_or(true, |(at, _)| index < *at) {
                            first_error = Some((index, err));
                        }
                    }
                }
            }
        }

        if let Some((index, err)) = first_error {
            info!(
                scholarship = scholarships[index].label(),
                index,
                error = %err,
                "Batch aborted"
            );
            return Err(err);
        }

        let scores = collect_in_order(slots)?;
        info!(
            count = scores.len(),
            workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scored scholarship batch"
        );

        Ok(scores)
    }
}

/// Unwrap every slot in input order; any empty slot fails the batch
fn collect_in_order(slots: Vec<Option<MatchScore>>) -> Result<Vec<MatchScore>> {
    let total = slots.len();
    let scores: Vec<MatchScore> = slots.into_iter().flatten().collect();
    if scores.len() < total {
        return Err(EngineError::BatchInterrupted {
            unscored: total - scores.len(),
            total,
        });
    }
    Ok(scores)
}

/// Ordered batch scoring with the default configuration
pub async fn compute_match_scores_batch(
    profile: Option<&StudentProfile>,
    scholarships: Vec<Scholarship>,
) -> Result<Vec<MatchScore>> {
    BatchRunner::default().run(profile, scholarships).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicCriteria, CriteriaInput, EligibilityCriteria};
    use std::time::Duration;

    fn student() -> StudentProfile {
        StudentProfile {
            gpa: Some(3.4),
            ..Default::default()
        }
    }

    fn scholarships(count: usize) -> Vec<Scholarship> {
        (0..count)
            .map(|i| {
                Scholarship::new(EligibilityCriteria {
                    academic: Some(AcademicCriteria {
                        min_gpa: Some(2.0 + (i % 20) as f64 * 0.1),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .with_id(format!("s-{i}"))
                .with_award(1000.0 + i as f64)
            })
            .collect()
    }

    fn runner(workers: usize) -> BatchRunner {
        BatchRunner::new(EngineConfig {
            batch_workers: Some(workers),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_preserves_input_order() {
        let input = scholarships(100);
        let scores = runner(8).run(Some(&student()), input).await.unwrap();

        assert_eq!(scores.len(), 100);
        for (i, score) in scores.iter().enumerate() {
            assert_eq!(score.scholarship_id.as_deref(), Some(format!("s-{i}").as_str()));
        }
    }

    #[tokio::test]
    async fn test_matches_sequential_scoring() {
        let input = scholarships(40);
        let matcher = Matcher::default();
        let expected: Vec<u8> = input
            .iter()
            .map(|s| matcher.compute_match_score(Some(&student()), s).unwrap().overall_match_score)
            .collect();

        let scores = runner(4).run(Some(&student()), input).await.unwrap();
        let actual: Vec<u8> = scores.iter().map(|s| s.overall_match_score).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_hundred_scholarships_under_500ms() {
        let input = scholarships(100);
        let started = Instant::now();
        let scores = compute_match_scores_batch(Some(&student()), input).await.unwrap();
        assert_eq!(scores.len(), 100);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_missing_profile_and_empty_batch() {
        let result = tokio_test::block_on(compute_match_scores_batch(None, scholarships(3)));
        assert_eq!(result.unwrap_err(), EngineError::MissingProfile);

        let scores = tokio_test::block_on(compute_match_scores_batch(Some(&student()), Vec::new()));
        assert!(scores.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_item_fails_batch() {
        let mut input = scholarships(10);
        input[6].criteria = CriteriaInput::Json("{oops".to_string());
        let result = runner(3).run(Some(&student()), input).await;
        assert!(matches!(result, Err(EngineError::MalformedCriteria(_))));
    }

    #[test]
    fn test_unscored_slot_fails_batch() {
        let matcher = Matcher::default();
        let scored: Vec<Option<MatchScore>> = scholarships(3)
            .iter()
            .map(|s| matcher.compute_match_score(Some(&student()), s).ok())
            .collect();

        let mut interrupted = scored.clone();
        interrupted[1] = None;
        assert_eq!(
            collect_in_order(interrupted).unwrap_err(),
            EngineError::BatchInterrupted { unscored: 1, total: 3 }
        );

        let scores = collect_in_order(scored).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[2].scholarship_id.as_deref(), Some("s-2"));
    }

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(runner(8).worker_count(3), 3);
        assert_eq!(runner(2).worker_count(100), 2);
        assert_eq!(runner(0).worker_count(1), 1);
        assert!(BatchRunner::default().worker_count(1000) >= 1);
    }

    #[test]
    fn test_drop_guard_sets_stop_flag() {
        let stop = Arc::new(AtomicBool::new(false));
        drop(StopOnDrop(stop.clone()));
        assert!(stop.load(Ordering::Relaxed));
    }
}
