//! Puzzle Generator
//!
//! Wraps the engine with pool pre-filtering, quality scoring and a bounded
//! retry loop (see [`state`] for the transitions). Batch generation runs
//! single generations back to back, keeping later puzzles clear of items and
//! connections already used earlier in the batch.

pub mod filters;
pub mod state;

pub use filters::PoolFilter;
pub use state::{AttemptOutcome, AttemptState, BestAttempt, RetryPolicy};

use crate::engine::PuzzleEngine;
use crate::error::{ErrorKind, PuzzleError, Result};
use crate::validators::QualityScorer;
use fourfold_common::{GeneratedPuzzle, Item, QualityMetrics};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub max_attempts: u32,
    /// Minimum overall score (0-100) to accept a puzzle outright
    pub quality_threshold: f64,
    /// Best attempt is returned when it reaches this fraction of the threshold
    pub fallback_ratio: f64,
    /// Fail fast when the filtered pool is smaller than this
    pub min_pool_size: usize,
    pub filter: PoolFilter,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            quality_threshold: 35.0,
            fallback_ratio: 0.8,
            min_pool_size: 50,
            filter: PoolFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfigUpdate {
    pub max_attempts: Option<u32>,
    pub quality_threshold: Option<f64>,
    pub fallback_ratio: Option<f64>,
    pub min_pool_size: Option<usize>,
    /// Replaces the current filter
    pub filter: Option<PoolFilter>,
}

impl GeneratorConfig {
    pub fn merge(&mut self, update: &GeneratorConfigUpdate) {
        if let Some(n) = update.max_attempts {
            self.max_attempts = n.max(1);
        }
        if let Some(threshold) = update.quality_threshold {
            self.quality_threshold = threshold;
        }
        if let Some(ratio) = update.fallback_ratio {
            self.fallback_ratio = ratio.clamp(0.0, 1.0);
        }
        if let Some(n) = update.min_pool_size {
            self.min_pool_size = n;
        }
        if let Some(filter) = &update.filter {
            self.filter = filter.clone();
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            threshold: self.quality_threshold,
            fallback_ratio: self.fallback_ratio,
        }
    }
}

/// One generated puzzle with its quality verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub puzzle: GeneratedPuzzle,
    pub quality: QualityMetrics,
    /// Overall score, 0-100
    pub quality_score: f64,
    /// False for a near-threshold fallback
    pub meets_threshold: bool,
    /// Attempt that was accepted, or attempts made when falling back
    pub attempt_number: u32,
}

/// Outcome of a batch run; never an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub puzzles: Vec<GenerationResult>,
    pub succeeded: usize,
    pub failed: usize,
    pub total_attempts: u32,
    /// Mean quality score of the generated puzzles (0 when none)
    pub average_quality: f64,
}

/// Puzzle Generator
///
/// # Example
/// ```rust,ignore
/// let generator = PuzzleGenerator::new(engine, QualityScorer::new()?);
/// let result = generator.generate_single(&pool, None, None).await?;
/// if !result.meets_threshold {
///     println!("Best effort: {:.1}", result.quality_score);
/// }
/// ```
#[derive(Debug)]
pub struct PuzzleGenerator {
    engine: PuzzleEngine,
    scorer: QualityScorer,
    config: GeneratorConfig,
}

impl PuzzleGenerator {
    pub fn new(engine: PuzzleEngine, scorer: QualityScorer) -> Self {
        Self {
            engine,
            scorer,
            config: GeneratorConfig::default(),
        }
    }

    pub fn configure(&mut self, update: &GeneratorConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn engine(&self) -> &PuzzleEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PuzzleEngine {
        &mut self.engine
    }

    pub fn scorer(&self) -> &QualityScorer {
        &self.scorer
    }

    pub fn scorer_mut(&mut self) -> &mut QualityScorer {
        &mut self.scorer
    }

    /// Generate one puzzle, retrying until the quality threshold is met
    ///
    /// Engine failures inside the loop count as failed attempts. A configuration
    /// error (no enabled analyzers) is returned immediately.
    ///
    /// # Errors
    /// - [`PuzzleError::PoolTooSmall`] when filtering leaves too few items
    /// - [`PuzzleError::Exhausted`] when no attempt reached the fallback floor
    pub async fn generate_single(
        &self,
        pool: &[Item],
        recent_item_ids: Option<&HashSet<i64>>,
        recent_connections: Option<&HashSet<String>>,
    ) -> Result<GenerationResult> {
        let filtered = self.prefilter(pool)?;
        let policy = self.config.retry_policy();

        let mut state: AttemptState<(GeneratedPuzzle, QualityMetrics)> = AttemptState::start();
        while !state.is_terminal() {
            let attempt = state.attempts() + 1;
            let outcome = match self
                .engine
                .generate_puzzle(&filtered, recent_item_ids, recent_connections)
                .await
            {
                Ok(puzzle) => {
                    let quality = self.scorer.score_puzzle(&puzzle);
                    debug!(
                        attempt,
                        score = quality.overall_score,
                        threshold = policy.threshold,
                        "Attempt scored"
                    );
                    AttemptOutcome::Scored {
                        score: quality.overall_score,
                        meets_threshold: quality.meets_threshold,
                        value: (puzzle, quality),
                    }
                }
                Err(e) if e.kind() == ErrorKind::Configuration => return Err(e),
                Err(e) => {
                    warn!(attempt, error = %e, "Generation attempt failed");
                    AttemptOutcome::Failed(e.to_string())
                }
            };
            state = state.next(outcome, &policy);
        }

        match state {
            AttemptState::Succeeded {
                attempt,
                value: (puzzle, quality),
                score,
            } => {
                info!(puzzle_id = %puzzle.id, attempt, score, "Puzzle accepted");
                Ok(GenerationResult {
                    puzzle,
                    quality,
                    quality_score: score,
                    meets_threshold: true,
                    attempt_number: attempt,
                })
            }
            AttemptState::ExhaustedWithFallback { attempts, best } => {
                let (puzzle, mut quality) = best.value;
                quality.meets_threshold = false;
                warn!(
                    puzzle_id = %puzzle.id,
                    attempts,
                    best_attempt = best.attempt,
                    score = best.score,
                    threshold = policy.threshold,
                    "No attempt met the quality threshold, returning best effort"
                );
                Ok(GenerationResult {
                    puzzle,
                    quality,
                    quality_score: best.score,
                    meets_threshold: false,
                    attempt_number: attempts,
                })
            }
            AttemptState::ExhaustedFailed {
                attempts,
                best_score,
                last_error,
            } => Err(PuzzleError::Exhausted {
                attempts,
                best_score,
                threshold: policy.threshold,
                last_error,
            }),
            AttemptState::Attempting { attempt, .. } => Err(PuzzleError::Common(
                fourfold_common::Error::Internal(format!("Retry loop stopped while attempting ({})", attempt)),
            )),
        }
    }

    /// Generate up to `count` puzzles with no shared items or connections
    ///
    /// Failures are counted, never returned.
    pub async fn generate_batch(&self, pool: &[Item], count: usize) -> BatchResult {
        let mut result = BatchResult::default();
        let mut used_ids: HashSet<i64> = HashSet::new();
        let mut used_connections: HashSet<String> = HashSet::new();

        for index in 0..count {
            let remaining: Vec<Item> = pool.iter().filter(|item| !used_ids.contains(&item.id)).cloned().collect();

            match self
                .generate_single(&remaining, Some(&used_ids), Some(&used_connections))
                .await
            {
                Ok(generated) => {
                    used_ids.extend(generated.puzzle.item_ids());
                    used_connections.extend(generated.puzzle.connections());
                    result.total_attempts += generated.attempt_number;
                    result.succeeded += 1;
                    result.puzzles.push(generated);
                }
                Err(e) => {
                    warn!(puzzle = index + 1, of = count, error = %e, "Batch puzzle failed");
                    result.total_attempts += e.attempts().unwrap_or(0);
                    result.failed += 1;
                }
            }
        }

        if !result.puzzles.is_empty() {
            result.average_quality =
                result.puzzles.iter().map(|p| p.quality_score).sum::<f64>() / result.puzzles.len() as f64;
        }

        info!(
            requested = count,
            succeeded = result.succeeded,
            failed = result.failed,
            total_attempts = result.total_attempts,
            average_quality = result.average_quality,
            "Batch generation complete"
        );
        result
    }

    fn prefilter<'a>(&self, pool: &'a [Item]) -> Result<Cow<'a, [Item]>> {
        let filtered = if self.config.filter.is_empty() {
            Cow::Borrowed(pool)
        } else {
            Cow::Owned(self.config.filter.apply(pool))
        };

        if filtered.len() < self.config.min_pool_size {
            return Err(PuzzleError::PoolTooSmall {
                size: filtered.len(),
                minimum: self.config.min_pool_size,
            });
        }

        debug!(pool_size = pool.len(), filtered = filtered.len(), "Pool prefiltered");
        Ok(filtered)
    }
}
