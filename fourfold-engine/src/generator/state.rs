//! Retry state machine
//!
//! ```text
//!              threshold met
//! Attempting ─────────────────────────────► Succeeded
//!    │  ▲
//!    │  │ missed, attempts remain (track best)
//!    └──┘
//!    │ exhausted, best >= fallback_ratio * threshold
//!    ├────────────────────────────────────► ExhaustedWithFallback
//!    │ exhausted, otherwise
//!    └────────────────────────────────────► ExhaustedFailed
//! ```
//!
//! Generic over the attempt payload so transitions are testable without an
//! engine.

/// Bounds for one retry loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Minimum score (0-100) for immediate acceptance
    pub threshold: f64,
    /// Fraction of `threshold` the best attempt needs to be returned anyway
    pub fallback_ratio: f64,
}

impl RetryPolicy {
    pub fn fallback_floor(&self) -> f64 {
        self.threshold * self.fallback_ratio
    }
}

/// Result of one attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome<T> {
    Scored { value: T, score: f64, meets_threshold: bool },
    /// Attempt produced nothing; carries the error message
    Failed(String),
}

/// Highest-scoring attempt so far
#[derive(Debug, Clone, PartialEq)]
pub struct BestAttempt<T> {
    pub value: T,
    pub score: f64,
    /// 1-based attempt that produced it
    pub attempt: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState<T> {
    Attempting {
        /// Attempts completed so far
        attempt: u32,
        best: Option<BestAttempt<T>>,
        last_error: Option<String>,
    },
    Succeeded {
        attempt: u32,
        value: T,
        score: f64,
    },
    ExhaustedWithFallback {
        attempts: u32,
        best: BestAttempt<T>,
    },
    ExhaustedFailed {
        attempts: u32,
        best_score: Option<f64>,
        last_error: Option<String>,
    },
}

impl<T> AttemptState<T> {
    pub fn start() -> Self {
        AttemptState::Attempting {
            attempt: 0,
            best: None,
            last_error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptState::Attempting { .. })
    }

    /// Attempts completed when this state was reached
    pub fn attempts(&self) -> u32 {
        match self {
            AttemptState::Attempting { attempt, .. } | AttemptState::Succeeded { attempt, .. } => *attempt,
            AttemptState::ExhaustedWithFallback { attempts, .. }
            | AttemptState::ExhaustedFailed { attempts, .. } => *attempts,
        }
    }

    /// Apply one attempt's outcome; terminal states absorb further outcomes
    pub fn next(self, outcome: AttemptOutcome<T>, policy: &RetryPolicy) -> Self {
        let (attempt, mut best, mut last_error) = match self {
            AttemptState::Attempting {
                attempt,
                best,
                last_error,
            } => (attempt + 1, best, last_error),
            terminal => return terminal,
        };

        match outcome {
            AttemptOutcome::Scored {
                value,
                score,
                meets_threshold,
            } => {
                if meets_threshold && score >= policy.threshold {
                    return AttemptState::Succeeded { attempt, value, score };
                }
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(BestAttempt { value, score, attempt });
                }
            }
            AttemptOutcome::Failed(message) => {
                last_error = Some(message);
            }
        }

        if attempt < policy.max_attempts {
            return AttemptState::Attempting {
                attempt,
                best,
                last_error,
            };
        }

        match best {
            Some(best) if best.score >= policy.fallback_floor() => AttemptState::ExhaustedWithFallback {
                attempts: attempt,
                best,
            },
            best => AttemptState::ExhaustedFailed {
                attempts: attempt,
                best_score: best.map(|b| b.score),
                last_error,
            },
        }
    }
}
