//! Engine and generator errors

use thiserror::Error;

/// Broad failure class, for boundaries that report to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Setup problem; retrying will not help
    Configuration,
    /// The pool could not yield a puzzle on this attempt
    InsufficientData,
    /// Retries ran out without an acceptable puzzle
    Exhausted,
    Other,
}

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("No enabled analyzers registered")]
    NoEnabledAnalyzers,

    #[error("Insufficient candidate groups: {available} available, {needed} needed")]
    InsufficientCandidates { available: usize, needed: usize },

    #[error("Could only select {selected} non-overlapping groups, {needed} needed")]
    InsufficientGroups { selected: usize, needed: usize },

    #[error("Filtered pool has {size} items, minimum is {minimum}")]
    PoolTooSmall { size: usize, minimum: usize },

    #[error(
        "Failed to generate a puzzle meeting quality threshold {threshold:.1} after {attempts} attempts \
         (best score: {}){}",
        describe_best(.best_score),
        describe_last(.last_error)
    )]
    Exhausted {
        attempts: u32,
        best_score: Option<f64>,
        threshold: f64,
        last_error: Option<String>,
    },

    #[error(transparent)]
    Common(#[from] fourfold_common::Error),
}

impl PuzzleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PuzzleError::NoEnabledAnalyzers => ErrorKind::Configuration,
            PuzzleError::InsufficientCandidates { .. }
            | PuzzleError::InsufficientGroups { .. }
            | PuzzleError::PoolTooSmall { .. } => ErrorKind::InsufficientData,
            PuzzleError::Exhausted { .. } => ErrorKind::Exhausted,
            PuzzleError::Common(fourfold_common::Error::Config(_)) => ErrorKind::Configuration,
            PuzzleError::Common(_) => ErrorKind::Other,
        }
    }

    /// Attempts made, for exhaustion errors
    pub fn attempts(&self) -> Option<u32> {
        match self {
            PuzzleError::Exhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

fn describe_best(best_score: &Option<f64>) -> String {
    match best_score {
        Some(score) => format!("{:.1}", score),
        None => "none".to_string(),
    }
}

fn describe_last(last_error: &Option<String>) -> String {
    match last_error {
        Some(err) => format!("; last error: {}", err),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_cites_attempts() {
        let err = PuzzleError::Exhausted {
            attempts: 2,
            best_score: Some(41.3),
            threshold: 95.0,
            last_error: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("after 2 attempts"), "{}", msg);
        assert!(msg.contains("41.3"), "{}", msg);
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert_eq!(err.attempts(), Some(2));
    }

    #[test]
    fn test_exhausted_message_with_last_error() {
        let err = PuzzleError::Exhausted {
            attempts: 3,
            best_score: None,
            threshold: 35.0,
            last_error: Some(PuzzleError::NoEnabledAnalyzers.to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("best score: none"));
        assert!(msg.contains("last error: No enabled analyzers"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(PuzzleError::NoEnabledAnalyzers.kind(), ErrorKind::Configuration);
        assert_eq!(
            PuzzleError::PoolTooSmall { size: 3, minimum: 50 }.kind(),
            ErrorKind::InsufficientData
        );
        assert_eq!(
            PuzzleError::from(fourfold_common::Error::Internal("x".into())).kind(),
            ErrorKind::Other
        );
    }
}
