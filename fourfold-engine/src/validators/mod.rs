//! Puzzle Validators
//!
//! Five independent checks over one set of candidate groups, combined by
//! [`QualityScorer`] into a single 0-100 score.
//!
//! # Validators
//! 1. **clarity** - connection labels are specific, not vague
//! 2. **difficulty_balance** - difficulty scores spread evenly across quartiles
//! 3. **diversity** - items span eras and popularity levels
//! 4. **uniqueness** - connection types are interesting and varied
//! 5. **overlap** - no item appears in two groups (veto)
//!
//! Validators never fail: an empty group list yields a zero score with an
//! explanation.

pub mod clarity;
pub mod difficulty_balance;
pub mod diversity;
pub mod overlap;
pub mod quality_scorer;
pub mod uniqueness;

pub use clarity::{ClarityConfig, ClarityConfigUpdate, ClarityValidator};
pub use difficulty_balance::DifficultyBalanceValidator;
pub use diversity::{DiversityConfig, DiversityConfigUpdate, DiversityValidator};
pub use overlap::OverlapValidator;
pub use quality_scorer::{QualityScorer, ScorerConfig, ScorerConfigUpdate, ScoringWeights, ScoringWeightsUpdate};
pub use uniqueness::{UniquenessConfig, UniquenessConfigUpdate, UniquenessValidator};

use fourfold_common::CandidateGroup;
use serde::{Deserialize, Serialize};

/// Upper bound of every validator score
pub const MAX_VALIDATOR_SCORE: f64 = 10.0;

/// One validator's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorReport {
    /// 0-10
    pub score: f64,
    pub passed: bool,
    pub explanation: String,
    /// Validator-specific breakdown
    pub details: serde_json::Value,
}

impl ValidatorReport {
    pub fn new(score: f64, explanation: impl Into<String>) -> Self {
        Self {
            score: clamp_score(score),
            passed: true,
            explanation: explanation.into(),
            details: serde_json::Value::Null,
        }
    }

    pub fn failed(mut self) -> Self {
        self.passed = false;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Quality check over a set of groups
pub trait PuzzleValidator: Send + Sync {
    fn name(&self) -> &'static str;

    fn validate(&self, groups: &[CandidateGroup]) -> ValidatorReport;
}

/// Clamp into `[0, 10]`, mapping NaN to 0
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, MAX_VALIDATOR_SCORE)
    }
}

/// Arithmetic mean; 0 for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
pub(crate) mod test_support {
    use fourfold_common::{CandidateGroup, ConnectionType, Item};

    /// Group of four fresh items starting at `first_id`
    pub fn labeled(first_id: i64, label: &str, connection_type: ConnectionType) -> CandidateGroup {
        let items = (first_id..first_id + 4)
            .map(|id| Item::new(id, format!("Item {}", id)))
            .collect();
        CandidateGroup::new(items, label, connection_type, 1000.0)
    }
}
