//! Quality Scorer
//!
//! Runs the five validators over one set of groups and combines them into a
//! 0-100 score.
//!
//! # Scoring Algorithm
//! - **Clarity** (weight: 0.25)
//! - **Difficulty balance** (weight: 0.20)
//! - **Diversity** (weight: 0.20)
//! - **Uniqueness** (weight: 0.15)
//!
//! `overall = 10 * weighted_sum / sum(weights)`, so the weights need not sum
//! to 1.
//!
//! # Overlap Veto
//! When the overlap validator fails and `require_no_overlap` is set, the
//! overall score is exactly 0 whatever the other sub-scores are.
//!
//! # Example
//! ```rust,ignore
//! use fourfold_engine::validators::QualityScorer;
//!
//! let scorer = QualityScorer::new()?;
//! let metrics = scorer.score(&puzzle.candidate_groups());
//!
//! println!("Quality: {:.1}/100", metrics.overall_score);
//! for (metric, why) in &metrics.explanations {
//!     println!("  {}: {}", metric, why);
//! }
//! ```

use super::{
    ClarityConfig, ClarityConfigUpdate, ClarityValidator, DifficultyBalanceValidator, DiversityConfig,
    DiversityConfigUpdate, DiversityValidator, OverlapValidator, PuzzleValidator, UniquenessConfig,
    UniquenessConfigUpdate, UniquenessValidator,
};
use fourfold_common::{CandidateGroup, GeneratedPuzzle, QualityMetrics, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Relative weights of the four scored metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub clarity: f64,
    pub difficulty_balance: f64,
    pub diversity: f64,
    pub uniqueness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            clarity: 0.25,
            difficulty_balance: 0.20,
            diversity: 0.20,
            uniqueness: 0.15,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeightsUpdate {
    pub clarity: Option<f64>,
    pub difficulty_balance: Option<f64>,
    pub diversity: Option<f64>,
    pub uniqueness: Option<f64>,
}

impl ScoringWeights {
    pub fn merge(&mut self, update: &ScoringWeightsUpdate) {
        if let Some(w) = update.clarity {
            self.clarity = w.max(0.0);
        }
        if let Some(w) = update.difficulty_balance {
            self.difficulty_balance = w.max(0.0);
        }
        if let Some(w) = update.diversity {
            self.diversity = w.max(0.0);
        }
        if let Some(w) = update.uniqueness {
            self.uniqueness = w.max(0.0);
        }
    }

    pub fn total(&self) -> f64 {
        self.clarity + self.difficulty_balance + self.diversity + self.uniqueness
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub weights: ScoringWeights,
    /// Minimum overall score (0-100) for `meets_threshold`
    pub min_score: f64,
    /// Force overall to 0 when any item appears in two groups
    pub require_no_overlap: bool,
    pub clarity: ClarityConfig,
    pub diversity: DiversityConfig,
    pub uniqueness: UniquenessConfig,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: 35.0,
            require_no_overlap: true,
            clarity: ClarityConfig::default(),
            diversity: DiversityConfig::default(),
            uniqueness: UniquenessConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfigUpdate {
    pub weights: ScoringWeightsUpdate,
    pub min_score: Option<f64>,
    pub require_no_overlap: Option<bool>,
    pub clarity: ClarityConfigUpdate,
    pub diversity: DiversityConfigUpdate,
    pub uniqueness: UniquenessConfigUpdate,
}

impl ScorerConfig {
    pub fn merge(&mut self, update: &ScorerConfigUpdate) {
        self.weights.merge(&update.weights);
        if let Some(min) = update.min_score {
            self.min_score = min;
        }
        if let Some(require) = update.require_no_overlap {
            self.require_no_overlap = require;
        }
        self.clarity.merge(&update.clarity);
        self.diversity.merge(&update.diversity);
        self.uniqueness.merge(&update.uniqueness);
    }
}

/// Quality Scorer
///
/// Owns one instance of each validator, built from [`ScorerConfig`].
#[derive(Debug, Clone)]
pub struct QualityScorer {
    config: ScorerConfig,
    clarity: ClarityValidator,
    difficulty: DifficultyBalanceValidator,
    diversity: DiversityValidator,
    uniqueness: UniquenessValidator,
    overlap: OverlapValidator,
}

impl QualityScorer {
    /// Scorer with default weights and threshold
    pub fn new() -> Result<Self> {
        Self::with_config(ScorerConfig::default())
    }

    pub fn with_config(config: ScorerConfig) -> Result<Self> {
        Ok(Self {
            clarity: ClarityValidator::with_config(config.clarity.clone())?,
            difficulty: DifficultyBalanceValidator::new(),
            diversity: DiversityValidator::with_config(config.diversity.clone()),
            uniqueness: UniquenessValidator::with_config(config.uniqueness.clone()),
            overlap: OverlapValidator::new(),
            config,
        })
    }

    /// Merge a partial update; on error the scorer is unchanged
    pub fn configure(&mut self, update: &ScorerConfigUpdate) -> Result<()> {
        let mut config = self.config.clone();
        config.merge(update);
        *self = Self::with_config(config)?;
        Ok(())
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn min_score(&self) -> f64 {
        self.config.min_score
    }

    /// Score one set of groups
    pub fn score(&self, groups: &[CandidateGroup]) -> QualityMetrics {
        let clarity = self.clarity.validate(groups);
        let difficulty = self.difficulty.validate(groups);
        let diversity = self.diversity.validate(groups);
        let uniqueness = self.uniqueness.validate(groups);
        let overlap = self.overlap.validate(groups);

        let weights = &self.config.weights;
        let total_weight = weights.total();
        let weighted = clarity.score * weights.clarity
            + difficulty.score * weights.difficulty_balance
            + diversity.score * weights.diversity
            + uniqueness.score * weights.uniqueness;

        let mut overall = if total_weight > 0.0 {
            10.0 * weighted / total_weight
        } else {
            0.0
        };
        let vetoed = !overlap.passed && self.config.require_no_overlap;
        if vetoed {
            overall = 0.0;
        }
        let overall = overall.clamp(0.0, 100.0);
        let meets_threshold = overall >= self.config.min_score;

        debug!(
            clarity = clarity.score,
            difficulty_balance = difficulty.score,
            diversity = diversity.score,
            uniqueness = uniqueness.score,
            overlap_passed = overlap.passed,
            overall,
            meets_threshold,
            "Puzzle scored"
        );

        let mut explanations = BTreeMap::new();
        explanations.insert(self.clarity.name().to_string(), clarity.explanation);
        explanations.insert(self.difficulty.name().to_string(), difficulty.explanation);
        explanations.insert(self.diversity.name().to_string(), diversity.explanation);
        explanations.insert(self.uniqueness.name().to_string(), uniqueness.explanation);
        explanations.insert(self.overlap.name().to_string(), overlap.explanation);
        explanations.insert(
            "overall".to_string(),
            if vetoed {
                "Overlapping items veto the puzzle".to_string()
            } else {
                format!(
                    "{:.1}/100 against minimum {:.1} ({})",
                    overall,
                    self.config.min_score,
                    if meets_threshold { "accepted" } else { "below minimum" }
                )
            },
        );

        QualityMetrics {
            clarity: clarity.score,
            difficulty_balance: difficulty.score,
            diversity: diversity.score,
            uniqueness: uniqueness.score,
            overlap_passed: overlap.passed,
            overall_score: overall,
            meets_threshold,
            explanations,
        }
    }

    /// Score a generated puzzle's groups
    pub fn score_puzzle(&self, puzzle: &GeneratedPuzzle) -> QualityMetrics {
        self.score(&puzzle.candidate_groups())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::labeled;
    use fourfold_common::{ConnectionType, Item};

    fn dated_group(first_id: i64, label: &str, kind: ConnectionType, year: i32, votes: u32, difficulty: f64) -> CandidateGroup {
        let items = (first_id..first_id + 4)
            .map(|id| {
                Item::new(id, format!("Item {}", id))
                    .with_release_date(format!("{}-01-01", year))
                    .with_vote_count(votes + id as u32 * 10)
            })
            .collect();
        CandidateGroup::new(items, label, kind, difficulty)
    }

    fn good_puzzle() -> Vec<CandidateGroup> {
        vec![
            dated_group(0, "Directed by Sidney Lumet", ConnectionType::Director, 1975, 8000, 2000.0),
            dated_group(4, "Released in 1984", ConnectionType::Year, 1984, 3000, 7000.0),
            dated_group(8, "Heist stories", ConnectionType::Theme, 1995, 500, 9500.0),
            dated_group(12, "Titles containing \"Night\"", ConnectionType::Wordplay, 2008, 50, 11000.0),
        ]
    }

    #[test]
    fn test_good_puzzle_meets_threshold() {
        let scorer = QualityScorer::new().unwrap();
        let metrics = scorer.score(&good_puzzle());
        assert!(metrics.overlap_passed);
        assert!(metrics.overall_score > 35.0);
        assert!(metrics.meets_threshold);
        assert!(metrics.overall_score <= 100.0);
        for key in ["clarity", "difficulty_balance", "diversity", "uniqueness", "overlap", "overall"] {
            assert!(metrics.explanations.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn test_overall_is_normalized_weighted_sum() {
        let scorer = QualityScorer::new().unwrap();
        let metrics = scorer.score(&good_puzzle());
        let expected = 10.0
            * (metrics.clarity * 0.25
                + metrics.difficulty_balance * 0.20
                + metrics.diversity * 0.20
                + metrics.uniqueness * 0.15)
            / 0.80;
        assert!((metrics.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_vetoes_to_zero() {
        let scorer = QualityScorer::new().unwrap();
        let mut groups = good_puzzle();
        groups[3].items[0] = groups[0].items[0].clone();

        let metrics = scorer.score(&groups);
        assert!(!metrics.overlap_passed);
        assert_eq!(metrics.overall_score, 0.0);
        assert!(!metrics.meets_threshold);
        assert!(metrics.clarity > 0.0, "Sub-scores are still reported");
    }

    #[test]
    fn test_overlap_veto_can_be_disabled() {
        let mut scorer = QualityScorer::new().unwrap();
        scorer
            .configure(&ScorerConfigUpdate {
                require_no_overlap: Some(false),
                ..Default::default()
            })
            .unwrap();
        let mut groups = good_puzzle();
        groups[3].items[0] = groups[0].items[0].clone();

        let metrics = scorer.score(&groups);
        assert!(!metrics.overlap_passed);
        assert!(metrics.overall_score > 0.0);
    }

    #[test]
    fn test_vague_labels_lower_clarity() {
        let scorer = QualityScorer::new().unwrap();
        let groups = vec![
            labeled(0, "Similar movies", ConnectionType::Theme),
            labeled(4, "Related", ConnectionType::Theme),
            labeled(8, "Connected by theme", ConnectionType::Theme),
            labeled(12, "Share something", ConnectionType::Theme),
        ];
        let metrics = scorer.score(&groups);
        assert!(metrics.clarity < 9.0);
        assert!(metrics.overlap_passed);
    }

    #[test]
    fn test_threshold_configurable() {
        let mut scorer = QualityScorer::new().unwrap();
        scorer
            .configure(&ScorerConfigUpdate {
                min_score: Some(99.5),
                ..Default::default()
            })
            .unwrap();
        let metrics = scorer.score(&good_puzzle());
        assert!(!metrics.meets_threshold);
        assert_eq!(scorer.min_score(), 99.5);
    }

    #[test]
    fn test_configure_empty_is_idempotent() {
        let mut scorer = QualityScorer::new().unwrap();
        let before = scorer.config().clone();
        scorer.configure(&ScorerConfigUpdate::default()).unwrap();
        assert_eq!(scorer.config(), &before);
    }
}
