//! Difficulty Balance Validator
//!
//! Sorts groups by difficulty, assigns quartiles by position exactly as the
//! selector does, and measures how far each quartile's count strays from the
//! ideal `total / 4`:
//!
//! `score = 10 * (1 - sum(|count - ideal|) / total)`

use super::{PuzzleValidator, ValidatorReport, MAX_VALIDATOR_SCORE};
use crate::selector::quartile_index;
use fourfold_common::{CandidateGroup, DifficultyTier};
use serde_json::json;

#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyBalanceValidator;

impl DifficultyBalanceValidator {
    pub fn new() -> Self {
        Self
    }
}

impl PuzzleValidator for DifficultyBalanceValidator {
    fn name(&self) -> &'static str {
        "difficulty_balance"
    }

    fn validate(&self, groups: &[CandidateGroup]) -> ValidatorReport {
        if groups.is_empty() {
            return ValidatorReport::new(0.0, "No groups to assess");
        }

        let tiers = DifficultyTier::ALL.len();
        let mut scores: Vec<f64> = groups.iter().map(|g| g.difficulty_score).collect();
        scores.sort_by(f64::total_cmp);

        let total = scores.len();
        let mut counts = vec![0usize; tiers];
        for index in 0..total {
            counts[quartile_index(index, total, tiers)] += 1;
        }

        let ideal = total as f64 / tiers as f64;
        let deviation: f64 = counts.iter().map(|&c| (c as f64 - ideal).abs()).sum();
        let normalized = deviation / total as f64;
        let score = MAX_VALIDATOR_SCORE * (1.0 - normalized);

        let spread = match (scores.first(), scores.last()) {
            (Some(lo), Some(hi)) => hi - lo,
            _ => 0.0,
        };

        ValidatorReport::new(
            score,
            format!(
                "Quartile counts {:?} against ideal {:.2} (difficulty spread {:.0})",
                counts, ideal, spread
            ),
        )
        .with_details(json!({
            "quartile_counts": counts,
            "ideal": ideal,
            "normalized_deviation": normalized,
            "spread": spread,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::labeled;
    use fourfold_common::ConnectionType;

    fn with_difficulty(first_id: i64, difficulty: f64) -> CandidateGroup {
        let mut group = labeled(first_id, "Released in 1984", ConnectionType::Year);
        group.difficulty_score = difficulty;
        group
    }

    #[test]
    fn test_four_groups_are_balanced() {
        let groups = vec![
            with_difficulty(0, 9000.0),
            with_difficulty(4, 100.0),
            with_difficulty(8, 5000.0),
            with_difficulty(12, 2500.0),
        ];
        let report = DifficultyBalanceValidator::new().validate(&groups);
        assert_eq!(report.score, 10.0);
        assert_eq!(report.details["quartile_counts"], json!([1, 1, 1, 1]));
    }

    #[test]
    fn test_three_groups_leave_a_quartile_empty() {
        let groups = vec![
            with_difficulty(0, 1.0),
            with_difficulty(4, 2.0),
            with_difficulty(8, 3.0),
        ];
        let report = DifficultyBalanceValidator::new().validate(&groups);
        // counts [1,1,1,0], ideal 0.75 -> deviation 1.5 / 3 = 0.5
        assert!((report.score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(DifficultyBalanceValidator::new().validate(&[]).score, 0.0);
    }
}
