//! Diversity Validator
//!
//! Two sub-scores over all items in all groups, averaged:
//!
//! - **Era**: weighted mix of
//!   - uniqueness: `min(distinct decades / ideal_decades, 1)`
//!   - balance: `1 - sum(|count - ideal|) / (2 * dated items)` over the decades present
//! - **Popularity**: coefficient of variation of vote counts, scaled so a CV of
//!   `full_score_cv` or more scores 10
//!
//! Items without a parseable year are ignored for the era score; no dated
//! items at all scores 0.

use super::{clamp_score, PuzzleValidator, ValidatorReport, MAX_VALIDATOR_SCORE};
use fourfold_common::{CandidateGroup, Item};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityConfig {
    /// Distinct decades for a full era-uniqueness score
    pub ideal_decades: usize,
    pub era_uniqueness_weight: f64,
    pub era_balance_weight: f64,
    /// Coefficient of variation mapped to a full popularity score
    pub full_score_cv: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            ideal_decades: 4,
            era_uniqueness_weight: 0.5,
            era_balance_weight: 0.5,
            full_score_cv: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfigUpdate {
    pub ideal_decades: Option<usize>,
    pub era_uniqueness_weight: Option<f64>,
    pub era_balance_weight: Option<f64>,
    pub full_score_cv: Option<f64>,
}

impl DiversityConfig {
    pub fn merge(&mut self, update: &DiversityConfigUpdate) {
        if let Some(n) = update.ideal_decades {
            self.ideal_decades = n.max(1);
        }
        if let Some(w) = update.era_uniqueness_weight {
            self.era_uniqueness_weight = w.max(0.0);
        }
        if let Some(w) = update.era_balance_weight {
            self.era_balance_weight = w.max(0.0);
        }
        if let Some(cv) = update.full_score_cv {
            self.full_score_cv = cv;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiversityValidator {
    config: DiversityConfig,
}

impl DiversityValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiversityConfig) -> Self {
        Self { config }
    }

    pub fn configure(&mut self, update: &DiversityConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &DiversityConfig {
        &self.config
    }

    /// Era diversity (0-10) and the decade histogram it was computed from
    pub fn era_score(&self, items: &[&Item]) -> (f64, BTreeMap<i32, usize>) {
        let mut decades: BTreeMap<i32, usize> = BTreeMap::new();
        for decade in items.iter().filter_map(|item| item.decade()) {
            *decades.entry(decade).or_default() += 1;
        }

        let dated: usize = decades.values().sum();
        if dated == 0 {
            return (0.0, decades);
        }

        let distinct = decades.len();
        let uniqueness = (distinct as f64 / self.config.ideal_decades as f64).min(1.0);

        let ideal = dated as f64 / distinct as f64;
        let deviation: f64 = decades.values().map(|&c| (c as f64 - ideal).abs()).sum();
        let balance = 1.0 - deviation / (2.0 * dated as f64);

        let weights = self.config.era_uniqueness_weight + self.config.era_balance_weight;
        let mixed = if weights > 0.0 {
            (uniqueness * self.config.era_uniqueness_weight + balance * self.config.era_balance_weight) / weights
        } else {
            0.0
        };

        (clamp_score(mixed * MAX_VALIDATOR_SCORE), decades)
    }

    /// Popularity diversity (0-10) and the coefficient of variation
    pub fn popularity_score(&self, items: &[&Item]) -> (f64, f64) {
        if items.is_empty() {
            return (0.0, 0.0);
        }
        let values: Vec<f64> = items.iter().map(|item| item.popularity_metric()).collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        if mean <= 0.0 {
            return (0.0, 0.0);
        }
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let cv = variance.sqrt() / mean;

        let scaled = if self.config.full_score_cv > 0.0 {
            (cv / self.config.full_score_cv).min(1.0)
        } else {
            1.0
        };
        (clamp_score(scaled * MAX_VALIDATOR_SCORE), cv)
    }
}

impl PuzzleValidator for DiversityValidator {
    fn name(&self) -> &'static str {
        "diversity"
    }

    fn validate(&self, groups: &[CandidateGroup]) -> ValidatorReport {
        let items: Vec<&Item> = groups.iter().flat_map(|g| g.items.iter()).collect();
        if items.is_empty() {
            return ValidatorReport::new(0.0, "No items to assess");
        }

        let (era, decades) = self.era_score(&items);
        let (popularity, cv) = self.popularity_score(&items);
        let score = (era + popularity) / 2.0;

        let explanation = format!(
            "Era {:.1}/10 across {} decade(s); popularity {:.1}/10 (CV {:.2})",
            era,
            decades.len(),
            popularity,
            cv
        );

        let histogram: BTreeMap<String, usize> = decades
            .iter()
            .map(|(decade, count)| (format!("{}s", decade), *count))
            .collect();

        ValidatorReport::new(score, explanation).with_details(json!({
            "era_score": era,
            "popularity_score": popularity,
            "coefficient_of_variation": cv,
            "decades": histogram,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourfold_common::ConnectionType;

    fn item(id: i64, year: Option<i32>, votes: u32) -> Item {
        let item = Item::new(id, format!("Item {}", id)).with_vote_count(votes);
        match year {
            Some(y) => item.with_release_date(format!("{}-01-01", y)),
            None => item,
        }
    }

    fn group_of(items: Vec<Item>) -> CandidateGroup {
        CandidateGroup::new(items, "Released in the past", ConnectionType::Other("test".into()), 0.0)
    }

    #[test]
    fn test_era_four_even_decades_is_full() {
        let validator = DiversityValidator::new();
        let items: Vec<Item> = [1975, 1985, 1995, 2005]
            .iter()
            .enumerate()
            .map(|(i, y)| item(i as i64, Some(*y), 100))
            .collect();
        let refs: Vec<&Item> = items.iter().collect();
        let (score, decades) = validator.era_score(&refs);
        assert_eq!(decades.len(), 4);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_era_single_decade() {
        let validator = DiversityValidator::new();
        let items: Vec<Item> = (0..4).map(|i| item(i, Some(1984), 100)).collect();
        let refs: Vec<&Item> = items.iter().collect();
        let (score, _) = validator.era_score(&refs);
        // uniqueness 0.25, balance 1.0
        assert!((score - 6.25).abs() < 1e-9);
    }

    #[test]
    fn test_era_undated_items_score_zero() {
        let validator = DiversityValidator::new();
        let items: Vec<Item> = (0..4).map(|i| item(i, None, 100)).collect();
        let refs: Vec<&Item> = items.iter().collect();
        assert_eq!(validator.era_score(&refs).0, 0.0);
    }

    #[test]
    fn test_era_weights_configurable() {
        let mut validator = DiversityValidator::new();
        validator.configure(&DiversityConfigUpdate {
            era_balance_weight: Some(0.0),
            ..Default::default()
        });
        let items: Vec<Item> = (0..4).map(|i| item(i, Some(1984), 100)).collect();
        let refs: Vec<&Item> = items.iter().collect();
        assert!((validator.era_score(&refs).0 - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_popularity_uniform_is_zero_and_spread_scores() {
        let validator = DiversityValidator::new();
        let flat: Vec<Item> = (0..4).map(|i| item(i, None, 500)).collect();
        let refs: Vec<&Item> = flat.iter().collect();
        assert_eq!(validator.popularity_score(&refs).0, 0.0);

        let spread = vec![item(0, None, 10), item(1, None, 10), item(2, None, 10), item(3, None, 9000)];
        let refs: Vec<&Item> = spread.iter().collect();
        let (score, cv) = validator.popularity_score(&refs);
        assert!(cv > 1.0);
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_popularity_zero_votes() {
        let validator = DiversityValidator::new();
        let items: Vec<Item> = (0..4).map(|i| item(i, None, 0)).collect();
        let refs: Vec<&Item> = items.iter().collect();
        assert_eq!(validator.popularity_score(&refs), (0.0, 0.0));
    }

    #[test]
    fn test_validate_combines_mean() {
        let validator = DiversityValidator::new();
        let groups = vec![group_of((0..4).map(|i| item(i, Some(1984), 500)).collect())];
        let report = validator.validate(&groups);
        assert!((report.score - 3.125).abs() < 1e-9);
        assert_eq!(report.details["decades"]["1980s"], json!(4));
    }

    #[test]
    fn test_configure_empty_is_idempotent() {
        let mut validator = DiversityValidator::new();
        let before = validator.config().clone();
        validator.configure(&DiversityConfigUpdate::default());
        assert_eq!(validator.config(), &before);
    }
}
