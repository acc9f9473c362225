//! Year Analyzer
//!
//! Groups items released in the same year, limited to an allow-list of
//! "interesting" years. Older years earn a per-year age bonus.

use super::{emit_group, reference_year, run_guarded, Analyzer, AnalyzerConfig, AnalyzerConfigUpdate};
use async_trait::async_trait;
use fourfold_common::{CandidateGroup, ConnectionType, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Years with enough cultural weight to make a fair connection
const DEFAULT_INTERESTING_YEARS: [i32; 14] = [
    1939, 1959, 1968, 1972, 1977, 1982, 1984, 1994, 1999, 2001, 2007, 2012, 2019, 2023,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearConfig {
    pub base: AnalyzerConfig,
    pub interesting_years: Vec<i32>,
    pub age_bonus_per_year: f64,
    /// Year treated as "present"; current year when unset
    pub reference_year: Option<i32>,
}

impl Default for YearConfig {
    fn default() -> Self {
        Self {
            base: AnalyzerConfig::default(),
            interesting_years: DEFAULT_INTERESTING_YEARS.to_vec(),
            age_bonus_per_year: 15.0,
            reference_year: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearConfigUpdate {
    #[serde(flatten)]
    pub base: AnalyzerConfigUpdate,
    pub interesting_years: Option<Vec<i32>>,
    pub age_bonus_per_year: Option<f64>,
    pub reference_year: Option<i32>,
}

impl YearConfig {
    pub fn merge(&mut self, update: &YearConfigUpdate) {
        self.base.merge(&update.base);
        if let Some(years) = &update.interesting_years {
            self.interesting_years = years.clone();
        }
        if let Some(bonus) = update.age_bonus_per_year {
            self.age_bonus_per_year = bonus;
        }
        if update.reference_year.is_some() {
            self.reference_year = update.reference_year;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct YearAnalyzer {
    config: YearConfig,
}

impl YearAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(update: &YearConfigUpdate) -> Self {
        let mut analyzer = Self::new();
        analyzer.configure(update);
        analyzer
    }

    pub fn configure(&mut self, update: &YearConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &YearConfig {
        &self.config
    }

    fn find_connections(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        let present = reference_year(self.config.reference_year);
        let mut buckets: BTreeMap<i32, Vec<Item>> = BTreeMap::new();
        for item in pool {
            if let Some(year) = item.year().filter(|y| self.config.interesting_years.contains(y)) {
                buckets.entry(year).or_default().push(item.clone());
            }
        }

        buckets
            .into_iter()
            .filter(|(_, items)| items.len() >= self.config.base.min_group_size)
            .map(|(year, items)| {
                let bonus = f64::from((present - year).max(0)) * self.config.age_bonus_per_year;
                emit_group(
                    &items,
                    &self.config.base,
                    format!("Released in {}", year),
                    ConnectionType::Year,
                    bonus,
                )
                .with_metadata("year", serde_json::json!(year))
            })
            .collect()
    }
}

#[async_trait]
impl Analyzer for YearAnalyzer {
    fn name(&self) -> &'static str {
        "year"
    }

    fn connection_types(&self) -> Vec<ConnectionType> {
        vec![ConnectionType::Year]
    }

    fn base_config(&self) -> &AnalyzerConfig {
        &self.config.base
    }

    async fn analyze(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        run_guarded(self.name(), &self.config.base, pool, |pool| self.find_connections(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn released(id: i64, date: &str) -> Item {
        Item::new(id, format!("Film {}", id))
            .with_release_date(date)
            .with_vote_count(2000)
    }

    #[tokio::test]
    async fn test_groups_interesting_year_only() {
        let mut pool: Vec<Item> = (0..5).map(|i| released(i, "1984-03-01")).collect();
        pool.extend((10..15).map(|i| released(i, "1985-03-01")));

        let analyzer = YearAnalyzer::with_config(&YearConfigUpdate {
            reference_year: Some(2024),
            ..Default::default()
        });
        let groups = analyzer.analyze(&pool).await;

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connection, "Released in 1984");
        assert_eq!(groups[0].items.len(), 4);
        assert_eq!(groups[0].difficulty_score, 8000.0 + 40.0 * 15.0);
    }

    #[tokio::test]
    async fn test_custom_allow_list() {
        let pool: Vec<Item> = (0..4).map(|i| released(i, "1985")).collect();
        let analyzer = YearAnalyzer::with_config(&YearConfigUpdate {
            interesting_years: Some(vec![1985]),
            ..Default::default()
        });
        assert_eq!(analyzer.analyze(&pool).await.len(), 1);
    }

    #[tokio::test]
    async fn test_tiny_pool_empty() {
        let pool: Vec<Item> = (0..3).map(|i| released(i, "1984")).collect();
        assert!(YearAnalyzer::new().analyze(&pool).await.is_empty());
    }

    #[test]
    fn test_configure_empty_is_idempotent() {
        let mut analyzer = YearAnalyzer::new();
        let before = analyzer.config().clone();
        analyzer.configure(&YearConfigUpdate::default());
        assert_eq!(analyzer.config(), &before);
    }
}
