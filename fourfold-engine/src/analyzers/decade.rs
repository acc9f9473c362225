//! Decade Analyzer
//!
//! Groups items by `floor(year / 10) * 10`, restricted to enabled decades.
//! Older decades earn an age bonus per decade of distance from the present.

use super::{emit_group, reference_year, run_guarded, Analyzer, AnalyzerConfig, AnalyzerConfigUpdate};
use async_trait::async_trait;
use fourfold_common::time::decade_of;
use fourfold_common::{CandidateGroup, ConnectionType, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decade analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeConfig {
    pub base: AnalyzerConfig,
    /// Decades eligible for grouping (e.g. 1980)
    pub enabled_decades: Vec<i32>,
    /// Difficulty bonus per decade between the group's decade and the present
    pub age_bonus_per_decade: f64,
    /// Year treated as "present"; current year when unset
    pub reference_year: Option<i32>,
}

impl Default for DecadeConfig {
    fn default() -> Self {
        Self {
            base: AnalyzerConfig::default(),
            enabled_decades: (1960..=2020).step_by(10).collect(),
            age_bonus_per_decade: 400.0,
            reference_year: None,
        }
    }
}

/// Partial update for [`DecadeConfig`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecadeConfigUpdate {
    #[serde(flatten)]
    pub base: AnalyzerConfigUpdate,
    pub enabled_decades: Option<Vec<i32>>,
    pub age_bonus_per_decade: Option<f64>,
    pub reference_year: Option<i32>,
}

impl DecadeConfig {
    pub fn merge(&mut self, update: &DecadeConfigUpdate) {
        self.base.merge(&update.base);
        if let Some(decades) = &update.enabled_decades {
            self.enabled_decades = decades.iter().map(|d| decade_of(*d)).collect();
        }
        if let Some(bonus) = update.age_bonus_per_decade {
            self.age_bonus_per_decade = bonus;
        }
        if update.reference_year.is_some() {
            self.reference_year = update.reference_year;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecadeAnalyzer {
    config: DecadeConfig,
}

impl DecadeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(update: &DecadeConfigUpdate) -> Self {
        let mut analyzer = Self::new();
        analyzer.configure(update);
        analyzer
    }

    pub fn configure(&mut self, update: &DecadeConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &DecadeConfig {
        &self.config
    }

    fn age_bonus(&self, decade: i32) -> f64 {
        let present = decade_of(reference_year(self.config.reference_year));
        let decades_ago = ((present - decade) / 10).max(0);
        f64::from(decades_ago) * self.config.age_bonus_per_decade
    }

    fn find_connections(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        let mut buckets: BTreeMap<i32, Vec<Item>> = BTreeMap::new();
        for item in pool {
            let Some(decade) = item.decade() else {
                continue;
            };
            if self.config.enabled_decades.contains(&decade) {
                buckets.entry(decade).or_default().push(item.clone());
            }
        }

        buckets
            .into_iter()
            .filter(|(_, items)| items.len() >= self.config.base.min_group_size)
            .map(|(decade, items)| {
                emit_group(
                    &items,
                    &self.config.base,
                    format!("Released in the {}s", decade),
                    ConnectionType::Decade,
                    self.age_bonus(decade),
                )
                .with_metadata("decade", serde_json::json!(decade))
            })
            .collect()
    }
}

#[async_trait]
impl Analyzer for DecadeAnalyzer {
    fn name(&self) -> &'static str {
        "decade"
    }

    fn connection_types(&self) -> Vec<ConnectionType> {
        vec![ConnectionType::Decade]
    }

    fn base_config(&self) -> &AnalyzerConfig {
        &self.config.base
    }

    async fn analyze(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        run_guarded(self.name(), &self.config.base, pool, |pool| self.find_connections(pool))
    }
}
