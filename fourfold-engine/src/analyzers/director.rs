//! Director / Cast / Artist Analyzer
//!
//! Groups items by contributor identity. Cast credits only count when the
//! contributor is billed within the first `top_billed_slots` positions.

use super::{emit_group, filter_by_vote_count, run_guarded, Analyzer, AnalyzerConfig, AnalyzerConfigUpdate};
use async_trait::async_trait;
use fourfold_common::{CandidateGroup, ConnectionType, CreditRole, Item};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Director analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorConfig {
    pub base: AnalyzerConfig,
    /// Cast credits with `order < top_billed_slots` count
    pub top_billed_slots: u32,
    pub include_directors: bool,
    pub include_cast: bool,
    pub include_artists: bool,
    /// Items below this vote count are ignored
    pub min_vote_count: u32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            base: AnalyzerConfig::default(),
            top_billed_slots: 3,
            include_directors: true,
            include_cast: true,
            include_artists: true,
            min_vote_count: 0,
        }
    }
}

/// Partial update for [`DirectorConfig`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfigUpdate {
    #[serde(flatten)]
    pub base: AnalyzerConfigUpdate,
    pub top_billed_slots: Option<u32>,
    pub include_directors: Option<bool>,
    pub include_cast: Option<bool>,
    pub include_artists: Option<bool>,
    pub min_vote_count: Option<u32>,
}

impl DirectorConfig {
    pub fn merge(&mut self, update: &DirectorConfigUpdate) {
        self.base.merge(&update.base);
        if let Some(slots) = update.top_billed_slots {
            self.top_billed_slots = slots;
        }
        if let Some(v) = update.include_directors {
            self.include_directors = v;
        }
        if let Some(v) = update.include_cast {
            self.include_cast = v;
        }
        if let Some(v) = update.include_artists {
            self.include_artists = v;
        }
        if let Some(v) = update.min_vote_count {
            self.min_vote_count = v;
        }
    }
}

/// Contributor bucket key: (role, person id)
type ContributorKey = (CreditRole, i64);

/// Director / cast / artist analyzer
#[derive(Debug, Clone, Default)]
pub struct DirectorAnalyzer {
    config: DirectorConfig,
}

impl DirectorAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(update: &DirectorConfigUpdate) -> Self {
        let mut analyzer = Self::new();
        analyzer.configure(update);
        analyzer
    }

    pub fn configure(&mut self, update: &DirectorConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    fn role_enabled(&self, role: CreditRole, order: u32) -> bool {
        match role {
            CreditRole::Director => self.config.include_directors,
            CreditRole::Cast => self.config.include_cast && order < self.config.top_billed_slots,
            CreditRole::Artist => self.config.include_artists,
        }
    }

    fn find_connections(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        let mut buckets: BTreeMap<ContributorKey, (String, Vec<Item>)> = BTreeMap::new();

        for item in filter_by_vote_count(pool, self.config.min_vote_count) {
            let mut seen: HashSet<ContributorKey> = HashSet::new();
            for credit in &item.credits {
                if !self.role_enabled(credit.role, credit.order) {
                    continue;
                }
                let key = (credit.role, credit.person_id);
                if !seen.insert(key) {
                    continue;
                }
                buckets
                    .entry(key)
                    .or_insert_with(|| (credit.name.clone(), Vec::new()))
                    .1
                    .push(item.clone());
            }
        }

        buckets
            .into_iter()
            .filter(|(_, (_, items))| items.len() >= self.config.base.min_group_size)
            .map(|((role, person_id), (name, items))| {
                let (label, connection_type) = match role {
                    CreditRole::Director => (format!("Directed by {}", name), ConnectionType::Director),
                    CreditRole::Cast => (format!("Starring {}", name), ConnectionType::Actor),
                    CreditRole::Artist => (format!("Performed by {}", name), ConnectionType::Artist),
                };
                emit_group(&items, &self.config.base, label, connection_type, 0.0)
                    .with_metadata("person_id", serde_json::json!(person_id))
                    .with_metadata("role", serde_json::json!(role.as_str()))
            })
            .collect()
    }
}

#[async_trait]
impl Analyzer for DirectorAnalyzer {
    fn name(&self) -> &'static str {
        "director"
    }

    fn connection_types(&self) -> Vec<ConnectionType> {
        vec![ConnectionType::Director, ConnectionType::Actor, ConnectionType::Artist]
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
    use crate::analyzers::test_support::film;
    use fourfold_common::Credit;

    fn nolan_pool() -> Vec<Item> {
        vec![
            film(1, "Memento", 2000, 9000, (100, "Christopher Nolan")),
            film(2, "Insomnia", 2002, 3000, (100, "Christopher Nolan")),
            film(3, "The Prestige", 2006, 8000, (100, "Christopher Nolan")),
            film(4, "Tenet", 2020, 7000, (100, "Christopher Nolan")),
        ]
    }

    #[tokio::test]
    async fn test_four_films_one_director() {
        let analyzer = DirectorAnalyzer::new();
        let groups = analyzer.analyze(&nolan_pool()).await;

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connection, "Directed by Christopher Nolan");
        assert_eq!(groups[0].connection_type, ConnectionType::Director);
        let mut ids = groups[0].item_ids();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(groups[0].difficulty_score, 10_000.0 - 6750.0);
    }

    #[tokio::test]
    async fn test_three_films_not_enough() {
        let analyzer = DirectorAnalyzer::new();
        let groups = analyzer.analyze(&nolan_pool()[..3]).await;
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_returns_empty() {
        let analyzer = DirectorAnalyzer::with_config(&DirectorConfigUpdate {
            base: AnalyzerConfigUpdate {
                enabled: Some(false),
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(analyzer.analyze(&nolan_pool()).await.is_empty());
    }

    #[tokio::test]
    async fn test_cast_requires_top_billing() {
        let pool: Vec<Item> = (0..4)
            .map(|i| {
                Item::new(i, format!("Film {}", i))
                    .with_vote_count(500)
                    .with_credit(Credit::new(7, "Lead Actor", CreditRole::Cast, 0))
                    .with_credit(Credit::new(8, "Bit Player", CreditRole::Cast, 12))
            })
            .collect();

        let groups = DirectorAnalyzer::new().analyze(&pool).await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connection, "Starring Lead Actor");
        assert_eq!(groups[0].connection_type, ConnectionType::Actor);

        let wide = DirectorAnalyzer::with_config(&DirectorConfigUpdate {
            top_billed_slots: Some(20),
            ..Default::default()
        });
        assert_eq!(wide.analyze(&pool).await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_credit_counts_once() {
        let mut pool = nolan_pool();
        pool[3] = film(4, "Tenet", 2020, 7000, (200, "Someone Else"));
        pool[0] = pool[0]
            .clone()
            .with_credit(Credit::new(100, "Christopher Nolan", CreditRole::Director, 1));
        assert!(DirectorAnalyzer::new().analyze(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_larger_bucket_truncated_to_max() {
        let pool: Vec<Item> = (0..9)
            .map(|i| film(i, &format!("Film {}", i), 1990, 100, (5, "Prolific")))
            .collect();
        let groups = DirectorAnalyzer::new().analyze(&pool).await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 4);
        assert_eq!(groups[0].metadata["pool_matches"], serde_json::json!(9));
    }

    #[test]
    fn test_configure_empty_is_idempotent() {
        let mut analyzer = DirectorAnalyzer::new();
        let before = analyzer.config().clone();
        analyzer.configure(&DirectorConfigUpdate::default());
        assert_eq!(analyzer.config(), &before);
    }
}
