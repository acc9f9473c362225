//! Connection Analyzers
//!
//! Each analyzer scans the full item pool and proposes candidate groups that
//! share one connection. Analyzers are independent and stateless across calls,
//! so the engine runs all enabled ones concurrently.
//!
//! # Analyzers
//! 1. **director** - shared director, top-billed cast member or performing artist
//! 2. **decade** - release decade (enabled decades only)
//! 3. **year** - exact release year ("interesting years" allow-list)
//! 4. **theme** - keyword themes from a [`ThemeCatalog`], plus title-shape themes
//! 5. **wordplay** - shared significant word in titles
//!
//! # Guarded analysis
//! Every analyzer routes through [`run_guarded`]: disabled analyzers and pools
//! smaller than `min_group_size` yield nothing, and any group failing
//! [`CandidateGroup::is_valid`] is dropped before it leaves the analyzer.

pub mod decade;
pub mod director;
pub mod theme;
pub mod wordplay;
pub mod year;

pub use decade::{DecadeAnalyzer, DecadeConfig, DecadeConfigUpdate};
pub use director::{DirectorAnalyzer, DirectorConfig, DirectorConfigUpdate};
pub use theme::{ThemeAnalyzer, ThemeCatalog, ThemeConfig, ThemeConfigUpdate, ThemeDefinition};
pub use wordplay::{WordplayAnalyzer, WordplayConfig, WordplayConfigUpdate};
pub use year::{YearAnalyzer, YearConfig, YearConfigUpdate};

use async_trait::async_trait;
use fourfold_common::{shuffle_array, CandidateGroup, ConnectionType, Item};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Baseline for difficulty scores: `10000 - average vote count`
pub const DIFFICULTY_BASELINE: f64 = 10_000.0;

/// Connection analyzer
///
/// # Example
/// ```rust,ignore
/// use fourfold_engine::analyzers::{Analyzer, DirectorAnalyzer};
///
/// let analyzer = DirectorAnalyzer::new();
/// let groups = analyzer.analyze(&pool).await;
/// for group in groups {
///     println!("{} ({:.0})", group.connection, group.difficulty_score);
/// }
/// ```
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Unique registry name
    fn name(&self) -> &'static str;

    /// Connection types this analyzer can emit
    fn connection_types(&self) -> Vec<ConnectionType>;

    /// Shared base configuration
    fn base_config(&self) -> &AnalyzerConfig;

    fn is_enabled(&self) -> bool {
        self.base_config().enabled
    }

    /// Propose candidate groups from the pool
    ///
    /// Never fails: an unsuitable pool yields an empty list.
    async fn analyze(&self, pool: &[Item]) -> Vec<CandidateGroup>;
}

// ============================================================================
// Base Configuration
// ============================================================================

/// Configuration shared by every analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub enabled: bool,
    pub min_group_size: usize,
    pub max_group_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_group_size: 4,
            max_group_size: 4,
        }
    }
}

/// Partial update for [`AnalyzerConfig`]; absent fields keep current values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfigUpdate {
    pub enabled: Option<bool>,
    pub min_group_size: Option<usize>,
    pub max_group_size: Option<usize>,
}

impl AnalyzerConfig {
    /// Merge present fields of `update` over this config
    pub fn merge(&mut self, update: &AnalyzerConfigUpdate) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(min) = update.min_group_size {
            self.min_group_size = min.max(1);
        }
        if let Some(max) = update.max_group_size {
            self.max_group_size = max;
        }
        if self.max_group_size < self.min_group_size {
            warn!(
                min = self.min_group_size,
                max = self.max_group_size,
                "max_group_size below min_group_size, raising max"
            );
            self.max_group_size = self.min_group_size;
        }
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Wrap an analyzer's connection search with the common guards
///
/// Skips disabled analyzers and undersized pools, then drops invalid groups.
pub fn run_guarded<F>(
    name: &str,
    config: &AnalyzerConfig,
    pool: &[Item],
    find_connections: F,
) -> Vec<CandidateGroup>
where
    F: FnOnce(&[Item]) -> Vec<CandidateGroup>,
{
    if !config.enabled {
        trace!(analyzer = name, "Analyzer disabled, skipping");
        return Vec::new();
    }
    if pool.len() < config.min_group_size {
        trace!(
            analyzer = name,
            pool_size = pool.len(),
            min_group_size = config.min_group_size,
            "Pool smaller than minimum group size, skipping"
        );
        return Vec::new();
    }

    let found = find_connections(pool);
    let found_count = found.len();
    let valid: Vec<CandidateGroup> = found
        .into_iter()
        .filter(|group| group.is_valid(config.min_group_size, config.max_group_size))
        .collect();

    debug!(
        analyzer = name,
        candidates = valid.len(),
        dropped = found_count - valid.len(),
        "Analysis complete"
    );
    valid
}

/// `10000 - average vote count` of the items (obscure items score harder)
pub fn base_difficulty(items: &[Item]) -> f64 {
    if items.is_empty() {
        return DIFFICULTY_BASELINE;
    }
    let total: f64 = items.iter().map(Item::popularity_metric).sum();
    DIFFICULTY_BASELINE - total / items.len() as f64
}

/// Items with at least `min_vote_count` votes
pub fn filter_by_vote_count(pool: &[Item], min_vote_count: u32) -> impl Iterator<Item = &Item> {
    pool.iter().filter(move |item| item.vote_count >= min_vote_count)
}

/// Build one candidate group from all items matching a connection
///
/// Shuffles the matches, keeps at most `max_group_size`, and scores the kept
/// items with [`base_difficulty`] plus `bonus`.
pub fn emit_group(
    matching: &[Item],
    config: &AnalyzerConfig,
    connection: impl Into<String>,
    connection_type: ConnectionType,
    bonus: f64,
) -> CandidateGroup {
    let mut items = shuffle_array(matching);
    items.truncate(config.max_group_size);
    let difficulty = base_difficulty(&items) + bonus;
    CandidateGroup::new(items, connection, connection_type, difficulty)
        .with_metadata("pool_matches", serde_json::json!(matching.len()))
}

/// Reference year for age bonuses (configured override or current year)
pub(crate) fn reference_year(configured: Option<i32>) -> i32 {
    configured.unwrap_or_else(fourfold_common::time::current_year)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: i64) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(i, format!("Item {}", i)).with_vote_count(1000))
            .collect()
    }

    #[test]
    fn test_base_difficulty_inverse_of_votes() {
        let obscure = vec![Item::new(1, "a").with_vote_count(100)];
        let famous = vec![Item::new(2, "b").with_vote_count(9000)];
        assert_eq!(base_difficulty(&obscure), 9900.0);
        assert_eq!(base_difficulty(&famous), 1000.0);
        assert!(base_difficulty(&obscure) > base_difficulty(&famous));
        assert_eq!(base_difficulty(&[]), DIFFICULTY_BASELINE);
    }

    #[test]
    fn test_merge_empty_update_is_noop() {
        let mut config = AnalyzerConfig::default();
        let before = config.clone();
        config.merge(&AnalyzerConfigUpdate::default());
        assert_eq!(config, before);
    }

    #[test]
    fn test_merge_partial_update() {
        let mut config = AnalyzerConfig::default();
        config.merge(&AnalyzerConfigUpdate {
            enabled: Some(false),
            ..Default::default()
        });
        assert!(!config.enabled);
        assert_eq!(config.min_group_size, 4);
    }

    #[test]
    fn test_merge_keeps_max_at_least_min() {
        let mut config = AnalyzerConfig::default();
        config.merge(&AnalyzerConfigUpdate {
            min_group_size: Some(6),
            ..Default::default()
        });
        assert_eq!(config.max_group_size, 6);
    }

    #[test]
    fn test_run_guarded_skips_disabled() {
        let config = AnalyzerConfig {
            enabled: false,
            ..Default::default()
        };
        let mut called = false;
        let out = run_guarded("test", &config, &pool(20), |_| {
            called = true;
            Vec::new()
        });
        assert!(out.is_empty());
        assert!(!called);
    }

    #[test]
    fn test_run_guarded_skips_tiny_pool() {
        let out = run_guarded("test", &AnalyzerConfig::default(), &pool(3), |p| {
            vec![CandidateGroup::new(p.to_vec(), "x", ConnectionType::Theme, 0.0)]
        });
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_guarded_drops_invalid_groups() {
        let items = pool(8);
        let out = run_guarded("test", &AnalyzerConfig::default(), &items, |p| {
            vec![
                CandidateGroup::new(p[0..4].to_vec(), "Good label", ConnectionType::Theme, 0.0),
                CandidateGroup::new(p[0..4].to_vec(), "  ", ConnectionType::Theme, 0.0),
                CandidateGroup::new(p[0..3].to_vec(), "Too small", ConnectionType::Theme, 0.0),
                CandidateGroup::new(p[0..6].to_vec(), "Too big", ConnectionType::Theme, 0.0),
            ]
        });
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].connection, "Good label");
    }

    #[test]
    fn test_emit_group_truncates_and_scores() {
        let items = pool(7);
        let group = emit_group(&items, &AnalyzerConfig::default(), "Label", ConnectionType::Year, 50.0);
        assert_eq!(group.items.len(), 4);
        assert_eq!(group.difficulty_score, 9000.0 + 50.0);
        assert_eq!(group.metadata["pool_matches"], serde_json::json!(7));
        assert!(group.items.iter().all(|i| items.contains(i)));
    }

    #[test]
    fn test_filter_by_vote_count() {
        let items = vec![
            Item::new(1, "a").with_vote_count(10),
            Item::new(2, "b").with_vote_count(500),
        ];
        let kept: Vec<i64> = filter_by_vote_count(&items, 100).map(|i| i.id).collect();
        assert_eq!(kept, vec![2]);
    }
}
