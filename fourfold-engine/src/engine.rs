//! Puzzle Engine
//!
//! Single-attempt orchestration:
//! 1. Optional recency filter over the pool (falls back to the full pool when
//!    too few items remain)
//! 2. Run every enabled analyzer concurrently and flatten their candidates
//! 3. Drop candidates whose label was used recently
//! 4. Select one disjoint group per tier
//! 5. Convert to display groups and shuffle all items
//!
//! Insufficient material is an error here; the generator decides whether to
//! retry.

use crate::error::{PuzzleError, Result};
use crate::registry::AnalyzerRegistry;
use crate::selector::GroupSelector;
use crate::verification::ItemVerifier;
use fourfold_common::{
    shuffle_array, CandidateGroup, DifficultyTier, GeneratedPuzzle, Item, PuzzleGroup, SelectedGroup,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Groups per puzzle (at most one per difficulty tier)
    pub groups_needed: usize,
    /// Apply the recent-item filter when recent ids are supplied
    pub avoid_recent: bool,
    /// Below this many items the recency filter is abandoned
    pub min_pool_after_recency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            groups_needed: DifficultyTier::ALL.len(),
            avoid_recent: true,
            min_pool_after_recency: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfigUpdate {
    pub groups_needed: Option<usize>,
    pub avoid_recent: Option<bool>,
    pub min_pool_after_recency: Option<usize>,
}

impl EngineConfig {
    pub fn merge(&mut self, update: &EngineConfigUpdate) {
        if let Some(groups) = update.groups_needed {
            let max = DifficultyTier::ALL.len();
            if groups == 0 || groups > max {
                warn!(requested = groups, max, "groups_needed out of range, clamping");
            }
            self.groups_needed = groups.clamp(1, max);
        }
        if let Some(avoid) = update.avoid_recent {
            self.avoid_recent = avoid;
        }
        if let Some(min) = update.min_pool_after_recency {
            self.min_pool_after_recency = min;
        }
    }
}

/// Puzzle Engine
///
/// Holds the registry it was given; the same registry may back several
/// engines.
///
/// # Example
/// ```rust,ignore
/// use fourfold_engine::{AnalyzerRegistry, PuzzleEngine, ThemeCatalog};
/// use std::sync::Arc;
///
/// let registry = Arc::new(AnalyzerRegistry::with_default_analyzers(ThemeCatalog::builtin()?)?);
/// let engine = PuzzleEngine::new(registry);
///
/// let puzzle = engine.generate_puzzle(&pool, None, None).await?;
/// for group in &puzzle.groups {
///     println!("{:?}: {}", group.tier, group.connection);
/// }
/// ```
pub struct PuzzleEngine {
    registry: Arc<AnalyzerRegistry>,
    selector: GroupSelector,
    verifier: Option<Arc<dyn ItemVerifier>>,
    config: EngineConfig,
}

impl PuzzleEngine {
    pub fn new(registry: Arc<AnalyzerRegistry>) -> Self {
        Self {
            registry,
            selector: GroupSelector::new(),
            verifier: None,
            config: EngineConfig::default(),
        }
    }

    /// Annotate selected groups with verification results
    pub fn with_verifier(mut self, verifier: Arc<dyn ItemVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn configure(&mut self, update: &EngineConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<AnalyzerRegistry> {
        &self.registry
    }

    /// Generate one puzzle from the pool
    ///
    /// # Errors
    /// - [`PuzzleError::NoEnabledAnalyzers`] when the registry has nothing to run
    /// - [`PuzzleError::InsufficientCandidates`] / [`PuzzleError::InsufficientGroups`]
    ///   when the pool cannot fill every tier
    pub async fn generate_puzzle(
        &self,
        pool: &[Item],
        recent_item_ids: Option<&HashSet<i64>>,
        recent_connections: Option<&HashSet<String>>,
    ) -> Result<GeneratedPuzzle> {
        let working_pool = self.apply_recency_filter(pool, recent_item_ids);

        let mut candidates = self.collect_candidates(&working_pool).await?;

        if let Some(recent) = recent_connections.filter(|r| !r.is_empty()) {
            let before = candidates.len();
            candidates.retain(|group| !recent.contains(&group.connection));
            debug!(
                dropped = before - candidates.len(),
                remaining = candidates.len(),
                "Filtered recently used connections"
            );
        }

        let needed = self.config.groups_needed;
        if candidates.len() < needed {
            return Err(PuzzleError::InsufficientCandidates {
                available: candidates.len(),
                needed,
            });
        }

        self.assemble_puzzle(candidates).await
    }

    /// Run every enabled analyzer concurrently and flatten the results
    pub async fn collect_candidates(&self, pool: &[Item]) -> Result<Vec<CandidateGroup>> {
        let analyzers = self.registry.enabled();
        if analyzers.is_empty() {
            return Err(PuzzleError::NoEnabledAnalyzers);
        }

        let futures = analyzers.iter().map(|analyzer| async move {
            let groups = analyzer.analyze(pool).await;
            debug!(analyzer = analyzer.name(), candidates = groups.len(), "Analyzer finished");
            groups
        });

        let candidates: Vec<CandidateGroup> = join_all(futures).await.into_iter().flatten().collect();

        debug!(
            analyzers = analyzers.len(),
            pool_size = pool.len(),
            candidates = candidates.len(),
            "Candidate collection complete"
        );
        Ok(candidates)
    }

    /// Build a puzzle from candidate groups of any origin
    ///
    /// Groups with no items or a blank label are ignored. The selector still
    /// enforces disjointness and tiering.
    pub async fn assemble_puzzle(&self, candidates: Vec<CandidateGroup>) -> Result<GeneratedPuzzle> {
        let needed = self.config.groups_needed;
        let usable: Vec<CandidateGroup> = candidates
            .into_iter()
            .filter(|group| group.is_valid(1, usize::MAX))
            .collect();

        let selected = self.selector.select_groups(&usable, needed);
        if selected.len() < needed {
            return Err(PuzzleError::InsufficientGroups {
                selected: selected.len(),
                needed,
            });
        }

        let mut groups = Vec::with_capacity(selected.len());
        for (index, group) in selected.into_iter().enumerate() {
            let group = self.annotate_verification(group).await;
            groups.push(PuzzleGroup::from_selected(group, index));
        }

        let all_items: Vec<Item> = groups.iter().flat_map(|g| g.items.iter().cloned()).collect();
        let puzzle = GeneratedPuzzle::new(groups, shuffle_array(&all_items));

        info!(
            puzzle_id = %puzzle.id,
            connections = ?puzzle.connections(),
            "Puzzle assembled"
        );
        Ok(puzzle)
    }

    fn apply_recency_filter<'a>(&self, pool: &'a [Item], recent_item_ids: Option<&HashSet<i64>>) -> Cow<'a, [Item]> {
        let recent = match recent_item_ids {
            Some(recent) if self.config.avoid_recent && !recent.is_empty() => recent,
            _ => return Cow::Borrowed(pool),
        };

        let filtered: Vec<Item> = pool.iter().filter(|item| !recent.contains(&item.id)).cloned().collect();
        if filtered.len() < self.config.min_pool_after_recency {
            warn!(
                filtered = filtered.len(),
                pool_size = pool.len(),
                minimum = self.config.min_pool_after_recency,
                "Recency filter left too few items, using unfiltered pool"
            );
            return Cow::Borrowed(pool);
        }

        debug!(
            excluded = pool.len() - filtered.len(),
            remaining = filtered.len(),
            "Applied recency filter"
        );
        Cow::Owned(filtered)
    }

    async fn annotate_verification(&self, mut selected: SelectedGroup) -> SelectedGroup {
        let Some(verifier) = &self.verifier else {
            return selected;
        };

        let checks = selected
            .group
            .items
            .iter()
            .map(|item| async move { (item.id, verifier.verify(&item.title, item.year()).await) });
        let results = join_all(checks).await;

        let mut unverified = Vec::new();
        let mut external_ids = BTreeMap::new();
        for (id, verification) in results {
            if !verification.verified {
                unverified.push(id);
            }
            if let Some(external_id) = verification.external_id {
                external_ids.insert(id.to_string(), external_id);
            }
        }

        if !unverified.is_empty() {
            debug!(
                connection = %selected.group.connection,
                unverified = unverified.len(),
                "Group contains unverified items"
            );
        }

        selected.group.metadata.insert("unverified_item_ids".to_string(), json!(unverified));
        selected.group.metadata.insert("external_ids".to_string(), json!(external_ids));
        selected
    }
}

impl std::fmt::Debug for PuzzleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleEngine")
            .field("registry", &self.registry)
            .field("has_verifier", &self.verifier.is_some())
            .field("config", &self.config)
            .finish()
    }
}
