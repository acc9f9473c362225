//! Group Selector
//!
//! Picks one item-disjoint group per difficulty tier from the full candidate
//! list:
//! 1. Fewer candidates than `count` → empty result
//! 2. Sort ascending by difficulty score
//! 3. Quartile by position: `tier = floor(index * count / total)`
//! 4. Shuffle within each tier (variety between runs)
//! 5. Walk tiers easiest first; take the first candidate sharing no item id
//!    with earlier picks. A tier with no disjoint candidate is skipped.
//!
//! Greedy and single-pass: it can return fewer than `count` groups even when a
//! full disjoint cover exists that needs a non-first pick in an earlier tier.
//! Callers treat a short result as insufficient data and retry.

use fourfold_common::{shuffle_array, CandidateGroup, DifficultyTier, SelectedGroup};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Tiered, item-disjoint group selection
///
/// Stateless; the group count comes from the caller (the engine's
/// `groups_needed`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupSelector;

impl GroupSelector {
    pub fn new() -> Self {
        Self
    }

    /// Select up to `count` item-disjoint groups, one per tier, in tier order
    ///
    /// `count` is capped at the number of difficulty tiers.
    pub fn select_groups(&self, candidates: &[CandidateGroup], count: usize) -> Vec<SelectedGroup> {
        let count = if count > DifficultyTier::ALL.len() {
            warn!(
                requested = count,
                tiers = DifficultyTier::ALL.len(),
                "Requested more groups than difficulty tiers, capping"
            );
            DifficultyTier::ALL.len()
        } else {
            count
        };

        if count == 0 || candidates.len() < count {
            debug!(
                candidates = candidates.len(),
                needed = count,
                "Not enough candidates to select groups"
            );
            return Vec::new();
        }

        let mut sorted: Vec<&CandidateGroup> = candidates.iter().collect();
        sorted.sort_by(|a, b| a.difficulty_score.total_cmp(&b.difficulty_score));

        let tiers = bucket_by_quartile(&sorted, count);

        let mut used_ids: HashSet<i64> = HashSet::new();
        let mut selected = Vec::with_capacity(count);

        for (tier_index, bucket) in tiers.into_iter().enumerate() {
            let Some(tier) = DifficultyTier::from_index(tier_index) else {
                break;
            };

            let pick = shuffle_array(&bucket)
                .into_iter()
                .find(|group| group.items.iter().all(|item| !used_ids.contains(&item.id)));

            match pick {
                Some(group) => {
                    used_ids.extend(group.items.iter().map(|item| item.id));
                    selected.push(SelectedGroup::new(group.clone(), tier));
                }
                None => {
                    debug!(
                        tier = tier.as_str(),
                        candidates = bucket.len(),
                        "No disjoint candidate in tier, skipping"
                    );
                }
            }
        }

        debug!(selected = selected.len(), needed = count, "Group selection complete");
        selected
    }
}

/// Quartile index of position `index` in a sorted list of `total`
pub fn quartile_index(index: usize, total: usize, count: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (index * count / total).min(count.saturating_sub(1))
}

/// Split a difficulty-sorted list into `count` position quartiles
fn bucket_by_quartile<'a>(sorted: &[&'a CandidateGroup], count: usize) -> Vec<Vec<&'a CandidateGroup>> {
    let mut buckets: Vec<Vec<&CandidateGroup>> = vec![Vec::new(); count];
    for (index, group) in sorted.iter().enumerate() {
        buckets[quartile_index(index, sorted.len(), count)].push(group);
    }
    buckets
}
