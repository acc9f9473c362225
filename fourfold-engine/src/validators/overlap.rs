//! Overlap Validator
//!
//! Binary veto: any item id present in two or more groups fails the set with
//! score 0. Runs on every scored set, including externally supplied groups
//! that never went through the selector.

use super::{PuzzleValidator, ValidatorReport, MAX_VALIDATOR_SCORE};
use fourfold_common::CandidateGroup;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapValidator;

impl OverlapValidator {
    pub fn new() -> Self {
        Self
    }

    /// Item ids appearing in more than one group
    ///
    /// An id repeated inside a single group counts once.
    pub fn shared_item_ids(groups: &[CandidateGroup]) -> BTreeSet<i64> {
        let mut seen_in: BTreeMap<i64, usize> = BTreeMap::new();
        for group in groups {
            let ids: HashSet<i64> = group.items.iter().map(|item| item.id).collect();
            for id in ids {
                *seen_in.entry(id).or_default() += 1;
            }
        }
        seen_in
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect()
    }
}

impl PuzzleValidator for OverlapValidator {
    fn name(&self) -> &'static str {
        "overlap"
    }

    fn validate(&self, groups: &[CandidateGroup]) -> ValidatorReport {
        let shared = Self::shared_item_ids(groups);
        if shared.is_empty() {
            return ValidatorReport::new(MAX_VALIDATOR_SCORE, "No item appears in more than one group")
                .with_details(json!({ "shared_item_ids": [] }));
        }

        ValidatorReport::new(
            0.0,
            format!("{} item(s) appear in more than one group: {:?}", shared.len(), shared),
        )
        .failed()
        .with_details(json!({ "shared_item_ids": shared }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::labeled;
    use fourfold_common::ConnectionType;

    #[test]
    fn test_disjoint_groups_pass() {
        let groups = vec![
            labeled(0, "A group", ConnectionType::Theme),
            labeled(4, "B group", ConnectionType::Theme),
        ];
        let report = OverlapValidator::new().validate(&groups);
        assert!(report.passed);
        assert_eq!(report.score, 10.0);
    }

    #[test]
    fn test_shared_item_vetoes() {
        let groups = vec![
            labeled(0, "A group", ConnectionType::Theme),
            labeled(3, "B group", ConnectionType::Theme),
        ];
        let report = OverlapValidator::new().validate(&groups);
        assert!(!report.passed);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.details["shared_item_ids"], json!([3]));
    }

    #[test]
    fn test_duplicate_within_one_group_is_not_overlap() {
        let mut group = labeled(0, "A group", ConnectionType::Theme);
        group.items.push(group.items[0].clone());
        assert!(OverlapValidator::shared_item_ids(&[group]).is_empty());
    }
}
