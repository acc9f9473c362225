//! Uniqueness Validator
//!
//! - **Rarity**: mean of each group's connection-type interest (0-10). Common
//!   types like director or actor score lower than wordplay or exact year.
//! - **Variety**: `distinct types / groups * 10`
//!
//! Final score is the mean of rarity and variety.

use super::{clamp_score, mean, PuzzleValidator, ValidatorReport, MAX_VALIDATOR_SCORE};
use fourfold_common::{CandidateGroup, ConnectionType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniquenessConfig {
    /// Rarity score per connection-type tag
    pub rarity: BTreeMap<String, f64>,
    /// Score for tags missing from `rarity`
    pub default_rarity: f64,
}

impl Default for UniquenessConfig {
    fn default() -> Self {
        let rarity = [
            ("director", 4.0),
            ("actor", 4.0),
            ("artist", 5.0),
            ("decade", 5.0),
            ("year", 7.0),
            ("theme", 8.0),
            ("wordplay", 9.0),
        ]
        .into_iter()
        .map(|(tag, score)| (tag.to_string(), score))
        .collect();

        Self {
            rarity,
            default_rarity: 6.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniquenessConfigUpdate {
    /// Entries merged over the current table
    pub rarity: Option<BTreeMap<String, f64>>,
    pub default_rarity: Option<f64>,
}

impl UniquenessConfig {
    pub fn merge(&mut self, update: &UniquenessConfigUpdate) {
        if let Some(rarity) = &update.rarity {
            for (tag, score) in rarity {
                self.rarity.insert(tag.to_ascii_lowercase(), *score);
            }
        }
        if let Some(score) = update.default_rarity {
            self.default_rarity = score;
        }
    }

    pub fn rarity_of(&self, connection_type: &ConnectionType) -> f64 {
        self.rarity
            .get(connection_type.as_str())
            .copied()
            .unwrap_or(self.default_rarity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UniquenessValidator {
    config: UniquenessConfig,
}

impl UniquenessValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UniquenessConfig) -> Self {
        Self { config }
    }

    pub fn configure(&mut self, update: &UniquenessConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &UniquenessConfig {
        &self.config
    }
}

impl PuzzleValidator for UniquenessValidator {
    fn name(&self) -> &'static str {
        "uniqueness"
    }

    fn validate(&self, groups: &[CandidateGroup]) -> ValidatorReport {
        if groups.is_empty() {
            return ValidatorReport::new(0.0, "No groups to assess");
        }

        let rarities: Vec<f64> = groups
            .iter()
            .map(|g| clamp_score(self.config.rarity_of(&g.connection_type)))
            .collect();
        let rarity = mean(&rarities);

        let types: BTreeSet<&str> = groups.iter().map(|g| g.connection_type.as_str()).collect();
        let variety = types.len() as f64 / groups.len() as f64 * MAX_VALIDATOR_SCORE;

        let score = (rarity + variety) / 2.0;
        let explanation = format!(
            "Rarity {:.1}/10; {} distinct connection type(s) across {} groups ({})",
            rarity,
            types.len(),
            groups.len(),
            types.iter().copied().collect::<Vec<_>>().join(", ")
        );

        ValidatorReport::new(score, explanation).with_details(json!({
            "rarity": rarity,
            "variety": variety,
            "types": types,
        }))
    }
}
