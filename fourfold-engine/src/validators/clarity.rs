//! Clarity Validator
//!
//! Scores each connection label 0-10:
//! - Start at 10
//! - **-3** when shorter than `min_label_length`
//! - **-2** when it matches any vague pattern ("similar...", "related to", "share", ...)
//! - clamp at 0
//! - **+1** (capped at 10) for a specificity marker: 4-digit year, "directed by",
//!   "starring", decade like "1980s", or a quoted phrase
//!
//! The set score is the mean across groups.

use super::{clamp_score, mean, PuzzleValidator, ValidatorReport, MAX_VALIDATOR_SCORE};
use fourfold_common::{CandidateGroup, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_VAGUE_PATTERNS: &[&str] = &[
    r"^similar\b",
    r"^related\b",
    r"\brelated to\b",
    r"\bshares?\b",
    r"^various\b",
    r"^multiple\b",
    r"^connected by\b",
    r"\bsomething\b",
    r"\bstuff\b",
    r"\bthings?\b",
];

const SPECIFICITY_PATTERNS: &[&str] = &[
    r"\b(19|20)\d{2}\b",
    r"\bdirected by\b",
    r"\bstarring\b",
    r"\b\d{4}s\b",
    r#""[^"]+""#,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarityConfig {
    pub min_label_length: usize,
    pub short_label_penalty: f64,
    pub vague_penalty: f64,
    pub specificity_bonus: f64,
    /// Case-insensitive regexes for vague labels
    pub vague_patterns: Vec<String>,
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            min_label_length: 8,
            short_label_penalty: 3.0,
            vague_penalty: 2.0,
            specificity_bonus: 1.0,
            vague_patterns: DEFAULT_VAGUE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityConfigUpdate {
    pub min_label_length: Option<usize>,
    pub short_label_penalty: Option<f64>,
    pub vague_penalty: Option<f64>,
    pub specificity_bonus: Option<f64>,
    pub vague_patterns: Option<Vec<String>>,
}

impl ClarityConfig {
    pub fn merge(&mut self, update: &ClarityConfigUpdate) {
        if let Some(len) = update.min_label_length {
            self.min_label_length = len;
        }
        if let Some(penalty) = update.short_label_penalty {
            self.short_label_penalty = penalty;
        }
        if let Some(penalty) = update.vague_penalty {
            self.vague_penalty = penalty;
        }
        if let Some(bonus) = update.specificity_bonus {
            self.specificity_bonus = bonus;
        }
        if let Some(patterns) = &update.vague_patterns {
            self.vague_patterns = patterns.clone();
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClarityValidator {
    config: ClarityConfig,
    vague: Vec<Regex>,
    specific: Vec<Regex>,
}

impl ClarityValidator {
    pub fn new() -> Result<Self> {
        Self::with_config(ClarityConfig::default())
    }

    /// Build from a full config, compiling its patterns
    pub fn with_config(config: ClarityConfig) -> Result<Self> {
        let vague = compile_all(&config.vague_patterns)?;
        let specific = compile_all(SPECIFICITY_PATTERNS)?;
        Ok(Self {
            config,
            vague,
            specific,
        })
    }

    pub fn config(&self) -> &ClarityConfig {
        &self.config
    }

    /// Merge a partial update and recompile the vague patterns
    pub fn configure(&mut self, update: &ClarityConfigUpdate) -> Result<()> {
        let mut config = self.config.clone();
        config.merge(update);
        *self = Self::with_config(config)?;
        Ok(())
    }

    /// Score one label
    pub fn score_label(&self, label: &str) -> f64 {
        let label = label.trim();
        let mut score = MAX_VALIDATOR_SCORE;

        if label.chars().count() < self.config.min_label_length {
            score -= self.config.short_label_penalty;
        }
        if self.vague.iter().any(|re| re.is_match(label)) {
            score -= self.config.vague_penalty;
        }
        score = score.max(0.0);

        if self.specific.iter().any(|re| re.is_match(label)) {
            score += self.config.specificity_bonus;
        }
        clamp_score(score)
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("(?i){}", pattern.as_ref())).map_err(|e| {
                fourfold_common::Error::Config(format!(
                    "Invalid clarity pattern '{}': {}",
                    pattern.as_ref(),
                    e
                ))
            })
        })
        .collect()
}

impl PuzzleValidator for ClarityValidator {
    fn name(&self) -> &'static str {
        "clarity"
    }

    fn validate(&self, groups: &[CandidateGroup]) -> ValidatorReport {
        if groups.is_empty() {
            return ValidatorReport::new(0.0, "No groups to assess");
        }

        let scores: Vec<f64> = groups.iter().map(|g| self.score_label(&g.connection)).collect();
        let score = mean(&scores);
        let unclear: Vec<&str> = groups
            .iter()
            .zip(&scores)
            .filter(|(_, s)| **s < MAX_VALIDATOR_SCORE)
            .map(|(g, _)| g.connection.as_str())
            .collect();

        let explanation = if unclear.is_empty() {
            format!("All {} connection labels are clear", groups.len())
        } else {
            format!(
                "Clarity {:.1}/10; {} label(s) could be more specific: {}",
                score,
                unclear.len(),
                unclear.join(", ")
            )
        };

        ValidatorReport::new(score, explanation).with_details(json!({ "label_scores": scores }))
    }
}
