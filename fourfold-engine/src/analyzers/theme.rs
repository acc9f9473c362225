//! Theme Analyzer
//!
//! Matches items against a [`ThemeCatalog`]: keyword themes search the title
//! and/or synopsis on word boundaries (case-insensitive); title-shape themes
//! match one-word titles or titles containing a digit.
//!
//! The catalog is an explicit artifact handed to the constructor, either the
//! embedded `data/themes.toml` or an operator-supplied file.

use super::{emit_group, run_guarded, Analyzer, AnalyzerConfig, AnalyzerConfigUpdate};
use async_trait::async_trait;
use fourfold_common::{CandidateGroup, ConnectionType, Error, Item, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../../data/themes.toml");

// ============================================================================
// Catalog
// ============================================================================

/// Theme difficulty tier (drives the per-tier difficulty bonus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTier {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl ThemeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeTier::Easy => "easy",
            ThemeTier::Medium => "medium",
            ThemeTier::Hard => "hard",
            ThemeTier::Expert => "expert",
        }
    }
}

/// Which item text a keyword theme searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    Title,
    Overview,
    #[default]
    Both,
}

impl MatchScope {
    fn includes_title(self) -> bool {
        matches!(self, MatchScope::Title | MatchScope::Both)
    }

    fn includes_overview(self) -> bool {
        matches!(self, MatchScope::Overview | MatchScope::Both)
    }
}

/// How a theme decides membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMatcher {
    #[default]
    Keywords,
    SingleWordTitle,
    TitleContainsDigit,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,
    /// Connection label shown to players
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tier: ThemeTier,
    #[serde(default)]
    pub scope: MatchScope,
    #[serde(default)]
    pub matcher: ThemeMatcher,
}

/// Theme catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    #[serde(rename = "theme", default)]
    pub themes: Vec<ThemeDefinition>,
}

impl ThemeCatalog {
    /// Catalog embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid theme catalog: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub base: AnalyzerConfig,
    /// Distinct keywords an item must match to join a keyword theme
    pub min_keyword_matches: usize,
    /// Search synopsis text for themes scoped to it
    pub search_overview: bool,
    pub easy_bonus: f64,
    pub medium_bonus: f64,
    pub hard_bonus: f64,
    pub expert_bonus: f64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            base: AnalyzerConfig::default(),
            min_keyword_matches: 1,
            search_overview: true,
            easy_bonus: 0.0,
            medium_bonus: 1000.0,
            hard_bonus: 2000.0,
            expert_bonus: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfigUpdate {
    #[serde(flatten)]
    pub base: AnalyzerConfigUpdate,
    pub min_keyword_matches: Option<usize>,
    pub search_overview: Option<bool>,
    pub easy_bonus: Option<f64>,
    pub medium_bonus: Option<f64>,
    pub hard_bonus: Option<f64>,
    pub expert_bonus: Option<f64>,
}

impl ThemeConfig {
    pub fn merge(&mut self, update: &ThemeConfigUpdate) {
        self.base.merge(&update.base);
        if let Some(n) = update.min_keyword_matches {
            self.min_keyword_matches = n.max(1);
        }
        if let Some(v) = update.search_overview {
            self.search_overview = v;
        }
        if let Some(v) = update.easy_bonus {
            self.easy_bonus = v;
        }
        if let Some(v) = update.medium_bonus {
            self.medium_bonus = v;
        }
        if let Some(v) = update.hard_bonus {
            self.hard_bonus = v;
        }
        if let Some(v) = update.expert_bonus {
            self.expert_bonus = v;
        }
    }

    pub fn tier_bonus(&self, tier: ThemeTier) -> f64 {
        match tier {
            ThemeTier::Easy => self.easy_bonus,
            ThemeTier::Medium => self.medium_bonus,
            ThemeTier::Hard => self.hard_bonus,
            ThemeTier::Expert => self.expert_bonus,
        }
    }
}

// ============================================================================
// Analyzer
// ============================================================================

#[derive(Debug, Clone)]
struct CompiledTheme {
    definition: ThemeDefinition,
    patterns: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub struct ThemeAnalyzer {
    config: ThemeConfig,
    themes: Vec<CompiledTheme>,
}

impl ThemeAnalyzer {
    /// Compile the catalog's keyword patterns
    ///
    /// # Errors
    /// Returns `Error::Config` if a keyword cannot be compiled.
    pub fn new(catalog: ThemeCatalog) -> Result<Self> {
        let themes = catalog
            .themes
            .into_iter()
            .map(|definition| {
                let patterns = definition
                    .keywords
                    .iter()
                    .map(|kw| kw.trim())
                    .filter(|kw| !kw.is_empty())
                    .map(|kw| {
                        Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).map_err(|e| {
                            Error::Config(format!(
                                "Theme '{}' keyword '{}' invalid: {}",
                                definition.name, kw, e
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledTheme { definition, patterns })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(themes = themes.len(), "Theme catalog compiled");
        Ok(Self {
            config: ThemeConfig::default(),
            themes,
        })
    }

    pub fn configure(&mut self, update: &ThemeConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    fn matches(&self, theme: &CompiledTheme, item: &Item) -> bool {
        match theme.definition.matcher {
            ThemeMatcher::SingleWordTitle => item.title.split_whitespace().count() == 1,
            ThemeMatcher::TitleContainsDigit => item.title.chars().any(|c| c.is_ascii_digit()),
            ThemeMatcher::Keywords => {
                let scope = theme.definition.scope;
                let title = scope.includes_title().then_some(item.title.as_str());
                let overview = if scope.includes_overview() && self.config.search_overview {
                    item.overview.as_deref()
                } else {
                    None
                };

                let hits = theme
                    .patterns
                    .iter()
                    .filter(|pattern| {
                        title.is_some_and(|t| pattern.is_match(t))
                            || overview.is_some_and(|o| pattern.is_match(o))
                    })
                    .count();
                hits > 0 && hits >= self.config.min_keyword_matches
            }
        }
    }

    fn find_connections(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        self.themes
            .iter()
            .filter_map(|theme| {
                let matching: Vec<Item> = pool
                    .iter()
                    .filter(|item| self.matches(theme, item))
                    .cloned()
                    .collect();
                if matching.len() < self.config.base.min_group_size {
                    return None;
                }

                let definition = &theme.definition;
                Some(
                    emit_group(
                        &matching,
                        &self.config.base,
                        definition.label.clone(),
                        ConnectionType::Theme,
                        self.config.tier_bonus(definition.tier),
                    )
                    .with_metadata("theme", serde_json::json!(definition.name))
                    .with_metadata("theme_tier", serde_json::json!(definition.tier.as_str())),
                )
            })
            .collect()
    }
}

#[async_trait]
impl Analyzer for ThemeAnalyzer {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn connection_types(&self) -> Vec<ConnectionType> {
        vec![ConnectionType::Theme]
    }

    fn base_config(&self) -> &AnalyzerConfig {
        &self.config.base
    }

    async fn analyze(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        run_guarded(self.name(), &self.config.base, pool, |pool| self.find_connections(pool))
    }
}
