//! Wordplay Analyzer
//!
//! Tokenizes titles into lowercase words of at least `min_word_length`
//! characters, drops stop words, and groups items sharing a word. Rarer words
//! (fewer pool items sharing them) earn a larger bonus.

use super::{emit_group, run_guarded, Analyzer, AnalyzerConfig, AnalyzerConfigUpdate};
use async_trait::async_trait;
use fourfold_common::{CandidateGroup, ConnectionType, Item};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "into", "over", "under", "your", "what",
    "when", "where", "which", "about", "after", "before", "there", "their", "they", "them", "have",
    "will", "just", "than", "then", "part", "movie", "film", "story", "chapter", "episode",
    "edition", "version", "remastered", "feat", "featuring", "live", "remix",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordplayConfig {
    pub base: AnalyzerConfig,
    pub min_word_length: usize,
    pub stop_words: Vec<String>,
    /// Operator additions on top of `stop_words`
    pub extra_stop_words: Vec<String>,
    /// Bonus divided by the number of pool items sharing the word
    pub rarity_bonus: f64,
}

impl Default for WordplayConfig {
    fn default() -> Self {
        Self {
            base: AnalyzerConfig::default(),
            min_word_length: 4,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            extra_stop_words: Vec::new(),
            rarity_bonus: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordplayConfigUpdate {
    #[serde(flatten)]
    pub base: AnalyzerConfigUpdate,
    pub min_word_length: Option<usize>,
    pub stop_words: Option<Vec<String>>,
    pub extra_stop_words: Option<Vec<String>>,
    pub rarity_bonus: Option<f64>,
}

impl WordplayConfig {
    pub fn merge(&mut self, update: &WordplayConfigUpdate) {
        self.base.merge(&update.base);
        if let Some(n) = update.min_word_length {
            self.min_word_length = n.max(1);
        }
        if let Some(words) = &update.stop_words {
            self.stop_words = words.clone();
        }
        if let Some(words) = &update.extra_stop_words {
            self.extra_stop_words = words.clone();
        }
        if let Some(bonus) = update.rarity_bonus {
            self.rarity_bonus = bonus;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordplayAnalyzer {
    config: WordplayConfig,
}

impl WordplayAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(update: &WordplayConfigUpdate) -> Self {
        let mut analyzer = Self::new();
        analyzer.configure(update);
        analyzer
    }

    pub fn configure(&mut self, update: &WordplayConfigUpdate) {
        self.config.merge(update);
    }

    pub fn config(&self) -> &WordplayConfig {
        &self.config
    }

    /// Distinct significant words of a title
    pub fn significant_words(&self, title: &str, stop_words: &HashSet<String>) -> BTreeSet<String> {
        title
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().count() >= self.config.min_word_length)
            .filter(|word| !stop_words.contains(*word))
            .map(str::to_string)
            .collect()
    }

    fn stop_word_set(&self) -> HashSet<String> {
        self.config
            .stop_words
            .iter()
            .chain(&self.config.extra_stop_words)
            .map(|w| w.trim().to_lowercase())
            .collect()
    }

    fn find_connections(&self, pool: &[Item]) -> Vec<CandidateGroup> {
        let stop_words = self.stop_word_set();
        let mut buckets: BTreeMap<String, Vec<Item>> = BTreeMap::new();
        for item in pool {
            for word in self.significant_words(&item.title, &stop_words) {
                buckets.entry(word).or_default().push(item.clone());
            }
        }

        buckets
            .into_iter()
            .filter(|(_, items)| items.len() >= self.config.base.min_group_size)
            .map(|(word, items)| {
                let rarity = self.config.rarity_bonus / items.len() as f64;
                emit_group(
                    &items,
                    &self.config.base,
                    format!("Titles containing \"{}\"", capitalize(&word)),
                    ConnectionType::Wordplay,
                    rarity,
                )
                .with_metadata("word", serde_json::json!(word))
            })
            .collect()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl Analyzer for WordplayAnalyzer {
    fn name(&self) -> &'static str {
        "wordplay"
    }

    fn connection_types(&self) -> Vec<ConnectionType> {
        vec![ConnectionType::Wordplay]
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

    fn titled(id: i64, title: &str) -> Item {
        Item::new(id, title).with_vote_count(1000)
    }

    #[test]
    fn test_tokenization_rules() {
        let analyzer = WordplayAnalyzer::new();
        let words = analyzer.significant_words("The Night of the Hunter: Night Part II", &analyzer.stop_word_set());
        let expected: BTreeSet<String> = ["night", "hunter"].iter().map(|s| s.to_string()).collect();
        assert_eq!(words, expected);
    }

    #[tokio::test]
    async fn test_groups_shared_word() {
        let pool = vec![
            titled(1, "Night of the Living Dead"),
            titled(2, "A Night at the Opera"),
            titled(3, "Boogie Nights"),
            titled(4, "The Night of the Hunter"),
            titled(5, "Night Moves"),
            titled(6, "Heat"),
        ];
        let groups = WordplayAnalyzer::new().analyze(&pool).await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connection, "Titles containing \"Night\"");
        assert!(!groups[0].item_ids().contains(&3), "Nights is a different word");
        assert_eq!(groups[0].difficulty_score, 9000.0 + 3000.0 / 4.0);
    }

    #[tokio::test]
    async fn test_rarer_words_score_higher() {
        let mut pool: Vec<Item> = (0..4).map(|i| titled(i, &format!("Crimson Tide {}", i))).collect();
        pool.extend((10..18).map(|i| titled(i, &format!("Blade Runner {}", i))));

        let groups = WordplayAnalyzer::with_config(&WordplayConfigUpdate {
            extra_stop_words: Some(vec!["Tide".to_string(), "Runner".to_string()]),
            ..Default::default()
        })
        .analyze(&pool)
        .await;

        let crimson = groups.iter().find(|g| g.connection.contains("Crimson")).unwrap();
        let blade = groups.iter().find(|g| g.connection.contains("Blade")).unwrap();
        assert!(crimson.difficulty_score > blade.difficulty_score);
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test]
    async fn test_stop_words_excluded() {
        let pool: Vec<Item> = (0..5).map(|i| titled(i, &format!("Movie Time {}", i))).collect();
        let analyzer = WordplayAnalyzer::with_config(&WordplayConfigUpdate {
            extra_stop_words: Some(vec!["time".to_string()]),
            ..Default::default()
        });
        assert!(analyzer.analyze(&pool).await.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("night"), "Night");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_configure_empty_is_idempotent() {
        let mut analyzer = WordplayAnalyzer::new();
        let before = analyzer.config().clone();
        analyzer.configure(&WordplayConfigUpdate::default());
        assert_eq!(analyzer.config(), &before);
    }
}
