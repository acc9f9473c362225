//! Puzzle models
//!
//! Lifecycle of a group:
//! 1. `CandidateGroup` - an analyzer (or external source) proposes items + connection
//! 2. `SelectedGroup` - the selector assigns a difficulty tier
//! 3. `PuzzleGroup` - display shape inside a `GeneratedPuzzle`
//!
//! `QualityMetrics` is the scorer's report for one set of groups.

use crate::models::item::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Connection Type
// ============================================================================

/// Connection-type tag (open string enum)
///
/// Serialized as a lowercase string; unknown tags round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    Director,
    Actor,
    Artist,
    Theme,
    Wordplay,
    Decade,
    Year,
    Other(String),
}

impl ConnectionType {
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionType::Director => "director",
            ConnectionType::Actor => "actor",
            ConnectionType::Artist => "artist",
            ConnectionType::Theme => "theme",
            ConnectionType::Wordplay => "wordplay",
            ConnectionType::Decade => "decade",
            ConnectionType::Year => "year",
            ConnectionType::Other(tag) => tag.as_str(),
        }
    }
}

impl From<&str> for ConnectionType {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "director" => ConnectionType::Director,
            "actor" | "cast" => ConnectionType::Actor,
            "artist" => ConnectionType::Artist,
            "theme" => ConnectionType::Theme,
            "wordplay" => ConnectionType::Wordplay,
            "decade" => ConnectionType::Decade,
            "year" => ConnectionType::Year,
            other => ConnectionType::Other(other.to_string()),
        }
    }
}

impl From<String> for ConnectionType {
    fn from(tag: String) -> Self {
        ConnectionType::from(tag.as_str())
    }
}

impl From<ConnectionType> for String {
    fn from(kind: ConnectionType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Candidate Group
// ============================================================================

/// One connection hypothesis: an item subset plus the connection it shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGroup {
    pub items: Vec<Item>,
    /// Human-readable connection label
    pub connection: String,
    pub connection_type: ConnectionType,
    /// Unbounded, higher = harder
    pub difficulty_score: f64,
    /// Source-specific debugging fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl CandidateGroup {
    pub fn new(
        items: Vec<Item>,
        connection: impl Into<String>,
        connection_type: ConnectionType,
        difficulty_score: f64,
    ) -> Self {
        Self {
            items,
            connection: connection.into(),
            connection_type,
            difficulty_score,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn item_ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Size within `[min_size, max_size]` and non-blank connection label
    pub fn is_valid(&self, min_size: usize, max_size: usize) -> bool {
        (min_size..=max_size).contains(&self.items.len()) && !self.connection.trim().is_empty()
    }
}

// ============================================================================
// Difficulty Tiers
// ============================================================================

/// Four ordered difficulty tiers, labeled by color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Yellow,
    Green,
    Blue,
    Purple,
}

impl DifficultyTier {
    /// All tiers, easiest first
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Yellow,
        DifficultyTier::Green,
        DifficultyTier::Blue,
        DifficultyTier::Purple,
    ];

    /// Tier for a zero-based quartile index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-based index (0 = easiest)
    pub fn index(&self) -> usize {
        match self {
            DifficultyTier::Yellow => 0,
            DifficultyTier::Green => 1,
            DifficultyTier::Blue => 2,
            DifficultyTier::Purple => 3,
        }
    }

    /// One-based tier number (1..=4)
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn level(&self) -> DifficultyLevel {
        match self {
            DifficultyTier::Yellow => DifficultyLevel::Easy,
            DifficultyTier::Green => DifficultyLevel::Medium,
            DifficultyTier::Blue => DifficultyLevel::Hard,
            DifficultyTier::Purple => DifficultyLevel::Hardest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Yellow => "yellow",
            DifficultyTier::Green => "green",
            DifficultyTier::Blue => "blue",
            DifficultyTier::Purple => "purple",
        }
    }
}

/// Named difficulty level matching a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
    Hardest,
}

// ============================================================================
// Selected / Display Groups
// ============================================================================

/// Candidate group with an assigned difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedGroup {
    #[serde(flatten)]
    pub group: CandidateGroup,
    pub tier: DifficultyTier,
    pub level: DifficultyLevel,
}

impl SelectedGroup {
    pub fn new(group: CandidateGroup, tier: DifficultyTier) -> Self {
        Self {
            group,
            level: tier.level(),
            tier,
        }
    }
}

/// Display-ready group inside a generated puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleGroup {
    /// Synthetic id: `<connection_type>-<index>`
    pub id: String,
    pub items: Vec<Item>,
    pub connection: String,
    pub connection_type: ConnectionType,
    pub difficulty_score: f64,
    pub tier: DifficultyTier,
    pub level: DifficultyLevel,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PuzzleGroup {
    /// Convert a selected group at position `index` into display shape
    pub fn from_selected(selected: SelectedGroup, index: usize) -> Self {
        let SelectedGroup { group, tier, level } = selected;
        Self {
            id: format!("{}-{}", group.connection_type, index),
            items: group.items,
            connection: group.connection,
            connection_type: group.connection_type,
            difficulty_score: group.difficulty_score,
            tier,
            level,
            metadata: group.metadata,
        }
    }

    /// Scorable candidate form of this group
    pub fn to_candidate(&self) -> CandidateGroup {
        CandidateGroup {
            items: self.items.clone(),
            connection: self.connection.clone(),
            connection_type: self.connection_type.clone(),
            difficulty_score: self.difficulty_score,
            metadata: self.metadata.clone(),
        }
    }
}

/// Complete puzzle: four disjoint groups plus all items in shuffled order
///
/// Never mutated after creation; a new attempt produces a new puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPuzzle {
    pub id: Uuid,
    /// Groups in tier order (easiest first)
    pub groups: Vec<PuzzleGroup>,
    /// All group items, shuffled independently of group order
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedPuzzle {
    pub fn new(groups: Vec<PuzzleGroup>, items: Vec<Item>) -> Self {
        Self {
            id: Uuid::new_v4(),
            groups,
            items,
            created_at: Utc::now(),
        }
    }

    pub fn item_ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn connections(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.connection.clone()).collect()
    }

    /// Groups converted back to candidate form for scoring
    pub fn candidate_groups(&self) -> Vec<CandidateGroup> {
        self.groups.iter().map(PuzzleGroup::to_candidate).collect()
    }
}

// ============================================================================
// Quality Report
// ============================================================================

/// Quality report for one set of (normally four) groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// 0-10
    pub clarity: f64,
    /// 0-10
    pub difficulty_balance: f64,
    /// 0-10
    pub diversity: f64,
    /// 0-10
    pub uniqueness: f64,
    /// Veto: false when any item appears in two groups
    pub overlap_passed: bool,
    /// 0-100
    pub overall_score: f64,
    pub meets_threshold: bool,
    /// Explanation per metric name
    pub explanations: BTreeMap<String, String>,
}
