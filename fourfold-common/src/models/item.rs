//! Content items (films and music tracks)
//!
//! Items are immutable inputs to puzzle generation. The engine groups and
//! filters them but never changes them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of content unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Film,
    Track,
}

/// Role of a contributor credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditRole {
    /// Film director
    Director,
    /// Billed cast member (see `Credit::order`)
    Cast,
    /// Performing artist of a track
    Artist,
}

impl CreditRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditRole::Director => "director",
            CreditRole::Cast => "cast",
            CreditRole::Artist => "artist",
        }
    }
}

/// Contributor credit on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    /// Contributor identity (stable across items)
    pub person_id: i64,
    /// Display name
    pub name: String,
    pub role: CreditRole,
    /// Billing order, 0 = top billed
    #[serde(default)]
    pub order: u32,
}

impl Credit {
    pub fn new(person_id: i64, name: impl Into<String>, role: CreditRole, order: u32) -> Self {
        Self {
            person_id,
            name: name.into(),
            role,
            order,
        }
    }
}

/// Opaque content unit (film or track)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique within a pool
    pub id: i64,
    #[serde(default)]
    pub kind: ItemKind,
    pub title: String,
    /// Release date, `YYYY-MM-DD` or bare `YYYY`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote count; the popularity metric that drives difficulty
    #[serde(default)]
    pub vote_count: u32,
    /// Provider popularity score (used only by pool filters)
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Synopsis text
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub credits: Vec<Credit>,
}

impl Item {
    /// Create a film item with only id and title set
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            kind: ItemKind::Film,
            title: title.into(),
            release_date: None,
            vote_count: 0,
            popularity: 0.0,
            genre_ids: Vec::new(),
            overview: None,
            credits: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    pub fn with_vote_count(mut self, vote_count: u32) -> Self {
        self.vote_count = vote_count;
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_genres(mut self, genre_ids: Vec<u32>) -> Self {
        self.genre_ids = genre_ids;
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_credit(mut self, credit: Credit) -> Self {
        self.credits.push(credit);
        self
    }

    /// Release year derived from `release_date`
    ///
    /// Accepts full ISO dates and strings starting with a 4-digit year.
    pub fn year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed.year());
        }
        let prefix = date.get(..4)?;
        if prefix.chars().all(|c| c.is_ascii_digit()) {
            prefix.parse().ok()
        } else {
            None
        }
    }

    /// Decade bucket of the release year
    pub fn decade(&self) -> Option<i32> {
        self.year().map(crate::time::decade_of)
    }

    /// Popularity metric used for difficulty and diversity scoring
    pub fn popularity_metric(&self) -> f64 {
        f64::from(self.vote_count)
    }

    /// Credits with the given role
    pub fn credits_with_role(&self, role: CreditRole) -> impl Iterator<Item = &Credit> {
        self.credits.iter().filter(move |c| c.role == role)
    }
}
