//! Pool pre-filtering
//!
//! Narrows the raw pool before any analyzer sees it. Every bound is optional;
//! an empty filter keeps everything.

use fourfold_common::Item;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolFilter {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_vote_count: Option<u32>,
    pub max_vote_count: Option<u32>,
    pub min_popularity: Option<f64>,
    /// Keep only items with at least one of these genres (empty = any)
    pub include_genres: Vec<u32>,
    /// Drop items with any of these genres
    pub exclude_genres: Vec<u32>,
}

impl PoolFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether an item passes every bound
    ///
    /// Items without a year fail only when a year bound is set.
    pub fn accepts(&self, item: &Item) -> bool {
        if self.min_year.is_some() || self.max_year.is_some() {
            let Some(year) = item.year() else {
                return false;
            };
            if self.min_year.is_some_and(|min| year < min) || self.max_year.is_some_and(|max| year > max) {
                return false;
            }
        }

        if self.min_vote_count.is_some_and(|min| item.vote_count < min)
            || self.max_vote_count.is_some_and(|max| item.vote_count > max)
        {
            return false;
        }

        if self.min_popularity.is_some_and(|min| item.popularity < min) {
            return false;
        }

        if !self.include_genres.is_empty() && !item.genre_ids.iter().any(|g| self.include_genres.contains(g)) {
            return false;
        }

        !item.genre_ids.iter().any(|g| self.exclude_genres.contains(g))
    }

    pub fn apply(&self, pool: &[Item]) -> Vec<Item> {
        pool.iter().filter(|item| self.accepts(item)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(id: i64, year: Option<i32>, votes: u32, genres: Vec<u32>) -> Item {
        let item = Item::new(id, format!("Film {}", id))
            .with_vote_count(votes)
            .with_popularity(votes as f64 / 100.0)
            .with_genres(genres);
        match year {
            Some(y) => item.with_release_date(format!("{}-03-15", y)),
            None => item,
        }
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let pool = vec![film(1, None, 0, vec![]), film(2, Some(1999), 10, vec![18])];
        let filter = PoolFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&pool).len(), 2);
    }

    #[test]
    fn test_year_bounds_drop_undated() {
        let pool = vec![
            film(1, None, 100, vec![]),
            film(2, Some(1979), 100, vec![]),
            film(3, Some(1985), 100, vec![]),
            film(4, Some(2001), 100, vec![]),
        ];
        let filter = PoolFilter {
            min_year: Some(1980),
            max_year: Some(2000),
            ..Default::default()
        };
        let kept: Vec<i64> = filter.apply(&pool).iter().map(|i| i.id).collect();
        assert_eq!(kept, vec![3]);
    }

    #[test]
    fn test_vote_and_popularity_bounds() {
        let pool = vec![
            film(1, None, 50, vec![]),
            film(2, None, 500, vec![]),
            film(3, None, 5000, vec![]),
        ];
        let filter = PoolFilter {
            min_vote_count: Some(100),
            max_vote_count: Some(1000),
            ..Default::default()
        };
        let kept: Vec<i64> = filter.apply(&pool).iter().map(|i| i.id).collect();
        assert_eq!(kept, vec![2]);

        let popular = PoolFilter {
            min_popularity: Some(10.0),
            ..Default::default()
        };
        let kept: Vec<i64> = popular.apply(&pool).iter().map(|i| i.id).collect();
        assert_eq!(kept, vec![3]);
    }

    #[test]
    fn test_genre_include_and_exclude() {
        let pool = vec![
            film(1, None, 1, vec![28]),
            film(2, None, 1, vec![28, 27]),
            film(3, None, 1, vec![35]),
            film(4, None, 1, vec![]),
        ];
        let filter = PoolFilter {
            include_genres: vec![28, 35],
            exclude_genres: vec![27],
            ..Default::default()
        };
        let kept: Vec<i64> = filter.apply(&pool).iter().map(|i| i.id).collect();
        assert_eq!(kept, vec![1, 3]);
    }
}
