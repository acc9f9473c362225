//! Test Helper Utilities
//!
//! Synthetic item pools for engine and generator tests

#![allow(dead_code)]

use fourfold_common::{Credit, CreditRole, Item};

const ADJECTIVES: &[&str] = &[
    "Silent", "Broken", "Hidden", "Burning", "Distant", "Lonely", "Frozen", "Crooked", "Hollow", "Wicked",
    "Gentle", "Restless", "Savage", "Secret", "Velvet", "Wandering",
];

const NOUNS: &[&str] = &[
    "Harbor", "Orchard", "Canyon", "Lantern", "Mirror", "Station", "Garden", "Tunnel", "Bridge", "Castle",
    "Meadow", "Prairie", "Compass", "Ladder", "Carnival", "Island", "Quarry", "Pavilion", "Chapel",
    "Highway", "Kingdom", "Frontier", "Avenue",
];

/// Film with a year, vote count and a director credit
pub fn film(id: i64, title: &str, year: i32, votes: u32, director: (i64, &str)) -> Item {
    Item::new(id, title)
        .with_release_date(format!("{}-06-01", year))
        .with_vote_count(votes)
        .with_popularity(votes as f64 / 100.0)
        .with_credit(Credit::new(director.0, director.1, CreditRole::Director, 0))
}

/// 240 films: 40 directors with 6 films each, years 1960-2023, votes 100-9000
pub fn rich_pool() -> Vec<Item> {
    let mut pool = Vec::with_capacity(240);
    for director in 0..40i64 {
        let name = format!("Director {}", director);
        for film_index in 0..6i64 {
            let id = director * 6 + film_index;
            let year = 1960 + ((director * 7 + film_index * 11) % 64) as i32;
            let votes = 100 + ((director * 211 + film_index * 1297) % 8900) as u32;
            let title = format!(
                "The {} {}",
                ADJECTIVES[(id as usize * 7) % ADJECTIVES.len()],
                NOUNS[id as usize % NOUNS.len()]
            );
            pool.push(film(id, &title, year, votes, (1000 + director, &name)));
        }
    }
    pool
}

/// 16 films in four director groups with very different vote counts
pub fn partitioned_pool() -> Vec<Item> {
    let directors = [
        (1, "Greta Gerwig", 9000),
        (2, "Bong Joon-ho", 5000),
        (3, "Kelly Reichardt", 1500),
        (4, "Apichatpong Weerasethakul", 120),
    ];
    let mut pool = Vec::new();
    for (group, (director_id, name, votes)) in directors.iter().enumerate() {
        for n in 0..4 {
            let id = (group * 4 + n) as i64;
            pool.push(film(
                id,
                &format!("Film {}", id),
                1970 + (group as i32) * 12,
                votes + n as u32,
                (*director_id, *name),
            ));
        }
    }
    pool
}
