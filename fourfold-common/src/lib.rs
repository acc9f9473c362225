//! # Fourfold Common Library
//!
//! Shared code for the fourfold puzzle services including:
//! - Content models (items, credits, connection types)
//! - Puzzle models (candidate, selected and display groups, quality report)
//! - Configuration file resolution and logging setup
//! - Shuffle utilities
//! - Utility functions

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod shuffle;
pub mod time;

pub use error::{Error, Result};
pub use models::{
    CandidateGroup, ConnectionType, Credit, CreditRole, DifficultyLevel, DifficultyTier,
    GeneratedPuzzle, Item, ItemKind, PuzzleGroup, QualityMetrics, SelectedGroup,
};
pub use shuffle::{random_permutation, shuffle_array, shuffle_in_sync};
