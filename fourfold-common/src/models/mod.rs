//! Shared data models
//!
//! - [`item`]: content units (films, tracks) and their credits
//! - [`puzzle`]: candidate/selected groups, generated puzzles and quality reports

pub mod item;
pub mod puzzle;

pub use item::{Credit, CreditRole, Item, ItemKind};
pub use puzzle::{
    CandidateGroup, ConnectionType, DifficultyLevel, DifficultyTier, GeneratedPuzzle,
    PuzzleGroup, QualityMetrics, SelectedGroup,
};
