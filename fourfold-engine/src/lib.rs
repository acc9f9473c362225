//! # Fourfold Puzzle Engine
//!
//! Builds four-group connection puzzles from a pool of films or tracks.
//!
//! # Pipeline
//! ```text
//! pool ─► PoolFilter ─► PuzzleEngine ─► [analyzers, concurrently] ─► candidates
//!      ─► recency filter ─► GroupSelector ─► GeneratedPuzzle
//!      ─► QualityScorer ─► PuzzleGenerator (accept / retry / best effort)
//! ```
//!
//! # Modules
//! - [`analyzers`] - connection finders (director, decade, year, theme, wordplay)
//! - [`registry`] - explicitly constructed analyzer catalog
//! - [`selector`] - one disjoint group per difficulty tier
//! - [`validators`] - five quality checks and the combining scorer
//! - [`engine`] - single-attempt orchestration
//! - [`generator`] - retries, pool filters, batches
//! - [`verification`] - external item verification hook
//! - [`settings`] - TOML settings file

pub mod analyzers;
pub mod engine;
pub mod error;
pub mod generator;
pub mod registry;
pub mod selector;
pub mod settings;
pub mod validators;
pub mod verification;

pub use analyzers::{Analyzer, AnalyzerConfig, AnalyzerConfigUpdate, ThemeCatalog};
pub use engine::{EngineConfig, EngineConfigUpdate, PuzzleEngine};
pub use error::{ErrorKind, PuzzleError, Result};
pub use generator::{
    BatchResult, GenerationResult, GeneratorConfig, GeneratorConfigUpdate, PoolFilter, PuzzleGenerator,
};
pub use registry::AnalyzerRegistry;
pub use selector::GroupSelector;
pub use settings::Settings;
pub use validators::{QualityScorer, ScorerConfig, ScorerConfigUpdate};
pub use verification::{ItemVerifier, Verification};
