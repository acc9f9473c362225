//! TOML settings file
//!
//! Every section is a partial update; anything left out keeps its default.
//!
//! ```toml
//! themes_path = "themes.toml"      # relative to this file
//!
//! [logging]
//! level = "debug"
//!
//! [engine]
//! min_pool_after_recency = 80
//!
//! [scorer]
//! min_score = 40.0
//! [scorer.weights]
//! clarity = 0.3
//!
//! [generator]
//! max_attempts = 5
//! [generator.filter]
//! min_year = 1970
//!
//! [analyzers.wordplay]
//! enabled = false
//! ```

use crate::analyzers::{
    DecadeAnalyzer, DecadeConfigUpdate, DirectorAnalyzer, DirectorConfigUpdate, ThemeAnalyzer, ThemeCatalog,
    ThemeConfigUpdate, WordplayAnalyzer, WordplayConfigUpdate, YearAnalyzer, YearConfigUpdate,
};
use crate::engine::{EngineConfigUpdate, PuzzleEngine};
use crate::generator::{GeneratorConfigUpdate, PuzzleGenerator};
use crate::registry::AnalyzerRegistry;
use crate::validators::{QualityScorer, ScorerConfigUpdate};
use fourfold_common::config::{load_toml_or_default, resolve_config_path, LoggingConfig, CONFIG_ENV_VAR};
use fourfold_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Per-analyzer sections under `[analyzers]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub director: DirectorConfigUpdate,
    pub decade: DecadeConfigUpdate,
    pub year: YearConfigUpdate,
    pub theme: ThemeConfigUpdate,
    pub wordplay: WordplayConfigUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub engine: EngineConfigUpdate,
    pub scorer: ScorerConfigUpdate,
    pub generator: GeneratorConfigUpdate,
    pub analyzers: AnalyzerSettings,
    /// External theme catalog; the built-in catalog when absent
    pub themes_path: Option<PathBuf>,
    /// File these settings were read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the CLI path, `FOURFOLD_CONFIG`, or the per-user file
    ///
    /// Defaults when none of those exist.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(cli_path, CONFIG_ENV_VAR);
        let mut settings: Settings = load_toml_or_default(path.as_deref())?;
        settings.source = path.filter(|p| p.exists());
        Ok(settings)
    }

    /// Theme catalog named by `themes_path`, resolved against the settings file
    pub fn theme_catalog(&self) -> Result<ThemeCatalog> {
        match &self.themes_path {
            Some(path) => {
                let resolved = match (&self.source, path.is_relative()) {
                    (Some(source), true) => source.parent().map(|dir| dir.join(path)).unwrap_or_else(|| path.clone()),
                    _ => path.clone(),
                };
                debug!(path = %resolved.display(), "Loading theme catalog");
                ThemeCatalog::from_file(&resolved)
            }
            None => ThemeCatalog::builtin(),
        }
    }

    /// Registry with the five built-in analyzers, configured from `[analyzers]`
    pub fn build_registry(&self) -> Result<AnalyzerRegistry> {
        let registry = AnalyzerRegistry::new();
        registry.register(Arc::new(DirectorAnalyzer::with_config(&self.analyzers.director)));
        registry.register(Arc::new(DecadeAnalyzer::with_config(&self.analyzers.decade)));
        registry.register(Arc::new(YearAnalyzer::with_config(&self.analyzers.year)));

        let mut theme = ThemeAnalyzer::new(self.theme_catalog()?)?;
        theme.configure(&self.analyzers.theme);
        registry.register(Arc::new(theme));

        registry.register(Arc::new(WordplayAnalyzer::with_config(&self.analyzers.wordplay)));
        Ok(registry)
    }

    pub fn build_engine(&self, registry: Arc<AnalyzerRegistry>) -> PuzzleEngine {
        let mut engine = PuzzleEngine::new(registry);
        engine.configure(&self.engine);
        engine
    }

    pub fn build_scorer(&self) -> Result<QualityScorer> {
        let mut scorer = QualityScorer::new()?;
        scorer.configure(&self.scorer)?;
        Ok(scorer)
    }

    /// Fully wired generator: registry, engine, scorer and generator settings
    pub fn build_generator(&self) -> Result<PuzzleGenerator> {
        let registry = Arc::new(self.build_registry()?);
        let mut generator = PuzzleGenerator::new(self.build_engine(registry), self.build_scorer()?);
        generator.configure(&self.generator);
        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
themes_path = "my-themes.toml"

[logging]
level = "debug"

[engine]
min_pool_after_recency = 80
groups_needed = 3

[scorer]
min_score = 40.0

[scorer.weights]
clarity = 0.3

[generator]
max_attempts = 5

[generator.filter]
min_year = 1970
exclude_genres = [27]

[analyzers.wordplay]
enabled = false
min_word_length = 5

[analyzers.decade]
enabled_decades = [1980, 1990]
"#;

    const THEMES: &str = r#"
[[theme]]
name = "boats"
label = "Stories at sea"
keywords = ["boat", "ship"]
tier = "medium"
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_sample_file_builds_generator() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fourfold.toml", SAMPLE);
        write(&dir, "my-themes.toml", THEMES);

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.source.as_deref(), Some(path.as_path()));
        assert_eq!(settings.theme_catalog().unwrap().len(), 1);

        let generator = settings.build_generator().unwrap();
        assert_eq!(generator.config().max_attempts, 5);
        assert_eq!(generator.config().filter.min_year, Some(1970));
        assert_eq!(generator.config().filter.exclude_genres, vec![27]);
        assert_eq!(generator.config().quality_threshold, 35.0);
        assert_eq!(generator.scorer().min_score(), 40.0);
        assert_eq!(generator.scorer().config().weights.clarity, 0.3);
        assert_eq!(generator.scorer().config().weights.diversity, 0.20);
        assert_eq!(generator.engine().config().min_pool_after_recency, 80);
        assert_eq!(generator.engine().config().groups_needed, 3);

        let registry = generator.engine().registry();
        assert_eq!(registry.count(), 5);
        assert!(!registry.get("wordplay").unwrap().is_enabled());
        assert!(registry.get("decade").unwrap().is_enabled());
    }

    #[test]
    fn test_missing_theme_file_is_an_error() {
        let settings = Settings {
            themes_path: Some(PathBuf::from("/nonexistent/themes.toml")),
            ..Default::default()
        };
        assert!(settings.build_registry().is_err());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.toml", "[engine]\nmin_pool_after_recency = \"lots\"\n");
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, fourfold_common::Error::Config(_)));
    }
}
