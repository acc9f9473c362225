//! Analyzer Registry
//!
//! Explicitly constructed catalog of analyzers, passed to the engine at
//! construction. Duplicate names are ignored with a warning; lookups are by
//! name, by connection type, or by enabled flag.
//!
//! The map is guarded by an `RwLock` so registration may race with lookups in
//! a multi-threaded host.

use crate::analyzers::{
    Analyzer, DecadeAnalyzer, DirectorAnalyzer, ThemeAnalyzer, ThemeCatalog, WordplayAnalyzer,
    YearAnalyzer,
};
use fourfold_common::{ConnectionType, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

type AnalyzerMap = BTreeMap<String, Arc<dyn Analyzer>>;

#[derive(Default)]
pub struct AnalyzerRegistry {
    analyzers: RwLock<AnalyzerMap>,
}

impl AnalyzerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in analyzers with default configuration
    pub fn with_default_analyzers(catalog: ThemeCatalog) -> Result<Self> {
        let registry = Self::new();
        registry.register(Arc::new(DirectorAnalyzer::new()));
        registry.register(Arc::new(DecadeAnalyzer::new()));
        registry.register(Arc::new(YearAnalyzer::new()));
        registry.register(Arc::new(ThemeAnalyzer::new(catalog)?));
        registry.register(Arc::new(WordplayAnalyzer::new()));
        Ok(registry)
    }

    fn read(&self) -> RwLockReadGuard<'_, AnalyzerMap> {
        self.analyzers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AnalyzerMap> {
        self.analyzers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an analyzer
    ///
    /// Returns `false` (and keeps the existing entry) if the name is taken.
    /// Registered analyzers are shared and immutable; configure before
    /// registering, or swap in a reconfigured instance with [`Self::replace`].
    pub fn register(&self, analyzer: Arc<dyn Analyzer>) -> bool {
        let name = analyzer.name();
        let mut analyzers = self.write();
        if analyzers.contains_key(name) {
            warn!(analyzer = name, "Analyzer already registered, ignoring duplicate");
            return false;
        }
        debug!(analyzer = name, "Analyzer registered");
        analyzers.insert(name.to_string(), analyzer);
        true
    }

    /// Install `analyzer` under its name, returning the entry it displaced
    ///
    /// Lookups never observe the name as missing during the swap.
    pub fn replace(&self, analyzer: Arc<dyn Analyzer>) -> Option<Arc<dyn Analyzer>> {
        let name = analyzer.name();
        let previous = self.write().insert(name.to_string(), analyzer);
        debug!(analyzer = name, replaced = previous.is_some(), "Analyzer replaced");
        previous
    }

    /// Remove an analyzer; `true` if it was present
    pub fn unregister(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Analyzer>> {
        self.read().get(name).cloned()
    }

    /// All analyzers, ordered by name
    pub fn all(&self) -> Vec<Arc<dyn Analyzer>> {
        self.read().values().cloned().collect()
    }

    /// Analyzers whose own config has `enabled = true`
    pub fn enabled(&self) -> Vec<Arc<dyn Analyzer>> {
        self.read()
            .values()
            .filter(|analyzer| analyzer.is_enabled())
            .cloned()
            .collect()
    }

    /// Analyzers that can emit the given connection type
    pub fn by_type(&self, connection_type: &ConnectionType) -> Vec<Arc<dyn Analyzer>> {
        self.read()
            .values()
            .filter(|analyzer| analyzer.connection_types().contains(connection_type))
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Remove every analyzer (test reset)
    pub fn clear(&self) {
        self.write().clear();
    }
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("analyzers", &self.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
