//! Item verification collaborator
//!
//! An external service that confirms an item exists (e.g. a catalog lookup
//! by title and year). The engine only annotates groups with the outcome;
//! unverified items are still usable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of verifying one item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub verified: bool,
    /// Identifier in the verifying service, when known
    pub external_id: Option<String>,
}

impl Verification {
    pub fn verified(external_id: impl Into<String>) -> Self {
        Self {
            verified: true,
            external_id: Some(external_id.into()),
        }
    }

    pub fn unverified() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait ItemVerifier: Send + Sync {
    /// Verify an item by title and release year
    ///
    /// Lookup failures are reported as unverified, never as errors.
    async fn verify(&self, title: &str, year: Option<i32>) -> Verification;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashSet;

    /// Verifier that trusts a fixed set of titles
    #[derive(Debug, Default)]
    pub struct MockVerifier {
        pub known_titles: HashSet<String>,
    }

    impl MockVerifier {
        pub fn knowing<I, S>(titles: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                known_titles: titles.into_iter().map(Into::into).collect(),
            }
        }
    }

    #[async_trait]
    impl ItemVerifier for MockVerifier {
        async fn verify(&self, title: &str, year: Option<i32>) -> Verification {
            if self.known_titles.contains(title) {
                Verification::verified(format!("{}:{}", title, year.unwrap_or_default()))
            } else {
                Verification::unverified()
            }
        }
    }
}
