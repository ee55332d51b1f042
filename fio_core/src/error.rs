use thiserror::Error;

use crate::model::Role;

/// Errors that abort a single classification call.
#[derive(Debug, Error)]
pub enum FioError {
    /// Phrase has so many tokens that enumerating role placements is refused.
    #[error("too many variants: {tokens} tokens give {variants} assignments (limit {limit})")]
    TooManyVariants {
        tokens: usize,
        variants: u128,
        limit: u128,
    },
}

/// Failure reported by a `ResultCache` backend.
///
/// The engine never propagates this: it logs and carries on without caching.
#[derive(Debug, Error)]
#[error("cache {op} failed: {source}")]
pub struct CacheError {
    pub op: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl CacheError {
    pub fn new(
        op: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            op,
            source: source.into(),
        }
    }
}

/// A stored `NameResult` that breaks the result invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidNameResult {
    #[error("role {0} appears more than once")]
    DuplicateRole(Role),
    #[error("{role} confidence {percent} is outside (0, 1]")]
    PercentOutOfRange { role: Role, percent: f64 },
}
