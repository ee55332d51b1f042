use tracing::{debug, warn};

use crate::{
    cache::{NoCache, ResultCache},
    dictionary::MatchProvider,
    enumerator::{Assignment, assignments},
    error::FioError,
    lookup::MatchTable,
    model::{NamePart, NameResult, Token},
    normalizer::{cache_key, tokenize},
    scorer::score,
};

/// Default documented quality floor for matches.
pub const DEFAULT_EDGE: f64 = 0.75;

/// Engine: turns a phrase into a `NameResult`.
///
/// Pipeline:
/// - normalizer (tokens) -> cache read -> enumerator guard -> lookup (`MatchTable`)
///   -> scorer over every assignment -> best assignment -> `NameResult` -> cache write
///
/// The engine holds no mutable state of its own; one instance can serve many
/// threads as long as the provider and cache are `Sync`.
pub struct Engine<P, C = NoCache> {
    /// Dictionary match provider (three role dictionaries)
    provider: P,
    /// Result cache; `NoCache` unless one is injected
    cache: C,
    /// Documented minimum confidence; informational only, never filters results
    edge: f64,
}

impl<P> Engine<P, NoCache>
where
    P: MatchProvider,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: NoCache,
            edge: DEFAULT_EDGE,
        }
    }
}

impl<P, C> Engine<P, C>
where
    P: MatchProvider,
    C: ResultCache,
{
    /// Sets the documented quality floor (clamped to 0..=1; NaN falls back to the default).
    ///
    /// Selection does not consult it: any positive confidence can contribute.
    pub fn with_edge(mut self, edge: f64) -> Self {
        self.edge = if edge.is_nan() {
            DEFAULT_EDGE
        } else {
            edge.clamp(0.0, 1.0)
        };
        self
    }

    /// Injects a result cache, replacing the current one.
    pub fn with_cache<C2>(self, cache: C2) -> Engine<P, C2>
    where
        C2: ResultCache,
    {
        Engine {
            provider: self.provider,
            cache,
            edge: self.edge,
        }
    }

    pub fn edge(&self) -> f64 {
        self.edge
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Extracts given name, patronymic and family name from `phrase`.
    ///
    /// Reads through the cache first and writes newly computed results back.
    /// Cache failures are logged and otherwise ignored.
    pub fn break_apart(&self, phrase: &str) -> Result<NameResult, FioError> {
        let tokens = tokenize(phrase);
        if tokens.is_empty() {
            return Ok(NameResult::new());
        }

        let key = cache_key(&tokens);
        match self.cache.get(&key) {
            Ok(Some(hit)) => {
                debug!(key = %key, "result cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, key = %key, "result cache read failed, recomputing"),
        }

        let result = self.select(&tokens)?;

        if let Err(e) = self.cache.put(&key, &result) {
            warn!(error = %e, key = %key, "result cache write failed");
        }
        Ok(result)
    }

    /// Best-assignment selection over already tokenized input; no cache involved.
    ///
    /// Ties resolve to the first maximum in enumeration order.
    pub fn select(&self, tokens: &[Token]) -> Result<NameResult, FioError> {
        // Guard runs before any dictionary work.
        let candidates = assignments(tokens.len())?;
        if tokens.is_empty() {
            return Ok(NameResult::new());
        }

        let table = MatchTable::collect(tokens, &self.provider);

        let mut best: Option<Assignment> = None;
        let mut best_score = 0.0_f64;
        for assignment in candidates {
            let s = score(&assignment, &table);
            if s > best_score {
                best_score = s;
                best = Some(assignment);
            }
        }

        let Some(winner) = best else {
            debug!(tokens = tokens.len(), "no assignment with a positive score");
            return Ok(NameResult::new());
        };
        debug!(tokens = tokens.len(), score = best_score, "selected assignment");

        let mut result = NameResult::new();
        for (position, token) in tokens.iter().enumerate() {
            let Some(role) = winner.role_at(position) else {
                continue;
            };
            let Some(candidate) = table.get(position, role) else {
                continue;
            };
            if candidate.confidence > 0.0 {
                result.insert(NamePart {
                    role,
                    src: token.src.clone(),
                    found: candidate.value.clone(),
                    percent: candidate.confidence,
                });
            }
        }
        Ok(result)
    }
}
