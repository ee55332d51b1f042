//! `cache`: phrase -> result store wrapped around the engine.
//!
//! Keys are `normalizer::cache_key` strings. Backends report failures as
//! `CacheError`; the engine treats them as recoverable.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{error::CacheError, model::NameResult};

pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<NameResult>, CacheError>;
    fn put(&self, key: &str, result: &NameResult) -> Result<(), CacheError>;
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _key: &str) -> Result<Option<NameResult>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _result: &NameResult) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, NameResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<NameResult>, CacheError> {
        let map = self
            .entries
            .read()
            .map_err(|e| CacheError::new("get", e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, result: &NameResult) -> Result<(), CacheError> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| CacheError::new("put", e.to_string()))?;
        map.insert(key.to_string(), result.clone());
        Ok(())
    }
}

impl<T> ResultCache for &T
where
    T: ResultCache + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<NameResult>, CacheError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, result: &NameResult) -> Result<(), CacheError> {
        (**self).put(key, result)
    }
}

impl<T> ResultCache for Box<T>
where
    T: ResultCache + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<NameResult>, CacheError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, result: &NameResult) -> Result<(), CacheError> {
        (**self).put(key, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NamePart, Role};

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryCache::new();
        let mut r = NameResult::new();
        r.insert(NamePart {
            role: Role::Family,
            src: "Сидоров".into(),
            found: "сидоров".into(),
            percent: 1.0,
        });

        assert_eq!(cache.get("Сидоров").unwrap(), None);
        cache.put("Сидоров", &r).unwrap();
        assert_eq!(cache.get("Сидоров").unwrap(), Some(r));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn no_cache_never_hits() {
        NoCache.put("x", &NameResult::new()).unwrap();
        assert_eq!(NoCache.get("x").unwrap(), None);
    }
}
