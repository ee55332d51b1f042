use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use fio_core::{CacheError, NameResult, ResultCache};
use tracing::{debug, warn};

use crate::write_atomic;

/// Result cache persisted as one JSON object `{ "<phrase key>": [parts...] }`.
///
/// The file is read once at `open` and rewritten after every `put`. Writers in one
/// process are serialized; separate processes sharing a file get last-write-wins.
pub struct JsonFileCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, NameResult>>,
}

impl JsonFileCache {
    /// Opens `path`; a missing file is an empty cache, and so is an unreadable or
    /// corrupt one (logged). Entries that fail `NameResult` validation make the
    /// whole file count as corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries: BTreeMap<String, NameResult> = match fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(map) => map,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "corrupt or invalid result cache, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "unreadable result cache, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "result cache opened");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<NameResult>, CacheError> {
        let map = self
            .entries
            .lock()
            .map_err(|e| CacheError::new("get", e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, result: &NameResult) -> Result<(), CacheError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| CacheError::new("put", e.to_string()))?;
        map.insert(key.to_string(), result.clone());
        let json = serde_json::to_vec_pretty(&*map).map_err(|e| CacheError::new("put", e))?;
        write_atomic(&self.path, &json).map_err(|e| CacheError::new("put", e))
    }
}
