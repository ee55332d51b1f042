//! Where a role's `FuzzyIndex` comes from. The choice is made once at startup.

use std::{
    fs::File,
    io::BufReader,
    path::PathBuf,
};

use fio_core::Role;
use fio_fuzzy::{FuzzyIndex, IndexOptions};
use tracing::debug;

use crate::{DictError, index_path, read_word_list, word_list_path};

pub trait IndexSource {
    fn load(&self, role: Role) -> Result<FuzzyIndex, DictError>;
    /// Short label for logs.
    fn describe(&self) -> &'static str;
}

/// Builds each index from `<dir>/<list>.txt`.
pub struct WordListSource {
    dir: PathBuf,
    options: IndexOptions,
}

impl WordListSource {
    pub fn new(dir: impl Into<PathBuf>, options: IndexOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }
}

impl IndexSource for WordListSource {
    fn load(&self, role: Role) -> Result<FuzzyIndex, DictError> {
        let path = word_list_path(&self.dir, role);
        let words = read_word_list(&path)?;
        debug!(role = %role, path = %path.display(), words = words.len(), "building index");
        Ok(FuzzyIndex::build(&words, self.options))
    }

    fn describe(&self) -> &'static str {
        "word lists"
    }
}

/// Loads each index from `<dir>/<list>.txt.index.json`.
pub struct PersistedIndexSource {
    dir: PathBuf,
    options: IndexOptions,
}

impl PersistedIndexSource {
    pub fn new(dir: impl Into<PathBuf>, options: IndexOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    /// True when an index file exists for every role.
    pub fn is_complete(&self) -> bool {
        Role::ALL.iter().all(|&r| index_path(&self.dir, r).is_file())
    }
}

impl IndexSource for PersistedIndexSource {
    fn load(&self, role: Role) -> Result<FuzzyIndex, DictError> {
        let path = index_path(&self.dir, role);
        let file = File::open(&path).map_err(|source| DictError::Io {
            path: path.clone(),
            source,
        })?;
        FuzzyIndex::read_from(BufReader::new(file), self.options)
            .map_err(|source| DictError::Index { path, source })
    }

    fn describe(&self) -> &'static str {
        "persisted indices"
    }
}
