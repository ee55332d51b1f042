//! `fio_dict`: the three name dictionaries behind `fio_core::MatchProvider`.
//!
//! - word lists: one word per line, `#` comments, blank lines ignored
//! - each list is served by a `fio_fuzzy::FuzzyIndex`, either built from the
//!   list or loaded from its persisted `<list>.index.json`
//! - `JsonFileCache`: a file-backed `fio_core::ResultCache`
mod cache;
mod source;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use fio_core::{MatchCandidate, MatchProvider, Role};
use fio_fuzzy::{FuzzyIndex, IndexError, IndexOptions};
use thiserror::Error;
use tracing::{info, warn};

pub use cache::JsonFileCache;
pub use source::{IndexSource, PersistedIndexSource, WordListSource};

#[derive(Debug, Error)]
pub enum DictError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list {path} contains no words")]
    EmptyWordList { path: PathBuf },
    #[error("bad index {path}: {source}")]
    Index {
        path: PathBuf,
        #[source]
        source: IndexError,
    },
}

/// Word list file for a role.
pub fn word_list_name(role: Role) -> &'static str {
    match role {
        Role::Given => "given_names.txt",
        Role::Patronymic => "patronymics.txt",
        Role::Family => "family_names.txt",
    }
}

pub fn word_list_path(dir: &Path, role: Role) -> PathBuf {
    dir.join(word_list_name(role))
}

/// Persisted index file next to the role's word list.
pub fn index_path(dir: &Path, role: Role) -> PathBuf {
    dir.join(format!("{}.index.json", word_list_name(role)))
}

/// Word lists bundled with this crate.
pub fn bundled_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("asset")
}

/// Parses a word list: trimmed lines, skipping blanks and `#` comments.
pub fn parse_word_list(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads a word list; a missing, unreadable or empty list is an error.
pub fn read_word_list(path: &Path) -> Result<Vec<String>, DictError> {
    let s = fs::read_to_string(path).map_err(|source| DictError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_word_list(&s);
    if words.is_empty() {
        return Err(DictError::EmptyWordList {
            path: path.to_path_buf(),
        });
    }
    Ok(words)
}

/// Given-name, patronymic and family-name indices, addressed by `Role`.
pub struct NameDictionaries {
    /// Indexed by `Role::index`
    indices: [FuzzyIndex; 3],
}

impl NameDictionaries {
    pub fn from_indices(given: FuzzyIndex, patronymic: FuzzyIndex, family: FuzzyIndex) -> Self {
        Self {
            indices: [given, patronymic, family],
        }
    }

    /// Loads all three dictionaries from one source.
    pub fn load(source: &dyn IndexSource) -> Result<Self, DictError> {
        let given = source.load(Role::Given)?;
        let patronymic = source.load(Role::Patronymic)?;
        let family = source.load(Role::Family)?;
        info!(
            source = source.describe(),
            given = given.len(),
            patronymic = patronymic.len(),
            family = family.len(),
            "name dictionaries loaded"
        );
        Ok(Self::from_indices(given, patronymic, family))
    }

    /// Uses persisted indices when all three exist in `dir`; otherwise builds
    /// from the word lists and tries to persist the result.
    pub fn open(dir: &Path, options: IndexOptions) -> Result<Self, DictError> {
        let persisted = PersistedIndexSource::new(dir, options);
        if persisted.is_complete() {
            return Self::load(&persisted);
        }
        Self::rebuild(dir, options)
    }

    /// Builds from the word lists regardless of persisted indices, then persists.
    ///
    /// A failure to persist is logged; the built dictionaries are still returned.
    pub fn rebuild(dir: &Path, options: IndexOptions) -> Result<Self, DictError> {
        let dicts = Self::load(&WordListSource::new(dir, options))?;
        if let Err(e) = dicts.persist(dir) {
            warn!(error = %e, dir = %dir.display(), "could not persist name indices");
        }
        Ok(dicts)
    }

    /// Writes every index to `dir` as `<list>.index.json`.
    pub fn persist(&self, dir: &Path) -> Result<(), DictError> {
        for role in Role::ALL {
            let path = index_path(dir, role);
            let json = self.index(role).to_json().map_err(|source| DictError::Index {
                path: path.clone(),
                source,
            })?;
            write_atomic(&path, json.as_bytes())
                .map_err(|source| DictError::Io { path: path.clone(), source })?;
            info!(role = %role, path = %path.display(), "name index persisted");
        }
        Ok(())
    }

    pub fn index(&self, role: Role) -> &FuzzyIndex {
        &self.indices[role.index()]
    }
}

impl MatchProvider for NameDictionaries {
    fn lookup(&self, role: Role, token: &str) -> Option<MatchCandidate> {
        self.index(role).best(token).map(|m| MatchCandidate {
            value: m.word,
            confidence: m.similarity,
        })
    }
}

/// Writes to a sibling temp file, then renames it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let words = parse_word_list("# имена\nиван\n\n  петр  \n#анна\nмария\n");
        assert_eq!(words, vec!["иван", "петр", "мария"]);
    }

    #[test]
    fn file_names_per_role() {
        let dir = Path::new("/data");
        assert_eq!(word_list_path(dir, Role::Patronymic), Path::new("/data/patronymics.txt"));
        assert_eq!(
            index_path(dir, Role::Family),
            Path::new("/data/family_names.txt.index.json")
        );
    }

    #[test]
    fn provider_uses_the_role_table() {
        let opts = IndexOptions::default();
        let dicts = NameDictionaries::from_indices(
            FuzzyIndex::build(["иван"], opts),
            FuzzyIndex::build(["иванович"], opts),
            FuzzyIndex::build(["иванов"], opts),
        );
        let hit = dicts.lookup(Role::Patronymic, "иванович").unwrap();
        assert_eq!(hit.value, "иванович");
        assert_eq!(hit.confidence, 1.0);
        assert_eq!(dicts.lookup(Role::Family, "иванов").unwrap().confidence, 1.0);
        assert!(dicts.lookup(Role::Given, "главный").is_none());
    }

    #[test]
    fn bundled_lists_are_present() {
        for role in Role::ALL {
            let words = read_word_list(&word_list_path(&bundled_dir(), role)).unwrap();
            assert!(words.len() > 10, "{role} list is too short");
        }
    }
}
