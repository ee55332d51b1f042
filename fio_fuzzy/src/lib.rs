//! Fuzzy word index: nearest dictionary entry for a (possibly misspelled or
//! inflected) token, with a symmetric similarity in [0, 1].
//!
//! How a query is answered:
//! - exact hit (after folding) -> similarity 1.0
//! - otherwise words sharing padded trigrams with the query are counted, the
//!   best `shortlist` of them are reranked by normalized Levenshtein similarity
//! - matches below `min_similarity` are dropped
//!
//! Indices can be persisted as JSON and loaded back without rebuilding.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;

use fio_core::normalizer::fold_for_lookup;
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;
use thiserror::Error;
use tracing::debug;

/// Characters per gram; words are padded with one space on each side.
pub const GRAM_SIZE: usize = 3;
/// Version tag written into persisted indices.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported index format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("index built with gram size {found}, expected {expected}")]
    GramSizeMismatch { found: usize, expected: usize },
    #[error("gram {gram:?} points at word id {id} but the index has {words} words")]
    CorruptPostings { gram: String, id: u32, words: usize },
    #[error("word {id} ({word:?}) is blank, not folded, or repeated")]
    InvalidWord { id: u32, word: String },
}

/// Query-time tuning; not persisted with the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexOptions {
    /// Matches below this similarity are not reported
    pub min_similarity: f64,
    /// How many gram-overlap leaders get the full similarity check
    pub shortlist: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            min_similarity: 0.5,
            shortlist: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Canonical (folded) dictionary word
    pub word: String,
    /// Insertion id of the word; lower ids win ties
    pub id: u32,
    pub similarity: f64,
}

#[derive(Serialize, Deserialize)]
struct Persisted {
    version: u32,
    gram_size: usize,
    words: Vec<String>,
    grams: BTreeMap<String, Vec<u32>>,
}

pub struct FuzzyIndex {
    words: Vec<String>,
    exact: HashMap<String, u32>,
    /// gram -> ascending word ids
    grams: HashMap<String, Vec<u32>>,
    options: IndexOptions,
}

impl FuzzyIndex {
    /// Builds an index; words are trimmed and folded, blanks and repeats are skipped.
    pub fn build<I, S>(words: I, options: IndexOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self {
            words: Vec::new(),
            exact: HashMap::new(),
            grams: HashMap::new(),
            options,
        };
        for w in words {
            let w = fold_for_lookup(w.as_ref().trim());
            if w.is_empty() || index.exact.contains_key(&w) {
                continue;
            }
            let id = index.words.len() as u32;
            for g in grams_of(&w) {
                index.grams.entry(g).or_default().push(id);
            }
            index.exact.insert(w.clone(), id);
            index.words.push(w);
        }
        debug!(words = index.words.len(), grams = index.grams.len(), "fuzzy index built");
        index
    }

    pub fn with_options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> IndexOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Up to `limit` matches, best first (similarity desc, then id asc).
    pub fn find(&self, query: &str, limit: usize) -> Vec<FuzzyMatch> {
        let q = fold_for_lookup(query.trim());
        if q.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: HashMap<u32, u32> = HashMap::new();
        for g in grams_of(&q) {
            if let Some(ids) = self.grams.get(&g) {
                for &id in ids {
                    *hits.entry(id).or_default() += 1;
                }
            }
        }
        let mut ranked: Vec<(u32, u32)> = hits.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.options.shortlist.max(1));

        let mut shortlist: Vec<u32> = ranked.into_iter().map(|(id, _)| id).collect();
        if let Some(&id) = self.exact.get(&q) {
            if !shortlist.contains(&id) {
                shortlist.push(id);
            }
        }

        let mut out: Vec<FuzzyMatch> = shortlist
            .into_iter()
            .filter_map(|id| {
                let word = &self.words[id as usize];
                let similarity = if *word == q {
                    1.0
                } else {
                    normalized_levenshtein(&q, word)
                };
                (similarity >= self.options.min_similarity).then(|| FuzzyMatch {
                    word: word.clone(),
                    id,
                    similarity,
                })
            })
            .collect();
        out.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        out.truncate(limit);
        out
    }

    /// Single best match, if any clears `min_similarity`.
    pub fn best(&self, query: &str) -> Option<FuzzyMatch> {
        self.find(query, 1).into_iter().next()
    }

    pub fn to_json(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string(&self.persisted())?)
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), IndexError> {
        serde_json::to_writer(writer, &self.persisted())?;
        Ok(())
    }

    pub fn from_json(s: &str, options: IndexOptions) -> Result<Self, IndexError> {
        Self::from_persisted(serde_json::from_str(s)?, options)
    }

    pub fn read_from<R: io::Read>(reader: R, options: IndexOptions) -> Result<Self, IndexError> {
        Self::from_persisted(serde_json::from_reader(reader)?, options)
    }

    fn persisted(&self) -> Persisted {
        Persisted {
            version: FORMAT_VERSION,
            gram_size: GRAM_SIZE,
            words: self.words.clone(),
            grams: self
                .grams
                .iter()
                .map(|(g, ids)| (g.clone(), ids.clone()))
                .collect(),
        }
    }

    fn from_persisted(p: Persisted, options: IndexOptions) -> Result<Self, IndexError> {
        if p.version != FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion {
                found: p.version,
                expected: FORMAT_VERSION,
            });
        }
        if p.gram_size != GRAM_SIZE {
            return Err(IndexError::GramSizeMismatch {
                found: p.gram_size,
                expected: GRAM_SIZE,
            });
        }
        let mut exact = HashMap::with_capacity(p.words.len());
        for (id, word) in p.words.iter().enumerate() {
            let id = id as u32;
            let canonical = !word.is_empty() && fold_for_lookup(word.trim()) == *word;
            if !canonical || exact.insert(word.clone(), id).is_some() {
                return Err(IndexError::InvalidWord {
                    id,
                    word: word.clone(),
                });
            }
        }
        for (gram, ids) in &p.grams {
            if let Some(&id) = ids.iter().find(|&&id| id as usize >= p.words.len()) {
                return Err(IndexError::CorruptPostings {
                    gram: gram.clone(),
                    id,
                    words: p.words.len(),
                });
            }
        }
        Ok(Self {
            words: p.words,
            exact,
            grams: p.grams.into_iter().collect(),
            options,
        })
    }
}

/// Distinct padded grams of a folded word, in first-seen order.
fn grams_of(word: &str) -> Vec<String> {
    let padded: Vec<char> = std::iter::once(' ')
        .chain(word.chars())
        .chain(std::iter::once(' '))
        .collect();
    let mut seen = HashSet::new();
    padded
        .windows(GRAM_SIZE)
        .map(|w| w.iter().collect::<String>())
        .filter(|g| seen.insert(g.clone()))
        .collect()
}
