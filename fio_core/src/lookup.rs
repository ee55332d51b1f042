//! `lookup`: query the three role dictionaries for every token.
//!
//! The result is a `MatchTable`: one row per token, one optional candidate per role.
//! A missing candidate reads as confidence 0 everywhere downstream.

use crate::{
    dictionary::MatchProvider,
    model::{MatchCandidate, Role, Token},
    normalizer::fold_for_lookup,
};

/// Tokens shorter than this (in characters) never carry a name role.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Per-token, per-role best matches.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    rows: Vec<[Option<MatchCandidate>; 3]>,
}

impl MatchTable {
    /// Looks up each token of at least `MIN_TOKEN_CHARS` characters in all three
    /// dictionaries; shorter tokens get an empty row.
    pub fn collect<P>(tokens: &[Token], provider: &P) -> Self
    where
        P: MatchProvider + ?Sized,
    {
        let rows = tokens
            .iter()
            .map(|token| {
                if token.char_len() < MIN_TOKEN_CHARS {
                    return [None, None, None];
                }
                let folded = fold_for_lookup(&token.src);
                Role::ALL.map(|role| provider.lookup(role, &folded))
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, position: usize, role: Role) -> Option<&MatchCandidate> {
        self.rows.get(position)?[role.index()].as_ref()
    }

    /// Confidence of `role` at `position`; 0 when there is no candidate.
    pub fn confidence(&self, position: usize, role: Role) -> f64 {
        self.get(position, role).map_or(0.0, |c| c.confidence)
    }
}
