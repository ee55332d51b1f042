//! `normalizer`: phrase -> tokens.
//!
//! Only whitespace splitting and trimming happen here; the surface form is kept
//! intact for the result. Case and letter folding is applied at lookup time
//! (`fold_for_lookup`).

use crate::model::Token;

/// Splits on whitespace and keeps every non-empty piece, in order.
pub fn tokenize(phrase: &str) -> Vec<Token> {
    phrase
        .split_whitespace()
        .enumerate()
        .map(|(position, src)| Token {
            src: src.to_string(),
            position,
        })
        .collect()
}

/// Cache key for a tokenized phrase: tokens joined by single spaces, order preserved.
pub fn cache_key(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.src.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Form used for dictionary queries: lowercase, `ё` folded to `е`.
pub fn fold_for_lookup(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}
