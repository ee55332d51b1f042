use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidNameResult;

/// Name role a token can carry. "No role" is modelled as `Option<Role>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Given,
    Patronymic,
    Family,
}

impl Role {
    /// All roles in placement order (given, patronymic, family).
    pub const ALL: [Role; 3] = [Role::Given, Role::Patronymic, Role::Family];

    /// Slot of this role in per-role tables such as `[T; 3]`.
    pub fn index(self) -> usize {
        match self {
            Role::Given => 0,
            Role::Patronymic => 1,
            Role::Family => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Given => "given",
            Role::Patronymic => "patronymic",
            Role::Family => "family",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trimmed, non-empty piece of the input phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form exactly as it appeared in the phrase
    pub src: String,
    /// Position among the phrase tokens (0-based)
    pub position: usize,
}

impl Token {
    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.src.chars().count()
    }
}

/// Best dictionary hit for one token against one role dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Canonical dictionary value (lowercase)
    pub value: String,
    /// Symmetric similarity in [0, 1]; 1.0 is an exact normalized match
    pub confidence: f64,
}

/// One recognized component of a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePart {
    pub role: Role,
    /// Token text taken from the phrase
    pub src: String,
    /// Dictionary value the token was matched to
    pub found: String,
    /// Match confidence, always > 0
    pub percent: f64,
}

/// Extracted name: 0 to 3 parts, at most one per role, kept in phrase order.
///
/// Roles that were not found are absent, never present with an empty placeholder.
///
/// Deserialization goes through `TryFrom<Vec<NamePart>>`, so stored results obey
/// the same invariants as computed ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NamePart>", into = "Vec<NamePart>")]
pub struct NameResult {
    parts: Vec<NamePart>,
}

impl NameResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a part; a part with the same role is replaced in place.
    pub fn insert(&mut self, part: NamePart) {
        match self.parts.iter_mut().find(|p| p.role == part.role) {
            Some(existing) => *existing = part,
            None => self.parts.push(part),
        }
    }

    pub fn get(&self, role: Role) -> Option<&NamePart> {
        self.parts.iter().find(|p| p.role == role)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.get(role).is_some()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamePart> {
        self.parts.iter()
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.parts.iter().map(|p| p.role)
    }

    /// Display form: each found value title-cased, joined by spaces in phrase order.
    ///
    /// `"иванов"`, `"иван"`, `"иванович"` -> `"Иванов Иван Иванович"`.
    pub fn to_title_string(&self) -> String {
        self.parts
            .iter()
            .filter(|p| !p.found.is_empty())
            .map(|p| title_case(&p.found))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<Vec<NamePart>> for NameResult {
    type Error = InvalidNameResult;

    /// Rejects repeated roles and confidences outside (0, 1].
    fn try_from(parts: Vec<NamePart>) -> Result<Self, Self::Error> {
        for (i, part) in parts.iter().enumerate() {
            if !(part.percent > 0.0 && part.percent <= 1.0) {
                return Err(InvalidNameResult::PercentOutOfRange {
                    role: part.role,
                    percent: part.percent,
                });
            }
            if parts[..i].iter().any(|p| p.role == part.role) {
                return Err(InvalidNameResult::DuplicateRole(part.role));
            }
        }
        Ok(Self { parts })
    }
}

impl From<NameResult> for Vec<NamePart> {
    fn from(result: NameResult) -> Self {
        result.parts
    }
}

impl fmt::Display for NameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_title_string())
    }
}

impl<'a> IntoIterator for &'a NameResult {
    type Item = &'a NamePart;
    type IntoIter = std::slice::Iter<'a, NamePart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

/// Uppercase after any non-letter (start, hyphen, apostrophe), lowercase elsewhere.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if prev_alpha {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_alpha = ch.is_alphabetic();
    }
    out
}
