//! `enumerator`: every structurally valid token -> role assignment for N tokens.
//!
//! Each of the three roles sits on at most one position; all other positions have
//! no role. Generation order is fixed, and ties during selection resolve to the
//! earliest assignment in this order:
//! - N = 1: `[G]`, `[P]`, `[F]`
//! - N = 2: `[G,P]`, `[G,F]`, `[P,G]`, `[P,F]`, `[F,G]`, `[F,P]`
//! - N >= 3: given position outermost (ascending), then patronymic over the
//!   remaining positions (ascending), then family over what is left (ascending)
//!
//! Assignments are decoded lazily from a cursor, so nothing is materialized.

use crate::{error::FioError, model::Role};

/// Upper bound on assignments per phrase; larger phrases are refused.
pub const MAX_ASSIGNMENTS: u128 = 1_000_000;

const PAIRS: [(Role, Role); 6] = [
    (Role::Given, Role::Patronymic),
    (Role::Given, Role::Family),
    (Role::Patronymic, Role::Given),
    (Role::Patronymic, Role::Family),
    (Role::Family, Role::Given),
    (Role::Family, Role::Patronymic),
];

/// One placement of roles onto `len` token positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    len: usize,
    /// Position held by each role, indexed by `Role::index`
    slots: [Option<usize>; 3],
}

impl Assignment {
    fn single(role: Role) -> Self {
        let mut slots = [None; 3];
        slots[role.index()] = Some(0);
        Self { len: 1, slots }
    }

    fn pair(first: Role, second: Role) -> Self {
        let mut slots = [None; 3];
        slots[first.index()] = Some(0);
        slots[second.index()] = Some(1);
        Self { len: 2, slots }
    }

    fn triple(len: usize, given: usize, patronymic: usize, family: usize) -> Self {
        Self {
            len,
            slots: [Some(given), Some(patronymic), Some(family)],
        }
    }

    /// Number of token positions covered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position_of(&self, role: Role) -> Option<usize> {
        self.slots[role.index()]
    }

    pub fn role_at(&self, position: usize) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|&r| self.slots[r.index()] == Some(position))
    }

    /// Placed roles with their positions, in role order.
    pub fn placements(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(|r| self.slots[r.index()].map(|p| (r, p)))
    }

    /// Expanded form: one entry per position, `None` where no role is placed.
    pub fn roles(&self) -> Vec<Option<Role>> {
        (0..self.len).map(|p| self.role_at(p)).collect()
    }
}

/// Lazy iterator over all assignments for a fixed token count.
#[derive(Debug, Clone)]
pub struct Assignments {
    len: usize,
    cursor: usize,
    total: usize,
}

/// Number of assignments for `n` tokens, computed without overflow.
pub fn assignment_count(n: usize) -> u128 {
    let n = n as u128;
    match n {
        0 => 0,
        1 => 3,
        2 => 6,
        _ => n.saturating_mul(n - 1).saturating_mul(n - 2),
    }
}

/// Enumerates assignments for `n` tokens.
///
/// Fails fast with `FioError::TooManyVariants` when the count exceeds
/// `MAX_ASSIGNMENTS`; nothing is generated in that case.
pub fn assignments(n: usize) -> Result<Assignments, FioError> {
    let variants = assignment_count(n);
    if variants > MAX_ASSIGNMENTS {
        return Err(FioError::TooManyVariants {
            tokens: n,
            variants,
            limit: MAX_ASSIGNMENTS,
        });
    }
    Ok(Assignments {
        len: n,
        cursor: 0,
        total: variants as usize,
    })
}

impl Assignments {
    fn decode(&self, index: usize) -> Assignment {
        match self.len {
            1 => Assignment::single(Role::ALL[index]),
            2 => {
                let (first, second) = PAIRS[index];
                Assignment::pair(first, second)
            }
            n => {
                let per_given = (n - 1) * (n - 2);
                let i = index / per_given;
                let rest = index % per_given;
                let j = skip_taken(rest / (n - 2), &[i]);
                let k = skip_taken(rest % (n - 2), &[i, j]);
                Assignment::triple(n, i, j, k)
            }
        }
    }
}

/// Maps `k` to the k-th position (ascending) that is not in `taken`.
fn skip_taken(k: usize, taken: &[usize]) -> usize {
    let mut sorted: [usize; 2] = [usize::MAX; 2];
    for (slot, &t) in sorted.iter_mut().zip(taken) {
        *slot = t;
    }
    sorted.sort_unstable();
    let mut p = k;
    for t in sorted {
        if p >= t {
            p += 1;
        }
    }
    p
}

impl Iterator for Assignments {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.cursor >= self.total {
            return None;
        }
        let a = self.decode(self.cursor);
        self.cursor += 1;
        Some(a)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.cursor;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Assignments {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    const G: Option<Role> = Some(Role::Given);
    const P: Option<Role> = Some(Role::Patronymic);
    const F: Option<Role> = Some(Role::Family);

    fn expand(n: usize) -> Vec<Vec<Option<Role>>> {
        assignments(n).unwrap().map(|a| a.roles()).collect()
    }

    #[test]
    fn counts_for_small_phrases() {
        let counts: Vec<usize> = (0..=4).map(|n| assignments(n).unwrap().count()).collect();
        assert_eq!(counts, vec![0, 3, 6, 6, 24]);
    }

    #[test]
    fn single_token_order() {
        assert_eq!(expand(1), vec![vec![G], vec![P], vec![F]]);
    }

    #[test]
    fn two_token_order() {
        assert_eq!(
            expand(2),
            vec![
                vec![G, P],
                vec![G, F],
                vec![P, G],
                vec![P, F],
                vec![F, G],
                vec![F, P],
            ]
        );
    }

    #[test]
    fn three_token_order() {
        assert_eq!(
            expand(3),
            vec![
                vec![G, P, F],
                vec![G, F, P],
                vec![P, G, F],
                vec![F, G, P],
                vec![P, F, G],
                vec![F, P, G],
            ]
        );
    }

    #[test]
    fn four_tokens_leave_one_position_empty() {
        let all = expand(4);
        assert_eq!(all[0], vec![G, P, F, None]);
        assert_eq!(all[1], vec![G, P, None, F]);
        assert_eq!(all[2], vec![G, F, P, None]);
        assert_eq!(all[23], vec![None, F, P, G]);
    }

    #[test]
    fn positions_and_roles_agree() {
        let second = assignments(4).unwrap().nth(1).unwrap();
        assert_eq!(second.position_of(Role::Given), Some(0));
        assert_eq!(second.position_of(Role::Patronymic), Some(1));
        assert_eq!(second.position_of(Role::Family), Some(3));
        assert_eq!(second.role_at(2), None);

        let lone = assignments(1).unwrap().nth(2).unwrap();
        assert_eq!(lone.position_of(Role::Family), Some(0));
        assert_eq!(lone.position_of(Role::Given), None);
    }

    #[test]
    fn limit_is_enforced_at_the_boundary() {
        assert_eq!(assignment_count(101), 999_900);
        assert!(assignments(101).is_ok());

        let err = assignments(102).unwrap_err();
        let FioError::TooManyVariants { tokens, variants, .. } = err;
        assert_eq!(tokens, 102);
        assert_eq!(variants, 1_030_200);
    }

    #[test]
    fn huge_phrases_fail_without_overflow() {
        assert!(assignments(1400).is_err());
        assert!(assignments(usize::MAX).is_err());
    }

    #[test]
    fn exact_size_hint() {
        let mut it = assignments(5).unwrap();
        assert_eq!(it.len(), 60);
        it.next();
        assert_eq!(it.len(), 59);
    }

    proptest! {
        #[test]
        fn assignments_are_injective_and_distinct(n in 3usize..12) {
            let all: Vec<Assignment> = assignments(n).unwrap().collect();
            prop_assert_eq!(all.len() as u128, assignment_count(n));

            let mut seen = HashSet::new();
            for a in &all {
                let positions: Vec<usize> = a.placements().map(|(_, p)| p).collect();
                prop_assert_eq!(positions.len(), 3);
                let unique: HashSet<usize> = positions.iter().copied().collect();
                prop_assert_eq!(unique.len(), 3);
                prop_assert!(positions.iter().all(|&p| p < n));
                prop_assert!(seen.insert(a.slots));
            }
        }
    }
}
