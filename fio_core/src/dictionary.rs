use crate::model::{MatchCandidate, Role};

/// Dictionary match provider: the core does not care whether dictionaries come
/// from word lists, persisted indices or memory.
///
/// Contract:
/// - `token` is already folded (`normalizer::fold_for_lookup`)
/// - at most one best match is returned per call
/// - `confidence` is comparable across calls (0 = no match, 1 = exact)
/// - "nothing above the provider's floor" is `None`, not an error
pub trait MatchProvider: Send + Sync {
    fn lookup(&self, role: Role, token: &str) -> Option<MatchCandidate>;
}

impl<T> MatchProvider for &T
where
    T: MatchProvider + ?Sized,
{
    fn lookup(&self, role: Role, token: &str) -> Option<MatchCandidate> {
        (**self).lookup(role, token)
    }
}

impl<T> MatchProvider for Box<T>
where
    T: MatchProvider + ?Sized,
{
    fn lookup(&self, role: Role, token: &str) -> Option<MatchCandidate> {
        (**self).lookup(role, token)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::MatchProvider;
    use crate::model::{MatchCandidate, Role};

    /// Exact-key provider for tests; counts every lookup.
    #[derive(Default)]
    pub(crate) struct StubProvider {
        entries: HashMap<(Role, String), MatchCandidate>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        pub(crate) fn with(mut self, role: Role, token: &str, value: &str, confidence: f64) -> Self {
            self.entries.insert(
                (role, token.to_string()),
                MatchCandidate {
                    value: value.to_string(),
                    confidence,
                },
            );
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MatchProvider for StubProvider {
        fn lookup(&self, role: Role, token: &str) -> Option<MatchCandidate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries.get(&(role, token.to_string())).cloned()
        }
    }
}
