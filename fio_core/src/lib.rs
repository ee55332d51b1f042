//! `fio_core`: pure logic layer (no file I/O) for pulling a given name, patronymic
//! and family name out of a free-form phrase.
//!
//! Design goals:
//! - **Reusable core**: CLI, batch jobs and services share one engine
//! - **Clear layering**: engine -> normalizer -> lookup -> enumerator -> scorer -> `NameResult`
//! - **Injected collaborators**: dictionaries (`MatchProvider`) and result caches
//!   (`ResultCache`) are passed in, never global state
pub mod cache;
pub mod dictionary;
pub mod engine;
pub mod enumerator;
pub mod error;
pub mod lookup;
pub mod model;
pub mod normalizer;
pub mod scorer;

pub use cache::{MemoryCache, NoCache, ResultCache};
pub use dictionary::MatchProvider;
pub use engine::Engine;
pub use error::{CacheError, FioError, InvalidNameResult};
pub use model::{MatchCandidate, NamePart, NameResult, Role, Token};
