//! Core domain logic for Lexivault, a vocabulary-learning word store.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod diff;
pub mod lemma;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use diff::analyzer::{analyze, ConflictAnalysis, DiffEntry, DiffKind};
pub use lemma::{Lemmatizer, RuleLemmatizer};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{DocumentParseError, WordDocument};
pub use model::word::{
    CognateRecord, EtymologyRecord, ExampleRecord, SynonymRecord, WordId, WordRecord,
};
pub use repo::word_repo::{
    RepoError, RepoResult, SqliteWordRepository, WordListQuery, WordPage, WordRepository, WordSort,
};
pub use schema::validator::{validate_document, Validation};
pub use service::query_service::{
    parse_include, DetailSection, LookupOutcome, QueryError, QueryService, WordDetails,
};
pub use service::word_service::{
    AddWordOutcome, ConflictPreview, SaveWordOutcome, WordService, WordServiceError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
