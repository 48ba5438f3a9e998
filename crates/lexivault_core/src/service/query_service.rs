//! Read-path service for listings, detail assembly and best-effort lookup.
//!
//! # Responsibility
//! - Provide listing/pagination, detail assembly with optional sections,
//!   and lemmatizer-backed lookup over the word store.
//!
//! # Invariants
//! - Detail lookups are case-insensitive exact matches; no substring
//!   fallback.
//! - Optional detail sections are fetched only when explicitly included;
//!   unknown include tokens are silently ignored.
//! - Reads run outside any transaction and observe whatever is committed.

use crate::lemma::{Lemmatizer, RuleLemmatizer};
use crate::model::word::{
    CognateRecord, EtymologyRecord, ExampleRecord, SynonymRecord, WordId, WordRecord,
};
use crate::repo::word_repo::{RepoError, WordListQuery, WordPage, WordRepository};
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Query-path error.
#[derive(Debug)]
pub enum QueryError {
    /// No record matches the requested word or id.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(word) => write!(f, "word not found: `{word}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for QueryError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Closed set of optional detail sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DetailSection {
    Etymology,
    Cognates,
    Examples,
    Synonyms,
    /// The verbatim canonical document (`rawyaml` token).
    RawDocument,
}

/// Parses a comma-separated include parameter into recognized sections.
///
/// Tokens are trimmed and case-folded; unknown tokens are ignored rather
/// than rejected.
pub fn parse_include(raw: &str) -> BTreeSet<DetailSection> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter_map(|token| match token.as_str() {
            "etymology" => Some(DetailSection::Etymology),
            "cognates" => Some(DetailSection::Cognates),
            "examples" => Some(DetailSection::Examples),
            "synonyms" => Some(DetailSection::Synonyms),
            "rawyaml" => Some(DetailSection::RawDocument),
            _ => None,
        })
        .collect()
}

/// Detail view for one word.
///
/// The base fields are always present; optional sections appear only when
/// explicitly included. `etymology` is `Some(None)` when the section was
/// requested but no row is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordDetails {
    pub lemma: String,
    pub syllabification: String,
    pub other_common_meanings: Vec<String>,
    pub image_differentiation_zh: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etymology: Option<Option<EtymologyRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognates: Option<Vec<CognateRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<ExampleRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<SynonymRecord>>,
}

/// Result of a best-effort lemmatized lookup.
///
/// A miss is a normal outcome, not an error; it carries the guessed lemma
/// so callers can offer creation.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found { lemma: String, record: WordRecord },
    NotFound { lemma: String },
}

/// Read-path facade over repository implementations.
pub struct QueryService<R: WordRepository, L: Lemmatizer = RuleLemmatizer> {
    repo: R,
    lemmatizer: L,
}

impl<R: WordRepository> QueryService<R> {
    /// Creates a service with the default heuristic lemmatizer.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            lemmatizer: RuleLemmatizer,
        }
    }
}

impl<R: WordRepository, L: Lemmatizer> QueryService<R, L> {
    /// Creates a service with an explicit lemmatization collaborator.
    pub fn with_lemmatizer(repo: R, lemmatizer: L) -> Self {
        Self { repo, lemmatizer }
    }

    /// Full listing ordered by creation time descending (legacy path).
    pub fn list_words(&self) -> Result<Vec<WordRecord>, QueryError> {
        Ok(self.repo.list_words()?)
    }

    /// Filtered, sorted, paginated listing.
    pub fn list_words_paged(&self, query: &WordListQuery) -> Result<WordPage, QueryError> {
        Ok(self.repo.list_words_paged(query)?)
    }

    /// Gets one word by stable id.
    pub fn get_word_by_id(&self, id: WordId) -> Result<WordRecord, QueryError> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| QueryError::NotFound(id.to_string()))
    }

    /// Assembles the detail view for one word.
    ///
    /// The parent read and each included section read are separate queries
    /// with no shared snapshot; a concurrent update landing between them can
    /// produce a torn view, accepted given human-editing cadence.
    pub fn get_word_details(
        &self,
        word: &str,
        include: &BTreeSet<DetailSection>,
    ) -> Result<WordDetails, QueryError> {
        let record = self
            .repo
            .find_by_lemma(&word.trim().to_lowercase())?
            .ok_or_else(|| QueryError::NotFound(word.to_string()))?;

        let mut details = WordDetails {
            lemma: record.lemma,
            syllabification: record.syllabification,
            other_common_meanings: record.other_common_meanings,
            image_differentiation_zh: record.image_differentiation_zh,
            raw_document: None,
            etymology: None,
            cognates: None,
            examples: None,
            synonyms: None,
        };

        if include.contains(&DetailSection::RawDocument) {
            details.raw_document = Some(record.canonical_document);
        }
        if include.contains(&DetailSection::Etymology) {
            details.etymology = Some(self.repo.etymology_for(record.id)?);
        }
        if include.contains(&DetailSection::Cognates) {
            details.cognates = Some(self.repo.cognates_for(record.id)?);
        }
        if include.contains(&DetailSection::Examples) {
            details.examples = Some(self.repo.examples_for(record.id)?);
        }
        if include.contains(&DetailSection::Synonyms) {
            details.synonyms = Some(self.repo.synonyms_for(record.id)?);
        }

        Ok(details)
    }

    /// Lemmatizes free text and looks up the guessed base form.
    pub fn check_word(&self, text: &str) -> Result<LookupOutcome, QueryError> {
        let mut lemma = self.lemmatizer.lemmatize(text);
        if lemma.is_empty() {
            lemma = text.trim().to_lowercase();
        }

        match self.repo.find_by_lemma(&lemma)? {
            Some(record) => Ok(LookupOutcome::Found { lemma, record }),
            None => Ok(LookupOutcome::NotFound { lemma }),
        }
    }
}
