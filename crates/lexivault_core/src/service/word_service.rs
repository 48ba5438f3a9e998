//! Persistence orchestrator for word submissions.
//!
//! # Responsibility
//! - Compose parsing, schema validation and conflict analysis with the
//!   transactional word store.
//! - Map store-level uniqueness violations to duplicate outcomes.
//!
//! # Invariants
//! - Every mutating operation runs inside exactly one immediate
//!   transaction; early returns roll back, success paths commit.
//! - No validation is attempted for `add_word` when a duplicate exists.
//! - One request-log entry is appended per successful `save_word`, whether
//!   or not content changed.

use crate::diff::analyzer::{analyze, DiffEntry};
use crate::model::document::{DocumentParseError, WordDocument};
use crate::model::word::WordId;
use crate::repo::word_repo::{
    append_user_request, delete_word, find_by_lemma, insert_word, replace_children, update_word,
    RepoError,
};
use crate::schema::validator::validate_document;
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Orchestrator error for submission handling.
///
/// Schema violations, duplicates and conflicts are outcomes rather than
/// errors; this enum covers malformed input and store failures only.
#[derive(Debug)]
pub enum WordServiceError {
    /// Malformed document text, or a submission missing `yield.lemma`.
    Parse(String),
    /// Persistence-layer failure; the transaction was rolled back.
    Repo(RepoError),
}

impl Display for WordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for WordServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for WordServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<DocumentParseError> for WordServiceError {
    fn from(value: DocumentParseError) -> Self {
        Self::Parse(value.to_string())
    }
}

/// Outcome of one `add_word` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddWordOutcome {
    Created {
        id: WordId,
        lemma: String,
    },
    /// A record for this lemma already exists. `id` is `None` only when the
    /// duplicate was detected by losing an insert race.
    Duplicate {
        id: Option<WordId>,
        lemma: String,
    },
    /// Malformed or schema-violating submission, with the complete ordered
    /// error list.
    Invalid {
        errors: Vec<String>,
    },
}

/// Outcome of one `save_word` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveWordOutcome {
    /// No record existed for the lemma; one was created.
    Created { id: WordId, lemma: String },
    /// Content was persisted over an existing record (forced or
    /// conflict-resolved change).
    Updated { id: WordId, lemma: String },
    /// Existing record, identical content: submission logged, nothing else
    /// changed.
    Logged { id: WordId, lemma: String },
    /// Schema-violating submission; nothing was persisted.
    Invalid { errors: Vec<String> },
    /// Stored and incoming documents diverge and `force_update` was false;
    /// nothing was persisted.
    Conflict {
        lemma: String,
        diff: Vec<DiffEntry>,
        old_document: String,
        new_document: String,
    },
}

/// Read-only conflict preview for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictPreview {
    /// No record exists; saving would create one.
    WouldCreate { lemma: String },
    /// A record exists and the contents agree.
    NoConflict { lemma: String },
    /// A record exists and diverges from the submission.
    Conflict {
        lemma: String,
        diff: Vec<DiffEntry>,
        old_document: String,
        new_document: String,
    },
}

/// Transactional orchestrator over one store connection.
///
/// The connection is the explicit persistence-context handle; the service
/// never reaches for ambient/global store state.
pub struct WordService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> WordService<'conn> {
    /// Creates a service over a migrated, ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates a new word record from an explicit target word plus document
    /// text.
    ///
    /// Duplicate lookup short-circuits before any validation is attempted;
    /// an insert race lost to a concurrent writer also resolves to
    /// `Duplicate` via the store's uniqueness violation.
    pub fn add_word(
        &mut self,
        word: &str,
        document_text: &str,
    ) -> Result<AddWordOutcome, WordServiceError> {
        let lemma = word.trim().to_lowercase();
        if lemma.is_empty() {
            return Ok(AddWordOutcome::Invalid {
                errors: vec!["word is required".to_string()],
            });
        }

        let document = match WordDocument::parse(document_text) {
            Ok(document) => document,
            Err(err) => {
                return Ok(AddWordOutcome::Invalid {
                    errors: vec![err.to_string()],
                });
            }
        };

        // Dropping the transaction without commit rolls back.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = find_by_lemma(&tx, &lemma)? {
            info!("event=word_add module=service status=duplicate lemma={lemma}");
            return Ok(AddWordOutcome::Duplicate {
                id: Some(existing.id),
                lemma: existing.lemma,
            });
        }

        let verdict = validate_document(document.value(), &lemma);
        if !verdict.valid {
            info!(
                "event=word_add module=service status=invalid lemma={lemma} error_count={}",
                verdict.errors.len()
            );
            return Ok(AddWordOutcome::Invalid {
                errors: verdict.errors,
            });
        }

        let id = match insert_word(&tx, &lemma, &document) {
            Ok(id) => id,
            Err(RepoError::DuplicateLemma(lemma)) => {
                info!("event=word_add module=service status=duplicate_race lemma={lemma}");
                return Ok(AddWordOutcome::Duplicate { id: None, lemma });
            }
            Err(err) => return Err(err.into()),
        };
        replace_children(&tx, id, &document)?;
        tx.commit().map_err(RepoError::from)?;

        info!("event=word_add module=service status=created lemma={lemma} word_id={id}");
        Ok(AddWordOutcome::Created { id, lemma })
    }

    /// Creates or updates the record for the document's own lemma.
    ///
    /// Updates are gated by conflict analysis unless `force_update` is set;
    /// child tables are fully replaced on every content change.
    pub fn save_word(
        &mut self,
        document_text: &str,
        force_update: bool,
    ) -> Result<SaveWordOutcome, WordServiceError> {
        let document = WordDocument::parse(document_text)?;
        let lemma = document
            .lemma()
            .ok_or_else(|| WordServiceError::Parse("document missing yield.lemma".to_string()))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = find_by_lemma(&tx, &lemma)?;

        let analysis = match &existing {
            Some(record) => {
                let stored = WordDocument::from_canonical(&record.canonical_document)
                    .map_err(|err| WordServiceError::Repo(RepoError::InvalidData(err.to_string())))?;
                Some(analyze(stored.value(), document.value()))
            }
            None => None,
        };

        if let (Some(record), Some(analysis)) = (&existing, &analysis) {
            if analysis.has_conflict && !force_update {
                info!(
                    "event=word_save module=service status=conflict lemma={lemma} diff_count={}",
                    analysis.diff.len()
                );
                return Ok(SaveWordOutcome::Conflict {
                    lemma,
                    diff: analysis.diff.clone(),
                    old_document: record.canonical_document.clone(),
                    new_document: document_text.to_string(),
                });
            }
        }

        let verdict = validate_document(document.value(), &lemma);
        if !verdict.valid {
            info!(
                "event=word_save module=service status=invalid lemma={lemma} error_count={}",
                verdict.errors.len()
            );
            return Ok(SaveWordOutcome::Invalid {
                errors: verdict.errors,
            });
        }

        let (id, outcome) = match &existing {
            None => {
                let id = insert_word(&tx, &lemma, &document)?;
                replace_children(&tx, id, &document)?;
                (id, SaveWordOutcome::Created { id, lemma: lemma.clone() })
            }
            Some(record) => {
                let has_conflict = analysis.as_ref().is_some_and(|a| a.has_conflict);
                if force_update || has_conflict {
                    update_word(&tx, record.id, &document)?;
                    replace_children(&tx, record.id, &document)?;
                    (
                        record.id,
                        SaveWordOutcome::Updated { id: record.id, lemma: lemma.clone() },
                    )
                } else {
                    (
                        record.id,
                        SaveWordOutcome::Logged { id: record.id, lemma: lemma.clone() },
                    )
                }
            }
        };

        let user_input = document.user_word().unwrap_or(lemma.as_str());
        append_user_request(&tx, id, user_input, document.user_context_sentence())?;
        tx.commit().map_err(RepoError::from)?;

        let status = match &outcome {
            SaveWordOutcome::Created { .. } => "created",
            SaveWordOutcome::Updated { .. } => "updated",
            SaveWordOutcome::Logged { .. } => "logged",
            _ => "unreachable",
        };
        info!("event=word_save module=service status={status} lemma={lemma} word_id={id}");
        Ok(outcome)
    }

    /// Read-only preview of what `save_word` would decide; never persists.
    pub fn check_conflict(&self, document_text: &str) -> Result<ConflictPreview, WordServiceError> {
        let document = WordDocument::parse(document_text)?;
        let lemma = document
            .lemma()
            .ok_or_else(|| WordServiceError::Parse("document missing yield.lemma".to_string()))?;

        let conn: &Connection = self.conn;
        let Some(existing) = find_by_lemma(conn, &lemma)? else {
            return Ok(ConflictPreview::WouldCreate { lemma });
        };

        let stored = WordDocument::from_canonical(&existing.canonical_document)
            .map_err(|err| WordServiceError::Repo(RepoError::InvalidData(err.to_string())))?;
        let analysis = analyze(stored.value(), document.value());
        if analysis.has_conflict {
            return Ok(ConflictPreview::Conflict {
                lemma,
                diff: analysis.diff,
                old_document: existing.canonical_document,
                new_document: document_text.to_string(),
            });
        }
        Ok(ConflictPreview::NoConflict { lemma })
    }

    /// Removes one word with its child rows and request-log entries.
    pub fn delete_word(&mut self, id: WordId) -> Result<(), WordServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        delete_word(&tx, id)?;
        tx.commit().map_err(RepoError::from)?;
        info!("event=word_delete module=service status=ok word_id={id}");
        Ok(())
    }
}
