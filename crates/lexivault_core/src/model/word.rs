//! Persisted word record shapes.
//!
//! # Responsibility
//! - Define the parent `WordRecord` read model and its child collections.
//!
//! # Invariants
//! - `id` is the stable storage identity; `lemma` is unique under
//!   case-folding.
//! - `revision_count` only ever increases, by exactly one per content
//!   update.

use serde::{Deserialize, Serialize};

/// Stable storage identity for a word record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type WordId = i64;

/// Parent read model for one stored word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Stable storage id.
    pub id: WordId,
    /// Canonical dictionary headword, stored lower-cased.
    pub lemma: String,
    pub syllabification: String,
    pub part_of_speech: String,
    pub contextual_meaning_en: String,
    pub contextual_meaning_zh: String,
    /// Denormalized mirror of `yield.other_common_meanings`.
    pub other_common_meanings: Vec<String>,
    /// Denormalized mirror of `nuance.image_differentiation_zh`.
    pub image_differentiation_zh: String,
    /// Full submission text as originally authored, kept for diffing.
    pub canonical_document: String,
    /// Incremented by exactly one on every content update.
    pub revision_count: i64,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Last-update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

/// 1:1 etymology child row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtymologyRecord {
    pub prefix: String,
    pub root: String,
    pub suffix: String,
    pub structure_analysis: String,
    pub history_myth: String,
    pub source_word: String,
    pub pie_root: String,
    pub visual_imagery_zh: String,
    pub meaning_evolution_zh: String,
}

/// One related-word entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognateRecord {
    pub word: String,
    pub logic: String,
}

/// One usage example entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    pub example_type: String,
    pub sentence: String,
    pub translation_zh: String,
}

/// One synonym entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymRecord {
    pub word: String,
    pub meaning_zh: String,
}

/// Append-only record of one raw user submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequestRecord {
    pub word_id: WordId,
    pub user_input: String,
    pub context_sentence: Option<String>,
    pub created_at: i64,
}
