//! Parsed word-document wrapper.
//!
//! # Responsibility
//! - Parse the human-authored YAML submission into a nested mapping.
//! - Provide typed accessors for the field paths the engine persists.
//!
//! # Invariants
//! - The original submission text is kept verbatim; accessors never mutate
//!   the parsed tree.
//! - Accessors are best-effort: schema enforcement belongs to the validator,
//!   not to this wrapper.

use crate::model::word::{CognateRecord, EtymologyRecord, ExampleRecord, SynonymRecord};
use serde_yaml::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for malformed document text.
#[derive(Debug)]
pub struct DocumentParseError {
    message: String,
}

impl Display for DocumentParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "yaml parse error: {}", self.message)
    }
}

impl Error for DocumentParseError {}

/// One parsed word submission.
///
/// Exists only during parse/validate/diff; the verbatim `text` is what gets
/// persisted as the canonical document.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDocument {
    text: String,
    value: Value,
}

impl WordDocument {
    /// Parses submitted document text into a nested mapping.
    pub fn parse(text: &str) -> Result<Self, DocumentParseError> {
        let value: Value = serde_yaml::from_str(text).map_err(|err| DocumentParseError {
            message: err.to_string(),
        })?;
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }

    /// Reconstructs a document from previously persisted canonical text.
    ///
    /// Persisted text was parsed successfully at write time, so a failure
    /// here indicates corrupted storage.
    pub fn from_canonical(text: &str) -> Result<Self, DocumentParseError> {
        Self::parse(text)
    }

    /// Verbatim submission text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed document tree.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Lower-cased, trimmed `yield.lemma`, when present and non-empty.
    pub fn lemma(&self) -> Option<String> {
        let lemma = self.str_at(&["yield", "lemma"])?.trim().to_lowercase();
        if lemma.is_empty() {
            None
        } else {
            Some(lemma)
        }
    }

    pub fn user_word(&self) -> Option<&str> {
        self.str_at(&["yield", "user_word"])
    }

    pub fn user_context_sentence(&self) -> Option<&str> {
        self.str_at(&["yield", "user_context_sentence"])
    }

    pub fn syllabification(&self) -> &str {
        self.str_at(&["yield", "syllabification"]).unwrap_or("")
    }

    pub fn part_of_speech(&self) -> &str {
        self.str_at(&["yield", "part_of_speech"]).unwrap_or("")
    }

    pub fn contextual_meaning_en(&self) -> &str {
        self.str_at(&["yield", "contextual_meaning", "en"])
            .unwrap_or("")
    }

    pub fn contextual_meaning_zh(&self) -> &str {
        self.str_at(&["yield", "contextual_meaning", "zh"])
            .unwrap_or("")
    }

    pub fn image_differentiation_zh(&self) -> &str {
        self.str_at(&["nuance", "image_differentiation_zh"])
            .unwrap_or("")
    }

    /// Plain-string entries of `yield.other_common_meanings`.
    pub fn other_common_meanings(&self) -> Vec<String> {
        self.seq_at(&["yield", "other_common_meanings"])
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(|text| text.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Etymology fields flattened into the persisted record shape.
    pub fn etymology(&self) -> EtymologyRecord {
        EtymologyRecord {
            prefix: self.owned_str(&["etymology", "root_and_affixes", "prefix"]),
            root: self.owned_str(&["etymology", "root_and_affixes", "root"]),
            suffix: self.owned_str(&["etymology", "root_and_affixes", "suffix"]),
            structure_analysis: self.owned_str(&["etymology", "root_and_affixes", "structure_analysis"]),
            history_myth: self.owned_str(&["etymology", "historical_origins", "history_myth"]),
            source_word: self.owned_str(&["etymology", "historical_origins", "source_word"]),
            pie_root: self.owned_str(&["etymology", "historical_origins", "pie_root"]),
            visual_imagery_zh: self.owned_str(&["etymology", "visual_imagery_zh"]),
            meaning_evolution_zh: self.owned_str(&["etymology", "meaning_evolution_zh"]),
        }
    }

    pub fn cognates(&self) -> Vec<CognateRecord> {
        self.seq_at(&["cognate_family", "cognates"])
            .map(|items| {
                items
                    .iter()
                    .map(|item| CognateRecord {
                        word: item_str(item, "word"),
                        logic: item_str(item, "logic"),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn examples(&self) -> Vec<ExampleRecord> {
        self.seq_at(&["application", "selected_examples"])
            .map(|items| {
                items
                    .iter()
                    .map(|item| ExampleRecord {
                        example_type: item_str(item, "type"),
                        sentence: item_str(item, "sentence"),
                        translation_zh: item_str(item, "translation_zh"),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn synonyms(&self) -> Vec<SynonymRecord> {
        self.seq_at(&["nuance", "synonyms"])
            .map(|items| {
                items
                    .iter()
                    .map(|item| SynonymRecord {
                        word: item_str(item, "word"),
                        meaning_zh: item_str(item, "meaning_zh"),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn str_at(&self, path: &[&str]) -> Option<&str> {
        value_at(&self.value, path).and_then(Value::as_str)
    }

    fn owned_str(&self, path: &[&str]) -> String {
        self.str_at(path).unwrap_or("").to_string()
    }

    fn seq_at(&self, path: &[&str]) -> Option<&Vec<Value>> {
        value_at(&self.value, path).and_then(Value::as_sequence)
    }
}

/// Walks a nested mapping along string keys.
pub fn value_at<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    Some(current)
}

fn item_str(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
