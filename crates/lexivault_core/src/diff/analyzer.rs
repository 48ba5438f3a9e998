//! Word-document conflict analyzer.
//!
//! # Responsibility
//! - Compare a stored canonical document against an incoming submission at
//!   the tracked field paths.
//! - Report a path-keyed, deterministic diff for conflict gating and
//!   caller-facing previews.
//!
//! # Invariants
//! - Whitespace-only or case-only changes never count as conflicts.
//! - Collections are compared as sets under their identifying key; element
//!   order never constitutes a conflict.
//! - Output is sorted by field path, so re-running on the same pair is
//!   byte-identical.

use crate::model::document::value_at;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Scalar paths participating in conflict detection.
///
/// Submission context (`yield.user_word`, `yield.user_context_sentence`) is
/// intentionally untracked: it varies per request and is captured by the
/// request log instead.
const TRACKED_SCALARS: &[&[&str]] = &[
    &["yield", "syllabification"],
    &["yield", "part_of_speech"],
    &["yield", "contextual_meaning", "en"],
    &["yield", "contextual_meaning", "zh"],
    &["etymology", "root_and_affixes", "prefix"],
    &["etymology", "root_and_affixes", "root"],
    &["etymology", "root_and_affixes", "suffix"],
    &["etymology", "root_and_affixes", "structure_analysis"],
    &["etymology", "historical_origins", "history_myth"],
    &["etymology", "historical_origins", "source_word"],
    &["etymology", "historical_origins", "pie_root"],
    &["etymology", "visual_imagery_zh"],
    &["etymology", "meaning_evolution_zh"],
    &["nuance", "image_differentiation_zh"],
];

/// Keyed collections participating in conflict detection.
struct TrackedCollection {
    path: &'static [&'static str],
    /// Identifying sub-field, or `None` for plain string lists keyed by the
    /// value itself.
    key_field: Option<&'static str>,
    /// Sub-fields compared between keyed elements present on both sides.
    compare_fields: &'static [&'static str],
}

const TRACKED_COLLECTIONS: &[TrackedCollection] = &[
    TrackedCollection {
        path: &["yield", "other_common_meanings"],
        key_field: None,
        compare_fields: &[],
    },
    TrackedCollection {
        path: &["cognate_family", "cognates"],
        key_field: Some("word"),
        compare_fields: &["logic"],
    },
    TrackedCollection {
        path: &["application", "selected_examples"],
        key_field: Some("sentence"),
        compare_fields: &["type", "translation_zh"],
    },
    TrackedCollection {
        path: &["nuance", "synonyms"],
        key_field: Some("word"),
        compare_fields: &["meaning_zh"],
    },
];

/// Kind of difference found at one field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Added,
    Modified,
    Removed,
}

/// One field-level difference between the stored and incoming documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub path: String,
    pub kind: DiffKind,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Analyzer verdict: the full diff plus the derived conflict flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictAnalysis {
    pub has_conflict: bool,
    pub diff: Vec<DiffEntry>,
}

/// Compares two documents at the tracked field paths.
///
/// Both inputs may be only partially schema-conforming; missing fields are
/// treated as absent values rather than errors.
pub fn analyze(existing: &Value, incoming: &Value) -> ConflictAnalysis {
    let mut diff = Vec::new();

    for path in TRACKED_SCALARS {
        diff_scalar(existing, incoming, path, &mut diff);
    }
    for collection in TRACKED_COLLECTIONS {
        diff_collection(existing, incoming, collection, &mut diff);
    }

    diff.sort_by(|a, b| {
        (&a.path, a.kind, &a.old_value, &a.new_value).cmp(&(
            &b.path,
            b.kind,
            &b.old_value,
            &b.new_value,
        ))
    });

    ConflictAnalysis {
        has_conflict: !diff.is_empty(),
        diff,
    }
}

fn diff_scalar(existing: &Value, incoming: &Value, path: &[&str], diff: &mut Vec<DiffEntry>) {
    let old_text = scalar_at(existing, path);
    let new_text = scalar_at(incoming, path);

    let old_norm = old_text.as_deref().map(normalize);
    let new_norm = new_text.as_deref().map(normalize);
    if old_norm == new_norm {
        return;
    }

    let kind = match (&old_text, &new_text) {
        (None, Some(_)) => DiffKind::Added,
        (Some(_), None) => DiffKind::Removed,
        _ => DiffKind::Modified,
    };
    diff.push(DiffEntry {
        path: path.join("."),
        kind,
        old_value: old_text,
        new_value: new_text,
    });
}

fn diff_collection(
    existing: &Value,
    incoming: &Value,
    collection: &TrackedCollection,
    diff: &mut Vec<DiffEntry>,
) {
    let base_path = collection.path.join(".");
    let old_items = keyed_items(existing, collection);
    let new_items = keyed_items(incoming, collection);

    for (key, old_item) in &old_items {
        let Some(new_item) = new_items.get(key) else {
            diff.push(DiffEntry {
                path: format!("{base_path}[{}]", old_item.display_key),
                kind: DiffKind::Removed,
                old_value: Some(old_item.display_key.clone()),
                new_value: None,
            });
            continue;
        };

        for field in collection.compare_fields {
            let old_text = old_item.fields.get(*field).cloned().flatten();
            let new_text = new_item.fields.get(*field).cloned().flatten();
            if old_text.as_deref().map(normalize) == new_text.as_deref().map(normalize) {
                continue;
            }
            diff.push(DiffEntry {
                path: format!("{base_path}[{}].{field}", old_item.display_key),
                kind: DiffKind::Modified,
                old_value: old_text,
                new_value: new_text,
            });
        }
    }

    for (key, new_item) in &new_items {
        if !old_items.contains_key(key) {
            diff.push(DiffEntry {
                path: format!("{base_path}[{}]", new_item.display_key),
                kind: DiffKind::Added,
                old_value: None,
                new_value: Some(new_item.display_key.clone()),
            });
        }
    }
}

struct KeyedItem {
    display_key: String,
    fields: BTreeMap<&'static str, Option<String>>,
}

/// Collects collection elements keyed by their normalized identity.
///
/// Elements without a usable key are skipped; the validator is responsible
/// for rejecting them on write paths.
fn keyed_items(document: &Value, collection: &TrackedCollection) -> BTreeMap<String, KeyedItem> {
    let mut items = BTreeMap::new();
    let Some(sequence) = value_at(document, collection.path).and_then(Value::as_sequence) else {
        return items;
    };

    for element in sequence {
        let display_key = match collection.key_field {
            None => element.as_str().map(|text| text.trim().to_string()),
            Some(key_field) => element
                .get(key_field)
                .and_then(Value::as_str)
                .map(|text| text.trim().to_string()),
        };
        let Some(display_key) = display_key.filter(|key| !key.is_empty()) else {
            continue;
        };

        let mut fields = BTreeMap::new();
        for field in collection.compare_fields {
            let text = element
                .get(*field)
                .and_then(Value::as_str)
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty());
            fields.insert(*field, text);
        }

        items.insert(
            normalize(&display_key),
            KeyedItem {
                display_key,
                fields,
            },
        );
    }

    items
}

fn scalar_at(document: &Value, path: &[&str]) -> Option<String> {
    value_at(document, path)
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
