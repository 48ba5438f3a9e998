//! Declarative word-document schema validator.
//!
//! # Responsibility
//! - Validate a parsed submission against the fixed five-section schema.
//! - Collect every violation in one pass; callers show the full list to the
//!   document author.
//!
//! # Invariants
//! - Pure and deterministic: identical input always yields identical output.
//! - Never fail-fast; errors are reported in schema declaration order.
//! - Fields outside the declared schema are ignored.

use serde_yaml::Value;

/// Validation verdict with the complete ordered violation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Shape descriptor for one schema node.
#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Required non-empty string.
    Text,
    /// Required non-empty string that must equal the target lemma under
    /// trimming and case-folding.
    LemmaText,
    /// Required mapping with the given named members.
    Object(&'static [Field]),
    /// Required non-empty sequence; element shape is not enforced.
    TextList,
    /// Required non-empty sequence of mappings, each carrying the listed
    /// non-empty string keys. `items_message` mirrors the caller-facing
    /// wording for element violations.
    ItemList {
        keys: &'static [&'static str],
        items_message: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    shape: Shape,
}

const YIELD_FIELDS: &[Field] = &[
    Field { name: "user_word", shape: Shape::Text },
    Field { name: "lemma", shape: Shape::LemmaText },
    Field { name: "syllabification", shape: Shape::Text },
    Field { name: "user_context_sentence", shape: Shape::Text },
    Field { name: "part_of_speech", shape: Shape::Text },
    Field {
        name: "contextual_meaning",
        shape: Shape::Object(&[
            Field { name: "en", shape: Shape::Text },
            Field { name: "zh", shape: Shape::Text },
        ]),
    },
    Field { name: "other_common_meanings", shape: Shape::TextList },
];

const ETYMOLOGY_FIELDS: &[Field] = &[
    Field {
        name: "root_and_affixes",
        shape: Shape::Object(&[
            Field { name: "prefix", shape: Shape::Text },
            Field { name: "root", shape: Shape::Text },
            Field { name: "suffix", shape: Shape::Text },
            Field { name: "structure_analysis", shape: Shape::Text },
        ]),
    },
    Field {
        name: "historical_origins",
        shape: Shape::Object(&[
            Field { name: "history_myth", shape: Shape::Text },
            Field { name: "source_word", shape: Shape::Text },
            Field { name: "pie_root", shape: Shape::Text },
        ]),
    },
    Field { name: "visual_imagery_zh", shape: Shape::Text },
    Field { name: "meaning_evolution_zh", shape: Shape::Text },
];

const DOCUMENT_SCHEMA: &[Field] = &[
    Field { name: "yield", shape: Shape::Object(YIELD_FIELDS) },
    Field { name: "etymology", shape: Shape::Object(ETYMOLOGY_FIELDS) },
    Field {
        name: "cognate_family",
        shape: Shape::Object(&[Field {
            name: "cognates",
            shape: Shape::ItemList {
                keys: &["word", "logic"],
                items_message: "must have word and logic",
            },
        }]),
    },
    Field {
        name: "application",
        shape: Shape::Object(&[Field {
            name: "selected_examples",
            shape: Shape::ItemList {
                keys: &["type", "sentence", "translation_zh"],
                items_message: "must have type, sentence, translation_zh",
            },
        }]),
    },
    Field {
        name: "nuance",
        shape: Shape::Object(&[
            Field { name: "image_differentiation_zh", shape: Shape::Text },
            Field {
                name: "synonyms",
                shape: Shape::ItemList {
                    keys: &["word", "meaning_zh"],
                    items_message: "must have word and meaning_zh",
                },
            },
        ]),
    },
];

/// Validates one parsed document against the declared schema.
///
/// `target_lemma` must already be lower-cased by the caller.
pub fn validate_document(value: &Value, target_lemma: &str) -> Validation {
    if value.as_mapping().is_none() {
        return Validation {
            valid: false,
            errors: vec!["root must be an object".to_string()],
        };
    }

    let mut errors = Vec::new();
    walk_fields(value, "", DOCUMENT_SCHEMA, target_lemma, &mut errors);
    Validation {
        valid: errors.is_empty(),
        errors,
    }
}

fn walk_fields(
    parent: &Value,
    prefix: &str,
    fields: &[Field],
    target_lemma: &str,
    errors: &mut Vec<String>,
) {
    for field in fields {
        let path = join_path(prefix, field.name);
        let value = parent.get(field.name);
        check_shape(value, &path, field.shape, target_lemma, errors);
    }
}

fn check_shape(
    value: Option<&Value>,
    path: &str,
    shape: Shape,
    target_lemma: &str,
    errors: &mut Vec<String>,
) {
    match shape {
        Shape::Text => {
            if non_empty_str(value).is_none() {
                errors.push(format!("{path} is required"));
            }
        }
        Shape::LemmaText => match non_empty_str(value) {
            None => errors.push(format!("{path} is required")),
            Some(text) => {
                if text.trim().to_lowercase() != target_lemma {
                    errors.push(format!("{path} must match word"));
                }
            }
        },
        Shape::Object(members) => match value.filter(|v| v.as_mapping().is_some()) {
            None => errors.push(format!("{path} is required")),
            Some(mapping) => walk_fields(mapping, path, members, target_lemma, errors),
        },
        Shape::TextList => {
            if value
                .and_then(Value::as_sequence)
                .map_or(true, |items| items.is_empty())
            {
                errors.push(format!("{path} must be a non-empty array"));
            }
        }
        Shape::ItemList {
            keys,
            items_message,
        } => match value.and_then(Value::as_sequence) {
            None => errors.push(format!("{path} must be a non-empty array")),
            Some(items) if items.is_empty() => {
                errors.push(format!("{path} must be a non-empty array"));
            }
            Some(items) => {
                let invalid = items.iter().any(|item| {
                    item.as_mapping().is_none()
                        || keys
                            .iter()
                            .any(|key| non_empty_str(item.get(*key)).is_none())
                });
                if invalid {
                    errors.push(format!("{path} items {items_message}"));
                }
            }
        },
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::validate_document;
    use serde_yaml::Value;

    fn parse(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn complete_doc() -> Value {
        parse(
            r#"
yield:
  user_word: bolstered
  lemma: bolster
  syllabification: bol-ster
  user_context_sentence: The evidence bolstered her claim.
  part_of_speech: verb
  contextual_meaning:
    en: to support or strengthen
    zh: zhi cheng
  other_common_meanings:
    - a long pillow
etymology:
  root_and_affixes:
    prefix: "-"
    root: bolster
    suffix: "-"
    structure_analysis: single Germanic root
  historical_origins:
    history_myth: Old English bolster meant cushion.
    source_word: bolster
    pie_root: bhelgh
  visual_imagery_zh: dian zi
  meaning_evolution_zh: cong zhen tou dao zhi chi
cognate_family:
  cognates:
    - word: bulge
      logic: same swelling root
application:
  selected_examples:
    - type: business
      sentence: New data bolstered the forecast.
      translation_zh: xin shu ju
nuance:
  image_differentiation_zh: tu xiang qu fen
  synonyms:
    - word: support
      meaning_zh: zhi chi
"#,
        )
    }

    #[test]
    fn complete_document_is_valid() {
        let verdict = validate_document(&complete_doc(), "bolster");
        assert!(verdict.valid, "unexpected errors: {:?}", verdict.errors);
        assert!(verdict.errors.is_empty());
    }

    #[test]
    fn validation_is_deterministic() {
        let doc = complete_doc();
        let first = validate_document(&doc, "bolster");
        let second = validate_document(&doc, "bolster");
        assert_eq!(first, second);
    }

    #[test]
    fn non_mapping_root_short_circuits() {
        let verdict = validate_document(&parse("- just\n- a list"), "bolster");
        assert!(!verdict.valid);
        assert_eq!(verdict.errors, vec!["root must be an object".to_string()]);
    }

    #[test]
    fn missing_lemma_is_named_in_errors() {
        let mut doc = complete_doc();
        if let Some(section) = doc.get_mut("yield").and_then(|v| v.as_mapping_mut()) {
            section.remove("lemma");
        }
        let verdict = validate_document(&doc, "bolster");
        assert!(!verdict.valid);
        assert!(verdict
            .errors
            .iter()
            .any(|error| error == "yield.lemma is required"));
    }

    #[test]
    fn lemma_mismatch_is_flagged_case_insensitively() {
        let verdict = validate_document(&complete_doc(), "buttress");
        assert!(!verdict.valid);
        assert!(verdict
            .errors
            .iter()
            .any(|error| error == "yield.lemma must match word"));

        let verdict = validate_document(&complete_doc(), "bolster");
        assert!(verdict.valid);
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let doc = parse("yield:\n  lemma: bolster\nnuance:\n  synonyms: []\n");
        let verdict = validate_document(&doc, "bolster");
        assert!(!verdict.valid);
        assert!(verdict.errors.contains(&"yield.user_word is required".to_string()));
        assert!(verdict.errors.contains(&"etymology is required".to_string()));
        assert!(verdict.errors.contains(&"cognate_family is required".to_string()));
        assert!(verdict.errors.contains(&"application is required".to_string()));
        assert!(verdict
            .errors
            .contains(&"nuance.synonyms must be a non-empty array".to_string()));
    }

    #[test]
    fn item_lists_require_their_keyed_fields() {
        let mut doc = complete_doc();
        if let Some(cognates) = doc
            .get_mut("cognate_family")
            .and_then(|v| v.get_mut("cognates"))
            .and_then(|v| v.as_sequence_mut())
        {
            cognates.push(parse("word: bulwark"));
        }
        let verdict = validate_document(&doc, "bolster");
        assert!(verdict
            .errors
            .contains(&"cognate_family.cognates items must have word and logic".to_string()));
    }
}
