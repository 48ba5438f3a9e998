//! Best-effort lemmatization collaborator.
//!
//! # Responsibility
//! - Derive a best-guess dictionary base form from free user text for
//!   lookup purposes.
//!
//! # Invariants
//! - Output is always lower-cased and trimmed.
//! - No correctness guarantee: a lookup miss on the derived lemma is a
//!   normal, non-error outcome for callers.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]+(?:['-][a-zA-Z]+)*").expect("valid token regex"));

/// Seam for the external lemmatization black box.
pub trait Lemmatizer {
    /// Returns a normalized base form (verb -> infinitive, noun -> singular)
    /// for the given free text.
    fn lemmatize(&self, text: &str) -> String;
}

/// Suffix-stripping heuristic lemmatizer.
///
/// Handles common English plural and verb inflections. Deliberately modest:
/// it is a stand-in for a proper NLP collaborator and is only used for
/// best-effort lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleLemmatizer;

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, text: &str) -> String {
        let token = WORD_TOKEN_RE
            .find(text)
            .map(|token| token.as_str())
            .unwrap_or(text)
            .trim()
            .to_lowercase();
        strip_inflection(&token)
    }
}

fn strip_inflection(token: &str) -> String {
    if token.len() <= 3 {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            return format!("{stem}{}", &suffix[..suffix.len() - 2]);
        }
    }
    if let Some(stem) = token.strip_suffix("ing") {
        if stem.len() >= 3 {
            return undouble(stem);
        }
    }
    if let Some(stem) = token.strip_suffix("ed") {
        if stem.len() >= 3 {
            return undouble(stem);
        }
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}

/// Collapses consonant doubling left behind by suffix stripping
/// (`bolstering` -> `bolster`, `planning` -> `plan`).
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let len = bytes.len();
    if len >= 2 && bytes[len - 1] == bytes[len - 2] && !is_vowel(bytes[len - 1]) {
        return stem[..len - 1].to_string();
    }
    stem.to_string()
}

fn is_vowel(byte: u8) -> bool {
    matches!(byte, b'a' | b'e' | b'i' | b'o' | b'u')
}
