use lexivault_core::db::open_db_in_memory;
use lexivault_core::{AddWordOutcome, SqliteWordRepository, WordRepository, WordService};

fn doc_text(lemma: &str) -> String {
    format!(
        "yield:
  user_word: {lemma}
  lemma: {lemma}
  syllabification: syl-la-ble
  user_context_sentence: Context sentence for {lemma}.
  part_of_speech: verb
  contextual_meaning:
    en: to support firmly
    zh: zhi cheng
  other_common_meanings:
    - a supporting cushion
etymology:
  root_and_affixes:
    prefix: \"-\"
    root: {lemma}
    suffix: \"-\"
    structure_analysis: single root
  historical_origins:
    history_myth: Old English origin story.
    source_word: {lemma}
    pie_root: bhel
  visual_imagery_zh: hua mian
  meaning_evolution_zh: yan bian
cognate_family:
  cognates:
    - word: bulge
      logic: swelling root
application:
  selected_examples:
    - type: business
      sentence: The plan will {lemma} the team.
      translation_zh: fan yi
nuance:
  image_differentiation_zh: qu fen
  synonyms:
    - word: support
      meaning_zh: zhi chi
"
    )
}

#[test]
fn add_word_creates_then_reports_duplicate() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = WordService::new(&mut conn);

    let first = service.add_word("bid", &doc_text("bid")).unwrap();
    let created_id = match first {
        AddWordOutcome::Created { id, ref lemma } => {
            assert_eq!(lemma, "bid");
            id
        }
        other => panic!("expected Created, got {other:?}"),
    };

    let second = service.add_word("bid", &doc_text("bid")).unwrap();
    match second {
        AddWordOutcome::Duplicate { id, lemma } => {
            assert_eq!(id, Some(created_id));
            assert_eq!(lemma, "bid");
        }
        other => panic!("expected Duplicate, got {other:?}"),
    }
}

#[test]
fn add_word_populates_all_child_tables() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut service = WordService::new(&mut conn);
        match service.add_word("bolster", &doc_text("bolster")).unwrap() {
            AddWordOutcome::Created { id, .. } => id,
            other => panic!("expected Created, got {other:?}"),
        }
    };

    let repo = SqliteWordRepository::new(&conn);
    assert!(repo.etymology_for(id).unwrap().is_some());
    assert_eq!(repo.cognates_for(id).unwrap().len(), 1);
    assert_eq!(repo.examples_for(id).unwrap().len(), 1);
    assert_eq!(repo.synonyms_for(id).unwrap().len(), 1);

    let record = repo.find_by_lemma("BOLSTER").unwrap().unwrap();
    assert_eq!(record.lemma, "bolster");
    assert_eq!(record.revision_count, 0);
    assert_eq!(
        record.other_common_meanings,
        vec!["a supporting cushion".to_string()]
    );
}

#[test]
fn add_word_with_malformed_text_is_invalid_never_created() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = WordService::new(&mut conn);

    let outcome = service.add_word("x", "not: [valid").unwrap();
    match outcome {
        AddWordOutcome::Invalid { errors } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("yaml parse error"));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }

    let repo = SqliteWordRepository::new(&conn);
    assert!(repo.find_by_lemma("x").unwrap().is_none());
}

#[test]
fn add_word_collects_all_schema_violations() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = WordService::new(&mut conn);

    let outcome = service
        .add_word("bolster", "yield:\n  lemma: bolster\n")
        .unwrap();
    match outcome {
        AddWordOutcome::Invalid { errors } => {
            assert!(errors.contains(&"yield.user_word is required".to_string()));
            assert!(errors.contains(&"etymology is required".to_string()));
            assert!(errors.contains(&"nuance is required".to_string()));
            assert!(errors.len() >= 5, "expected a full violation list: {errors:?}");
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn add_word_lemma_mismatch_is_invalid() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = WordService::new(&mut conn);

    let outcome = service.add_word("buttress", &doc_text("bolster")).unwrap();
    match outcome {
        AddWordOutcome::Invalid { errors } => {
            assert!(errors.contains(&"yield.lemma must match word".to_string()));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn duplicate_short_circuits_before_validation() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = WordService::new(&mut conn);
    service.add_word("bolster", &doc_text("bolster")).unwrap();

    // A schema-violating resubmission for an existing lemma still reports
    // Duplicate: no validation is attempted when a duplicate exists.
    let outcome = service
        .add_word("bolster", "yield:\n  lemma: bolster\n")
        .unwrap();
    assert!(matches!(outcome, AddWordOutcome::Duplicate { .. }));
}

#[test]
fn blank_word_is_rejected_without_touching_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = WordService::new(&mut conn);

    let outcome = service.add_word("   ", &doc_text("bolster")).unwrap();
    match outcome {
        AddWordOutcome::Invalid { errors } => {
            assert_eq!(errors, vec!["word is required".to_string()]);
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}
