use lexivault_core::db::open_db_in_memory;
use lexivault_core::{
    parse_include, LookupOutcome, QueryError, QueryService, SaveWordOutcome,
    SqliteWordRepository, WordService,
};
use std::collections::BTreeSet;

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

fn seed(conn: &mut rusqlite::Connection, lemma: &str) {
    let mut service = WordService::new(conn);
    let outcome = service.save_word(&doc_text(lemma), false).unwrap();
    assert!(matches!(outcome, SaveWordOutcome::Created { .. }));
}

#[test]
fn details_without_include_carry_only_base_fields() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn, "bolster");

    let service = QueryService::new(SqliteWordRepository::new(&conn));
    let details = service
        .get_word_details("bolster", &BTreeSet::new())
        .unwrap();

    assert_eq!(details.lemma, "bolster");
    assert_eq!(details.syllabification, "syl-la-ble");
    assert_eq!(details.image_differentiation_zh, "qu fen");
    assert!(details.raw_document.is_none());
    assert!(details.etymology.is_none());
    assert!(details.cognates.is_none());
    assert!(details.examples.is_none());
    assert!(details.synonyms.is_none());
}

#[test]
fn details_with_full_include_carry_all_sections() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn, "bolster");

    let service = QueryService::new(SqliteWordRepository::new(&conn));
    let include = parse_include("etymology,cognates,examples,synonyms,rawyaml");
    let details = service.get_word_details("bolster", &include).unwrap();

    let etymology = details
        .etymology
        .expect("etymology section requested")
        .expect("etymology row stored");
    assert_eq!(etymology.root, "bolster");

    let examples = details.examples.expect("examples section requested");
    assert!(!examples.is_empty());
    assert!(!examples[0].sentence.is_empty());

    assert_eq!(details.cognates.unwrap()[0].word, "bulge");
    assert_eq!(details.synonyms.unwrap()[0].word, "support");
    assert!(details.raw_document.unwrap().contains("bolster"));
}

#[test]
fn details_lookup_is_case_insensitive_exact_match() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn, "bolster");

    let service = QueryService::new(SqliteWordRepository::new(&conn));
    let details = service
        .get_word_details("  BOLSTER ", &BTreeSet::new())
        .unwrap();
    assert_eq!(details.lemma, "bolster");

    // No substring fallback.
    let err = service.get_word_details("bolst", &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, QueryError::NotFound(_)));
}

#[test]
fn details_for_unknown_word_fail_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = QueryService::new(SqliteWordRepository::new(&conn));

    let err = service
        .get_word_details("not_a_real_word", &BTreeSet::new())
        .unwrap_err();
    match err {
        QueryError::NotFound(word) => assert_eq!(word, "not_a_real_word"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn check_word_finds_records_through_inflected_forms() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn, "bolster");

    let service = QueryService::new(SqliteWordRepository::new(&conn));
    match service.check_word("bolstering").unwrap() {
        LookupOutcome::Found { lemma, record } => {
            assert_eq!(lemma, "bolster");
            assert_eq!(record.lemma, "bolster");
        }
        other => panic!("expected Found, got {other:?}"),
    }
}

#[test]
fn check_word_miss_is_a_normal_outcome_with_the_guess() {
    let conn = open_db_in_memory().unwrap();
    let service = QueryService::new(SqliteWordRepository::new(&conn));

    match service.check_word("Zyzzyvas everywhere").unwrap() {
        LookupOutcome::NotFound { lemma } => assert_eq!(lemma, "zyzzyva"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn get_word_by_id_round_trips_and_misses_cleanly() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn, "bolster");

    let service = QueryService::new(SqliteWordRepository::new(&conn));
    let listed = service.list_words().unwrap();
    let record = service.get_word_by_id(listed[0].id).unwrap();
    assert_eq!(record.lemma, "bolster");

    let err = service.get_word_by_id(999_999).unwrap_err();
    assert!(matches!(err, QueryError::NotFound(_)));
}
