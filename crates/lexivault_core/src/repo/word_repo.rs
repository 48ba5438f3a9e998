//! Word repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide read APIs over the `words` parent table and its children.
//! - Provide the write primitives the persistence orchestrator composes
//!   inside its transactions.
//!
//! # Invariants
//! - Every content mutation replaces the full child set for the word;
//!   child rows are never patched in place.
//! - The unique `lemma COLLATE NOCASE` index is the final arbiter for
//!   concurrent inserts; violations surface as `DuplicateLemma`.

use crate::db::DbError;
use crate::model::document::WordDocument;
use crate::model::word::{
    CognateRecord, EtymologyRecord, ExampleRecord, SynonymRecord, WordId, WordRecord,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const WORD_SELECT_SQL: &str = "SELECT
    id,
    lemma,
    syllabification,
    part_of_speech,
    contextual_meaning_en,
    contextual_meaning_zh,
    other_common_meanings,
    image_differentiation_zh,
    canonical_document,
    revision_count,
    created_at,
    updated_at
FROM words";

pub const PAGE_LIMIT_DEFAULT: u32 = 20;
pub const PAGE_LIMIT_MAX: u32 = 200;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for word persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(WordId),
    /// Case-insensitive lemma collision on insert.
    DuplicateLemma(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "word not found: {id}"),
            Self::DuplicateLemma(lemma) => write!(f, "duplicate lemma: `{lemma}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted word data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Explicit ordering options for the paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordSort {
    #[default]
    Newest,
    Oldest,
    Az,
    Za,
}

/// Parses a caller-supplied sort token, defaulting to newest-first.
pub fn parse_sort(token: &str) -> WordSort {
    match token.trim().to_lowercase().as_str() {
        "oldest" => WordSort::Oldest,
        "az" => WordSort::Az,
        "za" => WordSort::Za,
        _ => WordSort::Newest,
    }
}

/// Query options for the paged word listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordListQuery {
    /// 1-based page number. Values below 1 clamp to 1.
    pub page: u32,
    /// Page size. Clamps to 1..=200; 0 means the default of 20.
    pub limit: u32,
    /// Case-insensitive substring filter on lemma.
    pub search: Option<String>,
    pub sort: WordSort,
}

/// One page of the word listing.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPage {
    pub items: Vec<WordRecord>,
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// Clamps a page number to the 1-based contract.
pub fn normalize_page(page: u32) -> u32 {
    page.max(1)
}

/// Clamps a page size to 1..=200, with 0 meaning the default of 20.
pub fn normalize_limit(limit: u32) -> u32 {
    match limit {
        0 => PAGE_LIMIT_DEFAULT,
        value if value > PAGE_LIMIT_MAX => PAGE_LIMIT_MAX,
        value => value,
    }
}

/// Repository interface for word read operations.
pub trait WordRepository {
    /// Finds one word by case-insensitive exact lemma match.
    fn find_by_lemma(&self, lemma: &str) -> RepoResult<Option<WordRecord>>;
    /// Gets one word by stable id.
    fn get_by_id(&self, id: WordId) -> RepoResult<Option<WordRecord>>;
    /// Full listing ordered by creation time descending (legacy path).
    fn list_words(&self) -> RepoResult<Vec<WordRecord>>;
    /// Filtered, sorted, paginated listing.
    fn list_words_paged(&self, query: &WordListQuery) -> RepoResult<WordPage>;
    /// 1:1 etymology child for one word.
    fn etymology_for(&self, id: WordId) -> RepoResult<Option<EtymologyRecord>>;
    fn cognates_for(&self, id: WordId) -> RepoResult<Vec<CognateRecord>>;
    fn examples_for(&self, id: WordId) -> RepoResult<Vec<ExampleRecord>>;
    fn synonyms_for(&self, id: WordId) -> RepoResult<Vec<SynonymRecord>>;
}

/// SQLite-backed word repository over a migrated connection.
pub struct SqliteWordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WordRepository for SqliteWordRepository<'_> {
    fn find_by_lemma(&self, lemma: &str) -> RepoResult<Option<WordRecord>> {
        find_by_lemma(self.conn, lemma)
    }

    fn get_by_id(&self, id: WordId) -> RepoResult<Option<WordRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_word_row(row)?));
        }
        Ok(None)
    }

    fn list_words(&self) -> RepoResult<Vec<WordRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORD_SELECT_SQL} ORDER BY created_at DESC, id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut words = Vec::new();
        while let Some(row) = rows.next()? {
            words.push(parse_word_row(row)?);
        }
        Ok(words)
    }

    fn list_words_paged(&self, query: &WordListQuery) -> RepoResult<WordPage> {
        let page = normalize_page(query.page);
        let limit = normalize_limit(query.limit);
        let offset = (page - 1) * limit;

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| format!("%{}%", text.to_lowercase()));

        let mut where_sql = String::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(pattern) = search {
            where_sql.push_str(" WHERE lower(lemma) LIKE ?");
            bind_values.push(Value::Text(pattern));
        }

        let total: u32 = {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT COUNT(*) FROM words{where_sql};"))?;
            stmt.query_row(params_from_iter(bind_values.iter().cloned()), |row| {
                row.get(0)
            })?
        };
        let total_pages = (total.div_ceil(limit)).max(1);

        let order_by = match query.sort {
            WordSort::Newest => "created_at DESC, id DESC",
            WordSort::Oldest => "created_at ASC, id ASC",
            WordSort::Az => "lemma ASC",
            WordSort::Za => "lemma DESC",
        };

        let sql = format!("{WORD_SELECT_SQL}{where_sql} ORDER BY {order_by} LIMIT ? OFFSET ?;");
        bind_values.push(Value::Integer(i64::from(limit)));
        bind_values.push(Value::Integer(i64::from(offset)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_word_row(row)?);
        }

        Ok(WordPage {
            items,
            page,
            limit,
            total,
            total_pages,
        })
    }

    fn etymology_for(&self, id: WordId) -> RepoResult<Option<EtymologyRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT prefix, root, suffix, structure_analysis, history_myth, source_word,
                    pie_root, visual_imagery_zh, meaning_evolution_zh
             FROM etymologies
             WHERE word_id = ?1;",
        )?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(EtymologyRecord {
                prefix: row.get("prefix")?,
                root: row.get("root")?,
                suffix: row.get("suffix")?,
                structure_analysis: row.get("structure_analysis")?,
                history_myth: row.get("history_myth")?,
                source_word: row.get("source_word")?,
                pie_root: row.get("pie_root")?,
                visual_imagery_zh: row.get("visual_imagery_zh")?,
                meaning_evolution_zh: row.get("meaning_evolution_zh")?,
            }));
        }
        Ok(None)
    }

    fn cognates_for(&self, id: WordId) -> RepoResult<Vec<CognateRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT cognate_word, logic FROM cognates WHERE word_id = ?1 ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![id])?;
        let mut cognates = Vec::new();
        while let Some(row) = rows.next()? {
            cognates.push(CognateRecord {
                word: row.get("cognate_word")?,
                logic: row.get("logic")?,
            });
        }
        Ok(cognates)
    }

    fn examples_for(&self, id: WordId) -> RepoResult<Vec<ExampleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT example_type, sentence, translation_zh
             FROM examples
             WHERE word_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![id])?;
        let mut examples = Vec::new();
        while let Some(row) = rows.next()? {
            examples.push(ExampleRecord {
                example_type: row.get("example_type")?,
                sentence: row.get("sentence")?,
                translation_zh: row.get("translation_zh")?,
            });
        }
        Ok(examples)
    }

    fn synonyms_for(&self, id: WordId) -> RepoResult<Vec<SynonymRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT synonym_word, meaning_zh FROM synonyms WHERE word_id = ?1 ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![id])?;
        let mut synonyms = Vec::new();
        while let Some(row) = rows.next()? {
            synonyms.push(SynonymRecord {
                word: row.get("synonym_word")?,
                meaning_zh: row.get("meaning_zh")?,
            });
        }
        Ok(synonyms)
    }
}

/// Finds one word by case-insensitive exact lemma match.
///
/// Free function so orchestrator transactions can reuse it against their
/// transaction handle.
pub fn find_by_lemma(conn: &Connection, lemma: &str) -> RepoResult<Option<WordRecord>> {
    let mut stmt = conn.prepare(&format!("{WORD_SELECT_SQL} WHERE lower(lemma) = ?1;"))?;
    let mut rows = stmt.query(params![lemma.to_lowercase()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_word_row(row)?));
    }
    Ok(None)
}

/// Inserts the parent row for a validated document and returns its id.
///
/// A unique-index violation on lemma is translated to `DuplicateLemma` so
/// callers can resolve insert races as duplicates rather than failures.
pub fn insert_word(conn: &Connection, lemma: &str, document: &WordDocument) -> RepoResult<WordId> {
    let meanings = encode_meanings(&document.other_common_meanings())?;
    let inserted = conn.execute(
        "INSERT INTO words (
            lemma,
            syllabification,
            part_of_speech,
            contextual_meaning_en,
            contextual_meaning_zh,
            other_common_meanings,
            image_differentiation_zh,
            canonical_document
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            lemma,
            document.syllabification(),
            document.part_of_speech(),
            document.contextual_meaning_en(),
            document.contextual_meaning_zh(),
            meanings,
            document.image_differentiation_zh(),
            document.text(),
        ],
    );

    match inserted {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateLemma(lemma.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// Updates the parent row's denormalized fields and canonical document,
/// bumping `revision_count` by exactly one.
pub fn update_word(conn: &Connection, id: WordId, document: &WordDocument) -> RepoResult<()> {
    let meanings = encode_meanings(&document.other_common_meanings())?;
    let changed = conn.execute(
        "UPDATE words
         SET
            syllabification = ?1,
            part_of_speech = ?2,
            contextual_meaning_en = ?3,
            contextual_meaning_zh = ?4,
            other_common_meanings = ?5,
            image_differentiation_zh = ?6,
            canonical_document = ?7,
            revision_count = revision_count + 1,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?8;",
        params![
            document.syllabification(),
            document.part_of_speech(),
            document.contextual_meaning_en(),
            document.contextual_meaning_zh(),
            meanings,
            document.image_differentiation_zh(),
            document.text(),
            id,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

/// Atomically replaces the full child set for one word.
///
/// Children have no independent identity, so every content mutation deletes
/// and reinserts them rather than patching rows.
pub fn replace_children(conn: &Connection, id: WordId, document: &WordDocument) -> RepoResult<()> {
    conn.execute("DELETE FROM etymologies WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM cognates WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM examples WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM synonyms WHERE word_id = ?1;", params![id])?;

    let etymology = document.etymology();
    conn.execute(
        "INSERT INTO etymologies (
            word_id, prefix, root, suffix, structure_analysis,
            history_myth, source_word, pie_root,
            visual_imagery_zh, meaning_evolution_zh
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        params![
            id,
            etymology.prefix,
            etymology.root,
            etymology.suffix,
            etymology.structure_analysis,
            etymology.history_myth,
            etymology.source_word,
            etymology.pie_root,
            etymology.visual_imagery_zh,
            etymology.meaning_evolution_zh,
        ],
    )?;

    for cognate in document.cognates() {
        conn.execute(
            "INSERT INTO cognates (word_id, cognate_word, logic) VALUES (?1, ?2, ?3);",
            params![id, cognate.word, cognate.logic],
        )?;
    }
    for example in document.examples() {
        conn.execute(
            "INSERT INTO examples (word_id, example_type, sentence, translation_zh)
             VALUES (?1, ?2, ?3, ?4);",
            params![id, example.example_type, example.sentence, example.translation_zh],
        )?;
    }
    for synonym in document.synonyms() {
        conn.execute(
            "INSERT INTO synonyms (word_id, synonym_word, meaning_zh) VALUES (?1, ?2, ?3);",
            params![id, synonym.word, synonym.meaning_zh],
        )?;
    }

    Ok(())
}

/// Appends one raw-submission entry to the append-only request log.
pub fn append_user_request(
    conn: &Connection,
    id: WordId,
    user_input: &str,
    context_sentence: Option<&str>,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO user_requests (word_id, user_input, context_sentence)
         VALUES (?1, ?2, ?3);",
        params![id, user_input, context_sentence],
    )?;
    Ok(())
}

/// Removes one word with all child rows and log entries.
///
/// Explicit multi-table delete; the schema's `ON DELETE CASCADE` is only a
/// backstop for connections opened without `foreign_keys=ON`.
pub fn delete_word(conn: &Connection, id: WordId) -> RepoResult<()> {
    conn.execute("DELETE FROM etymologies WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM cognates WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM examples WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM synonyms WHERE word_id = ?1;", params![id])?;
    conn.execute("DELETE FROM user_requests WHERE word_id = ?1;", params![id])?;

    let changed = conn.execute("DELETE FROM words WHERE id = ?1;", params![id])?;
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

/// Counts request-log entries for one word.
pub fn count_user_requests(conn: &Connection, id: WordId) -> RepoResult<u32> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM user_requests WHERE word_id = ?1;",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn parse_word_row(row: &Row<'_>) -> RepoResult<WordRecord> {
    let meanings_text: String = row.get("other_common_meanings")?;
    let other_common_meanings: Vec<String> =
        serde_json::from_str(&meanings_text).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid other_common_meanings payload in words: {err}"
            ))
        })?;

    Ok(WordRecord {
        id: row.get("id")?,
        lemma: row.get("lemma")?,
        syllabification: row.get("syllabification")?,
        part_of_speech: row.get("part_of_speech")?,
        contextual_meaning_en: row.get("contextual_meaning_en")?,
        contextual_meaning_zh: row.get("contextual_meaning_zh")?,
        other_common_meanings,
        image_differentiation_zh: row.get("image_differentiation_zh")?,
        canonical_document: row.get("canonical_document")?,
        revision_count: row.get("revision_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn encode_meanings(meanings: &[String]) -> RepoResult<String> {
    serde_json::to_string(meanings)
        .map_err(|err| RepoError::InvalidData(format!("unencodable other_common_meanings: {err}")))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::{normalize_limit, normalize_page, parse_sort, WordSort};

    #[test]
    fn page_clamps_to_one() {
        assert_eq!(normalize_page(0), 1);
        assert_eq!(normalize_page(7), 7);
    }

    #[test]
    fn limit_clamps_to_contract_bounds() {
        assert_eq!(normalize_limit(0), 20);
        assert_eq!(normalize_limit(500), 200);
        assert_eq!(normalize_limit(35), 35);
    }

    #[test]
    fn sort_tokens_fold_case_and_default_to_newest() {
        assert_eq!(parse_sort("AZ"), WordSort::Az);
        assert_eq!(parse_sort(" oldest "), WordSort::Oldest);
        assert_eq!(parse_sort("ranked"), WordSort::Newest);
    }
}
