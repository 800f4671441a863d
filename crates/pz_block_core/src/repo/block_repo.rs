//! Block repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide get/update/create/page/delete over the `pz_block` table.
//! - Translate one-based pagination input into `LIMIT`/`OFFSET` values.
//!
//! # Invariants
//! - `update_block` touches `title`/`content` only, never `id`.
//! - `page_blocks` counts matches before applying pagination.
//! - `delete_blocks` with an empty id set never reaches the store.
//! - `delete_blocks` is all-or-nothing even when split into batches.

use crate::db::{ensure_block_schema, DbError};
use crate::model::block::{
    Block, BlockChanges, BlockId, BlockSummary, BlockValidationError, NewBlock,
};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LIKE_ESCAPE: char = '\\';

/// Ids bound per `DELETE ... IN (...)` statement. Bundled SQLite caps bound
/// variables at 32766 per statement.
const DELETE_BATCH_SIZE: usize = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Rejected pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    /// Page numbers start at 1.
    PageOutOfRange(i64),
    /// Page size must be positive.
    NonPositivePageSize(i64),
    /// `(page - 1) * page_size` does not fit in an offset.
    OffsetOverflow { page: i64, page_size: i64 },
}

impl Display for PaginationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageOutOfRange(page) => write!(f, "page must be >= 1, got {page}"),
            Self::NonPositivePageSize(page_size) => {
                write!(f, "page size must be >= 1, got {page_size}")
            }
            Self::OffsetOverflow { page, page_size } => {
                write!(f, "page {page} with page size {page_size} overflows offset")
            }
        }
    }
}

impl Error for PaginationError {}

/// Repository error for block persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BlockValidationError),
    Pagination(PaginationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Pagination(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted block data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Pagination(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<BlockValidationError> for RepoError {
    fn from(value: BlockValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PaginationError> for RepoError {
    fn from(value: PaginationError) -> Self {
        Self::Pagination(value)
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

/// Title search with one-based pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPageQuery {
    /// Substring matched against `title`. Empty matches every row.
    pub keyword: String,
    /// One-based page number.
    pub page: i64,
    /// Rows per page.
    pub page_size: i64,
}

impl BlockPageQuery {
    pub fn new(keyword: impl Into<String>, page: i64, page_size: i64) -> Self {
        Self {
            keyword: keyword.into(),
            page,
            page_size,
        }
    }

    /// Resolves `(limit, offset)`, rejecting pages or sizes below 1.
    pub fn limit_offset(&self) -> Result<(i64, i64), PaginationError> {
        if self.page < 1 {
            return Err(PaginationError::PageOutOfRange(self.page));
        }
        if self.page_size < 1 {
            return Err(PaginationError::NonPositivePageSize(self.page_size));
        }
        let offset = (self.page - 1).checked_mul(self.page_size).ok_or(
            PaginationError::OffsetOverflow {
                page: self.page,
                page_size: self.page_size,
            },
        )?;
        Ok((self.page_size, offset))
    }
}

/// One page of title search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPage {
    pub items: Vec<BlockSummary>,
    /// Total matching rows, independent of pagination.
    pub total: u64,
}

/// Repository interface for block CRUD operations.
pub trait BlockRepository {
    fn get_block(&self, id: BlockId) -> RepoResult<Option<Block>>;
    /// Returns the number of rows changed; zero when `id` does not exist.
    fn update_block(&self, changes: &BlockChanges) -> RepoResult<usize>;
    fn create_block(&self, block: &NewBlock) -> RepoResult<BlockId>;
    fn page_blocks(&self, query: &BlockPageQuery) -> RepoResult<BlockPage>;
    /// Returns the number of rows removed.
    fn delete_blocks(&self, ids: &[BlockId]) -> RepoResult<usize>;
}

/// SQLite-backed block repository over an injected connection.
pub struct SqliteBlockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlockRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps any connection after checking the `pz_block` table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_block_schema(conn)?;
        Ok(Self { conn })
    }
}

impl BlockRepository for SqliteBlockRepository<'_> {
    fn get_block(&self, id: BlockId) -> RepoResult<Option<Block>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, content FROM pz_block WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_block_row(row)?));
        }
        Ok(None)
    }

    fn update_block(&self, changes: &BlockChanges) -> RepoResult<usize> {
        changes.validate()?;

        let changed = self.conn.execute(
            "UPDATE pz_block
             SET
                title = COALESCE(?1, title),
                content = COALESCE(?2, content)
             WHERE id = ?3;",
            params![
                changes.title.as_deref(),
                changes.content.as_deref(),
                changes.id
            ],
        )?;
        Ok(changed)
    }

    fn create_block(&self, block: &NewBlock) -> RepoResult<BlockId> {
        block.validate()?;

        self.conn.execute(
            "INSERT INTO pz_block (title, content) VALUES (?1, ?2);",
            params![block.title.as_str(), block.content.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn page_blocks(&self, query: &BlockPageQuery) -> RepoResult<BlockPage> {
        let (limit, offset) = query.limit_offset()?;
        let pattern = like_contains_pattern(&query.keyword);

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pz_block WHERE title LIKE ?1 ESCAPE '\\';",
            [pattern.as_str()],
            |row| row.get(0),
        )?;
        let total = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))?;

        let mut stmt = self.conn.prepare(
            "SELECT id, title
             FROM pz_block
             WHERE title LIKE ?1 ESCAPE '\\'
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3;",
        )?;
        let mut rows = stmt.query(params![pattern.as_str(), limit, offset])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(BlockSummary {
                id: row.get("id")?,
                title: row.get("title")?,
            });
        }

        Ok(BlockPage { items, total })
    }

    fn delete_blocks(&self, ids: &[BlockId]) -> RepoResult<usize> {
        let unique: BTreeSet<BlockId> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(0);
        }

        let ids: Vec<BlockId> = unique.into_iter().collect();
        let tx = self.conn.unchecked_transaction()?;
        let mut deleted = 0;
        for batch in ids.chunks(DELETE_BATCH_SIZE) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            deleted += tx.execute(
                &format!("DELETE FROM pz_block WHERE id IN ({placeholders});"),
                params_from_iter(batch.iter()),
            )?;
        }
        tx.commit()?;
        Ok(deleted)
    }
}

fn parse_block_row(row: &Row<'_>) -> RepoResult<Block> {
    let block = Block {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
    };
    block.validate().map_err(|err| {
        RepoError::InvalidData(format!("pz_block row {} violates limits: {err}", block.id))
    })?;
    Ok(block)
}

/// Builds a `LIKE` pattern matching `keyword` literally anywhere in the value.
fn like_contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::{like_contains_pattern, BlockPageQuery, PaginationError};

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(like_contains_pattern(""), "%%");
    }

    #[test]
    fn limit_offset_uses_one_based_pages() {
        assert_eq!(BlockPageQuery::new("", 1, 10).limit_offset(), Ok((10, 0)));
        assert_eq!(BlockPageQuery::new("", 3, 10).limit_offset(), Ok((10, 20)));
    }

    #[test]
    fn limit_offset_rejects_non_positive_input() {
        assert_eq!(
            BlockPageQuery::new("", 0, 10).limit_offset(),
            Err(PaginationError::PageOutOfRange(0))
        );
        assert_eq!(
            BlockPageQuery::new("", -2, 10).limit_offset(),
            Err(PaginationError::PageOutOfRange(-2))
        );
        assert_eq!(
            BlockPageQuery::new("", 1, 0).limit_offset(),
            Err(PaginationError::NonPositivePageSize(0))
        );
    }

    #[test]
    fn limit_offset_accepts_large_sizes_but_rejects_overflow() {
        assert_eq!(
            BlockPageQuery::new("", 1, 150).limit_offset(),
            Ok((150, 0))
        );
        assert_eq!(
            BlockPageQuery::new("", 2, 10_000).limit_offset(),
            Ok((10_000, 10_000))
        );
        assert!(matches!(
            BlockPageQuery::new("", i64::MAX, 100).limit_offset(),
            Err(PaginationError::OffsetOverflow { .. })
        ));
    }
}
