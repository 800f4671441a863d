//! Block use-case service.
//!
//! # Responsibility
//! - Provide get/update/create/page/delete entry points for callers that
//!   already parsed and authorized their input.
//! - Delegate persistence to an injected `BlockRepository`.
//!
//! # Invariants
//! - A missing block is reported as `NotFound`, never as an empty record.
//! - Pagination input is validated before the repository is called.
//! - Field limits are left to the repository write paths.
//! - Store failures surface on every operation.

use crate::model::block::{Block, BlockChanges, BlockId, BlockValidationError, NewBlock};
use crate::repo::block_repo::{
    BlockPage, BlockPageQuery, BlockRepository, PaginationError, RepoError,
};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, BlockServiceError>;

/// Service error for block use-cases.
#[derive(Debug)]
pub enum BlockServiceError {
    /// No block exists with the requested id.
    NotFound(BlockId),
    /// Field limits were exceeded.
    Validation(BlockValidationError),
    /// Page number or page size is out of range.
    InvalidPagination(PaginationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl BlockServiceError {
    /// Stable machine-readable error kind used in result envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::InvalidPagination(_) => "invalid_pagination",
            Self::Repo(_) => "storage",
        }
    }
}

impl Display for BlockServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "block not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidPagination(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlockServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::InvalidPagination(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BlockServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Pagination(err) => Self::InvalidPagination(err),
            other => Self::Repo(other),
        }
    }
}

impl From<BlockValidationError> for BlockServiceError {
    fn from(value: BlockValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PaginationError> for BlockServiceError {
    fn from(value: PaginationError) -> Self {
        Self::InvalidPagination(value)
    }
}

/// Block service facade over a repository implementation.
pub struct BlockService<R: BlockRepository> {
    repo: R,
}

impl<R: BlockRepository> BlockService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Fetches one block by id.
    pub fn get(&self, id: BlockId) -> ServiceResult<Block> {
        let started_at = Instant::now();
        let result = self
            .repo
            .get_block(id)
            .map_err(BlockServiceError::from)
            .and_then(|found| found.ok_or(BlockServiceError::NotFound(id)));
        log_outcome("block_get", started_at, &result);
        result
    }

    /// Rewrites `title`/`content` of the addressed block.
    ///
    /// Field limits are enforced by the repository and reported as
    /// `Validation`.
    ///
    /// Returns the number of rows changed. An unknown id changes nothing and
    /// still succeeds with `0`.
    pub fn update(&self, changes: &BlockChanges) -> ServiceResult<usize> {
        let started_at = Instant::now();
        let result = self
            .repo
            .update_block(changes)
            .map_err(BlockServiceError::from);
        log_outcome("block_update", started_at, &result);
        result
    }

    /// Inserts a block and returns its store-assigned id.
    pub fn create(&self, block: &NewBlock) -> ServiceResult<BlockId> {
        let started_at = Instant::now();
        let result = self
            .repo
            .create_block(block)
            .map_err(BlockServiceError::from);
        log_outcome("block_create", started_at, &result);
        result
    }

    /// Searches titles containing `keyword` and returns one page of
    /// `(id, title)` rows plus the total match count.
    ///
    /// `page` is one-based; `page_size` must be at least 1.
    pub fn page(
        &self,
        keyword: impl Into<String>,
        page: i64,
        page_size: i64,
    ) -> ServiceResult<BlockPage> {
        let started_at = Instant::now();
        let query = BlockPageQuery::new(keyword, page, page_size);
        let result = query
            .limit_offset()
            .map_err(BlockServiceError::from)
            .and_then(|_| self.repo.page_blocks(&query).map_err(BlockServiceError::from));
        log_outcome("block_page", started_at, &result);
        result
    }

    /// Deletes every block whose id is in `ids`.
    ///
    /// Absent ids are ignored, so repeating a delete is harmless. An empty
    /// set deletes nothing.
    pub fn delete(&self, ids: &[BlockId]) -> ServiceResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.delete_blocks(ids).map_err(BlockServiceError::from);
        log_outcome("block_delete", started_at, &result);
        result
    }
}

fn log_outcome<T>(event: &str, started_at: Instant, result: &ServiceResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => debug!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err) => warn!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={err}",
            err.kind()
        ),
    }
}
