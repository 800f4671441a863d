//! Core of the admin-panel block module.
//! Owns the `pz_block` schema, its repository and the caller-facing service.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LoggingError,
};
pub use model::block::{
    Block, BlockChanges, BlockId, BlockSummary, BlockValidationError, NewBlock,
    CONTENT_MAX_CHARS, TITLE_MAX_CHARS,
};
pub use repo::block_repo::{
    BlockPage, BlockPageQuery, BlockRepository, PaginationError, RepoError, RepoResult,
    SqliteBlockRepository,
};
pub use service::block_service::{BlockService, BlockServiceError, ServiceResult};
pub use service::envelope::{ApiEnvelope, EnvelopePayload, ErrorBody};

/// Minimal health-check API for controller wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
