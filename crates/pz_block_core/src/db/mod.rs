//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing the block store.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Block data must not be read or written before migrations succeed.
//! - A connection is usable only when `pz_block` carries every column the
//!   repository reads (`id`, `title`, `content`).

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_block_schema, BLOCK_COLUMNS, BLOCK_TABLE};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The block table is absent, e.g. the database belongs to another app.
    MissingBlockTable,
    /// `pz_block` exists with a foreign shape (left by an older deployment).
    MissingBlockColumn(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "block store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingBlockTable => write!(f, "block store has no `{BLOCK_TABLE}` table"),
            Self::MissingBlockColumn(column) => {
                write!(f, "`{BLOCK_TABLE}` table is missing column `{column}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::MissingBlockTable
            | Self::MissingBlockColumn(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
