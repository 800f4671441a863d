//! Shape check for the `pz_block` table.

use super::{DbError, DbResult};
use rusqlite::Connection;

pub const BLOCK_TABLE: &str = "pz_block";
pub const BLOCK_COLUMNS: [&str; 3] = ["id", "title", "content"];

/// Verifies that `pz_block` exists and has every column the repository uses.
///
/// Migrations use `CREATE TABLE IF NOT EXISTS`, so a same-named table from an
/// older deployment would otherwise pass bootstrap silently.
pub fn ensure_block_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({BLOCK_TABLE});"))?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }

    if present.is_empty() {
        return Err(DbError::MissingBlockTable);
    }
    for column in BLOCK_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(DbError::MissingBlockColumn(column));
        }
    }
    Ok(())
}
