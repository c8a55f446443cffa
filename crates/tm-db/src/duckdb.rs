//! DuckDB version ledger implementation

use crate::error::{DbError, DbResult};
use crate::traits::{VersionReader, VersionRecord, VersionWriter, NO_VERSION};
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::Connection;
use std::path::Path;
use tm_core::config::DEFAULT_LEDGER_TABLE;
use tm_core::sql_utils::{is_valid_qualified_name, quote_ident, quote_qualified, split_qualified_name};

/// Timestamp text format bound into `CAST(? AS TIMESTAMP)`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format used to read `CAST(applied_on AS VARCHAR)` back
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Version ledger stored in a DuckDB table.
///
/// The same connection executes migration statements and ledger writes.
/// Single-threaded: runs issue calls strictly one after another.
pub struct DuckDbLedger {
    conn: Connection,
    table: String,
}

impl DuckDbLedger {
    /// Create a new in-memory DuckDB ledger
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            table: DEFAULT_LEDGER_TABLE.to_string(),
        })
    }

    /// Create a new DuckDB ledger from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn,
            table: DEFAULT_LEDGER_TABLE.to_string(),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Use `table` (optionally schema-qualified) as the ledger table
    pub fn with_table(mut self, table: &str) -> DbResult<Self> {
        if !is_valid_qualified_name(table) {
            return Err(DbError::Internal(format!(
                "invalid ledger table name '{table}'"
            )));
        }
        self.table = table.to_string();
        Ok(self)
    }

    /// Ledger table name as configured
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create the ledger table (and its schema) if missing.
    pub fn ensure_table(&self) -> DbResult<()> {
        if self.table.contains('.') {
            let (schema, _) = split_qualified_name(&self.table);
            self.conn
                .execute_batch(&format!(
                    "CREATE SCHEMA IF NOT EXISTS {}",
                    quote_ident(schema)
                ))
                .map_err(|e| {
                    DbError::ExecutionError(format!("failed to create ledger schema: {e}"))
                })?;
        }

        self.conn
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                     version_id  BIGINT NOT NULL,
                     applied_on  TIMESTAMP NOT NULL,
                     description VARCHAR NOT NULL DEFAULT '',
                     PRIMARY KEY (version_id, applied_on)
                 )",
                self.quoted_table()
            ))
            .map_err(|e| DbError::ExecutionError(format!("failed to create ledger table: {e}")))?;
        log::debug!("Ledger table {} ready", self.table);
        Ok(())
    }

    /// All records, most recently applied first
    pub fn records(&self) -> DbResult<Vec<VersionRecord>> {
        let sql = format!(
            "SELECT version_id, CAST(applied_on AS VARCHAR), description
             FROM {} ORDER BY applied_on DESC",
            self.quoted_table()
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| DbError::QueryError(format!("prepare records: {e}")))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(|e| DbError::QueryError(format!("query records: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(format!("collect records: {e}")))?;

        rows.into_iter()
            .map(|(version_id, applied_on, description)| {
                Ok(VersionRecord {
                    version_id,
                    applied_on: parse_timestamp(&applied_on)?,
                    description,
                })
            })
            .collect()
    }

    /// The `limit` most recently applied version ids, newest first
    fn recent_versions(&self, limit: usize) -> DbResult<Vec<i64>> {
        let sql = format!(
            "SELECT version_id FROM {} ORDER BY applied_on DESC LIMIT {}",
            self.quoted_table(),
            limit
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| DbError::QueryError(format!("prepare recent versions: {e}")))?;
        let versions = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| DbError::QueryError(format!("query recent versions: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(format!("collect recent versions: {e}")))?;
        Ok(versions)
    }

    fn quoted_table(&self) -> String {
        quote_qualified(&self.table)
    }
}

fn parse_timestamp(text: &str) -> DbResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DbError::QueryError(format!("invalid applied_on '{text}': {e}")))
}

impl VersionReader for DuckDbLedger {
    fn current_version(&self) -> DbResult<i64> {
        let versions = self.recent_versions(1)?;
        Ok(versions.first().copied().unwrap_or(NO_VERSION))
    }

    fn previous_version(&self) -> DbResult<(i64, i64)> {
        let versions = self.recent_versions(2)?;
        let current = versions.first().copied().unwrap_or(NO_VERSION);
        let previous = versions.get(1).copied().unwrap_or(NO_VERSION);
        Ok((current, previous))
    }

    fn latest_applied_on(&self) -> DbResult<Option<DateTime<Utc>>> {
        let sql = format!(
            "SELECT CAST(MAX(applied_on) AS VARCHAR) FROM {}",
            self.quoted_table()
        );
        let latest: Option<String> = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| DbError::QueryError(format!("query latest applied_on: {e}")))?;
        latest.as_deref().map(parse_timestamp).transpose()
    }
}

impl VersionWriter for DuckDbLedger {
    fn apply_changes(&self, statements: &[String]) -> DbResult<()> {
        for statement in statements {
            log::debug!("Executing: {}", statement);
            self.conn
                .execute_batch(statement)
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, statement)))?;
        }
        Ok(())
    }

    fn add_version(
        &self,
        version: i64,
        description: &str,
        applied_on: DateTime<Utc>,
    ) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {} (version_id, applied_on, description) VALUES (?, CAST(? AS TIMESTAMP), ?)",
            self.quoted_table()
        );
        let applied_on = applied_on.format(TIMESTAMP_FORMAT).to_string();
        self.conn
            .execute(&sql, duckdb::params![version, applied_on, description])
            .map_err(|e| DbError::WriteError(format!("add version {version}: {e}")))?;
        Ok(())
    }

    fn remove_version(&self, version: i64) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE version_id = ?", self.quoted_table());
        self.conn
            .execute(&sql, duckdb::params![version])
            .map_err(|e| DbError::WriteError(format!("remove version {version}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
