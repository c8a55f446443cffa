//! In-memory ledger for exercising runs with injected failures

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use tm_db::{DbError, DbResult, VersionReader, VersionRecord, VersionWriter, NO_VERSION};

/// One call made against a [`ScriptedLedger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Apply(Vec<String>),
    Add(i64),
    Remove(i64),
}

/// Ledger kept in memory that records every call and fails on demand.
#[derive(Debug, Default)]
pub struct ScriptedLedger {
    records: RefCell<Vec<VersionRecord>>,
    calls: RefCell<Vec<LedgerCall>>,
    fail_apply_on: Vec<Vec<String>>,
    fail_add_on: Vec<i64>,
    fail_remove_on: Vec<i64>,
    fail_reads: bool,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any `apply_changes` call whose statements equal `statements`
    pub fn fail_apply_on(mut self, statements: &[&str]) -> Self {
        self.fail_apply_on
            .push(statements.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Fail `add_version` for `version`
    pub fn fail_add_on(mut self, version: i64) -> Self {
        self.fail_add_on.push(version);
        self
    }

    /// Fail `remove_version` for `version`
    pub fn fail_remove_on(mut self, version: i64) -> Self {
        self.fail_remove_on.push(version);
        self
    }

    /// Fail every version read
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Seed a record without logging a call
    pub fn with_record(self, version: i64, applied_on: DateTime<Utc>) -> Self {
        self.records.borrow_mut().push(VersionRecord {
            version_id: version,
            applied_on,
            description: format!("v{version}"),
        });
        self
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.borrow().clone()
    }

    /// Statements passed to `apply_changes`, one entry per call
    pub fn applied_batches(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                LedgerCall::Apply(statements) => Some(statements.clone()),
                _ => None,
            })
            .collect()
    }

    /// Versions passed to `remove_version`, in call order
    pub fn removed(&self) -> Vec<i64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                LedgerCall::Remove(version) => Some(*version),
                _ => None,
            })
            .collect()
    }

    /// Whether any call wrote to the schema or ledger
    pub fn has_writes(&self) -> bool {
        !self.calls.borrow().is_empty()
    }

    /// Records currently held, most recent first
    pub fn records(&self) -> Vec<VersionRecord> {
        let mut records = self.records.borrow().clone();
        // Stable sort keeps insertion order among equal timestamps
        records.sort_by(|a, b| b.applied_on.cmp(&a.applied_on));
        records
    }

    fn recent(&self) -> DbResult<Vec<i64>> {
        if self.fail_reads {
            return Err(DbError::QueryError("scripted read failure".to_string()));
        }
        Ok(self.records().iter().map(|r| r.version_id).collect())
    }
}

impl VersionReader for ScriptedLedger {
    fn current_version(&self) -> DbResult<i64> {
        Ok(self.recent()?.first().copied().unwrap_or(NO_VERSION))
    }

    fn previous_version(&self) -> DbResult<(i64, i64)> {
        let recent = self.recent()?;
        Ok((
            recent.first().copied().unwrap_or(NO_VERSION),
            recent.get(1).copied().unwrap_or(NO_VERSION),
        ))
    }

    fn latest_applied_on(&self) -> DbResult<Option<DateTime<Utc>>> {
        if self.fail_reads {
            return Err(DbError::QueryError("scripted read failure".to_string()));
        }
        Ok(self.records().first().map(|r| r.applied_on))
    }
}

impl VersionWriter for ScriptedLedger {
    fn apply_changes(&self, statements: &[String]) -> DbResult<()> {
        self.calls
            .borrow_mut()
            .push(LedgerCall::Apply(statements.to_vec()));
        if self.fail_apply_on.iter().any(|s| s.as_slice() == statements) {
            return Err(DbError::ExecutionError(format!(
                "scripted failure: {}",
                statements.join("; ")
            )));
        }
        Ok(())
    }

    fn add_version(
        &self,
        version: i64,
        description: &str,
        applied_on: DateTime<Utc>,
    ) -> DbResult<()> {
        self.calls.borrow_mut().push(LedgerCall::Add(version));
        if self.fail_add_on.contains(&version) {
            return Err(DbError::WriteError(format!(
                "scripted failure adding {version}"
            )));
        }
        self.records.borrow_mut().push(VersionRecord {
            version_id: version,
            applied_on,
            description: description.to_string(),
        });
        Ok(())
    }

    fn remove_version(&self, version: i64) -> DbResult<()> {
        self.calls.borrow_mut().push(LedgerCall::Remove(version));
        if self.fail_remove_on.contains(&version) {
            return Err(DbError::WriteError(format!(
                "scripted failure removing {version}"
            )));
        }
        self.records
            .borrow_mut()
            .retain(|record| record.version_id != version);
        Ok(())
    }
}
