//! tm-migrate - Migration orchestration for Tidemark
//!
//! Computes which definitions are pending against a version ledger, applies
//! them in ascending order, and unwinds the whole run when a step fails.

pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod undo;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{MigrateError, MigrateResult};
pub use orchestrator::{
    migrate_down, migrate_up, migrate_up_at, status, MigrationStatus, TIMESTAMP_STEP_SECS,
};
pub use plan::{pending_set, revert_step, RevertStep};
pub use undo::{UndoFrame, UndoStack};
