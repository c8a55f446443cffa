//! Pending-set and revert-step computation

use tm_core::MigrationDefinition;
use tm_db::NO_VERSION;

/// Definitions still to apply on top of `current`.
///
/// `definitions` must be sorted ascending by version. When `current` matches
/// the definition at index `i`, everything after `i` is pending (nothing if
/// `i` is last). When the ledger is empty or `current` matches no definition,
/// every definition is pending.
pub fn pending_set(current: i64, definitions: &[MigrationDefinition]) -> &[MigrationDefinition] {
    if current == NO_VERSION {
        return definitions;
    }
    match definitions.iter().position(|def| def.version == current) {
        Some(index) => &definitions[index + 1..],
        None => definitions,
    }
}

/// The single step that reverts the current version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertStep {
    /// Version being reverted
    pub version: i64,

    /// Down statements of the matching definition
    pub down_statements: Vec<String>,

    /// False when no definition matches the ledger's current version
    pub definition_found: bool,
}

/// Build the step reverting `current`, or `None` when the ledger is empty.
///
/// A version with no matching definition yields a step with no statements:
/// only its ledger record will be removed.
pub fn revert_step(current: i64, definitions: &[MigrationDefinition]) -> Option<RevertStep> {
    if current == NO_VERSION {
        return None;
    }
    let step = match definitions.iter().find(|def| def.version == current) {
        Some(def) => RevertStep {
            version: current,
            down_statements: def.down_statements.clone(),
            definition_found: true,
        },
        None => RevertStep {
            version: current,
            down_statements: Vec::new(),
            definition_found: false,
        },
    };
    Some(step)
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
