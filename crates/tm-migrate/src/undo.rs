//! Undo stack for a single forward run

use tm_core::MigrationDefinition;

/// How to revert one applied step: its version and down statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoFrame {
    pub version: i64,
    pub down_statements: Vec<String>,
}

/// LIFO of steps applied so far in the current run.
#[derive(Debug, Default)]
pub struct UndoStack {
    frames: Vec<UndoFrame>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame copied from `definition`
    pub fn push(&mut self, definition: &MigrationDefinition) {
        self.frames.push(UndoFrame {
            version: definition.version,
            down_statements: definition.down_statements.clone(),
        });
    }

    /// Pop the most recently pushed frame
    pub fn pop(&mut self) -> Option<UndoFrame> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
