//! Error types of the BDD engine and the queens game.

use std::fmt;

/// Errors raised by the [`Bdd`][crate::bdd::Bdd] manager.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BddError {
    /// The node table has no free slot left.
    StorageFull { capacity: usize },
    /// The variable id space is exhausted.
    TooManyVariables,
    /// A literal was requested for a variable that was never allocated.
    UnknownVariable(u32),
}

impl fmt::Display for BddError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BddError::StorageFull { capacity } => {
                write!(f, "node table is full (capacity {})", capacity)
            }
            BddError::TooManyVariables => write!(f, "too many variables"),
            BddError::UnknownVariable(v) => write!(f, "variable x{} is not allocated", v),
        }
    }
}

impl std::error::Error for BddError {}

/// Errors raised by the rule builder and the game evaluator.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum QueensError {
    /// Board size must be at least 1.
    InvalidSize(usize),
    /// A placement or read-back was attempted before `initialize_game`.
    NotInitialized,
    /// The cell lies outside the board.
    OutOfBounds {
        row: usize,
        column: usize,
        size: usize,
    },
    /// Rules were requested before the manager held one variable per cell.
    VariablesNotAllocated { expected: usize, allocated: usize },
    /// The underlying BDD engine failed.
    Bdd(BddError),
}

impl From<BddError> for QueensError {
    fn from(e: BddError) -> Self {
        QueensError::Bdd(e)
    }
}

impl fmt::Display for QueensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueensError::InvalidSize(n) => write!(f, "invalid board size {}", n),
            QueensError::NotInitialized => write!(f, "game is not initialized"),
            QueensError::OutOfBounds { row, column, size } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} board",
                row, column, size, size
            ),
            QueensError::VariablesNotAllocated {
                expected,
                allocated,
            } => write!(
                f,
                "expected {} variables before building rules, found {}",
                expected, allocated
            ),
            QueensError::Bdd(e) => write!(f, "BDD error: {}", e),
        }
    }
}

impl std::error::Error for QueensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueensError::Bdd(e) => Some(e),
            _ => None,
        }
    }
}
