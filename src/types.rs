//! Type-safe wrapper for BDD variables.
use std::fmt;

/// A variable identifier (1-indexed).
///
/// Variables are ordered by their id: smaller ids are closer to the root.
///
/// # Invariants
///
/// - Variable IDs must be >= 1 (0 is reserved for terminals)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Creates the variable for a 0-based index, i.e. `Var::new(index + 1)`.
    ///
    /// # Panics
    ///
    /// Panics if `index + 1` does not fit into `u32`.
    pub fn from_index(index: usize) -> Self {
        let id = u32::try_from(index + 1).expect("Variable index does not fit into u32");
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based index of the variable.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Positive DIMACS-style literal of this variable.
    pub fn pos(self) -> i32 {
        self.0 as i32
    }

    /// Negative DIMACS-style literal of this variable.
    pub fn neg(self) -> i32 {
        -(self.0 as i32)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}
