//! N-Queens constraints as a single BDD.
//!
//! The board has one variable per cell, `cell_var(n, row, column)`, laid out
//! row-major. The rule is the conjunction of:
//!
//! - the **row rule**: every row holds at least one queen;
//! - the **field rule**: a queen on a cell excludes every other queen in its
//!   row, its column, its diagonal (`row - column` constant) and its
//!   anti-diagonal (`row + column` constant).
//!
//! Together they admit exactly the placements of `n` non-attacking queens.

use log::{debug, info};

use crate::bdd::Bdd;
use crate::error::{BddError, QueensError};
use crate::reference::Ref;
use crate::types::Var;

/// The variable of the cell `(row, column)` on an `n`×`n` board.
///
/// Cell `(row, column)` has index `row * n + column`, i.e. variable id
/// `row * n + column + 1`.
pub fn cell_var(n: usize, row: usize, column: usize) -> Var {
    assert!(row < n && column < n, "Cell is outside the board");
    Var::from_index(row * n + column)
}

/// Cells attacked by a queen on `(row, column)`, in no particular order.
pub fn peers(n: usize, row: usize, column: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();

    // Same row and same column
    cells.extend((0..n).filter(|&l| l != column).map(|l| (row, l)));
    cells.extend((0..n).filter(|&k| k != row).map(|k| (k, column)));

    for k in (0..n).filter(|&k| k != row) {
        // Diagonal: k - c = row - column  =>  c = column + k - row
        if let Some(c) = (column + k).checked_sub(row) {
            if c < n {
                cells.push((k, c));
            }
        }
        // Anti-diagonal: k + c = row + column  =>  c = row + column - k
        if let Some(c) = (row + column).checked_sub(k) {
            if c < n {
                cells.push((k, c));
            }
        }
    }

    cells
}

/// Every row holds at least one queen.
pub fn row_rule(bdd: &Bdd, n: usize) -> Result<Ref, BddError> {
    let mut rule = bdd.one;
    for row in 0..n {
        let clause = bdd.clause((0..n).map(|column| cell_var(n, row, column).pos()))?;
        rule = bdd.apply_and(rule, clause)?;
    }
    debug!("row rule of size {}", bdd.size(rule));
    Ok(rule)
}

/// A queen on a cell forces every attacked cell to be empty.
pub fn field_rule(bdd: &Bdd, n: usize) -> Result<Ref, BddError> {
    let rule = add_field_constraints(bdd, n, bdd.one, false)?;
    debug!("field rule of size {}", bdd.size(rule));
    Ok(rule)
}

fn add_field_constraints(
    bdd: &Bdd,
    n: usize,
    mut rule: Ref,
    reclaim: bool,
) -> Result<Ref, BddError> {
    for row in 0..n {
        for column in 0..n {
            let x = bdd.literal(cell_var(n, row, column), true)?;
            let free = bdd.cube(
                peers(n, row, column)
                    .into_iter()
                    .map(|(k, l)| cell_var(n, k, l).neg()),
            )?;
            let clause = bdd.apply_or(-x, free)?;
            rule = bdd.apply_and(rule, clause)?;

            if reclaim {
                let stats = bdd.stats();
                if stats.live_nodes > stats.capacity / 2 {
                    let freed = bdd.collect_garbage(&[rule]);
                    debug!("reclaimed {} nodes at ({}, {})", freed, row, column);
                }
            }
        }
    }
    Ok(rule)
}

/// Build the full N-Queens rule: the row rule and the field rule together.
///
/// The manager must already hold exactly `n * n` variables. When the node
/// table fills past half its capacity, nodes unreachable from the partial rule
/// are collected, so other diagrams in the same manager do not survive this call.
pub fn build_rules(bdd: &Bdd, n: usize) -> Result<Ref, QueensError> {
    if n == 0 {
        return Err(QueensError::InvalidSize(n));
    }
    let expected = n * n;
    let allocated = bdd.num_vars();
    if allocated != expected {
        return Err(QueensError::VariablesNotAllocated {
            expected,
            allocated,
        });
    }

    // Row constraints first keep the partial products small.
    let rows = row_rule(bdd, n)?;
    let rules = add_field_constraints(bdd, n, rows, true)?;
    info!(
        "Built rules for n = {}: size {}, {:?}",
        n,
        bdd.size(rules),
        bdd
    );
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use test_log::test;

    use super::*;

    fn sized(n: usize) -> Bdd {
        let bdd = Bdd::default();
        for _ in 0..n * n {
            bdd.new_var().unwrap();
        }
        bdd
    }

    #[test]
    fn test_cell_var_is_bijection() {
        let n = 5;
        let mut seen = std::collections::HashSet::new();
        for row in 0..n {
            for column in 0..n {
                let v = cell_var(n, row, column);
                assert_eq!(v.index(), row * n + column);
                assert!(seen.insert(v));
            }
        }
        assert_eq!(seen.len(), n * n);
    }

    #[test]
    fn test_peers_corner() {
        let mut cells = peers(4, 0, 0);
        cells.sort();
        assert_eq!(
            cells,
            vec![
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 0),
                (1, 1),
                (2, 0),
                (2, 2),
                (3, 0),
                (3, 3)
            ]
        );
    }

    #[test]
    fn test_peers_center() {
        let mut cells = peers(4, 1, 2);
        cells.sort();
        assert_eq!(
            cells,
            vec![
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 0),
                (1, 1),
                (1, 3),
                (2, 1),
                (2, 2),
                (2, 3),
                (3, 0),
                (3, 2)
            ]
        );
    }

    #[test]
    fn test_peers_are_symmetric() {
        let n = 6;
        for row in 0..n {
            for column in 0..n {
                for (k, l) in peers(n, row, column) {
                    assert_ne!((k, l), (row, column));
                    assert!(peers(n, k, l).contains(&(row, column)));
                }
            }
        }
    }

    #[test]
    fn test_rules_before_sizing() {
        let bdd = Bdd::default();
        bdd.new_var().unwrap();
        assert_eq!(
            build_rules(&bdd, 2),
            Err(QueensError::VariablesNotAllocated {
                expected: 4,
                allocated: 1
            })
        );
        assert_eq!(build_rules(&bdd, 0), Err(QueensError::InvalidSize(0)));
    }

    #[test]
    fn test_single_cell() {
        let bdd = sized(1);
        let rules = build_rules(&bdd, 1).unwrap();
        assert_eq!(rules, bdd.mk_var(Var::new(1)).unwrap());
    }

    #[test]
    fn test_row_rule_small() {
        let bdd = sized(2);
        let rows = row_rule(&bdd, 2).unwrap();
        // (x1 ∨ x2) ∧ (x3 ∨ x4): 3 * 3 assignments
        assert_eq!(bdd.sat_count(rows, 4), BigUint::from(9u32));
    }

    #[test]
    fn test_solution_counts() {
        for (n, count) in [(1u32, 1u32), (2, 0), (3, 0), (4, 2), (5, 10), (6, 4)] {
            let n = n as usize;
            let bdd = sized(n);
            let rules = build_rules(&bdd, n).unwrap();
            assert_eq!(bdd.sat_count(rules, n * n), BigUint::from(count), "n = {}", n);
        }
    }

    #[test]
    fn test_build_rules_matches_conjunction() {
        let bdd = sized(5);
        let rules = build_rules(&bdd, 5).unwrap();
        let rows = row_rule(&bdd, 5).unwrap();
        let fields = field_rule(&bdd, 5).unwrap();
        assert_eq!(rules, bdd.apply_and(rows, fields).unwrap());
    }

    #[test]
    fn test_build_rules_under_pressure() {
        // Tight table for the partial products.
        let bdd = Bdd::new(14);
        for _ in 0..36 {
            bdd.new_var().unwrap();
        }
        let rules = build_rules(&bdd, 6).unwrap();
        assert_eq!(bdd.sat_count(rules, 36), BigUint::from(4u32));
    }

    #[test]
    fn test_eight_queens_count() {
        let bdd = sized(8);
        let rules = build_rules(&bdd, 8).unwrap();
        assert_eq!(bdd.sat_count(rules, 64), BigUint::from(92u32));
    }
}
