//! Node table with hash-consing.
//!
//! Nodes live in a flat arena indexed by `u32`. Index `0` is a sentinel and
//! index `1` is the terminal node. Uniqueness of `(variable, low, high)`
//! triples is maintained by one [`Subtable`] per variable.

use std::collections::HashSet;

use log::debug;

use crate::error::BddError;
use crate::node::Node;
use crate::subtable::Subtable;

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    occupied: bool,
}

pub struct Table {
    data: Vec<Entry>,
    subtables: Vec<Subtable>,
    capacity: usize,
    /// Index of the first *possibly* free (non-occupied) cell.
    min_free: usize,
    /// Number of occupied cells, the terminal included.
    real_size: usize,
}

impl Table {
    /// Create a new table able to hold `2^bits` cells (sentinel included).
    pub fn new(bits: usize) -> Self {
        assert!(
            (1..=31).contains(&bits),
            "Storage bits should be in the range 1..=31"
        );

        let capacity = 1 << bits;
        let sentinel = Entry {
            node: Node::terminal(),
            occupied: true,
        };
        let terminal = Entry {
            node: Node::terminal(),
            occupied: true,
        };

        Self {
            data: vec![sentinel, terminal],
            subtables: Vec::new(),
            capacity,
            min_free: 2,
            real_size: 1,
        }
    }

    /// Maximum number of cells, the sentinel included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Index one past the last cell ever used.
    pub fn size(&self) -> usize {
        self.data.len()
    }
    /// Number of live nodes, the terminal included.
    pub fn real_size(&self) -> usize {
        self.real_size
    }

    pub fn num_vars(&self) -> usize {
        self.subtables.len()
    }

    /// Register the next variable, returning its id.
    pub fn add_variable(&mut self) -> Result<u32, BddError> {
        let id = u32::try_from(self.subtables.len() + 1).map_err(|_| BddError::TooManyVariables)?;
        if id >= i32::MAX as u32 {
            return Err(BddError::TooManyVariables);
        }
        self.subtables.push(Subtable::new(id));
        Ok(id)
    }

    #[cfg(test)]
    fn is_occupied(&self, index: u32) -> bool {
        self.data
            .get(index as usize)
            .map_or(false, |entry| entry.occupied)
    }

    pub fn node(&self, index: u32) -> Node {
        let entry = &self.data[index as usize];
        assert!(entry.occupied, "Index {} is not occupied", index);
        entry.node
    }

    pub fn subtable(&self, variable: u32) -> &Subtable {
        &self.subtables[variable as usize - 1]
    }

    fn alloc(&mut self) -> Result<usize, BddError> {
        let index = match (self.min_free..self.data.len()).find(|&i| !self.data[i].occupied) {
            Some(i) => i,
            None => {
                if self.data.len() >= self.capacity {
                    return Err(BddError::StorageFull {
                        capacity: self.capacity,
                    });
                }
                self.data.push(Entry {
                    node: Node::terminal(),
                    occupied: false,
                });
                self.data.len() - 1
            }
        };

        self.data[index].occupied = true;
        self.min_free = index + 1;
        self.real_size += 1;

        Ok(index)
    }

    /// Return the index of the node `(variable, low, high)`, creating it if needed.
    pub fn put(&mut self, node: Node) -> Result<u32, BddError> {
        assert_ne!(node.variable, 0, "Variable index should not be zero");
        assert!(
            (node.variable as usize) <= self.subtables.len(),
            "Variable x{} is not registered",
            node.variable
        );

        if let Some(index) = self.subtable(node.variable).find(node.low, node.high) {
            return Ok(index);
        }

        let index = self.alloc()?;
        self.data[index].node = node;
        let index = index as u32;
        self.subtables[node.variable as usize - 1].insert(node.low, node.high, index);
        Ok(index)
    }

    /// Drop every node whose index is not in `alive`. Returns the number of dropped nodes.
    pub fn sweep(&mut self, alive: &HashSet<u32>) -> usize {
        let mut dropped = 0;
        for index in 2..self.data.len() {
            let entry = &mut self.data[index];
            if entry.occupied && !alive.contains(&(index as u32)) {
                entry.occupied = false;
                let node = entry.node;
                self.subtables[node.variable as usize - 1].remove(node.low, node.high);
                self.min_free = self.min_free.min(index);
                self.real_size -= 1;
                dropped += 1;
            }
        }
        debug!("sweep: dropped {} nodes, {} alive", dropped, self.real_size);
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Ref;

    fn node(variable: u32, low: Ref, high: Ref) -> Node {
        Node {
            variable,
            low,
            high,
        }
    }

    #[test]
    fn test_terminal_preallocated() {
        let table = Table::new(4);
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.real_size(), 1);
        assert!(table.is_occupied(1));
        assert!(table.node(1).is_terminal());
    }

    #[test]
    fn test_put_shares_nodes() {
        let mut table = Table::new(4);
        let x = table.add_variable().unwrap();
        assert_eq!(x, 1);

        let one = Ref::positive(1);
        let a = table.put(node(x, -one, one)).unwrap();
        let b = table.put(node(x, -one, one)).unwrap();
        assert_eq!(a, b);
        assert_eq!(table.real_size(), 2);
        assert_eq!(table.subtable(x).len(), 1);
    }

    #[test]
    fn test_storage_full() {
        let mut table = Table::new(2);
        let x = table.add_variable().unwrap();
        let y = table.add_variable().unwrap();
        let one = Ref::positive(1);

        // Cells 0 and 1 are taken by the sentinel and the terminal.
        table.put(node(x, -one, one)).unwrap();
        table.put(node(y, -one, one)).unwrap();
        let err = table.put(node(x, one, -one)).unwrap_err();
        assert_eq!(err, BddError::StorageFull { capacity: 4 });
    }

    #[test]
    fn test_sweep_reuses_cells() {
        let mut table = Table::new(2);
        let x = table.add_variable().unwrap();
        let one = Ref::positive(1);

        let a = table.put(node(x, -one, one)).unwrap();
        let b = table.put(node(x, one, -one)).unwrap();
        assert_eq!(table.real_size(), 3);

        let alive = HashSet::from([a]);
        assert_eq!(table.sweep(&alive), 1);
        assert!(!table.is_occupied(b));
        assert!(table.subtable(x).find(one, -one).is_none());

        let y = table.add_variable().unwrap();
        let c = table.put(node(y, -one, one)).unwrap();
        assert_eq!(c, b);
        assert_eq!(table.real_size(), 3);
    }
}
