//! Per-variable unique tables.
//!
//! Each subtable stores the nodes labelled with one variable, keyed by their
//! `(low, high)` children. Since all nodes of a subtable share the variable,
//! the variable is not part of the key.

use std::collections::HashMap;

use crate::reference::Ref;

#[derive(Debug, Clone)]
pub struct Subtable {
    /// The variable of all nodes in this subtable.
    pub variable: u32,

    /// Map from (low, high) to node index in the node table.
    nodes: HashMap<(Ref, Ref), u32>,
}

impl Subtable {
    pub fn new(variable: u32) -> Self {
        Self {
            variable,
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its children.
    pub fn find(&self, low: Ref, high: Ref) -> Option<u32> {
        self.nodes.get(&(low, high)).copied()
    }

    pub fn insert(&mut self, low: Ref, high: Ref, index: u32) {
        self.nodes.insert((low, high), index);
    }

    pub fn remove(&mut self, low: Ref, high: Ref) -> Option<u32> {
        self.nodes.remove(&(low, high))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtable_basic() {
        let mut st = Subtable::new(1);

        let low = Ref::negative(1);
        let high = Ref::positive(1);

        assert!(st.find(low, high).is_none());

        st.insert(low, high, 42);
        assert_eq!(st.find(low, high), Some(42));
        assert_eq!(st.len(), 1);

        assert_eq!(st.remove(low, high), Some(42));
        assert!(st.find(low, high).is_none());
        assert!(st.is_empty());
    }

    #[test]
    fn test_subtable_key_is_ordered_pair() {
        let mut st = Subtable::new(3);
        st.insert(Ref::positive(2), Ref::positive(3), 20);

        assert_eq!(st.find(Ref::positive(2), Ref::positive(3)), Some(20));
        assert_eq!(st.find(Ref::positive(3), Ref::positive(2)), None);
        assert_eq!(st.find(Ref::negative(2), Ref::positive(3)), None);
    }
}
