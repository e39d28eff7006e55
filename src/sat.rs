use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Returns one satisfying assignment for the BDD, if any exists.
    ///
    /// The assignment is returned as DIMACS-style literals along one path to the
    /// terminal, preferring high edges. Variables not on the path are free.
    ///
    /// Returns `None` if the BDD represents the constant false function.
    pub fn one_sat(&self, node: Ref) -> Option<Vec<i32>> {
        if self.is_zero(node) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = node;

        while !self.is_one(current) {
            let var = self.variable(current.index()) as i32;
            let high = self.high_node(current);
            let low = self.low_node(current);

            if !self.is_zero(high) {
                path.push(var);
                current = high;
            } else {
                path.push(-var);
                current = low;
            }
        }

        Some(path)
    }

    /// Number of satisfying assignments over `num_vars` variables.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self.sat_count_(node, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<u32, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::from(0u32);
        } else if self.is_one(node) {
            return max.clone();
        }

        let count = match cache.get(&node.index()) {
            Some(count) => count.clone(),
            None => {
                let low = self.low(node.index());
                let high = self.high(node.index());

                let count_low = self.sat_count_(low, max, cache);
                let count_high = self.sat_count_(high, max, cache);

                let count: BigUint = (count_low + count_high) >> 1;
                cache.insert(node.index(), count.clone());
                count
            }
        };

        if node.is_negated() {
            max - count
        } else {
            count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_sat() {
        let bdd = Bdd::default();
        for _ in 0..3 {
            bdd.new_var().unwrap();
        }

        let f = bdd.cube([1, -2, -3]).unwrap();
        let model = bdd.one_sat(f);
        assert_eq!(model, Some(vec![1, -2, -3]));

        let g = bdd.apply_and(f, -bdd.cube(model.unwrap()).unwrap()).unwrap();
        assert_eq!(bdd.one_sat(g), None);
    }

    #[test]
    fn test_one_sat_satisfies() {
        let bdd = Bdd::default();
        for _ in 0..3 {
            bdd.new_var().unwrap();
        }

        // ¬(x1 ∨ x2) ∨ x3
        let f = bdd
            .apply_or(-bdd.clause([1, 2]).unwrap(), bdd.cube([3]).unwrap())
            .unwrap();
        let model = bdd.one_sat(f).unwrap();
        let cube = bdd.cube(model).unwrap();
        assert!(!bdd.is_zero(bdd.apply_and(f, cube).unwrap()));
        assert_eq!(bdd.apply_and(cube, -f).unwrap(), bdd.zero);
    }

    #[test]
    fn test_sat_count() {
        let bdd = Bdd::default();
        for _ in 0..3 {
            bdd.new_var().unwrap();
        }

        assert_eq!(bdd.sat_count(bdd.zero, 3), BigUint::from(0u32));
        assert_eq!(bdd.sat_count(bdd.one, 3), BigUint::from(8u32));

        let f = bdd.cube([1, -2]).unwrap();
        assert_eq!(bdd.sat_count(f, 3), BigUint::from(2u32));
        assert_eq!(bdd.sat_count(-f, 3), BigUint::from(6u32));

        let g = bdd.clause([1, 2, 3]).unwrap();
        assert_eq!(bdd.sat_count(g, 3), BigUint::from(7u32));
        assert_eq!(bdd.sat_count(g, 4), BigUint::from(14u32));
    }
}
