//! The BDD manager.
//!
//! All diagrams live in one [`Bdd`] manager. A diagram is a [`Ref`] to a node of
//! the manager's node table, possibly complemented. Nodes are hash-consed per
//! variable, and the high edge of a stored node is never complemented, so every
//! boolean function has exactly one `Ref` for a fixed variable order.
//! Variables are ordered by id: `x1` is closest to the root.
//!
//! Every operation that may allocate nodes returns `Result<Ref, BddError>` and
//! fails with [`BddError::StorageFull`] once the node table is exhausted.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::{self, Debug};

use log::debug;

use crate::cache::Cache;
use crate::error::BddError;
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::Var;

/// Sizing of the node table and the computed table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddConfig {
    /// The node table holds `2^storage_bits` nodes.
    pub storage_bits: usize,
    /// The computed table holds `2^cache_bits` entries.
    pub cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            storage_bits: 20,
            cache_bits: 16,
        }
    }
}

impl BddConfig {
    pub fn with_storage_bits(mut self, storage_bits: usize) -> Self {
        self.storage_bits = storage_bits;
        self
    }

    pub fn with_cache_bits(mut self, cache_bits: usize) -> Self {
        self.cache_bits = cache_bits;
        self
    }
}

/// Snapshot of the manager's counters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddStats {
    pub capacity: usize,
    pub live_nodes: usize,
    pub num_vars: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl fmt::Display for BddStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} nodes alive, {} vars, cache {} hits / {} misses",
            self.live_nodes, self.capacity, self.num_vars, self.cache_hits, self.cache_misses
        )
    }
}

pub struct Bdd {
    storage: RefCell<Table>,
    cache: RefCell<Cache<(Ref, Ref, Ref), Ref>>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new(storage_bits: usize) -> Self {
        Self::with_config(BddConfig::default().with_storage_bits(storage_bits))
    }

    pub fn with_config(config: BddConfig) -> Self {
        assert!(
            (1..=31).contains(&config.storage_bits),
            "Storage bits should be in the range 1..=31"
        );
        let cache_bits = config.cache_bits.min(config.storage_bits);

        let storage = Table::new(config.storage_bits);
        let one = Ref::positive(1);
        let zero = -one;

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(cache_bits)),
            zero,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::with_config(BddConfig::default())
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("capacity", &storage.capacity())
            .field("size", &storage.size())
            .field("real_size", &storage.real_size())
            .field("num_vars", &storage.num_vars())
            .finish()
    }
}

impl Bdd {
    pub fn stats(&self) -> BddStats {
        let storage = self.storage.borrow();
        let cache = self.cache.borrow();
        BddStats {
            capacity: storage.capacity(),
            live_nodes: storage.real_size(),
            num_vars: storage.num_vars(),
            cache_hits: cache.hits(),
            cache_misses: cache.misses(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.storage.borrow().num_vars()
    }

    /// Allocate a fresh variable below all existing ones in the order.
    pub fn new_var(&self) -> Result<Var, BddError> {
        let id = self.storage.borrow_mut().add_variable()?;
        let var = Var::new(id);
        // Make sure the literal fits, so that a full table is reported here.
        self.mk_var(var)?;
        debug!("new_var() -> {}", var);
        Ok(var)
    }

    pub fn variable(&self, index: u32) -> u32 {
        self.storage.borrow().node(index).variable
    }
    pub fn low(&self, index: u32) -> Ref {
        self.storage.borrow().node(index).low
    }
    pub fn high(&self, index: u32) -> Ref {
        self.storage.borrow().node(index).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Result<Ref, BddError> {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        assert_ne!(v, 0, "Variable index should not be zero");

        // Handle canonicity
        if high.is_negated() {
            debug!("mk: restoring canonicity");
            return Ok(-self.mk_node(v, -low, -high)?);
        }

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return Ok(low);
        }

        let i = self.storage.borrow_mut().put(Node {
            variable: v,
            low,
            high,
        })?;
        Ok(Ref::positive(i))
    }

    pub fn mk_var(&self, v: Var) -> Result<Ref, BddError> {
        self.check_var(v.id())?;
        self.mk_node(v.id(), self.zero, self.one)
    }

    /// The diagram of `v` (for `polarity = true`) or `¬v` (for `polarity = false`).
    pub fn literal(&self, v: Var, polarity: bool) -> Result<Ref, BddError> {
        let x = self.mk_var(v)?;
        Ok(if polarity { x } else { -x })
    }

    /// Conjunction of the given DIMACS-style literals, built bottom-up without ITE.
    pub fn cube(&self, literals: impl IntoIterator<Item = i32>) -> Result<Ref, BddError> {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&v| v.abs());
        debug!("cube(literals = {:?})", literals);
        literals.reverse();
        let mut current = self.one;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            self.check_var(lit.unsigned_abs())?;
            current = if lit < 0 {
                self.mk_node(lit.unsigned_abs(), current, self.zero)?
            } else {
                self.mk_node(lit as u32, self.zero, current)?
            };
        }
        Ok(current)
    }

    /// Disjunction of the given DIMACS-style literals, built bottom-up without ITE.
    pub fn clause(&self, literals: impl IntoIterator<Item = i32>) -> Result<Ref, BddError> {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&v| v.abs());
        debug!("clause(literals = {:?})", literals);
        literals.reverse();
        let mut current = self.zero;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            self.check_var(lit.unsigned_abs())?;
            current = if lit < 0 {
                self.mk_node(lit.unsigned_abs(), self.one, current)?
            } else {
                self.mk_node(lit as u32, current, self.one)?
            };
        }
        Ok(current)
    }

    fn check_var(&self, v: u32) -> Result<(), BddError> {
        if v as usize > self.num_vars() {
            Err(BddError::UnknownVariable(v))
        } else {
            Ok(())
        }
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        let i = node.index();
        if self.is_terminal(node) || v < self.variable(i) {
            return (node, node);
        }
        assert_eq!(v, self.variable(i));
        if node.is_negated() {
            (-self.low(i), -self.high(i))
        } else {
            (self.low(i), self.high(i))
        }
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use queens_bdd::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.new_var().unwrap();
    /// let y = bdd.new_var().unwrap();
    /// let z = bdd.new_var().unwrap();
    /// let (x, y, z) = (bdd.mk_var(x).unwrap(), bdd.mk_var(y).unwrap(), bdd.mk_var(z).unwrap());
    ///
    /// let f = bdd.apply_ite(x, y, z).unwrap();
    /// let x_and_y = bdd.apply_and(x, y).unwrap();
    /// let not_x_and_z = bdd.apply_and(-x, z).unwrap();
    /// assert_eq!(f, bdd.apply_or(x_and_y, not_x_and_z).unwrap());
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Result<Ref, BddError> {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return Ok(g);
        }
        if self.is_zero(f) {
            return Ok(h);
        }

        // From now on, F is known not to be a constant
        assert!(!self.is_terminal(f));

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        //   ite(F,1,~F) => 1
        //   ite(F,F,1) => 1
        //   ite(F,~F,0) => 0
        //   ite(F,0,F) => F
        if g == h {
            return Ok(g);
        }
        if self.is_one(g) && self.is_zero(h) {
            return Ok(f);
        }
        if self.is_zero(g) && self.is_one(h) {
            return Ok(-f);
        }
        if self.is_one(g) && h == -f {
            return Ok(self.one);
        }
        if g == f && self.is_one(h) {
            return Ok(self.one);
        }
        if g == -f && self.is_zero(h) {
            return Ok(self.zero);
        }
        if self.is_zero(g) && h == f {
            return Ok(f);
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        let i = self.variable(f.index());
        let j = self.variable(g.index());
        let k = self.variable(h.index());
        assert_ne!(i, 0);

        // Equivalent pairs:
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        // (choose the one with the lowest variable)
        if self.is_one(g) && k < i {
            assert_ne!(k, 0);
            return self.apply_ite(h, self.one, f);
        }
        if self.is_zero(h) && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(g, f, self.zero);
        }
        if self.is_one(h) && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(-g, -f, self.one);
        }
        if self.is_zero(g) && k < i {
            assert_ne!(k, 0);
            return self.apply_ite(-h, self.zero, -f);
        }
        if g == -h && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(g, f, -f);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let (f, g, h) = (f, g, h);

        let key = (f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return Ok(if n { -res } else { res });
        }

        // Determine the top variable:
        let mut m = i;
        if j != 0 {
            m = m.min(j);
        }
        if k != 0 {
            m = m.min(k);
        }
        assert_ne!(m, 0);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0)?;
        let t = self.apply_ite(f1, g1, h1)?;

        let res = self.mk_node(m, e, t)?;
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        Ok(if n { -res } else { res })
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Result<Ref, BddError> {
        debug!("apply_and(u = {}, v = {})", u, v);
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Result<Ref, BddError> {
        debug!("apply_or(u = {}, v = {})", u, v);
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref, BddError> {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node)?;
            if self.is_zero(res) {
                break;
            }
        }
        Ok(res)
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref, BddError> {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node)?;
            if self.is_one(res) {
                break;
            }
        }
        Ok(res)
    }

    /// Restrict `f` by `v <- value`.
    ///
    /// The result does not depend on `v`.
    pub fn restrict(&self, f: Ref, v: Var, value: bool) -> Result<Ref, BddError> {
        debug!("restrict(f = {}, v = {}, value = {})", f, v, value);
        let mut cache = HashMap::new();
        self.restrict_(f, v.id(), value, &mut cache)
    }

    fn restrict_(
        &self,
        f: Ref,
        v: u32,
        b: bool,
        cache: &mut HashMap<u32, Ref>,
    ) -> Result<Ref, BddError> {
        if self.is_terminal(f) {
            return Ok(f);
        }

        let i = self.variable(f.index());

        if v < i {
            // 'f' does not depend on 'v'
            return Ok(f);
        }

        if v == i {
            return Ok(if b {
                self.high_node(f)
            } else {
                self.low_node(f)
            });
        }

        // Memoize on the regular node, complement on the way out.
        let res = match cache.get(&f.index()) {
            Some(&res) => res,
            None => {
                let r = f.regular();
                let low = self.restrict_(self.low_node(r), v, b, cache)?;
                let high = self.restrict_(self.high_node(r), v, b, cache)?;
                let res = self.mk_node(i, low, high)?;
                cache.insert(f.index(), res);
                res
            }
        };
        Ok(if f.is_negated() { -res } else { res })
    }

    /// Indices of all nodes reachable from `nodes`, the terminal included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Number of nodes in `f`, the terminal included.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    /// Drop all nodes not reachable from `roots`.
    ///
    /// Every `Ref` not reachable from `roots` is invalid afterwards.
    pub fn collect_garbage(&self, roots: &[Ref]) -> usize {
        debug!("Collecting garbage from {} roots...", roots.len());
        self.cache.borrow_mut().clear();
        let alive = self.descendants(roots.iter().copied());
        self.storage.borrow_mut().sweep(&alive)
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        let v = self.variable(node.index());
        let low = self.low_node(node);
        let high = self.high_node(node);

        format!(
            "{}:(x{}, {}, {})",
            node,
            v,
            self.to_bracket_string(high),
            self.to_bracket_string(low)
        )
    }
}
