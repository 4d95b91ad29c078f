//! The shared MTBDD facade.
//!
//! [`Mtbdd`] is the manager every operation goes through. It owns the node
//! store, the computed table and the table of caller-visible roots, and it
//! enforces the reference discipline: one retain per live root handle, one
//! retain per node returned by a construction operation.
//!
//! # Overview
//!
//! An MTBDD represents a total function from Boolean variable assignments to
//! leaf values of a caller-chosen domain `V`. Paths that were never written
//! end in the *background* terminal, fixed when the facade is created.
//!
//! # Quick Start
//!
//! ```
//! use mtbdd_rs::mtbdd::Mtbdd;
//! use mtbdd_rs::assignment::VarAssignment;
//!
//! // Background value 0: unwritten paths read as 0.
//! let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
//! let root = mtbdd.create_root();
//!
//! let asgn: VarAssignment = "1101".parse().unwrap();
//! mtbdd.set_value(root, &asgn, 7);
//!
//! assert_eq!(mtbdd.get_value(root, &asgn), vec![7]);
//! assert_eq!(mtbdd.get_value(root, &"0000".parse().unwrap()), vec![0]);
//!
//! mtbdd.erase_root(root);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use hashbrown::HashMap;
use log::debug;

use crate::assignment::{VarAssignment, VarValue};
use crate::cache::OpCache;
use crate::store::NodeStore;
use crate::types::{NodeId, OpTag, RootId, Var};

/// A shared multi-terminal binary decision diagram manager.
///
/// All diagrams of one facade share a single hash-consed node store, so
/// isomorphic sub-diagrams are physically identical and equality of
/// functions is equality of node ids. The facade is single-threaded; methods
/// take `&self` and use interior mutability so one instance can be shared by
/// several client objects.
///
/// Handles issued by one facade are meaningless to any other; passing them
/// across facades is a programmer error and panics when detected.
#[derive(Debug)]
pub struct Mtbdd<V> {
    pub(crate) store: RefCell<NodeStore<V>>,
    pub(crate) cache: RefCell<OpCache>,
    roots: RefCell<HashMap<RootId, NodeId>>,
    background: Cell<NodeId>,
    next_root: Cell<u32>,
    next_tag: Cell<u64>,
    num_vars: Cell<u32>,
}

impl<V> Default for Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash + Default,
{
    fn default() -> Self {
        Self::with_default(V::default())
    }
}

impl<V> Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash,
{
    /// Creates a facade whose background (default) value is `background`.
    pub fn with_default(background: V) -> Self {
        Self::with_settings(background, 16)
    }

    /// Creates a facade with an explicit computed-table size of
    /// `2^cache_bits` slots.
    pub fn with_settings(background: V, cache_bits: usize) -> Self {
        let mut store = NodeStore::new();
        let bg = store.intern_terminal(background);
        store.retain(bg);

        Self {
            store: RefCell::new(store),
            cache: RefCell::new(OpCache::new(cache_bits)),
            roots: RefCell::new(HashMap::new()),
            background: Cell::new(bg),
            next_root: Cell::new(0),
            next_tag: Cell::new(0),
            num_vars: Cell::new(0),
        }
    }

    // ------------------------------------------------------------------
    // Background value
    // ------------------------------------------------------------------

    /// Replaces the background value.
    ///
    /// # Panics
    ///
    /// Panics if any root has already been created: the background is fixed
    /// for the lifetime of the forest.
    pub fn set_default(&self, background: V) {
        assert!(
            self.roots.borrow().is_empty(),
            "set_default called after roots were created"
        );
        let mut store = self.store.borrow_mut();
        let old = self.background.get();
        let bg = store.intern_terminal(background);
        if bg != old {
            store.retain(bg);
            store.release(old);
            self.background.set(bg);
        }
    }

    /// Returns the background (default) leaf value.
    pub fn default_value(&self) -> V {
        self.store.borrow().value(self.background.get()).clone()
    }

    /// Returns the background terminal node.
    pub fn background_node(&self) -> NodeId {
        self.background.get()
    }

    // ------------------------------------------------------------------
    // Roots
    // ------------------------------------------------------------------

    /// Creates a fresh root. Every path of a fresh root leads to the
    /// background value.
    pub fn create_root(&self) -> RootId {
        let h = RootId::new(self.next_root.get());
        self.next_root.set(h.raw() + 1);

        let bg = self.background.get();
        self.store.borrow_mut().retain(bg);
        self.roots.borrow_mut().insert(h, bg);
        debug!("create_root -> {}", h);
        h
    }

    /// Binds an existing node to a fresh root handle, retaining it.
    ///
    /// Several root handles may share one underlying node; each handle holds
    /// exactly one retain and [`Mtbdd::erase_root`] drops exactly one.
    pub fn adopt_root(&self, node: NodeId) -> RootId {
        let h = RootId::new(self.next_root.get());
        self.next_root.set(h.raw() + 1);

        self.store.borrow_mut().retain(node);
        self.roots.borrow_mut().insert(h, node);
        debug!("adopt_root({}) -> {}", node, h);
        h
    }

    /// Erases a root, releasing the diagram it names.
    ///
    /// # Panics
    ///
    /// Panics if `h` is not a live root of this facade.
    pub fn erase_root(&self, h: RootId) {
        let node = self
            .roots
            .borrow_mut()
            .remove(&h)
            .unwrap_or_else(|| panic!("Unknown root handle {}", h));
        debug!("erase_root({}) releasing {}", h, node);
        self.store.borrow_mut().release(node);
    }

    /// Returns the node a root handle is bound to.
    ///
    /// # Panics
    ///
    /// Panics if `h` is not a live root of this facade.
    pub fn root_node(&self, h: RootId) -> NodeId {
        *self
            .roots
            .borrow()
            .get(&h)
            .unwrap_or_else(|| panic!("Unknown root handle {}", h))
    }

    /// Number of live roots.
    pub fn num_roots(&self) -> usize {
        self.roots.borrow().len()
    }

    /// Rebinds a root to `node`, releasing the previously bound diagram.
    pub(crate) fn rebind_root(&self, h: RootId, node: NodeId) {
        let old = self.root_node(h);
        let mut store = self.store.borrow_mut();
        store.retain(node);
        store.release(old);
        self.roots.borrow_mut().insert(h, node);
    }

    // ------------------------------------------------------------------
    // Reference management
    // ------------------------------------------------------------------

    /// Increments the reference count of `node`, pinning it across
    /// subsequent operations.
    pub fn retain(&self, node: NodeId) {
        self.store.borrow_mut().retain(node);
    }

    /// Decrements the reference count of `node`; on zero the node and any
    /// exclusively held descendants are reclaimed.
    pub fn release(&self, node: NodeId) {
        self.store.borrow_mut().release(node);
    }

    /// Reclaims every node with no remaining reference.
    ///
    /// Transform operations call this after binding their result, so
    /// intermediate diagrams never outlive the operation that built them.
    pub fn sweep(&self) {
        let mut store = self.store.borrow_mut();
        loop {
            let dead: Vec<NodeId> = store.floating().collect();
            if dead.is_empty() {
                return;
            }
            for id in dead {
                if store.is_live(id) && store.refcount(id) == 0 {
                    store.retain(id);
                    store.release(id);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Returns `true` if `node` is a terminal.
    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.store.borrow().is_terminal(node)
    }

    /// Returns the leaf value of a terminal node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is internal.
    pub fn value_of(&self, node: NodeId) -> V {
        self.store.borrow().value(node).clone()
    }

    /// Returns the decision variable of an internal node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a terminal.
    pub fn variable_of(&self, node: NodeId) -> Var {
        self.store.borrow().variable(node)
    }

    /// Returns the child followed when the node's variable is `1`.
    pub fn then_child(&self, node: NodeId) -> NodeId {
        self.store.borrow().hi(node)
    }

    /// Returns the child followed when the node's variable is `0`.
    pub fn else_child(&self, node: NodeId) -> NodeId {
        self.store.borrow().lo(node)
    }

    /// Returns the reference count of a node.
    pub fn refcount(&self, node: NodeId) -> u32 {
        self.store.borrow().refcount(node)
    }

    /// Number of live nodes in the store (terminals and internals).
    pub fn num_nodes(&self) -> usize {
        self.store.borrow().num_live()
    }

    /// The number of variables this facade has seen so far: one past the
    /// highest variable index used by any assignment, construction or
    /// renaming operation.
    pub fn var_count(&self) -> u32 {
        self.num_vars.get()
    }

    pub(crate) fn note_vars(&self, count: u32) {
        if count > self.num_vars.get() {
            self.num_vars.set(count);
        }
    }

    /// Counts the distinct nodes reachable from a root, terminals included.
    pub fn dag_size(&self, h: RootId) -> usize {
        self.descendants([self.root_node(h)]).len()
    }

    /// All nodes reachable from `roots` in postorder (children before
    /// parents), each listed once.
    pub(crate) fn descendants(&self, roots: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for root in roots {
            self.postorder(root, &mut seen, &mut order);
        }
        order
    }

    fn postorder(&self, n: NodeId, seen: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
        if !seen.insert(n) {
            return;
        }
        let children = self.store.borrow().node(n).children();
        if let Some((hi, lo)) = children {
            self.postorder(hi, seen, order);
            self.postorder(lo, seen, order);
        }
        order.push(n);
    }

    /// The set of variables tested anywhere in the diagram, ascending.
    pub(crate) fn support(&self, node: NodeId) -> Vec<Var> {
        let mut vars: Vec<Var> = self
            .descendants([node])
            .into_iter()
            .filter_map(|id| self.store.borrow().top_var(id))
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Interns the terminal for `value` and returns it retained.
    ///
    /// The caller owns one reference and must drop it with
    /// [`Mtbdd::release`] (or bind it to a root with [`Mtbdd::adopt_root`]
    /// and release the construction reference).
    pub fn add_constant(&self, value: V) -> NodeId {
        let mut store = self.store.borrow_mut();
        let id = store.intern_terminal(value);
        store.retain(id);
        id
    }

    pub(crate) fn mk_terminal(&self, value: V) -> NodeId {
        self.store.borrow_mut().intern_terminal(value)
    }

    pub(crate) fn mk_node(&self, var: Var, hi: NodeId, lo: NodeId) -> NodeId {
        self.store.borrow_mut().intern_internal(var, hi, lo)
    }

    pub(crate) fn fresh_tag(&self) -> OpTag {
        let tag = OpTag::new(self.next_tag.get());
        self.next_tag.set(tag.raw() + 1);
        tag
    }

    /// Splits `n` into its cofactors with respect to `var`.
    ///
    /// Operands that do not test `var` pass through unchanged.
    pub(crate) fn cofactors(&self, n: NodeId, var: Var) -> (NodeId, NodeId) {
        let store = self.store.borrow();
        match store.top_var(n) {
            Some(v) if v == var => store.children(n),
            Some(v) => {
                assert!(v > var, "Cofactor split on {} below the top variable {}", var, v);
                (n, n)
            }
            None => (n, n),
        }
    }

    // ------------------------------------------------------------------
    // Value lookup and update
    // ------------------------------------------------------------------

    /// Returns every leaf value reachable under `asgn`, deduplicated by
    /// node identity, in traversal order.
    ///
    /// Variables assigned `X` contribute both branches.
    ///
    /// # Panics
    ///
    /// Panics if the assignment is shorter than [`Mtbdd::var_count`].
    pub fn get_value(&self, h: RootId, asgn: &VarAssignment) -> Vec<V> {
        assert!(
            asgn.len() >= self.var_count() as usize,
            "Assignment of length {} is shorter than the variable count {}",
            asgn.len(),
            self.var_count()
        );
        let root = self.root_node(h);
        debug!("get_value({}, {})", h, asgn);

        let mut seen = HashSet::new();
        let mut values = Vec::new();
        self.collect_values(root, asgn, &mut seen, &mut values);
        values
    }

    fn collect_values(&self, n: NodeId, asgn: &VarAssignment, seen: &mut HashSet<NodeId>, out: &mut Vec<V>) {
        enum Step<V> {
            Leaf(Option<V>),
            Branch(VarValue, NodeId, NodeId),
        }

        let step = {
            let store = self.store.borrow();
            match store.node(n) {
                crate::node::Node::Terminal(v) => Step::Leaf(seen.insert(n).then(|| v.clone())),
                crate::node::Node::Internal { var, hi, lo } => {
                    Step::Branch(asgn.get(var.index() as usize), *hi, *lo)
                }
            }
        };

        match step {
            Step::Leaf(Some(v)) => out.push(v),
            Step::Leaf(None) => {}
            Step::Branch(VarValue::One, hi, _) => self.collect_values(hi, asgn, seen, out),
            Step::Branch(VarValue::Zero, _, lo) => self.collect_values(lo, asgn, seen, out),
            Step::Branch(VarValue::DontCare, hi, lo) => {
                self.collect_values(hi, asgn, seen, out);
                self.collect_values(lo, asgn, seen, out);
            }
        }
    }

    /// Writes `value` on every path consistent with `asgn`, rebinding the
    /// root to the rebuilt diagram and releasing the previous one.
    ///
    /// Variables assigned `X` mean the write applies to both branches.
    pub fn set_value(&self, h: RootId, asgn: &VarAssignment, value: V) {
        debug!("set_value({}, {})", h, asgn);
        assert!(
            asgn.len() >= self.var_count() as usize,
            "Assignment of length {} is shorter than the variable count {}",
            asgn.len(),
            self.var_count()
        );
        self.note_vars(asgn.len() as u32);

        let old = self.root_node(h);
        let tag = self.fresh_tag();
        let leaf = self.mk_terminal(value);
        let new = self.write_rec(old, asgn, 0, leaf, tag);
        self.rebind_root(h, new);
    }

    /// Recursive path-directed rewrite: replaces the sub-function on every
    /// path consistent with `asgn[i..]` by `leaf`.
    pub(crate) fn write_rec(&self, n: NodeId, asgn: &VarAssignment, i: usize, leaf: NodeId, tag: OpTag) -> NodeId {
        if i == asgn.len() {
            return leaf;
        }
        if let Some(r) = self.cache.borrow_mut().get_indexed(tag, n, i as u32) {
            return r;
        }

        let var = Var::new(i as u32);
        let (hi, lo) = self.cofactors(n, var);
        let r = match asgn.get(i) {
            VarValue::One => {
                let t = self.write_rec(hi, asgn, i + 1, leaf, tag);
                self.mk_node(var, t, lo)
            }
            VarValue::Zero => {
                let e = self.write_rec(lo, asgn, i + 1, leaf, tag);
                self.mk_node(var, hi, e)
            }
            VarValue::DontCare => {
                let t = self.write_rec(hi, asgn, i + 1, leaf, tag);
                let e = self.write_rec(lo, asgn, i + 1, leaf, tag);
                self.mk_node(var, t, e)
            }
        };
        self.cache.borrow_mut().insert_indexed(tag, n, i as u32, r);
        r
    }

    /// Computed-table statistics as `(hits, misses)`.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.hits(), cache.misses())
    }

    /// The minimum description of a root: one entry per diagram path with a
    /// non-background leaf, keyed by the path assignment (`X` on variables
    /// the path does not test).
    pub fn describe(&self, h: RootId) -> BTreeMap<VarAssignment, V> {
        let root = self.root_node(h);
        let mut path = VarAssignment::universal(self.var_count() as usize);
        let mut map = BTreeMap::new();
        self.describe_rec(root, &mut path, &mut map);
        map
    }

    fn describe_rec(&self, n: NodeId, path: &mut VarAssignment, map: &mut BTreeMap<VarAssignment, V>) {
        let node = self.store.borrow().node(n).clone();
        match node {
            crate::node::Node::Terminal(v) => {
                if n != self.background.get() {
                    map.insert(path.clone(), v);
                }
            }
            crate::node::Node::Internal { var, hi, lo } => {
                let i = var.index() as usize;
                path.set(i, VarValue::One);
                self.describe_rec(hi, path, map);
                path.set(i, VarValue::Zero);
                self.describe_rec(lo, path, map);
                path.set(i, VarValue::DontCare);
            }
        }
    }
}

impl<V> Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash + std::fmt::Display,
{
    /// Renders a diagram as a nested bracket expression, `then` branch
    /// first. Handy when a test failure needs eyeballing.
    pub fn to_bracket_string(&self, node: NodeId) -> String {
        let data = self.store.borrow().node(node).clone();
        match data {
            crate::node::Node::Terminal(v) => format!("{}:({})", node, v),
            crate::node::Node::Internal { var, hi, lo } => {
                format!(
                    "{}:({}, {}, {})",
                    node,
                    var,
                    self.to_bracket_string(hi),
                    self.to_bracket_string(lo)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn asgn(s: &str) -> VarAssignment {
        s.parse().unwrap()
    }

    #[test]
    fn test_fresh_root_reads_background() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        assert_eq!(mtbdd.get_value(root, &asgn("XXXX")), vec![0]);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("1010"), 42);
        assert_eq!(mtbdd.get_value(root, &asgn("1010")), vec![42]);
        assert_eq!(mtbdd.get_value(root, &asgn("1011")), vec![0]);
    }

    #[test]
    fn test_overwrite_replaces() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("11"), 5);
        mtbdd.set_value(root, &asgn("11"), 6);
        assert_eq!(mtbdd.get_value(root, &asgn("11")), vec![6]);
    }

    #[test]
    fn test_dont_care_write() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("1X"), 9);
        assert_eq!(mtbdd.get_value(root, &asgn("10")), vec![9]);
        assert_eq!(mtbdd.get_value(root, &asgn("11")), vec![9]);
        assert_eq!(mtbdd.get_value(root, &asgn("00")), vec![0]);
    }

    #[test]
    fn test_dont_care_lookup_collects_all() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("00"), 1);
        mtbdd.set_value(root, &asgn("10"), 2);

        let mut values = mtbdd.get_value(root, &asgn("X0"));
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_dont_care_lookup_dedups_by_identity() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("0X"), 3);
        // Both branches of x1 reach the same terminal node.
        assert_eq!(mtbdd.get_value(root, &asgn("0X")), vec![3]);
    }

    #[test]
    fn test_roots_are_independent() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let r1 = mtbdd.create_root();
        let r2 = mtbdd.create_root();

        mtbdd.set_value(r1, &asgn("11"), 7);
        assert_eq!(mtbdd.get_value(r1, &asgn("11")), vec![7]);
        assert_eq!(mtbdd.get_value(r2, &asgn("11")), vec![0]);
    }

    #[test]
    fn test_canonicity_shares_nodes() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let r1 = mtbdd.create_root();
        let r2 = mtbdd.create_root();

        mtbdd.set_value(r1, &asgn("101"), 4);
        mtbdd.set_value(r2, &asgn("101"), 4);
        assert_eq!(mtbdd.root_node(r1), mtbdd.root_node(r2));
    }

    #[test]
    fn test_erase_root_reclaims_nodes() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let baseline = mtbdd.num_nodes();

        let root = mtbdd.create_root();
        mtbdd.set_value(root, &asgn("0110"), 11);
        assert!(mtbdd.num_nodes() > baseline);

        mtbdd.erase_root(root);
        assert_eq!(mtbdd.num_nodes(), baseline);
    }

    #[test]
    fn test_dag_size_counts_terminals() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        // Fresh root: just the background terminal.
        assert_eq!(mtbdd.dag_size(root), 1);

        mtbdd.set_value(root, &asgn("1"), 2);
        // One internal node and two terminals.
        assert_eq!(mtbdd.dag_size(root), 3);
    }

    #[test]
    fn test_reduction_no_redundant_test() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        // Writing both branches of x0 with the same value must not leave an
        // x0 test behind.
        mtbdd.set_value(root, &asgn("0"), 5);
        mtbdd.set_value(root, &asgn("1"), 5);
        assert!(mtbdd.is_terminal(mtbdd.root_node(root)));
        assert_eq!(mtbdd.value_of(mtbdd.root_node(root)), 5);
    }

    #[test]
    fn test_describe_minimum_description() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("1X"), 9);
        let desc = mtbdd.describe(root);
        // The diagram only tests x0; x1 shows up as a don't-care.
        assert_eq!(desc.len(), 1);
        let (path, value) = desc.iter().next().unwrap();
        assert_eq!(path.to_string(), "1X");
        assert_eq!(*value, 9);
    }

    #[test]
    fn test_set_default_before_roots() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        mtbdd.set_default(99);
        let root = mtbdd.create_root();
        assert_eq!(mtbdd.get_value(root, &asgn("XX")), vec![99]);
    }

    #[test]
    #[should_panic(expected = "set_default called after roots were created")]
    fn test_set_default_after_roots_panics() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let _root = mtbdd.create_root();
        mtbdd.set_default(1);
    }

    #[test]
    #[should_panic(expected = "Unknown root handle")]
    fn test_erase_unknown_root_panics() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        mtbdd.erase_root(root);
        mtbdd.erase_root(root);
    }

    #[test]
    fn test_add_constant_is_retained() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let c = mtbdd.add_constant(17);
        assert_eq!(mtbdd.refcount(c), 1);
        assert_eq!(mtbdd.value_of(c), 17);
        mtbdd.release(c);
    }

    #[test]
    fn test_bracket_string() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        mtbdd.set_value(root, &asgn("1"), 2);

        let rendered = mtbdd.to_bracket_string(mtbdd.root_node(root));
        assert!(rendered.contains("x0"));
        assert!(rendered.contains("(2)"));
        assert!(rendered.contains("(0)"));
    }

    #[test]
    fn test_cache_stats_move() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        // A don't-care write converges on shared subproblems.
        mtbdd.set_value(root, &asgn("XX1"), 4);

        let (hits, misses) = mtbdd.cache_stats();
        assert!(hits + misses > 0);
    }

    #[test]
    fn test_string_valued_leaves() {
        let mtbdd: Mtbdd<String> = Mtbdd::with_default(String::new());
        let root = mtbdd.create_root();

        mtbdd.set_value(root, &asgn("01"), "hello".to_string());
        assert_eq!(mtbdd.get_value(root, &asgn("01")), vec!["hello".to_string()]);
        assert_eq!(mtbdd.get_value(root, &asgn("11")), vec![String::new()]);
    }
}
