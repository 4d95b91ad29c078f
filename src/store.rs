//! Hash-consed node store with reference counting.
//!
//! The store owns every terminal and internal node of one facade instance and
//! guarantees *canonicity*: at any moment there is at most one live node per
//! terminal value and at most one live internal node per `(var, hi, lo)`
//! triple, compared by child identity. All node construction routes through
//! [`NodeStore::intern_terminal`] and [`NodeStore::intern_internal`], so the
//! invariant holds by construction.
//!
//! # Slots and the free list
//!
//! Nodes live in an arena of slots indexed by [`NodeId`]. Freed slots are
//! found again by scanning from `min_free`, the index of the first *possibly*
//! free cell; the arena grows when no free cell exists.
//!
//! # Reference counting
//!
//! Each slot carries one combined count: the number of live internal parents
//! plus the number of external retains. Interning a *new* internal node
//! retains its children; [`NodeStore::release`] drops a count and, on zero,
//! evicts the node from its unique table, frees the slot, and releases the
//! children recursively. Freshly interned nodes start at count zero and stay
//! alive until an explicit release cascade reaches them.

use hashbrown::HashMap;
use log::debug;

use crate::node::Node;
use crate::types::{NodeId, Var};

#[derive(Debug)]
struct Slot<V> {
    node: Node<V>,
    rc: u32,
}

#[derive(Debug)]
pub struct NodeStore<V> {
    slots: Vec<Option<Slot<V>>>,
    /// Index of the first *possibly* free (unoccupied) slot.
    min_free: usize,
    /// Number of live nodes.
    live: usize,
    /// Unique table for terminals: value -> node.
    terminals: HashMap<V, NodeId>,
    /// Unique table for internal nodes: (var, hi, lo) -> node.
    internals: HashMap<(Var, NodeId, NodeId), NodeId>,
}

impl<V> Default for NodeStore<V>
where
    V: Clone + Eq + std::hash::Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NodeStore<V>
where
    V: Clone + Eq + std::hash::Hash,
{
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            min_free: 0,
            live: 0,
            terminals: HashMap::new(),
            internals: HashMap::new(),
        }
    }

    /// Number of live nodes (terminals and internals).
    pub fn num_live(&self) -> usize {
        self.live
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.slots.get(id.index()).is_some_and(|slot| slot.is_some())
    }

    /// Ids of live nodes whose reference count is zero.
    pub fn floating(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref().filter(|s| s.rc == 0).map(|_| NodeId::new(i as u32))
        })
    }

    fn slot(&self, id: NodeId) -> &Slot<V> {
        self.slots[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("Node {} is not live", id))
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot<V> {
        self.slots[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("Node {} is not live", id))
    }

    /// Accesses the node stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not name a live node.
    pub fn node(&self, id: NodeId) -> &Node<V> {
        &self.slot(id).node
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.node(id).is_terminal()
    }

    /// Returns the decision variable of an internal node.
    ///
    /// # Panics
    ///
    /// Panics if `id` names a terminal.
    pub fn variable(&self, id: NodeId) -> Var {
        self.node(id)
            .var()
            .unwrap_or_else(|| panic!("Node {} is a terminal and has no variable", id))
    }

    /// Returns the top variable, or `None` for terminals.
    pub fn top_var(&self, id: NodeId) -> Option<Var> {
        self.node(id).var()
    }

    /// Returns the leaf value of a terminal node.
    ///
    /// # Panics
    ///
    /// Panics if `id` names an internal node.
    pub fn value(&self, id: NodeId) -> &V {
        self.node(id)
            .value()
            .unwrap_or_else(|| panic!("Node {} is internal and has no value", id))
    }

    /// Returns the `hi` ("then") child of an internal node.
    pub fn hi(&self, id: NodeId) -> NodeId {
        self.children(id).0
    }

    /// Returns the `lo` ("else") child of an internal node.
    pub fn lo(&self, id: NodeId) -> NodeId {
        self.children(id).1
    }

    pub fn children(&self, id: NodeId) -> (NodeId, NodeId) {
        self.node(id)
            .children()
            .unwrap_or_else(|| panic!("Node {} is a terminal and has no children", id))
    }

    /// Returns the combined reference count of a node.
    pub fn refcount(&self, id: NodeId) -> u32 {
        self.slot(id).rc
    }

    fn alloc(&mut self, node: Node<V>) -> NodeId {
        let index = (self.min_free..self.slots.len())
            .find(|&i| self.slots[i].is_none())
            .unwrap_or_else(|| {
                self.slots.push(None);
                self.slots.len() - 1
            });

        // Ids stay below u32::MAX, which the computed table uses as its
        // unused-operand sentinel.
        assert!(index < u32::MAX as usize, "Node store is full");

        self.slots[index] = Some(Slot { node, rc: 0 });
        self.min_free = index + 1;
        self.live += 1;

        NodeId::new(index as u32)
    }

    /// Returns the canonical terminal for `value`, allocating it on demand.
    pub fn intern_terminal(&mut self, value: V) -> NodeId {
        if let Some(&id) = self.terminals.get(&value) {
            return id;
        }
        let id = self.alloc(Node::Terminal(value.clone()));
        self.terminals.insert(value, id);
        debug!("intern_terminal -> new node {}", id);
        id
    }

    /// Returns the canonical internal node `(var, hi, lo)`, allocating it on
    /// demand.
    ///
    /// Applies the reduction rule: if `hi == lo` the child itself is
    /// returned and no node is created.
    ///
    /// # Panics
    ///
    /// Panics if a child is not live, or if a child's top variable is not
    /// strictly greater than `var` (variable-order violation).
    pub fn intern_internal(&mut self, var: Var, hi: NodeId, lo: NodeId) -> NodeId {
        if hi == lo {
            return hi;
        }

        for child in [hi, lo] {
            if let Some(cv) = self.top_var(child) {
                assert!(
                    cv > var,
                    "Variable order violated: child {} tests {} which is not below {}",
                    child,
                    cv,
                    var
                );
            }
        }

        let key = (var, hi, lo);
        if let Some(&id) = self.internals.get(&key) {
            return id;
        }

        let id = self.alloc(Node::Internal { var, hi, lo });
        self.internals.insert(key, id);
        // The new node holds one reference to each child.
        self.slot_mut(hi).rc += 1;
        self.slot_mut(lo).rc += 1;
        debug!("intern_internal({}, {}, {}) -> new node {}", var, hi, lo, id);
        id
    }

    /// Increments the reference count of a node.
    pub fn retain(&mut self, id: NodeId) {
        self.slot_mut(id).rc += 1;
    }

    /// Decrements the reference count of a node; on reaching zero the node is
    /// evicted from its unique table, its slot freed, and its children
    /// released recursively.
    ///
    /// # Panics
    ///
    /// Panics if the count is already zero (double release).
    pub fn release(&mut self, id: NodeId) {
        let slot = self.slot_mut(id);
        assert!(slot.rc > 0, "Release of node {} whose count is already zero", id);
        slot.rc -= 1;
        if slot.rc > 0 {
            return;
        }

        let node = self.slots[id.index()].take().expect("slot vanished during release").node;
        self.min_free = self.min_free.min(id.index());
        self.live -= 1;

        match node {
            Node::Terminal(v) => {
                self.terminals.remove(&v);
                debug!("release: freed terminal {}", id);
            }
            Node::Internal { var, hi, lo } => {
                self.internals.remove(&(var, hi, lo));
                debug!("release: freed internal {} ({}, {}, {})", id, var, hi, lo);
                self.release(hi);
                self.release(lo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_interning() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let a = store.intern_terminal(7);
        let b = store.intern_terminal(7);
        let c = store.intern_terminal(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.num_live(), 2);
        assert_eq!(store.value(a), &7);
    }

    #[test]
    fn test_internal_interning() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t0 = store.intern_terminal(0);
        let t1 = store.intern_terminal(1);
        let a = store.intern_internal(Var::new(0), t1, t0);
        let b = store.intern_internal(Var::new(0), t1, t0);
        assert_eq!(a, b);
        assert_eq!(store.num_live(), 3);
        assert_eq!(store.variable(a), Var::new(0));
        assert_eq!(store.hi(a), t1);
        assert_eq!(store.lo(a), t0);
    }

    #[test]
    fn test_reduction_rule() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t = store.intern_terminal(5);
        let n = store.intern_internal(Var::new(3), t, t);
        assert_eq!(n, t);
        assert_eq!(store.num_live(), 1);
    }

    #[test]
    #[should_panic(expected = "Variable order violated")]
    fn test_order_violation() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t0 = store.intern_terminal(0);
        let t1 = store.intern_terminal(1);
        let inner = store.intern_internal(Var::new(1), t1, t0);
        store.intern_internal(Var::new(1), inner, t0);
    }

    #[test]
    fn test_release_cascade() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t0 = store.intern_terminal(0);
        let t1 = store.intern_terminal(1);
        let inner = store.intern_internal(Var::new(1), t1, t0);
        let root = store.intern_internal(Var::new(0), inner, t0);
        store.retain(root);
        assert_eq!(store.num_live(), 4);

        store.release(root);
        assert_eq!(store.num_live(), 0);
    }

    #[test]
    fn test_shared_child_survives() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t0 = store.intern_terminal(0);
        let t1 = store.intern_terminal(1);
        let shared = store.intern_internal(Var::new(2), t1, t0);
        let a = store.intern_internal(Var::new(0), shared, t0);
        let b = store.intern_internal(Var::new(1), shared, t1);
        store.retain(a);
        store.retain(b);

        store.release(a);
        // `shared` is still referenced by `b`.
        assert!(store.is_live(shared));
        assert!(store.is_live(b));

        store.release(b);
        assert_eq!(store.num_live(), 0);
    }

    #[test]
    fn test_slot_reuse_after_release() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t = store.intern_terminal(3);
        store.retain(t);
        store.release(t);
        assert_eq!(store.num_live(), 0);

        // A later allocation may reuse the slot; canonicity starts afresh.
        let t2 = store.intern_terminal(4);
        assert!(store.is_live(t2));
        assert_eq!(store.value(t2), &4);
    }

    #[test]
    #[should_panic(expected = "is not live")]
    fn test_double_release() {
        let mut store: NodeStore<u32> = NodeStore::new();
        let t = store.intern_terminal(1);
        store.retain(t);
        store.release(t);
        store.release(t);
    }
}
