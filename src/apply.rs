//! The recursive operation kernel.
//!
//! Every algorithm here is a descent over one, two or three diagrams with
//! the same skeleton: handle the all-terminal case with the caller's leaf
//! functor, probe the computed table, split every operand on the minimum top
//! variable, recurse on the cofactors, rebuild through the node store (which
//! applies the reduction rule) and memoize the result.
//!
//! Leaf functors are plain closures, monomorphized per call site. A stateful
//! functor (e.g. a collector) is fine: `FnMut` is accepted everywhere.
//!
//! Transform operations bind their result to a fresh root handle before
//! returning and then [`Mtbdd::sweep`] any intermediate diagrams, so a
//! closed `create_root`/`erase_root` sequence leaves the node store exactly
//! as it found it.

use log::debug;

use crate::assignment::VarAssignment;
use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::types::{NodeId, OpTag, RootId, Var};

impl<V> Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash,
{
    // ------------------------------------------------------------------
    // Monadic / binary / ternary apply
    // ------------------------------------------------------------------

    /// Lifts a unary leaf operation over a diagram.
    ///
    /// The result is bound to a fresh root handle.
    pub fn apply_1(&self, h: RootId, mut f: impl FnMut(&V) -> V) -> RootId {
        let n = self.root_node(h);
        let tag = self.fresh_tag();
        debug!("apply_1({}) tag {}", h, tag);
        let r = self.apply_1_node(n, tag, &mut f);
        self.adopt_root(r)
    }

    pub(crate) fn apply_1_node<F>(&self, n: NodeId, tag: OpTag, f: &mut F) -> NodeId
    where
        F: FnMut(&V) -> V,
    {
        let node = self.store.borrow().node(n).clone();
        match node {
            Node::Terminal(v) => {
                let value = f(&v);
                self.mk_terminal(value)
            }
            Node::Internal { var, hi, lo } => {
                if let Some(r) = self.cache.borrow_mut().get1(tag, n) {
                    return r;
                }
                let t = self.apply_1_node(hi, tag, f);
                let e = self.apply_1_node(lo, tag, f);
                let r = self.mk_node(var, t, e);
                self.cache.borrow_mut().insert1(tag, n, r);
                r
            }
        }
    }

    /// Lifts a binary leaf operation over two diagrams.
    ///
    /// The result is bound to a fresh root handle.
    pub fn apply_2(&self, lhs: RootId, rhs: RootId, mut f: impl FnMut(&V, &V) -> V) -> RootId {
        let a = self.root_node(lhs);
        let b = self.root_node(rhs);
        let tag = self.fresh_tag();
        debug!("apply_2({}, {}) tag {}", lhs, rhs, tag);
        let r = self.apply_2_node(a, b, tag, &mut f);
        self.adopt_root(r)
    }

    pub(crate) fn apply_2_node<F>(&self, a: NodeId, b: NodeId, tag: OpTag, f: &mut F) -> NodeId
    where
        F: FnMut(&V, &V) -> V,
    {
        let (na, nb) = {
            let store = self.store.borrow();
            (store.node(a).clone(), store.node(b).clone())
        };
        if let (Node::Terminal(va), Node::Terminal(vb)) = (&na, &nb) {
            let value = f(va, vb);
            return self.mk_terminal(value);
        }
        if let Some(r) = self.cache.borrow_mut().get2(tag, a, b) {
            return r;
        }

        let m = [na.var(), nb.var()].into_iter().flatten().min().expect("some operand is internal");
        let (a1, a0) = self.cofactors(a, m);
        let (b1, b0) = self.cofactors(b, m);

        let t = self.apply_2_node(a1, b1, tag, f);
        let e = self.apply_2_node(a0, b0, tag, f);
        let r = self.mk_node(m, t, e);

        self.cache.borrow_mut().insert2(tag, a, b, r);
        r
    }

    /// Lifts a ternary leaf operation over three diagrams.
    ///
    /// The result is bound to a fresh root handle.
    pub fn apply_3(&self, ha: RootId, hb: RootId, hc: RootId, mut f: impl FnMut(&V, &V, &V) -> V) -> RootId {
        let a = self.root_node(ha);
        let b = self.root_node(hb);
        let c = self.root_node(hc);
        let tag = self.fresh_tag();
        debug!("apply_3({}, {}, {}) tag {}", ha, hb, hc, tag);
        let r = self.apply_3_node(a, b, c, tag, &mut f);
        self.adopt_root(r)
    }

    pub(crate) fn apply_3_node<F>(&self, a: NodeId, b: NodeId, c: NodeId, tag: OpTag, f: &mut F) -> NodeId
    where
        F: FnMut(&V, &V, &V) -> V,
    {
        let (na, nb, nc) = {
            let store = self.store.borrow();
            (store.node(a).clone(), store.node(b).clone(), store.node(c).clone())
        };
        if let (Node::Terminal(va), Node::Terminal(vb), Node::Terminal(vc)) = (&na, &nb, &nc) {
            let value = f(va, vb, vc);
            return self.mk_terminal(value);
        }
        if let Some(r) = self.cache.borrow_mut().get3(tag, a, b, c) {
            return r;
        }

        let m = [na.var(), nb.var(), nc.var()]
            .into_iter()
            .flatten()
            .min()
            .expect("some operand is internal");
        let (a1, a0) = self.cofactors(a, m);
        let (b1, b0) = self.cofactors(b, m);
        let (c1, c0) = self.cofactors(c, m);

        let t = self.apply_3_node(a1, b1, c1, tag, f);
        let e = self.apply_3_node(a0, b0, c0, tag, f);
        let r = self.mk_node(m, t, e);

        self.cache.borrow_mut().insert3(tag, a, b, c, r);
        r
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    /// Existentially abstracts every variable selected by `pred`, merging
    /// the two cofactors of an abstracted variable with `merge`.
    ///
    /// The result is bound to a fresh root handle; its variable set is the
    /// original minus the selected indices.
    pub fn project(&self, h: RootId, pred: impl Fn(Var) -> bool, mut merge: impl FnMut(&V, &V) -> V) -> RootId {
        let n = self.root_node(h);
        let ptag = self.fresh_tag();
        let mtag = self.fresh_tag();
        debug!("project({}) tags {}/{}", h, ptag, mtag);

        let r = self.project_node(n, ptag, mtag, &pred, &mut merge);
        let root = self.adopt_root(r);
        self.sweep();
        root
    }

    fn project_node<P, F>(&self, n: NodeId, ptag: OpTag, mtag: OpTag, pred: &P, merge: &mut F) -> NodeId
    where
        P: Fn(Var) -> bool,
        F: FnMut(&V, &V) -> V,
    {
        let node = self.store.borrow().node(n).clone();
        let (var, hi, lo) = match node {
            Node::Terminal(_) => return n,
            Node::Internal { var, hi, lo } => (var, hi, lo),
        };

        if let Some(r) = self.cache.borrow_mut().get1(ptag, n) {
            return r;
        }

        let t = self.project_node(hi, ptag, mtag, pred, merge);
        let e = self.project_node(lo, ptag, mtag, pred, merge);
        let r = if pred(var) {
            self.apply_2_node(t, e, mtag, merge)
        } else {
            self.mk_node(var, t, e)
        };

        self.cache.borrow_mut().insert1(ptag, n, r);
        r
    }

    // ------------------------------------------------------------------
    // Renaming
    // ------------------------------------------------------------------

    /// Renames variables through `pi`.
    ///
    /// `pi` must be injective and return the variable unchanged where no
    /// renaming is intended; images must not collide with indices that stay.
    /// When `pi` preserves the variable order on the support, the diagram is
    /// rebuilt structurally in one pass; otherwise the engine falls back to
    /// re-inserting the diagram's minimum description path by path.
    ///
    /// The result is bound to a fresh root handle.
    pub fn rename(&self, h: RootId, pi: impl Fn(Var) -> Var) -> RootId {
        let n = self.root_node(h);
        let support = self.support(n);
        let images: Vec<Var> = support.iter().map(|&v| pi(v)).collect();
        let order_preserving = images.windows(2).all(|w| w[0] < w[1]);
        debug!("rename({}): support {:?}, order preserving: {}", h, support, order_preserving);

        let r = if order_preserving {
            let tag = self.fresh_tag();
            self.rename_node(n, tag, &pi)
        } else {
            // The rebuild remaps paths over the pre-rename variable count.
            self.rename_rebuild(h, &pi)
        };
        if let Some(max) = images.iter().max() {
            self.note_vars(max.index() + 1);
        }
        let root = self.adopt_root(r);
        self.sweep();
        root
    }

    fn rename_node<P>(&self, n: NodeId, tag: OpTag, pi: &P) -> NodeId
    where
        P: Fn(Var) -> Var,
    {
        let node = self.store.borrow().node(n).clone();
        let (var, hi, lo) = match node {
            Node::Terminal(_) => return n,
            Node::Internal { var, hi, lo } => (var, hi, lo),
        };

        if let Some(r) = self.cache.borrow_mut().get1(tag, n) {
            return r;
        }

        let t = self.rename_node(hi, tag, pi);
        let e = self.rename_node(lo, tag, pi);
        let r = self.mk_node(pi(var), t, e);

        self.cache.borrow_mut().insert1(tag, n, r);
        r
    }

    /// Generic rename path: re-insert the minimum description bottom-up
    /// under remapped path assignments.
    fn rename_rebuild<P>(&self, h: RootId, pi: &P) -> NodeId
    where
        P: Fn(Var) -> Var,
    {
        let vc = self.var_count() as usize;
        let new_len = (0..vc as u32)
            .map(|i| pi(Var::new(i)).index() + 1)
            .max()
            .unwrap_or(0)
            .max(vc as u32) as usize;

        let mut acc = self.background_node();
        for (path, value) in self.describe(h) {
            let mut remapped = VarAssignment::universal(new_len);
            for i in 0..vc {
                remapped.set(pi(Var::new(i as u32)).index() as usize, path.get(i));
            }
            let leaf = self.mk_terminal(value);
            let tag = self.fresh_tag();
            acc = self.write_rec(acc, &remapped, 0, leaf, tag);
        }
        acc
    }

    /// Moves the single variable `old` to index `new`.
    ///
    /// `new` must not occur in the diagram. Renaming a variable outside the
    /// support (or onto itself) is a no-op up to handle identity.
    ///
    /// The result is bound to a fresh root handle.
    pub fn reindex(&self, h: RootId, old: Var, new: Var) -> RootId {
        let n = self.root_node(h);
        debug!("reindex({}, {} -> {})", h, old, new);

        if old == new || !self.support(n).contains(&old) {
            return self.adopt_root(n);
        }
        self.note_vars(new.index() + 1);

        let tag_hi = self.fresh_tag();
        let tag_lo = self.fresh_tag();
        let f1 = self.restrict_node(n, old, true, tag_hi);
        let f0 = self.restrict_node(n, old, false, tag_lo);

        let wtag = self.fresh_tag();
        let r = self.weave_node(new, f1, f0, wtag);
        let root = self.adopt_root(r);
        self.sweep();
        root
    }

    /// Replaces every test of `var` by its `sense` cofactor.
    fn restrict_node(&self, n: NodeId, var: Var, sense: bool, tag: OpTag) -> NodeId {
        let node = self.store.borrow().node(n).clone();
        let (v, hi, lo) = match node {
            Node::Terminal(_) => return n,
            Node::Internal { var, hi, lo } => (var, hi, lo),
        };
        if v > var {
            // Ordered: `var` cannot occur below this node.
            return n;
        }
        if v == var {
            return if sense { hi } else { lo };
        }

        if let Some(r) = self.cache.borrow_mut().get1(tag, n) {
            return r;
        }
        let t = self.restrict_node(hi, var, sense, tag);
        let e = self.restrict_node(lo, var, sense, tag);
        let r = self.mk_node(v, t, e);
        self.cache.borrow_mut().insert1(tag, n, r);
        r
    }

    /// Builds `if var then t else e` with `var` inserted at its ordered
    /// position. Neither `t` nor `e` may test `var`.
    fn weave_node(&self, var: Var, t: NodeId, e: NodeId, tag: OpTag) -> NodeId {
        if t == e {
            return t;
        }
        if let Some(r) = self.cache.borrow_mut().get2(tag, t, e) {
            return r;
        }

        let top = {
            let store = self.store.borrow();
            [store.top_var(t), store.top_var(e)].into_iter().flatten().min()
        };
        let r = match top {
            Some(m) if m < var => {
                let (t1, t0) = self.cofactors(t, m);
                let (e1, e0) = self.cofactors(e, m);
                let rt = self.weave_node(var, t1, e1, tag);
                let re = self.weave_node(var, t0, e0, tag);
                self.mk_node(m, rt, re)
            }
            _ => self.mk_node(var, t, e),
        };

        self.cache.borrow_mut().insert2(tag, t, e, r);
        r
    }
}

impl<V> Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash + From<bool>,
{
    // ------------------------------------------------------------------
    // Indicator diagrams
    // ------------------------------------------------------------------

    /// The elementary diagram for variable `var`: the one-value where
    /// `var = 1`, the zero-value otherwise. The node is returned retained.
    pub fn add_ith_variable(&self, var: Var) -> NodeId {
        self.note_vars(var.index() + 1);
        let one = self.mk_terminal(V::from(true));
        let zero = self.mk_terminal(V::from(false));
        let node = self.mk_node(var, one, zero);
        self.retain(node);
        node
    }

    /// The complement of an indicator diagram: the zero-value leaves become
    /// one, every other leaf becomes zero. The node is returned retained.
    pub fn add_complement(&self, n: NodeId) -> NodeId {
        let tag = self.fresh_tag();
        let zero = V::from(false);
        let r = self.apply_1_node(n, tag, &mut |v| {
            if *v == zero {
                V::from(true)
            } else {
                V::from(false)
            }
        });
        self.retain(r);
        r
    }

    /// Pointwise product of a value diagram with a Boolean indicator
    /// diagram: where the indicator is one the value passes through, where
    /// it is anything else the result is the zero-value. The node is
    /// returned retained.
    pub fn times(&self, values: NodeId, indicator: NodeId) -> NodeId {
        let tag = self.fresh_tag();
        let one = V::from(true);
        let r = self.apply_2_node(values, indicator, tag, &mut |v, ind| {
            if *ind == one {
                v.clone()
            } else {
                V::from(false)
            }
        });
        self.retain(r);
        r
    }
}
