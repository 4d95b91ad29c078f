use crate::types::{NodeId, Var};

/// An MTBDD node.
///
/// # Variants
///
/// - `Terminal`: carries a leaf value of the caller's value domain `V`.
/// - `Internal`: a decision on `var` with a `hi` child (arc for `var = 1`)
///   and a `lo` child (arc for `var = 0`).
///
/// # Structure
///
/// Each internal node represents a Shannon decomposition over the leaf
/// domain:
/// ```text
/// f = if var then f_hi else f_lo
/// ```
///
/// # Invariants (reduced-ordered form)
///
/// - `var` is strictly less than the top variables of both children.
/// - `hi != lo` (no redundant tests).
///
/// Both are enforced by the node store; a `Node` value outside the store is
/// just plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<V> {
    Terminal(V),
    Internal { var: Var, hi: NodeId, lo: NodeId },
}

impl<V> Node<V> {
    /// Returns `true` for terminal nodes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal(_))
    }

    /// Returns the decision variable, or `None` for terminals.
    pub fn var(&self) -> Option<Var> {
        match self {
            Node::Terminal(_) => None,
            Node::Internal { var, .. } => Some(*var),
        }
    }

    /// Returns the leaf value, or `None` for internal nodes.
    pub fn value(&self) -> Option<&V> {
        match self {
            Node::Terminal(v) => Some(v),
            Node::Internal { .. } => None,
        }
    }

    /// Returns `(hi, lo)` children, or `None` for terminals.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Node::Terminal(_) => None,
            Node::Internal { hi, lo, .. } => Some((*hi, *lo)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal() {
        let node: Node<u32> = Node::Terminal(7);
        assert!(node.is_terminal());
        assert_eq!(node.value(), Some(&7));
        assert_eq!(node.var(), None);
        assert_eq!(node.children(), None);
    }

    #[test]
    fn test_internal() {
        let node: Node<u32> = Node::Internal {
            var: Var::new(2),
            hi: NodeId::new(5),
            lo: NodeId::new(6),
        };
        assert!(!node.is_terminal());
        assert_eq!(node.var(), Some(Var::new(2)));
        assert_eq!(node.children(), Some((NodeId::new(5), NodeId::new(6))));
        assert_eq!(node.value(), None);
    }
}
