//! Byte-string serialization of a forest of named roots.
//!
//! The codec writes a self-describing [`SerForest`]: the format version, the
//! background value, a node list in bottom-up order (children before
//! parents) and the named roots as indices into that list. Decoding
//! re-interns every node through the store, so a loaded forest is canonical
//! and shares sub-diagrams exactly like the original did.
//!
//! The encoding is engine-internal and only guaranteed to round-trip between
//! engine instances running the same code version; [`Mtbdd::from_bytes`]
//! rejects everything else.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::types::{NodeId, RootId, Var};

/// Version stamp embedded in every byte string.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerNode<V> {
    Terminal(V),
    Internal { var: u32, hi: u32, lo: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerForest<V> {
    version: u32,
    var_count: u32,
    background: V,
    /// Bottom-up: children precede parents.
    nodes: Vec<SerNode<V>>,
    roots: Vec<(String, u32)>,
}

/// Error type for forest encoding and decoding.
#[derive(Debug)]
pub enum CodecError {
    /// The value domain failed to encode.
    Encode(bincode::Error),
    /// The byte string is not a forest produced by this code version.
    Decode(bincode::Error),
    /// The byte string decoded, but its contents are inconsistent.
    Format(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Encode(e) => write!(f, "encode error: {}", e),
            CodecError::Decode(e) => write!(f, "decode error: {}", e),
            CodecError::Format(msg) => write!(f, "format error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

impl<V> Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash + Serialize + DeserializeOwned,
{
    /// Encodes the diagrams named in `roots` into a byte string.
    ///
    /// Shared sub-diagrams are written once.
    pub fn to_bytes(&self, roots: &[(&str, RootId)]) -> Result<Vec<u8>, CodecError> {
        let root_nodes: Vec<NodeId> = roots.iter().map(|&(_, h)| self.root_node(h)).collect();
        let order = self.descendants(root_nodes.iter().copied());

        let mut index: HashMap<NodeId, u32> = HashMap::with_capacity(order.len());
        let mut nodes = Vec::with_capacity(order.len());
        {
            let store = self.store.borrow();
            for (pos, &id) in order.iter().enumerate() {
                let ser = match store.node(id) {
                    Node::Terminal(v) => SerNode::Terminal(v.clone()),
                    Node::Internal { var, hi, lo } => SerNode::Internal {
                        var: var.index(),
                        hi: index[hi],
                        lo: index[lo],
                    },
                };
                nodes.push(ser);
                index.insert(id, pos as u32);
            }
        }

        let forest = SerForest {
            version: FORMAT_VERSION,
            var_count: self.var_count(),
            background: self.default_value(),
            nodes,
            roots: roots
                .iter()
                .zip(&root_nodes)
                .map(|(&(name, _), &node)| (name.to_string(), index[&node]))
                .collect(),
        };

        bincode::serialize(&forest).map_err(CodecError::Encode)
    }

    /// Decodes a byte string produced by [`Mtbdd::to_bytes`] into a fresh
    /// facade, returning a root handle for each requested name.
    ///
    /// On any error the partially constructed facade is discarded.
    pub fn from_bytes(bytes: &[u8], names: &[&str]) -> Result<(Self, HashMap<String, RootId>), CodecError> {
        let forest: SerForest<V> = bincode::deserialize(bytes).map_err(CodecError::Decode)?;
        if forest.version != FORMAT_VERSION {
            return Err(CodecError::Format(format!(
                "unsupported format version {} (expected {})",
                forest.version, FORMAT_VERSION
            )));
        }

        let mtbdd = Mtbdd::with_default(forest.background);
        mtbdd.note_vars(forest.var_count);

        // Rebuild bottom-up, re-interning through the store.
        let mut ids: Vec<NodeId> = Vec::with_capacity(forest.nodes.len());
        let mut tops: Vec<Option<u32>> = Vec::with_capacity(forest.nodes.len());
        for (pos, ser) in forest.nodes.into_iter().enumerate() {
            let (id, top) = match ser {
                SerNode::Terminal(v) => (mtbdd.mk_terminal(v), None),
                SerNode::Internal { var, hi, lo } => {
                    let fetch = |child: u32| -> Result<(NodeId, Option<u32>), CodecError> {
                        let i = child as usize;
                        if i >= pos {
                            return Err(CodecError::Format(format!(
                                "node {} references child {} before it is defined",
                                pos, child
                            )));
                        }
                        Ok((ids[i], tops[i]))
                    };
                    let (hi_id, hi_top) = fetch(hi)?;
                    let (lo_id, lo_top) = fetch(lo)?;
                    for child_top in [hi_top, lo_top].into_iter().flatten() {
                        if child_top <= var {
                            return Err(CodecError::Format(format!(
                                "node {} tests x{} above a child testing x{}",
                                pos, var, child_top
                            )));
                        }
                    }
                    (mtbdd.mk_node(Var::new(var), hi_id, lo_id), Some(var))
                }
            };
            ids.push(id);
            tops.push(top);
        }

        let decoded: HashMap<&str, u32> = forest.roots.iter().map(|(name, idx)| (name.as_str(), *idx)).collect();
        let mut handles = HashMap::with_capacity(names.len());
        for &name in names {
            let &idx = decoded
                .get(name)
                .ok_or_else(|| CodecError::Format(format!("root {:?} is not present in the byte string", name)))?;
            if idx as usize >= ids.len() {
                return Err(CodecError::Format(format!("root {:?} references node {} out of range", name, idx)));
            }
            handles.insert(name.to_string(), mtbdd.adopt_root(ids[idx as usize]));
        }

        // Diagrams of roots the caller did not ask for are dropped here.
        mtbdd.sweep();
        Ok((mtbdd, handles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::VarAssignment;

    fn asgn(s: &str) -> VarAssignment {
        s.parse().unwrap()
    }

    #[test]
    fn test_roundtrip_single_root() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        for (path, value) in [("0011", 3), ("0100", 4), ("1001", 9), ("1110", 14), ("1111", 15)] {
            mtbdd.set_value(root, &asgn(path), value);
        }

        let bytes = mtbdd.to_bytes(&[("root", root)]).unwrap();
        let (loaded, handles) = Mtbdd::<u32>::from_bytes(&bytes, &["root"]).unwrap();
        let loaded_root = handles["root"];

        for (path, value) in [("0011", 3), ("0100", 4), ("1001", 9), ("1110", 14), ("1111", 15), ("0000", 0)] {
            assert_eq!(loaded.get_value(loaded_root, &asgn(path)), vec![value]);
        }
        assert_eq!(loaded.var_count(), mtbdd.var_count());
        assert_eq!(loaded.dag_size(loaded_root), mtbdd.dag_size(root));
    }

    #[test]
    fn test_roundtrip_shares_nodes_across_roots() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let r1 = mtbdd.create_root();
        let r2 = mtbdd.create_root();
        mtbdd.set_value(r1, &asgn("11"), 5);
        mtbdd.set_value(r2, &asgn("11"), 5);

        let bytes = mtbdd.to_bytes(&[("a", r1), ("b", r2)]).unwrap();
        let (loaded, handles) = Mtbdd::<u32>::from_bytes(&bytes, &["a", "b"]).unwrap();
        assert_eq!(loaded.root_node(handles["a"]), loaded.root_node(handles["b"]));
    }

    #[test]
    fn test_unrequested_roots_are_dropped() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let keep = mtbdd.create_root();
        let toss = mtbdd.create_root();
        mtbdd.set_value(keep, &asgn("01"), 1);
        mtbdd.set_value(toss, &asgn("10"), 2);

        let bytes = mtbdd.to_bytes(&[("keep", keep), ("drop", toss)]).unwrap();
        let (loaded, handles) = Mtbdd::<u32>::from_bytes(&bytes, &["keep"]).unwrap();

        assert_eq!(handles.len(), 1);
        assert_eq!(loaded.get_value(handles["keep"], &asgn("01")), vec![1]);
        // Only the requested diagram survives (it already contains the
        // background terminal on its unwritten paths).
        assert_eq!(loaded.num_nodes(), loaded.dag_size(handles["keep"]));
    }

    #[test]
    fn test_missing_root_name_is_an_error() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(0);
        let root = mtbdd.create_root();
        let bytes = mtbdd.to_bytes(&[("root", root)]).unwrap();

        let err = Mtbdd::<u32>::from_bytes(&bytes, &["nope"]).unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
    }

    #[test]
    fn test_corrupt_bytes_are_an_error() {
        let err = Mtbdd::<u32>::from_bytes(&[0x13, 0x37, 0x00], &["root"]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_background_roundtrips() {
        let mtbdd: Mtbdd<u32> = Mtbdd::with_default(7);
        let root = mtbdd.create_root();
        mtbdd.set_value(root, &asgn("1"), 9);

        let bytes = mtbdd.to_bytes(&[("root", root)]).unwrap();
        let (loaded, handles) = Mtbdd::<u32>::from_bytes(&bytes, &["root"]).unwrap();
        assert_eq!(loaded.default_value(), 7);
        assert_eq!(loaded.get_value(handles["root"], &asgn("0")), vec![7]);
    }
}
