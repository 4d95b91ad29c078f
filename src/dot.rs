//! Graphviz (Dot) export of a forest of named roots.
//!
//! Rendering conventions: one labelled start arrow per root, internal nodes
//! labelled with their variable index and grouped per level, terminals as
//! squares at the sink rank labelled through the caller's name table (the
//! value's `Display` form where no name is given). Solid edges depict the
//! `then` arc, dashed edges the `else` arc.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::types::{NodeId, RootId};

impl<V> Mtbdd<V>
where
    V: Clone + Eq + std::hash::Hash + std::fmt::Display,
{
    /// Renders the diagrams named in `roots` as a Dot graph description.
    pub fn to_dot(&self, roots: &[(&str, RootId)], terminal_names: &HashMap<V, String>) -> Result<String, std::fmt::Error> {
        let root_nodes: Vec<NodeId> = roots.iter().map(|&(_, h)| self.root_node(h)).collect();
        let all_nodes = self.descendants(root_nodes.iter().copied());

        let mut dot = String::new();
        writeln!(dot, "digraph mtbdd {{")?;
        writeln!(dot, "node [shape=circle, fixedsize=true];")?;

        // Roots
        writeln!(dot, "{{ rank=source")?;
        for (i, &(name, _)) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape=rect, label=\"{}\"];", i, name)?;
        }
        writeln!(dot, "}}")?;

        // Internal nodes per level
        let mut levels = BTreeMap::<u32, Vec<NodeId>>::new();
        for &id in all_nodes.iter() {
            let store = self.store.borrow();
            if let Node::Internal { var, .. } = store.node(id) {
                levels.entry(var.index()).or_default().push(id);
            }
        }
        for (var, level) in &levels {
            writeln!(dot, "{{ rank=same")?;
            for &id in level.iter() {
                writeln!(dot, "{} [label=<x<SUB>{}</SUB>>];", id.raw(), var)?;
            }
            writeln!(dot, "}}")?;
        }

        // Terminals
        writeln!(dot, "{{ rank=sink")?;
        for &id in all_nodes.iter() {
            let store = self.store.borrow();
            if let Node::Terminal(v) = store.node(id) {
                let label = terminal_names.get(v).cloned().unwrap_or_else(|| v.to_string());
                writeln!(dot, "{} [shape=square, label=\"{}\"];", id.raw(), label)?;
            }
        }
        writeln!(dot, "}}")?;

        // Edges: solid for `then`, dashed for `else`.
        for &id in all_nodes.iter() {
            let children = {
                let store = self.store.borrow();
                store.node(id).children()
            };
            if let Some((hi, lo)) = children {
                writeln!(dot, "{} -> {};", id.raw(), hi.raw())?;
                writeln!(dot, "{} -> {} [style=dashed];", id.raw(), lo.raw())?;
            }
        }

        // Root arrows
        for (i, &node) in root_nodes.iter().enumerate() {
            writeln!(dot, "r{} -> {};", i, node.raw())?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }

    /// Writes the Dot description of `roots` to a file.
    ///
    /// File-system failures propagate to the caller.
    pub fn write_dot_file<P: AsRef<Path>>(
        &self,
        path: P,
        roots: &[(&str, RootId)],
        terminal_names: &HashMap<V, String>,
    ) -> io::Result<()> {
        let dot = self
            .to_dot(roots, terminal_names)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, dot)
    }
}
