//! # mtbdd-rs: Shared Multi-Terminal Binary Decision Diagrams in Rust
//!
//! **`mtbdd-rs`** is a manager-centric library for working with **shared
//! multi-terminal binary decision diagrams (MTBDDs)**: canonical DAG
//! representations of functions from Boolean variable assignments to values
//! of an arbitrary leaf domain.
//!
//! ## What is an MTBDD?
//!
//! A multi-terminal BDD generalizes an ordinary BDD: instead of the two
//! terminals `0` and `1`, leaves carry values of a caller-chosen type `V`.
//! For a fixed variable ordering, every such function has exactly one
//! reduced representation, which makes equality checks a pointer comparison
//! and keeps structurally equal sub-functions physically shared.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: all operations go through the
//!   [`Mtbdd`][crate::mtbdd::Mtbdd] facade. One hash-consed node store is
//!   shared by every diagram of a facade, so isomorphic sub-diagrams are the
//!   same node.
//! - **Reference-Counted Store**: diagrams are reclaimed the moment their
//!   last root handle is erased, without ever breaking canonicity of what
//!   stays live.
//! - **Generic Apply Kernel**: monadic, binary and ternary apply over plain
//!   closures, plus projection (existential abstraction under a merge
//!   operation), variable renaming and single-variable reindexing.
//! - **Three-Valued Assignments**: lookups and bulk writes address paths
//!   with [`VarAssignment`][crate::assignment::VarAssignment] strings over
//!   `{0, 1, X}`, where `X` means *don't care*.
//! - **Persistence**: a forest of named roots round-trips through a compact
//!   byte string, and renders to Graphviz Dot for inspection.
//!
//! ## Basic Usage
//!
//! ```
//! use mtbdd_rs::mtbdd::Mtbdd;
//! use mtbdd_rs::assignment::VarAssignment;
//!
//! // 1. Create the manager; unwritten paths read the background value 0.
//! let mtbdd: Mtbdd<u64> = Mtbdd::with_default(0);
//!
//! // 2. Create a root and store values under concrete paths.
//! let root = mtbdd.create_root();
//! let path: VarAssignment = "1011".parse().unwrap();
//! mtbdd.set_value(root, &path, 14);
//!
//! // 3. Look values back up; don't-cares collect every reachable leaf.
//! assert_eq!(mtbdd.get_value(root, &path), vec![14]);
//! assert_eq!(mtbdd.get_value(root, &"0000".parse().unwrap()), vec![0]);
//!
//! // 4. Lift a leaf operation over the whole diagram.
//! let doubled = mtbdd.apply_1(root, |v| v * 2);
//! assert_eq!(mtbdd.get_value(doubled, &path), vec![28]);
//!
//! // 5. Release what you hold.
//! mtbdd.erase_root(doubled);
//! mtbdd.erase_root(root);
//! ```
//!
//! ## Core Components
//!
//! - **[`mtbdd`]**: the [`Mtbdd`][crate::mtbdd::Mtbdd] facade — roots,
//!   lookups, updates and inspection.
//! - **[`apply`]**: the recursive operation kernel (apply, projection,
//!   renaming).
//! - **[`store`]**: the hash-consed, reference-counted node store.
//! - **[`cache`]**: the bounded computed table memoizing recursive calls.
//! - **[`assignment`]**: packed three-valued variable assignments.
//! - **[`serialize`]**: byte-string forest round-tripping.
//! - **[`dot`]**: Graphviz export.

pub mod apply;
pub mod assignment;
pub mod cache;
pub mod dot;
pub mod mtbdd;
pub mod node;
pub mod serialize;
pub mod store;
pub mod types;

pub use crate::assignment::{VarAssignment, VarValue};
pub use crate::mtbdd::Mtbdd;
pub use crate::types::{NodeId, RootId, Var};
