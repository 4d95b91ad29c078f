//! Bounded computed table for recursive-operation memoization.
//!
//! A direct-mapped cache: each key hashes to exactly one slot and collisions
//! overwrite the previous entry, so the table never grows past `2^bits`
//! slots. Eviction is therefore allowed at any time, which is exactly what
//! the engine's contract permits.
//!
//! # Keys and staleness
//!
//! Keys are `(tag, a, b, c)` where `tag` is the [`OpTag`] of one recursive
//! operation instance and `a`/`b`/`c` are operand node ids (unused operands
//! are a sentinel). Tags are never reused, and no node is released while a
//! single operation runs, so an entry can only be hit while every node it
//! mentions is still live. Entries left behind by finished operations are
//! unreachable and get recycled by slot overwrite.

use crate::types::{NodeId, OpTag};

/// Sentinel for an unused operand position.
const NO_OPERAND: u32 = u32::MAX;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    tag: u64,
    a: u32,
    b: u32,
    c: u32,
}

impl Key {
    /// Hashes the `(tag, a, b, c)` key by pairing the tag with the first
    /// operand and the remaining operands with each other, then pairing the
    /// two halves. Tags are small consecutive integers and operand ids are
    /// dense slot indices, so the pairing keeps neighbouring keys from
    /// piling into one slot the way a plain XOR of the components would.
    fn hash(&self) -> u64 {
        let ta = pair(self.tag, self.a as u64);
        let bc = pair(self.b as u64, self.c as u64);
        pair(ta, bc)
    }
}

/// Szudzik pairing with wrapping arithmetic: injective on small inputs,
/// well-mixed once the squares wrap.
fn pair(a: u64, b: u64) -> u64 {
    if a < b {
        // b * b + a
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        // a * a + a + b
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// A direct-mapped computed table of `2^bits` slots.
#[derive(Debug)]
pub struct OpCache {
    entries: Vec<Option<(Key, NodeId)>>,
    bitmask: u64,
    hits: usize,
    misses: usize,
}

impl Default for OpCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl OpCache {
    /// Creates a new cache with `2^bits` slots.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits must be in range 0..=31, got {}", bits);

        let size = 1usize << bits;
        Self {
            entries: (0..size).map(|_| None).collect(),
            bitmask: (size - 1) as u64,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of slots in the cache.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
    }

    fn probe(&mut self, key: Key) -> Option<NodeId> {
        let idx = (key.hash() & self.bitmask) as usize;
        match &self.entries[idx] {
            Some((k, v)) if *k == key => {
                self.hits += 1;
                Some(*v)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    fn store(&mut self, key: Key, value: NodeId) {
        let idx = (key.hash() & self.bitmask) as usize;
        self.entries[idx] = Some((key, value));
    }

    pub fn get1(&mut self, tag: OpTag, a: NodeId) -> Option<NodeId> {
        self.probe(Key {
            tag: tag.raw(),
            a: a.raw(),
            b: NO_OPERAND,
            c: NO_OPERAND,
        })
    }

    pub fn insert1(&mut self, tag: OpTag, a: NodeId, result: NodeId) {
        self.store(
            Key {
                tag: tag.raw(),
                a: a.raw(),
                b: NO_OPERAND,
                c: NO_OPERAND,
            },
            result,
        );
    }

    pub fn get2(&mut self, tag: OpTag, a: NodeId, b: NodeId) -> Option<NodeId> {
        self.probe(Key {
            tag: tag.raw(),
            a: a.raw(),
            b: b.raw(),
            c: NO_OPERAND,
        })
    }

    pub fn insert2(&mut self, tag: OpTag, a: NodeId, b: NodeId, result: NodeId) {
        self.store(
            Key {
                tag: tag.raw(),
                a: a.raw(),
                b: b.raw(),
                c: NO_OPERAND,
            },
            result,
        );
    }

    pub fn get3(&mut self, tag: OpTag, a: NodeId, b: NodeId, c: NodeId) -> Option<NodeId> {
        self.probe(Key {
            tag: tag.raw(),
            a: a.raw(),
            b: b.raw(),
            c: c.raw(),
        })
    }

    pub fn insert3(&mut self, tag: OpTag, a: NodeId, b: NodeId, c: NodeId, result: NodeId) {
        self.store(
            Key {
                tag: tag.raw(),
                a: a.raw(),
                b: b.raw(),
                c: c.raw(),
            },
            result,
        );
    }

    /// Lookup keyed by a node id and a plain index (used by path-directed
    /// rewrites, where the second key component is a position, not a node).
    pub fn get_indexed(&mut self, tag: OpTag, a: NodeId, index: u32) -> Option<NodeId> {
        self.probe(Key {
            tag: tag.raw(),
            a: a.raw(),
            b: index,
            c: NO_OPERAND,
        })
    }

    pub fn insert_indexed(&mut self, tag: OpTag, a: NodeId, index: u32, result: NodeId) {
        self.store(
            Key {
                tag: tag.raw(),
                a: a.raw(),
                b: index,
                c: NO_OPERAND,
            },
            result,
        );
    }
}
