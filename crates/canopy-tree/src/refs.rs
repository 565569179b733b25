//! Entity references for the node arena.
//!
//! `NodeRef` is a thin `u32` index into a single `TreeContext`. `SymbolId`
//! and `TreeId` are process-wide so they stay meaningful across trees.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use cranelift_entity::entity_impl;

/// Reference to a node in a `TreeContext` arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(u32);
entity_impl!(NodeRef, "node");

/// Stable identity of a declaration, independent of the node currently
/// bound to it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);
entity_impl!(SymbolId, "sym");

static NEXT_SYMBOL: AtomicU32 = AtomicU32::new(0);

impl SymbolId {
    /// Allocate a symbol never handed out before in this process.
    pub fn fresh() -> Self {
        SymbolId::from_u32(NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of one `TreeContext`, used to qualify cross-tree references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(u32);

static NEXT_TREE: AtomicU32 = AtomicU32::new(0);

impl TreeId {
    pub(crate) fn fresh() -> Self {
        TreeId(NEXT_TREE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = SymbolId::fresh();
        let b = SymbolId::fresh();
        assert_ne!(a, b);
        assert_ne!(TreeId::fresh(), TreeId::fresh());
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(NodeRef::from_u32(3).to_string(), "node3");
        assert_eq!(SymbolId::from_u32(7).to_string(), "sym7");
    }
}
