//! Symbol indirection between references and declarations.
//!
//! References never point at declaration nodes directly. They carry a
//! `SymbolId`, and a `SymbolLookup` maps it to the declaration currently
//! bound to it, possibly in another tree and another phase.

use dashmap::DashMap;
use tracing::trace;

use crate::context::TreeContext;
use crate::error::{TreeError, TreeResult};
use crate::refs::{NodeRef, SymbolId, TreeId};

/// A declaration node, qualified by the tree that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeclarationRef {
    pub tree: TreeId,
    pub node: NodeRef,
}

/// Lookup contract between trees and whatever stores symbol bindings.
///
/// Implementations must allow concurrent calls from per-unit pipelines
/// running in parallel.
pub trait SymbolLookup: Send + Sync {
    /// Declaration currently bound to `symbol`, or `None` if unbound.
    fn resolve(&self, symbol: SymbolId) -> Option<DeclarationRef>;

    /// Bind `symbol`, returning the previous binding.
    fn bind(&self, symbol: SymbolId, declaration: DeclarationRef) -> Option<DeclarationRef>;

    fn unbind(&self, symbol: SymbolId) -> Option<DeclarationRef>;
}

/// Shared in-memory symbol table.
#[derive(Default)]
pub struct SymbolTable {
    bindings: DashMap<SymbolId, DeclarationRef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl SymbolLookup for SymbolTable {
    fn resolve(&self, symbol: SymbolId) -> Option<DeclarationRef> {
        self.bindings.get(&symbol).map(|entry| *entry)
    }

    fn bind(&self, symbol: SymbolId, declaration: DeclarationRef) -> Option<DeclarationRef> {
        trace!(%symbol, tree = %declaration.tree, node = %declaration.node, "bind symbol");
        self.bindings.insert(symbol, declaration)
    }

    fn unbind(&self, symbol: SymbolId) -> Option<DeclarationRef> {
        self.bindings.remove(&symbol).map(|(_, declaration)| declaration)
    }
}

const SYMBOL_FIELD: &str = "symbol";

impl TreeContext {
    /// The symbol a declaration node declares, if its kind has one.
    pub fn declared_symbol(&self, node: NodeRef) -> Option<SymbolId> {
        self.get(node, SYMBOL_FIELD)
            .ok()
            .and_then(|value| value.as_symbol())
    }

    pub fn declaration_ref(&self, node: NodeRef) -> DeclarationRef {
        DeclarationRef {
            tree: self.id(),
            node,
        }
    }

    /// Bind the symbol declared by `node` to it.
    pub fn declare_symbol(
        &self,
        node: NodeRef,
        table: &dyn SymbolLookup,
    ) -> TreeResult<SymbolId> {
        let symbol = self
            .get(node, SYMBOL_FIELD)?
            .as_symbol()
            .ok_or_else(|| TreeError::UnknownField {
                kind: self.kind(node),
                field: SYMBOL_FIELD.to_string(),
            })?;
        table.bind(symbol, self.declaration_ref(node));
        Ok(symbol)
    }

    /// Rebind the symbol of a replaced declaration to its replacement.
    ///
    /// The replacement must declare the same symbol, so every reference to
    /// the old declaration keeps resolving.
    pub fn rebind_replaced_declaration(
        &self,
        old: NodeRef,
        new: NodeRef,
        table: &dyn SymbolLookup,
    ) -> TreeResult<SymbolId> {
        let symbol = self
            .declared_symbol(old)
            .ok_or_else(|| TreeError::UnknownField {
                kind: self.kind(old),
                field: SYMBOL_FIELD.to_string(),
            })?;
        if self.declared_symbol(new) != Some(symbol) {
            return Err(TreeError::SymbolMismatch {
                node: new,
                expected: symbol,
            });
        }
        table.bind(symbol, self.declaration_ref(new));
        Ok(symbol)
    }
}

#[cfg(test)]
mod tests {
    use canopy_schema::Value;

    use super::*;
    use crate::builder::NodeBuilder;
    use crate::test_schema::{context, leaf};

    fn decl(ctx: &mut TreeContext, symbol: SymbolId, name: &str) -> NodeRef {
        NodeBuilder::new("Decl")
            .set("symbol", symbol)
            .set("name", Value::name(name))
            .build(ctx)
            .unwrap()
    }

    #[test]
    fn declare_and_resolve() {
        let table = SymbolTable::new();
        let mut ctx = context();
        let symbol = SymbolId::fresh();
        let node = decl(&mut ctx, symbol, "f");

        assert_eq!(table.resolve(symbol), None);
        assert_eq!(ctx.declare_symbol(node, &table), Ok(symbol));
        assert_eq!(
            table.resolve(symbol),
            Some(DeclarationRef {
                tree: ctx.id(),
                node,
            })
        );
        assert_eq!(table.len(), 1);

        let a = leaf(&mut ctx, "a");
        assert_eq!(ctx.declared_symbol(a), None);
        assert!(ctx.declare_symbol(a, &table).is_err());
    }

    #[test]
    fn rebinding_keeps_symbol_identity() {
        let table = SymbolTable::new();
        let mut ctx = context();
        let symbol = SymbolId::fresh();
        let old = decl(&mut ctx, symbol, "f");
        let new = decl(&mut ctx, symbol, "f");
        let unrelated = decl(&mut ctx, SymbolId::fresh(), "g");
        ctx.declare_symbol(old, &table).unwrap();

        assert_eq!(
            ctx.rebind_replaced_declaration(old, unrelated, &table),
            Err(TreeError::SymbolMismatch {
                node: unrelated,
                expected: symbol,
            })
        );
        assert_eq!(table.resolve(symbol).map(|d| d.node), Some(old));

        ctx.rebind_replaced_declaration(old, new, &table).unwrap();
        assert_eq!(table.resolve(symbol).map(|d| d.node), Some(new));
    }

    #[test]
    fn bindings_cross_trees() {
        let table = SymbolTable::new();
        let mut first = context();
        let mut second = context();
        let symbol = SymbolId::fresh();
        let node = decl(&mut second, symbol, "shared");
        second.declare_symbol(node, &table).unwrap();

        let found = table.resolve(symbol).unwrap();
        assert_eq!(found.tree, second.id());
        assert_ne!(found.tree, first.id());
        assert!(second.contains(found.node));

        let _ = leaf(&mut first, "a");
        assert_eq!(table.unbind(symbol), Some(found));
        assert!(table.is_empty());
    }
}
