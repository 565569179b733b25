//! Read-only traversal over the containment edges of a tree.
//!
//! Walks visit nodes depth-first, pre-order, following child fields in
//! declaration order. Reference fields are never followed.

use std::ops::ControlFlow;

use crate::context::TreeContext;
use crate::kinds::TreeNode;
use crate::refs::NodeRef;

/// Controls whether to descend into children during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Continue walking and descend into the node's children.
    Advance,
    /// Skip the children of the current node.
    Skip,
}

/// Direct children of `node`, in field declaration order.
pub fn children_of(ctx: &TreeContext, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
    ctx.field_values(node)
        .filter(|(def, _)| def.is_child)
        .flat_map(|(_, value)| value.node_refs().iter().copied())
}

/// Walk `node` and its descendants.
pub fn walk_node<B>(
    ctx: &TreeContext,
    node: NodeRef,
    f: &mut dyn FnMut(NodeRef) -> ControlFlow<B, WalkAction>,
) -> ControlFlow<B, ()> {
    match f(node) {
        ControlFlow::Break(b) => return ControlFlow::Break(b),
        ControlFlow::Continue(WalkAction::Skip) => return ControlFlow::Continue(()),
        ControlFlow::Continue(WalkAction::Advance) => {}
    }
    for child in children_of(ctx, node) {
        walk_node(ctx, child, f)?;
    }
    ControlFlow::Continue(())
}

/// Walk nodes of a specific kind (or its subtypes) below `root`.
pub fn walk_typed<T, B>(
    ctx: &TreeContext,
    root: NodeRef,
    f: &mut dyn FnMut(T) -> ControlFlow<B, WalkAction>,
) -> ControlFlow<B, ()>
where
    T: TreeNode,
{
    walk_node(ctx, root, &mut |node| {
        if let Ok(typed) = T::from_node(ctx, node) {
            f(typed)
        } else {
            ControlFlow::Continue(WalkAction::Advance)
        }
    })
}

/// Every node of the subtree rooted at `root`, pre-order.
pub fn subtree(ctx: &TreeContext, root: NodeRef) -> Vec<NodeRef> {
    let mut nodes = Vec::new();
    let _ = walk_node::<()>(ctx, root, &mut |node| {
        nodes.push(node);
        ControlFlow::Continue(WalkAction::Advance)
    });
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_schema::{context, group, leaf, pair};

    #[test]
    fn walks_children_in_declaration_order() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let b = leaf(&mut ctx, "b");
        let c = leaf(&mut ctx, "c");
        let g = group(&mut ctx, &[a, b]);
        let root = pair(&mut ctx, g, Some(c));
        // References are not followed.
        ctx.replace(c, "target", g).unwrap();

        assert_eq!(subtree(&ctx, root), [root, g, a, b, c]);
        assert_eq!(children_of(&ctx, root).collect::<Vec<_>>(), [g, c]);
    }

    #[test]
    fn skip_and_break() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let b = leaf(&mut ctx, "b");
        let g = group(&mut ctx, &[a]);
        let root = pair(&mut ctx, g, Some(b));

        let mut visited = Vec::new();
        let _ = walk_node::<()>(&ctx, root, &mut |node| {
            visited.push(node);
            if node == g {
                ControlFlow::Continue(WalkAction::Skip)
            } else {
                ControlFlow::Continue(WalkAction::Advance)
            }
        });
        assert_eq!(visited, [root, g, b]);

        let found = walk_node(&ctx, root, &mut |node| {
            if ctx.is_instance_of(node, "Leaf") {
                ControlFlow::Break(node)
            } else {
                ControlFlow::Continue(WalkAction::Advance)
            }
        });
        assert_eq!(found, ControlFlow::Break(a));
    }
}
