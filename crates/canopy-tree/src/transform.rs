//! Default transformation of a node's children.
//!
//! A `Transformer` visits a node through its most specific
//! `transform_<kind>` method. Unless overridden, every method defers to the
//! parent kind's method and finally to `transform_element`, which calls
//! `transform_children`: each transformable child field is visited in
//! declaration order and the returned node is written back in place.

use smallvec::SmallVec;

use crate::context::TreeContext;
use crate::error::TreeResult;
use crate::kinds::{Transformer, dispatch_transform};
use crate::refs::NodeRef;
use crate::values::FieldValue;

/// Transform `root`, returning the node that should take its place.
pub fn transform<D, T>(
    ctx: &mut TreeContext,
    root: NodeRef,
    transformer: &mut T,
    data: &mut D,
) -> TreeResult<NodeRef>
where
    T: Transformer<D> + ?Sized,
{
    dispatch_transform(ctx, root, transformer, data)
}

/// Visit every child field of `node` that takes part in the default
/// transform: fields marked `with_transform`, or every child field when the
/// kind transforms other children.
///
/// List elements are substituted in place, preserving order. An element the
/// visit removed from the list is skipped.
pub fn transform_children<D, T>(
    ctx: &mut TreeContext,
    node: NodeRef,
    transformer: &mut T,
    data: &mut D,
) -> TreeResult<()>
where
    T: Transformer<D> + ?Sized,
{
    let slots: SmallVec<[usize; 8]> = ctx
        .layout(node)
        .transformed_fields()
        .map(|(slot, _)| slot)
        .collect();

    for slot in slots {
        match ctx.slot_value(node, slot).clone() {
            FieldValue::Node(child) => {
                let result = dispatch_transform(ctx, child, transformer, data)?;
                if result != child {
                    ctx.write_transformed(node, slot, result)?;
                }
            }
            FieldValue::Nodes(children) => {
                for child in children {
                    let result = dispatch_transform(ctx, child, transformer, data)?;
                    if result != child {
                        ctx.write_transformed_element(node, slot, child, result)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
