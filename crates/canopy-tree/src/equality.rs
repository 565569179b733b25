//! Structural comparison of subtrees, possibly across contexts.
//!
//! Two subtrees are equal when their kinds and field values match, children
//! compared recursively. Resolve state and diagnostics are ignored.
//! Reference fields compare the kind of their referents, since node
//! identities differ between contexts.

use crate::context::TreeContext;
use crate::refs::NodeRef;
use crate::values::FieldValue;

/// Whether subtree `a` of `ctx_a` and subtree `b` of `ctx_b` are equal.
pub fn structurally_equal(ctx_a: &TreeContext, a: NodeRef, ctx_b: &TreeContext, b: NodeRef) -> bool {
    first_difference(ctx_a, a, ctx_b, b).is_none()
}

/// Path to the first field where the subtrees differ, e.g.
/// `ArgumentList.arguments[0]: SimpleNamedReference.name: x != y`.
pub fn first_difference(
    ctx_a: &TreeContext,
    a: NodeRef,
    ctx_b: &TreeContext,
    b: NodeRef,
) -> Option<String> {
    let kind = ctx_a.kind(a);
    if kind != ctx_b.kind(b) {
        return Some(format!("{kind} != {}", ctx_b.kind(b)));
    }

    let fields_a = ctx_a.field_values(a);
    let fields_b = ctx_b.field_values(b).map(|(_, value)| value);
    for ((def, value_a), value_b) in fields_a.zip(fields_b) {
        let path = |suffix: String| Some(format!("{kind}.{}{suffix}", def.name));
        match (value_a, value_b) {
            (FieldValue::Node(x), FieldValue::Node(y)) if def.is_child => {
                if let Some(diff) = first_difference(ctx_a, *x, ctx_b, *y) {
                    return path(format!(": {diff}"));
                }
            }
            (FieldValue::Nodes(xs), FieldValue::Nodes(ys)) if def.is_child => {
                if xs.len() != ys.len() {
                    return path(format!(" has {} vs {} children", xs.len(), ys.len()));
                }
                for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                    if let Some(diff) = first_difference(ctx_a, *x, ctx_b, *y) {
                        return path(format!("[{i}]: {diff}"));
                    }
                }
            }
            (FieldValue::Node(x), FieldValue::Node(y)) => {
                if ctx_a.kind(*x) != ctx_b.kind(*y) {
                    return path(" refers to a different kind".to_string());
                }
            }
            (FieldValue::Nodes(xs), FieldValue::Nodes(ys)) => {
                let same = xs.len() == ys.len()
                    && xs.iter().zip(ys).all(|(x, y)| ctx_a.kind(*x) == ctx_b.kind(*y));
                if !same {
                    return path(" refers to different kinds".to_string());
                }
            }
            (x, y) => {
                if x != y {
                    return path(format!(": {x} != {y}"));
                }
            }
        }
    }
    None
}
