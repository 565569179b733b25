//! Fluent builder for nodes.

use canopy_schema::Name;

use crate::context::TreeContext;
use crate::error::TreeResult;
use crate::kinds::TreeNode;
use crate::refs::NodeRef;
use crate::values::FieldValue;

/// Collects initial field values for one node.
///
/// ```ignore
/// let call = NodeBuilder::new("FunctionCall")
///     .set("type_ref", implicit)
///     .set("callee_reference", callee)
///     .set("argument_list", args)
///     .build(&mut ctx)?;
/// ```
#[derive(Clone, Debug)]
pub struct NodeBuilder {
    kind: Name,
    values: Vec<(Name, FieldValue)>,
}

impl NodeBuilder {
    pub fn new(kind: &'static str) -> Self {
        Self::for_kind(Name::new(kind))
    }

    pub fn for_kind(kind: Name) -> Self {
        NodeBuilder {
            kind,
            values: Vec::new(),
        }
    }

    pub fn kind(&self) -> Name {
        self.kind
    }

    pub fn set(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.values.push((Name::new(field), value.into()));
        self
    }

    pub fn set_name(mut self, field: Name, value: impl Into<FieldValue>) -> Self {
        self.values.push((field, value.into()));
        self
    }

    pub fn build(self, ctx: &mut TreeContext) -> TreeResult<NodeRef> {
        ctx.new_node(self.kind, self.values)
    }

    /// Build and wrap the node in its typed API.
    pub fn build_as<T: TreeNode>(self, ctx: &mut TreeContext) -> TreeResult<T> {
        let node = self.build(ctx)?;
        T::from_node(ctx, node)
    }
}
