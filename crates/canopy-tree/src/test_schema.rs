//! Small schema for unit tests of the untyped tree API.
//!
//! None of its kinds exist in the IR schema, so the generated
//! `Transformer` sends all of them to `transform_element`.

use std::sync::Arc;

use canopy_schema::PrimitiveType::{Int, Name as NameType, String as StringType};
use canopy_schema::{CapabilityDef, FieldDef, KindDef, Name, ResolvePhase, Schema, SchemaBuilder, Value};

use crate::builder::NodeBuilder;
use crate::context::TreeContext;
use crate::refs::NodeRef;

pub(crate) fn test_schema() -> Arc<Schema> {
    let mut builder = SchemaBuilder::new();
    builder
        .capability(
            CapabilityDef::new("Annotated").field(FieldDef::child_list("notes", "Note").replace()),
        )
        .capability(
            CapabilityDef::new("Typed").field(
                FieldDef::child("ty", "Type")
                    .nullable()
                    .replace()
                    .replace_until(ResolvePhase::Types),
            ),
        )
        .kind(KindDef::new("Node").abstract_kind())
        .kind(
            KindDef::new("Note")
                .parent("Node")
                .field(FieldDef::value("text", StringType)),
        )
        .kind(KindDef::new("Type").parent("Node").abstract_kind())
        .kind(
            KindDef::new("NamedType")
                .parent("Type")
                .field(FieldDef::value("name", NameType)),
        )
        .kind(
            KindDef::new("Leaf")
                .parent("Node")
                .field(FieldDef::value("label", StringType).replace())
                .field(FieldDef::node_ref("target", "Node").nullable().replace())
                .field(FieldDef::value("id", Int).lateinit()),
        )
        .kind(
            KindDef::new("Pair")
                .parent("Node")
                .field(FieldDef::child("left", "Node").replace().transform())
                .field(FieldDef::child("right", "Node").nullable().replace().transform()),
        )
        .kind(
            KindDef::new("Group")
                .parent("Node")
                .field(FieldDef::child_list("items", "Node").replace().transform()),
        )
        .kind(
            KindDef::new("Plain")
                .parent("Node")
                .capability("Annotated")
                .capability("Typed"),
        )
        .kind(
            KindDef::new("Bundle")
                .parent("Node")
                .capability("Annotated")
                .capability("Typed")
                .transform_other_children()
                .field(FieldDef::child("body", "Node").nullable()),
        )
        .kind(
            KindDef::new("Decl")
                .parent("Node")
                .field(FieldDef::symbol("symbol"))
                .field(FieldDef::value("name", NameType)),
        );
    match builder.build() {
        Ok(schema) => Arc::new(schema),
        Err(err) => panic!("test schema is inconsistent: {err}"),
    }
}

pub(crate) fn context() -> TreeContext {
    TreeContext::new(test_schema())
}

pub(crate) fn leaf(ctx: &mut TreeContext, label: &str) -> NodeRef {
    NodeBuilder::new("Leaf")
        .set("label", Value::str(label))
        .build(ctx)
        .unwrap()
}

pub(crate) fn pair(ctx: &mut TreeContext, left: NodeRef, right: Option<NodeRef>) -> NodeRef {
    NodeBuilder::new("Pair")
        .set("left", left)
        .set("right", right)
        .build(ctx)
        .unwrap()
}

pub(crate) fn group(ctx: &mut TreeContext, items: &[NodeRef]) -> NodeRef {
    NodeBuilder::new("Group").set("items", items).build(ctx).unwrap()
}

pub(crate) fn named_type(ctx: &mut TreeContext, name: &str) -> NodeRef {
    NodeBuilder::new("NamedType")
        .set("name", Value::Name(Name::from_dynamic(name)))
        .build(ctx)
        .unwrap()
}

pub(crate) fn note(ctx: &mut TreeContext, text: &str) -> NodeRef {
    NodeBuilder::new("Note")
        .set("text", Value::str(text))
        .build(ctx)
        .unwrap()
}

/// `label` of a `Leaf`.
pub(crate) fn label(ctx: &TreeContext, leaf: NodeRef) -> &str {
    ctx.value_field(leaf, "label").as_str().unwrap()
}
