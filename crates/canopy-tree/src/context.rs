//! TreeContext: arena-based mutable node storage.
//!
//! All nodes of one compilation unit live in a `PrimaryMap` owned by the
//! `TreeContext`. Each node records its kind, one value per composed field
//! slot, its resolve state and its owner (parent node and field slot).
//! Ownership is maintained by the context: building or replacing a child
//! field adopts the new children and orphans the displaced ones.

use std::sync::Arc;

use canopy_schema::{
    ComposedKind, DefaultValue, FieldDef, FieldInit, FieldType, KindId, Name, Schema, Value,
};
use cranelift_entity::PrimaryMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::diagnostic::Diagnostic;
use crate::error::{TreeError, TreeResult};
use crate::kinds::NodeKind;
use crate::phase::ResolveState;
use crate::refs::{NodeRef, SymbolId, TreeId};
use crate::values::{FieldValue, NodeList};

// ============================================================================
// Entity data
// ============================================================================

/// Where a node is attached: the owning node and the field slot holding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Owner {
    pub parent: NodeRef,
    pub slot: usize,
}

/// Data for a single node in the arena.
pub struct NodeData {
    pub(crate) kind: KindId,
    pub(crate) fields: Vec<FieldValue>,
    pub(crate) state: ResolveState,
    pub(crate) owner: Option<Owner>,
    pub(crate) diagnostic: Option<Diagnostic>,
    /// Attempt in which `diagnostic` was attached.
    pub(crate) diagnostic_attempt: Option<u32>,
    pub(crate) attempt: u32,
}

// ============================================================================
// TreeContext
// ============================================================================

/// Arena-based mutable tree for one compilation unit.
///
/// Owns every node built for the unit. Nodes are never removed: a node
/// displaced by a replace stays in the arena as an orphan.
pub struct TreeContext {
    id: TreeId,
    schema: Arc<Schema>,
    nodes: PrimaryMap<NodeRef, NodeData>,
    /// Generated `NodeKind` for each schema kind, when one exists.
    generated: Vec<Option<NodeKind>>,
}

impl TreeContext {
    pub fn new(schema: Arc<Schema>) -> Self {
        let generated = schema
            .kinds()
            .iter()
            .map(|kind| kind.name.with_str(NodeKind::from_name))
            .collect();
        Self {
            id: TreeId::fresh(),
            schema,
            nodes: PrimaryMap::new(),
            generated,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of nodes ever built, orphans included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.nodes.is_valid(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes.keys()
    }

    /// # Panics
    ///
    /// Panics if `node` does not belong to this context.
    pub(crate) fn node(&self, node: NodeRef) -> &NodeData {
        &self.nodes[node]
    }

    pub(crate) fn node_mut(&mut self, node: NodeRef) -> &mut NodeData {
        &mut self.nodes[node]
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn kind(&self, node: NodeRef) -> Name {
        self.layout(node).name
    }

    /// Composed schema view of the node's kind.
    pub fn layout(&self, node: NodeRef) -> &ComposedKind {
        self.schema.kind_at(self.node(node).kind)
    }

    /// Generated kind of `node`, `None` for kinds the generated API does
    /// not know about.
    pub fn node_kind(&self, node: NodeRef) -> Option<NodeKind> {
        self.generated[self.node(node).kind.index()]
    }

    /// Whether `node` is of kind `kind` or one of its subtypes.
    pub fn is_instance_of(&self, node: NodeRef, kind: &str) -> bool {
        Name::lookup(kind).is_some_and(|kind| self.layout(node).is_subtype_of(kind))
    }

    pub fn owner(&self, node: NodeRef) -> Option<Owner> {
        self.node(node).owner
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.owner(node).map(|owner| owner.parent)
    }

    /// Owners of `node`, nearest first.
    pub fn ancestors(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        std::iter::successors(self.parent(node), |n| self.parent(*n))
    }

    /// Field descriptors paired with the node's current values.
    pub fn field_values(&self, node: NodeRef) -> impl Iterator<Item = (&FieldDef, &FieldValue)> {
        self.layout(node)
            .fields
            .iter()
            .zip(self.node(node).fields.iter())
    }

    pub(crate) fn slot_value(&self, node: NodeRef, slot: usize) -> &FieldValue {
        &self.node(node).fields[slot]
    }

    fn slot_of(layout: &ComposedKind, field: &str) -> TreeResult<usize> {
        Name::lookup(field)
            .and_then(|name| layout.slot(name))
            .ok_or_else(|| TreeError::UnknownField {
                kind: layout.name,
                field: field.to_string(),
            })
    }

    // ========================================================================
    // Builder
    // ========================================================================

    /// Create a node of `kind` from initial field values.
    ///
    /// Absent fields take their declared default; absent required fields
    /// fail with `MissingRequiredField`. Every value is type-checked and
    /// every child must be unowned.
    pub fn new_node(
        &mut self,
        kind: Name,
        values: impl IntoIterator<Item = (Name, FieldValue)>,
    ) -> TreeResult<NodeRef> {
        let schema = Arc::clone(&self.schema);
        let layout = schema.kind(kind).ok_or_else(|| TreeError::UnknownKind {
            kind: kind.to_string(),
        })?;
        if layout.is_abstract {
            return Err(TreeError::AbstractKind { kind });
        }

        let mut provided: Vec<Option<FieldValue>> = vec![None; layout.fields.len()];
        for (field, value) in values {
            let slot = layout.slot(field).ok_or_else(|| TreeError::UnknownField {
                kind,
                field: field.to_string(),
            })?;
            provided[slot] = Some(value);
        }

        let mut fields = Vec::with_capacity(layout.fields.len());
        for (def, value) in layout.fields.iter().zip(provided) {
            let value = match (value, &def.init) {
                (Some(value), _) => {
                    self.check_value(layout, def, &value)?;
                    value
                }
                (None, FieldInit::Required) => {
                    return Err(TreeError::MissingRequiredField {
                        kind,
                        field: def.name,
                    });
                }
                (None, FieldInit::Default(DefaultValue::Null)) => FieldValue::Null,
                (None, FieldInit::Default(DefaultValue::EmptyList)) => {
                    FieldValue::Nodes(NodeList::new())
                }
                (None, FieldInit::Default(DefaultValue::Value(value))) => {
                    FieldValue::Value(value.clone())
                }
                (None, FieldInit::Lateinit) => FieldValue::Uninit,
            };
            fields.push(value);
        }

        let node = self.nodes.next_key();
        let mut adopted: SmallVec<[(NodeRef, usize); 8]> = SmallVec::new();
        for (slot, (def, value)) in layout.fields.iter().zip(&fields).enumerate() {
            if !def.is_child {
                continue;
            }
            for &child in value.node_refs() {
                if let Some(owner) = self.node(child).owner {
                    return Err(TreeError::ChildAlreadyOwned {
                        child,
                        owner: owner.parent,
                    });
                }
                if adopted.iter().any(|(c, _)| *c == child) {
                    return Err(TreeError::ChildAlreadyOwned { child, owner: node });
                }
                adopted.push((child, slot));
            }
        }

        let created = self.nodes.push(NodeData {
            kind: layout.id,
            fields,
            state: ResolveState::INITIAL,
            owner: None,
            diagnostic: None,
            diagnostic_attempt: None,
            attempt: 0,
        });
        debug_assert_eq!(created, node);
        for (child, slot) in adopted {
            self.node_mut(child).owner = Some(Owner { parent: node, slot });
        }
        trace!(%node, %kind, "new node");
        Ok(node)
    }

    // ========================================================================
    // Field access and replacement
    // ========================================================================

    /// Read a field. Fails for unknown and not yet initialised fields.
    pub fn get(&self, node: NodeRef, field: &str) -> TreeResult<&FieldValue> {
        let layout = self.layout(node);
        let slot = Self::slot_of(layout, field)?;
        match &self.node(node).fields[slot] {
            FieldValue::Uninit => Err(TreeError::UninitializedField {
                kind: layout.name,
                field: layout.fields[slot].name,
            }),
            value => Ok(value),
        }
    }

    /// Replace a `with_replace` field, returning the previous value.
    ///
    /// Checks, in order: the field is replaceable, its phase window is still
    /// open, and the value satisfies the field type. Replacing a child field
    /// orphans the displaced children and adopts the new ones; reference
    /// fields are swapped without touching ownership.
    pub fn replace(
        &mut self,
        node: NodeRef,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> TreeResult<FieldValue> {
        let value = value.into();
        let schema = Arc::clone(&self.schema);
        let layout = schema.kind_at(self.node(node).kind);
        let slot = Self::slot_of(layout, field)?;
        let def = &layout.fields[slot];
        if !def.with_replace {
            return Err(TreeError::ImmutableField {
                kind: layout.name,
                field: def.name,
            });
        }
        self.check_window(node, layout, def)?;
        self.check_value(layout, def, &value)?;
        trace!(%node, kind = %layout.name, field = %def.name, %value, "replace field");
        self.store(node, slot, def.is_child, value)
    }

    /// Set a lateinit field exactly once.
    pub fn initialize(
        &mut self,
        node: NodeRef,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> TreeResult<()> {
        let value = value.into();
        let schema = Arc::clone(&self.schema);
        let layout = schema.kind_at(self.node(node).kind);
        let slot = Self::slot_of(layout, field)?;
        let def = &layout.fields[slot];
        if def.init != FieldInit::Lateinit || self.node(node).fields[slot] != FieldValue::Uninit {
            return Err(TreeError::ImmutableField {
                kind: layout.name,
                field: def.name,
            });
        }
        self.check_value(layout, def, &value)?;
        trace!(%node, kind = %layout.name, field = %def.name, %value, "initialize field");
        self.store(node, slot, def.is_child, value).map(drop)
    }

    /// Write back the result of a transform into a single-child slot.
    ///
    /// Transform write-back does not require `with_replace`, but still
    /// honours phase windows, field types and ownership.
    pub(crate) fn write_transformed(
        &mut self,
        node: NodeRef,
        slot: usize,
        value: NodeRef,
    ) -> TreeResult<()> {
        let schema = Arc::clone(&self.schema);
        let layout = schema.kind_at(self.node(node).kind);
        let def = &layout.fields[slot];
        let value = FieldValue::Node(value);
        self.check_window(node, layout, def)?;
        self.check_value(layout, def, &value)?;
        trace!(%node, kind = %layout.name, field = %def.name, %value, "transformed child");
        self.store(node, slot, def.is_child, value).map(drop)
    }

    /// Substitute `old` by `new` inside a child-list slot, keeping order.
    /// Does nothing if `old` is no longer in the list.
    pub(crate) fn write_transformed_element(
        &mut self,
        node: NodeRef,
        slot: usize,
        old: NodeRef,
        new: NodeRef,
    ) -> TreeResult<()> {
        let mut list: NodeList = self.slot_value(node, slot).node_refs().into();
        let Some(index) = list.iter().position(|n| *n == old) else {
            return Ok(());
        };
        list[index] = new;

        let schema = Arc::clone(&self.schema);
        let layout = schema.kind_at(self.node(node).kind);
        let def = &layout.fields[slot];
        let value = FieldValue::Nodes(list);
        self.check_window(node, layout, def)?;
        self.check_value(layout, def, &value)?;
        trace!(%node, kind = %layout.name, field = %def.name, index, %new, "transformed element");
        self.store(node, slot, def.is_child, value).map(drop)
    }

    fn check_window(&self, node: NodeRef, layout: &ComposedKind, def: &FieldDef) -> TreeResult<()> {
        let reached = self.state(node).reached();
        match def.replace_until {
            Some(until) if reached > until => Err(TreeError::StalePhaseMutation {
                kind: layout.name,
                field: def.name,
                phase: reached,
                until,
            }),
            _ => Ok(()),
        }
    }

    fn check_value(&self, layout: &ComposedKind, def: &FieldDef, value: &FieldValue) -> TreeResult<()> {
        let accepted = match (&def.ty, value) {
            (_, FieldValue::Uninit) => false,
            (FieldType::NodeList(_), FieldValue::Null) => false,
            (_, FieldValue::Null) => def.nullable,
            (FieldType::Node(constraint), FieldValue::Node(node)) => {
                self.satisfies(*node, *constraint)
            }
            (FieldType::NodeList(constraint), FieldValue::Nodes(nodes)) => {
                nodes.iter().all(|node| self.satisfies(*node, *constraint))
            }
            (FieldType::Symbol, FieldValue::Symbol(_)) => true,
            (FieldType::Value(ty), FieldValue::Value(value)) => {
                ty.accepts(value) && self.variant_exists(value)
            }
            _ => false,
        };
        if accepted {
            return Ok(());
        }
        let expected = if def.nullable {
            format!("{}?", def.ty)
        } else {
            def.ty.to_string()
        };
        Err(TreeError::TypeConstraintViolation {
            kind: layout.name,
            field: def.name,
            expected,
            found: self.describe(value),
        })
    }

    fn satisfies(&self, node: NodeRef, constraint: Name) -> bool {
        self.nodes.get(node).is_some_and(|data| {
            let kind = self.schema.kind_at(data.kind);
            kind.is_subtype_of(constraint) || kind.has_capability(constraint)
        })
    }

    fn variant_exists(&self, value: &Value) -> bool {
        match value {
            Value::Enum { ty, variant } => self
                .schema
                .enum_variants(*ty)
                .is_some_and(|variants| variants.contains(variant)),
            _ => true,
        }
    }

    fn describe(&self, value: &FieldValue) -> String {
        let kind_of = |node: &NodeRef| match self.nodes.get(*node) {
            Some(data) => self.schema.kind_at(data.kind).name.to_string(),
            None => format!("dangling {node}"),
        };
        match value {
            FieldValue::Uninit => "<uninit>".to_string(),
            FieldValue::Null => "null".to_string(),
            FieldValue::Node(node) => kind_of(node),
            FieldValue::Nodes(nodes) => {
                let kinds: Vec<String> = nodes.iter().map(kind_of).collect();
                format!("[{}]", kinds.join(", "))
            }
            FieldValue::Symbol(_) => "symbol".to_string(),
            FieldValue::Value(Value::Enum { ty, variant }) => format!("{ty}.{variant}"),
            FieldValue::Value(value) => value.primitive_type().to_string(),
        }
    }

    /// Store a checked value, maintaining ownership for child fields.
    ///
    /// A new child must be unowned, unless it sits inside a subtree this
    /// store displaces (moving a grandchild up is the common case); it is
    /// then detached from its previous parent first.
    fn store(
        &mut self,
        node: NodeRef,
        slot: usize,
        is_child: bool,
        value: FieldValue,
    ) -> TreeResult<FieldValue> {
        if !is_child {
            return Ok(std::mem::replace(
                &mut self.node_mut(node).fields[slot],
                value,
            ));
        }

        let old_children: NodeList = self.slot_value(node, slot).node_refs().into();
        let new_children = value.node_refs();
        let displaced = |n: NodeRef| old_children.contains(&n) && !new_children.contains(&n);

        for (i, &child) in new_children.iter().enumerate() {
            if new_children[..i].contains(&child) {
                return Err(TreeError::ChildAlreadyOwned { child, owner: node });
            }
            if old_children.contains(&child) {
                continue;
            }
            if child == node || self.ancestors(node).any(|a| a == child) {
                return Err(TreeError::OwnershipCycle {
                    parent: node,
                    child,
                });
            }
            if let Some(owner) = self.owner(child) {
                if !self.ancestors(child).any(displaced) {
                    return Err(TreeError::ChildAlreadyOwned {
                        child,
                        owner: owner.parent,
                    });
                }
            }
        }

        for &old in &old_children {
            if displaced(old) {
                trace!(%node, child = %old, "orphan child");
                self.node_mut(old).owner = None;
            }
        }
        for &child in new_children {
            match self.owner(child) {
                Some(owner) if owner.parent == node && owner.slot == slot => continue,
                Some(owner) => self.detach(child, owner),
                None => {}
            }
            self.node_mut(child).owner = Some(Owner { parent: node, slot });
        }
        Ok(std::mem::replace(
            &mut self.node_mut(node).fields[slot],
            value,
        ))
    }

    /// Remove `child` from the slot of its previous (orphaned) owner.
    ///
    /// The orphan is not kept well-formed: a required single-child slot is
    /// left `Null`, so typed accessors on it may panic.
    fn detach(&mut self, child: NodeRef, owner: Owner) {
        trace!(%child, from = %owner.parent, "detach child");
        let value = &mut self.node_mut(owner.parent).fields[owner.slot];
        match value {
            FieldValue::Node(n) if *n == child => *value = FieldValue::Null,
            FieldValue::Nodes(nodes) => nodes.retain(|n| *n != child),
            _ => {}
        }
    }

    // ========================================================================
    // Typed field helpers
    // ========================================================================
    //
    // These back the generated accessors. A shape mismatch means the
    // generated API and the schema disagree, so they panic.

    fn read(&self, node: NodeRef, field: &str) -> &FieldValue {
        match self.get(node, field) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `field` is not a non-null single node field of `node`.
    pub fn child(&self, node: NodeRef, field: &str) -> NodeRef {
        match self.read(node, field) {
            FieldValue::Node(child) => *child,
            other => panic!("field `{field}` of {node} is not a single node: {other}"),
        }
    }

    pub fn optional_child(&self, node: NodeRef, field: &str) -> Option<NodeRef> {
        match self.read(node, field) {
            FieldValue::Node(child) => Some(*child),
            FieldValue::Null => None,
            other => panic!("field `{field}` of {node} is not a node: {other}"),
        }
    }

    pub fn children(&self, node: NodeRef, field: &str) -> &[NodeRef] {
        match self.read(node, field) {
            FieldValue::Nodes(children) => children,
            other => panic!("field `{field}` of {node} is not a node list: {other}"),
        }
    }

    pub fn symbol_field(&self, node: NodeRef, field: &str) -> SymbolId {
        match self.read(node, field) {
            FieldValue::Symbol(symbol) => *symbol,
            other => panic!("field `{field}` of {node} is not a symbol: {other}"),
        }
    }

    pub fn optional_symbol(&self, node: NodeRef, field: &str) -> Option<SymbolId> {
        match self.read(node, field) {
            FieldValue::Symbol(symbol) => Some(*symbol),
            FieldValue::Null => None,
            other => panic!("field `{field}` of {node} is not a symbol: {other}"),
        }
    }

    pub fn value_field(&self, node: NodeRef, field: &str) -> &Value {
        match self.read(node, field) {
            FieldValue::Value(value) => value,
            other => panic!("field `{field}` of {node} is not a value: {other}"),
        }
    }

    pub fn optional_value(&self, node: NodeRef, field: &str) -> Option<&Value> {
        match self.read(node, field) {
            FieldValue::Value(value) => Some(value),
            FieldValue::Null => None,
            other => panic!("field `{field}` of {node} is not a value: {other}"),
        }
    }

    /// Unlike the other helpers, reports an uninitialised field as an error.
    pub fn lateinit_value(&self, node: NodeRef, field: &str) -> TreeResult<&Value> {
        match self.get(node, field)? {
            FieldValue::Value(value) => Ok(value),
            other => panic!("field `{field}` of {node} is not a value: {other}"),
        }
    }

    pub fn flag(&self, node: NodeRef, field: &str) -> bool {
        match self.read(node, field) {
            FieldValue::Value(Value::Bool(flag)) => *flag,
            other => panic!("field `{field}` of {node} is not a flag: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use canopy_schema::ResolvePhase;

    use super::*;
    use crate::builder::NodeBuilder;
    use crate::ir_schema::ir_schema;
    use crate::test_schema::{context, group, label, leaf, named_type, note, pair};

    #[test]
    fn replace_returns_previous_and_moves_ownership() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let b = leaf(&mut ctx, "b");
        let p = pair(&mut ctx, a, None);
        assert_eq!(ctx.parent(a), Some(p));

        let previous = ctx.replace(p, "left", b).unwrap();
        assert_eq!(previous, FieldValue::Node(a));
        assert_eq!(ctx.get(p, "left").unwrap(), &FieldValue::Node(b));
        assert_eq!(ctx.child(p, "left"), b);
        assert_eq!(ctx.parent(a), None);
        assert_eq!(ctx.owner(b), Some(Owner { parent: p, slot: 0 }));
        // Orphans stay in the arena.
        assert!(ctx.contains(a));
        assert_eq!(label(&ctx, a), "a");
    }

    #[test]
    fn replacing_with_same_child_keeps_owner() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let p = pair(&mut ctx, a, None);
        ctx.replace(p, "left", a).unwrap();
        assert_eq!(ctx.parent(a), Some(p));
    }

    #[test]
    fn list_replace_orphans_only_dropped_children() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let b = leaf(&mut ctx, "b");
        let c = leaf(&mut ctx, "c");
        let g = group(&mut ctx, &[a, b]);

        ctx.replace(g, "items", vec![b, c]).unwrap();
        assert_eq!(ctx.children(g, "items"), &[b, c]);
        assert_eq!(ctx.parent(a), None);
        assert_eq!(ctx.parent(b), Some(g));
        assert_eq!(ctx.parent(c), Some(g));
    }

    #[test]
    fn reference_fields_do_not_take_ownership() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let p = pair(&mut ctx, a, None);
        let r = leaf(&mut ctx, "r");

        ctx.replace(r, "target", a).unwrap();
        assert_eq!(ctx.optional_child(r, "target"), Some(a));
        assert_eq!(ctx.parent(a), Some(p));

        ctx.replace(r, "target", None::<NodeRef>).unwrap();
        assert_eq!(ctx.optional_child(r, "target"), None);
        assert_eq!(ctx.parent(a), Some(p));
    }

    #[test]
    fn immutable_field_is_rejected() {
        let mut ctx = context();
        let n = note(&mut ctx, "hello");
        assert_eq!(
            ctx.replace(n, "text", Value::str("bye")),
            Err(TreeError::ImmutableField {
                kind: Name::new("Note"),
                field: Name::new("text"),
            })
        );
    }

    #[test]
    fn type_constraints_are_checked() {
        let mut ctx = context();
        let plain = NodeBuilder::new("Plain").build(&mut ctx).unwrap();
        let a = leaf(&mut ctx, "a");
        assert_eq!(
            ctx.replace(plain, "ty", a),
            Err(TreeError::TypeConstraintViolation {
                kind: Name::new("Plain"),
                field: Name::new("ty"),
                expected: "Type?".to_string(),
                found: "Leaf".to_string(),
            })
        );

        let p = pair(&mut ctx, a, None);
        assert_eq!(
            ctx.replace(p, "left", None::<NodeRef>),
            Err(TreeError::TypeConstraintViolation {
                kind: Name::new("Pair"),
                field: Name::new("left"),
                expected: "Node".to_string(),
                found: "null".to_string(),
            })
        );
        assert!(matches!(
            ctx.replace(a, "label", 3i64),
            Err(TreeError::TypeConstraintViolation { .. })
        ));
        // Nothing changed.
        assert_eq!(ctx.child(p, "left"), a);
    }

    #[test]
    fn builder_rejects_wrongly_kinded_child() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        assert_eq!(
            NodeBuilder::new("Plain").set("ty", a).build(&mut ctx),
            Err(TreeError::TypeConstraintViolation {
                kind: Name::new("Plain"),
                field: Name::new("ty"),
                expected: "Type?".to_string(),
                found: "Leaf".to_string(),
            })
        );
        // The rejected child stays unowned.
        assert_eq!(ctx.parent(a), None);
    }

    #[test]
    fn unknown_enum_variant_is_rejected() {
        let mut ctx = TreeContext::new(ir_schema());
        let type_ref = NodeBuilder::new("ImplicitTypeRef").build(&mut ctx).unwrap();
        assert_eq!(
            NodeBuilder::new("LiteralExpression")
                .set("type_ref", type_ref)
                .set("const_kind", Value::enumeration("ConstKind", "Bogus"))
                .build(&mut ctx),
            Err(TreeError::TypeConstraintViolation {
                kind: Name::new("LiteralExpression"),
                field: Name::new("const_kind"),
                expected: "ConstKind".to_string(),
                found: "ConstKind.Bogus".to_string(),
            })
        );
    }

    #[test]
    fn moving_grandchild_up_leaves_orphan_slot_null() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let inner = pair(&mut ctx, a, None);
        let outer = pair(&mut ctx, inner, None);

        ctx.replace(outer, "left", a).unwrap();
        assert_eq!(ctx.child(outer, "left"), a);
        assert_eq!(ctx.parent(a), Some(outer));
        assert_eq!(ctx.parent(inner), None);
        // `left` is required, but the orphan keeps no value for it.
        assert_eq!(ctx.get(inner, "left"), Ok(&FieldValue::Null));
    }

    #[test]
    fn builder_fills_defaults_and_requires_fields() {
        let mut ctx = context();
        let plain = NodeBuilder::new("Plain").build(&mut ctx).unwrap();
        assert!(ctx.children(plain, "notes").is_empty());
        assert_eq!(ctx.optional_child(plain, "ty"), None);

        assert_eq!(
            NodeBuilder::new("Pair").build(&mut ctx),
            Err(TreeError::MissingRequiredField {
                kind: Name::new("Pair"),
                field: Name::new("left"),
            })
        );
        assert_eq!(
            NodeBuilder::new("Node").build(&mut ctx),
            Err(TreeError::AbstractKind {
                kind: Name::new("Node"),
            })
        );
        assert_eq!(
            ctx.new_node(Name::new("Nope"), []),
            Err(TreeError::UnknownKind {
                kind: "Nope".to_string(),
            })
        );
        assert_eq!(
            NodeBuilder::new("Plain").set("colour", true).build(&mut ctx),
            Err(TreeError::UnknownField {
                kind: Name::new("Plain"),
                field: "colour".to_string(),
            })
        );
    }

    #[test]
    fn lateinit_field_is_set_once() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        assert_eq!(
            ctx.get(a, "id"),
            Err(TreeError::UninitializedField {
                kind: Name::new("Leaf"),
                field: Name::new("id"),
            })
        );

        ctx.initialize(a, "id", 7i64).unwrap();
        assert_eq!(ctx.value_field(a, "id"), &Value::Int(7));
        assert_eq!(
            ctx.initialize(a, "id", 8i64),
            Err(TreeError::ImmutableField {
                kind: Name::new("Leaf"),
                field: Name::new("id"),
            })
        );
    }

    #[test]
    fn child_cannot_have_two_owners() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let first = pair(&mut ctx, a, None);
        assert_eq!(
            NodeBuilder::new("Pair").set("left", a).build(&mut ctx),
            Err(TreeError::ChildAlreadyOwned {
                child: a,
                owner: first,
            })
        );

        let b = leaf(&mut ctx, "b");
        let g = group(&mut ctx, &[]);
        assert_eq!(
            ctx.replace(g, "items", vec![b, b]),
            Err(TreeError::ChildAlreadyOwned { child: b, owner: g })
        );
        assert_eq!(ctx.parent(b), None);
    }

    #[test]
    fn adopting_an_ancestor_is_a_cycle() {
        let mut ctx = context();
        let g = group(&mut ctx, &[]);
        let p = pair(&mut ctx, g, None);
        assert_eq!(
            ctx.replace(g, "items", vec![p]),
            Err(TreeError::OwnershipCycle {
                parent: g,
                child: p,
            })
        );
        assert_eq!(
            ctx.replace(g, "items", vec![g]),
            Err(TreeError::OwnershipCycle {
                parent: g,
                child: g,
            })
        );
    }

    #[test]
    fn grandchild_moves_up_over_its_displaced_parent() {
        let mut ctx = context();
        let x = leaf(&mut ctx, "x");
        let inner = pair(&mut ctx, x, None);
        let outer = pair(&mut ctx, inner, None);

        ctx.replace(outer, "left", x).unwrap();
        assert_eq!(ctx.parent(x), Some(outer));
        assert_eq!(ctx.parent(inner), None);
        assert_eq!(ctx.slot_value(inner, 0), &FieldValue::Null);
    }

    #[test]
    fn replace_window_closes_after_its_phase() {
        let mut ctx = context();
        let plain = NodeBuilder::new("Plain").build(&mut ctx).unwrap();
        let first = named_type(&mut ctx, "Int");
        let second = named_type(&mut ctx, "Long");

        ctx.advance_phase(plain, ResolvePhase::Types).unwrap();
        ctx.replace(plain, "ty", first).unwrap();

        ctx.advance_phase(plain, ResolvePhase::BodyResolve).unwrap();
        assert_eq!(
            ctx.replace(plain, "ty", second),
            Err(TreeError::StalePhaseMutation {
                kind: Name::new("Plain"),
                field: Name::new("ty"),
                phase: ResolvePhase::BodyResolve,
                until: ResolvePhase::Types,
            })
        );
        assert_eq!(ctx.optional_child(plain, "ty"), Some(first));

        // Unwindowed fields stay open.
        ctx.replace(plain, "notes", Vec::<NodeRef>::new()).unwrap();
    }

    #[test]
    fn error_state_keeps_window_judgement() {
        let mut ctx = context();
        let plain = NodeBuilder::new("Plain").build(&mut ctx).unwrap();
        let ty = named_type(&mut ctx, "Int");
        ctx.advance_phase(plain, ResolvePhase::BodyResolve).unwrap();
        ctx.mark_error(plain);
        assert!(matches!(
            ctx.replace(plain, "ty", ty),
            Err(TreeError::StalePhaseMutation { .. })
        ));
    }

    #[test]
    fn instance_checks_follow_supertypes() {
        let mut ctx = context();
        let ty = named_type(&mut ctx, "Int");
        assert!(ctx.is_instance_of(ty, "NamedType"));
        assert!(ctx.is_instance_of(ty, "Type"));
        assert!(ctx.is_instance_of(ty, "Node"));
        assert!(!ctx.is_instance_of(ty, "Leaf"));
        assert!(!ctx.is_instance_of(ty, "NotAKindAnywhere"));
        assert_eq!(ctx.node_kind(ty), None);
    }
}
