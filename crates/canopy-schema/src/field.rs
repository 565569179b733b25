//! Field descriptors: semantic type, nullability, init strategy and
//! mutation flags of a single node field.

use std::fmt;

use serde::Serialize;

use crate::{Name, ResolvePhase};

/// A primitive field value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Name(Name),
    /// A variant of an enumeration registered on the schema.
    Enum { ty: Name, variant: Name },
}

impl Value {
    pub fn enumeration(ty: &'static str, variant: &'static str) -> Self {
        Value::Enum {
            ty: Name::new(ty),
            variant: Name::new(variant),
        }
    }

    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn name(text: &str) -> Self {
        Value::Name(Name::from_dynamic(text))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<Name> {
        match self {
            Value::Name(n) => Some(*n),
            _ => None,
        }
    }

    /// The variant name when this is an enum value.
    pub fn as_variant(&self) -> Option<Name> {
        match self {
            Value::Enum { variant, .. } => Some(*variant),
            _ => None,
        }
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Bool(_) => PrimitiveType::Bool,
            Value::Int(_) => PrimitiveType::Int,
            Value::Str(_) => PrimitiveType::String,
            Value::Name(_) => PrimitiveType::Name,
            Value::Enum { ty, .. } => PrimitiveType::Enum(*ty),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Name(n) => write!(f, "{n}"),
            Value::Enum { ty, variant } => write!(f, "{ty}.{variant}"),
        }
    }
}

/// Type of a primitive field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    Bool,
    Int,
    String,
    Name,
    Enum(Name),
    /// Opaque payload, any primitive value is accepted.
    Any,
}

impl PrimitiveType {
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (PrimitiveType::Any, _) => true,
            (expected, value) => expected == value.primitive_type(),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Bool => f.write_str("bool"),
            PrimitiveType::Int => f.write_str("int"),
            PrimitiveType::String => f.write_str("string"),
            PrimitiveType::Name => f.write_str("name"),
            PrimitiveType::Enum(ty) => write!(f, "{ty}"),
            PrimitiveType::Any => f.write_str("any"),
        }
    }
}

/// Semantic type of a field.
///
/// Node constraints name either a kind (the value must be that kind or a
/// subtype) or a capability (the value's kind must compose it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    Node(Name),
    NodeList(Name),
    Symbol,
    Value(PrimitiveType),
}

impl FieldType {
    /// The node constraint of a node or node-list field.
    pub fn node_constraint(&self) -> Option<Name> {
        match self {
            FieldType::Node(c) | FieldType::NodeList(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::NodeList(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Node(c) => write!(f, "{c}"),
            FieldType::NodeList(c) => write!(f, "[{c}]"),
            FieldType::Symbol => f.write_str("symbol"),
            FieldType::Value(p) => write!(f, "{p}"),
        }
    }
}

/// How a field gets its initial value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FieldInit {
    /// The builder must supply a value.
    Required,
    /// Filled in by the builder when absent.
    Default(DefaultValue),
    /// Left uninitialised; set exactly once later with `initialize`.
    Lateinit,
}

/// Default filled in for an absent field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DefaultValue {
    Null,
    EmptyList,
    Value(Value),
}

/// Full descriptor of one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: Name,
    pub ty: FieldType,
    pub nullable: bool,
    /// Containment edge: the referenced node(s) are owned by this node.
    pub is_child: bool,
    pub with_replace: bool,
    pub with_transform: bool,
    pub init: FieldInit,
    /// Latest phase (inclusive) in which the field may still be replaced.
    pub replace_until: Option<ResolvePhase>,
    /// Re-declares a field inherited from a parent kind or capability.
    pub is_override: bool,
    /// Capability or kind that contributed the field; set during composition.
    pub declared_in: Option<Name>,
}

impl FieldDef {
    fn new(name: &'static str, ty: FieldType, is_child: bool) -> Self {
        let init = match ty {
            FieldType::NodeList(_) => FieldInit::Default(DefaultValue::EmptyList),
            _ => FieldInit::Required,
        };
        FieldDef {
            name: Name::new(name),
            ty,
            nullable: false,
            is_child,
            with_replace: false,
            with_transform: false,
            init,
            replace_until: None,
            is_override: false,
            declared_in: None,
        }
    }

    /// Single owned child of kind (or capability) `constraint`.
    pub fn child(name: &'static str, constraint: &'static str) -> Self {
        Self::new(name, FieldType::Node(Name::new(constraint)), true)
    }

    /// Ordered list of owned children.
    pub fn child_list(name: &'static str, constraint: &'static str) -> Self {
        Self::new(name, FieldType::NodeList(Name::new(constraint)), true)
    }

    /// Non-owning edge to a node elsewhere in the tree.
    pub fn node_ref(name: &'static str, constraint: &'static str) -> Self {
        Self::new(name, FieldType::Node(Name::new(constraint)), false)
    }

    pub fn symbol(name: &'static str) -> Self {
        Self::new(name, FieldType::Symbol, false)
    }

    pub fn value(name: &'static str, ty: PrimitiveType) -> Self {
        Self::new(name, FieldType::Value(ty), false)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        if self.init == FieldInit::Required {
            self.init = FieldInit::Default(DefaultValue::Null);
        }
        self
    }

    pub fn replace(mut self) -> Self {
        self.with_replace = true;
        self
    }

    pub fn transform(mut self) -> Self {
        self.with_transform = true;
        self
    }

    /// Turn a child edge into a non-owning reference edge.
    pub fn reference(mut self) -> Self {
        self.is_child = false;
        self.with_transform = false;
        self
    }

    pub fn lateinit(mut self) -> Self {
        self.init = FieldInit::Lateinit;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.init = FieldInit::Default(DefaultValue::Value(value));
        self
    }

    pub fn replace_until(mut self, phase: ResolvePhase) -> Self {
        self.replace_until = Some(phase);
        self
    }

    pub fn overriding(mut self) -> Self {
        self.is_override = true;
        self
    }

    /// Whether a replace is still legal for a node that reached `phase`.
    pub fn window_open(&self, phase: ResolvePhase) -> bool {
        self.replace_until.is_none_or(|until| phase <= until)
    }

    pub fn is_node_field(&self) -> bool {
        self.ty.node_constraint().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_single_defaults_to_null() {
        let field = FieldDef::child("receiver", "ReceiverParameter").nullable();
        assert_eq!(field.init, FieldInit::Default(DefaultValue::Null));
        assert!(field.is_child);
    }

    #[test]
    fn lists_default_to_empty() {
        let field = FieldDef::child_list("annotations", "Annotation").transform();
        assert_eq!(field.init, FieldInit::Default(DefaultValue::EmptyList));
        assert!(field.with_transform);
        assert!(!field.with_replace);
    }

    #[test]
    fn reference_drops_ownership_and_transform() {
        let field = FieldDef::child("delegate", "Import").transform().reference();
        assert!(!field.is_child);
        assert!(!field.with_transform);
    }

    #[test]
    fn window_is_inclusive() {
        let field = FieldDef::child("callee_reference", "Reference")
            .replace()
            .replace_until(ResolvePhase::BodyResolve);
        assert!(field.window_open(ResolvePhase::Raw));
        assert!(field.window_open(ResolvePhase::BodyResolve));
        assert!(!field.window_open(ResolvePhase::FullyResolved));
        let open = FieldDef::value("flag", PrimitiveType::Bool).replace();
        assert!(open.window_open(ResolvePhase::FullyResolved));
    }

    #[test]
    fn any_accepts_everything() {
        assert!(PrimitiveType::Any.accepts(&Value::Int(1)));
        assert!(PrimitiveType::Int.accepts(&Value::Int(1)));
        assert!(!PrimitiveType::Bool.accepts(&Value::Int(1)));
        let visibility = Value::enumeration("Visibility", "Public");
        assert!(PrimitiveType::Enum(Name::new("Visibility")).accepts(&visibility));
        assert!(!PrimitiveType::Enum(Name::new("Modality")).accepts(&visibility));
    }
}
