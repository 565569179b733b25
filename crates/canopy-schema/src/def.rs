//! Declarations of capabilities and node kinds, before composition.

use serde::Serialize;

use crate::{FieldDef, Name};

/// A named, reusable bundle of fields.
#[derive(Clone, Debug, Serialize)]
pub struct CapabilityDef {
    pub name: Name,
    pub fields: Vec<FieldDef>,
}

impl CapabilityDef {
    pub fn new(name: &'static str) -> Self {
        CapabilityDef {
            name: Name::new(name),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// A node kind: optional parent, composed capabilities and own fields.
#[derive(Clone, Debug, Serialize)]
pub struct KindDef {
    pub name: Name,
    pub parent: Option<Name>,
    pub capabilities: Vec<Name>,
    pub fields: Vec<FieldDef>,
    pub is_abstract: bool,
    pub transform_other_children: bool,
}

impl KindDef {
    pub fn new(name: &'static str) -> Self {
        KindDef {
            name: Name::new(name),
            parent: None,
            capabilities: Vec::new(),
            fields: Vec::new(),
            is_abstract: false,
            transform_other_children: false,
        }
    }

    pub fn parent(mut self, parent: &'static str) -> Self {
        self.parent = Some(Name::new(parent));
        self
    }

    pub fn capability(mut self, capability: &'static str) -> Self {
        self.capabilities.push(Name::new(capability));
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn abstract_kind(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Widen the default transform to every child field of the kind.
    pub fn transform_other_children(mut self) -> Self {
        self.transform_other_children = true;
        self
    }
}

/// A closed set of named variants usable as a primitive field type.
#[derive(Clone, Debug, Serialize)]
pub struct EnumDef {
    pub name: Name,
    pub variants: Vec<Name>,
}
