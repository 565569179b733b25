//! Schema registry: registers capabilities, kinds and enumerations, then
//! composes every kind's full field set once.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    CapabilityDef, EnumDef, FieldDef, FieldType, KindDef, Name, PhaseWindows, PrimitiveType,
    ResolvePhase, SchemaError, SchemaResult, WindowTarget,
};

/// Dense index of a composed kind inside its `Schema`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KindId(u32);

impl KindId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only composed view of a node kind.
#[derive(Clone, Debug, Serialize)]
pub struct ComposedKind {
    #[serde(skip)]
    pub id: KindId,
    pub name: Name,
    pub parent: Option<Name>,
    /// The kind itself followed by its ancestors, nearest first.
    pub supertypes: Vec<Name>,
    /// Every capability, inherited ones first, in composition order.
    pub capabilities: Vec<Name>,
    /// Parent fields, then capability fields, then own fields.
    pub fields: Vec<FieldDef>,
    pub is_abstract: bool,
    pub transform_other_children: bool,
    #[serde(skip)]
    slots: FxHashMap<Name, usize>,
}

impl ComposedKind {
    /// Position of `field` in `fields`.
    pub fn slot(&self, field: Name) -> Option<usize> {
        self.slots.get(&field).copied()
    }

    pub fn field(&self, field: Name) -> Option<&FieldDef> {
        self.slot(field).map(|slot| &self.fields[slot])
    }

    /// Look up a field by its text without interning it.
    pub fn field_named(&self, field: &str) -> Option<&FieldDef> {
        Name::lookup(field).and_then(|name| self.field(name))
    }

    pub fn has_capability(&self, capability: Name) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn is_subtype_of(&self, kind: Name) -> bool {
        self.supertypes.contains(&kind)
    }

    /// Fields the default transform visits, in declaration order.
    pub fn transformed_fields(&self) -> impl Iterator<Item = (usize, &FieldDef)> + '_ {
        self.fields.iter().enumerate().filter(move |(_, field)| {
            field.is_child && (field.with_transform || self.transform_other_children)
        })
    }

    fn index_slots(&mut self) {
        self.slots = self
            .fields
            .iter()
            .enumerate()
            .map(|(slot, field)| (field.name, slot))
            .collect();
    }
}

/// Composed schema. Built once by `SchemaBuilder::build` and shared
/// read-only by every tree that uses it.
#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    capabilities: Vec<CapabilityDef>,
    kinds: Vec<ComposedKind>,
    enums: Vec<EnumDef>,
    #[serde(skip)]
    capability_index: FxHashMap<Name, usize>,
    #[serde(skip)]
    kind_index: FxHashMap<Name, KindId>,
    #[serde(skip)]
    enum_index: FxHashMap<Name, usize>,
}

impl Schema {
    pub fn kind(&self, name: Name) -> Option<&ComposedKind> {
        self.kind_index.get(&name).map(|id| &self.kinds[id.index()])
    }

    pub fn kind_named(&self, name: &str) -> Option<&ComposedKind> {
        Name::lookup(name).and_then(|name| self.kind(name))
    }

    /// # Panics
    ///
    /// Panics if `id` was produced by another schema.
    pub fn kind_at(&self, id: KindId) -> &ComposedKind {
        &self.kinds[id.index()]
    }

    pub fn kind_id(&self, name: Name) -> Option<KindId> {
        self.kind_index.get(&name).copied()
    }

    /// All kinds in registration order.
    pub fn kinds(&self) -> &[ComposedKind] {
        &self.kinds
    }

    pub fn capability(&self, name: Name) -> Option<&CapabilityDef> {
        self.capability_index
            .get(&name)
            .map(|index| &self.capabilities[*index])
    }

    pub fn capabilities(&self) -> &[CapabilityDef] {
        &self.capabilities
    }

    pub fn enum_variants(&self, name: Name) -> Option<&[Name]> {
        self.enum_index
            .get(&name)
            .map(|index| self.enums[*index].variants.as_slice())
    }

    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    /// Whether `kind` is `of` or one of its descendants.
    pub fn is_subtype(&self, kind: Name, of: Name) -> bool {
        self.kind(kind).is_some_and(|k| k.is_subtype_of(of))
    }

    /// Whether a node of `kind` may be stored in a field constrained by
    /// `constraint`, which names either a kind or a capability.
    pub fn satisfies(&self, kind: Name, constraint: Name) -> bool {
        self.kind(kind)
            .is_some_and(|k| k.is_subtype_of(constraint) || k.has_capability(constraint))
    }

    /// Kinds composing `capability`, in registration order.
    pub fn kinds_with_capability(&self, capability: Name) -> impl Iterator<Item = &ComposedKind> {
        self.kinds
            .iter()
            .filter(move |kind| kind.has_capability(capability))
    }

    /// Copy of this schema with the replace windows of `windows` applied on
    /// top. A kind window also applies to every subtype of that kind.
    ///
    /// Windows only narrow: a field already closed at an earlier phase keeps
    /// that phase. A capability window skips fields a kind overrides.
    pub fn with_phase_windows(&self, windows: &PhaseWindows) -> SchemaResult<Schema> {
        let mut schema = self.clone();
        for entry in &windows.windows {
            let target = entry.target()?;
            let field = Name::lookup(&entry.field);
            let unknown = || SchemaError::UnknownWindowTarget {
                target: target.name().to_string(),
                field: entry.field.clone(),
            };

            match target {
                WindowTarget::Kind(kind_name) => {
                    let kind = Name::lookup(kind_name)
                        .and_then(|name| schema.kind(name))
                        .ok_or_else(unknown)?;
                    let field = field
                        .filter(|field| kind.field(*field).is_some())
                        .ok_or_else(unknown)?;
                    let root = kind.name;
                    for kind in schema.kinds.iter_mut().filter(|k| k.is_subtype_of(root)) {
                        if let Some(slot) = kind.slot(field) {
                            narrow(&mut kind.fields[slot], entry.until);
                        }
                    }
                }
                WindowTarget::Capability(capability_name) => {
                    let capability = Name::lookup(capability_name)
                        .and_then(|name| schema.capability_index.get(&name).copied())
                        .ok_or_else(unknown)?;
                    let field = field
                        .and_then(|field| {
                            schema.capabilities[capability]
                                .fields
                                .iter()
                                .position(|f| f.name == field)
                        })
                        .ok_or_else(unknown)?;
                    let capability_def = &mut schema.capabilities[capability];
                    narrow(&mut capability_def.fields[field], entry.until);
                    let (capability, field) =
                        (capability_def.name, capability_def.fields[field].name);
                    for kind in schema
                        .kinds
                        .iter_mut()
                        .filter(|k| k.has_capability(capability))
                    {
                        let Some(slot) = kind.slot(field) else {
                            continue;
                        };
                        if kind.fields[slot].declared_in == Some(capability) {
                            narrow(&mut kind.fields[slot], entry.until);
                        }
                    }
                }
            }
            debug!(
                target = %target.name(),
                field = %entry.field,
                until = %entry.until,
                "applied phase window"
            );
        }
        Ok(schema)
    }
}

fn narrow(field: &mut FieldDef, until: ResolvePhase) {
    field.replace_until = Some(field.replace_until.map_or(until, |existing| existing.min(until)));
}

/// Collects definitions and composes them into a `Schema`.
#[derive(Default)]
pub struct SchemaBuilder {
    capabilities: Vec<CapabilityDef>,
    kinds: Vec<KindDef>,
    enums: Vec<EnumDef>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capability(&mut self, capability: CapabilityDef) -> &mut Self {
        self.capabilities.push(capability);
        self
    }

    pub fn kind(&mut self, kind: KindDef) -> &mut Self {
        self.kinds.push(kind);
        self
    }

    pub fn enumeration(&mut self, name: &'static str, variants: &[&'static str]) -> &mut Self {
        self.enums.push(EnumDef {
            name: Name::new(name),
            variants: variants.iter().map(|v| Name::new(v)).collect(),
        });
        self
    }

    /// Compose every registered kind.
    pub fn build(&self) -> SchemaResult<Schema> {
        let mut capabilities = self.capabilities.clone();
        let mut capability_index = FxHashMap::default();
        let mut kind_index = FxHashMap::default();
        let mut enum_index = FxHashMap::default();

        for (index, capability) in capabilities.iter_mut().enumerate() {
            claim_name(&mut capability_index, capability.name, index, &kind_index, &enum_index)?;
            let mut seen = FxHashMap::default();
            for field in &mut capability.fields {
                field.declared_in = Some(capability.name);
                if seen.insert(field.name, ()).is_some() {
                    return Err(SchemaError::DuplicateField {
                        owner: capability.name,
                        field: field.name,
                        first: capability.name,
                        second: capability.name,
                    });
                }
            }
        }
        for (index, def) in self.kinds.iter().enumerate() {
            let id = KindId(index as u32);
            claim_name(&mut kind_index, def.name, id, &capability_index, &enum_index)?;
        }
        for (index, def) in self.enums.iter().enumerate() {
            claim_name(&mut enum_index, def.name, index, &capability_index, &kind_index)?;
        }

        let order = self.topological_order(&kind_index)?;
        let mut composed: Vec<Option<ComposedKind>> = vec![None; self.kinds.len()];
        for index in order {
            let def = &self.kinds[index];
            let parent = match def.parent {
                Some(parent) => composed[kind_index[&parent].index()].as_ref(),
                None => None,
            };
            let kind = compose_kind(
                KindId(index as u32),
                def,
                parent,
                &capabilities,
                &capability_index,
            )?;
            composed[index] = Some(kind);
        }

        let schema = Schema {
            capabilities,
            kinds: composed.into_iter().flatten().collect(),
            enums: self.enums.clone(),
            capability_index,
            kind_index,
            enum_index,
        };
        schema.validate_field_types()?;
        debug!(
            kinds = schema.kinds.len(),
            capabilities = schema.capabilities.len(),
            "composed schema"
        );
        Ok(schema)
    }

    /// Kind indices ordered so that parents precede children.
    fn topological_order(&self, kind_index: &FxHashMap<Name, KindId>) -> SchemaResult<Vec<usize>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Visiting,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.kinds.len()];
        let mut order = Vec::with_capacity(self.kinds.len());
        for start in 0..self.kinds.len() {
            let mut chain = Vec::new();
            let mut current = Some(start);
            while let Some(index) = current {
                match marks[index] {
                    Mark::Done => break,
                    Mark::Visiting => {
                        return Err(SchemaError::InheritanceCycle {
                            kind: self.kinds[index].name,
                        });
                    }
                    Mark::Unvisited => {}
                }
                marks[index] = Mark::Visiting;
                chain.push(index);
                let def = &self.kinds[index];
                current = match def.parent {
                    Some(parent) => Some(
                        kind_index
                            .get(&parent)
                            .ok_or(SchemaError::UnknownKind {
                                owner: def.name,
                                kind: parent,
                            })?
                            .index(),
                    ),
                    None => None,
                };
            }
            for index in chain.into_iter().rev() {
                marks[index] = Mark::Done;
                order.push(index);
            }
        }
        Ok(order)
    }
}

fn claim_name<V, A, B>(
    index: &mut FxHashMap<Name, V>,
    name: Name,
    value: V,
    other: &FxHashMap<Name, A>,
    another: &FxHashMap<Name, B>,
) -> SchemaResult<()> {
    if index.contains_key(&name) || other.contains_key(&name) || another.contains_key(&name) {
        return Err(SchemaError::DuplicateDefinition { name });
    }
    index.insert(name, value);
    Ok(())
}

fn compose_kind(
    id: KindId,
    def: &KindDef,
    parent: Option<&ComposedKind>,
    capabilities: &[CapabilityDef],
    capability_index: &FxHashMap<Name, usize>,
) -> SchemaResult<ComposedKind> {
    let mut kind = ComposedKind {
        id,
        name: def.name,
        parent: def.parent,
        supertypes: std::iter::once(def.name)
            .chain(parent.into_iter().flat_map(|p| p.supertypes.iter().copied()))
            .collect(),
        capabilities: parent.map(|p| p.capabilities.clone()).unwrap_or_default(),
        fields: parent.map(|p| p.fields.clone()).unwrap_or_default(),
        is_abstract: def.is_abstract,
        transform_other_children: def.transform_other_children
            || parent.is_some_and(|p| p.transform_other_children),
        slots: FxHashMap::default(),
    };
    kind.index_slots();

    // Own overrides settle collisions between composed capabilities.
    let overridden: Vec<Name> = def
        .fields
        .iter()
        .filter(|f| f.is_override)
        .map(|f| f.name)
        .collect();

    for capability in &def.capabilities {
        let index = capability_index
            .get(capability)
            .copied()
            .ok_or(SchemaError::UnknownCapability {
                owner: def.name,
                capability: *capability,
            })?;
        if kind.has_capability(*capability) {
            continue;
        }
        kind.capabilities.push(*capability);
        for field in &capabilities[index].fields {
            if let Some(existing) = kind.field(field.name) {
                if overridden.contains(&field.name) {
                    continue;
                }
                return Err(SchemaError::DuplicateField {
                    owner: def.name,
                    field: field.name,
                    first: existing.declared_in.unwrap_or(def.name),
                    second: *capability,
                });
            }
            kind.slots.insert(field.name, kind.fields.len());
            kind.fields.push(field.clone());
        }
    }

    for field in &def.fields {
        let mut field = field.clone();
        field.declared_in = Some(def.name);
        match (kind.slot(field.name), field.is_override) {
            (Some(slot), true) => kind.fields[slot] = field,
            (Some(slot), false) => {
                return Err(SchemaError::DuplicateField {
                    owner: def.name,
                    field: field.name,
                    first: kind.fields[slot].declared_in.unwrap_or(def.name),
                    second: def.name,
                });
            }
            (None, true) => {
                return Err(SchemaError::InvalidOverride {
                    owner: def.name,
                    field: field.name,
                });
            }
            (None, false) => {
                kind.slots.insert(field.name, kind.fields.len());
                kind.fields.push(field);
            }
        }
    }
    Ok(kind)
}

impl Schema {
    fn validate_field_types(&self) -> SchemaResult<()> {
        let owners = self
            .capabilities
            .iter()
            .map(|c| (c.name, &c.fields))
            .chain(self.kinds.iter().map(|k| (k.name, &k.fields)));
        for (owner, fields) in owners {
            for field in fields {
                self.validate_field(owner, field)?;
            }
        }
        Ok(())
    }

    fn validate_field(&self, owner: Name, field: &FieldDef) -> SchemaResult<()> {
        let unknown = |constraint| SchemaError::UnknownFieldType {
            owner,
            field: field.name,
            constraint,
        };
        match field.ty {
            FieldType::Node(constraint) | FieldType::NodeList(constraint) => {
                if !self.kind_index.contains_key(&constraint)
                    && !self.capability_index.contains_key(&constraint)
                {
                    return Err(unknown(constraint));
                }
            }
            FieldType::Value(PrimitiveType::Enum(ty)) => {
                if !self.enum_index.contains_key(&ty) {
                    return Err(unknown(ty));
                }
            }
            FieldType::Symbol | FieldType::Value(_) => {}
        }

        let reason = if !field.with_transform {
            None
        } else if !field.is_node_field() {
            Some("only node fields take part in transforms")
        } else if !field.is_child {
            Some("reference fields are never transformed")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(SchemaError::InvalidTransformField {
                owner,
                field: field.name,
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_schema() -> SchemaBuilder {
        let mut builder = SchemaBuilder::new();
        builder
            .capability(
                CapabilityDef::new("Annotated")
                    .field(FieldDef::child_list("annotations", "Leaf").transform()),
            )
            .capability(
                CapabilityDef::new("Typed")
                    .field(FieldDef::child("type_ref", "Leaf").replace().transform()),
            )
            .kind(KindDef::new("Base").abstract_kind().capability("Annotated"))
            .kind(
                KindDef::new("Middle")
                    .parent("Base")
                    .capability("Typed")
                    .field(FieldDef::value("depth", PrimitiveType::Int)),
            )
            .kind(KindDef::new("Leaf").parent("Base"))
            .kind(
                KindDef::new("Narrowed")
                    .parent("Middle")
                    .capability("Annotated")
                    .field(FieldDef::child("type_ref", "Leaf").replace().overriding()),
            );
        builder
    }

    #[test]
    fn composes_parent_capability_then_own_fields() {
        let schema = small_schema().build().unwrap();
        let middle = schema.kind_named("Middle").unwrap();
        let names: Vec<String> = middle.fields.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(names, ["annotations", "type_ref", "depth"]);
        assert_eq!(middle.supertypes, [Name::new("Middle"), Name::new("Base")]);
        assert!(middle.has_capability(Name::new("Annotated")));
        assert!(!middle.is_abstract);
        assert!(schema.kind_named("Base").unwrap().is_abstract);
    }

    #[test]
    fn override_keeps_position_and_drops_transform() {
        let schema = small_schema().build().unwrap();
        let narrowed = schema.kind_named("Narrowed").unwrap();
        assert_eq!(narrowed.fields.len(), 3);
        let type_ref = narrowed.field_named("type_ref").unwrap();
        assert_eq!(narrowed.slot(type_ref.name), Some(1));
        assert!(!type_ref.with_transform);
        assert_eq!(type_ref.declared_in, Some(Name::new("Narrowed")));
    }

    #[test]
    fn capability_collision_is_rejected() {
        let mut builder = small_schema();
        builder
            .capability(
                CapabilityDef::new("AlsoTyped")
                    .field(FieldDef::child("type_ref", "Leaf").replace()),
            )
            .kind(KindDef::new("Clash").capability("Typed").capability("AlsoTyped"));
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                owner: Name::new("Clash"),
                field: Name::new("type_ref"),
                first: Name::new("Typed"),
                second: Name::new("AlsoTyped"),
            }
        );
    }

    #[test]
    fn own_override_settles_capability_collision() {
        let mut builder = small_schema();
        builder
            .capability(
                CapabilityDef::new("AlsoTyped")
                    .field(FieldDef::child("type_ref", "Leaf").replace()),
            )
            .kind(
                KindDef::new("Settled")
                    .capability("Typed")
                    .capability("AlsoTyped")
                    .field(FieldDef::child("type_ref", "Leaf").nullable().overriding()),
            );
        let schema = builder.build().unwrap();
        let kind = schema.kind_named("Settled").unwrap();
        let type_refs: Vec<&FieldDef> = kind
            .fields
            .iter()
            .filter(|f| f.name == "type_ref")
            .collect();
        assert_eq!(type_refs.len(), 1);
        assert!(type_refs[0].nullable);
        assert_eq!(type_refs[0].declared_in, Some(Name::new("Settled")));
        assert!(kind.has_capability(Name::new("AlsoTyped")));
    }

    #[test]
    fn own_field_collision_without_override_is_rejected() {
        let mut builder = small_schema();
        builder.kind(
            KindDef::new("Shadow")
                .capability("Typed")
                .field(FieldDef::child("type_ref", "Leaf")),
        );
        assert!(matches!(
            builder.build(),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn override_of_missing_field_is_rejected() {
        let mut builder = small_schema();
        builder.kind(KindDef::new("Lonely").field(FieldDef::symbol("symbol").overriding()));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::InvalidOverride { .. })
        ));
    }

    #[test]
    fn unknown_references_are_rejected() {
        let mut builder = small_schema();
        builder.kind(KindDef::new("Orphan").parent("Nowhere"));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::UnknownKind { .. })
        ));

        let mut builder = small_schema();
        builder.kind(KindDef::new("Odd").field(FieldDef::child("x", "Missing")));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::UnknownFieldType { .. })
        ));

        let mut builder = small_schema();
        builder.kind(KindDef::new("Odd").capability("Missing"));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::UnknownCapability { .. })
        ));
    }

    #[test]
    fn cycles_and_duplicates_are_rejected() {
        let mut builder = SchemaBuilder::new();
        builder
            .kind(KindDef::new("CycleA").parent("CycleB"))
            .kind(KindDef::new("CycleB").parent("CycleA"));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::InheritanceCycle { .. })
        ));

        let mut builder = small_schema();
        builder.kind(KindDef::new("Leaf"));
        assert_eq!(
            builder.build().unwrap_err(),
            SchemaError::DuplicateDefinition {
                name: Name::new("Leaf")
            }
        );
    }

    #[test]
    fn transforming_a_reference_is_rejected() {
        let mut builder = small_schema();
        let mut field = FieldDef::node_ref("target", "Leaf");
        field.with_transform = true;
        builder.kind(KindDef::new("Pointer").field(field));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::InvalidTransformField { .. })
        ));
    }

    #[test]
    fn satisfies_kinds_and_capabilities() {
        let schema = small_schema().build().unwrap();
        let leaf = Name::new("Leaf");
        assert!(schema.satisfies(leaf, Name::new("Base")));
        assert!(schema.satisfies(leaf, Name::new("Annotated")));
        assert!(!schema.satisfies(leaf, Name::new("Typed")));
        assert!(schema.is_subtype(Name::new("Narrowed"), Name::new("Middle")));
        assert!(!schema.is_subtype(Name::new("Middle"), Name::new("Narrowed")));
    }

    #[test]
    fn kind_windows_reach_subtypes() {
        let schema = small_schema().build().unwrap();
        let windows = PhaseWindows::default().kind("Middle", "type_ref", ResolvePhase::Types);
        let windowed = schema.with_phase_windows(&windows).unwrap();
        for kind in ["Middle", "Narrowed"] {
            let field = windowed
                .kind_named(kind)
                .unwrap()
                .field_named("type_ref")
                .unwrap()
                .clone();
            assert_eq!(field.replace_until, Some(ResolvePhase::Types), "{kind}");
        }
        assert!(
            schema
                .kind_named("Middle")
                .unwrap()
                .field_named("type_ref")
                .unwrap()
                .replace_until
                .is_none()
        );
    }

    #[test]
    fn capability_windows_reach_composers() {
        let schema = small_schema().build().unwrap();
        let windows =
            PhaseWindows::default().capability("Annotated", "annotations", ResolvePhase::Status);
        let windowed = schema.with_phase_windows(&windows).unwrap();
        for kind in windowed.kinds_with_capability(Name::new("Annotated")) {
            assert_eq!(
                kind.field_named("annotations").unwrap().replace_until,
                Some(ResolvePhase::Status)
            );
        }
    }

    #[test]
    fn windows_never_widen_a_closed_field() {
        let mut builder = SchemaBuilder::new();
        builder.kind(
            KindDef::new("W").field(
                FieldDef::value("y", PrimitiveType::Int)
                    .replace()
                    .replace_until(ResolvePhase::Types),
            ),
        );
        let schema = builder.build().unwrap();

        let wider = PhaseWindows::default().kind("W", "y", ResolvePhase::FullyResolved);
        let windowed = schema.with_phase_windows(&wider).unwrap();
        let y = windowed.kind_named("W").unwrap().field_named("y").unwrap();
        assert_eq!(y.replace_until, Some(ResolvePhase::Types));

        let narrower = PhaseWindows::default().kind("W", "y", ResolvePhase::Raw);
        let windowed = schema.with_phase_windows(&narrower).unwrap();
        let y = windowed.kind_named("W").unwrap().field_named("y").unwrap();
        assert_eq!(y.replace_until, Some(ResolvePhase::Raw));
    }

    #[test]
    fn capability_windows_skip_overridden_fields() {
        let schema = small_schema().build().unwrap();
        let windows = PhaseWindows::default().capability("Typed", "type_ref", ResolvePhase::Status);
        let windowed = schema.with_phase_windows(&windows).unwrap();
        let type_ref = |kind: &str| {
            windowed
                .kind_named(kind)
                .unwrap()
                .field_named("type_ref")
                .unwrap()
                .replace_until
        };
        assert_eq!(type_ref("Middle"), Some(ResolvePhase::Status));
        assert_eq!(type_ref("Narrowed"), None);
    }

    #[test]
    fn unknown_window_target_is_rejected() {
        let schema = small_schema().build().unwrap();
        let windows = PhaseWindows::default().kind("Leaf", "type_ref", ResolvePhase::Types);
        assert!(matches!(
            schema.with_phase_windows(&windows),
            Err(SchemaError::UnknownWindowTarget { .. })
        ));
    }
}
