//! Declarative schema for phase-aware IR trees.
//!
//! A schema is made of *capabilities* (reusable bundles of typed fields)
//! and *node kinds* (single-inheritance backbone plus composed
//! capabilities and own fields). `SchemaBuilder::build` composes every
//! kind's full, ordered field set once; trees then consult the resulting
//! read-only `Schema` for layout, type constraints and replace windows.

mod def;
mod error;
mod field;
mod name;
mod phase;
mod registry;
mod windows;

pub use def::{CapabilityDef, EnumDef, KindDef};
pub use error::{SchemaError, SchemaResult};
pub use field::{DefaultValue, FieldDef, FieldInit, FieldType, PrimitiveType, Value};
pub use name::Name;
pub use phase::ResolvePhase;
pub use registry::{ComposedKind, KindId, Schema, SchemaBuilder};
pub use windows::{PhaseWindows, WindowEntry, WindowTarget};
