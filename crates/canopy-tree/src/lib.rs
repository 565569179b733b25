//! Arena-based, phase-aware IR tree.
//!
//! ## Overview
//!
//! A `TreeContext` holds every node of one compilation unit in an arena.
//! Nodes are laid out by a composed [`Schema`](canopy_schema::Schema): each
//! field slot has a declared type, a child/reference flag and optional
//! replace window. Mutation goes through one protocol:
//!
//! - [`TreeContext::replace`] checks replaceability, the field's phase
//!   window and the value type, then maintains ownership.
//! - [`TreeContext::advance_phase`] moves a node forward through
//!   [`ResolvePhase`]s, never backward.
//! - [`transform`] dispatches to per-kind [`Transformer`] hooks that fall
//!   back to the parent kind and finally to [`transform_children`].
//!
//! The typed API in [`kinds`] wraps node handles for the built-in
//! [`ir_schema`]; the untyped API works with any schema.
//!
//! ## Example
//!
//! ```ignore
//! let mut ctx = TreeContext::new(ir_schema());
//! let callee = SimpleNamedReference::builder()
//!     .set("name", Value::name("println"))
//!     .build(&mut ctx)?;
//! let call = FunctionCall::builder()
//!     .set("type_ref", ImplicitTypeRef::builder().build(&mut ctx)?)
//!     .set("callee_reference", callee)
//!     .set("argument_list", ArgumentList::builder().build(&mut ctx)?)
//!     .build_as::<FunctionCall>(&mut ctx)?;
//! call.replace_callee_reference(&mut ctx, resolved)?;
//! ctx.advance_phase(call.node(), ResolvePhase::BodyResolve)?;
//! ```

pub mod builder;
pub mod context;
pub mod diagnostic;
pub mod equality;
pub mod error;
pub mod ir_schema;
pub mod kinds;
pub mod phase;
pub mod pipeline;
pub mod printer;
pub mod refs;
pub mod symbols;
pub mod transform;
pub mod values;
pub mod walk;

#[cfg(test)]
mod test_schema;

#[doc(hidden)]
pub use paste;

pub use canopy_schema::{Name, ResolvePhase, Schema, Value};

pub use builder::NodeBuilder;
pub use context::{Owner, TreeContext};
pub use diagnostic::{Diagnostic, DiagnosticSeverity};
pub use equality::{first_difference, structurally_equal};
pub use error::{TreeError, TreeResult};
pub use ir_schema::{build_ir_schema, ir_schema};
pub use kinds::{
    ApiSurface, FieldSurface, NodeKind, TreeNode, Transformer, api_surface, capability_surface,
    dispatch_transform,
};
pub use phase::ResolveState;
pub use pipeline::{CompilationUnit, Pass, Pipeline, PipelineError, UnitOutcome, run_units};
pub use printer::render;
pub use refs::{NodeRef, SymbolId, TreeId};
pub use symbols::{DeclarationRef, SymbolLookup, SymbolTable};
pub use transform::{transform, transform_children};
pub use values::{FieldValue, NodeList};
pub use walk::{WalkAction, children_of, subtree, walk_node, walk_typed};
