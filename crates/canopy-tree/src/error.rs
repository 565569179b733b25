//! Contract errors raised by tree operations.
//!
//! Every variant signals a broken invariant in the pass that triggered it,
//! not a problem in the source being compiled. Pipelines propagate them
//! with `?` and abort the compilation unit.

use canopy_schema::{Name, ResolvePhase, SchemaError};
use derive_more::{Display, Error, From};

use crate::phase::ResolveState;
use crate::refs::{NodeRef, SymbolId};

pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Clone, Debug, Display, Error, From, PartialEq, Eq)]
pub enum TreeError {
    #[display("schema error: {_0}")]
    Schema(#[error(source)] SchemaError),

    #[display("unknown node kind `{kind}`")]
    #[from(ignore)]
    UnknownKind { kind: String },

    #[display("cannot instantiate abstract kind {kind}")]
    #[from(ignore)]
    AbstractKind { kind: Name },

    #[display("{kind} has no field `{field}`")]
    #[from(ignore)]
    UnknownField { kind: Name, field: String },

    #[display("missing required field `{field}` of {kind}")]
    #[from(ignore)]
    MissingRequiredField { kind: Name, field: Name },

    #[display("field `{field}` of {kind} expects {expected}, found {found}")]
    #[from(ignore)]
    TypeConstraintViolation {
        kind: Name,
        field: Name,
        expected: String,
        found: String,
    },

    #[display("field `{field}` of {kind} is not replaceable")]
    #[from(ignore)]
    ImmutableField { kind: Name, field: Name },

    #[display("field `{field}` of {kind} can only be replaced until {until}, node is at {phase}")]
    #[from(ignore)]
    StalePhaseMutation {
        kind: Name,
        field: Name,
        phase: ResolvePhase,
        until: ResolvePhase,
    },

    #[display("cannot advance {node} from {current} to {target}")]
    #[from(ignore)]
    PhaseOrderViolation {
        node: NodeRef,
        current: ResolveState,
        target: ResolvePhase,
    },

    #[display("{node} is in terminal state {state}")]
    #[from(ignore)]
    TerminalPhase { node: NodeRef, state: ResolveState },

    #[display("field `{field}` of {kind} read before initialisation")]
    #[from(ignore)]
    UninitializedField { kind: Name, field: Name },

    #[display("{child} is already owned by {owner}")]
    #[from(ignore)]
    ChildAlreadyOwned { child: NodeRef, owner: NodeRef },

    #[display("adopting {child} under {parent} would create a cycle")]
    #[from(ignore)]
    OwnershipCycle { parent: NodeRef, child: NodeRef },

    #[display("{node} already carries a diagnostic for this resolution attempt")]
    #[from(ignore)]
    DiagnosticAlreadyAttached { node: NodeRef },

    #[display("{node} is a {found}, expected {expected}")]
    #[from(ignore)]
    UnexpectedKind {
        node: NodeRef,
        expected: &'static str,
        found: Name,
    },

    #[display("{node} is not a declaration of {expected}")]
    #[from(ignore)]
    SymbolMismatch { node: NodeRef, expected: SymbolId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_convert_with_question_mark() {
        fn compose() -> TreeResult<()> {
            let composed: Result<(), SchemaError> = Err(SchemaError::UnknownKind {
                owner: Name::new("Call"),
                kind: Name::new("Nope"),
            });
            composed?;
            Ok(())
        }
        let err = compose().unwrap_err();
        assert!(matches!(err, TreeError::Schema(SchemaError::UnknownKind { .. })));
        assert!(err.to_string().starts_with("schema error: "));
    }
}
