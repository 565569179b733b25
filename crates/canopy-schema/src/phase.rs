//! Resolution phases a tree node moves through.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered resolution phases, from freshly built (`Raw`) to `FullyResolved`.
///
/// The derived `Ord` follows declaration order, which is the order passes
/// run in. The `Error` sink is not a phase; it lives in the tree's per-node
/// resolve state.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePhase {
    Raw,
    Imports,
    CompilerRequiredAnnotations,
    CompanionGeneration,
    SuperTypes,
    SealedClassInheritors,
    Types,
    Status,
    ExpectActualMatching,
    Contracts,
    ImplicitTypesBodyResolve,
    ConstantEvaluation,
    AnnotationArguments,
    BodyResolve,
    FullyResolved,
}

impl ResolvePhase {
    pub const ALL: [ResolvePhase; 15] = [
        ResolvePhase::Raw,
        ResolvePhase::Imports,
        ResolvePhase::CompilerRequiredAnnotations,
        ResolvePhase::CompanionGeneration,
        ResolvePhase::SuperTypes,
        ResolvePhase::SealedClassInheritors,
        ResolvePhase::Types,
        ResolvePhase::Status,
        ResolvePhase::ExpectActualMatching,
        ResolvePhase::Contracts,
        ResolvePhase::ImplicitTypesBodyResolve,
        ResolvePhase::ConstantEvaluation,
        ResolvePhase::AnnotationArguments,
        ResolvePhase::BodyResolve,
        ResolvePhase::FullyResolved,
    ];

    pub fn is_terminal(self) -> bool {
        self == ResolvePhase::FullyResolved
    }

    /// The phase directly after this one, if any.
    pub fn next(self) -> Option<ResolvePhase> {
        let index = Self::ALL.iter().position(|p| *p == self)?;
        Self::ALL.get(index + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResolvePhase::Raw => "raw",
            ResolvePhase::Imports => "imports",
            ResolvePhase::CompilerRequiredAnnotations => "compiler_required_annotations",
            ResolvePhase::CompanionGeneration => "companion_generation",
            ResolvePhase::SuperTypes => "super_types",
            ResolvePhase::SealedClassInheritors => "sealed_class_inheritors",
            ResolvePhase::Types => "types",
            ResolvePhase::Status => "status",
            ResolvePhase::ExpectActualMatching => "expect_actual_matching",
            ResolvePhase::Contracts => "contracts",
            ResolvePhase::ImplicitTypesBodyResolve => "implicit_types_body_resolve",
            ResolvePhase::ConstantEvaluation => "constant_evaluation",
            ResolvePhase::AnnotationArguments => "annotation_arguments",
            ResolvePhase::BodyResolve => "body_resolve",
            ResolvePhase::FullyResolved => "fully_resolved",
        }
    }
}

impl fmt::Display for ResolvePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
