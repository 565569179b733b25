//! Pass pipeline over compilation units.
//!
//! ```text
//! CompilationUnit (Raw)
//!     │
//!     ▼
//! pass 1 ─► advance subtree to pass 1's phase
//!     │
//!     ▼
//! pass 2 ─► advance subtree to pass 2's phase
//!     ...
//! ```
//!
//! Passes run strictly in order on one unit. A contract error aborts the
//! unit and surfaces as `PipelineError::ContractViolation`; source-level
//! problems are diagnostics on nodes and never abort. Independent units
//! run in parallel with `run_units`.

use canopy_schema::ResolvePhase;
use derive_more::{Display, Error};
use rayon::prelude::*;
use tracing::{debug, error};

use crate::context::TreeContext;
use crate::diagnostic::{Diagnostic, DiagnosticSeverity};
use crate::error::{TreeError, TreeResult};
use crate::phase::ResolveState;
use crate::refs::NodeRef;
use crate::symbols::SymbolLookup;

/// One resolution pass.
pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    /// Phase every node of the unit has reached once the pass is done.
    fn phase(&self) -> ResolvePhase;

    fn run(
        &self,
        ctx: &mut TreeContext,
        root: NodeRef,
        symbols: &dyn SymbolLookup,
    ) -> TreeResult<()>;
}

/// A tree and its root, e.g. one source file.
pub struct CompilationUnit {
    pub name: String,
    pub ctx: TreeContext,
    pub root: NodeRef,
}

impl CompilationUnit {
    pub fn new(name: impl Into<String>, ctx: TreeContext, root: NodeRef) -> Self {
        CompilationUnit {
            name: name.into(),
            ctx,
            root,
        }
    }
}

/// Result of running a pipeline to completion on one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOutcome {
    pub unit: String,
    pub state: ResolveState,
    /// Source-level diagnostics found in the unit, pre-order.
    pub diagnostics: Vec<(NodeRef, Diagnostic)>,
}

impl UnitOutcome {
    pub fn has_errors(&self) -> bool {
        self.state.is_error()
            || self
                .diagnostics
                .iter()
                .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }
}

/// Errors that abort a compilation unit.
#[derive(Debug, Display, Error)]
pub enum PipelineError {
    #[display("internal error in `{unit}` during pass `{pass}`: {source}")]
    ContractViolation {
        unit: String,
        pass: &'static str,
        source: TreeError,
    },
}

/// Ordered list of passes.
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|pass| pass.name())
    }

    /// Run every pass on `unit`, advancing the unit after each one.
    pub fn run(
        &self,
        unit: &mut CompilationUnit,
        symbols: &dyn SymbolLookup,
    ) -> Result<UnitOutcome, PipelineError> {
        for pass in &self.passes {
            debug!(unit = %unit.name, pass = pass.name(), phase = %pass.phase(), "run pass");
            let result = pass
                .run(&mut unit.ctx, unit.root, symbols)
                .and_then(|()| self.complete_phase(unit, pass.phase()));
            if let Err(source) = result {
                error!(unit = %unit.name, pass = pass.name(), %source, "abort unit");
                return Err(PipelineError::ContractViolation {
                    unit: unit.name.clone(),
                    pass: pass.name(),
                    source,
                });
            }
        }

        let diagnostics = unit
            .ctx
            .collect_diagnostics(unit.root)
            .into_iter()
            .map(|(node, diagnostic)| (node, diagnostic.clone()))
            .collect();
        Ok(UnitOutcome {
            unit: unit.name.clone(),
            state: unit.ctx.state(unit.root),
            diagnostics,
        })
    }

    /// Advance the unit to `phase`, unless the pass already did or the
    /// root ended in `Error`.
    fn complete_phase(&self, unit: &mut CompilationUnit, phase: ResolvePhase) -> TreeResult<()> {
        match unit.ctx.state(unit.root) {
            ResolveState::Phase(current) if current < phase => {
                unit.ctx.advance_subtree(unit.root, phase).map(drop)
            }
            state => {
                debug!(unit = %unit.name, %state, %phase, "phase already settled");
                Ok(())
            }
        }
    }
}

/// Run `pipeline` on every unit in parallel. One unit aborting does not
/// affect the others.
pub fn run_units(
    pipeline: &Pipeline,
    units: &mut [CompilationUnit],
    symbols: &dyn SymbolLookup,
) -> Vec<Result<UnitOutcome, PipelineError>> {
    units
        .par_iter_mut()
        .map(|unit| pipeline.run(unit, symbols))
        .collect()
}
