//! Source-level diagnostics attached to nodes.
//!
//! Each node carries at most one diagnostic. Within one resolution attempt
//! it can be attached once; `replace_diagnostic` clears or updates it
//! explicitly, and `begin_resolution_attempt` opens a new attempt.

use canopy_schema::{Name, ResolvePhase};
use tracing::debug;

use crate::context::TreeContext;
use crate::error::{TreeError, TreeResult};
use crate::refs::NodeRef;
use crate::walk::subtree;

/// A diagnostic message (error, warning, or info) produced by a pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub message: String,
    pub severity: DiagnosticSeverity,
    /// Phase of the pass that produced the diagnostic.
    pub phase: ResolvePhase,
    /// Machine-readable category, e.g. `unresolved_reference`.
    pub kind: Name,
}

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "ERROR"),
            DiagnosticSeverity::Warning => write!(f, "WARNING"),
            DiagnosticSeverity::Info => write!(f, "INFO"),
        }
    }
}

impl Diagnostic {
    pub fn error(kind: &'static str, phase: ResolvePhase, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: DiagnosticSeverity::Error,
            phase,
            kind: Name::new(kind),
        }
    }

    pub fn warning(kind: &'static str, phase: ResolvePhase, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: DiagnosticSeverity::Warning,
            ..Diagnostic::error(kind, phase, message)
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.phase, self.kind, self.message
        )
    }
}

impl TreeContext {
    pub fn diagnostic(&self, node: NodeRef) -> Option<&Diagnostic> {
        self.node(node).diagnostic.as_ref()
    }

    /// Start a new resolution attempt for `node`, allowing one more
    /// `attach_diagnostic`. The current diagnostic stays visible until
    /// replaced.
    pub fn begin_resolution_attempt(&mut self, node: NodeRef) {
        self.node_mut(node).attempt += 1;
    }

    /// Attach a diagnostic, once per resolution attempt.
    pub fn attach_diagnostic(&mut self, node: NodeRef, diagnostic: Diagnostic) -> TreeResult<()> {
        let data = self.node_mut(node);
        if data.diagnostic.is_some() && data.diagnostic_attempt == Some(data.attempt) {
            return Err(TreeError::DiagnosticAlreadyAttached { node });
        }
        debug!(%node, kind = %diagnostic.kind, message = %diagnostic.message, "attach diagnostic");
        data.diagnostic_attempt = Some(data.attempt);
        data.diagnostic = Some(diagnostic);
        Ok(())
    }

    /// Set or clear the diagnostic unconditionally, returning the old one.
    pub fn replace_diagnostic(
        &mut self,
        node: NodeRef,
        diagnostic: Option<Diagnostic>,
    ) -> Option<Diagnostic> {
        let data = self.node_mut(node);
        data.diagnostic_attempt = diagnostic.as_ref().map(|_| data.attempt);
        std::mem::replace(&mut data.diagnostic, diagnostic)
    }

    /// Diagnostics of the subtree rooted at `root`, pre-order.
    pub fn collect_diagnostics(&self, root: NodeRef) -> Vec<(NodeRef, &Diagnostic)> {
        subtree(self, root)
            .into_iter()
            .filter_map(|node| self.diagnostic(node).map(|d| (node, d)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_schema::{context, group, leaf};

    fn unresolved(message: &str) -> Diagnostic {
        Diagnostic::error("unresolved_reference", ResolvePhase::BodyResolve, message)
    }

    #[test]
    fn attach_once_per_attempt() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        assert_eq!(ctx.diagnostic(a), None);

        ctx.attach_diagnostic(a, unresolved("first")).unwrap();
        assert_eq!(
            ctx.attach_diagnostic(a, unresolved("second")),
            Err(TreeError::DiagnosticAlreadyAttached { node: a })
        );
        assert_eq!(ctx.diagnostic(a).map(|d| d.message.as_str()), Some("first"));

        ctx.begin_resolution_attempt(a);
        ctx.attach_diagnostic(a, unresolved("retry")).unwrap();
        assert_eq!(ctx.diagnostic(a).map(|d| d.message.as_str()), Some("retry"));
    }

    #[test]
    fn replace_clears_and_updates() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        ctx.attach_diagnostic(a, unresolved("first")).unwrap();

        let old = ctx.replace_diagnostic(a, None);
        assert_eq!(old.map(|d| d.message), Some("first".to_string()));
        assert_eq!(ctx.diagnostic(a), None);

        ctx.attach_diagnostic(a, unresolved("again")).unwrap();
        ctx.replace_diagnostic(a, Some(unresolved("updated")));
        assert_eq!(ctx.diagnostic(a).map(|d| d.message.as_str()), Some("updated"));
    }

    #[test]
    fn collects_subtree_diagnostics_in_order() {
        let mut ctx = context();
        let a = leaf(&mut ctx, "a");
        let b = leaf(&mut ctx, "b");
        let outside = leaf(&mut ctx, "outside");
        let g = group(&mut ctx, &[a, b]);
        ctx.attach_diagnostic(b, unresolved("b")).unwrap();
        ctx.attach_diagnostic(a, Diagnostic::warning("shadowed", ResolvePhase::Types, "a"))
            .unwrap();
        ctx.attach_diagnostic(outside, unresolved("outside")).unwrap();

        let collected: Vec<String> = ctx
            .collect_diagnostics(g)
            .into_iter()
            .map(|(_, d)| d.to_string())
            .collect();
        assert_eq!(
            collected,
            [
                "WARNING [types] shadowed: a",
                "ERROR [body_resolve] unresolved_reference: b",
            ]
        );
    }
}
