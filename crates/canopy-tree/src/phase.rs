//! Per-node resolution state machine.
//!
//! A node starts in `Raw` and only moves forward through the ordered
//! `ResolvePhase`s. `Error` is a sink reachable from any state; it keeps the
//! phase the node had reached so replace windows are still judged against
//! real progress.

use std::fmt;

use canopy_schema::ResolvePhase;
use tracing::debug;

use crate::context::TreeContext;
use crate::error::{TreeError, TreeResult};
use crate::refs::NodeRef;
use crate::walk::children_of;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveState {
    Phase(ResolvePhase),
    Error { reached: ResolvePhase },
}

impl ResolveState {
    pub const INITIAL: ResolveState = ResolveState::Phase(ResolvePhase::Raw);

    /// The furthest phase the node reached, including before an error.
    pub fn reached(self) -> ResolvePhase {
        match self {
            ResolveState::Phase(phase) | ResolveState::Error { reached: phase } => phase,
        }
    }

    pub fn phase(self) -> Option<ResolvePhase> {
        match self {
            ResolveState::Phase(phase) => Some(phase),
            ResolveState::Error { .. } => None,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, ResolveState::Error { .. })
    }

    pub fn is_terminal(self) -> bool {
        self.is_error() || self.reached().is_terminal()
    }
}

impl Default for ResolveState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for ResolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveState::Phase(phase) => write!(f, "{phase}"),
            ResolveState::Error { reached } => write!(f, "error@{reached}"),
        }
    }
}

impl TreeContext {
    pub fn state(&self, node: NodeRef) -> ResolveState {
        self.node(node).state
    }

    /// Current phase, or `None` once the node is in `Error`.
    pub fn phase(&self, node: NodeRef) -> Option<ResolvePhase> {
        self.state(node).phase()
    }

    /// Move `node` forward to `target`.
    ///
    /// Fails with `PhaseOrderViolation` unless `target` is strictly later
    /// than the current phase, and with `TerminalPhase` once the node is in
    /// `Error`. The state is left untouched on failure.
    pub fn advance_phase(&mut self, node: NodeRef, target: ResolvePhase) -> TreeResult<()> {
        let current = self.state(node);
        match current {
            ResolveState::Error { .. } => Err(TreeError::TerminalPhase {
                node,
                state: current,
            }),
            ResolveState::Phase(phase) if target <= phase => Err(TreeError::PhaseOrderViolation {
                node,
                current,
                target,
            }),
            ResolveState::Phase(_) => {
                debug!(%node, from = %current, to = %target, "advance phase");
                self.node_mut(node).state = ResolveState::Phase(target);
                Ok(())
            }
        }
    }

    /// Move `node` into the `Error` sink. Always legal and idempotent.
    pub fn mark_error(&mut self, node: NodeRef) {
        let data = self.node_mut(node);
        if let ResolveState::Phase(reached) = data.state {
            debug!(%node, %reached, "mark error");
            data.state = ResolveState::Error { reached };
        }
    }

    /// Advance `root` and every descendant that is still behind `target`.
    ///
    /// The root itself must be strictly behind `target`; descendants that
    /// already reached it, or sit in `Error`, are left alone. Returns the
    /// number of nodes advanced.
    pub fn advance_subtree(&mut self, root: NodeRef, target: ResolvePhase) -> TreeResult<usize> {
        self.advance_phase(root, target)?;
        let mut advanced = 1;
        let mut stack: Vec<NodeRef> = children_of(self, root).collect();
        while let Some(node) = stack.pop() {
            match self.state(node) {
                ResolveState::Phase(phase) if phase < target => {
                    self.node_mut(node).state = ResolveState::Phase(target);
                    advanced += 1;
                }
                _ => {}
            }
            stack.extend(children_of(self, node));
        }
        debug!(%root, %target, advanced, "advance subtree");
        Ok(advanced)
    }
}
