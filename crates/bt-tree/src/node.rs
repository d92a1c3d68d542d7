//! The node lifecycle engine.
//!
//! Every node in a tree is a [`Node`]: a shell that owns the lifecycle
//! bookkeeping (running / terminating flags, last statuses, identity) and a
//! boxed [`NodeLogic`] that holds the node-type-specific state machine.
//!
//! # Lifecycle
//!
//! ```text
//! start ──► tick* ──► (Success | Failure) ──► stop
//!   │                                          ▲
//!   └──► tick* ──► terminate* ──► (done) ──────┘
//! ```
//!
//! - [`Node::start`] resets run state and arms the logic.
//! - [`Node::tick`] advances the logic exactly one step and stops the node
//!   automatically once a terminal status comes back.
//! - [`Node::terminate`] is re-entrant: the first call flags the node as
//!   terminating, later calls keep driving the same termination until it
//!   reports a terminal status, and calls after that return the cached
//!   result.
//! - [`Node::stop`] releases in-flight state and may be called any number
//!   of times.

use std::fmt;

use bt_core::{NodeId, RunStatus};
use tracing::trace;

use crate::{TreeError, TreeResult};

/// Node-type-specific behavior driven by the [`Node`] shell.
///
/// Implementors keep their progress (child cursors, iteration counters,
/// timers) as plain fields and advance it one step per [`execute`] call.
/// `execute` is only called between `start` and the first terminal result;
/// the shell enforces that contract.
///
/// [`execute`]: NodeLogic::execute
pub trait NodeLogic: Send {
    /// Short type name used in diagnostics.
    fn kind(&self) -> &'static str;

    /// Reset progress for a fresh run.
    fn start(&mut self) {}

    /// Advance one step.
    fn execute(&mut self) -> TreeResult<RunStatus>;

    /// Release in-flight state.  Children are stopped by the shell.
    fn stop(&mut self) {}

    /// Drive termination of whatever this node has in flight.
    ///
    /// Only called while the node is running and not yet done terminating.
    /// Return `Running` to be called again next pulse.
    fn terminate(&mut self) -> TreeResult<RunStatus> {
        Ok(RunStatus::Success)
    }

    fn children(&self) -> &[Node] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Node] {
        &mut []
    }
}

/// A resumable unit of behavior logic.
///
/// Trees are immutable after construction: children are owned by their
/// parent and there is no API to add or remove them.
pub struct Node {
    id:                      NodeId,
    parent:                  Option<NodeId>,
    running:                 bool,
    terminating:             bool,
    armed:                   bool,
    last_status:             Option<RunStatus>,
    last_termination_status: Option<RunStatus>,
    logic:                   Box<dyn NodeLogic>,
}

impl Node {
    /// Wrap `logic` in a fresh node and adopt its children.
    pub fn new(logic: impl NodeLogic + 'static) -> Self {
        let id = NodeId::next();
        let mut logic: Box<dyn NodeLogic> = Box::new(logic);
        for child in logic.children_mut() {
            child.parent = Some(id);
        }
        Self {
            id,
            parent: None,
            running: false,
            terminating: false,
            armed: false,
            last_status: None,
            last_termination_status: None,
            logic,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Id of the composite or decorator that owns this node, if any.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.logic.kind()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_terminating(&self) -> bool {
        self.terminating
    }

    #[inline]
    pub fn last_status(&self) -> Option<RunStatus> {
        self.last_status
    }

    #[inline]
    pub fn last_termination_status(&self) -> Option<RunStatus> {
        self.last_termination_status
    }

    pub fn children(&self) -> &[Node] {
        self.logic.children()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Reset run state and arm the logic for a fresh run.
    ///
    /// Starting a node that is already running without stopping it first
    /// is a caller bug.
    pub fn start(&mut self) {
        self.running = true;
        self.terminating = false;
        self.last_status = None;
        self.last_termination_status = None;
        self.armed = true;
        self.logic.start();
    }

    /// Advance the node exactly once.
    pub fn tick(&mut self) -> TreeResult<RunStatus> {
        if self.last_status.is_some_and(RunStatus::is_terminal) {
            return Err(TreeError::TickOnFinished { node: self.id, kind: self.kind() });
        }
        if self.terminating {
            return Err(TreeError::TickWhileTerminating { node: self.id, kind: self.kind() });
        }
        if !self.armed {
            return Err(TreeError::TickUninitialized { node: self.id, kind: self.kind() });
        }

        let status = self.logic.execute()?;
        trace!(node = %self.id, kind = self.kind(), %status, "tick");
        self.last_status = Some(status);
        if status.is_terminal() {
            self.stop();
        }
        Ok(status)
    }

    /// Release in-flight state.  Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
        for child in self.logic.children_mut() {
            child.stop();
        }
        self.logic.stop();
        self.armed = false;
    }

    /// Drive termination of this node.  See the module docs for the
    /// re-entrancy contract.
    pub fn terminate(&mut self) -> TreeResult<RunStatus> {
        let current = self.begin_termination()?;
        if current.is_terminal() {
            return Ok(current);
        }
        let result = self.logic.terminate()?;
        self.finish_termination(result)
    }

    /// Clear `last_status` on this node and every descendant.
    pub fn clear_last_status(&mut self) {
        self.last_status = None;
        for child in self.logic.children_mut() {
            child.clear_last_status();
        }
    }

    // ── Termination bookkeeping ───────────────────────────────────────────

    fn begin_termination(&mut self) -> TreeResult<RunStatus> {
        if !self.running {
            return match self.last_termination_status {
                // Never running when termination began: nothing to do.
                None => Ok(RunStatus::Success),
                // Stopped mid-termination; logic must not stop itself.
                Some(RunStatus::Running) => Err(TreeError::BadTermination {
                    node:   self.id,
                    kind:   self.kind(),
                    detail: "stopped while terminating",
                }),
                Some(done) => Ok(done),
            };
        }
        if self.last_termination_status.is_none() {
            self.terminating = true;
            self.last_termination_status = Some(RunStatus::Running);
        }
        Ok(RunStatus::Running)
    }

    fn finish_termination(&mut self, result: RunStatus) -> TreeResult<RunStatus> {
        match self.last_termination_status {
            None => {
                return Err(TreeError::BadTermination {
                    node:   self.id,
                    kind:   self.kind(),
                    detail: "termination never began",
                });
            }
            Some(prev) if prev.is_terminal() && prev != result => {
                return Err(TreeError::BadTermination {
                    node:   self.id,
                    kind:   self.kind(),
                    detail: "terminal status changed",
                });
            }
            _ => {}
        }

        if result.is_terminal() {
            self.stop();
            self.terminating = false;
        }
        self.last_termination_status = Some(result);
        Ok(result)
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Indented dump of the subtree: one line per node with its kind, id,
    /// and last status.
    pub fn print_tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        use std::fmt::Write;

        if depth > 0 {
            out.push('\n');
        }
        for _ in 0..depth {
            out.push_str("   ");
        }
        let _ = write!(out, "{}[{}]", self.kind(), self.id.0);
        if let Some(status) = self.last_status {
            let _ = write!(out, " {status}");
        }
        for child in self.children() {
            child.write_tree(out, depth + 1);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("running", &self.running)
            .field("terminating", &self.terminating)
            .field("last_status", &self.last_status)
            .field("children", &self.children().len())
            .finish()
    }
}
