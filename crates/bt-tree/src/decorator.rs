//! Single-child decorators.
//!
//! A decorator starts its child lazily on its first tick and restarts it
//! whenever it needs another run (see [`Loop`]).  Termination of a
//! decorator is forwarded to the child.

use std::num::NonZeroU32;
use std::slice;

use bt_core::RunStatus;

use crate::{Action, Node, NodeLogic, TreeResult};

/// Child slot shared by all decorators.
struct Wrapped {
    child:   Node,
    started: bool,
}

impl Wrapped {
    fn new(child: Node) -> Self {
        Self { child, started: false }
    }

    /// Tick the child once, starting it first if needed.
    fn step(&mut self) -> TreeResult<RunStatus> {
        if !self.started {
            self.child.start();
            self.started = true;
        }
        let result = self.child.tick()?;
        if result.is_terminal() {
            self.started = false;
        }
        Ok(result)
    }
}

macro_rules! wrapped_children {
    () => {
        fn stop(&mut self) {
            self.inner.started = false;
        }

        fn children(&self) -> &[Node] {
            slice::from_ref(&self.inner.child)
        }

        fn children_mut(&mut self) -> &mut [Node] {
            slice::from_mut(&mut self.inner.child)
        }
    };
}

// ── Invert ────────────────────────────────────────────────────────────────────

/// Swaps the child's Success and Failure.
pub struct Invert {
    inner: Wrapped,
}

impl Invert {
    pub fn new(child: Node) -> Self {
        Self { inner: Wrapped::new(child) }
    }
}

impl NodeLogic for Invert {
    fn kind(&self) -> &'static str {
        "Invert"
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        Ok(self.inner.step()?.invert())
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        self.inner.child.terminate()
    }

    wrapped_children!();
}

// ── ForceStatus ───────────────────────────────────────────────────────────────

/// Replaces the child's terminal result with a fixed status.
pub struct ForceStatus {
    inner:  Wrapped,
    forced: RunStatus,
}

impl ForceStatus {
    pub fn new(forced: RunStatus, child: Node) -> Self {
        Self { inner: Wrapped::new(child), forced }
    }
}

impl NodeLogic for ForceStatus {
    fn kind(&self) -> &'static str {
        "ForceStatus"
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        match self.inner.step()? {
            RunStatus::Running => Ok(RunStatus::Running),
            _ => Ok(self.forced),
        }
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        self.inner.child.terminate()
    }

    wrapped_children!();
}

// ── Loop ──────────────────────────────────────────────────────────────────────

/// How many successful iterations a [`Loop`] runs before succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCount {
    Forever,
    Times(NonZeroU32),
}

impl LoopCount {
    /// `Times(n)`, or `Forever` for `n == 0`.
    pub fn from_count(n: u32) -> Self {
        NonZeroU32::new(n).map_or(LoopCount::Forever, LoopCount::Times)
    }
}

/// Re-runs the child after every success.
///
/// A child failure ends the loop with `Failure`.  The loop yields `Running`
/// after each completed iteration, so an instantly succeeding child cannot
/// spin inside a single tick.
pub struct Loop {
    inner:     Wrapped,
    count:     LoopCount,
    completed: u32,
}

impl Loop {
    pub fn new(count: LoopCount, child: Node) -> Self {
        Self { inner: Wrapped::new(child), count, completed: 0 }
    }

    pub fn forever(child: Node) -> Self {
        Self::new(LoopCount::Forever, child)
    }
}

impl NodeLogic for Loop {
    fn kind(&self) -> &'static str {
        "Loop"
    }

    fn start(&mut self) {
        self.completed = 0;
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        match self.inner.step()? {
            RunStatus::Running => Ok(RunStatus::Running),
            RunStatus::Failure => Ok(RunStatus::Failure),
            RunStatus::Success => {
                self.completed = self.completed.saturating_add(1);
                match self.count {
                    LoopCount::Times(n) if self.completed >= n.get() => Ok(RunStatus::Success),
                    _ => Ok(RunStatus::Running),
                }
            }
        }
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        self.inner.child.terminate()
    }

    wrapped_children!();
}

// ── Catch ─────────────────────────────────────────────────────────────────────

/// Passes the child through unchanged, and runs a cleanup action once the
/// child has finished terminating.
///
/// The cleanup's status becomes the termination result; a `Running` cleanup
/// is polled again on the next termination call.
pub struct Catch {
    inner:   Wrapped,
    cleanup: Action,
}

impl Catch {
    pub fn new(cleanup: Action, child: Node) -> Self {
        Self { inner: Wrapped::new(child), cleanup }
    }
}

impl NodeLogic for Catch {
    fn kind(&self) -> &'static str {
        "Catch"
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        self.inner.step()
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        if self.inner.child.terminate()?.is_running() {
            return Ok(RunStatus::Running);
        }
        Ok(self.cleanup.invoke())
    }

    wrapped_children!();
}
