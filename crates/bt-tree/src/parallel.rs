//! Parallel composites.
//!
//! All three start every child together and tick each still-running child
//! once per tick, in declaration order.  They differ only in which child
//! result settles the whole node:
//!
//! | Node               | Settles on                | Otherwise, when all done |
//! |--------------------|---------------------------|--------------------------|
//! | [`Race`]           | first terminal child      | n/a                      |
//! | [`SelectorParallel`] | first `Success`         | `Failure`                |
//! | [`SequenceParallel`] | first `Failure`         | `Success`                |
//!
//! Settling begins termination of every remaining child in the same tick.
//! The node keeps reporting `Running` until every child has finished
//! terminating, then clears the last status of every child but the one that
//! decided, and reports the settled result.

use bt_core::RunStatus;

use crate::{Node, NodeLogic, TreeResult};

struct Parallel {
    children:     Vec<Node>,
    child_status: Vec<RunStatus>,
    running:      usize,
    settled:      Option<RunStatus>,
    winner:       Option<usize>,
}

impl Parallel {
    fn new(children: Vec<Node>) -> Self {
        Self { children, child_status: Vec::new(), running: 0, settled: None, winner: None }
    }

    fn start(&mut self) {
        for child in &mut self.children {
            child.start();
        }
        self.child_status = vec![RunStatus::Running; self.children.len()];
        self.running = self.children.len();
        self.settled = None;
        self.winner = None;
    }

    /// Tick every running child once.  Returns the first terminal result
    /// for which `settles` holds.
    fn tick_children(&mut self, settles: impl Fn(RunStatus) -> bool) -> TreeResult<Option<RunStatus>> {
        for (index, (child, status)) in self.children.iter_mut().zip(self.child_status.iter_mut()).enumerate() {
            if status.is_terminal() {
                continue;
            }
            let result = child.tick()?;
            if result.is_terminal() {
                *status = result;
                self.running -= 1;
                if settles(result) {
                    self.winner = Some(index);
                    return Ok(Some(result));
                }
            }
        }
        Ok(None)
    }

    /// Drive termination of every child.  `Running` while any is still
    /// winding down.
    fn terminate_children(&mut self) -> TreeResult<RunStatus> {
        let mut aggregate = RunStatus::Success;
        for child in &mut self.children {
            aggregate = aggregate.merge_completion(child.terminate()?);
        }
        Ok(aggregate)
    }

    fn settle(&mut self, result: RunStatus) -> TreeResult<RunStatus> {
        self.settled = Some(result);
        if self.terminate_children()?.is_running() {
            return Ok(RunStatus::Running);
        }
        // Only the deciding child keeps its status.
        for (index, child) in self.children.iter_mut().enumerate() {
            if Some(index) != self.winner {
                child.clear_last_status();
            }
        }
        Ok(result)
    }

    fn run(
        &mut self,
        settles: impl Fn(RunStatus) -> bool,
        exhausted: RunStatus,
    ) -> TreeResult<RunStatus> {
        if let Some(result) = self.settled {
            return self.settle(result);
        }
        if let Some(result) = self.tick_children(settles)? {
            return self.settle(result);
        }
        if self.running == 0 { Ok(exhausted) } else { Ok(RunStatus::Running) }
    }
}

macro_rules! parallel_logic {
    ($ty:ident, $settles:expr, $exhausted:expr) => {
        impl NodeLogic for $ty {
            fn kind(&self) -> &'static str {
                stringify!($ty)
            }

            fn start(&mut self) {
                self.0.start();
            }

            fn execute(&mut self) -> TreeResult<RunStatus> {
                self.0.run($settles, $exhausted)
            }

            fn terminate(&mut self) -> TreeResult<RunStatus> {
                self.0.terminate_children()
            }

            fn children(&self) -> &[Node] {
                &self.0.children
            }

            fn children_mut(&mut self) -> &mut [Node] {
                &mut self.0.children
            }
        }
    };
}

/// Runs all children; the first to finish decides the result and the rest
/// are terminated.  With no children the race succeeds immediately.
pub struct Race(Parallel);

impl Race {
    pub fn new(children: Vec<Node>) -> Self {
        Race(Parallel::new(children))
    }
}

parallel_logic!(Race, RunStatus::is_terminal, RunStatus::Success);

/// Succeeds on the first child success, terminating the rest.  Fails once
/// every child has failed.
pub struct SelectorParallel(Parallel);

impl SelectorParallel {
    pub fn new(children: Vec<Node>) -> Self {
        SelectorParallel(Parallel::new(children))
    }
}

parallel_logic!(SelectorParallel, RunStatus::is_success, RunStatus::Failure);

/// Fails on the first child failure, terminating the rest.  Succeeds once
/// every child has succeeded.
pub struct SequenceParallel(Parallel);

impl SequenceParallel {
    pub fn new(children: Vec<Node>) -> Self {
        SequenceParallel(Parallel::new(children))
    }
}

parallel_logic!(SequenceParallel, RunStatus::is_failure, RunStatus::Success);
