//! Leaf nodes: callbacks, timers, and trace points.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bt_core::{RunStatus, TimeSource, WallTime};
use tracing::info;

use crate::{NodeLogic, TreeResult};

// ── Action ────────────────────────────────────────────────────────────────────

/// A user callback in one of three shapes.
pub enum Action {
    /// Returns a status directly; invoked once per tick while `Running`.
    Status(Box<dyn FnMut() -> RunStatus + Send>),
    /// `true` → `Success`, `false` → `Failure`.
    Assert(Box<dyn FnMut() -> bool + Send>),
    /// Runs for side effects and always succeeds.
    Call(Box<dyn FnMut() + Send>),
}

impl Action {
    pub fn status(f: impl FnMut() -> RunStatus + Send + 'static) -> Self {
        Action::Status(Box::new(f))
    }

    pub fn assert(f: impl FnMut() -> bool + Send + 'static) -> Self {
        Action::Assert(Box::new(f))
    }

    pub fn call(f: impl FnMut() + Send + 'static) -> Self {
        Action::Call(Box::new(f))
    }

    /// Run the callback once and map its result onto a status.
    pub fn invoke(&mut self) -> RunStatus {
        match self {
            Action::Status(f) => f(),
            Action::Assert(f) => RunStatus::from_bool(f()),
            Action::Call(f) => {
                f();
                RunStatus::Success
            }
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Action::Status(_) => "Status",
            Action::Assert(_) => "Assert",
            Action::Call(_) => "Call",
        };
        write!(f, "Action::{shape}")
    }
}

// ── LeafInvoke ────────────────────────────────────────────────────────────────

/// Invokes an [`Action`] each tick until it reports a terminal status.
///
/// The optional termination action runs when the leaf is interrupted while
/// running.  A `Status` termination action is polled until terminal; the
/// other shapes complete in one call.
pub struct LeafInvoke {
    action:       Action,
    on_terminate: Option<Action>,
}

impl LeafInvoke {
    pub fn new(action: Action) -> Self {
        Self { action, on_terminate: None }
    }

    pub fn with_terminate(action: Action, on_terminate: Action) -> Self {
        Self { action, on_terminate: Some(on_terminate) }
    }
}

impl NodeLogic for LeafInvoke {
    fn kind(&self) -> &'static str {
        "LeafInvoke"
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        Ok(self.action.invoke())
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        Ok(self.on_terminate.as_mut().map_or(RunStatus::Success, Action::invoke))
    }
}

// ── LeafWait ──────────────────────────────────────────────────────────────────

/// Runs until a fixed duration has elapsed since it was started.
pub struct LeafWait {
    duration:   Duration,
    time:       Arc<dyn TimeSource>,
    started_at: Duration,
}

impl LeafWait {
    /// Wait measured on the wall clock.
    pub fn new(duration: Duration) -> Self {
        Self::with_time(duration, Arc::new(WallTime::new()))
    }

    /// Wait measured on an injected clock (e.g. the scheduler's pulse time).
    pub fn with_time(duration: Duration, time: Arc<dyn TimeSource>) -> Self {
        Self { duration, time, started_at: Duration::ZERO }
    }
}

impl NodeLogic for LeafWait {
    fn kind(&self) -> &'static str {
        "LeafWait"
    }

    fn start(&mut self) {
        self.started_at = self.time.now();
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        let waited = self.time.now().saturating_sub(self.started_at);
        if waited >= self.duration { Ok(RunStatus::Success) } else { Ok(RunStatus::Running) }
    }
}

// ── LeafTrace ─────────────────────────────────────────────────────────────────

/// Logs a message at `info` level and succeeds.
pub struct LeafTrace {
    message: String,
}

impl LeafTrace {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl NodeLogic for LeafTrace {
    fn kind(&self) -> &'static str {
        "LeafTrace"
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        info!(target: "bt_tree::trace", "{}", self.message);
        Ok(RunStatus::Success)
    }
}
