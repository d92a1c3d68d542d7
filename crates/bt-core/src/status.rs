//! Status returned by behavior nodes.

use std::fmt;

/// The result of ticking a behavior node once.
///
/// `Running` means "tick me again next pulse"; `Success` and `Failure` are
/// terminal for the current start/stop cycle of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    /// The behavior has not finished yet.
    Running,

    /// The behavior completed successfully.
    ///
    /// For conditions: the condition was met.
    /// For actions: the action executed without errors.
    Success,

    /// The behavior failed.
    ///
    /// Leaf failures are ordinary data, never errors.
    Failure,
}

impl RunStatus {
    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, RunStatus::Running)
    }

    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, RunStatus::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, RunStatus::Failure)
    }

    /// `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Swaps Success and Failure; `Running` is left untouched.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            RunStatus::Success => RunStatus::Failure,
            RunStatus::Failure => RunStatus::Success,
            RunStatus::Running => RunStatus::Running,
        }
    }

    /// Maps a boolean assertion result onto Success / Failure.
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok { RunStatus::Success } else { RunStatus::Failure }
    }

    /// Folds one more child result into an aggregate "all children done?"
    /// status: any `Running` keeps the aggregate running, otherwise any
    /// `Failure` makes it a failure, otherwise it stays a success.
    ///
    /// Start the fold from `RunStatus::Success`.
    #[inline]
    pub fn merge_completion(self, next: RunStatus) -> Self {
        match (self, next) {
            (RunStatus::Running, _) | (_, RunStatus::Running) => RunStatus::Running,
            (RunStatus::Failure, _) | (_, RunStatus::Failure) => RunStatus::Failure,
            _ => RunStatus::Success,
        }
    }
}

impl From<bool> for RunStatus {
    #[inline]
    fn from(ok: bool) -> Self {
        RunStatus::from_bool(ok)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
        };
        f.write_str(s)
    }
}
