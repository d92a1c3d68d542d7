use bt_core::NodeId;
use thiserror::Error;

/// Protocol violations inside a tree.
///
/// These indicate a bug in tree construction or in whatever drives the
/// tree; they are never used for ordinary leaf failure, which is reported
/// as `RunStatus::Failure`.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{kind} {node}: tick on non-running node")]
    TickOnFinished { node: NodeId, kind: &'static str },

    #[error("{kind} {node}: tick on terminating node")]
    TickWhileTerminating { node: NodeId, kind: &'static str },

    #[error("{kind} {node}: tick on uninitialized node")]
    TickUninitialized { node: NodeId, kind: &'static str },

    /// A node's logic was asked to advance after it had already produced
    /// its final status.
    #[error("{kind}: unexpected end of execution")]
    ExhaustedExecution { kind: &'static str },

    #[error("{kind} {node}: invalid termination transition ({detail})")]
    BadTermination {
        node:   NodeId,
        kind:   &'static str,
        detail: &'static str,
    },

    #[error("child {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f32 },

    #[error("no affordance named {0:?}")]
    UnknownAffordance(String),

    #[error("affordance {0:?} registered twice")]
    DuplicateAffordance(String),

    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

pub type TreeResult<T> = Result<T, TreeError>;
