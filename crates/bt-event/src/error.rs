use bt_agent::AgentError;
use bt_core::{AgentId, CoreError, EventId};
use bt_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("{event}: starting on {agent}, which does not have it pending")]
    NotPending { event: EventId, agent: AgentId },

    #[error("{agent} listed twice in one event")]
    DuplicateParticipant { agent: AgentId },

    #[error("event priority must be finite, got {0}")]
    InvalidPriority(f32),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type EventResult<T> = Result<T, EventError>;
