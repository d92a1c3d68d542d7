use bt_core::{AgentId, CoreError};
use bt_tree::TreeError;
use thiserror::Error;

use crate::AgentStatus;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{agent}: cannot {op} while {status:?}")]
    BadState {
        agent:  AgentId,
        op:     &'static str,
        status: AgentStatus,
    },

    #[error("{agent}: already has current event")]
    EventAlreadyActive { agent: AgentId },

    #[error("{agent}: no current event")]
    NoCurrentEvent { agent: AgentId },

    #[error("{agent}: no pending event to start")]
    NoPendingEvent { agent: AgentId },

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AgentResult<T> = Result<T, AgentError>;
