use bt_agent::AgentError;
use bt_core::CoreError;
use bt_event::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("event error: {0}")]
    Event(#[from] EventError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SchedResult<T> = Result<T, SchedError>;
