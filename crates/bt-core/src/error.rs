//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so handle lookups stay uniform across layers.

use thiserror::Error;

use crate::{AgentId, EventId};

/// The base error type shared by all `bt-*` crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("event {0} not found")]
    EventNotFound(EventId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `bt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
