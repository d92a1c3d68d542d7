//! `bt-agent` — behavior agents for the behavior-tree engine.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`agent`]   | `BehaviorAgent`, `AgentStatus`                        |
//! | [`store`]   | `AgentStore` arena                                    |
//! | [`error`]   | `AgentError`, `AgentResult`                           |
//!
//! An agent owns one personal tree and tracks which events hold it or want
//! it.  Events refer to agents by `AgentId`; agents refer to events through
//! [`EventTicket`](bt_core::EventTicket)s so neither side holds a pointer
//! into the other.

pub mod agent;
pub mod error;
pub mod store;

#[cfg(test)]
mod tests;

pub use agent::{AgentStatus, AgentStatusSink, BehaviorAgent};
pub use error::{AgentError, AgentResult};
pub use store::AgentStore;
