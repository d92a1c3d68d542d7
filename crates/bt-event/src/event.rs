//! `BehaviorEvent`: a prioritized tree that runs across several agents.
//!
//! # Status machine
//!
//! | From           | To            | When                                          |
//! |----------------|---------------|-----------------------------------------------|
//! | `Initializing` | `Pending`     | eligible on every agent; injected as pending  |
//! | `Initializing` | `Finished`    | some agent holds an equal or higher event     |
//! | `Pending`      | `Running`     | every agent idle; tree started                |
//! | `Running`      | `Detaching`   | tree reported a terminal status               |
//! | `Terminating`  | `Detaching`   | tree termination completed                    |
//! | `Detaching`    | `Finished`    | every agent released                          |
//! | any of the first three | `Terminating` | [`BehaviorEvent::kill`]               |
//!
//! The transitions themselves are driven by
//! [`EventDriver`](crate::EventDriver), which needs both the agent and the
//! event arenas.

use std::fmt;

use bt_core::{AgentId, EventId, EventTicket, Priority, RunStatus};
use bt_tree::Node;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Checking eligibility against every involved agent.
    Initializing,
    /// Waiting for every agent to become available.
    Pending,
    /// Ticking the shared tree.
    Running,
    /// Winding the tree down after a kill.
    Terminating,
    /// Handing agents back.
    Detaching,
    /// Done.  Never runs again.
    Finished,
}

/// Callback fired on every event status change.
pub type EventStatusSink = Box<dyn FnMut(EventId, EventStatus) + Send>;

pub struct BehaviorEvent {
    pub(crate) id:        EventId,
    pub(crate) name:      Option<String>,
    pub(crate) priority:  Priority,
    pub(crate) tree:      Node,
    pub(crate) involved:  Vec<AgentId>,
    pub(crate) status:    EventStatus,
    pub(crate) outcome:   Option<RunStatus>,
    pub(crate) on_status: Option<EventStatusSink>,
}

impl BehaviorEvent {
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Handle plus priority, as agents record it.
    #[inline]
    pub fn ticket(&self) -> EventTicket {
        EventTicket::new(self.id, self.priority)
    }

    pub fn involved(&self) -> &[AgentId] {
        &self.involved
    }

    #[inline]
    pub fn status(&self) -> EventStatus {
        self.status
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status == EventStatus::Finished
    }

    /// The tree's own result, if it ran to completion.  `None` for events
    /// that were rejected or killed.
    #[inline]
    pub fn outcome(&self) -> Option<RunStatus> {
        self.outcome
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Ask the event to stop.  Returns `true` iff it is already finished.
    ///
    /// The tree is wound down on later pulses; calling this again while that
    /// is in progress changes nothing.
    pub fn kill(&mut self) -> bool {
        match self.status {
            EventStatus::Finished => true,
            EventStatus::Initializing | EventStatus::Pending | EventStatus::Running => {
                self.set_status(EventStatus::Terminating);
                false
            }
            EventStatus::Terminating | EventStatus::Detaching => false,
        }
    }

    /// Stop the tree immediately and mark the event finished.  Used on
    /// scheduler shutdown; agents are not released.
    pub fn halt(&mut self) {
        self.tree.stop();
        self.set_status(EventStatus::Finished);
    }

    pub(crate) fn set_status(&mut self, status: EventStatus) {
        if self.status == status {
            return;
        }
        debug!(event = %self, from = ?self.status, to = ?status, "event status");
        self.status = status;
        if let Some(sink) = &mut self.on_status {
            sink(self.id, status);
        }
    }
}

impl fmt::Display for BehaviorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}#{}", self.id.0),
            None => write!(f, "{}", self.id),
        }
    }
}

impl fmt::Debug for BehaviorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorEvent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("involved", &self.involved)
            .field("status", &self.status)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
