//! `BehaviorAgent`: one entity's personal tree plus event bookkeeping.
//!
//! # Status machine
//!
//! ```text
//!            behavior_start            behavior_stop
//!   Idle ──────────────────► Running ─────────────────► Terminating
//!    ▲  ▲                      │ tree done                  │ terminate done
//!    │  └──────────────────────┘                            │
//!    │◄─────────────────────────────────────────────────────┘
//!    │ event_finished        event_started (only from Idle)
//!   InEvent ◄──────────────────────────────────────────── Idle
//! ```
//!
//! The personal tree and an event never hold the agent at the same time:
//! an event may only start on an `Idle` agent, and the personal tree may
//! only be started from `Idle`.

use std::fmt;

use bt_core::{AgentId, EventTicket, Priority, RunStatus};
use bt_tree::Node;
use tracing::{debug, warn};

use crate::{AgentError, AgentResult};

/// Coarse status of a [`BehaviorAgent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentStatus {
    /// Doing nothing.
    Idle,
    /// Ticking its personal tree.
    Running,
    /// Winding down its personal tree.
    Terminating,
    /// Suspended and possessed by an event.
    InEvent,
}

/// Callback fired on every agent status change.
pub type AgentStatusSink = Box<dyn FnMut(AgentId, AgentStatus) + Send>;

pub struct BehaviorAgent {
    id:            AgentId,
    tree:          Node,
    status:        AgentStatus,
    current_event: Option<EventTicket>,
    pending_event: Option<EventTicket>,
    on_status:     Option<AgentStatusSink>,
}

impl BehaviorAgent {
    /// A new idle agent.  The id is assigned when the agent is inserted
    /// into an [`AgentStore`](crate::AgentStore).
    pub fn new(tree: Node) -> Self {
        Self {
            id: AgentId::INVALID,
            tree,
            status: AgentStatus::Idle,
            current_event: None,
            pending_event: None,
            on_status: None,
        }
    }

    pub fn with_status_sink(mut self, sink: impl FnMut(AgentId, AgentStatus) + Send + 'static) -> Self {
        self.on_status = Some(Box::new(sink));
        self
    }

    pub(crate) fn set_id(&mut self, id: AgentId) {
        self.id = id;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    #[inline]
    pub fn current_event(&self) -> Option<EventTicket> {
        self.current_event
    }

    #[inline]
    pub fn pending_event(&self) -> Option<EventTicket> {
        self.pending_event
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// The priority a new event has to beat to take this agent: the pending
    /// event's, else the current event's, else zero.
    pub fn current_priority(&self) -> Priority {
        self.pending_event
            .or(self.current_event)
            .map_or(Priority::ZERO, |ticket| ticket.priority)
    }

    // ── Autonomy ──────────────────────────────────────────────────────────

    /// Resume the personal tree.  No-op when already running.
    pub fn behavior_start(&mut self) -> AgentResult<()> {
        match self.status {
            AgentStatus::Running => Ok(()),
            AgentStatus::Idle => {
                self.tree.start();
                self.set_status(AgentStatus::Running);
                Ok(())
            }
            status => Err(AgentError::BadState { agent: self.id, op: "start behavior", status }),
        }
    }

    /// Ask the personal tree to suspend.
    ///
    /// Returns `true` iff the agent is already idle.  Otherwise the agent is
    /// flagged `Terminating` and the tree is wound down on later updates.
    /// An agent held by an event is left alone; kill the event instead.
    pub fn behavior_stop(&mut self) -> bool {
        match self.status {
            AgentStatus::Idle => true,
            AgentStatus::Running => {
                self.set_status(AgentStatus::Terminating);
                false
            }
            AgentStatus::Terminating => false,
            AgentStatus::InEvent => {
                debug!(agent = %self.id, "behavior_stop ignored while in event");
                false
            }
        }
    }

    // ── Event bookkeeping ─────────────────────────────────────────────────

    /// `true` iff `candidate` strictly outranks both the current and the
    /// pending event (when present).  Ties are not eligible.
    pub fn event_eligible(&self, candidate: &EventTicket) -> bool {
        [self.current_event, self.pending_event]
            .iter()
            .flatten()
            .all(|held| candidate.outranks(held))
    }

    /// Replace (or clear) the pending event.
    ///
    /// Replacing a pending event with one that does not strictly outrank it
    /// is allowed but logged.
    pub fn set_pending_event(&mut self, ticket: Option<EventTicket>) {
        if let (Some(old), Some(new)) = (self.pending_event, ticket) {
            if !new.outranks(&old) {
                warn!(
                    agent = %self.id,
                    old = %old.event,
                    new = %new.event,
                    "replacing pending event with one of no higher priority",
                );
            }
        }
        self.pending_event = ticket;
    }

    /// The pending event has become the current event.
    pub fn event_started(&mut self) -> AgentResult<()> {
        if self.current_event.is_some() {
            return Err(AgentError::EventAlreadyActive { agent: self.id });
        }
        if self.status != AgentStatus::Idle {
            return Err(AgentError::BadState { agent: self.id, op: "start event", status: self.status });
        }
        let ticket = self.pending_event.take().ok_or(AgentError::NoPendingEvent { agent: self.id })?;
        self.current_event = Some(ticket);
        self.set_status(AgentStatus::InEvent);
        Ok(())
    }

    /// The current event is done with this agent.  Autonomy is not resumed
    /// here; call [`behavior_start`](Self::behavior_start) for that.
    pub fn event_finished(&mut self) -> AgentResult<()> {
        if self.current_event.take().is_none() {
            return Err(AgentError::NoCurrentEvent { agent: self.id });
        }
        self.set_status(AgentStatus::Idle);
        Ok(())
    }

    /// Stop the personal tree immediately and forget every event.  Used on
    /// scheduler shutdown; no termination is driven.
    pub fn halt(&mut self) {
        self.tree.stop();
        self.current_event = None;
        self.pending_event = None;
        self.set_status(AgentStatus::Idle);
    }

    // ── Pulse ─────────────────────────────────────────────────────────────

    /// Per-pulse update.  Always asks to be scheduled again.
    pub fn update(&mut self) -> AgentResult<bool> {
        match self.status {
            AgentStatus::Running => {
                let result = self.tree.tick()?;
                if result.is_terminal() {
                    debug!(agent = %self.id, %result, "personal tree finished");
                    self.set_status(AgentStatus::Idle);
                }
            }
            AgentStatus::Terminating => {
                let result = self.tree.terminate()?;
                if result.is_terminal() {
                    if result == RunStatus::Failure {
                        warn!(agent = %self.id, "personal tree terminated with failure");
                    }
                    self.set_status(AgentStatus::Idle);
                }
            }
            AgentStatus::Idle | AgentStatus::InEvent => {}
        }
        Ok(true)
    }

    fn set_status(&mut self, status: AgentStatus) {
        if self.status == status {
            return;
        }
        debug!(agent = %self.id, from = ?self.status, to = ?status, "agent status");
        self.status = status;
        if let Some(sink) = &mut self.on_status {
            sink(self.id, status);
        }
    }
}

impl fmt::Debug for BehaviorAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorAgent")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("current_event", &self.current_event)
            .field("pending_event", &self.pending_event)
            .finish_non_exhaustive()
    }
}
