//! Fluent builder for [`BehaviorEvent`]s.

use bt_core::{AgentId, EventId, Priority, DEFAULT_EVENT_PRIORITY};
use bt_tree::Node;

use crate::{BehaviorEvent, EventError, EventResult, EventStatus, Participant};

/// Fluent builder for [`BehaviorEvent`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                    |
/// |--------------------|----------------------------|
/// | `.priority(p)`     | `DEFAULT_EVENT_PRIORITY`   |
/// | `.name(s)`         | none                       |
/// | `.on_status(f)`    | none                       |
///
/// # Example
///
/// ```rust,ignore
/// let event = EventBuilder::new(conversation_tree)
///     .priority(0.9)
///     .name("conversation")
///     .participant(&alice)
///     .participant(&bob);
/// let id = scheduler.spawn_event(event)?;
/// ```
pub struct EventBuilder {
    tree:      Node,
    priority:  f32,
    name:      Option<String>,
    involved:  Vec<AgentId>,
    on_status: Option<crate::EventStatusSink>,
}

impl EventBuilder {
    pub fn new(tree: Node) -> Self {
        Self {
            tree,
            priority:  DEFAULT_EVENT_PRIORITY,
            name:      None,
            involved:  Vec::new(),
            on_status: None,
        }
    }

    /// Higher wins.  Must be finite.
    pub fn priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// Diagnostic name shown in logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn participant(mut self, participant: &impl Participant) -> Self {
        self.involved.push(participant.behavior_agent());
        self
    }

    pub fn participants<P: Participant>(mut self, participants: impl IntoIterator<Item = P>) -> Self {
        self.involved.extend(participants.into_iter().map(|p| p.behavior_agent()));
        self
    }

    pub fn on_status(mut self, sink: impl FnMut(EventId, EventStatus) + Send + 'static) -> Self {
        self.on_status = Some(Box::new(sink));
        self
    }

    /// Validate inputs and produce an unregistered event.  The id is
    /// assigned on insertion into an [`EventStore`](crate::EventStore).
    pub fn build(self) -> EventResult<BehaviorEvent> {
        if !self.priority.is_finite() {
            return Err(EventError::InvalidPriority(self.priority));
        }
        for (i, agent) in self.involved.iter().enumerate() {
            if self.involved[..i].contains(agent) {
                return Err(EventError::DuplicateParticipant { agent: *agent });
            }
        }

        Ok(BehaviorEvent {
            id:        EventId::INVALID,
            name:      self.name,
            priority:  Priority(self.priority),
            tree:      self.tree,
            involved:  self.involved,
            status:    EventStatus::Initializing,
            outcome:   None,
            on_status: self.on_status,
        })
    }
}
