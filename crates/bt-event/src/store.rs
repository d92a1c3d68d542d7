//! Arena of behavior events.

use bt_core::{CoreError, EventId};

use crate::{BehaviorEvent, EventResult, EventStatus};

/// Owns every live `BehaviorEvent`; `EventId` is the slot index.
///
/// Reaped events leave an empty slot behind and their ids are never handed
/// out again, so a stale handle reads as `Finished` rather than aliasing a
/// newer event.
#[derive(Debug, Default)]
pub struct EventStore {
    slots: Vec<Option<BehaviorEvent>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut event: BehaviorEvent) -> EventId {
        let id = EventId(self.slots.len() as u32);
        event.id = id;
        self.slots.push(Some(event));
        id
    }

    /// The live event behind `id`.  Reaped and unknown ids are errors.
    pub fn get(&self, id: EventId) -> EventResult<&BehaviorEvent> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(CoreError::EventNotFound(id).into())
    }

    pub fn get_mut(&mut self, id: EventId) -> EventResult<&mut BehaviorEvent> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(CoreError::EventNotFound(id).into())
    }

    /// Current status; reaped events report `Finished`, unknown ids `None`.
    pub fn status(&self, id: EventId) -> Option<EventStatus> {
        match self.slots.get(id.index())? {
            Some(event) => Some(event.status()),
            None => Some(EventStatus::Finished),
        }
    }

    /// [`BehaviorEvent::kill`] by handle.  A reaped event is already
    /// finished.
    pub fn kill(&mut self, id: EventId) -> EventResult<bool> {
        match self.slots.get_mut(id.index()) {
            Some(Some(event)) => Ok(event.kill()),
            Some(None) => Ok(true),
            None => Err(CoreError::EventNotFound(id).into()),
        }
    }

    /// Remove a finished event, leaving its slot empty.
    pub fn reap(&mut self, id: EventId) -> Option<BehaviorEvent> {
        self.slots.get_mut(id.index())?.take()
    }

    /// Number of events not yet reaped.
    pub fn live(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BehaviorEvent> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BehaviorEvent> {
        self.slots.iter_mut().flatten()
    }
}
