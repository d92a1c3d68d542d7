//! Event priorities and the lightweight ticket agents keep for their events.

use std::cmp::Ordering;
use std::fmt;

use crate::EventId;

/// Default priority of events created without an explicit one.
pub const DEFAULT_EVENT_PRIORITY: f32 = 0.5;

/// Event priority: higher wins.
///
/// Ordering is a total order over the inner `f32` (`f32::total_cmp`), so
/// `Priority` can be compared, sorted, and used as a key.  Equal priorities
/// never preempt each other; preemption requires a strictly greater value.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(pub f32);

impl Priority {
    pub const ZERO: Priority = Priority(0.0);

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(DEFAULT_EVENT_PRIORITY)
    }
}

impl From<f32> for Priority {
    #[inline]
    fn from(v: f32) -> Self {
        Priority(v)
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// What an agent remembers about an event that holds (or wants) it.
///
/// Priorities are immutable for the life of an event, so caching the value
/// next to the handle lets agents answer eligibility queries without a
/// back-reference into the event arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventTicket {
    pub event:    EventId,
    pub priority: Priority,
}

impl EventTicket {
    #[inline]
    pub fn new(event: EventId, priority: Priority) -> Self {
        Self { event, priority }
    }

    /// `true` iff `self` strictly outranks `other`.
    #[inline]
    pub fn outranks(&self, other: &EventTicket) -> bool {
        self.priority > other.priority
    }
}
