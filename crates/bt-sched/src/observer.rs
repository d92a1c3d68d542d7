//! Pulse observer trait for progress reporting and diagnostics.

use bt_core::Pulse;
use bt_event::BehaviorEvent;

/// Callbacks invoked by [`Scheduler::pulse_with`][crate::Scheduler::pulse_with]
/// at key points in the pulse.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — event log
///
/// ```rust,ignore
/// struct EventLog(Vec<(EventId, Option<RunStatus>)>);
///
/// impl PulseObserver for EventLog {
///     fn on_event_reaped(&mut self, _pulse: Pulse, event: &BehaviorEvent) {
///         self.0.push((event.id(), event.outcome()));
///     }
/// }
/// ```
pub trait PulseObserver {
    /// Called before any receiver is updated.
    fn on_pulse_start(&mut self, _pulse: Pulse) {}

    /// Called once a finished event has been removed from the registry.
    fn on_event_reaped(&mut self, _pulse: Pulse, _event: &BehaviorEvent) {}

    /// Called after every receiver has been updated and finished ones
    /// removed.  `receivers` is the number still registered.
    fn on_pulse_end(&mut self, _pulse: Pulse, _receivers: usize) {}
}

/// A [`PulseObserver`] that does nothing.
pub struct NoopObserver;

impl PulseObserver for NoopObserver {}
