//! `bt-sched` — pulse scheduler for the behavior-tree engine.
//!
//! # Pulse loop
//!
//! ```text
//! every frame:   scheduler.advance(frame_delta)
//!   if elapsed > next deadline (one interval per pulse):
//!     for receiver in registration order:
//!       Agent  → tick personal tree / drive its termination
//!       Event  → one step of Initializing → Pending → Running
//!                → (Terminating) → Detaching → Finished
//!     drop finished events
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bt_agent::BehaviorAgent;
//! use bt_event::EventBuilder;
//! use bt_sched::SchedulerBuilder;
//!
//! let mut scheduler = SchedulerBuilder::new().build()?;
//! let alice = scheduler.spawn_agent(BehaviorAgent::new(wander));
//! scheduler.start_agent(alice)?;
//! scheduler.spawn_event(EventBuilder::new(greet).priority(0.9).participant(&alice))?;
//! loop {
//!     scheduler.advance(frame_delta)?;
//! }
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use builder::SchedulerBuilder;
pub use error::{SchedError, SchedResult};
pub use observer::{NoopObserver, PulseObserver};
pub use scheduler::{Receiver, Scheduler};
