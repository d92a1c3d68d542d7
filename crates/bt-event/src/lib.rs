//! `bt-event` — prioritized multi-agent behavior events.
//!
//! An event must take exclusive control of every involved agent before its
//! tree runs, and hand each one back afterwards.  Higher-priority events
//! preempt lower ones; equal priorities never preempt.
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`event`]       | `BehaviorEvent`, `EventStatus`                        |
//! | [`builder`]     | `EventBuilder` (fluent construction)                  |
//! | [`store`]       | `EventStore` arena                                    |
//! | [`driver`]      | `EventDriver`: per-pulse status machine               |
//! | [`participant`] | `Participant` capability                              |
//! | [`error`]       | `EventError`, `EventResult`                           |

pub mod builder;
pub mod driver;
pub mod error;
pub mod event;
pub mod participant;
pub mod store;


pub use builder::EventBuilder;
pub use driver::EventDriver;
pub use error::{EventError, EventResult};
pub use event::{BehaviorEvent, EventStatus, EventStatusSink};
pub use participant::Participant;
pub use store::EventStore;
