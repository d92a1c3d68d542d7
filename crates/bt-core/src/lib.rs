//! `bt-core` — foundational types for the behavior-tree engine.
//!
//! This crate is a dependency of every other `bt-*` crate.  It intentionally
//! has no `bt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`status`]      | `RunStatus` tri-state tick result                       |
//! | [`ids`]         | `AgentId`, `EventId`, `NodeId`                          |
//! | [`priority`]    | `Priority` (total order over `f32`), `EventTicket`      |
//! | [`time`]        | `Pulse`, `PulseClock`, `TimeSource`, `ManualTime`, `WallTime` |
//! | [`rng`]         | `TreeRng` (seeded RNG + weighted shuffle)               |
//! | [`config`]      | `SchedulerConfig`                                       |
//! | [`error`]       | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and id types.     |

pub mod config;
pub mod error;
pub mod ids;
pub mod priority;
pub mod rng;
pub mod status;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SchedulerConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, EventId, NodeId};
pub use priority::{DEFAULT_EVENT_PRIORITY, EventTicket, Priority};
pub use rng::TreeRng;
pub use status::RunStatus;
pub use time::{ManualTime, Pulse, PulseClock, TimeSource, WallTime};
