//! `bt-tree` — resumable behavior-tree nodes.
//!
//! A tree is built once from owned [`Node`]s and then driven one tick per
//! pulse.  Each node type is an explicit state machine behind the
//! [`NodeLogic`] trait; the [`Node`] shell enforces the shared
//! start / tick / terminate / stop lifecycle.
//!
//! | Module           | Contents                                                    |
//! |------------------|-------------------------------------------------------------|
//! | [`node`]         | `Node` lifecycle shell, `NodeLogic` trait                   |
//! | [`composite`]    | `Sequence`, `Selector`, and their shuffled variants         |
//! | [`parallel`]     | `Race`, `SelectorParallel`, `SequenceParallel`              |
//! | [`decorator`]    | `Invert`, `ForceStatus`, `Loop`, `Catch`                    |
//! | [`leaf`]         | `Action`, `LeafInvoke`, `LeafWait`, `LeafTrace`             |
//! | [`val`]          | `Val<T>` constant-or-computed parameters                    |
//! | [`affordance`]   | `SmartObject`, `AffordanceRegistry`, `AffordanceLeaf`       |
//! | [`builder`]      | `sequence(..)`, `race(..)`, `wait(..)` and friends          |
//! | [`error`]        | `TreeError`, `TreeResult`                                   |
//!
//! # Example
//!
//! ```
//! use bt_core::RunStatus;
//! use bt_tree::builder::{call, check, sequence};
//!
//! let mut root = sequence(vec![check(|| true), call(|| {})]);
//! root.start();
//! assert_eq!(root.tick().unwrap(), RunStatus::Success);
//! ```

pub mod affordance;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod node;
pub mod parallel;
pub mod val;


pub use affordance::{Affordance, AffordanceLeaf, AffordanceRegistry, SmartObject};
pub use composite::{Selector, SelectorShuffle, Sequence, SequenceShuffle};
pub use decorator::{Catch, ForceStatus, Invert, Loop, LoopCount};
pub use error::{TreeError, TreeResult};
pub use leaf::{Action, LeafInvoke, LeafTrace, LeafWait};
pub use node::{Node, NodeLogic};
pub use parallel::{Race, SelectorParallel, SequenceParallel};
pub use val::Val;
