//! Shorthand constructors.
//!
//! Each function wraps the matching node logic in a [`Node`], so trees can
//! be written as nested calls instead of `Node::new(Sequence::new(vec![..]))`.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bt_core::{RunStatus, TimeSource, TreeRng};

use crate::{
    Action, AffordanceLeaf, Catch, ForceStatus, Invert, LeafInvoke, LeafTrace, LeafWait, Loop, LoopCount, Node,
    Race, Selector, SelectorParallel, SelectorShuffle, Sequence, SequenceParallel,
    SequenceShuffle, SmartObject, TreeResult, Val,
};

#[inline]
pub fn sequence(children: Vec<Node>) -> Node {
    Node::new(Sequence::new(children))
}

#[inline]
pub fn selector(children: Vec<Node>) -> Node {
    Node::new(Selector::new(children))
}

#[inline]
pub fn sequence_shuffle(children: Vec<Node>, rng: TreeRng) -> Node {
    Node::new(SequenceShuffle::new(children, rng))
}

#[inline]
pub fn selector_shuffle(children: Vec<Node>, rng: TreeRng) -> Node {
    Node::new(SelectorShuffle::new(children, rng))
}

/// Weighted selector; fails on a negative or non-finite weight.
pub fn selector_weighted(children: Vec<(f32, Node)>, rng: TreeRng) -> TreeResult<Node> {
    Ok(Node::new(SelectorShuffle::weighted(children, rng)?))
}

pub fn sequence_weighted(children: Vec<(f32, Node)>, rng: TreeRng) -> TreeResult<Node> {
    Ok(Node::new(SequenceShuffle::weighted(children, rng)?))
}

#[inline]
pub fn race(children: Vec<Node>) -> Node {
    Node::new(Race::new(children))
}

#[inline]
pub fn selector_parallel(children: Vec<Node>) -> Node {
    Node::new(SelectorParallel::new(children))
}

#[inline]
pub fn sequence_parallel(children: Vec<Node>) -> Node {
    Node::new(SequenceParallel::new(children))
}

#[inline]
pub fn invert(child: Node) -> Node {
    Node::new(Invert::new(child))
}

#[inline]
pub fn force(status: RunStatus, child: Node) -> Node {
    Node::new(ForceStatus::new(status, child))
}

#[inline]
pub fn succeed(child: Node) -> Node {
    force(RunStatus::Success, child)
}

#[inline]
pub fn fail(child: Node) -> Node {
    force(RunStatus::Failure, child)
}

#[inline]
pub fn repeat_forever(child: Node) -> Node {
    Node::new(Loop::forever(child))
}

#[inline]
pub fn repeat(times: NonZeroU32, child: Node) -> Node {
    Node::new(Loop::new(LoopCount::Times(times), child))
}

#[inline]
pub fn catch(cleanup: Action, child: Node) -> Node {
    Node::new(Catch::new(cleanup, child))
}

#[inline]
pub fn invoke(action: Action) -> Node {
    Node::new(LeafInvoke::new(action))
}

#[inline]
pub fn invoke_with_terminate(action: Action, on_terminate: Action) -> Node {
    Node::new(LeafInvoke::with_terminate(action, on_terminate))
}

/// Leaf that runs `f` once and succeeds.
#[inline]
pub fn call(f: impl FnMut() + Send + 'static) -> Node {
    invoke(Action::call(f))
}

/// Leaf that succeeds when `f` returns `true`.
#[inline]
pub fn check(f: impl FnMut() -> bool + Send + 'static) -> Node {
    invoke(Action::assert(f))
}

#[inline]
pub fn wait(duration: Duration) -> Node {
    Node::new(LeafWait::new(duration))
}

#[inline]
pub fn wait_on(duration: Duration, time: Arc<dyn TimeSource>) -> Node {
    Node::new(LeafWait::with_time(duration, time))
}

#[inline]
pub fn trace(message: impl Into<String>) -> Node {
    Node::new(LeafTrace::new(message))
}

/// Invoke the affordance `name` of `object` on `character`.
pub fn affordance<O, C>(object: &Arc<Mutex<O>>, character: &Arc<Mutex<C>>, name: impl Into<Val<String>>) -> Node
where
    O: SmartObject<C> + Send + 'static,
    C: Send + 'static,
{
    Node::new(AffordanceLeaf::new(Arc::clone(object), Arc::clone(character), name))
}
