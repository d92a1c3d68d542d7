//! Ordered composites.
//!
//! [`Sequence`] (AND) and [`Selector`] (OR) run their children one at a
//! time.  When a child resolves without short-circuiting, the next child is
//! started and ticked in the same tick, so a sequence of instantly
//! succeeding leaves completes in a single pulse.
//!
//! The shuffled variants pick a fresh child order on every start by
//! weighted sampling without replacement (see [`TreeRng::weighted_order`]).

use bt_core::{RunStatus, TreeRng};

use crate::{Node, NodeLogic, TreeError, TreeResult};

/// Per-run child ordering for the shuffled composites.
struct Shuffle {
    weights: Vec<f32>,
    rng:     TreeRng,
}

/// Shared cursor over children, parameterised by which result
/// short-circuits.
struct Ordered {
    children:      Vec<Node>,
    order:         Vec<usize>,
    position:      usize,
    selection:     Option<usize>,
    short_circuit: RunStatus,
    shuffle:       Option<Shuffle>,
}

impl Ordered {
    fn new(children: Vec<Node>, short_circuit: RunStatus, shuffle: Option<Shuffle>) -> Self {
        let order = (0..children.len()).collect();
        Self { children, order, position: 0, selection: None, short_circuit, shuffle }
    }

    fn start(&mut self) {
        self.position = 0;
        self.selection = None;
        if let Some(shuffle) = &mut self.shuffle {
            self.order = shuffle.rng.weighted_order(&shuffle.weights);
        }
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        loop {
            let index = match self.selection {
                Some(index) => index,
                None => {
                    let Some(&index) = self.order.get(self.position) else {
                        // Every child resolved without short-circuiting.
                        return Ok(self.short_circuit.invert());
                    };
                    self.children[index].start();
                    self.selection = Some(index);
                    index
                }
            };

            let result = self.children[index].tick()?;
            if result.is_running() {
                return Ok(RunStatus::Running);
            }
            self.selection = None;
            self.position += 1;
            if result == self.short_circuit {
                return Ok(result);
            }
        }
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        match self.selection {
            Some(index) => self.children[index].terminate(),
            None => Ok(RunStatus::Success),
        }
    }
}

fn validate_weights(weighted: &[(f32, Node)]) -> TreeResult<()> {
    for (index, (weight, _)) in weighted.iter().enumerate() {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(TreeError::InvalidWeight { index, weight: *weight });
        }
    }
    Ok(())
}

fn shuffled(weighted: Vec<(f32, Node)>, rng: TreeRng) -> TreeResult<(Vec<Node>, Shuffle)> {
    validate_weights(&weighted)?;
    let (weights, children): (Vec<f32>, Vec<Node>) = weighted.into_iter().unzip();
    Ok((children, Shuffle { weights, rng }))
}

macro_rules! ordered_logic {
    ($ty:ident) => {
        impl NodeLogic for $ty {
            fn kind(&self) -> &'static str {
                stringify!($ty)
            }

            fn start(&mut self) {
                self.0.start();
            }

            fn execute(&mut self) -> TreeResult<RunStatus> {
                self.0.execute()
            }

            fn stop(&mut self) {
                self.0.selection = None;
            }

            fn terminate(&mut self) -> TreeResult<RunStatus> {
                self.0.terminate()
            }

            fn children(&self) -> &[Node] {
                &self.0.children
            }

            fn children_mut(&mut self) -> &mut [Node] {
                &mut self.0.children
            }
        }
    };
}

// ── Sequence ──────────────────────────────────────────────────────────────────

/// Runs children in order until one fails.
///
/// Succeeds once every child has succeeded (immediately if there are none).
pub struct Sequence(Ordered);

impl Sequence {
    pub fn new(children: Vec<Node>) -> Self {
        Sequence(Ordered::new(children, RunStatus::Failure, None))
    }
}

ordered_logic!(Sequence);

// ── Selector ──────────────────────────────────────────────────────────────────

/// Runs children in order until one succeeds.
///
/// Fails once every child has failed (immediately if there are none).
pub struct Selector(Ordered);

impl Selector {
    pub fn new(children: Vec<Node>) -> Self {
        Selector(Ordered::new(children, RunStatus::Success, None))
    }
}

ordered_logic!(Selector);

// ── Shuffled variants ─────────────────────────────────────────────────────────

/// A [`Sequence`] whose child order is re-drawn on every start.
pub struct SequenceShuffle(Ordered);

impl SequenceShuffle {
    /// Equal weights: every order is equally likely.
    pub fn new(children: Vec<Node>, rng: TreeRng) -> Self {
        let weights = vec![1.0; children.len()];
        let shuffle = Shuffle { weights, rng };
        SequenceShuffle(Ordered::new(children, RunStatus::Failure, Some(shuffle)))
    }

    /// Weights must be finite and non-negative.
    pub fn weighted(children: Vec<(f32, Node)>, rng: TreeRng) -> TreeResult<Self> {
        let (children, shuffle) = shuffled(children, rng)?;
        Ok(SequenceShuffle(Ordered::new(children, RunStatus::Failure, Some(shuffle))))
    }
}

ordered_logic!(SequenceShuffle);

/// A [`Selector`] whose child order is re-drawn on every start.  Heavier
/// children tend to be tried first.
pub struct SelectorShuffle(Ordered);

impl SelectorShuffle {
    pub fn new(children: Vec<Node>, rng: TreeRng) -> Self {
        let weights = vec![1.0; children.len()];
        let shuffle = Shuffle { weights, rng };
        SelectorShuffle(Ordered::new(children, RunStatus::Success, Some(shuffle)))
    }

    pub fn weighted(children: Vec<(f32, Node)>, rng: TreeRng) -> TreeResult<Self> {
        let (children, shuffle) = shuffled(children, rng)?;
        Ok(SelectorShuffle(Ordered::new(children, RunStatus::Success, Some(shuffle))))
    }
}

ordered_logic!(SelectorShuffle);
