//! Named affordances: behaviors a world object offers to a character.
//!
//! A [`SmartObject`] publishes an [`AffordanceRegistry`] mapping names to
//! plain functions.  An [`AffordanceLeaf`] resolves the name each tick and
//! calls the function with the object and the character locked.

use std::fmt;
use std::sync::{Arc, Mutex};

use bt_core::RunStatus;
use rustc_hash::FxHashMap;

use crate::{NodeLogic, TreeError, TreeResult, Val};

/// An affordance body: the object offering it, then the character using it.
pub type Affordance<O, C> = fn(&mut O, &mut C) -> RunStatus;

/// Name → affordance table.
pub struct AffordanceRegistry<O, C> {
    entries: FxHashMap<String, Affordance<O, C>>,
}

impl<O, C> AffordanceRegistry<O, C> {
    pub fn new() -> Self {
        Self { entries: FxHashMap::default() }
    }

    /// Names must be unique.
    pub fn register(&mut self, name: impl Into<String>, affordance: Affordance<O, C>) -> TreeResult<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(TreeError::DuplicateAffordance(name));
        }
        self.entries.insert(name, affordance);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, affordance: Affordance<O, C>) -> TreeResult<Self> {
        self.register(name, affordance)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> TreeResult<Affordance<O, C>> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| TreeError::UnknownAffordance(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<O, C> Default for AffordanceRegistry<O, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, C> fmt::Debug for AffordanceRegistry<O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffordanceRegistry").field("names", &self.names()).finish()
    }
}

/// A world object that offers affordances to characters of type `C`.
pub trait SmartObject<C>: Sized {
    fn affordances(&self) -> &AffordanceRegistry<Self, C>;
}

/// Leaf that invokes a named affordance of `object` on `character`.
///
/// `object` and `character` must be distinct mutexes; the leaf locks both
/// at once.
pub struct AffordanceLeaf<O, C> {
    object:       Arc<Mutex<O>>,
    character:    Arc<Mutex<C>>,
    name:         Val<String>,
    on_terminate: Option<Val<String>>,
}

impl<O, C> AffordanceLeaf<O, C>
where
    O: SmartObject<C> + Send + 'static,
    C: Send + 'static,
{
    pub fn new(object: Arc<Mutex<O>>, character: Arc<Mutex<C>>, name: impl Into<Val<String>>) -> Self {
        Self { object, character, name: name.into(), on_terminate: None }
    }

    /// Affordance to poll when the leaf is interrupted mid-run.
    pub fn on_terminate(mut self, name: impl Into<Val<String>>) -> Self {
        self.on_terminate = Some(name.into());
        self
    }

    fn invoke(&self, name: &str) -> TreeResult<RunStatus> {
        let mut object = self.object.lock().map_err(|_| TreeError::Poisoned("smart object"))?;
        let mut character = self.character.lock().map_err(|_| TreeError::Poisoned("character"))?;
        let body = object.affordances().get(name)?;
        Ok(body(&mut *object, &mut *character))
    }
}

impl<O, C> NodeLogic for AffordanceLeaf<O, C>
where
    O: SmartObject<C> + Send + 'static,
    C: Send + 'static,
{
    fn kind(&self) -> &'static str {
        "Affordance"
    }

    fn execute(&mut self) -> TreeResult<RunStatus> {
        self.invoke(&self.name.get())
    }

    fn terminate(&mut self) -> TreeResult<RunStatus> {
        match &self.on_terminate {
            Some(name) => self.invoke(&name.get()),
            None => Ok(RunStatus::Success),
        }
    }
}
