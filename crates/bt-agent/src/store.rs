//! Arena of behavior agents.

use bt_core::{AgentId, CoreError};

use crate::{AgentResult, BehaviorAgent};

/// Owns every `BehaviorAgent`; `AgentId` is the slot index.
///
/// Agents are never removed, so handles stay valid for the store's lifetime.
#[derive(Debug, Default)]
pub struct AgentStore {
    agents: Vec<BehaviorAgent>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `agent` and return its handle.
    pub fn insert(&mut self, mut agent: BehaviorAgent) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        agent.set_id(id);
        self.agents.push(agent);
        id
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> AgentResult<&BehaviorAgent> {
        self.agents.get(id.index()).ok_or(CoreError::AgentNotFound(id).into())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> AgentResult<&mut BehaviorAgent> {
        self.agents.get_mut(id.index()).ok_or(CoreError::AgentNotFound(id).into())
    }

    pub fn contains(&self, id: AgentId) -> bool {
        id.index() < self.agents.len()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BehaviorAgent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BehaviorAgent> {
        self.agents.iter_mut()
    }
}
