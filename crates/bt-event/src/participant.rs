use bt_core::AgentId;

/// Anything that can take part in an event: exposes the agent that owns it.
pub trait Participant {
    fn behavior_agent(&self) -> AgentId;
}

impl Participant for AgentId {
    #[inline]
    fn behavior_agent(&self) -> AgentId {
        *self
    }
}

impl<P: Participant + ?Sized> Participant for &P {
    #[inline]
    fn behavior_agent(&self) -> AgentId {
        (**self).behavior_agent()
    }
}
