//! Per-pulse driver for the event status machine.
//!
//! An event has to touch its agents (and, through them, other events) on
//! almost every transition, so the driver borrows both arenas for the
//! duration of one update and refers to everything by handle.

use bt_agent::{AgentStatus, AgentStore};
use bt_core::{AgentId, EventId, EventTicket, RunStatus};
use tracing::{debug, info, warn};

use crate::{EventError, EventResult, EventStatus, EventStore};

pub struct EventDriver<'a> {
    agents: &'a mut AgentStore,
    events: &'a mut EventStore,
}

impl<'a> EventDriver<'a> {
    pub fn new(agents: &'a mut AgentStore, events: &'a mut EventStore) -> Self {
        Self { agents, events }
    }

    /// Advance event `id` by one pulse.
    ///
    /// Returns `false` once the event is finished and should no longer be
    /// scheduled.
    pub fn update(&mut self, id: EventId) -> EventResult<bool> {
        let Ok(event) = self.events.get(id) else {
            // Already reaped.
            return Ok(false);
        };

        match event.status() {
            EventStatus::Initializing => self.initialize(id)?,
            EventStatus::Pending => self.acquire(id)?,
            EventStatus::Running => self.run(id)?,
            EventStatus::Terminating => self.terminate(id)?,
            EventStatus::Detaching => self.detach(id)?,
            EventStatus::Finished => {}
        }
        Ok(self.events.get(id)?.status() != EventStatus::Finished)
    }

    // ── Initializing ──────────────────────────────────────────────────────

    fn initialize(&mut self, id: EventId) -> EventResult<()> {
        let (ticket, involved) = self.roster(id)?;

        for &agent in &involved {
            if !self.agents.get(agent)?.event_eligible(&ticket) {
                let event = self.events.get_mut(id)?;
                info!(
                    %event,
                    %agent,
                    priority = ticket.priority.value(),
                    "event rejected: agent held by equal or higher priority",
                );
                event.set_status(EventStatus::Finished);
                return Ok(());
            }
        }

        for &agent in &involved {
            self.inject(ticket, agent)?;
        }
        self.events.get_mut(id)?.set_status(EventStatus::Pending);
        Ok(())
    }

    /// Make `ticket` the agent's pending event, clearing the way for it:
    /// kill whatever event holds the agent (or suspend its own tree), and
    /// kill the event that was pending before.
    fn inject(&mut self, ticket: EventTicket, agent_id: AgentId) -> EventResult<()> {
        let agent = self.agents.get_mut(agent_id)?;
        match agent.current_event() {
            Some(held) => {
                self.events.kill(held.event)?;
            }
            None => {
                agent.behavior_stop();
            }
        }
        if let Some(waiting) = agent.pending_event() {
            debug!(agent = %agent_id, displaced = %waiting.event, by = %ticket.event, "pending event displaced");
            self.events.kill(waiting.event)?;
        }
        agent.set_pending_event(Some(ticket));
        Ok(())
    }

    // ── Pending ───────────────────────────────────────────────────────────

    fn acquire(&mut self, id: EventId) -> EventResult<()> {
        let (_, involved) = self.roster(id)?;

        // Every agent is prepared each pulse, even after one reports busy.
        let mut ready = true;
        for &agent in &involved {
            ready &= self.prepare(agent)?;
        }
        if !ready {
            return Ok(());
        }

        for &agent_id in &involved {
            let agent = self.agents.get_mut(agent_id)?;
            if agent.pending_event().map(|t| t.event) != Some(id) {
                return Err(EventError::NotPending { event: id, agent: agent_id });
            }
            agent.event_started()?;
        }

        let event = self.events.get_mut(id)?;
        event.tree.start();
        info!(%event, agents = involved.len(), "event running");
        event.set_status(EventStatus::Running);
        Ok(())
    }

    /// Stop the agent's own tree or kill its current event.  `true` once
    /// the agent is free.
    fn prepare(&mut self, agent_id: AgentId) -> EventResult<bool> {
        let agent = self.agents.get_mut(agent_id)?;
        match agent.current_event() {
            None => Ok(agent.behavior_stop()),
            Some(held) => self.events.kill(held.event),
        }
    }

    // ── Running / Terminating ─────────────────────────────────────────────

    fn run(&mut self, id: EventId) -> EventResult<()> {
        let event = self.events.get_mut(id)?;
        let result = event.tree.tick()?;
        if result.is_terminal() {
            info!(%event, %result, "event tree finished");
            event.outcome = Some(result);
            event.set_status(EventStatus::Detaching);
        }
        Ok(())
    }

    fn terminate(&mut self, id: EventId) -> EventResult<()> {
        let event = self.events.get_mut(id)?;
        let result = event.tree.terminate()?;
        if result.is_terminal() {
            if result == RunStatus::Failure {
                warn!(%event, "event tree terminated with failure");
            }
            event.set_status(EventStatus::Detaching);
        }
        Ok(())
    }

    // ── Detaching ─────────────────────────────────────────────────────────

    fn detach(&mut self, id: EventId) -> EventResult<()> {
        let (_, involved) = self.roster(id)?;

        let mut detached = true;
        for &agent in &involved {
            detached &= self.release(id, agent)?;
        }
        if detached {
            let event = self.events.get_mut(id)?;
            info!(%event, "event finished");
            event.set_status(EventStatus::Finished);
        }
        Ok(())
    }

    /// Remove event `id` from one agent, restoring its autonomy where this
    /// event took it away.  `false` while the agent is still terminating on
    /// this event's behalf.
    fn release(&mut self, id: EventId, agent_id: AgentId) -> EventResult<bool> {
        let agent = self.agents.get_mut(agent_id)?;

        // The agent resumes even if another event is pending; that event
        // will stop it again.
        if agent.current_event().is_some_and(|t| t.event == id) {
            agent.event_finished()?;
            agent.behavior_start()?;
        }

        if agent.pending_event().is_some_and(|t| t.event == id) {
            match agent.status() {
                AgentStatus::Terminating => return Ok(false),
                AgentStatus::Idle => agent.behavior_start()?,
                AgentStatus::Running | AgentStatus::InEvent => {}
            }
            agent.set_pending_event(None);
        }
        Ok(true)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn roster(&self, id: EventId) -> EventResult<(EventTicket, Vec<AgentId>)> {
        let event = self.events.get(id)?;
        Ok((event.ticket(), event.involved().to_vec()))
    }
}
