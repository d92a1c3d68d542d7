//! The `Scheduler` and its pulse loop.

use std::time::Duration;

use bt_agent::{AgentStore, BehaviorAgent};
use bt_core::{AgentId, CoreError, EventId, ManualTime, PulseClock, SchedulerConfig, TreeRng};
use bt_event::{BehaviorEvent, EventBuilder, EventDriver, EventStatus, EventStore};
use tracing::{debug, info, trace};

use crate::{NoopObserver, PulseObserver, SchedResult};

/// Something the scheduler pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Agent(AgentId),
    Event(EventId),
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Registry of every agent and event, pulsed at a fixed interval.
///
/// One pulse updates every registered receiver once, in registration order:
///
/// 1. **Agents** tick their personal tree, or drive its termination.
/// 2. **Events** advance their status machine by one step.
/// 3. **Reap**: receivers that reported completion (only finished events
///    ever do) are dropped after the pass, so no receiver is skipped or
///    visited twice when another finishes mid-pass.
///
/// Agents are never unregistered.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler {
    pub config: SchedulerConfig,
    pub(crate) clock:     PulseClock,
    pub(crate) agents:    AgentStore,
    pub(crate) events:    EventStore,
    pub(crate) receivers: Vec<Receiver>,
    pub(crate) rng:       TreeRng,
}

impl Scheduler {
    // ── Registration ──────────────────────────────────────────────────────

    /// Take ownership of `agent` and schedule it.  The agent starts idle.
    pub fn spawn_agent(&mut self, agent: BehaviorAgent) -> AgentId {
        let id = self.agents.insert(agent);
        self.receivers.push(Receiver::Agent(id));
        debug!(agent = %id, "agent registered");
        id
    }

    /// Build and schedule an event.  It negotiates for its agents starting
    /// with the next pulse.
    pub fn spawn_event(&mut self, event: EventBuilder) -> SchedResult<EventId> {
        let event = event.build()?;
        if let Some(&agent) = event.involved().iter().find(|&&agent| !self.agents.contains(agent)) {
            return Err(CoreError::AgentNotFound(agent).into());
        }
        let id = self.events.insert(event);
        self.receivers.push(Receiver::Event(id));
        debug!(event = %id, "event registered");
        Ok(id)
    }

    // ── Pulse loop ────────────────────────────────────────────────────────

    /// Feed one frame delta.  Delivers a pulse when the update interval has
    /// elapsed; at most one per call.  Returns whether a pulse ran.
    pub fn advance(&mut self, frame_delta: Duration) -> SchedResult<bool> {
        self.advance_with(frame_delta, &mut NoopObserver)
    }

    pub fn advance_with<O: PulseObserver>(&mut self, frame_delta: Duration, observer: &mut O) -> SchedResult<bool> {
        if !self.clock.advance(frame_delta) {
            return Ok(false);
        }
        self.pulse_with(observer)
    }

    /// Deliver one pulse now, regardless of the clock.
    pub fn pulse(&mut self) -> SchedResult<bool> {
        self.pulse_with(&mut NoopObserver)
    }

    /// Deliver one pulse now.  Returns `false` (and updates nothing) while
    /// the scheduler is inactive.
    pub fn pulse_with<O: PulseObserver>(&mut self, observer: &mut O) -> SchedResult<bool> {
        if !self.config.active {
            trace!("scheduler inactive; pulse skipped");
            return Ok(false);
        }

        self.clock.record_pulse(self.clock.interval);
        let pulse = self.clock.current_pulse;
        observer.on_pulse_start(pulse);

        // The registry cannot change during the pass: spawning needs
        // `&mut self`.
        let mut alive = Vec::with_capacity(self.receivers.len());
        for &receiver in &self.receivers {
            let keep = match receiver {
                Receiver::Agent(id) => self.agents.get_mut(id)?.update()?,
                Receiver::Event(id) => EventDriver::new(&mut self.agents, &mut self.events).update(id)?,
            };
            alive.push(keep);
        }

        let mut finished = Vec::new();
        let mut flags = alive.into_iter();
        self.receivers.retain(|&receiver| {
            let keep = flags.next().unwrap_or(true);
            if !keep {
                finished.push(receiver);
            }
            keep
        });

        for receiver in finished {
            match receiver {
                Receiver::Event(id) => {
                    if let Some(event) = self.events.reap(id) {
                        debug!(%event, outcome = ?event.outcome(), "event reaped");
                        observer.on_event_reaped(pulse, &event);
                    }
                }
                Receiver::Agent(id) => debug!(agent = %id, "agent unscheduled"),
            }
        }

        observer.on_pulse_end(pulse, self.receivers.len());
        trace!(%pulse, receivers = self.receivers.len(), live_events = self.events.live(), "pulse done");
        Ok(true)
    }

    // ── Control ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_active(&self) -> bool {
        self.config.active
    }

    /// Suspend or resume pulsing without unregistering anything.
    pub fn set_active(&mut self, active: bool) {
        if self.config.active != active {
            info!(active, "scheduler active flag changed");
        }
        self.config.active = active;
    }

    pub fn start_agent(&mut self, id: AgentId) -> SchedResult<()> {
        self.agents.get_mut(id)?.behavior_start()?;
        Ok(())
    }

    /// `true` iff the agent is already idle.
    pub fn stop_agent(&mut self, id: AgentId) -> SchedResult<bool> {
        Ok(self.agents.get_mut(id)?.behavior_stop())
    }

    /// `true` iff the event has already finished.
    pub fn kill_event(&mut self, id: EventId) -> SchedResult<bool> {
        Ok(self.events.kill(id)?)
    }

    /// Stop every tree immediately and empty the registry.
    ///
    /// No termination is driven: leaves get no chance to clean up.
    pub fn shutdown(&mut self) {
        for event in self.events.iter_mut() {
            event.halt();
        }
        for receiver in self.receivers.drain(..) {
            if let Receiver::Event(id) = receiver {
                self.events.reap(id);
            }
        }
        for agent in self.agents.iter_mut() {
            agent.halt();
        }
        info!(agents = self.agents.len(), "scheduler shut down");
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn agent(&self, id: AgentId) -> SchedResult<&BehaviorAgent> {
        Ok(self.agents.get(id)?)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> SchedResult<&mut BehaviorAgent> {
        Ok(self.agents.get_mut(id)?)
    }

    /// The live event behind `id`; `None` once reaped.
    pub fn event(&self, id: EventId) -> Option<&BehaviorEvent> {
        self.events.get(id).ok()
    }

    /// Reaped events report `Finished`; unknown ids `None`.
    pub fn event_status(&self, id: EventId) -> Option<EventStatus> {
        self.events.status(id)
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn receivers(&self) -> &[Receiver] {
        &self.receivers
    }

    pub fn clock(&self) -> &PulseClock {
        &self.clock
    }

    /// Pulse-driven time: advances by one update interval per delivered
    /// pulse.  Hand it to `LeafWait` for waits measured in scheduler time.
    pub fn time(&self) -> ManualTime {
        self.clock.time()
    }

    /// Deterministic RNG for a stochastic node, derived from the configured
    /// seed.
    pub fn rng(&mut self, offset: u64) -> TreeRng {
        self.rng.child(offset)
    }
}
