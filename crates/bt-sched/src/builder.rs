//! Fluent builder for constructing a [`Scheduler`].

use bt_agent::{AgentStore, BehaviorAgent};
use bt_core::{PulseClock, SchedulerConfig, TreeRng};
use bt_event::EventStore;

use crate::{Receiver, SchedResult, Scheduler};

/// Fluent builder for [`Scheduler`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                        |
/// |-------------------|--------------------------------|
/// | `.config(c)`      | `SchedulerConfig::default()`   |
/// | `.agent(a)`       | no agents                      |
/// | `.autostart(b)`   | `false`                        |
///
/// # Example
///
/// ```rust,ignore
/// let mut scheduler = SchedulerBuilder::new()
///     .config(config)
///     .agent(BehaviorAgent::new(wander_tree))
///     .autostart(true)
///     .build()?;
/// scheduler.advance(frame_delta)?;
/// ```
#[derive(Default)]
pub struct SchedulerBuilder {
    config:    SchedulerConfig,
    agents:    Vec<BehaviorAgent>,
    autostart: bool,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an agent up front.  Ids are assigned in call order starting
    /// from `AgentId(0)`.
    pub fn agent(mut self, agent: BehaviorAgent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Start every up-front agent's personal tree at build time.
    pub fn autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    /// Validate the config and return a ready-to-pulse [`Scheduler`].
    pub fn build(self) -> SchedResult<Scheduler> {
        self.config.validate()?;

        let mut agents = AgentStore::new();
        let mut receivers = Vec::with_capacity(self.agents.len());
        for mut agent in self.agents {
            if self.autostart {
                agent.behavior_start()?;
            }
            receivers.push(Receiver::Agent(agents.insert(agent)));
        }

        Ok(Scheduler {
            clock: PulseClock::new(self.config.update_interval()),
            rng: TreeRng::new(self.config.seed),
            config: self.config,
            agents,
            events: EventStore::new(),
            receivers,
        })
    }
}
