//! conversation — two wandering characters interrupted by a conversation.
//!
//! Alice and Bob each run a personal tree that wanders between a few
//! activities.  Shortly after start a high-priority `conversation` event
//! preempts both.  A low-priority `glance` event for Bob, spawned while the
//! conversation is running, is rejected without ever running.  Once the
//! conversation finishes both characters resume wandering.
//!
//! Pass a JSON file with `SchedulerConfig` fields as the first argument to
//! override the defaults:
//!
//! ```text
//! cargo run -p conversation -- demos/conversation/config.json
//! RUST_LOG=debug,bt_tree=info cargo run -p conversation
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bt_agent::BehaviorAgent;
use bt_core::{EventId, Pulse, RunStatus, SchedulerConfig, TimeSource};
use bt_event::{BehaviorEvent, EventBuilder, EventStatus};
use bt_sched::{PulseObserver, Scheduler, SchedulerBuilder};
use bt_tree::builder::{affordance, repeat_forever, sequence, sequence_shuffle, trace, wait_on};
use bt_tree::{AffordanceRegistry, Node, SmartObject};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                u64      = 42;
const FRAME:               Duration = Duration::from_millis(16); // ~60 fps
const FRAMES:              usize    = 400;
const CONVERSATION_FRAME:  usize    = 60;

// ── Smart objects ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Walker {
    seated: bool,
    rests:  u32,
}

struct Bench {
    affordances: AffordanceRegistry<Bench, Walker>,
}

impl Bench {
    fn new() -> Result<Self> {
        let affordances = AffordanceRegistry::<Bench, Walker>::new()
            .with("sit", |_bench, walker| {
                walker.seated = true;
                walker.rests += 1;
                RunStatus::Success
            })?
            .with("stand", |_bench, walker| {
                walker.seated = false;
                RunStatus::Success
            })?;
        Ok(Self { affordances })
    }
}

impl SmartObject<Walker> for Bench {
    fn affordances(&self) -> &AffordanceRegistry<Self, Walker> {
        &self.affordances
    }
}

// ── Trees ─────────────────────────────────────────────────────────────────────

fn wander(
    name:    &str,
    sched:   &mut Scheduler,
    offset:  u64,
    bench:   &Arc<Mutex<Bench>>,
    walker:  &Arc<Mutex<Walker>>,
) -> Node {
    let time: Arc<dyn TimeSource> = Arc::new(sched.time());
    let stroll = sequence(vec![
        trace(format!("{name} strolls along the path")),
        wait_on(Duration::from_millis(400), Arc::clone(&time)),
    ]);
    let window = sequence(vec![
        trace(format!("{name} looks in a shop window")),
        wait_on(Duration::from_millis(250), Arc::clone(&time)),
    ]);
    let rest = sequence(vec![
        affordance(bench, walker, "sit"),
        trace(format!("{name} rests on the bench")),
        wait_on(Duration::from_millis(300), Arc::clone(&time)),
        affordance(bench, walker, "stand"),
    ]);
    repeat_forever(sequence_shuffle(vec![stroll, window, rest], sched.rng(offset)))
}

fn conversation(sched: &Scheduler) -> Node {
    let time: Arc<dyn TimeSource> = Arc::new(sched.time());
    let pause = || wait_on(Duration::from_millis(200), Arc::clone(&time));
    sequence(vec![
        trace("alice: Hi Bob!"),
        pause(),
        trace("bob: Hello Alice, lovely day."),
        pause(),
        trace("alice: See you around."),
    ])
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ReapLog {
    reaped: Vec<(EventId, Option<RunStatus>)>,
}

impl ReapLog {
    /// `Some(outcome)` once `id` has been reaped.
    fn outcome(&self, id: EventId) -> Option<Option<RunStatus>> {
        self.reaped.iter().find(|(event, _)| *event == id).map(|&(_, outcome)| outcome)
    }
}

impl PulseObserver for ReapLog {
    fn on_event_reaped(&mut self, pulse: Pulse, event: &BehaviorEvent) {
        let outcome = event.outcome().map_or("rejected or killed".to_string(), |s| s.to_string());
        println!("[{pulse}] {event} finished: {outcome}");
        self.reaped.push((event.id(), event.outcome()));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SchedulerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SchedulerConfig { seed: SEED, ..SchedulerConfig::default() });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = load_config()?;
    println!("=== conversation — behavior tree demo ===");
    println!("Pulse interval: {} ms  |  Seed: {}", config.update_interval_ms, config.seed);
    println!();

    let mut sched = SchedulerBuilder::new().config(config).build()?;

    // 1. Characters and the bench they share.
    let bench = Arc::new(Mutex::new(Bench::new()?));
    let walkers = [Arc::new(Mutex::new(Walker::default())), Arc::new(Mutex::new(Walker::default()))];

    let tree = wander("alice", &mut sched, 1, &bench, &walkers[0]);
    let alice = sched.spawn_agent(BehaviorAgent::new(tree));
    let tree = wander("bob", &mut sched, 2, &bench, &walkers[1]);
    let bob = sched.spawn_agent(BehaviorAgent::new(tree));
    sched.start_agent(alice)?;
    sched.start_agent(bob)?;

    // 2. Frame loop.  The glance is spawned once the conversation holds Bob,
    //    so it can never outrank it.
    let mut log = ReapLog::default();
    let mut pulses = 0usize;
    let mut talk = None;
    let mut glance = None;
    for frame in 0..FRAMES {
        if frame == CONVERSATION_FRAME {
            let event = EventBuilder::new(conversation(&sched))
                .name("conversation")
                .priority(0.9)
                .participants([alice, bob]);
            let id = sched.spawn_event(event)?;
            info!(event = %id, "conversation scheduled");
            talk = Some(id);
        }
        let talking = talk.and_then(|id| sched.event_status(id)) == Some(EventStatus::Running);
        if glance.is_none() && talking {
            let event = EventBuilder::new(trace("bob glances at the clock"))
                .name("glance")
                .priority(0.3)
                .participant(&bob);
            glance = Some(sched.spawn_event(event)?);
        }
        if sched.advance_with(FRAME, &mut log)? {
            pulses += 1;
        }
    }

    // 3. Summary.
    println!();
    println!("Pulses: {pulses}  |  Clock: {}", sched.clock());
    for (name, id) in [("alice", alice), ("bob", bob)] {
        println!("{name}: {:?}", sched.agent(id)?.status());
    }
    for (name, walker) in ["alice", "bob"].iter().zip(&walkers) {
        let walker = walker.lock().map_err(|_| anyhow::anyhow!("walker lock poisoned"))?;
        println!("{name}: rested {} time(s), seated: {}", walker.rests, walker.seated);
    }
    println!("Events finished: {}", log.reaped.len());

    let talk = talk.context("conversation never spawned")?;
    let glance = glance.context("conversation never started running")?;
    ensure!(log.outcome(talk) == Some(Some(RunStatus::Success)), "conversation did not complete");
    ensure!(log.outcome(glance) == Some(None), "glance was not rejected");

    sched.shutdown();
    Ok(())
}
