//! Unit tests for bt-sched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bt_agent::{AgentStatus, BehaviorAgent};
use bt_core::{AgentId, EventId, Pulse, RunStatus, SchedulerConfig};
use bt_event::{BehaviorEvent, EventBuilder, EventStatus};
use bt_tree::builder::{call, invoke, invoke_with_terminate};
use bt_tree::{Action, Node};

use crate::{PulseObserver, Receiver, Scheduler, SchedulerBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn scheduler() -> Scheduler {
    SchedulerBuilder::new().build().unwrap()
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn read(c: &Arc<AtomicUsize>) -> usize {
    c.load(Ordering::SeqCst)
}

/// Endless tree that counts its ticks.
fn counted(ticks: &Arc<AtomicUsize>) -> Node {
    let ticks = Arc::clone(ticks);
    invoke(Action::status(move || {
        ticks.fetch_add(1, Ordering::SeqCst);
        RunStatus::Running
    }))
}

/// Endless tree that counts how often it is asked to terminate.
fn interruptible(terminations: &Arc<AtomicUsize>) -> Node {
    let terminations = Arc::clone(terminations);
    invoke_with_terminate(
        Action::status(|| RunStatus::Running),
        Action::call(move || {
            terminations.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

/// Runs for `running` ticks, then succeeds.
fn finite(running: usize) -> Node {
    let mut left = running;
    invoke(Action::status(move || {
        if left == 0 {
            return RunStatus::Success;
        }
        left -= 1;
        RunStatus::Running
    }))
}

fn running_agent(sched: &mut Scheduler, tree: Node) -> AgentId {
    let id = sched.spawn_agent(BehaviorAgent::new(tree));
    sched.start_agent(id).unwrap();
    id
}

fn pulses(sched: &mut Scheduler, n: usize) {
    for _ in 0..n {
        sched.pulse().unwrap();
    }
}

#[derive(Default)]
struct Recorder {
    started: Vec<Pulse>,
    ended:   Vec<(Pulse, usize)>,
    reaped:  Vec<(EventId, Option<RunStatus>)>,
}

impl PulseObserver for Recorder {
    fn on_pulse_start(&mut self, pulse: Pulse) {
        self.started.push(pulse);
    }

    fn on_event_reaped(&mut self, _pulse: Pulse, event: &BehaviorEvent) {
        self.reaped.push((event.id(), event.outcome()));
    }

    fn on_pulse_end(&mut self, pulse: Pulse, receivers: usize) {
        self.ended.push((pulse, receivers));
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use bt_core::CoreError;

    use super::*;
    use crate::SchedError;

    #[test]
    fn zero_interval_is_rejected() {
        let config = SchedulerConfig { update_interval_ms: 0, ..SchedulerConfig::default() };
        let result = SchedulerBuilder::new().config(config).build();
        assert!(matches!(result, Err(SchedError::Core(CoreError::Config(_)))));
    }

    #[test]
    fn upfront_agents_are_registered_in_order() {
        let ticks = counter();
        let mut sched = SchedulerBuilder::new()
            .agent(BehaviorAgent::new(counted(&ticks)))
            .agent(BehaviorAgent::new(counted(&ticks)))
            .autostart(true)
            .build()
            .unwrap();
        assert_eq!(sched.receivers(), &[Receiver::Agent(AgentId(0)), Receiver::Agent(AgentId(1))]);
        assert_eq!(sched.agent(AgentId(1)).unwrap().status(), AgentStatus::Running);
        sched.pulse().unwrap();
        assert_eq!(read(&ticks), 2);
    }

    #[test]
    fn event_with_unknown_agent_is_rejected() {
        let mut sched = scheduler();
        let known = sched.spawn_agent(BehaviorAgent::new(finite(0)));
        assert!(sched.agents().contains(known));
        assert!(!sched.agents().contains(AgentId(3)));
        let result = sched.spawn_event(EventBuilder::new(finite(0)).participants([known, AgentId(3)]));
        assert!(matches!(result, Err(SchedError::Core(CoreError::AgentNotFound(AgentId(3))))));
        assert_eq!(sched.receivers(), &[Receiver::Agent(known)]);
    }
}

// ── Pulse loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pulse_loop {
    use super::*;

    #[test]
    fn advance_pulses_on_interval_not_frame() {
        let mut sched = scheduler();
        let frame = Duration::from_millis(20);
        let fired: Vec<bool> = (0..6).map(|_| sched.advance(frame).unwrap()).collect();
        // Deadlines at 50 ms and 100 ms; a pulse fires once elapsed passes them.
        assert_eq!(fired, vec![false, false, true, false, false, true]);
        assert_eq!(sched.clock().current_pulse, Pulse(2));
    }

    #[test]
    fn long_frame_delivers_one_pulse() {
        let mut sched = scheduler();
        assert!(sched.advance(Duration::from_millis(500)).unwrap());
        assert_eq!(sched.clock().current_pulse, Pulse(1));
        assert!(sched.advance(Duration::ZERO).unwrap());
        assert_eq!(sched.clock().current_pulse, Pulse(2));
    }

    #[test]
    fn inactive_scheduler_updates_nothing() {
        let mut sched = scheduler();
        let ticks = counter();
        running_agent(&mut sched, counted(&ticks));

        sched.set_active(false);
        assert!(!sched.pulse().unwrap());
        assert_eq!(read(&ticks), 0);
        assert_eq!(sched.receivers().len(), 1);

        sched.set_active(true);
        assert!(sched.pulse().unwrap());
        assert_eq!(read(&ticks), 1);
    }

    #[test]
    fn receivers_pulse_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut sched = scheduler();
        for i in 0..3 {
            let order = Arc::clone(&order);
            running_agent(
                &mut sched,
                invoke(Action::status(move || {
                    order.lock().unwrap().push(i);
                    RunStatus::Running
                })),
            );
        }
        sched.pulse().unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn finishing_events_do_not_disturb_other_receivers() {
        let mut sched = scheduler();
        let first = counter();
        let last = counter();
        running_agent(&mut sched, counted(&first));
        let a = sched.spawn_event(EventBuilder::new(finite(0))).unwrap();
        let b = sched.spawn_event(EventBuilder::new(finite(0))).unwrap();
        running_agent(&mut sched, counted(&last));

        let mut recorder = Recorder::default();
        for _ in 0..5 {
            sched.pulse_with(&mut recorder).unwrap();
        }

        assert_eq!(read(&first), 5);
        assert_eq!(read(&last), 5);
        assert_eq!(recorder.reaped, vec![(a, Some(RunStatus::Success)), (b, Some(RunStatus::Success))]);
        assert_eq!(sched.receivers().len(), 2);
        assert_eq!(sched.events().live(), 0);
        assert!(sched.event(a).is_none());
        assert_eq!(sched.event_status(a), Some(EventStatus::Finished));
    }

    #[test]
    fn observer_sees_every_pulse() {
        let mut sched = scheduler();
        running_agent(&mut sched, finite(10));
        let mut recorder = Recorder::default();
        for _ in 0..3 {
            sched.pulse_with(&mut recorder).unwrap();
        }
        assert_eq!(recorder.started, vec![Pulse(1), Pulse(2), Pulse(3)]);
        assert_eq!(recorder.ended, vec![(Pulse(1), 1), (Pulse(2), 1), (Pulse(3), 1)]);
    }

    #[test]
    fn waits_run_on_scheduler_time() {
        let mut sched = scheduler();
        let done = counter();
        let flag = Arc::clone(&done);
        let tree = bt_tree::builder::sequence(vec![
            bt_tree::builder::wait_on(Duration::from_millis(100), Arc::new(sched.time())),
            call(move || {
                flag.fetch_add(1, Ordering::SeqCst);
            }),
        ]);
        let agent = running_agent(&mut sched, tree);

        pulses(&mut sched, 2);
        assert_eq!(read(&done), 0);
        sched.pulse().unwrap();
        assert_eq!(read(&done), 1);
        assert_eq!(sched.agent(agent).unwrap().status(), AgentStatus::Idle);
    }

    #[test]
    fn rng_is_reproducible_from_seed() {
        let config = SchedulerConfig { seed: 42, ..SchedulerConfig::default() };
        let mut a = SchedulerBuilder::new().config(config.clone()).build().unwrap();
        let mut b = SchedulerBuilder::new().config(config).build().unwrap();
        assert_eq!(a.rng(3).unit(), b.rng(3).unit());
    }
}

// ── Trees under the scheduler ─────────────────────────────────────────────────

#[cfg(test)]
mod trees {
    use std::num::NonZeroU32;

    use super::*;
    use bt_tree::builder::{race, repeat, sequence};

    #[test]
    fn sequence_scenario_takes_three_pulses() {
        let first_calls = counter();
        let second_calls = counter();
        let first = {
            let calls = Arc::clone(&first_calls);
            invoke(Action::status(move || {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 { RunStatus::Running } else { RunStatus::Success }
            }))
        };
        let second = {
            let calls = Arc::clone(&second_calls);
            invoke(Action::status(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                RunStatus::Success
            }))
        };

        let mut sched = scheduler();
        let agent = running_agent(&mut sched, sequence(vec![first, second]));

        pulses(&mut sched, 2);
        assert_eq!(sched.agent(agent).unwrap().status(), AgentStatus::Running);
        assert_eq!(read(&second_calls), 0);
        sched.pulse().unwrap();
        assert_eq!(sched.agent(agent).unwrap().tree().last_status(), Some(RunStatus::Success));
        assert_eq!(sched.agent(agent).unwrap().status(), AgentStatus::Idle);
        assert_eq!(read(&first_calls), 3);
        assert_eq!(read(&second_calls), 1);
    }

    #[test]
    fn race_event_terminates_the_losers() {
        let left = counter();
        let right = counter();
        let mut sched = scheduler();
        let event = sched
            .spawn_event(EventBuilder::new(race(vec![interruptible(&left), finite(2), interruptible(&right)])))
            .unwrap();

        let mut recorder = Recorder::default();
        for _ in 0..8 {
            sched.pulse_with(&mut recorder).unwrap();
        }
        assert_eq!(recorder.reaped, vec![(event, Some(RunStatus::Success))]);
        assert_eq!(read(&left), 1);
        assert_eq!(read(&right), 1);
    }

    #[test]
    fn weighted_selector_favours_heavy_child() {
        const SAMPLES: usize = 4_000;
        let mut sched = scheduler();
        let light = counter();
        let heavy = counter();

        for i in 0..SAMPLES {
            let hit = |c: &Arc<AtomicUsize>| {
                let c = Arc::clone(c);
                call(move || {
                    c.fetch_add(1, Ordering::SeqCst);
                })
            };
            let mut root = bt_tree::builder::selector_weighted(
                vec![(1.0, hit(&light)), (3.0, hit(&heavy))],
                sched.rng(i as u64),
            )
            .unwrap();
            root.start();
            assert_eq!(root.tick().unwrap(), RunStatus::Success);
        }

        assert_eq!(read(&light) + read(&heavy), SAMPLES);
        let share = read(&heavy) as f64 / SAMPLES as f64;
        assert!((share - 0.75).abs() < 0.05, "heavy child first in {share:.3} of runs");
    }

    #[test]
    fn loop_event_runs_n_iterations() {
        let runs = counter();
        let body = {
            let runs = Arc::clone(&runs);
            call(move || {
                runs.fetch_add(1, Ordering::SeqCst);
            })
        };
        let mut sched = scheduler();
        let event = sched.spawn_event(EventBuilder::new(repeat(NonZeroU32::new(4).unwrap(), body))).unwrap();

        let mut recorder = Recorder::default();
        for _ in 0..10 {
            sched.pulse_with(&mut recorder).unwrap();
        }
        assert_eq!(read(&runs), 4);
        assert_eq!(recorder.reaped, vec![(event, Some(RunStatus::Success))]);
    }
}

// ── Arbitration ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod arbitration {
    use super::*;

    #[test]
    fn preemption_by_priority() {
        let mut sched = scheduler();
        let x = running_agent(&mut sched, counted(&counter()));

        let a = sched.spawn_event(EventBuilder::new(counted(&counter())).priority(0.5).participant(&x)).unwrap();
        pulses(&mut sched, 3);
        assert_eq!(sched.event_status(a), Some(EventStatus::Running));

        let b_ticks = counter();
        let b = sched.spawn_event(EventBuilder::new(counted(&b_ticks)).priority(0.9).participant(&x)).unwrap();
        sched.pulse().unwrap();
        assert_eq!(sched.event_status(a), Some(EventStatus::Terminating));
        assert_eq!(sched.event_status(b), Some(EventStatus::Pending));

        let c_ticks = counter();
        let c = sched.spawn_event(EventBuilder::new(counted(&c_ticks)).priority(0.5).participant(&x)).unwrap();
        sched.pulse().unwrap();
        assert_eq!(sched.event_status(c), Some(EventStatus::Finished));
        assert!(sched.event(c).is_none());

        pulses(&mut sched, 4);
        assert_eq!(sched.event_status(a), Some(EventStatus::Finished));
        assert_eq!(sched.event_status(b), Some(EventStatus::Running));
        assert_eq!(sched.agent(x).unwrap().current_event().map(|t| t.event), Some(b));
        assert!(read(&b_ticks) > 0);
        assert_eq!(read(&c_ticks), 0);
    }

    #[test]
    fn lower_priority_event_is_rejected_while_conversation_runs() {
        let mut sched = scheduler();
        let alice = running_agent(&mut sched, counted(&counter()));
        let bob = running_agent(&mut sched, counted(&counter()));
        let talk = sched
            .spawn_event(EventBuilder::new(finite(3)).name("conversation").priority(0.9).participants([alice, bob]))
            .unwrap();
        pulses(&mut sched, 2);
        assert_eq!(sched.event_status(talk), Some(EventStatus::Running));

        let glance_ticks = counter();
        let glance = sched
            .spawn_event(EventBuilder::new(counted(&glance_ticks)).name("glance").priority(0.3).participant(&bob))
            .unwrap();
        let mut recorder = Recorder::default();
        sched.pulse_with(&mut recorder).unwrap();
        assert_eq!(recorder.reaped, vec![(glance, None)]);
        assert_eq!(sched.event_status(talk), Some(EventStatus::Running));

        for _ in 0..5 {
            sched.pulse_with(&mut recorder).unwrap();
        }
        assert_eq!(recorder.reaped, vec![(glance, None), (talk, Some(RunStatus::Success))]);
        assert_eq!(read(&glance_ticks), 0);
        for id in [alice, bob] {
            assert_eq!(sched.agent(id).unwrap().status(), AgentStatus::Running);
        }
    }

    #[test]
    fn autonomy_returns_when_event_finishes() {
        let mut sched = scheduler();
        let own_ticks = counter();
        let x = running_agent(&mut sched, counted(&own_ticks));
        let e = sched.spawn_event(EventBuilder::new(finite(0)).participant(&x)).unwrap();

        let mut recorder = Recorder::default();
        while sched.event(e).is_some() {
            sched.pulse_with(&mut recorder).unwrap();
            assert!(recorder.started.len() < 10, "event never finished");
        }
        // Released in the same pulse the event finished.
        assert_eq!(sched.agent(x).unwrap().status(), AgentStatus::Running);

        let before = read(&own_ticks);
        sched.pulse().unwrap();
        assert_eq!(read(&own_ticks), before + 1);
    }

    #[test]
    fn kill_is_idempotent() {
        let mut sched = scheduler();
        let x = running_agent(&mut sched, counted(&counter()));
        let e = sched.spawn_event(EventBuilder::new(counted(&counter())).participant(&x)).unwrap();
        pulses(&mut sched, 3);

        assert!(!sched.kill_event(e).unwrap());
        assert!(!sched.kill_event(e).unwrap());
        pulses(&mut sched, 3);
        assert_eq!(sched.event_status(e), Some(EventStatus::Finished));
        assert!(sched.kill_event(e).unwrap());
        assert_eq!(sched.agent(x).unwrap().status(), AgentStatus::Running);
    }

    #[test]
    fn stop_agent_reports_idle() {
        let mut sched = scheduler();
        let x = running_agent(&mut sched, counted(&counter()));
        assert!(!sched.stop_agent(x).unwrap());
        sched.pulse().unwrap();
        assert!(sched.stop_agent(x).unwrap());
    }

    #[test]
    fn shutdown_stops_everything() {
        let mut sched = scheduler();
        let ticks = counter();
        let x = running_agent(&mut sched, counted(&ticks));
        let y = running_agent(&mut sched, counted(&counter()));
        let e = sched.spawn_event(EventBuilder::new(counted(&counter())).participant(&y)).unwrap();
        pulses(&mut sched, 3);
        assert_eq!(sched.event_status(e), Some(EventStatus::Running));

        assert_eq!(sched.events().live(), 1);
        sched.shutdown();
        assert!(sched.receivers().is_empty());
        assert_eq!(sched.events().live(), 0);
        assert!(sched.event(e).is_none());
        for id in [x, y] {
            let agent = sched.agent(id).unwrap();
            assert_eq!(agent.status(), AgentStatus::Idle);
            assert!(!agent.tree().is_running());
            assert_eq!(agent.current_event(), None);
        }

        let before = read(&ticks);
        sched.pulse().unwrap();
        assert_eq!(read(&ticks), before);
    }
}
