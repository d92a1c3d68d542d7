//! Unit tests for bt-agent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bt_core::{EventId, EventTicket, Priority, RunStatus};
use bt_tree::builder::{invoke, invoke_with_terminate};
use bt_tree::{Action, Node};

use crate::{AgentError, AgentStatus, AgentStore, BehaviorAgent};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ticket(event: u32, priority: f32) -> EventTicket {
    EventTicket::new(EventId(event), Priority(priority))
}

/// A tree that runs forever and counts its ticks.
fn endless(ticks: &Arc<AtomicUsize>) -> Node {
    let ticks = Arc::clone(ticks);
    invoke(Action::status(move || {
        ticks.fetch_add(1, Ordering::SeqCst);
        RunStatus::Running
    }))
}

/// A forever-running tree whose termination takes `wind_down` extra calls.
fn slow_to_stop(wind_down: usize) -> Node {
    let mut remaining = wind_down;
    invoke_with_terminate(
        Action::status(|| RunStatus::Running),
        Action::status(move || {
            if remaining == 0 {
                return RunStatus::Success;
            }
            remaining -= 1;
            RunStatus::Running
        }),
    )
}

fn idle_agent() -> BehaviorAgent {
    BehaviorAgent::new(endless(&Arc::new(AtomicUsize::new(0))))
}

/// Walk an idle agent into an event holding `ticket`.
fn in_event(agent: &mut BehaviorAgent, ticket: EventTicket) {
    agent.set_pending_event(Some(ticket));
    agent.event_started().unwrap();
}

// ── Autonomy ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod autonomy {
    use super::*;

    #[test]
    fn starts_idle() {
        let agent = idle_agent();
        assert_eq!(agent.status(), AgentStatus::Idle);
        assert_eq!(agent.current_priority(), Priority::ZERO);
    }

    #[test]
    fn running_agent_ticks_its_tree() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut agent = BehaviorAgent::new(endless(&ticks));
        agent.behavior_start().unwrap();
        for _ in 0..3 {
            assert!(agent.update().unwrap());
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn idle_agent_does_not_tick() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut agent = BehaviorAgent::new(endless(&ticks));
        assert!(agent.update().unwrap());
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn start_is_noop_when_running() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut agent = BehaviorAgent::new(endless(&ticks));
        agent.behavior_start().unwrap();
        agent.update().unwrap();
        agent.behavior_start().unwrap();
        assert!(agent.tree().is_running());
        assert_eq!(agent.status(), AgentStatus::Running);
    }

    #[test]
    fn stop_on_idle_reports_done() {
        let mut agent = idle_agent();
        assert!(agent.behavior_stop());
        assert_eq!(agent.status(), AgentStatus::Idle);
    }

    #[test]
    fn stop_terminates_on_next_update() {
        let mut agent = idle_agent();
        agent.behavior_start().unwrap();
        agent.update().unwrap();

        assert!(!agent.behavior_stop());
        assert_eq!(agent.status(), AgentStatus::Terminating);
        agent.update().unwrap();
        assert_eq!(agent.status(), AgentStatus::Idle);
        assert!(!agent.tree().is_running());
        assert!(agent.behavior_stop());
    }

    #[test]
    fn slow_termination_spans_updates() {
        let mut agent = BehaviorAgent::new(slow_to_stop(2));
        agent.behavior_start().unwrap();
        agent.update().unwrap();
        agent.behavior_stop();

        agent.update().unwrap();
        assert_eq!(agent.status(), AgentStatus::Terminating);
        agent.update().unwrap();
        assert_eq!(agent.status(), AgentStatus::Terminating);
        agent.update().unwrap();
        assert_eq!(agent.status(), AgentStatus::Idle);
    }

    #[test]
    fn failed_termination_still_completes() {
        let tree = invoke_with_terminate(Action::status(|| RunStatus::Running), Action::status(|| RunStatus::Failure));
        let mut agent = BehaviorAgent::new(tree);
        agent.behavior_start().unwrap();
        agent.update().unwrap();

        assert!(!agent.behavior_stop());
        agent.update().unwrap();
        assert_eq!(agent.status(), AgentStatus::Idle);
        assert_eq!(agent.tree().last_termination_status(), Some(RunStatus::Failure));
        assert!(!agent.tree().is_running());

        assert!(agent.behavior_stop());
        agent.behavior_start().unwrap();
        assert_eq!(agent.status(), AgentStatus::Running);
    }

    #[test]
    fn start_while_terminating_is_error() {
        let mut agent = BehaviorAgent::new(slow_to_stop(1));
        agent.behavior_start().unwrap();
        agent.update().unwrap();
        agent.behavior_stop();
        assert!(matches!(
            agent.behavior_start(),
            Err(AgentError::BadState { status: AgentStatus::Terminating, .. })
        ));
    }

    #[test]
    fn finished_tree_leaves_agent_idle() {
        let mut agent = BehaviorAgent::new(invoke(Action::status(|| RunStatus::Success)));
        agent.behavior_start().unwrap();
        agent.update().unwrap();
        assert_eq!(agent.status(), AgentStatus::Idle);
        // Later updates do not tick the finished tree.
        agent.update().unwrap();
        agent.behavior_start().unwrap();
        assert_eq!(agent.status(), AgentStatus::Running);
    }

    #[test]
    fn status_sink_sees_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut agent = idle_agent().with_status_sink(move |_, status| sink.lock().unwrap().push(status));

        agent.behavior_start().unwrap();
        agent.behavior_start().unwrap();
        agent.behavior_stop();
        agent.update().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![AgentStatus::Running, AgentStatus::Terminating, AgentStatus::Idle]
        );
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;

    #[test]
    fn eligibility_requires_strictly_higher_priority() {
        let mut agent = idle_agent();
        assert!(agent.event_eligible(&ticket(0, 0.1)));

        in_event(&mut agent, ticket(0, 0.5));
        assert!(!agent.event_eligible(&ticket(1, 0.5)));
        assert!(!agent.event_eligible(&ticket(1, 0.4)));
        assert!(agent.event_eligible(&ticket(1, 0.9)));

        agent.set_pending_event(Some(ticket(1, 0.9)));
        assert!(!agent.event_eligible(&ticket(2, 0.7)));
        assert!(!agent.event_eligible(&ticket(2, 0.9)));
        assert!(agent.event_eligible(&ticket(2, 0.95)));
    }

    #[test]
    fn current_priority_prefers_pending() {
        let mut agent = idle_agent();
        in_event(&mut agent, ticket(0, 0.5));
        assert_eq!(agent.current_priority(), Priority(0.5));
        agent.set_pending_event(Some(ticket(1, 0.8)));
        assert_eq!(agent.current_priority(), Priority(0.8));
    }

    #[test]
    fn event_started_moves_pending_to_current() {
        let mut agent = idle_agent();
        agent.set_pending_event(Some(ticket(3, 0.5)));
        agent.event_started().unwrap();
        assert_eq!(agent.status(), AgentStatus::InEvent);
        assert_eq!(agent.current_event(), Some(ticket(3, 0.5)));
        assert_eq!(agent.pending_event(), None);
    }

    #[test]
    fn event_started_on_busy_agent_is_error() {
        let mut agent = idle_agent();
        agent.behavior_start().unwrap();
        agent.set_pending_event(Some(ticket(0, 0.5)));
        assert!(matches!(agent.event_started(), Err(AgentError::BadState { .. })));
    }

    #[test]
    fn event_started_twice_is_error() {
        let mut agent = idle_agent();
        in_event(&mut agent, ticket(0, 0.5));
        agent.set_pending_event(Some(ticket(1, 0.9)));
        assert!(matches!(agent.event_started(), Err(AgentError::EventAlreadyActive { .. })));
    }

    #[test]
    fn event_started_without_pending_is_error() {
        let mut agent = idle_agent();
        assert!(matches!(agent.event_started(), Err(AgentError::NoPendingEvent { .. })));
    }

    #[test]
    fn event_finished_returns_to_idle_without_restarting() {
        let mut agent = idle_agent();
        in_event(&mut agent, ticket(0, 0.5));
        agent.event_finished().unwrap();
        assert_eq!(agent.status(), AgentStatus::Idle);
        assert_eq!(agent.current_event(), None);
        assert!(!agent.tree().is_running());
        assert!(matches!(agent.event_finished(), Err(AgentError::NoCurrentEvent { .. })));
    }

    #[test]
    fn start_in_event_is_error() {
        let mut agent = idle_agent();
        in_event(&mut agent, ticket(0, 0.5));
        assert!(matches!(
            agent.behavior_start(),
            Err(AgentError::BadState { status: AgentStatus::InEvent, .. })
        ));
    }

    #[test]
    fn stop_in_event_leaves_event_in_charge() {
        let mut agent = idle_agent();
        in_event(&mut agent, ticket(0, 0.5));
        assert!(!agent.behavior_stop());
        assert_eq!(agent.status(), AgentStatus::InEvent);
    }

    #[test]
    fn lower_priority_pending_replacement_is_allowed() {
        let mut agent = idle_agent();
        agent.set_pending_event(Some(ticket(0, 0.9)));
        agent.set_pending_event(Some(ticket(1, 0.2)));
        assert_eq!(agent.pending_event(), Some(ticket(1, 0.2)));
        agent.set_pending_event(None);
        assert_eq!(agent.pending_event(), None);
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use bt_core::{AgentId, CoreError};

    use super::*;

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut store = AgentStore::new();
        let a = store.insert(idle_agent());
        let b = store.insert(idle_agent());
        assert_eq!((a, b), (AgentId(0), AgentId(1)));
        assert_eq!(store.get(b).unwrap().id(), b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_id_is_error() {
        let store = AgentStore::new();
        assert!(matches!(
            store.get(AgentId(4)),
            Err(AgentError::Core(CoreError::AgentNotFound(AgentId(4))))
        ));
    }
}
