//! Pulse time model.
//!
//! # Design
//!
//! The scheduler does not tick on every rendered frame.  Callers feed frame
//! deltas into a [`PulseClock`], which fires a pulse whenever the configured
//! update interval has elapsed:
//!
//!   pulse fires when  elapsed > next_pulse_at;  next_pulse_at += interval
//!
//! At most one pulse fires per `advance` call, so a long frame never causes
//! a burst of catch-up pulses.
//!
//! Leaves that wait on time read a [`TimeSource`].  The scheduler owns a
//! [`ManualTime`] that advances by exactly one interval per pulse, which
//! keeps waits deterministic; [`WallTime`] reads the monotonic OS clock.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ── Pulse ────────────────────────────────────────────────────────────────────

/// An absolute pulse counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pulse(pub u64);

impl Pulse {
    pub const ZERO: Pulse = Pulse(0);

    /// Return the pulse `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Pulse {
        Pulse(self.0 + n)
    }

    /// Pulses elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Pulse) -> u64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ── TimeSource ───────────────────────────────────────────────────────────────

/// A monotonic clock readable from inside a tree.
pub trait TimeSource: Send + Sync {
    /// Time elapsed since the source's origin.
    fn now(&self) -> Duration;
}

/// Monotonic wall-clock time measured from construction.
#[derive(Clone, Debug)]
pub struct WallTime {
    origin: Instant,
}

impl WallTime {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for WallTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time shared between clones.
///
/// Cloning yields another handle to the same counter, so a scheduler can
/// advance the time that leaves built earlier are reading.
#[derive(Clone, Debug, Default)]
pub struct ManualTime {
    micros: Arc<AtomicU64>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.micros.fetch_add(duration_micros(by), Ordering::Relaxed);
    }

    pub fn set(&self, to: Duration) {
        self.micros.store(duration_micros(to), Ordering::Relaxed);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::Relaxed))
    }
}

fn duration_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

// ── PulseClock ───────────────────────────────────────────────────────────────

/// Turns a stream of frame deltas into fixed-interval pulses.
#[derive(Clone, Debug)]
pub struct PulseClock {
    /// Fixed time between pulses.
    pub interval: Duration,
    /// Total frame time fed in through [`advance`](Self::advance).
    pub elapsed: Duration,
    /// Deadline the next pulse waits for.
    pub next_pulse_at: Duration,
    /// Number of pulses recorded so far.
    pub current_pulse: Pulse,
    time: ManualTime,
}

impl PulseClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            next_pulse_at: interval,
            current_pulse: Pulse::ZERO,
            time: ManualTime::new(),
        }
    }

    /// Feed one frame delta.  Returns `true` when a pulse is due.
    pub fn advance(&mut self, frame_delta: Duration) -> bool {
        self.elapsed += frame_delta;
        if self.elapsed > self.next_pulse_at {
            self.next_pulse_at += self.interval;
            true
        } else {
            false
        }
    }

    /// Record that a pulse of length `delta` was delivered.
    pub fn record_pulse(&mut self, delta: Duration) {
        self.current_pulse = self.current_pulse.offset(1);
        self.time.advance(delta);
    }

    /// Handle to the pulse-driven time source.
    pub fn time(&self) -> ManualTime {
        self.time.clone()
    }
}

impl fmt::Display for PulseClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3}s)", self.current_pulse, self.time.now().as_secs_f64())
    }
}
