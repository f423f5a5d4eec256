//! Redraw gating for a continuously polled render loop.
//!
//! A renderer polls [`RenderGate::should_render`] once per scheduler tick
//! and only draws when it answers `true`. Anything that invalidates the
//! picture (camera movement, a data swap) expresses itself as a render
//! lease:
//!
//! - **continuous**: held until released, ref-counted so independent
//!   holders compose ([`RenderGate::render_until_released`]);
//! - **timed**: active until a deadline, which later requests may only
//!   extend ([`RenderGate::render_for`]);
//! - **one-shot**: satisfied by a single tick
//!   ([`RenderGate::render_once`]; armed on construction so the first
//!   frame always draws).
//!
//! One gate instance serves one renderable scene. Triggers and the poller
//! may live in different scheduling contexts: every operation locks a
//! short critical section and returns immediately.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Lease bookkeeping behind the gate's lock.
#[derive(Debug)]
struct Leases {
    stopped: bool,
    continuous: usize,
    deadline: Option<Instant>,
    one_shot: bool,
}

/// The gate's effective state for one tick, in evaluation order.
///
/// Derived from the lease set on every poll; deriving it (instead of
/// branching over independently mutated fields) keeps the precedence
/// rules in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Torn down for good; nothing renders anymore.
    Stopped,
    /// One or more continuous leases are held.
    Continuous(usize),
    /// A timed lease is active until the deadline.
    Timed(Instant),
    /// The one-shot lease is armed.
    OneShot,
    /// No lease demands a redraw.
    Idle,
}

fn evaluate(leases: &Leases, now: Instant) -> GateState {
    if leases.stopped {
        return GateState::Stopped;
    }
    if leases.continuous > 0 {
        return GateState::Continuous(leases.continuous);
    }
    if let Some(deadline) = leases.deadline {
        if now < deadline {
            return GateState::Timed(deadline);
        }
        // An expired deadline reads as idle for this tick; the one-shot
        // lease is only consulted once the deadline slot is empty.
        return GateState::Idle;
    }
    if leases.one_shot {
        return GateState::OneShot;
    }
    GateState::Idle
}

/// Decides, once per tick, whether a redraw is required.
///
/// The gate starts with its one-shot lease armed, so the first poll after
/// construction reports `true` exactly once.
#[derive(Debug)]
pub struct RenderGate {
    leases: Mutex<Leases>,
}

/// Keeps the gate's continuous lease counter raised; dropping the guard
/// releases the hold. Multiple guards on one gate stack.
#[must_use = "dropping the lease immediately releases the continuous hold"]
#[derive(Debug)]
pub struct ContinuousLease<'a> {
    gate: &'a RenderGate,
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGate {
    pub fn new() -> Self {
        Self {
            leases: Mutex::new(Leases {
                stopped: false,
                continuous: 0,
                deadline: None,
                one_shot: true,
            }),
        }
    }

    /// Is a redraw required this tick?
    ///
    /// A pure read except for one-shot consumption: observing an armed
    /// one-shot lease as `true` disarms it.
    pub fn should_render(&self) -> bool {
        self.poll_at(Instant::now())
    }

    /// [`Self::should_render`] against an explicit clock, for callers
    /// that already have a tick timestamp (and for deterministic tests).
    pub fn poll_at(&self, now: Instant) -> bool {
        let mut leases = self.lock();
        match evaluate(&leases, now) {
            GateState::Stopped => false,
            GateState::Continuous(_) | GateState::Timed(_) => true,
            GateState::OneShot => {
                leases.one_shot = false;
                true
            }
            GateState::Idle => {
                if leases.deadline.is_some_and(|d| now >= d) {
                    leases.deadline = None;
                }
                false
            }
        }
    }

    /// Current state without consuming anything. Diagnostic only.
    pub fn state_at(&self, now: Instant) -> GateState {
        evaluate(&self.lock(), now)
    }

    /// Arm the one-shot lease: the next poll reports `true` once.
    pub fn render_once(&self) {
        self.lock().one_shot = true;
    }

    /// Demand redraws for the given duration from now.
    ///
    /// Only ever extends: a request expiring before the currently stored
    /// deadline leaves the longer lease in place.
    pub fn render_for(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        self.extend_deadline(deadline);
    }

    /// [`Self::render_for`] with an explicit deadline.
    pub fn render_until(&self, deadline: Instant) {
        self.extend_deadline(deadline);
    }

    /// Demand redraws until the returned lease is dropped.
    pub fn render_until_released(&self) -> ContinuousLease<'_> {
        self.lock().continuous += 1;
        ContinuousLease { gate: self }
    }

    /// Tear the gate down permanently. Every later poll reports `false`,
    /// whatever leases are still held.
    pub fn stop(&self) {
        tracing::debug!("render gate stopped");
        self.lock().stopped = true;
    }

    fn extend_deadline(&self, deadline: Instant) {
        let mut leases = self.lock();
        if leases.deadline.is_none_or(|current| deadline > current) {
            leases.deadline = Some(deadline);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Leases> {
        // A poisoned lock only means another trigger panicked mid-update;
        // the lease fields are always individually consistent.
        self.leases.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ContinuousLease<'_> {
    fn drop(&mut self) {
        let mut leases = self.gate.lock();
        leases.continuous = leases.continuous.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drained(gate: &RenderGate) -> &RenderGate {
        // Consume the construction-time one-shot lease.
        assert!(gate.should_render());
        gate
    }

    #[test]
    fn test_first_poll_renders_exactly_once() {
        let gate = RenderGate::new();
        assert!(gate.should_render());
        assert!(!gate.should_render());
        assert!(!gate.should_render());
    }

    #[test]
    fn test_one_shot_rearm() {
        let gate = RenderGate::new();
        drained(&gate);
        gate.render_once();
        assert!(gate.should_render());
        assert!(!gate.should_render());
    }

    #[test]
    fn test_continuous_lease_holds_across_many_polls() {
        let gate = RenderGate::new();
        drained(&gate);
        let lease = gate.render_until_released();
        for _ in 0..1000 {
            assert!(gate.should_render());
        }
        drop(lease);
        assert!(!gate.should_render());
    }

    #[test]
    fn test_continuous_leases_compose() {
        let gate = RenderGate::new();
        drained(&gate);
        let first = gate.render_until_released();
        let second = gate.render_until_released();
        drop(first);
        // Still held by the second lease.
        assert!(gate.should_render());
        drop(second);
        assert!(!gate.should_render());
    }

    #[test]
    fn test_timed_lease_expires() {
        let gate = RenderGate::new();
        drained(&gate);
        let now = Instant::now();
        gate.render_until(now + Duration::from_millis(100));
        assert!(gate.poll_at(now));
        assert!(gate.poll_at(now + Duration::from_millis(99)));
        // At and beyond the deadline the lease clears.
        assert!(!gate.poll_at(now + Duration::from_millis(100)));
        assert!(!gate.poll_at(now + Duration::from_millis(200)));
    }

    #[test]
    fn test_longer_timed_lease_wins_in_any_order() {
        let now = Instant::now();
        let long = now + Duration::from_millis(100);
        let short = now + Duration::from_millis(50);

        for deadlines in [[long, short], [short, long]] {
            let gate = RenderGate::new();
            drained(&gate);
            for deadline in deadlines {
                gate.render_until(deadline);
            }
            assert_eq!(gate.state_at(now), GateState::Timed(long));
            assert!(gate.poll_at(now + Duration::from_millis(75)));
            assert!(!gate.poll_at(now + Duration::from_millis(150)));
        }
    }

    #[test]
    fn test_expired_deadline_does_not_eat_the_one_shot() {
        let gate = RenderGate::new();
        drained(&gate);
        let now = Instant::now();
        gate.render_until(now + Duration::from_millis(10));
        gate.render_once();
        // The tick that observes the expiry reports false and leaves the
        // one-shot lease armed for the next tick.
        assert!(!gate.poll_at(now + Duration::from_millis(20)));
        assert!(gate.poll_at(now + Duration::from_millis(21)));
    }

    #[test]
    fn test_stop_is_terminal() {
        let gate = RenderGate::new();
        let _lease = gate.render_until_released();
        gate.render_once();
        gate.render_for(Duration::from_secs(60));
        gate.stop();
        for _ in 0..10 {
            assert!(!gate.should_render());
        }
        assert_eq!(gate.state_at(Instant::now()), GateState::Stopped);
    }

    #[test]
    fn test_continuous_outranks_timed_and_one_shot() {
        let gate = RenderGate::new();
        let now = Instant::now();
        gate.render_until(now + Duration::from_millis(100));
        let _lease = gate.render_until_released();
        assert_eq!(gate.state_at(now), GateState::Continuous(1));
        // The one-shot lease is untouched while the continuous lease
        // answers the polls.
        assert!(gate.poll_at(now));
        assert_eq!(gate.state_at(now), GateState::Continuous(1));
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let gate = Arc::new(RenderGate::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let lease = gate.render_until_released();
                    assert!(gate.should_render());
                    drop(lease);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        // All leases released; drain the initial one-shot if a thread has
        // not already consumed it, then the gate is idle.
        gate.poll_at(Instant::now());
        assert!(!gate.should_render());
    }
}
