//! Tick scheduling.
//!
//! The core decides *when* ticks should happen by arming and cancelling a
//! [`Scheduler`]; the host decides *how* time passes. At most one interval is
//! armed at any moment: the core always cancels before it arms.

/// A repeating tick source with a single slot.
pub trait Scheduler {
    /// Start (or restart) ticking every `interval_ms`. The slot must be empty.
    fn arm(&mut self, interval_ms: u32);

    /// Stop ticking. A no-op when nothing is armed.
    fn cancel(&mut self);

    /// Interval currently armed, if any.
    fn armed(&self) -> Option<u32>;
}

/// Animation-frame driven clock.
///
/// The browser calls [`FrameClock::poll`] once per frame with its timestamp.
/// Arming does not know the current time, so the timing baseline is taken at
/// the first poll after `arm`; a resumed run therefore starts a full interval
/// after resuming, with no partial tick carried over from before the pause.
#[derive(Debug, Default)]
pub struct FrameClock {
    interval_ms: Option<u32>,
    next_due: Option<f64>,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report whether a tick is due at `now_ms`.
    ///
    /// At most one tick is reported per call. If the host fell behind by more
    /// than one interval (background tab, long frame) the missed ticks are
    /// dropped and the baseline resyncs to `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(interval) = self.interval_ms else {
            return false;
        };
        let interval = f64::from(interval);
        let Some(due) = self.next_due else {
            self.next_due = Some(now_ms + interval);
            return false;
        };
        if now_ms < due {
            return false;
        }
        let next = due + interval;
        self.next_due = Some(if next <= now_ms { now_ms + interval } else { next });
        true
    }
}

impl Scheduler for FrameClock {
    fn arm(&mut self, interval_ms: u32) {
        debug_assert!(self.interval_ms.is_none(), "FrameClock armed twice");
        self.interval_ms = Some(interval_ms);
        self.next_due = None;
    }

    fn cancel(&mut self) {
        self.interval_ms = None;
        self.next_due = None;
    }

    fn armed(&self) -> Option<u32> {
        self.interval_ms
    }
}

/// Scheduler for hosts that call `step()` themselves (benchmarks, replays,
/// tests). Counts every call and every attempt to arm an occupied slot.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    interval_ms: Option<u32>,
    pub arms: u32,
    pub cancels: u32,
    pub overlapping_arms: u32,
    /// Every interval ever armed, in order.
    pub history: Vec<u32>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, interval_ms: u32) {
        if self.interval_ms.is_some() {
            self.overlapping_arms += 1;
        }
        self.interval_ms = Some(interval_ms);
        self.arms += 1;
        self.history.push(interval_ms);
    }

    fn cancel(&mut self) {
        self.interval_ms = None;
        self.cancels += 1;
    }

    fn armed(&self) -> Option<u32> {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_clock_never_ticks() {
        let mut clock = FrameClock::new();
        assert!(!clock.poll(0.0));
        assert!(!clock.poll(10_000.0));
    }

    #[test]
    fn baseline_taken_at_first_poll_after_arm() {
        let mut clock = FrameClock::new();
        clock.arm(150);
        assert!(!clock.poll(1000.0));
        assert!(!clock.poll(1149.0));
        assert!(clock.poll(1150.0));
        assert!(!clock.poll(1200.0));
        assert!(clock.poll(1300.0));
    }

    #[test]
    fn late_frame_yields_one_tick_and_resyncs() {
        let mut clock = FrameClock::new();
        clock.arm(100);
        clock.poll(0.0);
        assert!(clock.poll(1000.0));
        // Missed ticks are not replayed.
        assert!(!clock.poll(1001.0));
        assert!(!clock.poll(1099.0));
        assert!(clock.poll(1100.0));
    }

    #[test]
    fn cancel_then_arm_restarts_baseline() {
        let mut clock = FrameClock::new();
        clock.arm(100);
        clock.poll(0.0);
        clock.poll(90.0);
        clock.cancel();
        assert_eq!(clock.armed(), None);
        assert!(!clock.poll(5000.0));
        clock.arm(100);
        assert!(!clock.poll(6000.0));
        assert!(!clock.poll(6090.0));
        assert!(clock.poll(6100.0));
    }

    #[test]
    fn manual_scheduler_counts_overlaps() {
        let mut s = ManualScheduler::new();
        s.arm(150);
        s.cancel();
        s.arm(140);
        assert_eq!(s.overlapping_arms, 0);
        s.arm(130);
        assert_eq!(s.overlapping_arms, 1);
        assert_eq!(s.history, vec![150, 140, 130]);
        assert_eq!(s.armed(), Some(130));
    }
}
