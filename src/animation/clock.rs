use crate::foundation::core::{AnimationTime, wrap_cycle};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Playback state of an [`AnimationClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    /// Time advances on every tick.
    Running,
    /// Time is frozen; ticks are ignored.
    Paused,
}

/// Cyclic animation clock driven by wall-clock ticks.
///
/// The clock never reads the system time itself: the frame loop passes `now` into
/// [`AnimationClock::tick`]. `resume_at` and `seek_at` re-anchor at the given instant; `resume` and
/// `seek` drop the anchor instead, so the next tick re-anchors without advancing.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    value: f64,
    state: ClockState,
    last_update: Option<Instant>,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    /// A running clock at time 0.
    pub fn new() -> Self {
        Self {
            value: 0.0,
            state: ClockState::Running,
            last_update: None,
        }
    }

    /// Current playback state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }

    /// Current time within the cycle.
    pub fn time(&self) -> AnimationTime {
        AnimationTime {
            value: self.value,
            paused: self.is_paused(),
        }
    }

    /// Advance by the wall-clock time elapsed since the previous tick.
    ///
    /// Ignored while paused. A `now` earlier than the previous tick counts as zero elapsed time.
    pub fn tick(&mut self, now: Instant) -> AnimationTime {
        if self.state == ClockState::Running {
            if let Some(last) = self.last_update {
                let delta = now.saturating_duration_since(last).as_secs_f64();
                self.value = wrap_cycle(self.value + delta);
            }
            // Keep the anchor monotonic even if `now` went backwards.
            self.last_update = Some(match self.last_update {
                Some(last) if last > now => last,
                _ => now,
            });
        }
        self.time()
    }

    /// Freeze the displayed time.
    pub fn pause(&mut self) {
        self.state = ClockState::Paused;
    }

    /// Continue from the frozen time without jumping over the paused interval.
    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
            self.last_update = None;
        }
    }

    /// Continue from the frozen time, measuring elapsed time from `now`.
    pub fn resume_at(&mut self, now: Instant) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
            self.last_update = Some(now);
        }
    }

    /// Flip between running and paused.
    pub fn toggle(&mut self) {
        match self.state {
            ClockState::Running => self.pause(),
            ClockState::Paused => self.resume(),
        }
    }

    /// Jump to `t` seconds (wrapped into the cycle). Keeps the current state.
    pub fn seek(&mut self, t: f64) {
        self.value = wrap_cycle(t);
        self.last_update = None;
    }

    /// Jump to `t` seconds and measure the next tick from `now`. Keeps the current state.
    pub fn seek_at(&mut self, t: f64, now: Instant) {
        self.value = wrap_cycle(t);
        self.last_update = Some(now);
    }
}

/// Shared handle to a clock, for control layers on other threads.
///
/// All methods lock briefly; none of them wait for the frame loop to stop.
#[derive(Clone, Debug, Default)]
pub struct ClockHandle {
    inner: Arc<Mutex<AnimationClock>>,
}

impl ClockHandle {
    /// Wrap a clock.
    pub fn new(clock: AnimationClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(clock)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AnimationClock> {
        // Clock state is plain data; a panic mid-update cannot leave it inconsistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// See [`AnimationClock::tick`].
    pub fn tick(&self, now: Instant) -> AnimationTime {
        self.lock().tick(now)
    }

    /// See [`AnimationClock::pause`].
    pub fn pause(&self) {
        self.lock().pause();
    }

    /// See [`AnimationClock::resume`].
    pub fn resume(&self) {
        self.lock().resume();
    }

    /// See [`AnimationClock::resume_at`].
    pub fn resume_at(&self, now: Instant) {
        self.lock().resume_at(now);
    }

    /// See [`AnimationClock::toggle`].
    pub fn toggle(&self) {
        self.lock().toggle();
    }

    /// See [`AnimationClock::seek`].
    pub fn seek(&self, t: f64) {
        self.lock().seek(t);
    }

    /// See [`AnimationClock::seek_at`].
    pub fn seek_at(&self, t: f64, now: Instant) {
        self.lock().seek_at(t, now);
    }

    /// Current time.
    pub fn time(&self) -> AnimationTime {
        self.lock().time()
    }

    /// Current playback state.
    pub fn state(&self) -> ClockState {
        self.lock().state()
    }

    /// Copy of the clock state.
    pub fn snapshot(&self) -> AnimationClock {
        self.lock().clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
