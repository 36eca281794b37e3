use std::time::{Duration, Instant};

/// Frames run back to back when the loop falls behind. Past this the
/// schedule is re-anchored instead of trying to catch up.
pub const MAX_CATCH_UP: u32 = 5;

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests. Clones share the same time.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Fixed-rate frame schedule on top of a [`Clock`].
pub struct FrameScheduler<C> {
    clock: C,
    frame: Duration,
    next_frame: Duration,
}

impl<C: Clock> FrameScheduler<C> {
    pub fn new(clock: C, frame: Duration) -> Self {
        // A zero period would make every poll report unbounded work.
        let frame = frame.max(Duration::from_millis(1));
        let next_frame = clock.now() + frame;
        Self {
            clock,
            frame,
            next_frame,
        }
    }

    /// How long the loop may wait for input before the next frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.next_frame.saturating_sub(self.clock.now())
    }

    /// Number of ticks to run now, consuming them from the schedule.
    pub fn due_frames(&mut self) -> u32 {
        let now = self.clock.now();
        if now < self.next_frame {
            return 0;
        }
        let behind = ((now - self.next_frame).as_nanos() / self.frame.as_nanos()) as u64 + 1;
        if behind > MAX_CATCH_UP as u64 {
            log::debug!("frame schedule {} frames behind, re-anchoring", behind);
            self.next_frame = now + self.frame;
            return MAX_CATCH_UP;
        }
        self.next_frame += self.frame * behind as u32;
        behind as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_no_frames_before_first_deadline() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(clock.clone(), FRAME);
        assert_eq!(sched.due_frames(), 0);
        assert_eq!(sched.until_next_frame(), FRAME);
        clock.advance(Duration::from_millis(10));
        assert_eq!(sched.due_frames(), 0);
        assert_eq!(sched.until_next_frame(), Duration::from_millis(6));
    }

    #[test]
    fn test_one_frame_per_period() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(clock.clone(), FRAME);
        for _ in 0..10 {
            clock.advance(FRAME);
            assert_eq!(sched.due_frames(), 1);
            assert_eq!(sched.due_frames(), 0);
        }
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(clock.clone(), FRAME);
        clock.advance(FRAME * 3);
        assert_eq!(sched.due_frames(), 3);

        clock.advance(Duration::from_secs(2));
        assert_eq!(sched.due_frames(), MAX_CATCH_UP);
        // Re-anchored: the next frame is a full period away again.
        assert_eq!(sched.due_frames(), 0);
        assert_eq!(sched.until_next_frame(), FRAME);
    }
}
