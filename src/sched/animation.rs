use std::time::{Duration, Instant};

#[derive(Debug, PartialEq, Eq)]
pub enum AnimationTick {
    /// Render the frame for this countdown value (`max_frames - 1 ..= 1`).
    Frame(u32),
    Finished,
}

/// Frame-countdown state machine playing out one layout transition. The
/// first tick after `arm` is due immediately; arming mid-transition
/// supersedes the running one, transitions never queue.
pub struct AnimationDriver {
    max_frames: u32,
    frame_interval: Duration,
    frame_count: u32,
    next_frame: Option<Instant>,
}

impl AnimationDriver {
    pub fn new(max_frames: u32, duration: Duration) -> Self {
        let max_frames = max_frames.max(1);
        Self {
            max_frames,
            frame_interval: duration / max_frames,
            frame_count: 0,
            next_frame: None,
        }
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    pub fn arm(&mut self, now: Instant) {
        self.frame_count = self.max_frames;
        self.next_frame = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_frame.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_frame
    }

    pub fn tick(&mut self, now: Instant) -> Option<AnimationTick> {
        let deadline = self.next_frame?;
        if now < deadline {
            return None;
        }

        self.frame_count -= 1;
        if self.frame_count > 0 {
            self.next_frame = Some(deadline + self.frame_interval);
            Some(AnimationTick::Frame(self.frame_count))
        } else {
            self.next_frame = None;
            Some(AnimationTick::Finished)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(3000);

    #[test]
    fn counts_down_and_finishes() {
        let mut driver = AnimationDriver::new(3, DURATION);
        let t0 = Instant::now();
        let step = DURATION / 3;

        driver.arm(t0);
        assert_eq!(driver.tick(t0), Some(AnimationTick::Frame(2)));
        assert_eq!(driver.tick(t0), None); // next frame not due yet
        assert_eq!(driver.tick(t0 + step), Some(AnimationTick::Frame(1)));
        assert_eq!(driver.tick(t0 + 2 * step), Some(AnimationTick::Finished));
        assert!(!driver.is_running());
        assert_eq!(driver.tick(t0 + 3 * step), None);
    }

    #[test]
    fn first_tick_is_due_immediately() {
        let mut driver = AnimationDriver::new(3, DURATION);
        let t0 = Instant::now();
        driver.arm(t0);
        assert_eq!(driver.next_deadline(), Some(t0));
    }

    #[test]
    fn rearming_supersedes_a_running_transition() {
        let mut driver = AnimationDriver::new(3, DURATION);
        let t0 = Instant::now();

        driver.arm(t0);
        let _ = driver.tick(t0);

        let t1 = t0 + Duration::from_millis(500);
        driver.arm(t1);
        assert_eq!(driver.tick(t1), Some(AnimationTick::Frame(2)));
    }

    #[test]
    fn stop_halts_mid_transition() {
        let mut driver = AnimationDriver::new(3, DURATION);
        let t0 = Instant::now();

        driver.stop(); // nothing running: no-op
        driver.arm(t0);
        let _ = driver.tick(t0);
        driver.stop();
        assert!(!driver.is_running());
        assert_eq!(driver.tick(t0 + DURATION), None);
    }
}
