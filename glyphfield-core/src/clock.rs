/// Maps host timestamps to the animation phase.
///
/// The phase is wall-clock seconds scaled by `speed`, offset by `seed * 1000`
/// seconds so that differently seeded instances never line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    speed: f64,
    seed: f64,
}

impl AnimationClock {
    /// Creates a clock with a speed multiplier and a seed offset.
    pub fn new(speed: f64, seed: f64) -> Self {
        Self { speed, seed }
    }

    /// Animation phase in seconds for a host timestamp in milliseconds.
    pub fn phase(&self, now_ms: f64) -> f64 {
        (now_ms / 1000.0) * self.speed + self.seed * 1000.0
    }
}

/// Throttles the frame loop to a target frame rate.
///
/// The loop itself runs on every animation frame; the pacer decides which of
/// those frames actually draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePacer {
    min_interval_ms: Option<f64>,
    last_frame_ms: f64,
}

impl FramePacer {
    /// Creates a pacer; `None` draws on every frame.
    pub fn new(min_interval_ms: Option<f64>) -> Self {
        Self { min_interval_ms, last_frame_ms: 0.0 }
    }

    /// Returns true if a frame at `now_ms` should draw, and records it if so.
    pub fn try_advance(&mut self, now_ms: f64) -> bool {
        match self.min_interval_ms {
            Some(min_dt) if now_ms - self.last_frame_ms < min_dt => false,
            Some(_) => {
                self.last_frame_ms = now_ms;
                true
            },
            None => true,
        }
    }

    /// Resets the time reference, e.g. after the loop was paused.
    pub fn reset(&mut self) {
        self.last_frame_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase() {
        let clock = AnimationClock::new(2.0, 0.0);
        assert_eq!(clock.phase(1500.0), 3.0);

        let seeded = AnimationClock::new(1.0, 0.5);
        assert_eq!(seeded.phase(0.0), 500.0);
    }

    #[test]
    fn test_pacer_throttles() {
        // 50 fps => 20ms
        let mut pacer = FramePacer::new(Some(20.0));

        assert!(pacer.try_advance(20.0));
        assert!(!pacer.try_advance(30.0));
        assert!(!pacer.try_advance(39.9));
        assert!(pacer.try_advance(40.0));
        assert!(!pacer.try_advance(41.0));
    }

    #[test]
    fn test_pacer_reset() {
        let mut pacer = FramePacer::new(Some(20.0));

        assert!(pacer.try_advance(5000.0));
        // a visibility restart hands out timestamps from a fresh reference
        pacer.reset();
        assert!(pacer.try_advance(25.0));
    }

    #[test]
    fn test_unthrottled_pacer() {
        let mut pacer = FramePacer::new(None);
        assert!(pacer.try_advance(0.0));
        assert!(pacer.try_advance(0.0));
        assert!(pacer.try_advance(1.0));
    }
}
