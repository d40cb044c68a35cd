//! Scroll-triggered reveal animations.
//!
//! Items (skill bars) reveal once when enough of them scrolls into view; a
//! revealed item then counts its displayed percentage up to its target level
//! with a per-item duration and easing chosen once at mount.

use std::collections::HashSet;

use compact_str::CompactString;

use crate::RandomSource;

/// Fraction of an item that must be visible before it reveals.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.25;
/// Count-up duration used when an item has no configured duration.
pub const DEFAULT_COUNT_DURATION_MS: f64 = 1500.0;

/// One-shot set of revealed items.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSet {
    threshold: f64,
    revealed: HashSet<CompactString>,
}

impl Default for RevealSet {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_THRESHOLD)
    }
}

impl RevealSet {
    /// Creates a set revealing items once `threshold` of them is visible.
    pub fn new(threshold: f64) -> Self {
        Self { threshold, revealed: HashSet::new() }
    }

    /// Reports an intersection ratio for `key`.
    ///
    /// Returns true exactly once per key: the first time the ratio reaches the
    /// threshold. Revealed items stay revealed.
    pub fn observe(&mut self, key: &str, intersection_ratio: f64) -> bool {
        if intersection_ratio < self.threshold || self.revealed.contains(key) {
            return false;
        }

        self.revealed.insert(key.into())
    }

    /// Whether `key` has been revealed.
    pub fn is_revealed(&self, key: &str) -> bool {
        self.revealed.contains(key)
    }

    /// Number of revealed items.
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    /// True until the first item is revealed.
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }
}

/// Linear count-up of a displayed integer from 0 to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUp {
    target: u32,
    duration_ms: f64,
    start_ms: f64,
}

impl CountUp {
    /// Starts counting at host time `start_ms`. A non-positive duration
    /// falls back to [`DEFAULT_COUNT_DURATION_MS`].
    pub fn new(target: u32, duration_ms: f64, start_ms: f64) -> Self {
        let duration_ms = if duration_ms > 0.0 { duration_ms } else { DEFAULT_COUNT_DURATION_MS };
        Self { target, duration_ms, start_ms }
    }

    /// Progress in `[0, 1]` at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Displayed value at `now_ms`.
    pub fn value(&self, now_ms: f64) -> u32 {
        (f64::from(self.target) * self.progress(now_ms)).round() as u32
    }

    /// True once the target has been reached; no further frames are needed.
    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// CSS cubic-bezier easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// First control point, time axis.
    pub x1: f64,
    /// First control point, progress axis.
    pub y1: f64,
    /// Second control point, time axis.
    pub x2: f64,
    /// Second control point, progress axis.
    pub y2: f64,
}

impl CubicBezier {
    /// Random curve with `x` control points in `[0, 1)` and `y` control
    /// points in `[-0.5, 1.5)`, allowing slight overshoot.
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let x1 = rng.next_unit();
        let x2 = rng.next_unit();
        let y1 = rng.range(-0.5, 1.5);
        let y2 = rng.range(-0.5, 1.5);
        Self { x1, y1, x2, y2 }
    }

    /// CSS `transition-timing-function` value, two decimals per coordinate.
    pub fn to_css(&self) -> String {
        format!(
            "cubic-bezier({},{},{},{})",
            round2(self.x1),
            round2(self.y1),
            round2(self.x2),
            round2(self.y2)
        )
    }
}

fn round2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    // avoid printing "-0"
    if r == 0.0 { 0.0 } else { r }
}

/// Per-item reveal animation settings, fixed at mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealAnimation {
    /// Length of the bar transition.
    pub duration_ms: f64,
    /// Timing function of the bar transition.
    pub easing: CubicBezier,
}

impl RevealAnimation {
    /// Random duration in `[1, 3)` seconds with a random easing curve.
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let duration_ms = rng.range(1.0, 3.0) * 1000.0;
        let easing = CubicBezier::random(rng);
        Self { duration_ms, easing }
    }

    /// Starts the count-up for a revealed item.
    pub fn count_up(&self, target: u32, start_ms: f64) -> CountUp {
        CountUp::new(target, self.duration_ms, start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequenceSource;

    #[test]
    fn test_reveal_once() {
        let mut set = RevealSet::default();

        assert!(!set.observe("Rust", 0.1));
        assert!(set.observe("Rust", 0.25));
        assert!(!set.observe("Rust", 0.9));
        // scrolling away does not hide it again
        assert!(!set.observe("Rust", 0.0));
        assert!(set.is_revealed("Rust"));
        assert!(!set.is_revealed("Go"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_count_up() {
        let c = CountUp::new(90, 2000.0, 1000.0);

        assert_eq!(c.value(500.0), 0);
        assert_eq!(c.value(1000.0), 0);
        assert_eq!(c.value(2000.0), 45);
        assert_eq!(c.value(2011.0), 45);
        assert!(!c.is_done(2999.0));
        assert_eq!(c.value(3000.0), 90);
        assert!(c.is_done(3000.0));
        assert_eq!(c.value(9000.0), 90);
    }

    #[test]
    fn test_count_up_default_duration() {
        let c = CountUp::new(100, 0.0, 0.0);
        assert_eq!(c.value(750.0), 50);
        assert!(c.is_done(1500.0));
    }

    #[test]
    fn test_cubic_bezier_css() {
        let mut rng = SequenceSource::new([0.123, 0.5, 0.0, 0.999]);
        let curve = CubicBezier::random(&mut rng);

        assert_eq!(curve.to_css(), "cubic-bezier(0.12,-0.5,0.5,1.5)");
    }

    #[test]
    fn test_random_animation() {
        let mut rng = SequenceSource::new([0.5, 0.0, 0.0, 0.25, 0.25]);
        let anim = RevealAnimation::random(&mut rng);

        assert_eq!(anim.duration_ms, 2000.0);
        assert_eq!(anim.easing.to_css(), "cubic-bezier(0,0,0,0)");
        assert_eq!(anim.count_up(80, 0.0).value(1000.0), 40);
    }
}
