//! Backing-store sizing for a high-DPI canvas.
//!
//! The canvas is sized in CSS pixels from its container, and its backing store
//! is scaled by an effective pixel ratio. That ratio is the device ratio,
//! reduced so the backing store stays within [`ViewportLimits`] on either axis
//! and in total area, and never below 1.

/// Granularity of the limit-derived pixel ratios.
const PIXEL_RATIO_STEP: f64 = 0.25;

/// Upper bounds for the canvas backing store, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportLimits {
    /// Largest width or height.
    pub max_dim: u32,
    /// Largest width times height.
    pub max_area: u64,
}

impl ViewportLimits {
    /// Creates limits from a per-axis and a total bound.
    pub const fn new(max_dim: u32, max_area: u64) -> Self {
        Self { max_dim, max_area }
    }
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self::new(8192, 8192 * 8192)
    }
}

/// Resolved canvas geometry: CSS size plus effective pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas width in CSS pixels.
    pub css_width: u32,
    /// Canvas height in CSS pixels.
    pub css_height: u32,
    /// Backing-store pixels per CSS pixel.
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Resolves the viewport for a container box and device pixel ratio.
    ///
    /// The container size is rounded to whole CSS pixels, kept at least 1, and
    /// clamped to the limits. Non-finite or sub-1 device ratios resolve to 1.
    pub fn resolve(
        container_width: f64,
        container_height: f64,
        device_pixel_ratio: f64,
        limits: ViewportLimits,
    ) -> Self {
        let max_dim = f64::from(limits.max_dim.max(1));
        let max_area = (limits.max_area.max(1)) as f64;

        let mut w = container_width.round().max(1.0).min(max_dim);
        let mut h = container_height.round().max(1.0).min(max_dim);

        // only reachable when max_area < max_dim^2
        if w * h > max_area {
            let scale = (max_area / (w * h)).sqrt();
            w = (w * scale).floor().max(1.0);
            h = (h * scale).floor().max(1.0);
            w = w.min((max_area / h).floor().max(1.0));
            h = h.min((max_area / w).floor().max(1.0));
        }

        let device = if device_pixel_ratio.is_finite() { device_pixel_ratio } else { 1.0 };
        let dim_limit = quantize((max_dim / w).min(max_dim / h));
        let area_limit = quantize((max_area / (w * h)).sqrt());

        let pixel_ratio = device.min(dim_limit).min(area_limit).max(1.0);

        Self {
            css_width: w as u32,
            css_height: h as u32,
            pixel_ratio,
        }
    }

    /// CSS size in logical pixels.
    pub fn css_size(&self) -> (u32, u32) {
        (self.css_width, self.css_height)
    }

    /// Backing-store size in physical pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((f64::from(v) * self.pixel_ratio).floor() as u32).max(1);
        (scale(self.css_width), scale(self.css_height))
    }

    /// Total backing-store pixels.
    pub fn backing_area(&self) -> u64 {
        let (w, h) = self.backing_size();
        u64::from(w) * u64::from(h)
    }
}

fn quantize(ratio: f64) -> f64 {
    (ratio / PIXEL_RATIO_STEP).floor() * PIXEL_RATIO_STEP
}

/// Tracks the current viewport and reports only actual changes.
#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    current: Option<Viewport>,
}

impl ViewportState {
    /// Creates a state without a viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently accepted viewport.
    pub fn current(&self) -> Option<Viewport> {
        self.current
    }

    /// Resolves a new viewport, returning it only if it differs from the
    /// current one (i.e. the backing store must be reallocated).
    pub fn update(
        &mut self,
        container_width: f64,
        container_height: f64,
        device_pixel_ratio: f64,
        limits: ViewportLimits,
    ) -> Option<Viewport> {
        let next = Viewport::resolve(container_width, container_height, device_pixel_ratio, limits);
        if self.current == Some(next) {
            return None;
        }

        tracing::debug!(
            css_width = next.css_width,
            css_height = next.css_height,
            pixel_ratio = next.pixel_ratio,
            "viewport changed"
        );
        self.current = Some(next);
        Some(next)
    }

    /// Forgets the current viewport so the next update always reports a change.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
