use crate::{
    AnimationClock, ColorState, Error, FieldConfig, FieldFrame, FieldParams, FramePacer, GlyphRamp,
    GlyphSurface, GridLayout, Host, SizeTier, Tier, Viewport, ViewportLimits, ViewportState,
};

/// Why a frame did not draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Reduced motion is active; the surface stays as it is.
    ReducedMotion,
    /// Less than the minimum frame interval has elapsed.
    Throttled,
    /// The container could not be measured this frame.
    LayoutUnavailable,
    /// The container has no area.
    EmptyViewport,
}

/// Result of a single frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing was drawn.
    Skipped(SkipReason),
    /// The field was drawn.
    Drawn {
        /// Grid columns.
        cols: u32,
        /// Grid rows.
        rows: u32,
        /// Number of glyph fills issued; blank glyphs are not drawn.
        glyphs_drawn: u64,
        /// The cell size was scaled up to stay within the cell budget.
        density_corrected: bool,
    },
}

/// Result of a size check against the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeCheck {
    /// The backing store already matches the container.
    Unchanged,
    /// The backing store was resized to this viewport.
    Resized(Viewport),
    /// The container has no area.
    Empty,
}

/// Glyph index at a cell for a prepared frame.
///
/// Pure in its inputs: identical frames, ramps and coordinates always produce
/// the same index, and the index is always valid for `ramp`.
pub fn glyph_index(frame: &FieldFrame, ramp: &GlyphRamp, col: u32, row: u32) -> usize {
    ramp.index_for(frame.sample(col, row))
}

/// Owns the complete per-canvas render state.
///
/// The renderer does not schedule itself: the host calls [`frame`] from its
/// animation callback and forwards resize, color-scheme, reduced-motion and
/// visibility events to the matching `on_*` methods.
///
/// [`frame`]: FieldRenderer::frame
#[derive(Debug, Clone)]
pub struct FieldRenderer {
    config: FieldConfig,
    ramp: GlyphRamp,
    limits: ViewportLimits,
    viewport: ViewportState,
    tier: Tier,
    sizes: SizeTier,
    color: ColorState,
    clock: AnimationClock,
    pacer: FramePacer,
    params: FieldParams,
    reduced_motion: bool,
}

impl FieldRenderer {
    /// Creates a renderer for a validated configuration.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration is rejected by
    /// [`FieldConfig::validate`].
    pub fn new(config: FieldConfig) -> Result<Self, Error> {
        config.validate()?;

        let ramp = GlyphRamp::new(&config.glyphs)?;
        let tier = Tier::Desktop;

        Ok(Self {
            ramp,
            limits: ViewportLimits::new(config.max_canvas_dim, config.max_canvas_area),
            viewport: ViewportState::new(),
            tier,
            sizes: config.sizes.resolve(tier),
            color: ColorState::new(&config.fallback_light, &config.fallback_dark),
            clock: AnimationClock::new(config.speed, config.seed),
            pacer: FramePacer::new(config.min_frame_interval_ms()),
            params: FieldParams {
                blob_strength: config.blob_strength,
                shimmer_strength: config.shimmer_strength,
            },
            reduced_motion: false,
            config,
        })
    }

    /// Reads the initial environment and sizes the surface.
    ///
    /// Layout failures are ignored here; the next frame retries.
    pub fn mount(&mut self, host: &impl Host, surface: &mut impl GlyphSurface) {
        self.pick_tier(host, surface);
        self.color
            .resolve(host.css_property(&self.config.color_var).as_deref(), host.color_scheme());
        self.reduced_motion = self.config.respect_reduced_motion && host.prefers_reduced_motion();

        if let Err(e) = self.ensure_size(host, surface) {
            tracing::debug!(error = %e, "initial size check failed");
        }

        if self.reduced_motion {
            self.clear(surface);
        }

        tracing::debug!(
            tier = ?self.tier,
            color = self.color.current(),
            reduced_motion = self.reduced_motion,
            "field renderer mounted"
        );
    }

    /// Runs one animation-frame callback at host time `now_ms`.
    pub fn frame(
        &mut self,
        now_ms: f64,
        host: &impl Host,
        surface: &mut impl GlyphSurface,
    ) -> FrameOutcome {
        let outcome = self.draw(now_ms, host, surface);
        tracing::trace!(?outcome, now_ms, "frame");
        outcome
    }

    fn draw(
        &mut self,
        now_ms: f64,
        host: &impl Host,
        surface: &mut impl GlyphSurface,
    ) -> FrameOutcome {
        if self.reduced_motion {
            return FrameOutcome::Skipped(SkipReason::ReducedMotion);
        }

        if !self.pacer.try_advance(now_ms) {
            return FrameOutcome::Skipped(SkipReason::Throttled);
        }

        match self.ensure_size(host, surface) {
            Err(_) => return FrameOutcome::Skipped(SkipReason::LayoutUnavailable),
            Ok(SizeCheck::Empty) => return FrameOutcome::Skipped(SkipReason::EmptyViewport),
            Ok(_) => {},
        }
        let Some(viewport) = self.viewport.current() else {
            return FrameOutcome::Skipped(SkipReason::EmptyViewport);
        };

        let grid = GridLayout::compute(
            viewport.css_width,
            viewport.css_height,
            self.sizes.cell_size,
            self.config.max_cells,
        );

        let (width, height) = (f64::from(viewport.css_width), f64::from(viewport.css_height));
        if self.config.trail_strength > 0.0 {
            surface.fade(width, height, 1.0 - self.config.trail_strength);
        } else {
            surface.clear(width, height);
        }
        surface.set_fill(self.color.current());

        let frame = FieldFrame::new(self.clock.phase(now_ms), grid.cols, grid.rows, self.params);

        let mut glyphs_drawn = 0;
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let idx = glyph_index(&frame, &self.ramp, col, row);
                if self.ramp.is_blank(idx) {
                    continue;
                }

                if let Some(glyph) = self.ramp.glyph(idx) {
                    let (x, y) = grid.cell_origin(col, row);
                    surface.fill_glyph(glyph, x, y);
                    glyphs_drawn += 1;
                }
            }
        }

        FrameOutcome::Drawn {
            cols: grid.cols,
            rows: grid.rows,
            glyphs_drawn,
            density_corrected: grid.density_corrected,
        }
    }

    /// Measures the container and reconfigures the surface if the viewport
    /// changed.
    ///
    /// # Errors
    /// Propagates [`Error::Layout`] from [`Host::container_size`].
    pub fn ensure_size(
        &mut self,
        host: &impl Host,
        surface: &mut impl GlyphSurface,
    ) -> Result<SizeCheck, Error> {
        let (width, height) = host.container_size()?;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Ok(SizeCheck::Empty);
        }

        let Some(viewport) =
            self.viewport
                .update(width, height, host.device_pixel_ratio(), self.limits)
        else {
            return Ok(SizeCheck::Unchanged);
        };

        surface.configure(&viewport, &self.config.font_for(self.sizes.font_size));
        Ok(SizeCheck::Resized(viewport))
    }

    /// Handles a window resize: re-picks the size tier and re-checks size.
    pub fn on_resize(&mut self, host: &impl Host, surface: &mut impl GlyphSurface) {
        self.pick_tier(host, surface);
        if let Err(e) = self.ensure_size(host, surface) {
            tracing::debug!(error = %e, "size check after resize failed");
        }
    }

    /// Handles a color-scheme change: re-resolves the color and clears.
    pub fn on_color_scheme_change(&mut self, host: &impl Host, surface: &mut impl GlyphSurface) {
        self.color
            .resolve(host.css_property(&self.config.color_var).as_deref(), host.color_scheme());
        self.clear(surface);
    }

    /// Handles a reduced-motion preference change. Turning it on clears the
    /// surface once; later frames leave it untouched.
    pub fn on_reduced_motion_change(&mut self, reduce: bool, surface: &mut impl GlyphSurface) {
        let reduce = reduce && self.config.respect_reduced_motion;
        if reduce && !self.reduced_motion {
            self.clear(surface);
        }
        self.reduced_motion = reduce;
    }

    /// Resets the frame time reference after the loop was paused.
    pub fn on_resume(&mut self) {
        self.pacer.reset();
    }

    fn pick_tier(&mut self, host: &impl Host, surface: &mut impl GlyphSurface) {
        let tier = self.config.breakpoints.tier_for(host.viewport_width());
        if tier != self.tier {
            tracing::debug!(from = ?self.tier, to = ?tier, "size tier changed");
        }

        self.tier = tier;
        self.sizes = self.config.sizes.resolve(tier);
        surface.set_font(&self.config.font_for(self.sizes.font_size));
    }

    fn clear(&self, surface: &mut impl GlyphSurface) {
        let (w, h) = self
            .viewport
            .current()
            .map_or((0.0, 0.0), |vp| (f64::from(vp.css_width), f64::from(vp.css_height)));
        surface.clear(w, h);
    }

    /// Configuration the renderer was built from.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Parsed glyph ramp.
    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Currently active size tier.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Cell and font size of the active tier.
    pub fn sizes(&self) -> SizeTier {
        self.sizes
    }

    /// Viewport of the last size check, if the container had an area.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.current()
    }

    /// Current glyph color.
    pub fn color(&self) -> &str {
        self.color.current()
    }

    /// Whether a reduced-motion preference currently stops drawing.
    pub fn is_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Builds the field frame the renderer would draw at `now_ms` for `grid`.
    pub fn field_frame(&self, now_ms: f64, grid: &GridLayout) -> FieldFrame {
        FieldFrame::new(self.clock.phase(now_ms), grid.cols, grid.rows, self.params)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::{ColorScheme, TextSurface};

    struct FakeHost {
        size: RefCell<Result<(f64, f64), Error>>,
        dpr: f64,
        viewport_width: Cell<f64>,
        color_var: Option<String>,
        scheme: Cell<ColorScheme>,
        reduced_motion: bool,
    }

    impl FakeHost {
        fn new(width: f64, height: f64) -> Self {
            Self {
                size: RefCell::new(Ok((width, height))),
                dpr: 1.0,
                viewport_width: Cell::new(width),
                color_var: None,
                scheme: Cell::new(ColorScheme::Dark),
                reduced_motion: false,
            }
        }
    }

    impl Host for FakeHost {
        fn container_size(&self) -> Result<(f64, f64), Error> {
            self.size.borrow().clone()
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.dpr
        }

        fn viewport_width(&self) -> f64 {
            self.viewport_width.get()
        }

        fn css_property(&self, _name: &str) -> Option<String> {
            self.color_var.clone()
        }

        fn color_scheme(&self) -> ColorScheme {
            self.scheme.get()
        }

        fn prefers_reduced_motion(&self) -> bool {
            self.reduced_motion
        }
    }

    fn renderer(config: FieldConfig) -> FieldRenderer {
        FieldRenderer::new(config).unwrap()
    }

    #[test]
    fn test_mount_picks_tier_and_color() {
        let host = FakeHost::new(1280.0, 720.0);
        let mut surface = TextSurface::new(16.0);
        let mut r = renderer(FieldConfig::default());

        r.mount(&host, &mut surface);

        assert_eq!(r.tier(), Tier::Desktop);
        assert_eq!(r.sizes().cell_size, 16.0);
        assert_eq!(r.color(), "rgba(255, 255, 255, 0.05)");
        assert_eq!(r.viewport().map(|vp| vp.css_size()), Some((1280, 720)));
        assert!(surface.font().starts_with("20px main-normal ui-monospace"));
    }

    #[test]
    fn test_frame_draws_within_grid() {
        let host = FakeHost::new(1024.0, 768.0);
        let mut surface = TextSurface::new(16.0);
        let mut r = renderer(FieldConfig::default().fps(0.0).trail_strength(0.0));
        r.mount(&host, &mut surface);

        let outcome = r.frame(1000.0, &host, &mut surface);
        let FrameOutcome::Drawn { cols, rows, glyphs_drawn, density_corrected } = outcome else {
            panic!("expected a drawn frame, got {outcome:?}");
        };

        assert_eq!((cols, rows), (64, 48));
        assert!(!density_corrected);
        assert!(glyphs_drawn <= 3072);
        assert_eq!(surface.visible_cells() as u64, glyphs_drawn);
    }

    #[test]
    fn test_frames_are_throttled() {
        let host = FakeHost::new(320.0, 200.0);
        let mut surface = TextSurface::new(8.0);
        let mut r = renderer(FieldConfig::default().fps(50.0));
        r.mount(&host, &mut surface);

        assert!(matches!(r.frame(20.0, &host, &mut surface), FrameOutcome::Drawn { .. }));
        assert_eq!(
            r.frame(30.0, &host, &mut surface),
            FrameOutcome::Skipped(SkipReason::Throttled)
        );
        assert!(matches!(r.frame(40.0, &host, &mut surface), FrameOutcome::Drawn { .. }));
    }

    #[test]
    fn test_reduced_motion_never_draws() {
        let mut host = FakeHost::new(640.0, 480.0);
        host.reduced_motion = true;
        let mut surface = TextSurface::new(11.0);
        let mut r = renderer(FieldConfig::default().fps(0.0));

        r.mount(&host, &mut surface);
        assert!(r.is_reduced_motion());

        let snapshot = surface.render(0.0);
        let ops = surface.content_ops();
        for now in [0.0, 16.0, 33.0, 5000.0] {
            assert_eq!(
                r.frame(now, &host, &mut surface),
                FrameOutcome::Skipped(SkipReason::ReducedMotion)
            );
        }
        assert_eq!(surface.render(0.0), snapshot);
        assert_eq!(surface.content_ops(), ops);
    }

    #[test]
    fn test_reduced_motion_can_be_ignored() {
        let mut host = FakeHost::new(640.0, 480.0);
        host.reduced_motion = true;
        let mut surface = TextSurface::new(11.0);
        let mut r = renderer(FieldConfig::default().fps(0.0).respect_reduced_motion(false));

        r.mount(&host, &mut surface);
        assert!(!r.is_reduced_motion());
        assert!(matches!(r.frame(0.0, &host, &mut surface), FrameOutcome::Drawn { .. }));

        r.on_reduced_motion_change(true, &mut surface);
        assert!(!r.is_reduced_motion());
    }

    #[test]
    fn test_reduced_motion_toggle_clears_once() {
        let host = FakeHost::new(320.0, 160.0);
        let mut surface = TextSurface::new(8.0);
        let mut r = renderer(FieldConfig::default().fps(0.0).trail_strength(0.0));
        r.mount(&host, &mut surface);
        r.frame(100.0, &host, &mut surface);

        r.on_reduced_motion_change(true, &mut surface);
        assert_eq!(surface.visible_cells(), 0);

        let ops = surface.content_ops();
        r.frame(200.0, &host, &mut surface);
        assert_eq!(surface.content_ops(), ops);

        r.on_reduced_motion_change(false, &mut surface);
        assert!(matches!(r.frame(300.0, &host, &mut surface), FrameOutcome::Drawn { .. }));
    }

    #[test]
    fn test_layout_failure_skips_frame() {
        let host = FakeHost::new(320.0, 160.0);
        let mut surface = TextSurface::new(8.0);
        let mut r = renderer(FieldConfig::default().fps(0.0));
        r.mount(&host, &mut surface);

        *host.size.borrow_mut() = Err(Error::detached("container"));
        assert_eq!(
            r.frame(10.0, &host, &mut surface),
            FrameOutcome::Skipped(SkipReason::LayoutUnavailable)
        );

        // recovers on the next frame once layout is readable again
        *host.size.borrow_mut() = Ok((320.0, 160.0));
        assert!(matches!(r.frame(20.0, &host, &mut surface), FrameOutcome::Drawn { .. }));
    }

    #[test]
    fn test_zero_size_container_skips_frame() {
        let host = FakeHost::new(0.0, 0.0);
        let mut surface = TextSurface::new(8.0);
        let mut r = renderer(FieldConfig::default().fps(0.0));
        r.mount(&host, &mut surface);

        assert_eq!(
            r.frame(10.0, &host, &mut surface),
            FrameOutcome::Skipped(SkipReason::EmptyViewport)
        );
        assert!(r.viewport().is_none());
    }

    #[test]
    fn test_resize_switches_tier() {
        let host = FakeHost::new(1280.0, 800.0);
        let mut surface = TextSurface::new(8.0);
        let mut r = renderer(FieldConfig::default());
        r.mount(&host, &mut surface);
        assert_eq!(r.tier(), Tier::Desktop);

        host.viewport_width.set(500.0);
        *host.size.borrow_mut() = Ok((500.0, 800.0));
        r.on_resize(&host, &mut surface);

        assert_eq!(r.tier(), Tier::Mobile);
        assert_eq!(r.sizes(), SizeTier::new(8.0, 10.0));
        assert_eq!(r.viewport().map(|vp| vp.css_size()), Some((500, 800)));
    }

    #[test]
    fn test_color_scheme_change_clears() {
        let host = FakeHost::new(320.0, 160.0);
        let mut surface = TextSurface::new(8.0);
        let mut r = renderer(FieldConfig::default().fps(0.0).fallback_colors("black", "white"));
        r.mount(&host, &mut surface);
        r.frame(100.0, &host, &mut surface);
        assert_eq!(r.color(), "white");

        host.scheme.set(ColorScheme::Light);
        r.on_color_scheme_change(&host, &mut surface);

        assert_eq!(r.color(), "black");
        assert_eq!(surface.visible_cells(), 0);
    }

    #[test]
    fn test_glyph_index_is_pure_and_bounded() {
        let r = renderer(FieldConfig::default());
        let grid = GridLayout::compute(640, 480, 10.0, 200_000);
        let a = r.field_frame(1234.0, &grid);
        let b = r.field_frame(1234.0, &grid);

        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let idx = glyph_index(&a, r.ramp(), col, row);
                assert_eq!(idx, glyph_index(&b, r.ramp(), col, row));
                assert!(idx < r.ramp().len());
            }
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(FieldRenderer::new(FieldConfig::default().glyphs("")).is_err());
    }
}
