use glyphfield_core::{GlyphSurface, Viewport};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`GlyphSurface`] drawing into a canvas through its 2D context.
///
/// Coordinates are CSS pixels; the context transform maps them onto the
/// backing store at the viewport's pixel ratio.
#[derive(Debug)]
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub(crate) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Backing-store size in physical pixels.
    pub(crate) fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

impl GlyphSurface for CanvasSurface {
    fn configure(&mut self, viewport: &Viewport, font: &str) {
        let (width, height) = viewport.backing_size();

        // assigning a dimension reallocates the backing store even if unchanged
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }

        let ratio = viewport.pixel_ratio;
        let _ = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
        self.ctx.set_text_baseline("top");
        self.ctx.set_text_align("left");
        self.ctx.set_font(font);

        tracing::debug!(width, height, ratio, "canvas backing store configured");
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fade(&mut self, width: f64, height: f64, keep_alpha: f64) {
        self.ctx.save();
        let _ = self.ctx.set_global_composite_operation("destination-in");
        self.ctx.set_fill_style_str(&format!("rgba(0,0,0,{keep_alpha})"));
        self.ctx.fill_rect(0.0, 0.0, width, height);
        self.ctx.restore();
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn fill_glyph(&mut self, glyph: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(glyph, x, y);
    }
}
