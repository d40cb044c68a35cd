//! Seams between the renderer and its environment.
//!
//! [`Host`] answers the questions the renderer asks about layout and user
//! preferences; [`GlyphSurface`] receives the drawing operations. The browser
//! crate implements both on top of the DOM and a 2D canvas context, while
//! [`TextSurface`](crate::TextSurface) renders into a character grid.

use crate::{ColorScheme, Error, Viewport};

/// Read-only view of the environment hosting a renderer.
pub trait Host {
    /// Size of the container's rendered box, in CSS pixels.
    ///
    /// # Errors
    /// Returns [`Error::Layout`] if the container cannot be measured, e.g.
    /// when it has been detached from the document.
    fn container_size(&self) -> Result<(f64, f64), Error>;

    /// Ratio of physical to CSS pixels.
    fn device_pixel_ratio(&self) -> f64;

    /// Width of the layout viewport, used to pick the responsive tier.
    fn viewport_width(&self) -> f64;

    /// Value of a CSS custom property on the container, if defined.
    fn css_property(&self, name: &str) -> Option<String>;

    /// Current system color scheme.
    fn color_scheme(&self) -> ColorScheme;

    /// True if the user asked the system to minimize motion.
    fn prefers_reduced_motion(&self) -> bool;
}

/// Drawing target for glyph frames. Coordinates are CSS pixels.
pub trait GlyphSurface {
    /// Reallocates the backing store for `viewport` and applies its pixel
    /// ratio transform and text settings. Reallocation clears the surface.
    fn configure(&mut self, viewport: &Viewport, font: &str);

    /// Sets the font used by subsequent glyph fills.
    fn set_font(&mut self, font: &str);

    /// Clears the given area to transparent.
    fn clear(&mut self, width: f64, height: f64);

    /// Scales the alpha of existing content by `keep_alpha`
    /// (`destination-in` compositing with a translucent fill).
    fn fade(&mut self, width: f64, height: f64, keep_alpha: f64);

    /// Sets the CSS color used by subsequent glyph fills.
    fn set_fill(&mut self, color: &str);

    /// Draws a glyph with its top-left corner at `(x, y)`.
    fn fill_glyph(&mut self, glyph: &str, x: f64, y: f64);
}
