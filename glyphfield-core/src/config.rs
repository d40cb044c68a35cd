//! Construction-time configuration for the glyph plasma renderer.
//!
//! Every field has a default, so a renderer can be created from
//! `FieldConfig::default()` and tuned with the consuming setters:
//!
//! ```
//! use glyphfield_core::FieldConfig;
//!
//! let config = FieldConfig::default()
//!     .glyphs(" .oO@")
//!     .fps(60.0)
//!     .trail_strength(0.0);
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! With the `serde` feature enabled, the configuration deserializes from the
//! camelCase option object used by the browser component (`cellSize`,
//! `trailStrength`, `maxCanvasDim`, ...), with missing fields taking defaults.

use compact_str::CompactString;

use crate::error::Error;

const FALLBACK_CELL_SIZE: f64 = 10.0;
const FALLBACK_FONT_SIZE: f64 = 14.0;

/// Cell and font size for one responsive tier, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct SizeTier {
    /// Grid pitch; one glyph is drawn per cell.
    pub cell_size: f64,
    /// Font size of the glyphs.
    pub font_size: f64,
}

impl SizeTier {
    /// Creates a tier from a cell size and a font size.
    pub const fn new(cell_size: f64, font_size: f64) -> Self {
        Self { cell_size, font_size }
    }
}

/// Responsive size tier selected from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Narrower than [`Breakpoints::mobile`].
    Mobile,
    /// Between the mobile and tablet breakpoints.
    Tablet,
    /// At least [`Breakpoints::tablet`] wide.
    Desktop,
}

/// Width thresholds separating the responsive tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Breakpoints {
    /// Viewports narrower than this use the mobile tier.
    pub mobile: f64,
    /// Viewports narrower than this (and not mobile) use the tablet tier.
    pub tablet: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self { mobile: 640.0, tablet: 1024.0 }
    }
}

impl Breakpoints {
    /// Returns the tier for the given viewport width.
    pub fn tier_for(&self, viewport_width: f64) -> Tier {
        if viewport_width < self.mobile {
            Tier::Mobile
        } else if viewport_width < self.tablet {
            Tier::Tablet
        } else {
            Tier::Desktop
        }
    }
}

/// Per-tier cell and font sizes.
///
/// A missing tier falls back to `base`, and a missing `base` falls back to a
/// 10px cell with a 14px font.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, rename_all = "camelCase")
)]
pub struct SizeTable {
    /// Fallback for every tier without its own entry.
    pub base: Option<SizeTier>,
    /// Sizes below the mobile breakpoint.
    pub mobile: Option<SizeTier>,
    /// Sizes between the mobile and tablet breakpoints.
    pub tablet: Option<SizeTier>,
    /// Sizes above the tablet breakpoint.
    pub desktop: Option<SizeTier>,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            base: Some(SizeTier::new(10.0, 14.0)),
            mobile: Some(SizeTier::new(8.0, 10.0)),
            tablet: Some(SizeTier::new(11.0, 15.0)),
            desktop: Some(SizeTier::new(16.0, 20.0)),
        }
    }
}

impl SizeTable {
    /// Resolves the sizes for a tier, applying the base fallback chain.
    pub fn resolve(&self, tier: Tier) -> SizeTier {
        let chosen = match tier {
            Tier::Mobile => self.mobile,
            Tier::Tablet => self.tablet,
            Tier::Desktop => self.desktop,
        };

        chosen
            .or(self.base)
            .unwrap_or(SizeTier::new(FALLBACK_CELL_SIZE, FALLBACK_FONT_SIZE))
    }
}

/// Complete renderer configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FieldConfig {
    /// Glyph ramp from sparse to dense; a space draws nothing.
    pub glyphs: CompactString,
    /// Cell and font sizes per responsive tier.
    pub sizes: SizeTable,
    /// Viewport widths separating the tiers.
    pub breakpoints: Breakpoints,
    /// CSS font-family list appended to the active font size.
    pub font_family: CompactString,
    /// Multiplier applied to wall-clock seconds.
    pub speed: f64,
    /// Target frame rate; `0` renders on every animation frame.
    pub fps: f64,
    /// Persistence of the previous frame in `[0, 1]`; `0` clears every frame.
    pub trail_strength: f64,
    /// Upper bound on the number of cells sampled per frame.
    pub max_cells: u32,
    /// CSS custom property holding the glyph color.
    pub color_var: CompactString,
    /// Glyph color for a light scheme when `color_var` is unset.
    pub fallback_light: CompactString,
    /// Glyph color for a dark scheme when `color_var` is unset.
    pub fallback_dark: CompactString,
    /// Draw nothing while the user prefers reduced motion.
    pub respect_reduced_motion: bool,
    /// Maximum backing-store size per axis, in physical pixels.
    pub max_canvas_dim: u32,
    /// Maximum backing-store area, in physical pixels.
    pub max_canvas_area: u64,
    /// Weight of the slow blob component.
    pub blob_strength: f64,
    /// Weight of the per-cell shimmer.
    pub shimmer_strength: f64,
    /// Phase offset; each unit shifts the animation by 1000 seconds.
    pub seed: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            glyphs: " .:;=+*#%@$&".into(),
            sizes: SizeTable::default(),
            breakpoints: Breakpoints::default(),
            font_family: "main-normal ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace"
                .into(),
            speed: 1.0,
            fps: 120.0,
            trail_strength: 0.5,
            max_cells: 200_000,
            color_var: "--glyph-color".into(),
            fallback_light: "rgba(0, 0, 0, 0.05)".into(),
            fallback_dark: "rgba(255, 255, 255, 0.05)".into(),
            respect_reduced_motion: true,
            max_canvas_dim: 8192,
            max_canvas_area: 8192 * 8192,
            blob_strength: 1.0,
            shimmer_strength: 0.06,
            seed: 0.0,
        }
    }
}

impl FieldConfig {
    /// Sets the glyph ramp, sparse to dense.
    pub fn glyphs(mut self, glyphs: &str) -> Self {
        self.glyphs = glyphs.into();
        self
    }

    /// Sets the per-tier cell and font sizes.
    pub fn sizes(mut self, sizes: SizeTable) -> Self {
        self.sizes = sizes;
        self
    }

    /// Sets the tier breakpoints.
    pub fn breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Sets the CSS font-family list.
    pub fn font_family(mut self, font_family: &str) -> Self {
        self.font_family = font_family.into();
        self
    }

    /// Sets the animation speed multiplier.
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the target frame rate; `0` disables pacing.
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Sets how much of the previous frame persists.
    pub fn trail_strength(mut self, trail_strength: f64) -> Self {
        self.trail_strength = trail_strength;
        self
    }

    /// Sets the per-frame cell budget.
    pub fn max_cells(mut self, max_cells: u32) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Sets the CSS custom property read for the glyph color.
    pub fn color_var(mut self, color_var: &str) -> Self {
        self.color_var = color_var.into();
        self
    }

    /// Sets the colors used when the CSS custom property is absent.
    pub fn fallback_colors(mut self, light: &str, dark: &str) -> Self {
        self.fallback_light = light.into();
        self.fallback_dark = dark.into();
        self
    }

    /// Sets whether a reduced-motion preference stops drawing.
    pub fn respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    /// Sets the backing-store limits in physical pixels.
    pub fn canvas_limits(mut self, max_dim: u32, max_area: u64) -> Self {
        self.max_canvas_dim = max_dim;
        self.max_canvas_area = max_area;
        self
    }

    /// Sets the weight of the blob component.
    pub fn blob_strength(mut self, strength: f64) -> Self {
        self.blob_strength = strength;
        self
    }

    /// Sets the weight of the shimmer.
    pub fn shimmer_strength(mut self, strength: f64) -> Self {
        self.shimmer_strength = strength;
        self
    }

    /// Sets the phase offset.
    pub fn seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the configuration for values the renderer cannot work with.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for an empty glyph ramp, non-finite or
    /// negative timing values, a trail strength outside `[0, 1]`, non-positive
    /// cell sizes or breakpoints out of order, and zero canvas limits.
    pub fn validate(&self) -> Result<(), Error> {
        if self.glyphs.is_empty() {
            return Err(Error::empty_glyph_ramp());
        }

        let non_negative = [
            ("speed", self.speed),
            ("fps", self.fps),
            ("blobStrength", self.blob_strength),
            ("shimmerStrength", self.shimmer_strength),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_value(field, value));
            }
        }

        if !self.seed.is_finite() {
            return Err(Error::invalid_value("seed", self.seed));
        }

        if !(0.0..=1.0).contains(&self.trail_strength) {
            return Err(Error::invalid_value("trailStrength", self.trail_strength));
        }

        let tiers = [self.sizes.base, self.sizes.mobile, self.sizes.tablet, self.sizes.desktop];
        for tier in tiers.into_iter().flatten() {
            if !(tier.cell_size.is_finite() && tier.cell_size > 0.0) {
                return Err(Error::invalid_value("cellSize", tier.cell_size));
            }
            if !(tier.font_size.is_finite() && tier.font_size > 0.0) {
                return Err(Error::invalid_value("fontSize", tier.font_size));
            }
        }

        if self.breakpoints.mobile > self.breakpoints.tablet {
            return Err(Error::Config(format!(
                "Mobile breakpoint {} exceeds tablet breakpoint {}",
                self.breakpoints.mobile, self.breakpoints.tablet
            )));
        }

        if self.max_cells == 0 {
            return Err(Error::zero_value("maxCells"));
        }
        if self.max_canvas_dim == 0 {
            return Err(Error::zero_value("maxCanvasDim"));
        }
        if self.max_canvas_area == 0 {
            return Err(Error::zero_value("maxCanvasArea"));
        }

        Ok(())
    }

    /// Minimum interval between drawn frames in milliseconds, if throttled.
    pub fn min_frame_interval_ms(&self) -> Option<f64> {
        (self.fps > 0.0).then(|| 1000.0 / self.fps)
    }

    /// CSS font shorthand for the given font size.
    pub fn font_for(&self, font_size: f64) -> String {
        format!("{font_size}px {}", self.font_family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(FieldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_tier_selection() {
        let bp = Breakpoints::default();

        assert_eq!(bp.tier_for(320.0), Tier::Mobile);
        assert_eq!(bp.tier_for(639.9), Tier::Mobile);
        assert_eq!(bp.tier_for(640.0), Tier::Tablet);
        assert_eq!(bp.tier_for(1023.0), Tier::Tablet);
        assert_eq!(bp.tier_for(1024.0), Tier::Desktop);
        assert_eq!(bp.tier_for(2560.0), Tier::Desktop);
    }

    #[test]
    fn test_size_fallback_chain() {
        let table = SizeTable {
            base: Some(SizeTier::new(12.0, 13.0)),
            mobile: None,
            tablet: Some(SizeTier::new(11.0, 15.0)),
            desktop: None,
        };
        assert_eq!(table.resolve(Tier::Mobile), SizeTier::new(12.0, 13.0));
        assert_eq!(table.resolve(Tier::Tablet), SizeTier::new(11.0, 15.0));

        let empty = SizeTable { base: None, mobile: None, tablet: None, desktop: None };
        assert_eq!(empty.resolve(Tier::Desktop), SizeTier::new(10.0, 14.0));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = FieldConfig::default();

        assert!(matches!(base.clone().glyphs("").validate(), Err(Error::Config(_))));
        assert!(base.clone().trail_strength(1.5).validate().is_err());
        assert!(base.clone().trail_strength(-0.1).validate().is_err());
        assert!(base.clone().fps(f64::NAN).validate().is_err());
        assert!(base.clone().speed(-1.0).validate().is_err());
        assert!(base.clone().max_cells(0).validate().is_err());
        assert!(base.clone().canvas_limits(0, 1).validate().is_err());
        assert!(
            base.clone()
                .breakpoints(Breakpoints { mobile: 1200.0, tablet: 800.0 })
                .validate()
                .is_err()
        );

        let mut sizes = SizeTable::default();
        sizes.desktop = Some(SizeTier::new(0.0, 20.0));
        assert!(base.sizes(sizes).validate().is_err());
    }

    #[test]
    fn test_frame_interval_and_font() {
        let config = FieldConfig::default().fps(50.0).font_family("monospace");
        assert_eq!(config.min_frame_interval_ms(), Some(20.0));
        assert_eq!(config.font_for(16.0), "16px monospace");

        assert_eq!(config.fps(0.0).min_frame_interval_ms(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_options() {
        let json = r#"{
            "glyphs": " .oO",
            "trailStrength": 0,
            "sizes": { "desktop": { "cellSize": 20, "fontSize": 24 } },
            "maxCanvasDim": 4096
        }"#;
        let config: FieldConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.glyphs, " .oO");
        assert_eq!(config.trail_strength, 0.0);
        assert_eq!(config.max_canvas_dim, 4096);
        assert_eq!(config.sizes.resolve(Tier::Desktop), SizeTier::new(20.0, 24.0));
        // untouched fields keep their defaults
        assert_eq!(config.fps, 120.0);
        assert_eq!(config.max_cells, 200_000);
    }
}
