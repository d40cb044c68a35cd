//! Platform-agnostic core of the glyph plasma background.
//!
//! A smoothly animated scalar field is sampled on a grid of cells and each
//! sample picks a glyph from a density ramp. This crate owns everything that
//! does not touch a browser: canvas sizing under pixel limits, grid density,
//! the field itself, frame pacing, color and reduced-motion state, and the
//! small UI state machines used next to the background (project carousels,
//! reveal counters and drifting gradient lights).
//!
//! Rendering goes through two traits: [`Host`] describes the environment and
//! [`GlyphSurface`] receives drawing operations. [`TextSurface`] is a
//! character-grid surface used by the terminal preview and in tests.

mod carousel;
mod clock;
mod color;
mod config;
pub mod error;
mod field;
mod grid;
mod host;
pub mod lights;
mod ramp;
mod random;
mod renderer;
pub mod reveal;
mod text_surface;
mod viewport;

pub use carousel::{Carousel, Phase, SWIPE_THRESHOLD_PX, SwipeDirection};
pub use clock::{AnimationClock, FramePacer};
pub use color::{ColorScheme, ColorState};
pub use config::{Breakpoints, FieldConfig, SizeTable, SizeTier, Tier};
pub use error::Error;
pub use field::{FieldFrame, FieldParams, hash2, normalize};
pub use grid::GridLayout;
pub use host::{GlyphSurface, Host};
pub use lights::{LightMove, LightsPlan, ResizeGate};
pub use ramp::GlyphRamp;
pub use random::{RandomSource, SequenceSource};
pub use renderer::{FieldRenderer, FrameOutcome, SizeCheck, SkipReason, glyph_index};
pub use reveal::{CountUp, CubicBezier, RevealAnimation, RevealSet};
pub use text_surface::TextSurface;
pub use viewport::{Viewport, ViewportLimits, ViewportState};
