//! Browser binding for glyphfield.
//!
//! [`PlasmaBackground`] draws the glyph plasma field into a canvas with the
//! Canvas 2D API and keeps it in sync with the page: container size, device
//! pixel ratio, color scheme, reduced motion and document visibility.
//! [`CarouselDriver`] and [`GradientLights`] drive the smaller animated
//! pieces shown alongside it.
//!
//! With the `js-api` feature the crate exports `#[wasm_bindgen]` wrappers for
//! use from JavaScript.

mod background;
mod canvas_surface;
mod carousel;
mod dom_host;
mod error;
mod frame_loop;
mod lifecycle;
mod lights;
mod listener;

pub(crate) mod js;

#[cfg(feature = "js-api")]
pub mod wasm;

pub use background::{PlasmaBackground, PlasmaBackgroundBuilder};
pub use carousel::{CarouselDriver, auto_advance_delay};
pub use glyphfield_core::{
    Carousel, ColorScheme, FieldConfig, FrameOutcome, Phase, SkipReason, SwipeDirection,
};
pub use js::{is_touch_device, math_random};
pub use lights::{GradientLights, light_styles};

pub use crate::error::Error;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
