//! `#[wasm_bindgen]` exports for use from JavaScript.

use glyphfield_core::{
    FieldConfig, LightsPlan, RevealAnimation, RevealSet, lights::default_count,
};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::{CarouselDriver, GradientLights, PlasmaBackground, js};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JavaScript wrapper for the glyph plasma background.
///
/// Thin `#[wasm_bindgen]` wrapper that delegates to [`PlasmaBackground`].
/// Calling `free()` from JavaScript tears the background down.
#[wasm_bindgen]
#[derive(Debug)]
pub struct GlyphPlasma {
    background: PlasmaBackground,
}

#[wasm_bindgen]
impl GlyphPlasma {
    /// Mounts a background on the canvas matching `canvas_selector`.
    ///
    /// `options` is an optional object using the component's camelCase
    /// option names, e.g. `{ glyphs: " .:-=+*#%@", speed: 0.6, fps: 60 }`.
    /// Omitted fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_selector: &str, options: JsValue) -> Result<GlyphPlasma, JsValue> {
        console_error_panic_hook::set_once();

        let config: FieldConfig = if options.is_undefined() || options.is_null() {
            FieldConfig::default()
        } else {
            from_value(options).map_err(|e| js_error(format!("Invalid options: {e}")))?
        };

        let background = PlasmaBackground::builder(canvas_selector)
            .config(config)
            .build()
            .map_err(js_error)?;

        Ok(GlyphPlasma { background })
    }

    /// Stops drawing until `resume()` is called.
    pub fn pause(&self) {
        self.background.pause();
    }

    /// Restarts drawing.
    pub fn resume(&self) -> Result<(), JsValue> {
        self.background.resume().map_err(js_error)
    }

    /// Whether the frame loop is scheduled.
    #[wasm_bindgen(js_name = "isRunning")]
    pub fn is_running(&self) -> bool {
        self.background.is_running()
    }

    /// Effective configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_value(&self.background.config()).map_err(js_error)
    }

    /// Logs the renderer state to the browser console.
    #[wasm_bindgen(js_name = "logDebugInfo")]
    pub fn log_debug_info(&self) {
        console::log_1(&self.background.debug_summary().into());
    }
}

/// JavaScript wrapper for a project card carousel.
#[wasm_bindgen]
#[derive(Debug)]
pub struct ProjectCarousel {
    driver: CarouselDriver,
}

#[wasm_bindgen]
impl ProjectCarousel {
    /// Creates a carousel over `len` images.
    ///
    /// `on_change(index, cssClass)` is called whenever the displayed image,
    /// its fade phase or the hover state changes; it may call back into the
    /// carousel. `touch_device` defaults to a media-query check for a coarse,
    /// hover-less pointer.
    #[wasm_bindgen(constructor)]
    pub fn new(
        len: usize,
        on_change: js_sys::Function,
        touch_device: Option<bool>,
    ) -> Result<ProjectCarousel, JsValue> {
        console_error_panic_hook::set_once();

        let touch_device = touch_device.unwrap_or_else(js::is_touch_device);
        let driver = CarouselDriver::new(len, touch_device, move |carousel| {
            let _ = on_change.call2(
                &JsValue::NULL,
                &JsValue::from(carousel.index() as u32),
                &JsValue::from_str(carousel.phase().css_class()),
            );
        })
        .map_err(js_error)?;

        Ok(ProjectCarousel { driver })
    }

    /// Index of the displayed image.
    pub fn index(&self) -> usize {
        self.driver.index()
    }

    /// CSS class for the displayed image: `shown`, `fade-out` or `fade-in`.
    #[wasm_bindgen(js_name = "phaseClass")]
    pub fn phase_class(&self) -> String {
        self.driver.carousel().phase().css_class().to_string()
    }

    /// Requests the next image; false if rejected.
    pub fn next(&self) -> bool {
        self.driver.next()
    }

    /// Requests the previous image; false if rejected.
    pub fn previous(&self) -> bool {
        self.driver.previous()
    }

    /// Requests the image of a pagination dot; false if rejected.
    #[wasm_bindgen(js_name = "dotClick")]
    pub fn dot_click(&self, dot: usize) -> bool {
        self.driver.dot_click(dot)
    }

    /// Forwards the image's `animationend` event.
    #[wasm_bindgen(js_name = "animationEnd")]
    pub fn animation_end(&self) {
        self.driver.animation_end();
    }

    /// Pointer entered or left the card.
    #[wasm_bindgen(js_name = "setHovered")]
    pub fn set_hovered(&self, hovered: bool) {
        self.driver.set_hovered(hovered);
    }

    /// Records where a touch began.
    #[wasm_bindgen(js_name = "touchStart")]
    pub fn touch_start(&self, x: f64) {
        self.driver.touch_start(x);
    }

    /// Records the latest touch position.
    #[wasm_bindgen(js_name = "touchMove")]
    pub fn touch_move(&self, x: f64) {
        self.driver.touch_move(x);
    }

    /// Completes a swipe; returns `"next"`, `"previous"` or `undefined`.
    #[wasm_bindgen(js_name = "touchEnd")]
    pub fn touch_end(&self) -> Option<String> {
        self.driver.touch_end().map(|direction| match direction {
            glyphfield_core::SwipeDirection::Next => "next".to_string(),
            glyphfield_core::SwipeDirection::Previous => "previous".to_string(),
        })
    }
}

/// JavaScript wrapper for the drifting gradient lights.
#[wasm_bindgen]
#[derive(Debug)]
pub struct Lights {
    lights: GradientLights,
}

#[wasm_bindgen]
impl Lights {
    /// Mounts lights into the element matching `container_selector`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_selector: &str,
        count: Option<usize>,
        speed: Option<f64>,
    ) -> Result<Lights, JsValue> {
        console_error_panic_hook::set_once();

        let lights = GradientLights::mount(container_selector, count, speed.unwrap_or(1.0))
            .map_err(js_error)?;
        Ok(Lights { lights })
    }

    /// Number of lights.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Current light layout as a plain object.
    pub fn plan(&self) -> Result<JsValue, JsValue> {
        to_value(&self.lights.plan()).map_err(js_error)
    }
}

/// Plans a light layout without touching the DOM.
#[wasm_bindgen(js_name = "planLights")]
pub fn plan_lights(
    count: Option<usize>,
    viewport_width: f64,
    viewport_height: f64,
    container_width: f64,
    container_height: f64,
) -> Result<JsValue, JsValue> {
    let mut rng = js::math_random;
    let count = count.unwrap_or_else(|| default_count(&mut rng));
    let plan = LightsPlan::new(
        count,
        (viewport_width, viewport_height),
        (container_width, container_height),
        &mut rng,
    )
    .map_err(js_error)?;

    to_value(&plan).map_err(js_error)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct JsRevealAnimation {
    duration_ms: f64,
    easing: String,
}

/// One-shot reveal tracking for scroll-triggered skill bars.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct SkillReveal {
    revealed: RevealSet,
}

#[wasm_bindgen]
impl SkillReveal {
    /// Creates a tracker; `threshold` defaults to a quarter of the item.
    #[wasm_bindgen(constructor)]
    pub fn new(threshold: Option<f64>) -> SkillReveal {
        let revealed = threshold.map(RevealSet::new).unwrap_or_default();
        SkillReveal { revealed }
    }

    /// Reports an intersection ratio; returns true the first time `key`
    /// becomes visible enough to reveal.
    pub fn observe(&mut self, key: &str, intersection_ratio: f64) -> bool {
        self.revealed.observe(key, intersection_ratio)
    }

    /// Whether `key` has been revealed.
    #[wasm_bindgen(js_name = "isRevealed")]
    pub fn is_revealed(&self, key: &str) -> bool {
        self.revealed.is_revealed(key)
    }

    /// Random bar animation: `{ durationMs, easing }` with a CSS
    /// `cubic-bezier(...)` easing.
    #[wasm_bindgen(js_name = "randomAnimation")]
    pub fn random_animation() -> Result<JsValue, JsValue> {
        let anim = RevealAnimation::random(&mut js::math_random);
        to_value(&JsRevealAnimation {
            duration_ms: anim.duration_ms,
            easing: anim.easing.to_css(),
        })
        .map_err(js_error)
    }

    /// Displayed value of a count-up started at `start_ms`.
    #[wasm_bindgen(js_name = "countValue")]
    pub fn count_value(target: u32, duration_ms: f64, start_ms: f64, now_ms: f64) -> u32 {
        glyphfield_core::CountUp::new(target, duration_ms, start_ms).value(now_ms)
    }
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"glyphfield WASM module loaded".into());
}
