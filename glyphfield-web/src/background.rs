use std::{cell::RefCell, rc::Rc};

use compact_str::CompactString;
use glyphfield_core::{FieldConfig, FieldRenderer, FrameOutcome, Host};
use web_sys::HtmlCanvasElement;

use crate::{
    Error,
    canvas_surface::CanvasSurface,
    dom_host::DomHost,
    frame_loop::FrameLoop,
    js,
    listener::EventListener,
};

/// Animated glyph plasma background drawn into a canvas.
///
/// The canvas is sized from its parent element and redrawn every animation
/// frame, throttled to the configured frame rate. The background follows
/// window resizes, color-scheme and reduced-motion preference changes, and
/// pauses while the document is hidden.
///
/// Everything the background registers with the browser (the pending frame
/// request and every event listener) is released when it is dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use glyphfield_core::FieldConfig;
/// use glyphfield_web::PlasmaBackground;
///
/// let background = PlasmaBackground::builder("#hero-canvas")
///     .config(FieldConfig::default().speed(0.6).trail_strength(0.3))
///     .build()
///     .unwrap();
///
/// // later, e.g. when the hero section unmounts
/// drop(background);
/// ```
#[derive(Debug)]
pub struct PlasmaBackground {
    shared: Rc<RefCell<Shared>>,
    frame_loop: Rc<FrameLoop>,
    listeners: Vec<EventListener>,
}

/// State shared between the frame loop and the event listeners.
#[derive(Debug)]
struct Shared {
    renderer: FieldRenderer,
    host: DomHost,
    surface: CanvasSurface,
    last_outcome: Option<FrameOutcome>,
}

impl Shared {
    fn frame(&mut self, now_ms: f64) {
        let Self { renderer, host, surface, last_outcome } = self;
        *last_outcome = Some(renderer.frame(now_ms, &*host, surface));
    }

    fn on_resize(&mut self) {
        let Self { renderer, host, surface, .. } = self;
        renderer.on_resize(&*host, surface);
    }

    fn on_color_scheme_change(&mut self) {
        let Self { renderer, host, surface, .. } = self;
        renderer.on_color_scheme_change(&*host, surface);
    }

    fn on_reduced_motion_change(&mut self) {
        let reduce = self.host.prefers_reduced_motion();
        self.renderer
            .on_reduced_motion_change(reduce, &mut self.surface);
    }
}

impl PlasmaBackground {
    /// Creates a new background builder for the specified canvas.
    ///
    /// # Parameters
    /// * `canvas` - CSS selector or `HtmlCanvasElement`
    #[allow(private_bounds)]
    pub fn builder(canvas: impl Into<CanvasSource>) -> PlasmaBackgroundBuilder {
        PlasmaBackgroundBuilder::new(canvas.into())
    }

    /// Stops drawing until [`resume`](Self::resume) is called. Showing a
    /// hidden document does not restart a paused background.
    pub fn pause(&self) {
        self.frame_loop.pause();
    }

    /// Restarts the frame loop with a fresh frame time reference. While the
    /// document is hidden the restart waits until it becomes visible.
    ///
    /// # Errors
    /// Returns [`Error::Callback`] if the animation frame cannot be requested.
    pub fn resume(&self) -> Result<(), Error> {
        if self.frame_loop.resume()? {
            self.shared.borrow_mut().renderer.on_resume();
        }
        Ok(())
    }

    /// Returns true while frames are being requested.
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Outcome of the most recent frame callback.
    pub fn last_outcome(&self) -> Option<FrameOutcome> {
        self.shared.borrow().last_outcome
    }

    /// Returns the canvas backing-store size in physical pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        self.shared.borrow().surface.backing_size()
    }

    /// Returns the canvas being drawn into.
    pub fn canvas(&self) -> HtmlCanvasElement {
        self.shared.borrow().surface.canvas().clone()
    }

    /// Returns the renderer configuration.
    pub fn config(&self) -> FieldConfig {
        self.shared.borrow().renderer.config().clone()
    }

    /// Human-readable summary of the renderer state.
    pub fn debug_summary(&self) -> String {
        let shared = self.shared.borrow();
        let renderer = &shared.renderer;
        format!(
            "tier={:?} cell={} font={} viewport={:?} backing={:?} color={} reduced_motion={} last={:?}",
            renderer.tier(),
            renderer.sizes().cell_size,
            renderer.sizes().font_size,
            renderer.viewport(),
            shared.surface.backing_size(),
            renderer.color(),
            renderer.is_reduced_motion(),
            shared.last_outcome,
        )
    }

    fn teardown(&mut self) {
        self.listeners.clear();
        self.frame_loop.pause();
    }
}

impl Drop for PlasmaBackground {
    fn drop(&mut self) {
        self.teardown();
        tracing::debug!("plasma background torn down");
    }
}

/// Canvas source for background initialization.
///
/// Supports both CSS selector strings and direct `HtmlCanvasElement` references
/// for flexible background creation.
#[derive(Debug)]
enum CanvasSource {
    /// CSS selector string for canvas lookup (e.g., "#background", "canvas").
    Selector(CompactString),
    /// Direct reference to an existing canvas element.
    Element(HtmlCanvasElement),
}

/// Builder for configuring and creating a [`PlasmaBackground`].
#[derive(Debug)]
#[must_use = "call `build()` to finalize the PlasmaBackground"]
pub struct PlasmaBackgroundBuilder {
    canvas: CanvasSource,
    config: FieldConfig,
    style_canvas: bool,
}

impl PlasmaBackgroundBuilder {
    fn new(canvas: CanvasSource) -> Self {
        Self {
            canvas,
            config: FieldConfig::default(),
            style_canvas: true,
        }
    }

    /// Sets the renderer configuration.
    pub fn config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Controls whether the canvas gets the inline styles of a passive
    /// background layer (fills its parent, ignores pointer events, hidden
    /// from assistive technology). Enabled by default; disable when page CSS
    /// already styles the canvas.
    pub fn style_canvas(mut self, enabled: bool) -> Self {
        self.style_canvas = enabled;
        self
    }

    /// Builds the background and starts its frame loop.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a rejected configuration,
    /// [`Error::Initialization`] if the window, canvas or its 2D context are
    /// unavailable, and [`Error::Callback`] if a listener or the first frame
    /// cannot be registered.
    pub fn build(self) -> Result<PlasmaBackground, Error> {
        let mut renderer = FieldRenderer::new(self.config)?;

        let window = js::window()?;
        let document = js::document()?;
        let canvas = match self.canvas {
            CanvasSource::Selector(selector) => js::get_canvas_by_selector(&selector)?,
            CanvasSource::Element(element) => element,
        };
        let ctx = js::get_canvas_2d_context(&canvas)?;

        if self.style_canvas {
            js::set_styles(
                &canvas,
                &[
                    ("pointer-events", "none"),
                    ("width", "100%"),
                    ("height", "100%"),
                    ("display", "block"),
                ],
            );
            let _ = canvas.set_attribute("aria-hidden", "true");
        }

        let host = DomHost::new(&window, &canvas);
        let mut surface = CanvasSurface::new(canvas, ctx);
        renderer.mount(&host, &mut surface);

        let shared = Rc::new(RefCell::new(Shared {
            renderer,
            host: host.clone(),
            surface,
            last_outcome: None,
        }));

        let frame_shared = shared.clone();
        let frame_loop = Rc::new(FrameLoop::new(&window, move |now| {
            frame_shared.borrow_mut().frame(now);
        }));

        let mut listeners = Vec::with_capacity(4);

        let resize_shared = shared.clone();
        listeners.push(EventListener::new(&window, "resize", move |_| {
            resize_shared.borrow_mut().on_resize();
        })?);

        let visibility_shared = shared.clone();
        let visibility_loop = Rc::downgrade(&frame_loop);
        let visibility_document = document.clone();
        listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
            let Some(frame_loop) = visibility_loop.upgrade() else {
                return;
            };

            match frame_loop.set_hidden(visibility_document.hidden()) {
                Ok(true) => visibility_shared.borrow_mut().renderer.on_resume(),
                Ok(false) => {},
                Err(e) => js::report("failed to resume frame loop", &e),
            }
        })?);

        if let Some(mq) = host.dark_scheme_query() {
            let scheme_shared = shared.clone();
            listeners.push(EventListener::new(mq, "change", move |_| {
                scheme_shared.borrow_mut().on_color_scheme_change();
            })?);
        }

        if let Some(mq) = host.reduced_motion_query() {
            let motion_shared = shared.clone();
            listeners.push(EventListener::new(mq, "change", move |_| {
                motion_shared.borrow_mut().on_reduced_motion_change();
            })?);
        }

        // starts the loop now, or once a hidden document becomes visible
        frame_loop.set_hidden(document.hidden())?;
        tracing::debug!(listeners = listeners.len(), "plasma background mounted");

        Ok(PlasmaBackground { shared, frame_loop, listeners })
    }
}

impl<'a> From<&'a str> for CanvasSource {
    fn from(selector: &'a str) -> Self {
        CanvasSource::Selector(selector.into())
    }
}

impl From<HtmlCanvasElement> for CanvasSource {
    fn from(element: HtmlCanvasElement) -> Self {
        CanvasSource::Element(element)
    }
}

impl<'a> From<&'a HtmlCanvasElement> for CanvasSource {
    fn from(value: &'a HtmlCanvasElement) -> Self {
        value.clone().into()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::wasm_bindgen_test;
    use web_sys::Event;

    use super::*;

    fn mounted_canvas() -> (web_sys::HtmlElement, HtmlCanvasElement) {
        let document = js::document().unwrap();
        let container = js::create_div(&document).unwrap();
        js::set_styles(&container, &[("width", "200px"), ("height", "100px")]);

        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        container.append_child(&canvas).unwrap();
        document.body().unwrap().append_child(&container).unwrap();
        (container, canvas)
    }

    fn dispatch_visibility_change() {
        let document = js::document().unwrap();
        document
            .dispatch_event(&Event::new("visibilitychange").unwrap())
            .unwrap();
    }

    #[wasm_bindgen_test]
    fn test_visibility_change_keeps_pause() {
        let (container, canvas) = mounted_canvas();
        let background = PlasmaBackground::builder(&canvas).build().unwrap();
        assert!(background.is_running());

        background.pause();
        dispatch_visibility_change();
        assert!(!background.is_running());

        background.resume().unwrap();
        assert!(background.is_running());

        drop(background);
        container.remove();
    }

    #[wasm_bindgen_test]
    fn test_visibility_change_after_drop_is_inert() {
        let (container, canvas) = mounted_canvas();
        let background = PlasmaBackground::builder(&canvas).build().unwrap();
        drop(background);

        // the listener is gone; nothing restarts or panics
        dispatch_visibility_change();
        container.remove();
    }
}
