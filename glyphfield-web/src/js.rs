use js_sys::wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, MediaQueryList,
    Window,
};

use crate::error::Error;

pub(crate) const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
pub(crate) const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const TOUCH_QUERY: &str = "(hover: none) and (pointer: coarse)";

pub(crate) fn window() -> Result<Window, Error> {
    web_sys::window().ok_or(Error::window_not_found())
}

pub(crate) fn document() -> Result<Document, Error> {
    window().and_then(|w| w.document().ok_or(Error::document_not_found()))
}

pub(crate) fn get_canvas_by_selector(selector: &str) -> Result<HtmlCanvasElement, Error> {
    let document = document()?;
    document
        .query_selector(selector)
        .map_err(|_| Error::canvas_not_found())?
        .ok_or(Error::canvas_not_found())?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::canvas_not_found())
}

pub(crate) fn get_element_by_selector(selector: &str) -> Result<HtmlElement, Error> {
    document()?
        .query_selector(selector)
        .map_err(|_| Error::element_not_found(selector))?
        .ok_or(Error::element_not_found(selector))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| Error::element_not_found(selector))
}

pub(crate) fn get_canvas_2d_context(
    canvas: &HtmlCanvasElement,
) -> Result<CanvasRenderingContext2d, Error> {
    canvas
        .get_context("2d")
        .map_err(|_| Error::canvas_context_failed())?
        .ok_or(Error::canvas_context_failed())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| Error::canvas_context_failed())
}

pub(crate) fn create_div(document: &Document) -> Result<HtmlElement, Error> {
    document
        .create_element("div")
        .map_err(|_| Error::element_creation_failed("div"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| Error::element_creation_failed("div"))
}

/// Applies inline style properties, ignoring properties the browser rejects.
pub(crate) fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in styles {
        let _ = style.set_property(name, value);
    }
}

/// Element whose box sizes the canvas: its parent, or the root element.
pub(crate) fn layout_container(canvas: &HtmlCanvasElement) -> Option<Element> {
    canvas
        .parent_element()
        .or_else(|| canvas.owner_document().and_then(|d| d.document_element()))
}

pub(crate) fn media_query(window: &Window, query: &str) -> Option<MediaQueryList> {
    window.match_media(query).ok().flatten()
}

/// Layout viewport size in CSS pixels.
pub(crate) fn viewport_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };

    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// True on devices whose primary pointer is a finger.
pub fn is_touch_device() -> bool {
    web_sys::window()
        .and_then(|w| media_query(&w, TOUCH_QUERY))
        .is_some_and(|mq| mq.matches())
}

/// `Math.random`, usable as a [`glyphfield_core::RandomSource`].
pub fn math_random() -> f64 {
    js_sys::Math::random()
}

/// Reports a runtime failure that has no caller to return to.
///
/// The event goes to `tracing` and to the browser console, since a wasm
/// page usually has no subscriber installed.
pub(crate) fn report(context: &str, error: &Error) {
    tracing::warn!(error = %error, "{context}");
    web_sys::console::error_1(&format!("glyphfield: {context}: {error}").into());
}

/// Resolves after `ms` milliseconds.
#[cfg(all(test, target_arch = "wasm32"))]
pub(crate) async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Ok(window) = window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
