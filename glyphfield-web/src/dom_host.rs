use glyphfield_core::{ColorScheme, Error as CoreError, Host};
use web_sys::{HtmlCanvasElement, MediaQueryList, Window};

use crate::js;

/// [`Host`] reading layout and preferences from the DOM around a canvas.
#[derive(Debug, Clone)]
pub(crate) struct DomHost {
    window: Window,
    canvas: HtmlCanvasElement,
    dark_scheme: Option<MediaQueryList>,
    reduced_motion: Option<MediaQueryList>,
}

impl DomHost {
    pub(crate) fn new(window: &Window, canvas: &HtmlCanvasElement) -> Self {
        Self {
            window: window.clone(),
            canvas: canvas.clone(),
            dark_scheme: js::media_query(window, js::DARK_SCHEME_QUERY),
            reduced_motion: js::media_query(window, js::REDUCED_MOTION_QUERY),
        }
    }

    pub(crate) fn dark_scheme_query(&self) -> Option<&MediaQueryList> {
        self.dark_scheme.as_ref()
    }

    pub(crate) fn reduced_motion_query(&self) -> Option<&MediaQueryList> {
        self.reduced_motion.as_ref()
    }
}

impl Host for DomHost {
    fn container_size(&self) -> Result<(f64, f64), CoreError> {
        let parent = self
            .canvas
            .parent_element()
            .ok_or_else(|| CoreError::detached("canvas"))?;

        let rect = parent.get_bounding_client_rect();
        Ok((rect.width(), rect.height()))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn viewport_width(&self) -> f64 {
        js::viewport_size().0
    }

    fn css_property(&self, name: &str) -> Option<String> {
        let element = js::layout_container(&self.canvas)?;
        let value = self
            .window
            .get_computed_style(&element)
            .ok()
            .flatten()?
            .get_property_value(name)
            .ok()?;

        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn color_scheme(&self) -> ColorScheme {
        match &self.dark_scheme {
            Some(mq) if mq.matches() => ColorScheme::Dark,
            _ => ColorScheme::Light,
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.as_ref().is_some_and(MediaQueryList::matches)
    }
}
