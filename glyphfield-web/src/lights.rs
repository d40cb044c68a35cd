use std::{cell::RefCell, rc::Rc};

use glyphfield_core::{
    LightMove, LightsPlan, ResizeGate,
    lights::{blur_radius, check_speed, default_count, light_size, transition_css},
};
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{HtmlElement, Window};

use crate::{Error, js, listener::EventListener};

/// Inline styles of a light, except for its position and opacity.
pub fn light_styles(gradient_css: &str, size: f64, speed: f64) -> Vec<(&'static str, String)> {
    vec![
        ("position", "absolute".into()),
        ("width", format!("{size}px")),
        ("height", format!("{size}px")),
        ("border-radius", "50%".into()),
        ("filter", format!("blur({}px)", blur_radius(size))),
        ("pointer-events", "none".into()),
        ("mix-blend-mode", "screen".into()),
        ("background", gradient_css.into()),
        ("transition", transition_css(speed)),
    ]
}

fn apply_styles(element: &HtmlElement, styles: &[(&'static str, String)]) {
    let borrowed: Vec<(&str, &str)> = styles.iter().map(|(k, v)| (*k, v.as_str())).collect();
    js::set_styles(element, &borrowed);
}

struct LightsState {
    window: Window,
    layer: HtmlElement,
    elements: Vec<HtmlElement>,
    timeouts: Vec<Option<i32>>,
    plan: LightsPlan,
    speed: f64,
    gate: ResizeGate,
}

impl LightsState {
    fn container_size(&self) -> (f64, f64) {
        (f64::from(self.layer.offset_width()), f64::from(self.layer.offset_height()))
    }

    /// Moves light `i` and schedules its next move.
    fn advance(&mut self, i: usize, tick: &js_sys::Function) {
        let Some(element) = self.elements.get(i) else {
            return;
        };

        let (vw, vh) = js::viewport_size();
        let size = light_size(vw, vh);
        let step = LightMove::plan(self.container_size(), size, self.speed, &mut js::math_random);

        let transform = step.position.transform_css();
        let opacity = step.opacity.to_string();
        js::set_styles(element, &[("transform", transform.as_str()), ("opacity", opacity.as_str())]);
        self.schedule(i, tick, step.duration_ms);
    }

    fn schedule(&mut self, i: usize, tick: &js_sys::Function, delay_ms: f64) {
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(tick, delay_ms.round() as i32)
            .ok();
        if handle.is_none() {
            js::report(&format!("light {i} stopped moving"), &Error::timer_failed());
        }
        if let Some(slot) = self.timeouts.get_mut(i) {
            *slot = handle;
        }
    }

    fn on_resize(&mut self) {
        let (vw, vh) = js::viewport_size();
        if !self.gate.accept(vw, vh) {
            return;
        }

        let container = self.container_size();
        self.plan.replan_positions((vw, vh), container, &mut js::math_random);

        for (element, light) in self.elements.iter().zip(&self.plan.lights) {
            let mut styles = light_styles(&light.gradient.to_css(), self.plan.size, self.speed);
            styles.push(("transform", light.position.transform_css()));
            apply_styles(element, &styles);
        }
        tracing::debug!(width = vw, height = vh, size = self.plan.size, "lights re-planned");
    }

    fn clear_timeouts(&mut self) {
        for handle in self.timeouts.iter_mut().filter_map(Option::take) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Blurred gradient lights drifting behind page content.
///
/// The lights live in an absolutely positioned layer appended to the
/// container; each light moves to a new random position and opacity on its
/// own timer. Dropping the value clears the timers and removes the layer.
pub struct GradientLights {
    state: Rc<RefCell<LightsState>>,
    _ticks: Vec<Closure<dyn FnMut()>>,
    _resize: EventListener,
}

impl GradientLights {
    /// Mounts lights into the element matching `container_selector`.
    ///
    /// `count` defaults to a random value in `[4, 8)`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a non-positive speed or more lights than
    /// there are distinct gradients, and [`Error::Initialization`] if the
    /// container cannot be found.
    pub fn mount(container_selector: &str, count: Option<usize>, speed: f64) -> Result<Self, Error> {
        let container = js::get_element_by_selector(container_selector)?;
        Self::mount_in(&container, count, speed)
    }

    /// Mounts lights into `container`.
    ///
    /// Nothing is left in the container if mounting fails.
    ///
    /// # Errors
    /// See [`mount`](Self::mount).
    pub fn mount_in(container: &HtmlElement, count: Option<usize>, speed: f64) -> Result<Self, Error> {
        let speed = check_speed(speed)?;
        let window = js::window()?;
        let document = js::document()?;

        let layer = js::create_div(&document)?;
        js::set_styles(
            &layer,
            &[("position", "absolute"), ("inset", "0"), ("overflow", "hidden"), ("z-index", "-1")],
        );
        container
            .append_child(&layer)
            .map_err(|_| Error::element_creation_failed("div"))?;

        Self::populate(window, &document, layer.clone(), count, speed)
            .inspect_err(|_| layer.remove())
    }

    /// Fills an attached `layer` with lights and starts their timers.
    fn populate(
        window: Window,
        document: &web_sys::Document,
        layer: HtmlElement,
        count: Option<usize>,
        speed: f64,
    ) -> Result<Self, Error> {
        let viewport = js::viewport_size();
        let container_size = (f64::from(layer.offset_width()), f64::from(layer.offset_height()));
        let count = count.unwrap_or_else(|| default_count(&mut js::math_random));
        let plan = LightsPlan::new(count, viewport, container_size, &mut js::math_random)?;

        let mut elements = Vec::with_capacity(plan.lights.len());
        for light in &plan.lights {
            let element = js::create_div(document)?;
            let _ = element.set_attribute("class", "gradient-light");

            let mut styles = light_styles(&light.gradient.to_css(), plan.size, speed);
            styles.push(("opacity", "0".into()));
            styles.push(("transform", light.position.transform_css()));
            apply_styles(&element, &styles);

            layer
                .append_child(&element)
                .map_err(|_| Error::element_creation_failed("div"))?;
            elements.push(element);
        }

        let state = Rc::new(RefCell::new(LightsState {
            window: window.clone(),
            layer,
            timeouts: vec![None; elements.len()],
            elements,
            plan,
            speed,
            gate: ResizeGate::new(viewport.0, viewport.1),
        }));

        let ticks: Vec<Closure<dyn FnMut()>> = (0..count)
            .map(|i| {
                let weak = Rc::downgrade(&state);
                let tick_slot: Rc<RefCell<Option<js_sys::Function>>> = Rc::default();
                let self_ref = tick_slot.clone();
                let closure = Closure::wrap(Box::new(move || {
                    let (Some(state), Some(tick)) = (weak.upgrade(), self_ref.borrow().clone()) else {
                        return;
                    };
                    state.borrow_mut().advance(i, &tick);
                }) as Box<dyn FnMut()>);

                *tick_slot.borrow_mut() = Some(closure.as_ref().unchecked_ref::<js_sys::Function>().clone());
                closure
            })
            .collect();

        // registered before any timer is pending, so a failure leaves none behind
        let resize_state = Rc::downgrade(&state);
        let resize = EventListener::new(&window, "resize", move |_| {
            if let Some(state) = resize_state.upgrade() {
                state.borrow_mut().on_resize();
            }
        })?;

        // the first move starts once the initial styles have been applied
        {
            let mut s = state.borrow_mut();
            for (i, tick) in ticks.iter().enumerate() {
                s.schedule(i, tick.as_ref().unchecked_ref(), 0.0);
            }
        }

        tracing::debug!(count, speed, "gradient lights mounted");
        Ok(Self { state, _ticks: ticks, _resize: resize })
    }

    /// Number of lights.
    pub fn len(&self) -> usize {
        self.state.borrow().elements.len()
    }

    /// True if no lights were mounted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current layout of the lights.
    pub fn plan(&self) -> LightsPlan {
        self.state.borrow().plan.clone()
    }
}

impl Drop for GradientLights {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.clear_timeouts();
        state.layer.remove();
    }
}

impl std::fmt::Debug for GradientLights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("GradientLights")
            .field("plan", &state.plan)
            .field("speed", &state.speed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_styles() {
        let styles = light_styles("radial-gradient(circle at center, #fff, #000)", 240.0, 2.0);
        let get = |name: &str| styles.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str());

        assert_eq!(get("width"), Some("240px"));
        assert_eq!(get("filter"), Some("blur(108px)"));
        assert_eq!(get("transition"), Some("transform 4.5s linear, opacity 2s ease"));
        assert_eq!(get("mix-blend-mode"), Some("screen"));
        assert_eq!(get("opacity"), None);
    }
}
