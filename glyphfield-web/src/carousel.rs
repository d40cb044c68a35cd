use std::{cell::RefCell, rc::Rc, time::Duration};

use glyphfield_core::{Carousel, Phase, SwipeDirection};
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::Window;

use crate::{Error, js};

/// Lower bound of the random per-card auto-advance delay.
const MIN_AUTO_ADVANCE_MS: f64 = 3000.0;
/// Width of the random per-card auto-advance delay range.
const AUTO_ADVANCE_SPREAD_MS: f64 = 3000.0;

/// Auto-advance delay for a uniform sample `r` in `[0, 1)`.
pub fn auto_advance_delay(r: f64) -> Duration {
    let ms = MIN_AUTO_ADVANCE_MS + r.clamp(0.0, 1.0) * AUTO_ADVANCE_SPREAD_MS;
    Duration::from_secs_f64(ms / 1000.0)
}

type ChangeCallback = Box<dyn FnMut(&Carousel)>;

/// The parts of the carousel a listener renders.
fn view(carousel: &Carousel) -> (usize, Phase, bool) {
    (carousel.index(), carousel.phase(), carousel.is_hovered())
}

/// Pending `setTimeout` for the next auto-advance.
struct AutoAdvanceTimer {
    window: Window,
    tick: js_sys::Function,
    handle: Option<i32>,
}

impl AutoAdvanceTimer {
    fn clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn schedule(&mut self, delay: Duration) {
        self.clear();

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&self.tick, millis)
        {
            Ok(handle) => self.handle = Some(handle),
            Err(_) => js::report("carousel auto-advance disabled", &Error::timer_failed()),
        }
    }
}

struct DriverState {
    carousel: Carousel,
    timer: Option<AutoAdvanceTimer>,
    /// Taken out while it runs, so the listener may call back into the driver.
    on_change: Option<ChangeCallback>,
}

impl DriverState {
    fn new(carousel: Carousel, on_change: impl 'static + FnMut(&Carousel)) -> Self {
        Self { carousel, timer: None, on_change: Some(Box::new(on_change)) }
    }

    /// The auto-advance timer restarts after every operation.
    fn reschedule(&mut self) {
        let delay = self.carousel.auto_advance_delay();
        if let Some(timer) = &mut self.timer {
            match delay {
                Some(delay) => timer.schedule(delay),
                None => timer.clear(),
            }
        }
    }
}

/// Runs `op` on the carousel and notifies the listener if the visible state
/// changed. No borrow of `state` is held while the listener runs.
fn dispatch<R>(state: &RefCell<DriverState>, op: impl FnOnce(&mut Carousel) -> R) -> R {
    let (result, changed) = {
        let mut s = state.borrow_mut();
        let before = view(&s.carousel);
        let result = op(&mut s.carousel);
        s.reschedule();
        (result, view(&s.carousel) != before)
    };

    if changed {
        notify(state);
    }
    result
}

/// Calls the listener until it has seen the current state. A listener that
/// changes the carousel itself is called again with the result; the nested
/// change does not notify on its own because the listener is taken out.
fn notify(state: &RefCell<DriverState>) {
    let Some(mut on_change) = state.borrow_mut().on_change.take() else {
        return;
    };

    let mut seen = None;
    loop {
        let current = state.borrow().carousel.clone();
        if seen == Some(view(&current)) {
            break;
        }
        on_change(&current);
        seen = Some(view(&current));
    }

    state.borrow_mut().on_change = Some(on_change);
}

/// Drives a [`Carousel`] from DOM events and timers.
///
/// The driver owns the auto-advance timer: it is restarted after every
/// state change and cleared on drop. `on_change` is called whenever the
/// displayed index, the phase or the hover state changes; the host applies
/// [`Phase::css_class`] to the image and forwards the image's `animationend`
/// events to [`animation_end`](Self::animation_end). `on_change` may call
/// back into the driver.
pub struct CarouselDriver {
    state: Rc<RefCell<DriverState>>,
    _tick: Closure<dyn FnMut()>,
}

impl CarouselDriver {
    /// Creates a driver over `len` images with a random auto-advance delay.
    ///
    /// # Errors
    /// Returns [`Error::Initialization`] if the window is unavailable.
    pub fn new(
        len: usize,
        touch_device: bool,
        on_change: impl 'static + FnMut(&Carousel),
    ) -> Result<Self, Error> {
        let delay = auto_advance_delay(js::math_random());
        Self::with_delay(len, delay, touch_device, on_change)
    }

    /// Creates a driver with a fixed auto-advance delay.
    ///
    /// # Errors
    /// Returns [`Error::Initialization`] if the window is unavailable.
    pub fn with_delay(
        len: usize,
        delay: Duration,
        touch_device: bool,
        on_change: impl 'static + FnMut(&Carousel),
    ) -> Result<Self, Error> {
        let window = js::window()?;
        let carousel = Carousel::new(len, delay, touch_device);
        let state = Rc::new(RefCell::new(DriverState::new(carousel, on_change)));

        let weak = Rc::downgrade(&state);
        let tick = Closure::wrap(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            // the timer has fired; its handle is stale
            if let Some(timer) = &mut state.borrow_mut().timer {
                timer.handle = None;
            }
            dispatch(&state, Carousel::auto_advance);
        }) as Box<dyn FnMut()>);

        {
            let mut s = state.borrow_mut();
            s.timer = Some(AutoAdvanceTimer {
                window,
                tick: tick.as_ref().unchecked_ref::<js_sys::Function>().clone(),
                handle: None,
            });
            s.reschedule();
        }

        tracing::debug!(len, delay_ms = delay.as_millis() as u64, touch_device, "carousel mounted");
        Ok(Self { state, _tick: tick })
    }

    /// Index of the displayed image.
    pub fn index(&self) -> usize {
        self.state.borrow().carousel.index()
    }

    /// Snapshot of the carousel state.
    pub fn carousel(&self) -> Carousel {
        self.state.borrow().carousel.clone()
    }

    /// Requests the next image; false if the request was rejected.
    pub fn next(&self) -> bool {
        dispatch(&self.state, Carousel::next)
    }

    /// Requests the previous image; false if the request was rejected.
    pub fn previous(&self) -> bool {
        dispatch(&self.state, Carousel::previous)
    }

    /// Requests the image of a pagination dot; false if rejected.
    pub fn dot_click(&self, dot: usize) -> bool {
        dispatch(&self.state, |c| c.dot_click(dot))
    }

    /// Forwards the end of the image's fade animation.
    pub fn animation_end(&self) {
        dispatch(&self.state, Carousel::animation_end);
    }

    /// Suspends auto-advance while the pointer is over the card.
    pub fn set_hovered(&self, hovered: bool) {
        dispatch(&self.state, |c| c.set_hovered(hovered));
    }

    /// Records where a touch began.
    pub fn touch_start(&self, x: f64) {
        self.state.borrow_mut().carousel.touch_start(x);
    }

    /// Records the latest touch position.
    pub fn touch_move(&self, x: f64) {
        self.state.borrow_mut().carousel.touch_move(x);
    }

    /// Completes a swipe and requests the image it points to.
    pub fn touch_end(&self) -> Option<SwipeDirection> {
        dispatch(&self.state, Carousel::touch_end)
    }
}

impl Drop for CarouselDriver {
    fn drop(&mut self) {
        if let Some(timer) = &mut self.state.borrow_mut().timer {
            timer.clear();
        }
    }
}

impl std::fmt::Debug for CarouselDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CarouselDriver")
            .field("carousel", &state.carousel)
            .field("timeout", &state.timer.as_ref().and_then(|t| t.handle))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn driver_state(len: usize) -> Rc<RefCell<DriverState>> {
        let carousel = Carousel::new(len, Duration::from_secs(4), false);
        Rc::new(RefCell::new(DriverState::new(carousel, |_| {})))
    }

    #[test]
    fn test_auto_advance_delay_range() {
        assert_eq!(auto_advance_delay(0.0), Duration::from_millis(3000));
        assert_eq!(auto_advance_delay(0.5), Duration::from_millis(4500));
        assert!(auto_advance_delay(0.999_999) < Duration::from_millis(6000));
        // out-of-range samples are clamped
        assert_eq!(auto_advance_delay(-1.0), Duration::from_millis(3000));
    }

    #[test]
    fn test_listener_sees_each_change_once() {
        let state = driver_state(3);
        let calls = Rc::new(RefCell::new(Vec::new()));

        let seen = calls.clone();
        state.borrow_mut().on_change = Some(Box::new(move |c: &Carousel| {
            seen.borrow_mut().push((c.index(), c.phase()));
        }));

        assert!(dispatch(&state, Carousel::next));
        // rejected while fading; no notification
        assert!(!dispatch(&state, Carousel::next));
        dispatch(&state, Carousel::animation_end);
        dispatch(&state, Carousel::animation_end);

        assert_eq!(
            *calls.borrow(),
            vec![(0, Phase::FadingOut), (1, Phase::FadingIn), (1, Phase::Idle)]
        );
    }

    #[test]
    fn test_listener_may_call_back_into_driver() {
        let state = driver_state(3);
        let indices = Rc::new(RefCell::new(Vec::new()));
        let advanced = Rc::new(Cell::new(false));

        let inner = Rc::downgrade(&state);
        let seen = indices.clone();
        let flag = advanced.clone();
        state.borrow_mut().on_change = Some(Box::new(move |c: &Carousel| {
            let state = inner.upgrade().unwrap();
            seen.borrow_mut().push(state.borrow().carousel.index());

            // finishing both fades from inside the listener
            if c.phase() == Phase::FadingOut && !flag.replace(true) {
                dispatch(&state, Carousel::animation_end);
                dispatch(&state, Carousel::animation_end);
            }
        }));

        assert!(dispatch(&state, Carousel::next));

        let s = state.borrow();
        assert_eq!(s.carousel.index(), 1);
        assert_eq!(s.carousel.phase(), Phase::Idle);
        // called for the fade-out, then once more for the state it settled in
        assert_eq!(*indices.borrow(), vec![0, 1]);
        assert!(s.on_change.is_some());
    }
}
