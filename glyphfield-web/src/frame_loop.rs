//! `requestAnimationFrame` driven loop.

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::Window;

use crate::{
    Error, js,
    lifecycle::{LoopState, Transition},
};

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Calls a closure once per animation frame until stopped.
///
/// Each frame callback schedules the next one before running the body, so a
/// body that returns early still keeps the loop alive. The pending request is
/// cancelled on [`pause`](FrameLoop::pause), when the document is hidden, and
/// on drop.
pub(crate) struct FrameLoop {
    window: Window,
    state: Rc<RefCell<LoopState>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    /// Wraps `on_frame`, which receives the frame timestamp in milliseconds.
    /// The loop is created stopped.
    pub(crate) fn new(window: &Window, mut on_frame: impl 'static + FnMut(f64)) -> Self {
        let state = Rc::new(RefCell::new(LoopState::default()));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let weak_callback = Rc::downgrade(&callback);
        let loop_state = state.clone();
        let loop_window = window.clone();
        let frame = Closure::wrap(Box::new(move |now: f64| {
            if !loop_state.borrow_mut().frame_fired() {
                return;
            }

            // the loop is being dropped once the callback cell is gone
            let Some(callback) = weak_callback.upgrade() else {
                return;
            };
            let request = callback
                .borrow()
                .as_ref()
                .map(|cb| loop_window.request_animation_frame(cb.as_ref().unchecked_ref()));

            match request {
                Some(Ok(handle)) => loop_state.borrow_mut().requested(handle),
                _ => {
                    loop_state.borrow_mut().request_failed();
                    js::report("frame loop stopped", &Error::animation_frame_failed());
                },
            }

            on_frame(now);
        }) as Box<dyn FnMut(f64)>);

        *callback.borrow_mut() = Some(frame);

        Self { window: window.clone(), state, callback }
    }

    /// Starts the loop unless it is paused, hidden or already running.
    pub(crate) fn start(&self) -> Result<bool, Error> {
        let transition = self.state.borrow_mut().start();
        self.apply(transition)
    }

    /// Stops the loop until [`resume`](Self::resume) is called. Visibility
    /// changes do not restart a paused loop.
    pub(crate) fn pause(&self) {
        let transition = self.state.borrow_mut().pause();
        // cancelling never fails
        let _ = self.apply(transition);
    }

    /// Clears a pause. Returns true if the loop was restarted.
    pub(crate) fn resume(&self) -> Result<bool, Error> {
        let transition = self.state.borrow_mut().resume();
        self.apply(transition)
    }

    /// Follows document visibility. Returns true if the loop was restarted.
    pub(crate) fn set_hidden(&self, hidden: bool) -> Result<bool, Error> {
        let transition = self.state.borrow_mut().set_hidden(hidden);
        self.apply(transition)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state.borrow().is_running()
    }

    /// Carries out a transition; `Ok(true)` means a frame was requested.
    fn apply(&self, transition: Transition) -> Result<bool, Error> {
        match transition {
            Transition::Request => {
                let request = {
                    let callback = self.callback.borrow();
                    let cb = callback.as_ref().ok_or(Error::animation_frame_failed())?;
                    self.window.request_animation_frame(cb.as_ref().unchecked_ref())
                };

                let mut state = self.state.borrow_mut();
                match request {
                    Ok(handle) => {
                        state.requested(handle);
                        Ok(true)
                    },
                    Err(_) => {
                        state.request_failed();
                        Err(Error::animation_frame_failed())
                    },
                }
            },
            Transition::Cancel(handle) => {
                let _ = self.window.cancel_animation_frame(handle);
                Ok(false)
            },
            Transition::Idle => Ok(false),
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        let transition = self.state.borrow_mut().teardown();
        let _ = self.apply(transition);
        self.callback.borrow_mut().take();
    }
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("state", &*self.state.borrow())
            .finish()
    }
}
