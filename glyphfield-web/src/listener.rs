//! Scoped DOM event listeners.

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Event, EventTarget};

use crate::Error;

/// An event listener that stays registered for as long as it is alive.
///
/// Dropping the listener removes it from its target, so a struct holding
/// its listeners detaches all of them when it is dropped.
pub(crate) struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    /// Registers `f` for `event_type` events on `target`.
    pub(crate) fn new(
        target: &EventTarget,
        event_type: &'static str,
        f: impl 'static + FnMut(Event),
    ) -> Result<Self, Error> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(_)>);
        target
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed(event_type))?;

        Ok(Self { target: target.clone(), event_type, callback })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("event_type", &self.event_type)
            .finish()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;
    use crate::js;

    #[wasm_bindgen_test]
    fn test_drop_removes_listener() {
        let target = js::create_div(&js::document().unwrap()).unwrap();
        let calls = Rc::new(Cell::new(0u32));

        let counter = calls.clone();
        let listener = EventListener::new(&target, "ping", move |_| counter.set(counter.get() + 1))
            .unwrap();

        target.dispatch_event(&Event::new("ping").unwrap()).unwrap();
        assert_eq!(calls.get(), 1);

        drop(listener);
        target.dispatch_event(&Event::new("ping").unwrap()).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
