//! Run state of the animation frame loop.
//!
//! Kept free of browser types so the pause, visibility and teardown rules can
//! be tested natively; [`FrameLoop`](crate::frame_loop::FrameLoop) carries
//! out the returned [`Transition`]s.

/// What the loop driver must do after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Request an animation frame, then report the outcome with
    /// [`LoopState::requested`] or [`LoopState::request_failed`].
    Request,
    /// Cancel the pending frame request with this handle.
    Cancel(i32),
    /// Nothing to do.
    Idle,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoopState {
    /// Handle of the pending frame request, if any.
    handle: Option<i32>,
    running: bool,
    /// Stopped through the public pause API; only `resume` clears it.
    paused: bool,
    hidden: bool,
    torn_down: bool,
}

impl LoopState {
    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    fn can_start(&self) -> bool {
        !(self.running || self.paused || self.hidden || self.torn_down)
    }

    /// Starts the loop unless it is paused, hidden, torn down or already running.
    pub(crate) fn start(&mut self) -> Transition {
        if self.can_start() { Transition::Request } else { Transition::Idle }
    }

    pub(crate) fn pause(&mut self) -> Transition {
        self.paused = true;
        self.stop()
    }

    pub(crate) fn resume(&mut self) -> Transition {
        self.paused = false;
        self.start()
    }

    /// Follows document visibility: hiding stops the loop, showing restarts
    /// it unless it was paused.
    pub(crate) fn set_hidden(&mut self, hidden: bool) -> Transition {
        self.hidden = hidden;
        if hidden { self.stop() } else { self.start() }
    }

    /// Stops the loop for good.
    pub(crate) fn teardown(&mut self) -> Transition {
        self.torn_down = true;
        self.stop()
    }

    pub(crate) fn requested(&mut self, handle: i32) {
        self.running = true;
        self.handle = Some(handle);
    }

    /// A frame request was rejected; the loop counts as stopped so a later
    /// `start`, `resume` or visibility change can retry.
    pub(crate) fn request_failed(&mut self) {
        self.running = false;
        self.handle = None;
    }

    /// Records that the pending frame fired. Returns true if the loop is
    /// still running and must request the next frame.
    pub(crate) fn frame_fired(&mut self) -> bool {
        self.handle = None;
        self.running
    }

    fn stop(&mut self) -> Transition {
        self.running = false;
        match self.handle.take() {
            Some(handle) => Transition::Cancel(handle),
            None => Transition::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(handle: i32) -> LoopState {
        let mut state = LoopState::default();
        assert_eq!(state.start(), Transition::Request);
        state.requested(handle);
        state
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut state = running(1);
        assert_eq!(state.start(), Transition::Idle);
        assert!(state.is_running());
    }

    #[test]
    fn test_hidden_then_visible_restarts() {
        let mut state = running(7);

        assert_eq!(state.set_hidden(true), Transition::Cancel(7));
        assert!(!state.is_running());
        assert_eq!(state.start(), Transition::Idle);

        assert_eq!(state.set_hidden(false), Transition::Request);
    }

    #[test]
    fn test_visibility_does_not_undo_pause() {
        let mut state = running(3);

        assert_eq!(state.pause(), Transition::Cancel(3));
        assert_eq!(state.set_hidden(true), Transition::Idle);
        assert_eq!(state.set_hidden(false), Transition::Idle);
        assert!(state.is_paused());
        assert!(!state.is_running());

        assert_eq!(state.resume(), Transition::Request);
        assert!(!state.is_paused());
    }

    #[test]
    fn test_resume_while_hidden_waits_for_visibility() {
        let mut state = running(3);
        state.pause();
        state.set_hidden(true);

        assert_eq!(state.resume(), Transition::Idle);
        assert_eq!(state.set_hidden(false), Transition::Request);
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let mut state = running(42);

        assert_eq!(state.teardown(), Transition::Cancel(42));
        assert_eq!(state.start(), Transition::Idle);
        assert_eq!(state.resume(), Transition::Idle);
        assert_eq!(state.set_hidden(false), Transition::Idle);
    }

    #[test]
    fn test_teardown_between_frames() {
        let mut state = running(5);
        assert!(state.frame_fired());

        // the callback has fired and not yet re-requested
        assert_eq!(state.teardown(), Transition::Idle);
        assert!(!state.frame_fired());
    }

    #[test]
    fn test_failed_request_can_recover() {
        let mut state = running(9);
        assert!(state.frame_fired());
        state.request_failed();

        assert!(!state.is_running());
        assert!(!state.frame_fired());

        state.set_hidden(true);
        assert_eq!(state.set_hidden(false), Transition::Request);
    }
}
