//! Image carousel state machine for project cards.
//!
//! A card cross-fades between images in two animation steps:
//!
//! ```text
//! Idle --request(i)--> FadingOut --animation end--> FadingIn --animation end--> Idle
//!                                  (index := i)
//! ```
//!
//! Requests are accepted only while idle, so overlapping auto-advance ticks,
//! swipes and dot clicks never interrupt a running fade.

use std::time::Duration;

/// Horizontal drag distance, in CSS pixels, a swipe must exceed.
pub const SWIPE_THRESHOLD_PX: f64 = 60.0;

/// Animation phase of a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Showing the current image; requests are accepted.
    #[default]
    Idle,
    /// The current image fades out before the index changes.
    FadingOut,
    /// The new image fades in.
    FadingIn,
}

impl Phase {
    /// CSS class applied to the displayed image for this phase.
    pub fn css_class(self) -> &'static str {
        match self {
            Phase::Idle => "shown",
            Phase::FadingOut => "fade-out",
            Phase::FadingIn => "fade-in",
        }
    }
}

/// Direction resulting from a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Dragged left; shows the following image.
    Next,
    /// Dragged right; shows the preceding image.
    Previous,
}

impl SwipeDirection {
    /// Classifies a drag delta (`start_x - end_x`): dragging left by more than
    /// the threshold advances, dragging right by more than it goes back.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta > SWIPE_THRESHOLD_PX {
            Some(Self::Next)
        } else if delta < -SWIPE_THRESHOLD_PX {
            Some(Self::Previous)
        } else {
            None
        }
    }
}

/// Touch positions of an in-progress swipe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SwipeTracker {
    start_x: Option<f64>,
    end_x: Option<f64>,
}

/// Per-card carousel state.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    len: usize,
    index: usize,
    pending: Option<usize>,
    phase: Phase,
    hovered: bool,
    touch_device: bool,
    auto_advance_delay: Duration,
    swipe: SwipeTracker,
}

impl Carousel {
    /// Creates a carousel over `len` images.
    ///
    /// `auto_advance_delay` is fixed for the lifetime of the card; give each
    /// card a different value to stagger their transitions. Touch devices
    /// never auto-advance.
    pub fn new(len: usize, auto_advance_delay: Duration, touch_device: bool) -> Self {
        Self {
            len,
            index: 0,
            pending: None,
            phase: Phase::Idle,
            hovered: false,
            touch_device,
            auto_advance_delay,
            swipe: SwipeTracker::default(),
        }
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a carousel without images.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the image currently displayed.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current animation phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Target of the running transition, if any.
    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    /// Requests a transition to `target`.
    ///
    /// Returns false (and changes nothing) unless the card has at least two
    /// images, is idle, and `target` is a different, valid index.
    pub fn request(&mut self, target: usize) -> bool {
        if self.len < 2 || self.phase != Phase::Idle || target == self.index || target >= self.len {
            return false;
        }

        self.pending = Some(target);
        self.phase = Phase::FadingOut;
        true
    }

    /// Requests the following image, wrapping around.
    pub fn next(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.request((self.index + 1) % self.len)
    }

    /// Requests the preceding image, wrapping around.
    pub fn previous(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        let target = if self.index == 0 { self.len - 1 } else { self.index - 1 };
        self.request(target)
    }

    /// Selects an image from its navigation dot.
    pub fn dot_click(&mut self, dot: usize) -> bool {
        self.request(dot)
    }

    /// Advances the state machine when the current fade animation ends.
    pub fn animation_end(&mut self) {
        self.phase = match self.phase {
            Phase::FadingOut => {
                if let Some(target) = self.pending.take() {
                    self.index = target;
                }
                Phase::FadingIn
            },
            Phase::FadingIn => Phase::Idle,
            Phase::Idle => Phase::Idle,
        };
    }

    /// Pointer entered or left the card. Ignored on touch devices.
    pub fn set_hovered(&mut self, hovered: bool) {
        if !self.touch_device {
            self.hovered = hovered;
        }
    }

    /// Whether the pointer is over the card.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Delay before the next automatic advance, or `None` if the card should
    /// not auto-advance right now.
    pub fn auto_advance_delay(&self) -> Option<Duration> {
        let enabled =
            !self.touch_device && !self.hovered && self.phase == Phase::Idle && self.len >= 2;
        enabled.then_some(self.auto_advance_delay)
    }

    /// Fires an auto-advance timer; does nothing if auto-advance is suspended.
    pub fn auto_advance(&mut self) -> bool {
        self.auto_advance_delay().is_some() && self.next()
    }

    /// Records where a touch began, in CSS pixels.
    pub fn touch_start(&mut self, x: f64) {
        self.swipe.start_x = Some(x);
    }

    /// Records the latest touch position.
    pub fn touch_move(&mut self, x: f64) {
        self.swipe.end_x = Some(x);
    }

    /// Completes a swipe, requesting the next or previous image if the drag
    /// exceeded the threshold. A touch without movement is not a swipe.
    pub fn touch_end(&mut self) -> Option<SwipeDirection> {
        let swipe = std::mem::take(&mut self.swipe);
        let (start, end) = (swipe.start_x?, swipe.end_x?);

        let direction = SwipeDirection::from_delta(start - end)?;
        match direction {
            SwipeDirection::Next => self.next(),
            SwipeDirection::Previous => self.previous(),
        };
        Some(direction)
    }
}
