/// Error categories.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to retrieve the window, document, canvas or 2D context.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Event listener, animation frame or timer registration errors.
    #[error("Event listener error: {0}")]
    Callback(String),

    /// Rejected renderer or animation configuration.
    #[error(transparent)]
    Config(#[from] glyphfield_core::Error),
}

impl Error {
    // Initialization errors
    pub(crate) fn window_not_found() -> Self {
        Self::Initialization("Unable to retrieve window".to_string())
    }

    pub(crate) fn document_not_found() -> Self {
        Self::Initialization("Unable to retrieve document".to_string())
    }

    pub(crate) fn canvas_not_found() -> Self {
        Self::Initialization("Unable to retrieve canvas".to_string())
    }

    pub(crate) fn element_not_found(selector: &str) -> Self {
        Self::Initialization(format!("Unable to retrieve element: {selector}"))
    }

    pub(crate) fn canvas_context_failed() -> Self {
        Self::Initialization("Failed to retrieve canvas 2d rendering context".to_string())
    }

    pub(crate) fn element_creation_failed(tag: &str) -> Self {
        Self::Initialization(format!("Failed to create <{tag}> element"))
    }

    // Callback errors
    pub(crate) fn listener_failed(event_type: &str) -> Self {
        Self::Callback(format!("Failed to add {event_type} listener"))
    }

    pub(crate) fn animation_frame_failed() -> Self {
        Self::Callback("Failed to request animation frame".to_string())
    }

    pub(crate) fn timer_failed() -> Self {
        Self::Callback("Failed to schedule timeout".to_string())
    }
}
