//! Error type of the core crate.

/// Error categories for the platform-agnostic field renderer.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Rejected renderer or animation configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host could not report layout geometry (e.g. a detached node).
    #[error("Layout error: {0}")]
    Layout(String),

    /// Gradient light planning could not satisfy the request.
    #[error("Planning error: {0}")]
    Planning(String),
}

impl Error {
    // Configuration errors
    pub(crate) fn empty_glyph_ramp() -> Self {
        Self::Config("Glyph ramp must contain at least one glyph".to_string())
    }

    pub(crate) fn invalid_value(field: &str, value: f64) -> Self {
        Self::Config(format!("Invalid value for {field}: {value}"))
    }

    pub(crate) fn zero_value(field: &str) -> Self {
        Self::Config(format!("{field} must be greater than zero"))
    }

    // Layout errors
    /// Creates a layout error for a container that is no longer attached.
    pub fn detached(what: &str) -> Self {
        Self::Layout(format!("{what} is not attached to a document"))
    }

    // Planning errors
    pub(crate) fn not_enough_gradients(requested: usize, available: usize) -> Self {
        Self::Planning(format!(
            "Requested {requested} lights but only {available} unique gradients exist"
        ))
    }
}
