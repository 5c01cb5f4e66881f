//! Error types for backdrop.
//!
//! The animations themselves never fail: every numeric path is total. These
//! errors only surface at the edges, when a scene is configured, an
//! animation is looked up by name, or a snapshot is written.

use thiserror::Error;

/// Errors produced while configuring or hosting an animation.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Width or height was zero, or their product overflows.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// No animation is registered under this name.
    #[error("unknown animation: {0}")]
    UnknownAnimation(String),

    /// A theme name other than `dark` or `light`.
    #[error("invalid theme '{0}': expected 'dark' or 'light'")]
    InvalidTheme(String),

    /// A scene or params document was malformed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
