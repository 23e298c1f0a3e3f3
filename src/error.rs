use thiserror::Error;

/// Errors raised while building dials or driving the window.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{labels} labels supplied for {ticks} major ticks")]
    LabelMismatch { labels: usize, ticks: usize },

    #[error("failed to load font from {path}: {reason}")]
    Font { path: String, reason: String },

    #[error("window error: {0}")]
    Window(String),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(err: winit::error::EventLoopError) -> Self {
        Self::Window(err.to_string())
    }
}

impl From<winit::error::OsError> for Error {
    fn from(err: winit::error::OsError) -> Self {
        Self::Window(err.to_string())
    }
}

impl From<pixels::Error> for Error {
    fn from(err: pixels::Error) -> Self {
        Self::Render(err.to_string())
    }
}
