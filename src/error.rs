use thiserror::Error;

pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors raised by the wave field and its collaborators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveError {
    /// A constructor or setter argument failed validation. Nothing was mutated.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A colour gradient could not be built.
    #[error("palette error: {0}")]
    Palette(String),
}

impl WaveError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        WaveError::InvalidParameter { name, reason: reason.into() }
    }
}
