use thiserror::Error;

/// Failures raised by the domain model. All of them are deterministic
/// validation failures; nothing here is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoyageError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoyageErrorKind {
    InvalidState,
    InvalidArgument,
}

impl VoyageError {
    pub fn kind(&self) -> VoyageErrorKind {
        match self {
            VoyageError::InvalidState(_) => VoyageErrorKind::InvalidState,
            VoyageError::InvalidArgument(_) => VoyageErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        VoyageError::InvalidState(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        VoyageError::InvalidArgument(msg.into())
    }
}

pub type VoyageResult<T> = Result<T, VoyageError>;
