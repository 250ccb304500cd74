use thiserror::Error;

/// Errors that can occur during REST calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Body did not match the expected shape.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Coarse classification shared by every source error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    NotFound,
    Unavailable,
    InvalidData,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Status { status: 401 | 403, .. } => FailureKind::Unauthorized,
            Self::Status { status: 404, .. } => FailureKind::NotFound,
            Self::Status { status: 422, .. } | Self::InvalidResponse(_) => FailureKind::InvalidData,
            Self::Network(error) if error.is_decode() => FailureKind::InvalidData,
            Self::Status { .. } | Self::Network(_) => FailureKind::Unavailable,
        }
    }
}
