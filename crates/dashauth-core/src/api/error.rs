use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the token. The stored credential has already
    /// been cleared by the time this is returned.
    #[error("Unauthorized - token is invalid or expired")]
    Unauthorized,

    #[error("API error: {} {}", .status.as_u16(), .status_text)]
    Status {
        status: StatusCode,
        status_text: String,
    },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Classify a non-success status. 401 maps to `Unauthorized`,
    /// everything else keeps its status and reason phrase.
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        ApiError::Status {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status carried by the error, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
