use reqwest::StatusCode;
use thiserror::Error;

/// The only failure text users ever see.
pub const GENERIC_ERROR_MESSAGE: &str = "Something bad happened; please try again later";

/// Failure of an API call.
///
/// Every variant displays as [`GENERIC_ERROR_MESSAGE`]. The variants keep the
/// underlying cause for logging and for callers that want to inspect it.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Status { status: StatusCode, body: String },

    /// The response body did not match the expected shape
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Decode(#[source] serde_json::Error),

    /// An authenticated call was made without a stored session
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    NoSession,

    /// The session store could not be read or written
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Session(String),

    /// A path segment that URL normalization would drop or merge
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    InvalidPath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Status,
    Decode,
    NoSession,
    Session,
    InvalidPath,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Status { .. } => ErrorKind::Status,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::NoSession => ErrorKind::NoSession,
            ClientError::Session(_) => ErrorKind::Session,
            ClientError::InvalidPath(_) => ErrorKind::InvalidPath,
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }

    /// Log the cause with as much detail as the failure carries.
    pub(crate) fn log(&self, operation: &str) {
        match self {
            ClientError::Transport(e) => {
                tracing::error!(operation, error = %e, "Request failed before a response arrived");
            }
            ClientError::Status { status, body } => {
                tracing::error!(operation, status = %status.as_u16(), body = %body, "Server returned an error");
            }
            ClientError::Decode(e) => {
                tracing::error!(operation, error = %e, "Unexpected response body");
            }
            ClientError::NoSession => {
                tracing::error!(operation, "No session; log in first");
            }
            ClientError::Session(e) => {
                tracing::error!(operation, error = %e, "Session store error");
            }
            ClientError::InvalidPath(segment) => {
                tracing::error!(operation, segment = %segment, "Refusing to send dot or empty path segment");
            }
        }
    }
}
