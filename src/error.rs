//! Errors returned by the remote catalog / playlist service

use std::io::ErrorKind;
use thiserror::Error;

/// Failure of a call to the streaming service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection, DNS, TLS or socket timeout
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status not covered by a more specific variant
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The access token was rejected
    #[error("not authorized (HTTP {0})")]
    Unauthorized(u16),

    /// The response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Interactive login could not be completed
    #[error("login failed: {0}")]
    Login(String),
}

impl From<ureq::Error> for ServiceError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status @ (401 | 403), _) => ServiceError::Unauthorized(status),
            ureq::Error::Status(status, response) => ServiceError::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ServiceError::Transport(transport.to_string()),
        }
    }
}

/// Body read failures: malformed JSON is a decode error, anything else
/// (read timeout, reset connection) happened on the wire.
impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                ServiceError::Decode(err.to_string())
            }
            _ => ServiceError::Transport(err.to_string()),
        }
    }
}
