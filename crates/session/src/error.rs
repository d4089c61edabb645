//! Session store errors

use healthtrack_core::CoreError;
use healthtrack_http::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A profile was requested without a stored token. No request is made.
    #[error("No token")]
    NoToken,

    /// The API call failed; the error is passed through untouched
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Reading or writing the persisted token failed
    #[error("Token storage: {0}")]
    Storage(#[from] CoreError),
}

impl SessionError {
    /// Whether the server rejected the stored token
    pub const fn is_auth_expired(&self) -> bool {
        match self {
            Self::Client(err) => err.is_auth_expired(),
            _ => false,
        }
    }
}
