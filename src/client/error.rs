use reqwest::StatusCode;
use thiserror::Error;

use crate::types::response::ErrorPayload;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: code {code}")]
    Status {
        code: u16,
        payload: Option<ErrorPayload>,
    },

    #[error("Server returned invalid json: {0:?}")]
    InvalidJson(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("No refresh token stored, please log in again")]
    NoRefreshToken,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Timed out waiting for the token refresh of another request")]
    RefreshTimeout,

    #[error("Refresh token failed: {0}")]
    Refresh(&'static str),

    #[error("Server did not return a token pair")]
    NoTokens,

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl RequestError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Transport failures where the request may never have reached the server. These
    /// are the only errors worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// Messages suitable for showing to the user. Well-known statuses get a fixed
    /// explanation; other statuses surface the server's own error body verbatim.
    pub fn messages(&self) -> Vec<String> {
        let msg = match self {
            Self::Timeout | Self::RefreshTimeout => {
                "The server took too long to respond, please try again."
            }
            Self::Network(_) => "Could not reach the server, please check your connection.",
            Self::SessionExpired | Self::NoRefreshToken | Self::Refresh(_) => "Session expired, please log in again.",
            Self::Status { code, payload } => {
                return Self::status_messages(*code, payload.as_ref());
            }
            _ => return vec![self.to_string()],
        };
        vec![String::from(msg)]
    }

    fn status_messages(code: u16, payload: Option<&ErrorPayload>) -> Vec<String> {
        let msg = match code {
            401 => "Session expired, please log in again.",
            403 => "You do not have permission to perform this action.",
            404 => "The requested resource was not found.",
            500.. => "Internal server error, please try again later.",
            _ => {
                if let Some(messages) = payload.and_then(|p| p.messages()) {
                    return messages;
                }
                return vec![format!("Unexpected error, status code {code}")];
            }
        };
        vec![String::from(msg)]
    }
}
