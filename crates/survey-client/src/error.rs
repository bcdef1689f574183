use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The survey API answered with a non-2xx status.
    #[error("survey API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Message suitable for showing to the user, if the server supplied one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => Some(message.as_str()),
            ClientError::Forbidden(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
