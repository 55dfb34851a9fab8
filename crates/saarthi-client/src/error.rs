use thiserror::Error;

/// Failures surfaced by the marketplace and job search clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status; `message` is the server's `error` field when present.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("tracker cache I/O failed: {0}")]
    CacheIo(#[from] std::io::Error),
    #[error("tracker cache is corrupt: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
