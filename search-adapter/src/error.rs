//! Error types for the search-adapter crate.
//!
//! Messages are stable and safe to surface to users. Bearer tokens never
//! appear in error messages.

/// Errors that can occur while configuring a client or running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid configuration, including an unknown engine name.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The search backend answered with a non-success status.
    #[error("search backend returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text, for diagnostics.
        body: String,
    },

    /// The response body is not the wire format the engine expects.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Returns `true` for failures that happened at request time.
    ///
    /// Network failures, non-success statuses and malformed bodies all
    /// count as transport failures. Configuration problems do not.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Parse(_))
    }

    /// Returns the HTTP status code if the backend rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience type alias for search-adapter results.
pub type Result<T> = std::result::Result<T, SearchError>;
