//! Client configuration.
//!
//! [`ConnectionConfig`] carries the backend URL and bearer token.
//! [`ClientConfig`] bundles everything needed to build a
//! [`crate::SearchClient`] and can be loaded from a TOML file.

use crate::error::SearchError;
use crate::types::{FilterQuoting, SearchEndpoint, SearchEngine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Where the search backend lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the search backend, e.g. `http://localhost:7700`.
    pub url: String,
    /// Bearer token sent with every request.
    pub token: String,
}

impl ConnectionConfig {
    /// Create a connection config from a base URL and bearer token.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }
}

// Tokens must never reach logs.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Per-client behaviour that is not part of the connection itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Endpoint shape to target.
    pub endpoint: SearchEndpoint,
    /// How filter values are written into filter expressions.
    pub quoting: FilterQuoting,
    /// Transport-level request timeout. `None` leaves timeouts to the caller.
    pub timeout_seconds: Option<u64>,
}

/// Full configuration for a [`crate::SearchClient`].
///
/// ```toml
/// engine = "meilisearch"
/// index_uid = "courses"
///
/// [connection]
/// url = "http://localhost:7700"
/// token = "search-key"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registry key of the engine, e.g. `"meilisearch"`.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Index to search.
    pub index_uid: String,
    /// Endpoint shape: `"single"` (default) or `"multi"`.
    #[serde(default)]
    pub endpoint: SearchEndpoint,
    /// Quote and escape every filter value instead of writing them verbatim.
    #[serde(default)]
    pub escape_filter_values: bool,
    /// Optional transport-level request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    /// Backend URL and credentials, the `[connection]` table.
    pub connection: ConnectionConfig,
}

fn default_engine() -> String {
    SearchEngine::Meilisearch.name().to_owned()
}

impl ClientConfig {
    /// Create a config with default options.
    pub fn new(
        engine: impl Into<String>,
        connection: ConnectionConfig,
        index_uid: impl Into<String>,
    ) -> Self {
        Self {
            engine: engine.into(),
            connection,
            index_uid: index_uid.into(),
            endpoint: SearchEndpoint::default(),
            escape_filter_values: false,
            timeout_seconds: None,
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the file cannot be read, or
    /// [`SearchError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] on malformed TOML or missing fields.
    pub fn from_toml_str(content: &str) -> Result<Self, SearchError> {
        toml::from_str(content).map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Serialise this configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if serialisation fails.
    pub fn to_toml_string(&self) -> Result<String, SearchError> {
        toml::to_string_pretty(self).map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `engine` names a registered engine
    /// - `connection.url` is not empty
    /// - `index_uid` is not empty
    /// - `timeout_seconds`, if set, is greater than 0
    ///
    /// The URL format itself is not checked; a malformed URL surfaces as a
    /// transport error on the first request.
    pub fn validate(&self) -> Result<(), SearchError> {
        SearchEngine::from_name(&self.engine)?;
        if self.connection.url.trim().is_empty() {
            return Err(SearchError::Config("connection.url must not be empty".into()));
        }
        if self.index_uid.trim().is_empty() {
            return Err(SearchError::Config("index_uid must not be empty".into()));
        }
        if self.timeout_seconds == Some(0) {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The per-client options described by this config.
    pub fn options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint,
            quoting: if self.escape_filter_values {
                FilterQuoting::Escaped
            } else {
                FilterQuoting::Legacy
            },
            timeout_seconds: self.timeout_seconds,
        }
    }
}
