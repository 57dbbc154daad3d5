//! The [`SearchClient`] facade.
//!
//! A client is bound to one engine and one index at construction and never
//! changes afterwards. It is cheap to clone; clones share the HTTP
//! connection pool.

use crate::config::{ClientConfig, ClientOptions, ConnectionConfig};
use crate::engine::SearchEngineTrait;
use crate::engines;
use crate::error::SearchError;
use crate::http;
use crate::types::{FilterSet, SearchEngine, SearchResults};
use std::fmt;
use std::sync::Arc;

/// Engine-agnostic search client.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> search_adapter::Result<()> {
/// use search_adapter::{ConnectionConfig, FilterSet, SearchClient};
///
/// let client = SearchClient::new(
///     "meilisearch",
///     ConnectionConfig::new("http://localhost:7700", "search-key"),
///     "courses",
/// )?;
/// let filters = FilterSet::new().with("language", vec!["en", "fr"]);
/// let page = client.search("rust", &filters).await?;
/// println!("{} of {:?} hits", page.results.len(), page.total);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchClient {
    strategy: Arc<dyn SearchEngineTrait>,
    connection: Arc<ConnectionConfig>,
    index_uid: Arc<str>,
    http: reqwest::Client,
}

impl SearchClient {
    /// Create a client with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `engine` is not a registered engine
    /// name. No network activity happens here.
    pub fn new(
        engine: &str,
        connection: ConnectionConfig,
        index_uid: impl Into<String>,
    ) -> Result<Self, SearchError> {
        Self::with_options(engine, connection, index_uid, ClientOptions::default())
    }

    /// Create a client with explicit [`ClientOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an unknown engine, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn with_options(
        engine: &str,
        connection: ConnectionConfig,
        index_uid: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, SearchError> {
        let engine = SearchEngine::from_name(engine)?;
        let strategy = engines::strategy_for(engine, &options);
        let http = http::build_client(&options)?;
        let index_uid: String = index_uid.into();

        tracing::debug!(%engine, index = %index_uid, endpoint = ?options.endpoint, "search client created");

        Ok(Self {
            strategy,
            connection: Arc::new(connection),
            index_uid: index_uid.into(),
            http,
        })
    }

    /// Create a client from a validated [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Self::with_options(
            &config.engine,
            config.connection.clone(),
            config.index_uid.clone(),
            config.options(),
        )
    }

    /// The engine backing this client.
    pub fn engine(&self) -> SearchEngine {
        self.strategy.engine_type()
    }

    /// The index this client searches.
    pub fn index_uid(&self) -> &str {
        &self.index_uid
    }

    /// The endpoint URL searches are sent to.
    pub fn search_url(&self) -> String {
        self.strategy.search_url(&self.connection, &self.index_uid)
    }

    /// The request body [`search`](Self::search) would send.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the payload cannot be encoded.
    pub fn build_query(
        &self,
        term: &str,
        filters: &FilterSet,
    ) -> Result<serde_json::Value, SearchError> {
        self.strategy.build_query(term, filters, &self.index_uid)
    }

    /// Run a search and return normalised results.
    ///
    /// Exactly one HTTP request is made. Dropping the returned future cancels
    /// it.
    ///
    /// # Errors
    ///
    /// Returns a transport error ([`SearchError::Http`],
    /// [`SearchError::Status`] or [`SearchError::Parse`]) if the request
    /// fails, the backend rejects it, or the body is not what the engine
    /// returns.
    pub async fn search(
        &self,
        term: &str,
        filters: &FilterSet,
    ) -> Result<SearchResults, SearchError> {
        let payload = self.build_query(term, filters)?;
        let url = self.search_url();
        tracing::trace!(term, %payload, "search payload built");

        let raw = http::post_json(&self.http, &url, &self.connection.token, &payload).await?;
        let results = self.strategy.transform_response(raw, &self.index_uid)?;

        tracing::debug!(
            engine = %self.engine(),
            hits = results.results.len(),
            total = ?results.total,
            "search completed"
        );
        Ok(results)
    }

    /// Run a search in the background and report through callbacks.
    ///
    /// The search is spawned onto the current Tokio runtime. Exactly one of
    /// `on_success` or `on_error` runs when it finishes. Aborting the returned
    /// handle cancels the request and neither callback runs.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn search_with_callbacks<S, E>(
        &self,
        term: impl Into<String>,
        filters: FilterSet,
        on_success: S,
        on_error: E,
    ) -> tokio::task::JoinHandle<()>
    where
        S: FnOnce(SearchResults) + Send + 'static,
        E: FnOnce(SearchError) + Send + 'static,
    {
        let client = self.clone();
        let term = term.into();
        tokio::spawn(async move {
            match client.search(&term, &filters).await {
                Ok(results) => on_success(results),
                Err(err) => on_error(err),
            }
        })
    }

    /// Check that the backend is reachable and reports itself available.
    ///
    /// Sends `GET {base}/health`. Returns `Ok(false)` when the backend
    /// answers but not with `{"status": "available"}`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the backend cannot be reached or
    /// answers with a non-success status.
    pub async fn health(&self) -> Result<bool, SearchError> {
        let url = format!("{}/health", self.connection.url);
        let body = http::get_json(&self.http, &url, &self.connection.token).await?;
        let available = body.get("status").and_then(|s| s.as_str()) == Some("available");
        tracing::debug!(available, "search backend health checked");
        Ok(available)
    }
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("engine", &self.engine())
            .field("connection", &self.connection)
            .field("index_uid", &self.index_uid)
            .finish_non_exhaustive()
    }
}
