//! # search-adapter
//!
//! Engine-agnostic search client for UI search widgets.
//!
//! The crate builds backend-specific query payloads from a search term and
//! a set of field filters, sends them to the search service, and normalises
//! the answer into [`SearchResults`], a shape that stays the same whichever
//! backend is deployed.
//!
//! ## Design
//!
//! - One [`SearchClient`] per search context: one engine, one index
//! - Backends are strategies implementing [`SearchEngineTrait`], chosen by
//!   name at construction (currently `"meilisearch"`)
//! - One HTTP request per search, no retries and no caching
//! - Future-style ([`SearchClient::search`]) and callback-style
//!   ([`SearchClient::search_with_callbacks`]) calling conventions
//!
//! ## Security
//!
//! - Bearer tokens are never logged or included in `Debug` output
//! - Search terms are logged only at trace level

pub mod client;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod types;

pub use client::SearchClient;
pub use config::{ClientConfig, ClientOptions, ConnectionConfig};
pub use engine::SearchEngineTrait;
pub use error::{Result, SearchError};
pub use types::{
    FilterQuoting, FilterSet, FilterValue, ScalarValue, SearchEndpoint, SearchEngine,
    SearchResults,
};

/// Run a single search described by `config`.
///
/// Convenience wrapper that builds a [`SearchClient`] and performs one
/// search. Prefer keeping a client around when searching repeatedly.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, otherwise
/// the same errors as [`SearchClient::search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> search_adapter::Result<()> {
/// let config = search_adapter::ClientConfig::from_file("search.toml".as_ref())?;
/// let page = search_adapter::search(&config, "rust", &Default::default()).await?;
/// for hit in &page.results {
///     println!("{hit}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(config: &ClientConfig, term: &str, filters: &FilterSet) -> Result<SearchResults> {
    SearchClient::from_config(config)?.search(term, filters).await
}
