//! Trait definition for pluggable search backends.
//!
//! Each backend implements [`SearchEngineTrait`]: it knows how to shape a
//! query payload, where to send it, and how to turn the raw answer into
//! [`SearchResults`]. The HTTP exchange itself is shared and lives in
//! [`crate::http`].

use crate::config::ConnectionConfig;
use crate::error::SearchError;
use crate::types::{FilterSet, SearchEngine, SearchResults};

/// A search backend strategy.
///
/// All three operations are pure: no I/O, no shared state. The client calls
/// them around a single HTTP exchange per search.
///
/// All implementations must be `Send + Sync` so a client can be shared
/// across tasks.
pub trait SearchEngineTrait: Send + Sync {
    /// Build the JSON request body for `term` narrowed by `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the payload cannot be encoded.
    fn build_query(
        &self,
        term: &str,
        filters: &FilterSet,
        index_uid: &str,
    ) -> Result<serde_json::Value, SearchError>;

    /// Fully qualified URL the query is POSTed to.
    fn search_url(&self, connection: &ConnectionConfig, index_uid: &str) -> String;

    /// Normalise a parsed response body.
    ///
    /// Optional fields the backend leaves out become `None`, never zero.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the body lacks the fields every
    /// response of this engine must carry.
    fn transform_response(
        &self,
        raw: serde_json::Value,
        index_uid: &str,
    ) -> Result<SearchResults, SearchError>;

    /// Returns which [`SearchEngine`] variant this implementation represents.
    fn engine_type(&self) -> SearchEngine;
}
