//! Meilisearch backend.
//!
//! Speaks the Meilisearch REST search API: either the per-index endpoint
//! `POST /indexes/{uid}/search` or the batch endpoint `POST /multi-search`.
//! Filters are rendered in Meilisearch's filter expression syntax.

use crate::config::ConnectionConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::types::{
    FilterQuoting, FilterSet, FilterValue, ScalarValue, SearchEndpoint, SearchEngine,
    SearchResults,
};
use serde::{Deserialize, Serialize};

/// Page size every query asks for.
pub const DEFAULT_LIMIT: u64 = 21;

/// A single Meilisearch search query as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeiliQuery {
    /// Target index. Only present in multi-search payloads.
    #[serde(rename = "indexUid", skip_serializing_if = "Option::is_none")]
    pub index_uid: Option<String>,
    /// The search term.
    pub q: String,
    /// Facets to compute. Always empty.
    pub facets: Vec<String>,
    /// Page size.
    pub limit: u64,
    /// Offset of the first hit.
    pub offset: u64,
    /// Filter expression, empty when no filters apply.
    pub filter: String,
}

/// Body of a `POST /multi-search` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiSearchRequest {
    /// One query per index searched.
    pub queries: Vec<MeiliQuery>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeiliResponse {
    hits: Vec<serde_json::Value>,
    #[serde(default)]
    limit: u64,
    #[serde(default)]
    offset: u64,
    #[serde(default)]
    estimated_total_hits: Option<u64>,
    // Reported instead of the estimate when paginating by page number.
    #[serde(default)]
    total_hits: Option<u64>,
    #[serde(default)]
    processing_time_ms: Option<u64>,
    #[serde(default)]
    index_uid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    results: Vec<MeiliResponse>,
}

/// Meilisearch search strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeilisearchEngine {
    endpoint: SearchEndpoint,
    quoting: FilterQuoting,
}

impl MeilisearchEngine {
    /// Create a strategy targeting `endpoint`, rendering filters with `quoting`.
    pub fn new(endpoint: SearchEndpoint, quoting: FilterQuoting) -> Self {
        Self { endpoint, quoting }
    }

    /// The endpoint shape this strategy targets.
    pub fn endpoint(&self) -> SearchEndpoint {
        self.endpoint
    }

    /// Build the typed query for `term` and `filters`.
    pub fn query(&self, term: &str, filters: &FilterSet, index_uid: &str) -> MeiliQuery {
        MeiliQuery {
            index_uid: match self.endpoint {
                SearchEndpoint::Single => None,
                SearchEndpoint::Multi => Some(index_uid.to_owned()),
            },
            q: term.to_owned(),
            facets: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            filter: build_filter_expression(filters, self.quoting),
        }
    }
}

impl SearchEngineTrait for MeilisearchEngine {
    fn build_query(
        &self,
        term: &str,
        filters: &FilterSet,
        index_uid: &str,
    ) -> Result<serde_json::Value, SearchError> {
        let query = self.query(term, filters, index_uid);
        let payload = match self.endpoint {
            SearchEndpoint::Single => serde_json::to_value(query),
            SearchEndpoint::Multi => serde_json::to_value(MultiSearchRequest {
                queries: vec![query],
            }),
        };
        payload.map_err(|e| SearchError::Parse(format!("failed to encode Meilisearch query: {e}")))
    }

    fn search_url(&self, connection: &ConnectionConfig, index_uid: &str) -> String {
        match self.endpoint {
            SearchEndpoint::Single => format!("{}/indexes/{index_uid}/search", connection.url),
            SearchEndpoint::Multi => format!("{}/multi-search", connection.url),
        }
    }

    fn transform_response(
        &self,
        raw: serde_json::Value,
        index_uid: &str,
    ) -> Result<SearchResults, SearchError> {
        let response = match self.endpoint {
            SearchEndpoint::Single => serde_json::from_value::<MeiliResponse>(raw)
                .map_err(|e| SearchError::Parse(format!("unexpected Meilisearch response: {e}")))?,
            SearchEndpoint::Multi => {
                let multi = serde_json::from_value::<MultiSearchResponse>(raw).map_err(|e| {
                    SearchError::Parse(format!("unexpected Meilisearch multi-search response: {e}"))
                })?;
                select_index_result(multi.results, index_uid)?
            }
        };

        Ok(SearchResults {
            results: response.hits,
            limit: response.limit,
            offset: response.offset,
            total: response.estimated_total_hits.or(response.total_hits),
            took: response.processing_time_ms,
            max_score: None,
        })
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Meilisearch
    }
}

/// Pick the result for `index_uid`, falling back to the first entry.
fn select_index_result(
    results: Vec<MeiliResponse>,
    index_uid: &str,
) -> Result<MeiliResponse, SearchError> {
    let position = results
        .iter()
        .position(|r| r.index_uid.as_deref() == Some(index_uid))
        .unwrap_or(0);
    results
        .into_iter()
        .nth(position)
        .ok_or_else(|| SearchError::Parse("multi-search response has no results".into()))
}

/// Render a filter set as a Meilisearch filter expression.
///
/// Clauses follow the set's iteration order and are joined with ` AND `.
/// Lists become `field IN [a,b]`, scalars `field='value'`. Nested maps have
/// no filter form and are skipped.
///
/// With [`FilterQuoting::Legacy`] values are written verbatim, so a value
/// containing `,` or `'` yields a malformed or wrong expression.
/// [`FilterQuoting::Escaped`] quotes every value and escapes `\` and `'`.
pub fn build_filter_expression(filters: &FilterSet, quoting: FilterQuoting) -> String {
    let mut clauses = Vec::with_capacity(filters.len());

    for (field, value) in filters.iter() {
        match value {
            FilterValue::List(values) => {
                let rendered: Vec<String> = values
                    .iter()
                    .map(|v| match quoting {
                        FilterQuoting::Legacy => v.to_string(),
                        FilterQuoting::Escaped => quote(v),
                    })
                    .collect();
                clauses.push(format!("{field} IN [{}]", rendered.join(",")));
            }
            FilterValue::Nested(_) => {
                tracing::debug!(field, "skipping nested filter value");
            }
            FilterValue::Scalar(v) => {
                let rendered = match quoting {
                    FilterQuoting::Legacy => format!("'{v}'"),
                    FilterQuoting::Escaped => quote(v),
                };
                clauses.push(format!("{field}={rendered}"));
            }
        }
    }

    clauses.join(" AND ")
}

fn quote(value: &ScalarValue) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for c in raw.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
