//! Search backend implementations.
//!
//! Each module provides a struct implementing [`crate::engine::SearchEngineTrait`]
//! for one backend's wire conventions.

pub mod meilisearch;

pub use meilisearch::MeilisearchEngine;

use crate::config::ClientOptions;
use crate::engine::SearchEngineTrait;
use crate::types::SearchEngine;
use std::sync::Arc;

/// Instantiate the strategy registered for `engine`.
pub fn strategy_for(engine: SearchEngine, options: &ClientOptions) -> Arc<dyn SearchEngineTrait> {
    match engine {
        SearchEngine::Meilisearch => {
            Arc::new(MeilisearchEngine::new(options.endpoint, options.quoting))
        }
    }
}
