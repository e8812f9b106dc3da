//! Error types for the link server.
//!
//! None of these reach the client verbatim. The resolver turns them into a
//! generic 500 page and logs the detail.

use flowlinks_core::TemplateId;

/// Failure talking to the link store. Distinct from "no such link".
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// ClickHouse query error.
    #[error("database error: {0}")]
    Database(#[from] clickhouse::error::Error),

    /// The store could not be reached or refused the query.
    #[error("link store unavailable: {0}")]
    Unavailable(String),
}

/// A template could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to load template '{template}': {source}")]
    Load {
        template: TemplateId,
        #[source]
        source: std::io::Error,
    },
}

/// Internal failure while resolving a link.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
