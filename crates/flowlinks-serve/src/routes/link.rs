//! Catch-all link handler.
//!
//! Every path not claimed by another route is treated as a link path.

use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::resolve;
use crate::state::AppState;

/// Query parameters understood on link URLs.
#[derive(Debug, Default, Deserialize)]
pub struct LinkQuery {
    /// Language for the preview metadata.
    lng: Option<String>,
}

/// Resolve the request path as a link and render the result.
pub async fn link_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    query: Result<Query<LinkQuery>, axum::extract::rejection::QueryRejection>,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, HeaderValue::from_static("GET, HEAD"))],
        )
            .into_response();
    }

    let query = query.map(|Query(q)| q).unwrap_or_default();
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());

    resolve::resolve(&state, target, query.lng.as_deref())
        .await
        .into_response()
}
