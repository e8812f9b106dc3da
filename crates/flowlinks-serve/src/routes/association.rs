//! Well-known app association endpoints.
//!
//! The documents are rebuilt from configuration on every request.

use axum::Json;
use axum::extract::State;
use flowlinks_core::{AppleAppSiteAssociation, AssetLink, android_association, ios_association};

use crate::state::AppState;

/// `GET /.well-known/apple-app-site-association`
pub async fn apple_app_site_association(
    State(state): State<AppState>,
) -> Json<AppleAppSiteAssociation> {
    Json(ios_association(&state.config.association()))
}

/// `GET /.well-known/assetlinks.json`
pub async fn asset_links(State(state): State<AppState>) -> Json<Vec<AssetLink>> {
    Json(android_association(&state.config.association()))
}
