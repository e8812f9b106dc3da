//! Route definitions for the link server.
//!
//! ## Routes
//!
//! - `GET /.well-known/apple-app-site-association` - iOS association (JSON)
//! - `GET /.well-known/assetlinks.json` - Android association (JSON)
//! - `GET /images/*` - Static assets
//! - anything else - Link resolution (landing page, 404 page)

mod association;
mod link;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the complete link server router.
pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.asset_dir);

    Router::new()
        .route(
            "/.well-known/apple-app-site-association",
            get(association::apple_app_site_association),
        )
        .route(
            "/.well-known/assetlinks.json",
            get(association::asset_links),
        )
        .nest_service("/images", assets)
        .fallback(link::link_handler)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use flowlinks_core::LinkRecord;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::store::MemoryLinkStore;

    fn config() -> Config {
        Config {
            hostname: "links.example.com".to_string(),
            ios_team_id: "ABCDE12345".to_string(),
            ios_bundle_id: "com.example.app".to_string(),
            ios_app_store_id: "987654".to_string(),
            android_bundle_id: "com.example.android".to_string(),
            android_shas: vec!["AA:BB".to_string(), "CC:DD".to_string()],
            ..Config::default()
        }
    }

    fn app() -> Router {
        let mut hello = LinkRecord::new("/hello", "https://example.com/landing");
        hello.og.title.insert("en", "Hi");
        let mut store_link = LinkRecord::new("/app", "");
        store_link.redirect_to_store = true;

        let store = MemoryLinkStore::new(vec![hello, store_link]);
        router(AppState::with_store(config(), Arc::new(store)))
    }

    async fn send(method: Method, uri: &str) -> Response {
        app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn apple_association_route() {
        let response = send(Method::GET, "/.well-known/apple-app-site-association").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            json["applinks"]["details"][0]["appID"],
            "ABCDE12345.com.example.app"
        );
        assert_eq!(json["applinks"]["details"][0]["paths"][0], "*");
        assert_eq!(json["webcredentials"]["apps"][0], "ABCDE12345.com.example.app");
    }

    #[tokio::test]
    async fn asset_links_route() {
        let response = send(Method::GET, "/.well-known/assetlinks.json").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        let statements = json.as_array().unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0]["target"]["package_name"], "com.example.android");
        assert_eq!(
            statements[0]["target"]["sha256_cert_fingerprints"],
            serde_json::json!(["AA:BB", "CC:DD"])
        );
    }

    #[tokio::test]
    async fn link_route_renders_landing_page() {
        let response = send(Method::GET, "/hello?lng=en").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = body_string(response).await;
        assert!(body.contains("<title>Hi</title>"));
        assert!(body.contains("https://example.com/landing"));
    }

    #[tokio::test]
    async fn link_route_store_redirect_carries_app_store_id() {
        let response = send(Method::GET, "/app").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"var appStoreID = "987654";"#));
        assert!(body.contains(r#"var redirectToStore = "true" === "true";"#));
    }

    #[tokio::test]
    async fn link_route_unknown_path_is_404() {
        let response = send(Method::GET, "/does-not-exist").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_string(response).await;
        assert!(body.contains("https://links.example.com/images/not-found.svg"));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn link_route_rejects_other_methods() {
        let response = send(Method::POST, "/hello").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn well_known_rejects_post() {
        let response = send(Method::POST, "/.well-known/assetlinks.json").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
