//! Link resolution: request path → stored link → rendered page.
//!
//! Outcomes:
//! - live link → 200 landing page, `Cache-Control: no-cache`
//! - expired link → 200 with an empty body
//! - no link → 404 not-found page
//! - store or template failure → 500, detail logged only

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use url::Url;

use flowlinks_core::{LinkRecord, REQUEST_BASE_URL, RenderContext, TemplateId};

use crate::config::Config;
use crate::error::ResolveError;
use crate::state::AppState;

/// Body of every 500 response.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// What a lookup produced, before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Rendered landing page.
    Found(String),
    /// The link exists but its expiry has passed.
    Expired,
    /// No link has this path.
    NotFound,
}

/// Final status, body and caching policy for a link request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub status: StatusCode,
    pub body: String,
    /// Send `Cache-Control: no-cache`.
    pub no_cache: bool,
}

impl RenderedResponse {
    fn page(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            no_cache: true,
        }
    }

    fn not_found(body: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body,
            no_cache: false,
        }
    }

    fn internal_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: INTERNAL_ERROR_BODY.to_string(),
            no_cache: false,
        }
    }
}

impl IntoResponse for RenderedResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        let content_type = if self.status.is_server_error() {
            "text/plain; charset=utf-8"
        } else {
            "text/html; charset=utf-8"
        };
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        if self.no_cache {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }

        (self.status, headers, self.body).into_response()
    }
}

/// Resolve a request target (path plus optional query) as of now.
pub async fn resolve(
    state: &AppState,
    request_target: &str,
    requested_locale: Option<&str>,
) -> RenderedResponse {
    resolve_at(state, request_target, requested_locale, Utc::now()).await
}

/// Resolve a request target, judging expiry against `now`.
///
/// Never fails: every internal error becomes a logged 500.
pub async fn resolve_at(
    state: &AppState,
    request_target: &str,
    requested_locale: Option<&str>,
    now: DateTime<Utc>,
) -> RenderedResponse {
    let outcome = match lookup(state, request_target, requested_locale, now).await {
        Ok(Resolution::Found(html)) => Ok(RenderedResponse::page(html)),
        Ok(Resolution::Expired) => Ok(RenderedResponse::page(String::new())),
        Ok(Resolution::NotFound) => render_not_found(state)
            .await
            .map(RenderedResponse::not_found),
        Err(e) => Err(e),
    };

    outcome.unwrap_or_else(|e| {
        tracing::error!(target_path = %request_target, error = %e, "error processing link");
        RenderedResponse::internal_error()
    })
}

/// Look up and render a link without turning failures into responses.
pub async fn lookup(
    state: &AppState,
    request_target: &str,
    requested_locale: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Resolution, ResolveError> {
    let Some(path) = request_path(request_target) else {
        tracing::debug!(target_path = %request_target, "unparseable request target");
        return Ok(Resolution::NotFound);
    };

    let Some(record) = state.store.find_by_path(&path).await? else {
        tracing::debug!(path = %path, "no link for path");
        return Ok(Resolution::NotFound);
    };

    if record.is_expired_at(now) {
        tracing::debug!(path = %path, expires = ?record.expires, "link expired");
        return Ok(Resolution::Expired);
    }

    let lang = select_locale(requested_locale, &state.config.default_locale);
    let context = landing_context(&state.config, &record, lang);

    tracing::debug!(
        path = %path,
        lang = %lang,
        title = context.get("title").unwrap_or_default(),
        "rendering landing page"
    );

    let html = state.templates.render(TemplateId::Landing, &context).await?;
    Ok(Resolution::Found(html))
}

/// Path component of `request_target`, parsed against a fixed base.
///
/// The query string and fragment are dropped; dot segments and percent
/// encoding are normalized the way a browser would.
pub fn request_path(request_target: &str) -> Option<String> {
    let base = Url::parse(REQUEST_BASE_URL).ok()?;
    base.join(request_target)
        .ok()
        .map(|url| url.path().to_string())
}

/// The requested language when one was given, else `default_locale`.
pub fn select_locale<'a>(requested: Option<&'a str>, default_locale: &'a str) -> &'a str {
    requested
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(default_locale)
}

/// Placeholder values for the landing page of `record` in `lang`.
pub fn landing_context(config: &Config, record: &LinkRecord, lang: &str) -> RenderContext {
    let og = record.og.localized(lang);

    let app_store_id = if record.redirect_to_store {
        config.ios_app_store_id.as_str()
    } else {
        ""
    };

    RenderContext::new()
        .with("title", og.title)
        .with("description", og.description)
        .with("appStoreID", app_store_id)
        .with("androidBundleID", config.android_bundle_id.as_str())
        .with(
            "androidScheme",
            config.android_scheme.as_deref().unwrap_or("false"),
        )
        .with("redirectToStore", record.redirect_to_store.to_string())
        .with("redirectUrl", record.redirect_url.as_str())
        .with("thumbnail", og.image)
        .with("statusImage", config.image_url("status.svg"))
        .with("backgroundImage", config.image_url("background.png"))
        .with("flPoweredImage", config.image_url("fl-powered.svg"))
}

/// Placeholder values for the not-found page. Images only.
pub fn not_found_context(config: &Config) -> RenderContext {
    RenderContext::new()
        .with("thumbnail", config.image_url("404-thumb.png"))
        .with("notFoundImage", config.image_url("not-found.svg"))
        .with("backgroundImage", config.image_url("background.png"))
        .with("flPoweredImage", config.image_url("fl-powered.svg"))
}

async fn render_not_found(state: &AppState) -> Result<String, ResolveError> {
    let context = not_found_context(&state.config);
    Ok(state.templates.render(TemplateId::NotFound, &context).await?)
}
