//! FlowLinks Serve - resolves short link paths to platform-aware landing pages.
//!
//! # Architecture
//!
//! - **Store**: Looks up the [`LinkRecord`](flowlinks_core::LinkRecord) for a path (ClickHouse or in-memory)
//! - **Templates**: Loads the landing / not-found HTML and substitutes `{{placeholders}}`
//! - **Resolve**: Path parsing, expiry, locale selection and rendering
//! - **Routes**: Well-known association files, static images, catch-all link handler
//!
//! # URL Pattern
//!
//! ```text
//! GET /{link_path}?lng={language}
//! ```
//!
//! The landing page carries Open Graph tags for social previews and a small
//! script that sends the visitor to the app store, the Android app or the
//! link's redirect URL depending on platform.

pub mod config;
pub mod error;
pub mod resolve;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
