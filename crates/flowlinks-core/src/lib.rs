//! Core types and pure rendering logic for FlowLinks.
//!
//! This crate provides:
//! - The stored link model ([`LinkRecord`]) with localized Open Graph metadata
//! - Well-known association documents for iOS universal links and Android app links
//! - Template identifiers and closed `{{placeholder}}` substitution
//! - Shared error types
//!
//! Nothing in here performs I/O. Loading records and template files is the
//! job of `flowlinks-serve`.

pub mod association;
mod error;
pub mod link;
pub mod template;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Language code used when a request does not ask for one.
pub const DEFAULT_LOCALE: &str = "de";

/// Synthetic base used to parse request targets. Only the path survives.
pub const REQUEST_BASE_URL: &str = "https://flowlinks";

pub use association::{
    AndroidTarget, AppLinkDetail, AppLinks, AppleAppSiteAssociation, AssetLink,
    AssociationConfig, WebCredentials, android_association, ios_association,
};
pub use error::{Error, Result};
pub use link::{LinkRecord, LocalizedOg, LocalizedText, OgMetadata};
pub use template::{RenderContext, TemplateId, substitute};
