//! Well-known association documents for app links.
//!
//! - `/.well-known/apple-app-site-association` (iOS universal links)
//! - `/.well-known/assetlinks.json` (Android app links)
//!
//! Both documents are a pure function of [`AssociationConfig`].

use serde::Serialize;

/// Relation granted to the Android app for every URL on the domain.
pub const HANDLE_ALL_URLS: &str = "delegate_permission/common.handle_all_urls";

/// Identifiers the mobile platforms need to verify an app's claim on the domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationConfig {
    pub ios_team_id: String,
    pub ios_bundle_id: String,
    pub android_package: String,
    /// SHA-256 fingerprints of the Android signing certificates.
    pub android_fingerprints: Vec<String>,
}

impl AssociationConfig {
    /// iOS application identifier, `{teamID}.{bundleID}`.
    pub fn ios_app_id(&self) -> String {
        format!("{}.{}", self.ios_team_id, self.ios_bundle_id)
    }
}

/// Root of the `apple-app-site-association` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppleAppSiteAssociation {
    pub applinks: AppLinks,
    pub webcredentials: WebCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppLinks {
    /// Always empty; required by older iOS versions.
    pub apps: Vec<String>,
    pub details: Vec<AppLinkDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppLinkDetail {
    #[serde(rename = "appID")]
    pub app_id: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebCredentials {
    pub apps: Vec<String>,
}

/// One statement of an `assetlinks.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetLink {
    pub relation: Vec<String>,
    pub target: AndroidTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidTarget {
    pub namespace: String,
    pub package_name: String,
    pub sha256_cert_fingerprints: Vec<String>,
}

/// Build the iOS association document. Every path on the domain is claimed.
pub fn ios_association(config: &AssociationConfig) -> AppleAppSiteAssociation {
    let app_id = config.ios_app_id();

    AppleAppSiteAssociation {
        applinks: AppLinks {
            apps: Vec::new(),
            details: vec![AppLinkDetail {
                app_id: app_id.clone(),
                paths: vec!["*".to_string()],
            }],
        },
        webcredentials: WebCredentials { apps: vec![app_id] },
    }
}

/// Build the Android association document: a single statement for the
/// configured package, with each fingerprint trimmed of surrounding whitespace.
pub fn android_association(config: &AssociationConfig) -> Vec<AssetLink> {
    let fingerprints = config
        .android_fingerprints
        .iter()
        .map(|sha| sha.trim().to_string())
        .collect();

    vec![AssetLink {
        relation: vec![HANDLE_ALL_URLS.to_string()],
        target: AndroidTarget {
            namespace: "android_app".to_string(),
            package_name: config.android_package.clone(),
            sha256_cert_fingerprints: fingerprints,
        },
    }]
}
