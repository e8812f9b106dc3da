//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use flowlinks_core::{AssociationConfig, DEFAULT_LOCALE};

/// Application configuration.
///
/// Built once at startup and shared read-only with every request.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// ClickHouse connection URL.
    pub clickhouse_url: String,

    /// ClickHouse database name.
    pub clickhouse_database: String,

    /// Table holding link records.
    pub links_table: String,

    /// Create the links table on startup if it does not exist.
    pub init_schema: bool,

    /// Hosting project identifier.
    pub project_id: String,

    /// Hosting site identifier.
    pub site_id: String,

    /// Public hostname used to build absolute asset URLs.
    pub hostname: String,

    pub ios_bundle_id: String,
    pub ios_team_id: String,

    /// Numeric App Store id, used when a link redirects to the store.
    pub ios_app_store_id: String,

    pub android_bundle_id: String,

    /// SHA-256 signing certificate fingerprints, already trimmed.
    pub android_shas: Vec<String>,

    /// Custom URL scheme of the Android app, if it has one.
    pub android_scheme: Option<String>,

    /// Language used when a request does not name one.
    pub default_locale: String,

    /// Directory to load HTML templates from. `None` uses the built-in ones.
    pub template_dir: Option<PathBuf>,

    /// Directory served under `/images`.
    pub asset_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let site_id = "flowlinks".to_string();
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            clickhouse_url: "http://localhost:8123".to_string(),
            clickhouse_database: "default".to_string(),
            links_table: "flowlinks".to_string(),
            init_schema: false,
            project_id: String::new(),
            hostname: format!("{site_id}.web.app"),
            site_id,
            ios_bundle_id: String::new(),
            ios_team_id: String::new(),
            ios_app_store_id: String::new(),
            android_bundle_id: String::new(),
            android_shas: Vec::new(),
            android_scheme: None,
            default_locale: DEFAULT_LOCALE.to_string(),
            template_dir: None,
            asset_dir: PathBuf::from("assets/images"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `FLOWLINKS_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `CLICKHOUSE_URL`: ClickHouse URL (default: "http://localhost:8123")
    /// - `CLICKHOUSE_DATABASE`: Database name (default: "default")
    /// - `FLOWLINKS_TABLE`: Links table (default: "flowlinks")
    /// - `FLOWLINKS_INIT_SCHEMA`: Create the links table at startup (default: false)
    /// - `PROJECT_ID`: Hosting project id
    /// - `FLOWLINKS_SITE_ID`: Hosting site id (default: "flowlinks")
    /// - `FLOWLINKS_HOSTNAME`: Public hostname (default: "{site_id}.web.app")
    /// - `IOS_BUNDLE_ID`, `IOS_TEAM_ID`, `IOS_APPSTORE_ID`: iOS app identifiers
    /// - `ANDROID_BUNDLE_ID`: Android package name
    /// - `ANDROID_SHAS`: Comma-separated signing certificate fingerprints
    /// - `ANDROID_SCHEME`: Android custom URL scheme
    /// - `FLOWLINKS_DEFAULT_LOCALE`: Fallback language code (default: "de")
    /// - `FLOWLINKS_TEMPLATE_DIR`: Directory with `index.html` and `404.html`
    /// - `FLOWLINKS_ASSET_DIR`: Directory served under `/images` (default: "assets/images")
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = env_or("FLOWLINKS_BIND_ADDR", defaults.bind_addr);
        let clickhouse_url = env_or("CLICKHOUSE_URL", defaults.clickhouse_url);
        let clickhouse_database = env_or("CLICKHOUSE_DATABASE", defaults.clickhouse_database);

        let links_table = env_or("FLOWLINKS_TABLE", defaults.links_table);
        if links_table.is_empty()
            || !links_table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            anyhow::bail!("FLOWLINKS_TABLE must only contain letters, digits and '_'");
        }

        let init_schema = match std::env::var("FLOWLINKS_INIT_SCHEMA") {
            Ok(v) => v
                .trim()
                .parse::<bool>()
                .map_err(|_| anyhow::anyhow!("FLOWLINKS_INIT_SCHEMA must be true or false"))?,
            Err(_) => defaults.init_schema,
        };

        let project_id = env_or("PROJECT_ID", defaults.project_id);
        let site_id = env_or("FLOWLINKS_SITE_ID", defaults.site_id);
        let hostname = std::env::var("FLOWLINKS_HOSTNAME")
            .ok()
            .map(|h| h.trim().trim_end_matches('/').to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| format!("{site_id}.web.app"));

        let ios_bundle_id = env_or("IOS_BUNDLE_ID", defaults.ios_bundle_id);
        let ios_team_id = env_or("IOS_TEAM_ID", defaults.ios_team_id);
        let ios_app_store_id = env_or("IOS_APPSTORE_ID", defaults.ios_app_store_id);

        let android_bundle_id = env_or("ANDROID_BUNDLE_ID", defaults.android_bundle_id);
        let android_shas: Vec<String> = std::env::var("ANDROID_SHAS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let android_scheme = std::env::var("ANDROID_SCHEME")
            .ok()
            .filter(|s| !s.is_empty());

        let default_locale = std::env::var("FLOWLINKS_DEFAULT_LOCALE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_locale);

        let template_dir = std::env::var("FLOWLINKS_TEMPLATE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let asset_dir = std::env::var("FLOWLINKS_ASSET_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map_or(defaults.asset_dir, PathBuf::from);

        tracing::info!(
            bind_addr = %bind_addr,
            clickhouse_url = %clickhouse_url,
            links_table = %links_table,
            project_id = %project_id,
            site_id = %site_id,
            hostname = %hostname,
            android_sha_count = android_shas.len(),
            default_locale = %default_locale,
            template_dir = ?template_dir,
            "flowlinks configuration loaded"
        );

        Ok(Self {
            bind_addr,
            clickhouse_url,
            clickhouse_database,
            links_table,
            init_schema,
            project_id,
            site_id,
            hostname,
            ios_bundle_id,
            ios_team_id,
            ios_app_store_id,
            android_bundle_id,
            android_shas,
            android_scheme,
            default_locale,
            template_dir,
            asset_dir,
        })
    }

    /// Identifiers for the well-known association documents.
    pub fn association(&self) -> AssociationConfig {
        AssociationConfig {
            ios_team_id: self.ios_team_id.clone(),
            ios_bundle_id: self.ios_bundle_id.clone(),
            android_package: self.android_bundle_id.clone(),
            android_fingerprints: self.android_shas.clone(),
        }
    }

    /// Absolute URL of a file served under `/images`.
    pub fn image_url(&self, file: &str) -> String {
        format!("https://{}/images/{file}", self.hostname)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}
