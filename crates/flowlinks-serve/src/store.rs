//! Link store clients.
//!
//! The resolver only sees the [`LinkStore`] trait. Production reads from a
//! ClickHouse table; tests and local development use [`MemoryLinkStore`].
//!
//! Lookups are exact path matches and return the first matching record.
//! "Not found" is `Ok(None)`; an unreachable store is an `Err`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clickhouse::Client;
use serde::Deserialize;

use flowlinks_core::{LinkRecord, OgMetadata};

use crate::config::Config;
use crate::error::StoreError;

/// Read-only access to stored link records.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Find the first record whose `path` equals `path` exactly.
    async fn find_by_path(&self, path: &str) -> Result<Option<LinkRecord>, StoreError>;
}

/// A row from the links table.
#[derive(Debug, Clone, Deserialize, clickhouse::Row)]
struct LinkRow {
    path: String,
    redirect_to_store: bool,
    redirect_url: String,
    /// Expiry as Unix epoch milliseconds.
    expires_ms: Option<i64>,
    /// JSON document `{"title": {lang: text}, "description": …, "image": …}`.
    og: String,
}

impl LinkRow {
    fn into_record(self) -> LinkRecord {
        let og = match OgMetadata::parse_json(&self.og) {
            Ok(og) => og,
            Err(e) => {
                tracing::warn!(
                    path = %self.path,
                    error = %e,
                    "malformed og metadata, rendering without it"
                );
                OgMetadata::default()
            }
        };

        let expires = self.expires_ms.and_then(|ms| {
            let parsed = DateTime::<Utc>::from_timestamp_millis(ms);
            if parsed.is_none() {
                tracing::warn!(path = %self.path, expires_ms = ms, "expiry out of range, ignoring");
            }
            parsed
        });

        LinkRecord {
            path: self.path,
            redirect_to_store: self.redirect_to_store,
            redirect_url: self.redirect_url,
            expires,
            og,
        }
    }
}

/// Link store backed by a ClickHouse table.
#[derive(Clone)]
pub struct ClickHouseLinkStore {
    client: Client,
    table: String,
}

impl ClickHouseLinkStore {
    /// `table` must already be validated as a plain identifier (see [`Config::from_env`]).
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        Self::new(client, &config.links_table)
    }

    /// Create the links table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        self.client.query(&create_table_sql(&self.table)).execute().await?;
        tracing::info!(table = %self.table, "links table ready");
        Ok(())
    }
}

#[async_trait]
impl LinkStore for ClickHouseLinkStore {
    async fn find_by_path(&self, path: &str) -> Result<Option<LinkRecord>, StoreError> {
        let row = self
            .client
            .query(&select_by_path_sql(&self.table))
            .bind(path)
            .fetch_optional::<LinkRow>()
            .await?;

        Ok(row.map(LinkRow::into_record))
    }
}

fn select_by_path_sql(table: &str) -> String {
    format!(
        "SELECT path, redirect_to_store, redirect_url, expires_ms, og \
         FROM {table} \
         WHERE path = ? \
         ORDER BY created_at ASC \
         LIMIT 1"
    )
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} ( \
             path String, \
             redirect_to_store Bool DEFAULT false, \
             redirect_url String DEFAULT '', \
             expires_ms Nullable(Int64), \
             og String DEFAULT '{{}}', \
             created_at DateTime64(3) DEFAULT now64(3) \
         ) ENGINE = MergeTree \
         ORDER BY (path, created_at)"
    )
}

/// In-process link store. Records are matched in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinkStore {
    records: Vec<LinkRecord>,
}

impl MemoryLinkStore {
    pub fn new(records: Vec<LinkRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn find_by_path(&self, path: &str) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.records.iter().find(|r| r.path == path).cloned())
    }
}

/// The sample link every new site starts with.
pub fn welcome_link(config: &Config) -> LinkRecord {
    let mut record = LinkRecord::new("/welcome", "");
    record.og.title.insert("en", "Welcome to FlowLinks");
    record.og.description.insert("en", "Time to set them up!");
    record.og.image.insert("en", config.image_url("thumb.png"));
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryLinkStore {
        let mut first = LinkRecord::new("/promo", "https://example.com/first");
        first.og.title.insert("en", "First");
        let second = LinkRecord::new("/promo", "https://example.com/second");
        let other = LinkRecord::new("/Promo", "https://example.com/other");
        MemoryLinkStore::new(vec![first, second, other])
    }

    #[tokio::test]
    async fn memory_store_first_match_wins() {
        let found = store().find_by_path("/promo").await.unwrap().unwrap();
        assert_eq!(found.redirect_url, "https://example.com/first");
    }

    #[tokio::test]
    async fn memory_store_exact_match_only() {
        let store = store();
        assert!(store.find_by_path("/promo/").await.unwrap().is_none());
        assert!(store.find_by_path("/pro").await.unwrap().is_none());
        let upper = store.find_by_path("/Promo").await.unwrap().unwrap();
        assert_eq!(upper.redirect_url, "https://example.com/other");
    }

    #[tokio::test]
    async fn memory_store_empty() {
        let store = MemoryLinkStore::default();
        assert!(store.is_empty());
        assert!(store.find_by_path("/anything").await.unwrap().is_none());
    }

    #[test]
    fn row_conversion() {
        let row = LinkRow {
            path: "/sale".to_string(),
            redirect_to_store: true,
            redirect_url: String::new(),
            expires_ms: Some(1_700_000_000_000),
            og: r#"{"title":{"en":"Sale"}}"#.to_string(),
        };
        let record = row.into_record();
        assert_eq!(record.path, "/sale");
        assert!(record.redirect_to_store);
        assert_eq!(
            record.expires.map(|e| e.timestamp_millis()),
            Some(1_700_000_000_000)
        );
        assert_eq!(record.og.title.get_or_empty("en"), "Sale");
    }

    #[test]
    fn row_conversion_malformed_og() {
        let row = LinkRow {
            path: "/broken".to_string(),
            redirect_to_store: false,
            redirect_url: "https://example.com".to_string(),
            expires_ms: None,
            og: "{not json".to_string(),
        };
        let record = row.into_record();
        assert_eq!(record.og, OgMetadata::default());
        assert_eq!(record.expires, None);
    }

    #[test]
    fn select_sql_limits_to_first_row() {
        let sql = select_by_path_sql("flowlinks");
        assert!(sql.contains("FROM flowlinks"));
        assert!(sql.contains("WHERE path = ?"));
        assert!(sql.ends_with("LIMIT 1"));
    }

    #[test]
    fn create_table_sql_has_json_default() {
        let sql = create_table_sql("flowlinks");
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS flowlinks"));
        assert!(sql.contains("og String DEFAULT '{}'"));
    }

    #[test]
    fn welcome_link_uses_site_images() {
        let config = Config::default();
        let link = welcome_link(&config);
        assert_eq!(link.path, "/welcome");
        assert!(!link.redirect_to_store);
        assert_eq!(
            link.og.image.get_or_empty("en"),
            "https://flowlinks.web.app/images/thumb.png"
        );
    }
}
