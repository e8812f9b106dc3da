//! Template loading.
//!
//! Raw template text comes either from the copies compiled into
//! `flowlinks-core` or from a directory on disk. Disk reads are cached in a
//! small moka cache so each file is read at most once per TTL.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use flowlinks_core::{RenderContext, TemplateId, substitute};

use crate::error::TemplateError;

/// How long a template read from disk is reused before it is read again.
const TEMPLATE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Where template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Built-in templates.
    Embedded,
    /// `index.html` and `404.html` inside this directory.
    Directory(PathBuf),
}

/// Loads and renders the HTML templates.
#[derive(Clone)]
pub struct Templates {
    source: TemplateSource,
    cache: Cache<TemplateId, Arc<str>>,
}

impl Templates {
    pub fn new(source: TemplateSource) -> Self {
        let cache = Cache::builder()
            .max_capacity(TemplateId::ALL.len() as u64)
            .time_to_live(TEMPLATE_CACHE_TTL)
            .build();

        Self { source, cache }
    }

    pub fn embedded() -> Self {
        Self::new(TemplateSource::Embedded)
    }

    /// Use `dir` when given, otherwise the built-in templates.
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        Self::new(dir.map_or(TemplateSource::Embedded, TemplateSource::Directory))
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Raw text of template `id`.
    pub async fn load(&self, id: TemplateId) -> Result<Arc<str>, TemplateError> {
        let dir = match &self.source {
            TemplateSource::Embedded => return Ok(Arc::from(id.embedded())),
            TemplateSource::Directory(dir) => dir,
        };

        if let Some(text) = self.cache.get(&id).await {
            return Ok(text);
        }

        let path = dir.join(id.file_name());
        tracing::debug!(template = %id, path = %path.display(), "loading template from disk");

        let text: Arc<str> = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TemplateError::Load {
                template: id,
                source,
            })?
            .into();

        self.cache.insert(id, Arc::clone(&text)).await;
        Ok(text)
    }

    /// Load template `id` and substitute its placeholders from `context`.
    pub async fn render(
        &self,
        id: TemplateId,
        context: &RenderContext,
    ) -> Result<String, TemplateError> {
        let raw = self.load(id).await?;
        Ok(substitute(&raw, id, context))
    }
}
