//! HTML templates and closed `{{placeholder}}` substitution.
//!
//! Templates are plain HTML with `{{key}}` tokens. Each [`TemplateId`] owns a
//! fixed allow-list of keys; [`substitute`] replaces a token only when its key
//! is on that list *and* present in the [`RenderContext`]. Everything else is
//! copied through untouched, so templates may carry unused tokens safely.
//!
//! Substitution is a single left-to-right pass. Inserted values are never
//! scanned again, which keeps a value like `"{{title}}"` from pulling in a
//! second substitution.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const LANDING_PLACEHOLDERS: &[&str] = &[
    "title",
    "description",
    "appStoreID",
    "androidBundleID",
    "androidScheme",
    "redirectToStore",
    "redirectUrl",
    "thumbnail",
    "statusImage",
    "backgroundImage",
    "flPoweredImage",
];

const NOT_FOUND_PLACEHOLDERS: &[&str] = &[
    "thumbnail",
    "notFoundImage",
    "backgroundImage",
    "flPoweredImage",
];

/// The HTML documents the server knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// Preview + redirect page for a live link.
    Landing,
    /// Page shown when no link matches the request path.
    NotFound,
}

impl TemplateId {
    pub const ALL: [Self; 2] = [Self::Landing, Self::NotFound];

    /// Short name used in logs and configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::NotFound => "not-found",
        }
    }

    /// File name of the template inside a template directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Landing => "index.html",
            Self::NotFound => "404.html",
        }
    }

    /// Keys this template is allowed to substitute.
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            Self::Landing => LANDING_PLACEHOLDERS,
            Self::NotFound => NOT_FOUND_PLACEHOLDERS,
        }
    }

    /// The default template text compiled into the binary.
    pub fn embedded(self) -> &'static str {
        match self {
            Self::Landing => include_str!("../templates/index.html"),
            Self::NotFound => include_str!("../templates/404.html"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateId {
    type Err = Error;

    /// Accepts either the short name or the file name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s || id.file_name() == s)
            .ok_or_else(|| Error::UnknownTemplate(s.to_string()))
    }
}

/// Per-request placeholder values. Built fresh for every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: BTreeMap<&'static str, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, builder style.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Substitute the placeholders of `template` (the raw text of `id`) from `context`.
pub fn substitute(template: &str, id: TemplateId, context: &RenderContext) -> String {
    let allowed = id.placeholders();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        match match_placeholder(tail, allowed, context) {
            Some((token_len, value)) => {
                out.push_str(value);
                rest = &tail[token_len..];
            }
            None => {
                // Step over one brace so `{{{key}}}` still finds the inner token.
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// `tail` starts with `{{`. Returns the token length and replacement value
/// when the token names an allowed key that the context provides.
fn match_placeholder<'c>(
    tail: &str,
    allowed: &[&str],
    context: &'c RenderContext,
) -> Option<(usize, &'c str)> {
    let inner = &tail[2..];
    let end = inner.find("}}")?;
    let key = &inner[..end];

    if !allowed.contains(&key) {
        return None;
    }

    context.get(key).map(|value| (end + 4, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let ctx = RenderContext::new().with("title", "Hi");
        let out = substitute(
            "<title>{{title}}</title><h1>{{title}}</h1>",
            TemplateId::Landing,
            &ctx,
        );
        assert_eq!(out, "<title>Hi</title><h1>Hi</h1>");
    }

    #[test]
    fn test_unknown_key_left_intact() {
        let ctx = RenderContext::new().with("title", "Hi");
        let out = substitute("{{title}} {{unknownKey}}", TemplateId::Landing, &ctx);
        assert_eq!(out, "Hi {{unknownKey}}");
    }

    #[test]
    fn test_allowed_key_missing_from_context_left_intact() {
        let ctx = RenderContext::new();
        let out = substitute("<p>{{description}}</p>", TemplateId::Landing, &ctx);
        assert_eq!(out, "<p>{{description}}</p>");
    }

    #[test]
    fn test_key_outside_allow_list_not_substituted() {
        // `title` is only valid for the landing page.
        let ctx = RenderContext::new()
            .with("title", "Hi")
            .with("thumbnail", "https://x/t.jpg");
        let out = substitute("{{title}}|{{thumbnail}}", TemplateId::NotFound, &ctx);
        assert_eq!(out, "{{title}}|https://x/t.jpg");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let ctx = RenderContext::new()
            .with("title", "{{description}}")
            .with("description", "leaked");
        let out = substitute("{{title}}", TemplateId::Landing, &ctx);
        assert_eq!(out, "{{description}}");
    }

    #[test]
    fn test_triple_braces() {
        let ctx = RenderContext::new().with("title", "Hi");
        let out = substitute("{{{title}}}", TemplateId::Landing, &ctx);
        assert_eq!(out, "{Hi}");
    }

    #[test]
    fn test_unterminated_token() {
        let ctx = RenderContext::new().with("title", "Hi");
        let out = substitute("a {{title", TemplateId::Landing, &ctx);
        assert_eq!(out, "a {{title");
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let ctx = RenderContext::new().with("title", "Grüße");
        let out = substitute("«{{title}}» — ✓", TemplateId::Landing, &ctx);
        assert_eq!(out, "«Grüße» — ✓");
    }

    #[test]
    fn test_deterministic() {
        let ctx = RenderContext::new()
            .with("title", "Hi")
            .with("redirectUrl", "https://example.com");
        let template = TemplateId::Landing.embedded();
        assert_eq!(
            substitute(template, TemplateId::Landing, &ctx),
            substitute(template, TemplateId::Landing, &ctx)
        );
    }

    #[test]
    fn test_embedded_templates_use_only_allowed_keys() {
        for id in TemplateId::ALL {
            let mut ctx = RenderContext::new();
            for key in id.placeholders() {
                ctx.insert(*key, "x");
            }
            let out = substitute(id.embedded(), id, &ctx);
            assert!(!out.contains("{{"), "{id} left a placeholder behind");
        }
    }

    #[test]
    fn test_template_id_from_str() {
        assert_eq!("landing".parse::<TemplateId>().unwrap(), TemplateId::Landing);
        assert_eq!("404.html".parse::<TemplateId>().unwrap(), TemplateId::NotFound);
        assert!("nope".parse::<TemplateId>().is_err());
    }
}
