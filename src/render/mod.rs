use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{RelatedError, Result};
use crate::vectorizer::related::{RelatedEntry, RelatedPosts};

/// placeholder replaced by the rendered fragment
pub const DEFAULT_MARKER: &str = "<related-posts />";

/// file looked up in a site's layouts directory
pub const TEMPLATE_FILE: &str = "related.html";

/// Built-in list template, used when a site ships no `related.html`
///
/// Templates see `related_posts` (entries with `score`, `url`, `title`)
/// and `count`.
pub const DEFAULT_TEMPLATE: &str = concat!(
    "{{#if related_posts}}<ul class=\"related-posts\">\n",
    "{{#each related_posts}}  <li><a href=\"{{url}}\">{{title}}</a></li>\n",
    "{{/each}}</ul>{{/if}}",
);

const TEMPLATE_NAME: &str = "related";

/// Turns one related-list into an output fragment
pub trait Renderer {
    fn render(&self, entries: &[RelatedEntry]) -> Result<String>;
}

impl<F> Renderer for F
where
    F: Fn(&[RelatedEntry]) -> Result<String>,
{
    fn render(&self, entries: &[RelatedEntry]) -> Result<String> {
        self(entries)
    }
}

/// Handlebars renderer; values are HTML-escaped by the engine
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer").finish_non_exhaustive()
    }
}

impl TemplateRenderer {
    /// renderer for the built-in template
    pub fn new() -> Result<Self> {
        Self::from_template_str(DEFAULT_TEMPLATE)
    }

    pub fn from_template_str(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| RelatedError::Render(e.to_string()))?;
        Ok(Self { handlebars })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let template = fs::read_to_string(path).map_err(|e| RelatedError::io(path, e))?;
        debug!(path = %path.display(), "template loaded");
        Self::from_template_str(&template)
    }

    /// `layouts_dir/related.html` when the site has one, the built-in template otherwise
    pub fn for_layouts(layouts_dir: impl AsRef<Path>) -> Result<Self> {
        let site_file = layouts_dir.as_ref().join(TEMPLATE_FILE);
        if site_file.is_file() {
            Self::from_file(site_file)
        } else {
            Self::new()
        }
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, entries: &[RelatedEntry]) -> Result<String> {
        let data = json!({
            "related_posts": entries,
            "count": entries.len(),
        });
        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| RelatedError::Render(e.to_string()))
    }
}

/// Splices rendered fragments into an already written site
#[derive(Debug, Clone)]
pub struct SiteWriter {
    destination: PathBuf,
    marker: String,
}

/// one output file, read and spliced, not yet written
struct PendingWrite {
    path: PathBuf,
    spliced: Option<String>,
}

impl SiteWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// output file for a document url; directories resolve to their `index.html`
    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = self.destination.join(url.trim_start_matches('/'));
        if path.is_dir() {
            path.join("index.html")
        } else {
            path
        }
    }

    /// `rendered` with every marker replaced, `None` when it has no marker
    pub fn splice(&self, rendered: &str, fragment: &str) -> Option<String> {
        rendered
            .contains(&self.marker)
            .then(|| rendered.replace(&self.marker, fragment))
    }

    /// Render, resolve and read every output file, then write them all
    ///
    /// Renderer errors and unreadable files surface before the first write.
    /// Returns the number of files that contained the marker.
    pub fn write_all<R>(&self, posts: &RelatedPosts, renderer: &R) -> Result<usize>
    where
        R: Renderer + ?Sized,
    {
        let pending = posts
            .iter()
            .map(|list| {
                let fragment = renderer.render(&list.related)?;
                let path = self.resolve(&list.url);
                let rendered = fs::read_to_string(&path).map_err(|e| RelatedError::io(&path, e))?;
                Ok(PendingWrite {
                    spliced: self.splice(&rendered, &fragment),
                    path,
                })
            })
            .collect::<Result<Vec<PendingWrite>>>()?;

        let mut written = 0;
        for write in pending {
            match write.spliced {
                Some(spliced) => {
                    fs::write(&write.path, spliced).map_err(|e| RelatedError::io(&write.path, e))?;
                    debug!(path = %write.path.display(), "related list spliced");
                    written += 1;
                }
                None => warn!(path = %write.path.display(), marker = %self.marker, "no marker in output file"),
            }
        }
        Ok(written)
    }
}
