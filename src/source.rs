use std::fs;
use std::path::{Component, Path, PathBuf};

use gray_matter::engine::YAML;
use gray_matter::{Matter, ParsedEntity};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{RelatedError, Result};

/// file extensions picked up by `discover`
pub const SOURCE_EXTENSIONS: &[&str] = &["md", "markdown", "txt", "html"];

/// A document read from disk, ready for `RelatedEngine::add_document`
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub url: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: Option<String>,
}

/// Every source file under `root`, in sorted walk order
///
/// Symlinks are not followed. Entries whose name starts with `_` or `.`
/// (layouts, includes, hidden files) are skipped along with their contents.
pub fn discover(root: impl AsRef<Path>) -> Result<Vec<SourceDocument>> {
    let root = root.as_ref();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_private(e));

    let mut documents = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            RelatedError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() || !has_source_extension(entry.path()) {
            continue;
        }
        let path = entry.path();
        let raw = fs::read_to_string(path).map_err(|e| RelatedError::io(path, e))?;
        let relative = path.strip_prefix(root).unwrap_or(path);
        let doc = parse_document(path, url_for(relative), &raw);
        debug!(path = %doc.path.display(), url = %doc.url, "source discovered");
        documents.push(doc);
    }
    Ok(documents)
}

fn is_private(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('_') || name.starts_with('.'))
        .unwrap_or(false)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// `/dir/name.html` for a path relative to the source root
pub fn url_for(relative: &Path) -> String {
    let html = relative.with_extension("html");
    let parts: Vec<String> = html
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

/// first non-empty line, leading `#` stripped
fn heading_title(body: &str) -> Option<String> {
    body.lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn parse_document(path: &Path, url: String, raw: &str) -> SourceDocument {
    let matter = Matter::<YAML>::new();
    let (front_title, body) = match matter.parse::<FrontMatter>(raw) {
        Ok(ParsedEntity { data, content, .. }) => (data.and_then(|fm| fm.title), content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable front matter");
            (None, raw.to_string())
        }
    };
    let title = front_title
        .or_else(|| heading_title(&body))
        .unwrap_or_else(|| url.clone());
    SourceDocument {
        path: path.to_path_buf(),
        url,
        title,
        content: body,
    }
}
