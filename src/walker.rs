use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::parser;
use crate::render::Renderer;

/// Mirror entries that never hold an article.
const RESERVED: &[&str] = &["feed", "index.html", "faq.html"];

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotAnArticle,
    MissingPage,
}

#[derive(Debug, Clone)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Rendered articles keyed by directory name, in listing order.
#[derive(Debug, Default)]
pub struct FaqCollection {
    pub articles: Vec<(String, String)>,
    pub skipped: Vec<Skipped>,
}

impl FaqCollection {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.articles
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, html)| html.as_str())
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        match reason {
            SkipReason::NotAnArticle => warn!("[SKIP: not an FAQ] {}", path.display()),
            SkipReason::MissingPage => warn!("[SKIP: file not found] {}", path.display()),
        }
        self.skipped.push(Skipped { path, reason });
    }
}

/// Render every `<root>/<id>/index.html` article. Skips are logged and
/// recorded; page read failures abort the walk.
pub fn walk(root: &Path, renderer: &Renderer) -> Result<FaqCollection> {
    let mut faq = FaqCollection::default();
    if !root.is_dir() {
        warn!("Directory not found: {}", root.display());
        return Ok(faq);
    }

    info!("{}", root.display());
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("listing {}", root.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if RESERVED.contains(&name.as_str()) {
            faq.skip(entry.path(), SkipReason::NotAnArticle);
            continue;
        }

        let page = entry.path().join("index.html");
        if !page.is_file() {
            faq.skip(page, SkipReason::MissingPage);
            continue;
        }

        let article = parser::render_page(&page, renderer)?;
        let article = article.trim();
        if !article.is_empty() {
            faq.articles.push((name, article.to_string()));
        }
    }
    Ok(faq)
}
