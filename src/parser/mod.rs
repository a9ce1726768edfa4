pub mod breadcrumbs;
pub mod comments;
pub mod qa;
pub mod sanitize;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, info};

use crate::dom::ContentTree;
use crate::render::Renderer;
use qa::QaPair;

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#betterdocs-entry-title").unwrap());
static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#betterdocs-single-content").unwrap());

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render {path}")]
    Render {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },
}

/// One FAQ article recovered from a mirrored page.
#[derive(Debug, Default)]
pub struct Article {
    pub question: String,
    pub answer: String,
    pub qa_list: Vec<QaPair>,
    pub topic: Option<String>,
    pub category: Option<String>,
    pub comments: String,
}

/// Parse → sanitize → extract for the page at `path`.
pub fn assemble(path: &Path, renderer: &Renderer) -> Result<Article, PageError> {
    let html = std::fs::read_to_string(path).map_err(|source| PageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("  - {}", path.display());

    let mut article = parse_article(&html);

    let feed = path
        .parent()
        .map(|dir| dir.join("feed").join("index.html"));
    if let Some(feed) = feed.filter(|f| f.is_file()) {
        article.comments = comments::extract_comments(&feed, renderer);
    }
    Ok(article)
}

/// Everything that only depends on the page markup.
pub fn parse_article(html: &str) -> Article {
    let document = Html::parse_document(html);

    let question = document
        .select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let (topic, category) = breadcrumbs::resolve(breadcrumbs::collect(&document));

    let (answer, qa_list) = match ContentTree::select(document, &CONTENT_SEL) {
        Some(mut content) => {
            let root = content.root();
            sanitize::sanitize(&mut content, root);
            let qa_list = qa::extract_qa(&content);
            (content.to_html(), qa_list)
        }
        None => {
            debug!("No article content found");
            (String::new(), Vec::new())
        }
    };

    Article {
        question,
        answer,
        qa_list,
        topic,
        category,
        comments: String::new(),
    }
}

/// Assemble and render the page at `path` to a full HTML document.
pub fn render_page(path: &Path, renderer: &Renderer) -> Result<String, PageError> {
    let article = assemble(path, renderer)?;
    renderer
        .render_article(&article)
        .map_err(|source| PageError::Render {
            path: path.to_path_buf(),
            source,
        })
}

// ── Tests ──
