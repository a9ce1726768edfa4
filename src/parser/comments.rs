use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use serde::Serialize;
use tracing::debug;

use super::sanitize::sanitize;
use crate::dom::ContentTree;
use crate::render::Renderer;

/// One entry of a post's comment feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comment {
    pub author: String,
    pub published: Option<String>,
    /// Sanitized body markup.
    pub body: String,
}

/// Render the comment feed at `path`. Any failure yields an empty string.
pub fn extract_comments(path: &Path, renderer: &Renderer) -> String {
    let comments = match read_feed(path) {
        Ok(comments) => comments,
        Err(e) => {
            debug!("Ignoring comment feed {}: {:#}", path.display(), e);
            return String::new();
        }
    };
    if comments.is_empty() {
        return String::new();
    }
    renderer.render_comments(&comments).unwrap_or_else(|e| {
        debug!("Comment template failed for {}: {}", path.display(), e);
        String::new()
    })
}

fn read_feed(path: &Path) -> Result<Vec<Comment>> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_feed(&xml)
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Author,
    Published,
    Description,
    Content,
}

/// Parse an RSS comment feed into comments, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<Comment>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut comments = Vec::new();
    let mut buf = Vec::new();

    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut author = String::new();
    let mut published = String::new();
    let mut description = String::new();
    let mut content = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    author.clear();
                    published.clear();
                    description.clear();
                    content.clear();
                }
                b"dc:creator" if in_item => field = Some(Field::Author),
                b"pubDate" if in_item => field = Some(Field::Published),
                b"description" if in_item => field = Some(Field::Description),
                b"content:encoded" if in_item => field = Some(Field::Content),
                _ => {}
            },
            Event::Text(e) if field.is_some() => {
                let text = e.unescape()?;
                push_field(field, &text, &mut author, &mut published, &mut description, &mut content);
            }
            Event::CData(e) if field.is_some() => {
                let text = String::from_utf8_lossy(&e);
                push_field(field, &text, &mut author, &mut published, &mut description, &mut content);
            }
            Event::End(e) => match e.name().as_ref() {
                b"item" if in_item => {
                    in_item = false;
                    let body = if content.trim().is_empty() {
                        &description
                    } else {
                        &content
                    };
                    comments.push(Comment {
                        author: author.trim().to_string(),
                        published: Some(published.trim().to_string()).filter(|p| !p.is_empty()),
                        body: clean_body(body),
                    });
                }
                b"dc:creator" | b"pubDate" | b"description" | b"content:encoded" => field = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(comments)
}

fn push_field(
    field: Option<Field>,
    text: &str,
    author: &mut String,
    published: &mut String,
    description: &mut String,
    content: &mut String,
) {
    match field {
        Some(Field::Author) => author.push_str(text),
        Some(Field::Published) => published.push_str(text),
        Some(Field::Description) => description.push_str(text),
        Some(Field::Content) => content.push_str(text),
        None => {}
    }
}

/// Comment bodies are site markup too; run them through the sanitizer.
fn clean_body(markup: &str) -> String {
    let mut tree = ContentTree::parse_fragment(&format!("<div>{}</div>", markup.trim()));
    let root = tree.root();
    sanitize(&mut tree, root);
    tree.inner_html(root)
}
