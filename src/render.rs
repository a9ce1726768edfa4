use minijinja::{context, Environment};
use serde::Serialize;

use crate::parser::qa::QaView;
use crate::parser::Article;

const PAGE_TEMPLATE: &str = "faq/page.html";
const COMMENTS_TEMPLATE: &str = "faq/comments.html";

/// Template environment built once at startup and shared by reference.
pub struct Renderer {
    environment: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut environment = Environment::new();
        environment.add_template(PAGE_TEMPLATE, include_str!("../templates/faq/page.html"))?;
        environment.add_template(
            COMMENTS_TEMPLATE,
            include_str!("../templates/faq/comments.html"),
        )?;
        Ok(Self { environment })
    }

    pub fn render_article(&self, article: &Article) -> Result<String, minijinja::Error> {
        let qa_list: Vec<QaView> = article.qa_list.iter().map(QaView::from).collect();
        let ctx = context! {
            question => &article.question,
            answer => &article.answer,
            qa_list,
            topic => &article.topic,
            category => &article.category,
            comments => &article.comments,
        };
        self.environment.get_template(PAGE_TEMPLATE)?.render(ctx)
    }

    pub fn render_comments<T: Serialize>(&self, comments: &[T]) -> Result<String, minijinja::Error> {
        self.environment
            .get_template(COMMENTS_TEMPLATE)?
            .render(context! { comments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentTree;
    use crate::parser::qa::QaPair;

    fn article() -> Article {
        Article {
            question: "How do I <reset>?".into(),
            answer: "<div><p>Click reset.</p></div>".into(),
            qa_list: vec![QaPair {
                question: "Nested?".into(),
                answer: ContentTree::parse_fragment("<div><p>Yes.</p></div>"),
            }],
            topic: Some("Home".into()),
            category: None,
            comments: String::new(),
        }
    }

    #[test]
    fn renders_article_fields() {
        let html = Renderer::new().unwrap().render_article(&article()).unwrap();
        assert!(html.contains("<h1 class=\"faq-question\">How do I &lt;reset&gt;?</h1>"));
        assert!(html.contains("<div><p>Click reset.</p></div>"));
        assert!(html.contains("<dt>Nested?</dt>"));
        assert!(html.contains("<dd><p>Yes.</p></dd>"));
        assert!(html.contains("<span class=\"faq-topic\">Home</span>"));
        assert!(!html.contains("faq-category"));
        assert!(!html.contains("faq-comments"));
    }

    #[test]
    fn empty_article_still_renders() {
        let html = Renderer::new().unwrap().render_article(&Article::default()).unwrap();
        assert!(html.contains("<h1 class=\"faq-question\"></h1>"));
        assert!(!html.contains("faq-nested"));
    }
}
