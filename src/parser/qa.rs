use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;
use scraper::Node;
use serde::Serialize;

use crate::dom::ContentTree;

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*Q:\s*").unwrap());
static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*A:\s*").unwrap());

/// One nested question/answer unit found inside article content.
#[derive(Debug, Clone)]
pub struct QaPair {
    pub question: String,
    /// Answer paragraphs re-parsed under a synthetic `<div>`.
    pub answer: ContentTree,
}

/// Template-facing form of [`QaPair`].
#[derive(Debug, Serialize)]
pub struct QaView {
    pub question: String,
    pub answer: String,
}

impl From<&QaPair> for QaView {
    fn from(pair: &QaPair) -> Self {
        QaView {
            question: pair.question.clone(),
            answer: pair.answer.inner_html(pair.answer.root()),
        }
    }
}

/// Collect `Q:` / `A:` paragraph runs anywhere below the root, in document order.
pub fn extract_qa(content: &ContentTree) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    scan(content, content.root(), &mut pairs);
    pairs
}

fn scan(tree: &ContentTree, id: NodeId, pairs: &mut Vec<QaPair>) {
    // whitespace between paragraphs does not break a run
    let siblings: Vec<NodeId> = tree
        .children(id)
        .into_iter()
        .filter(|&child| !is_blank_text(tree, child))
        .collect();

    let mut i = 0;
    while i < siblings.len() {
        if let Some((pair, consumed)) = match_pair(tree, &siblings[i..]) {
            pairs.push(pair);
            i += consumed;
            continue;
        }
        scan(tree, siblings[i], pairs);
        i += 1;
    }
}

/// Try to read one pair starting at `run[0]`; returns the pair and how many
/// siblings it consumed.
fn match_pair(tree: &ContentTree, run: &[NodeId]) -> Option<(QaPair, usize)> {
    let (&question_p, rest) = run.split_first()?;
    let question_text = paragraph_text(tree, question_p)?;
    let question_match = QUESTION_RE.find(&question_text)?;
    let question = question_text[question_match.end()..].trim().to_string();

    let &first_answer = rest.first()?;
    if !paragraph_text(tree, first_answer).is_some_and(|t| ANSWER_RE.is_match(&t)) {
        return None;
    }

    let mut answer_ps = vec![first_answer];
    for &next in &rest[1..] {
        match paragraph_text(tree, next) {
            Some(text) if !QUESTION_RE.is_match(&text) => answer_ps.push(next),
            _ => break,
        }
    }

    let mut consumed = 1 + answer_ps.len();
    if run.get(consumed).is_some_and(|&next| tree.is_element(next, "hr")) {
        consumed += 1;
    }

    Some((QaPair { question, answer: answer_tree(tree, &answer_ps) }, consumed))
}

/// Copy the answer paragraphs into their own tree and drop the `A:` prefix
/// there, leaving the article content untouched.
fn answer_tree(tree: &ContentTree, paragraphs: &[NodeId]) -> ContentTree {
    let markup: String = paragraphs.iter().map(|&p| tree.outer_html(p)).collect();
    let mut answer = ContentTree::parse_fragment(&format!("<div>{markup}</div>"));
    if let Some(&head) = answer.children(answer.root()).first() {
        answer.edit_first_text(head, |text| ANSWER_RE.replace(text, "").into_owned());
    }
    answer
}

fn paragraph_text(tree: &ContentTree, id: NodeId) -> Option<String> {
    tree.is_element(id, "p").then(|| tree.text(id))
}

fn is_blank_text(tree: &ContentTree, id: NodeId) -> bool {
    matches!(tree.node(id), Some(Node::Text(text)) if text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(markup: &str) -> Vec<QaPair> {
        extract_qa(&ContentTree::parse_fragment(&format!("<div>{markup}</div>")))
    }

    fn answer(pair: &QaPair) -> String {
        pair.answer.inner_html(pair.answer.root())
    }

    #[test]
    fn single_pair() {
        let found = pairs("<p>Q: X</p><p>A: Y</p>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "X");
        assert_eq!(answer(&found[0]), "<p>Y</p>");
        assert!(found[0].answer.is_element(found[0].answer.root(), "div"));
    }

    #[test]
    fn multi_paragraph_answer() {
        let found = pairs("<p>Q: X</p><p>A: Y1</p><p>Y2</p>");
        assert_eq!(found.len(), 1);
        assert_eq!(answer(&found[0]), "<p>Y1</p><p>Y2</p>");
    }

    #[test]
    fn answer_prefix_only_stripped_once() {
        let found = pairs("<p>Q: X</p><p>A: Y1</p><p>A: still part</p>");
        assert_eq!(answer(&found[0]), "<p>Y1</p><p>A: still part</p>");
    }

    #[test]
    fn pairs_separated_by_rules_and_whitespace() {
        let found = pairs(
            "\n<p>Q: First?</p>\n<p>A: One</p>\n<hr>\n<p>Q: Second?</p>\n<p>A: Two</p>\n<p>more</p>\n<hr>\n",
        );
        let questions: Vec<&str> = found.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(questions, vec!["First?", "Second?"]);
        assert_eq!(answer(&found[1]), "<p>Two</p><p>more</p>");
    }

    #[test]
    fn adjacent_question_ends_answer() {
        let found = pairs("<p>Q: a</p><p>A: 1</p><p>Q: b</p><p>A: 2</p>");
        assert_eq!(found.len(), 2);
        assert_eq!(answer(&found[0]), "<p>1</p>");
    }

    #[test]
    fn inline_markup_is_kept() {
        let found = pairs("<p>Q: <strong>Bold</strong> question</p><p><em>A:</em> see <a>docs</a></p>");
        assert_eq!(found[0].question, "Bold question");
        assert_eq!(answer(&found[0]), "<p><em></em> see <a>docs</a></p>");
    }

    #[test]
    fn nested_wrappers_are_scanned() {
        let found = pairs("<section><div><p>Q: deep</p><p>A: down</p></div></section>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "deep");
    }

    #[test]
    fn orphan_answer_is_dropped() {
        assert!(pairs("<p>A: nobody asked</p><p>text</p>").is_empty());
    }

    #[test]
    fn question_without_answer_is_dropped() {
        assert!(pairs("<p>Q: lonely</p><p>no prefix</p>").is_empty());
        assert!(pairs("<p>Q: lonely</p>").is_empty());
    }

    #[test]
    fn answer_edit_leaves_content_untouched() {
        let content = ContentTree::parse_fragment("<div><p>Q: X</p><p>A: Y</p><p>Q: Z</p><p>A: W</p></div>");
        let found = extract_qa(&content);
        assert_eq!(found.len(), 2);
        assert_eq!(answer(&found[1]), "<p>W</p>");
        assert_eq!(
            content.inner_html(content.root()),
            "<p>Q: X</p><p>A: Y</p><p>Q: Z</p><p>A: W</p>"
        );
    }

    #[test]
    fn plain_content_has_no_pairs() {
        assert!(pairs("<h2>Intro</h2><p>Just prose.</p><ul><li>x</li></ul>").is_empty());
    }
}
