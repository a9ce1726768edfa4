use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::sanitize::BREADCRUMB_ITEM_CLASS;

const CURRENT_ITEM_CLASS: &str = "item-current";

static CRUMB_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&format!(".{BREADCRUMB_ITEM_CLASS}")).unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Crumb {
    pub text: String,
    pub is_current: bool,
}

impl Crumb {
    pub fn new(text: &str, is_current: bool) -> Self {
        Crumb {
            text: text.trim().to_string(),
            is_current,
        }
    }
}

/// Breadcrumb items in document order.
pub fn collect(document: &Html) -> Vec<Crumb> {
    document
        .select(&CRUMB_SEL)
        .map(|el| {
            let is_current = el.value().classes().any(|c| c == CURRENT_ITEM_CLASS);
            Crumb::new(&el.text().collect::<String>(), is_current)
        })
        .collect()
}

/// Walk the trail from its most specific end: the first crumb that is not
/// the current page names the category, the next one the topic.
pub fn resolve(mut crumbs: Vec<Crumb>) -> (Option<String>, Option<String>) {
    let mut topic = None;
    let mut category = None;
    while topic.is_none() || category.is_none() {
        let Some(crumb) = crumbs.pop() else { break };
        if crumb.is_current {
            continue;
        }
        if category.is_none() {
            category = Some(crumb.text);
        } else {
            topic = Some(crumb.text);
        }
    }
    (topic, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail(items: &[(&str, bool)]) -> Vec<Crumb> {
        items.iter().map(|&(t, cur)| Crumb::new(t, cur)).collect()
    }

    #[test]
    fn category_before_topic() {
        let (topic, category) = resolve(trail(&[("Home", false), ("Docs", false), ("FAQ", true)]));
        assert_eq!(category.as_deref(), Some("Docs"));
        assert_eq!(topic.as_deref(), Some("Home"));
    }

    #[test]
    fn only_current_crumb() {
        assert_eq!(resolve(trail(&[("FAQ", true)])), (None, None));
    }

    #[test]
    fn empty_trail() {
        assert_eq!(resolve(Vec::new()), (None, None));
    }

    #[test]
    fn single_non_current_crumb_sets_category() {
        let (topic, category) = resolve(trail(&[("Docs", false), ("FAQ", true)]));
        assert_eq!(category.as_deref(), Some("Docs"));
        assert_eq!(topic, None);
    }

    #[test]
    fn stops_once_both_are_set() {
        let (topic, category) = resolve(trail(&[
            ("Root", false),
            ("Home", false),
            ("Docs", false),
            ("Billing", false),
        ]));
        assert_eq!(category.as_deref(), Some("Billing"));
        assert_eq!(topic.as_deref(), Some("Docs"));
    }

    #[test]
    fn collects_from_document() {
        let doc = Html::parse_document(
            r#"<nav>
<span class="betterdocs-breadcrumb-item"><a href="/">  Home </a></span>
<span class="betterdocs-breadcrumb-item"><a href="/docs">Docs</a></span>
<span class="betterdocs-breadcrumb-item item-current">FAQ</span>
</nav>"#,
        );
        let crumbs = collect(&doc);
        assert_eq!(
            crumbs,
            trail(&[("Home", false), ("Docs", false), ("FAQ", true)])
        );
    }
}
