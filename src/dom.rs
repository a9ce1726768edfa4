use ego_tree::NodeId;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector, StrTendril};

/// A parsed page plus the element whose subtree is being worked on.
/// Edits go straight into scraper's tree; a detached node stays in the arena
/// but is no longer reachable from `root`.
#[derive(Debug, Clone)]
pub struct ContentTree {
    html: Html,
    root: NodeId,
}

impl ContentTree {
    /// Root the tree at the first element of `html` matching `selector`.
    pub fn select(html: Html, selector: &Selector) -> Option<Self> {
        let root = html.select(selector).next()?.id();
        Some(ContentTree { html, root })
    }

    /// Parse a markup fragment whose first top-level element becomes the root.
    /// Falls back to an empty `<div>` when the fragment holds no element.
    pub fn parse_fragment(markup: &str) -> Self {
        let html = Html::parse_fragment(markup);
        let first = html
            .root_element()
            .children()
            .find(|child| child.value().is_element())
            .map(|child| child.id());
        match first {
            Some(root) => ContentTree { html, root },
            None => Self::parse_fragment("<div></div>"),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.html.tree.get(id).map(|node| node.value())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|element| element.name() == tag)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Keep only the attributes of `id` for which `keep(name, value)` holds.
    pub fn retain_attrs(&mut self, id: NodeId, keep: impl Fn(&str, &str) -> bool) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            if let Node::Element(element) = node.value() {
                element
                    .attrs
                    .retain(|(name, value)| keep(&name.local, value));
            }
        }
    }

    /// Rewrite the first non-blank text descendant of `id`, in document order.
    pub fn edit_first_text(&mut self, id: NodeId, edit: impl FnOnce(&str) -> String) {
        let Some(target) = self.first_text(id) else {
            return;
        };
        if let Some(mut node) = self.html.tree.get_mut(target) {
            if let Node::Text(text) = node.value() {
                text.text = StrTendril::from(edit(&text.text).as_str());
            }
        }
    }

    fn first_text(&self, id: NodeId) -> Option<NodeId> {
        let node = self.html.tree.get(id)?;
        match node.value() {
            Node::Text(text) if !text.trim().is_empty() => Some(id),
            Node::Element(_) => node.children().find_map(|child| self.first_text(child.id())),
            _ => None,
        }
    }

    /// Concatenated text of every text descendant.
    pub fn text(&self, id: NodeId) -> String {
        self.element_ref(id)
            .map(|element| element.text().collect())
            .unwrap_or_default()
    }

    /// Serialize the root element and everything still attached below it.
    pub fn to_html(&self) -> String {
        self.outer_html(self.root)
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        self.element_ref(id).map(|e| e.html()).unwrap_or_default()
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        self.element_ref(id).map(|e| e.inner_html()).unwrap_or_default()
    }

    fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }
}

/// Whole-token class match read from the live `class` attribute.
pub fn has_class(element: &Element, class: &str) -> bool {
    element
        .attr("class")
        .is_some_and(|value| value.split_whitespace().any(|token| token == class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(html: &str) -> ContentTree {
        let sel = Selector::parse("#root").unwrap();
        ContentTree::select(Html::parse_document(html), &sel).unwrap()
    }

    #[test]
    fn roots_at_selected_element() {
        let t = tree(r#"<p>outside</p><div id="root"><p class="a">one</p><!--x--><p>two &amp; three</p></div>"#);
        assert_eq!(
            t.to_html(),
            r#"<div id="root"><p class="a">one</p><!--x--><p>two &amp; three</p></div>"#
        );
        assert_eq!(t.children(t.root()).len(), 3);
        assert_eq!(t.text(t.root()), "onetwo & three");
    }

    #[test]
    fn missing_selector_match_is_none() {
        let sel = Selector::parse("#root").unwrap();
        assert!(ContentTree::select(Html::parse_document("<p>x</p>"), &sel).is_none());
    }

    #[test]
    fn raw_text_elements_are_not_escaped() {
        let t = tree(
            r#"<div id="root"><style>.faq > li { color: red }</style><script>if (a < b && c) { go(); }</script></div>"#,
        );
        let html = t.to_html();
        assert!(html.contains("<style>.faq > li { color: red }</style>"));
        assert!(html.contains("<script>if (a < b && c) { go(); }</script>"));
    }

    #[test]
    fn detached_nodes_are_not_serialized() {
        let mut t = tree(r#"<div id="root"><p>keep</p><p>drop</p><br></div>"#);
        let children = t.children(t.root());
        t.detach(children[1]);
        assert_eq!(t.to_html(), r#"<div id="root"><p>keep</p><br></div>"#);
    }

    #[test]
    fn retain_and_edit_in_place() {
        let mut t = tree(r#"<div id="root" class="c" title="t"><p>  A: yes</p></div>"#);
        let root = t.root();
        t.retain_attrs(root, |name, _| name == "id");
        t.edit_first_text(root, |text| text.replace("A: ", ""));
        assert_eq!(t.to_html(), r#"<div id="root"><p>  yes</p></div>"#);
    }

    #[test]
    fn fragment_root_is_first_element() {
        let t = ContentTree::parse_fragment("<div><p>Y</p></div>");
        assert!(t.is_element(t.root(), "div"));
        assert_eq!(t.inner_html(t.root()), "<p>Y</p>");
    }

    #[test]
    fn fragment_without_element_is_empty_div() {
        let t = ContentTree::parse_fragment("just text");
        assert_eq!(t.to_html(), "<div></div>");
    }

    #[test]
    fn has_class_matches_tokens() {
        let t = tree(r#"<div id="root" class="x betterdocs-hierarchial-toc y"></div>"#);
        let el = t.element(t.root()).unwrap();
        assert!(has_class(el, "betterdocs-hierarchial-toc"));
        assert!(!has_class(el, "betterdocs"));
    }
}
