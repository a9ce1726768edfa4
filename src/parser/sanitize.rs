use ego_tree::NodeId;
use scraper::Node;

use crate::dom::{has_class, ContentTree};

pub const TOC_CLASS: &str = "betterdocs-hierarchial-toc";
pub const BREADCRUMB_ITEM_CLASS: &str = "betterdocs-breadcrumb-item";

/// Reduce the subtree under `id` to structural tags with only `id` and
/// breadcrumb `class` attributes left.
pub fn sanitize(tree: &mut ContentTree, id: NodeId) {
    if tree.element(id).is_none() {
        return;
    }

    let children = tree.children(id);

    // Single-wrapper nesting: descend without touching this level.
    if let [only] = children[..] {
        if tree.element(only).is_some() {
            sanitize(tree, only);
            return;
        }
    }

    for child in children {
        let prune = match tree.node(child) {
            Some(Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_)) => true,
            Some(Node::Element(_)) => wraps_toc(tree, child),
            _ => false,
        };
        if prune {
            tree.detach(child);
        } else {
            sanitize(tree, child);
        }
    }

    tree.retain_attrs(id, |name, value| match name {
        "id" => true,
        "class" => value.contains(BREADCRUMB_ITEM_CLASS),
        _ => false,
    });
}

/// The TOC marker sits on a direct child of the removed element, not on the
/// element itself.
fn wraps_toc(tree: &ContentTree, id: NodeId) -> bool {
    tree.children(id).into_iter().any(|grandchild| {
        tree.element(grandchild)
            .is_some_and(|element| has_class(element, TOC_CLASS))
    })
}
