//! Tree transformation
//!
//! Walks a document tree top-down and produces a new tree in which every
//! heading and checklist item carries a task id, and every sentinel region
//! body is emptied out for a later pass to regenerate.

mod heading;
mod list_item;

pub use heading::transform_heading;
pub use list_item::transform_list_item;

use crate::ast::{self, INDEX, Node, TOC};
use crate::ids::IdAllocator;
use crate::patterns::Patterns;

/// Transforms a whole document tree.
pub fn transform_tree(patterns: &Patterns, ids: &IdAllocator, tree: &Node) -> Node {
    transform_node(patterns, ids, tree)
}

fn transform_node(patterns: &Patterns, ids: &IdAllocator, node: &Node) -> Node {
    match node {
        Node::Heading { .. } => {
            let heading = transform_heading(patterns, ids, node);
            transform_children_of(patterns, ids, &heading)
        }
        Node::ListItem { .. } => {
            let item = transform_list_item(patterns, ids, node);
            transform_children_of(patterns, ids, &item)
        }
        parent if parent.children().is_some() => transform_children_of(patterns, ids, parent),
        leaf => leaf.clone(),
    }
}

fn transform_children_of(patterns: &Patterns, ids: &IdAllocator, node: &Node) -> Node {
    let Some(children) = node.children() else {
        return node.clone();
    };
    node.with_children(transform_children(patterns, ids, children))
}

/// Transforms a child list, replacing each sentinel region with an empty
/// one. A begin marker without a matching end marker gets one synthesized;
/// the old body is dropped either way.
fn transform_children(patterns: &Patterns, ids: &IdAllocator, children: &[Node]) -> Vec<Node> {
    let mut out = Vec::new();
    let mut skipping: Option<&'static str> = None;

    for (i, child) in children.iter().enumerate() {
        if let Some(region) = skipping {
            if child.is_region_end(region) {
                skipping = None;
            }
            continue;
        }
        match region_begun_by(child) {
            Some(region) => {
                out.push(child.clone());
                out.push(Node::Html {
                    value: ast::end_marker(region),
                });
                let has_end = children[i + 1..].iter().any(|c| c.is_region_end(region));
                if has_end {
                    skipping = Some(region);
                }
            }
            None => out.push(transform_node(patterns, ids, child)),
        }
    }
    out
}

fn region_begun_by(node: &Node) -> Option<&'static str> {
    [INDEX, TOC]
        .into_iter()
        .find(|region| node.is_region_begin(region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ast_to_markdown, markdown_to_ast};
    use crate::patterns::ProjectId;

    fn run(input: &str) -> String {
        let patterns = Patterns::new(ProjectId::default());
        let ids = IdAllocator::new();
        ids.observe(&patterns, &markdown_to_ast(input));
        let tree = transform_tree(&patterns, &ids, &markdown_to_ast(input));
        ast_to_markdown(&tree)
    }

    #[test]
    fn test_document_numbering_is_top_down() {
        let out = run("# [ ] Title\n\n- [ ] one\n- [ ] two\n");
        assert_eq!(out, "# [ ] TODO-1 Title\n\n- [ ] TODO-2 one\n- [ ] TODO-3 two\n");
    }

    #[test]
    fn test_existing_ids_are_kept_and_new_ones_continue() {
        let out = run("- [ ] TODO-5 old\n- [ ] new\n");
        assert_eq!(out, "- [ ] TODO-5 old\n- [ ] TODO-6 new\n");
    }

    #[test]
    fn test_plain_prose_is_untouched() {
        let out = run("a paragraph\n\n- a plain bullet\n");
        assert_eq!(out, "a paragraph\n\n- a plain bullet\n");
    }

    #[test]
    fn test_index_region_body_is_emptied() {
        let out = run("<!-- index -->\n\n- [ ] TODO-1 stale entry\n\n<!-- /index -->\n");
        assert_eq!(out, "<!-- index -->\n\n<!-- /index -->\n");
    }

    #[test]
    fn test_unterminated_region_gets_an_end_marker() {
        let out = run("<!-- toc -->\n\ntrailing text\n");
        assert_eq!(out, "<!-- toc -->\n\n<!-- /toc -->\n\ntrailing text\n");
    }

    #[test]
    fn test_nested_items_inside_region_are_not_numbered() {
        let out = run("<!-- index -->\n\n- [ ] stale\n\n<!-- /index -->\n\n- [ ] live\n");
        assert_eq!(out, "<!-- index -->\n\n<!-- /index -->\n\n- [ ] TODO-1 live\n");
    }
}
