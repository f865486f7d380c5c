//! Checklist item transformation
//!
//! The item's leading text sits either directly on the item (tight lists)
//! or inside its first paragraph (loose lists). Items that already carry a
//! checkbox keep their state; items whose text names a task id gain an
//! unchecked box.

use crate::ast::Node;
use crate::ids::IdAllocator;
use crate::patterns::Patterns;

/// Ensures the item carries a checkbox and its text starts with a task id.
pub fn transform_list_item(patterns: &Patterns, ids: &IdAllocator, node: &Node) -> Node {
    let Node::ListItem { checked, children } = node else {
        return node.clone();
    };

    let first_text = first_text_of(children);

    if checked.is_some() {
        let Some(text) = first_text else {
            return inject_leading_id(patterns, ids, *checked, children);
        };
        if patterns.leading_task_id(text).is_some() {
            return node.clone();
        }
        let new_text = match patterns.leading_placeholder(text) {
            Some(end) => format!("{}{}", ids.allocate(patterns), &text[end..]),
            None => format!("{} {text}", ids.allocate(patterns)),
        };
        return Node::ListItem {
            checked: *checked,
            children: replace_first_text(children, new_text),
        };
    }

    let Some(text) = first_text else {
        return node.clone();
    };
    if patterns.leading_task_id(text).is_some() {
        return Node::ListItem {
            checked: Some(false),
            children: children.clone(),
        };
    }
    if let Some(end) = patterns.leading_placeholder(text) {
        let new_text = format!("{}{}", ids.allocate(patterns), &text[end..]);
        return Node::ListItem {
            checked: Some(false),
            children: replace_first_text(children, new_text),
        };
    }
    node.clone()
}

fn first_text_of(children: &[Node]) -> Option<&str> {
    match children.first()? {
        Node::Paragraph { children } => match children.first()? {
            Node::Text { value } => Some(value),
            _ => None,
        },
        Node::Text { value } => Some(value),
        _ => None,
    }
}

fn replace_first_text(children: &[Node], new_text: String) -> Vec<Node> {
    let mut out = children.to_vec();
    match out.first_mut() {
        Some(Node::Paragraph { children }) => {
            if let Some(first) = children.first_mut() {
                *first = Node::text(new_text);
            }
        }
        Some(first) => *first = Node::text(new_text),
        None => {}
    }
    out
}

/// The item has a checkbox but no leading text at all (it may start with a
/// link or inline code). The fresh id becomes its own leading text node.
fn inject_leading_id(
    patterns: &Patterns,
    ids: &IdAllocator,
    checked: Option<bool>,
    children: &[Node],
) -> Node {
    let lead = Node::text(format!("{} ", ids.allocate(patterns)));
    let mut out = children.to_vec();
    match out.first_mut() {
        Some(Node::Paragraph { children }) => children.insert(0, lead),
        _ => out.insert(0, lead),
    }
    Node::ListItem {
        checked,
        children: out,
    }
}
