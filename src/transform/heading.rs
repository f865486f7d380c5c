//! Heading transformation
//!
//! A task heading always reads `{box} {task id} {title}`. A heading only
//! counts as a task when its text starts with a box, a task id or a
//! placeholder; anything else is left alone, as are headings whose first
//! child is not plain text.

use crate::ast::Node;
use crate::ids::IdAllocator;
use crate::patterns::{Patterns, leading_box};

/// Ensures a task-shaped heading carries both a box and a real task id,
/// allocating a fresh id where a placeholder stands in or none follows
/// the box.
pub fn transform_heading(patterns: &Patterns, ids: &IdAllocator, node: &Node) -> Node {
    let Node::Heading { children, .. } = node else {
        return node.clone();
    };
    let Some(Node::Text { value }) = children.first() else {
        return node.clone();
    };

    let new_value = if patterns.starts_with_box_and_task_id(value) {
        return node.clone();
    } else if let Some((box_text, end)) = patterns.leading_box_and_placeholder(value) {
        format!("{box_text} {}{}", ids.allocate(patterns), &value[end..])
    } else if patterns.leading_task_id(value).is_some() {
        format!("[ ] {value}")
    } else if let Some(end) = patterns.leading_placeholder(value) {
        format!("[ ] {}{}", ids.allocate(patterns), &value[end..])
    } else if let Some((state, end)) = leading_box(value) {
        format!(
            "{} {}{}",
            state.marker(),
            ids.allocate(patterns),
            &value[end..]
        )
    } else {
        // Not a task heading.
        return node.clone();
    };

    let mut new_children = children.clone();
    new_children[0] = Node::text(new_value);
    node.with_children(new_children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ast_to_markdown, markdown_to_ast};
    use crate::patterns::ProjectId;

    fn heading_of(input: &str) -> Node {
        let tree = markdown_to_ast(input);
        tree.first_top_level_heading()
            .expect("input has a heading")
            .clone()
    }

    fn run(input: &str) -> String {
        let patterns = Patterns::new(ProjectId::default());
        let ids = IdAllocator::new();
        ast_to_markdown(&transform_heading(&patterns, &ids, &heading_of(input)))
    }

    #[test]
    fn test_box_and_id_is_untouched() {
        assert_eq!(run("# [x] TODO-9 done\n"), "# [x] TODO-9 done\n");
    }

    #[test]
    fn test_box_and_placeholder_keeps_the_box() {
        assert_eq!(run("# [x] TODO-??? done\n"), "# [x] TODO-1 done\n");
    }

    #[test]
    fn test_id_without_box_gains_a_box() {
        assert_eq!(run("# TODO-4 task\n"), "# [ ] TODO-4 task\n");
    }

    #[test]
    fn test_placeholder_without_box_gains_both() {
        assert_eq!(run("# TODO-nn task\n"), "# [ ] TODO-1 task\n");
    }

    #[test]
    fn test_bare_box_gains_an_id() {
        assert_eq!(run("# […] ongoing\n"), "# […] TODO-1 ongoing\n");
    }

    #[test]
    fn test_plain_heading_is_not_a_task() {
        assert_eq!(run("# just a title\n"), "# just a title\n");
    }

    #[test]
    fn test_non_text_start_is_untouched() {
        assert_eq!(run("# `code` first\n"), "# `code` first\n");
    }
}
