//! Tree to canonical Markdown text
//!
//! The renderer is deterministic: `#` headings, `-` bullets, `1.` ordered
//! numbering, two-space list continuation indent, one blank line between
//! blocks and a trailing newline. Rendering a freshly parsed render of a
//! tree reproduces the same bytes, which is what makes the no-op write
//! filter and the idempotence property work.

use super::Node;

/// Renders a tree as canonical Markdown. The input is usually a
/// [`Node::Root`], but any block node renders on its own.
pub fn ast_to_markdown(node: &Node) -> String {
    let blocks = match node {
        Node::Root { children } => render_blocks(children),
        other => render_block(other),
    };
    if blocks.is_empty() {
        String::new()
    } else {
        format!("{blocks}\n")
    }
}

fn render_blocks(children: &[Node]) -> String {
    children
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(node: &Node) -> String {
    match node {
        Node::Root { children } => render_blocks(children),
        Node::Heading { depth, children } => {
            let hashes = "#".repeat(usize::from(*depth).clamp(1, 6));
            let text = render_inlines(children);
            if text.is_empty() {
                hashes
            } else {
                format!("{hashes} {text}")
            }
        }
        Node::Paragraph { children } => render_inlines(children),
        Node::BlockQuote { children } => prefix_lines(&render_blocks(children), "> ", ">"),
        Node::List { ordered, children } => render_list(*ordered, children),
        Node::ListItem { .. } => render_item("- ", node),
        Node::Html { value } => value.clone(),
        Node::CodeBlock { lang, value } => {
            let body = value.trim_end_matches('\n');
            if body.is_empty() {
                format!("```{lang}\n```")
            } else {
                format!("```{lang}\n{body}\n```")
            }
        }
        Node::ThematicBreak => "---".to_string(),
        inline => render_inlines(std::slice::from_ref(inline)),
    }
}

fn render_list(ordered: bool, items: &[Node]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if ordered {
                format!("{}. ", i + 1)
            } else {
                "- ".to_string()
            };
            render_item(&marker, item)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_item(marker: &str, item: &Node) -> String {
    let (checked, children) = match item {
        Node::ListItem { checked, children } => (*checked, children.as_slice()),
        other => (None, std::slice::from_ref(other)),
    };

    // The first line holds the item's leading inline content, either the
    // first paragraph's children or a run of direct inline nodes (tight
    // items carry inlines directly).
    let (lead, rest) = match children.first() {
        Some(Node::Paragraph {
            children: paragraph,
        }) => (paragraph.as_slice(), &children[1..]),
        _ => {
            let split = children
                .iter()
                .position(|c| !c.is_inline())
                .unwrap_or(children.len());
            (&children[..split], &children[split..])
        }
    };

    let checkbox = match checked {
        Some(true) => "[x] ",
        Some(false) => "[ ] ",
        None => "",
    };
    let mut out = format!("{marker}{checkbox}{}", render_inlines(lead))
        .trim_end()
        .to_string();

    let indent = " ".repeat(marker.len());
    for block in rest {
        let rendered = render_block(block);
        // A nested list attaches directly; anything else needs a blank
        // line so it does not lazily continue the previous paragraph.
        if !matches!(block, Node::List { .. }) {
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&prefix_lines(&rendered, &indent, ""));
    }
    out
}

fn render_inlines(children: &[Node]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            Node::Text { value } => out.push_str(value),
            Node::Emphasis { children } => {
                out.push('_');
                out.push_str(&render_inlines(children));
                out.push('_');
            }
            Node::Strong { children } => {
                out.push_str("**");
                out.push_str(&render_inlines(children));
                out.push_str("**");
            }
            Node::InlineCode { value } => {
                if value.contains('`') {
                    out.push_str(&format!("`` {value} ``"));
                } else {
                    out.push_str(&format!("`{value}`"));
                }
            }
            Node::Link { url, children } => {
                out.push_str(&format!(
                    "[{}]({})",
                    render_inlines(children),
                    render_url(url)
                ));
            }
            Node::Image { url, alt } => {
                out.push_str(&format!("![{alt}]({})", render_url(url)));
            }
            Node::Html { value } => out.push_str(value),
            Node::Break => out.push_str("\\\n"),
            block => out.push_str(&render_block(block)),
        }
    }
    out
}

fn render_url(url: &str) -> String {
    if url.is_empty() || url.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
        format!("<{url}>")
    } else {
        url.to_string()
    }
}

fn prefix_lines(text: &str, prefix: &str, empty_prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                empty_prefix.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::super::markdown_to_ast;
    use super::*;

    fn canonical(input: &str) -> String {
        ast_to_markdown(&markdown_to_ast(input))
    }

    #[test]
    fn test_checklist_renders_canonically() {
        let input = "- [ ] TODO-1 A\n- [x] TODO-2 B\n- C\n";
        assert_eq!(canonical(input), input);
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(canonical("# Title\n\nBody text.\n"), "# Title\n\nBody text.\n");
    }

    #[test]
    fn test_render_is_stable() {
        let input = "# [ ] TODO-3 Title\n\n<!-- index -->\n\n<!-- /index -->\n\n- [ ] TODO-4 a\n  - [ ] TODO-5 b\n\n> quoted\n\n```sh\necho hi\n```\n";
        let once = canonical(input);
        assert_eq!(canonical(&once), once);
    }

    #[test]
    fn test_nested_list_indent() {
        assert_eq!(canonical("- a\n  - b\n"), "- a\n  - b\n");
    }

    #[test]
    fn test_ordered_list_renumbers_from_one() {
        assert_eq!(canonical("3. a\n4. b\n"), "1. a\n2. b\n");
    }

    #[test]
    fn test_url_with_spaces_is_bracketed() {
        let out = canonical("[x](<a b.md>)\n");
        assert_eq!(out, "[x](<a b.md>)\n");
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(canonical("*a* **b**\n"), "_a_ **b**\n");
    }
}
