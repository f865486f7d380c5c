//! Markdown text to tree, via pulldown-cmark
//!
//! The event stream is folded into owned [`Node`] trees with a stack of open
//! containers. Adjacent text children are merged so that textual box
//! prefixes like `[ ] …` always arrive as a single text node, however the
//! parser tokenizes the brackets. Soft line breaks become single spaces.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::Node;

enum OpenKind {
    Root,
    Heading(u8),
    Paragraph,
    BlockQuote,
    List(bool),
    Item,
    Emphasis,
    Strong,
    Link(String),
    Image(String),
    CodeBlock(String),
    HtmlBlock,
    /// A container kind the pipeline does not model; its children are
    /// spliced into the parent.
    Other,
}

struct Open {
    kind: OpenKind,
    children: Vec<Node>,
    buf: String,
    checked: Option<bool>,
}

impl Open {
    fn new(kind: OpenKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            buf: String::new(),
            checked: None,
        }
    }
}

/// Parses Markdown text into a [`Node::Root`] tree.
pub fn markdown_to_ast(input: &str) -> Node {
    let parser = Parser::new_ext(input, Options::ENABLE_TASKLISTS);
    let mut stack = vec![Open::new(OpenKind::Root)];

    for event in parser {
        match event {
            Event::Start(tag) => stack.push(Open::new(open_kind(tag))),
            Event::End(_) => {
                let open = stack.pop().unwrap_or_else(|| Open::new(OpenKind::Root));
                let top = top_of(&mut stack);
                match build(open) {
                    Built::One(node) => push_node(&mut top.children, node),
                    Built::Spliced(nodes) => {
                        for node in nodes {
                            push_node(&mut top.children, node);
                        }
                    }
                }
            }
            Event::Text(text) => {
                let top = top_of(&mut stack);
                match top.kind {
                    OpenKind::CodeBlock(_) | OpenKind::HtmlBlock => top.buf.push_str(&text),
                    _ => push_text(&mut top.children, &text),
                }
            }
            Event::Code(value) => top_of(&mut stack).children.push(Node::InlineCode {
                value: value.to_string(),
            }),
            Event::Html(value) => {
                let top = top_of(&mut stack);
                match top.kind {
                    OpenKind::HtmlBlock => top.buf.push_str(&value),
                    _ => top.children.push(Node::Html {
                        value: value.trim_end().to_string(),
                    }),
                }
            }
            Event::InlineHtml(value) => top_of(&mut stack).children.push(Node::Html {
                value: value.to_string(),
            }),
            Event::SoftBreak => push_text(&mut top_of(&mut stack).children, " "),
            Event::HardBreak => top_of(&mut stack).children.push(Node::Break),
            Event::Rule => top_of(&mut stack).children.push(Node::ThematicBreak),
            Event::TaskListMarker(checked) => {
                for open in stack.iter_mut().rev() {
                    if matches!(open.kind, OpenKind::Item) {
                        open.checked = Some(checked);
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    // Unbalanced streams leave containers open; fold them down to the root.
    while stack.len() > 1 {
        let open = stack.pop().unwrap_or_else(|| Open::new(OpenKind::Root));
        let top = top_of(&mut stack);
        match build(open) {
            Built::One(node) => push_node(&mut top.children, node),
            Built::Spliced(nodes) => top.children.extend(nodes),
        }
    }
    let root = stack.pop().unwrap_or_else(|| Open::new(OpenKind::Root));
    Node::Root {
        children: root.children,
    }
}

fn open_kind(tag: Tag<'_>) -> OpenKind {
    match tag {
        Tag::Paragraph => OpenKind::Paragraph,
        Tag::Heading { level, .. } => OpenKind::Heading(level as u8),
        Tag::BlockQuote(_) => OpenKind::BlockQuote,
        Tag::CodeBlock(kind) => OpenKind::CodeBlock(match kind {
            CodeBlockKind::Fenced(lang) => lang.to_string(),
            CodeBlockKind::Indented => String::new(),
        }),
        Tag::HtmlBlock => OpenKind::HtmlBlock,
        Tag::List(start) => OpenKind::List(start.is_some()),
        Tag::Item => OpenKind::Item,
        Tag::Emphasis => OpenKind::Emphasis,
        Tag::Strong => OpenKind::Strong,
        Tag::Link { dest_url, .. } => OpenKind::Link(dest_url.to_string()),
        Tag::Image { dest_url, .. } => OpenKind::Image(dest_url.to_string()),
        _ => OpenKind::Other,
    }
}

enum Built {
    One(Node),
    Spliced(Vec<Node>),
}

fn build(open: Open) -> Built {
    let Open {
        kind,
        children,
        buf,
        checked,
    } = open;
    Built::One(match kind {
        OpenKind::Root => Node::Root { children },
        OpenKind::Heading(depth) => Node::Heading { depth, children },
        OpenKind::Paragraph => Node::Paragraph { children },
        OpenKind::BlockQuote => Node::BlockQuote { children },
        OpenKind::List(ordered) => Node::List { ordered, children },
        OpenKind::Item => Node::ListItem { checked, children },
        OpenKind::Emphasis => Node::Emphasis { children },
        OpenKind::Strong => Node::Strong { children },
        OpenKind::Link(url) => Node::Link { url, children },
        OpenKind::Image(url) => {
            let alt = Node::Root { children }.inline_text();
            Node::Image { url, alt }
        }
        OpenKind::CodeBlock(lang) => Node::CodeBlock { lang, value: buf },
        OpenKind::HtmlBlock => Node::Html {
            value: buf.trim_end().to_string(),
        },
        OpenKind::Other => return Built::Spliced(children),
    })
}

fn top_of(stack: &mut Vec<Open>) -> &mut Open {
    if stack.is_empty() {
        stack.push(Open::new(OpenKind::Root));
    }
    let last = stack.len() - 1;
    &mut stack[last]
}

fn push_text(children: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text { value }) = children.last_mut() {
        value.push_str(text);
    } else {
        children.push(Node::text(text));
    }
}

fn push_node(children: &mut Vec<Node>, node: Node) {
    match node {
        Node::Text { value } => push_text(children, &value),
        other => children.push(other),
    }
}
