//! Document tree model
//!
//! An owned, ordered tree over the Markdown element kinds the pipeline cares
//! about. Nodes carry only semantic fields; no source positions survive
//! parsing. Transformations build new trees rather than mutating shared
//! structure.

mod parse;
mod render;

pub use parse::markdown_to_ast;
pub use render::ast_to_markdown;

/// Sentinel region name for the per-directory index.
pub const INDEX: &str = "index";
/// Sentinel region name for the table of contents.
pub const TOC: &str = "toc";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Root { children: Vec<Node> },
    Heading { depth: u8, children: Vec<Node> },
    List { ordered: bool, children: Vec<Node> },
    ListItem { checked: Option<bool>, children: Vec<Node> },
    Paragraph { children: Vec<Node> },
    BlockQuote { children: Vec<Node> },
    Emphasis { children: Vec<Node> },
    Strong { children: Vec<Node> },
    Link { url: String, children: Vec<Node> },
    Image { url: String, alt: String },
    Text { value: String },
    InlineCode { value: String },
    Html { value: String },
    CodeBlock { lang: String, value: String },
    ThematicBreak,
    Break,
}

impl Node {
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root { children }
            | Node::Heading { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Paragraph { children }
            | Node::BlockQuote { children }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Rebuilds this node with new children. Leaf nodes are returned as-is.
    pub fn with_children(&self, children: Vec<Node>) -> Node {
        match self {
            Node::Root { .. } => Node::Root { children },
            Node::Heading { depth, .. } => Node::Heading {
                depth: *depth,
                children,
            },
            Node::List { ordered, .. } => Node::List {
                ordered: *ordered,
                children,
            },
            Node::ListItem { checked, .. } => Node::ListItem {
                checked: *checked,
                children,
            },
            Node::Paragraph { .. } => Node::Paragraph { children },
            Node::BlockQuote { .. } => Node::BlockQuote { children },
            Node::Emphasis { .. } => Node::Emphasis { children },
            Node::Strong { .. } => Node::Strong { children },
            Node::Link { url, .. } => Node::Link {
                url: url.clone(),
                children,
            },
            leaf => leaf.clone(),
        }
    }

    /// True for node kinds that render inline within a line of text.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Text { .. }
                | Node::Emphasis { .. }
                | Node::Strong { .. }
                | Node::Link { .. }
                | Node::Image { .. }
                | Node::InlineCode { .. }
                | Node::Break
        )
    }

    /// Collects the value of every text node in the subtree, in document
    /// order.
    pub fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Node::Text { value } = self {
            out.push(value);
        }
        if let Some(children) = self.children() {
            for child in children {
                child.collect_texts(out);
            }
        }
    }

    /// Concatenated plain text of the subtree (text and inline code values).
    pub fn inline_text(&self) -> String {
        fn walk(node: &Node, out: &mut String) {
            match node {
                Node::Text { value } | Node::InlineCode { value } => out.push_str(value),
                _ => {
                    if let Some(children) = node.children() {
                        for child in children {
                            walk(child, out);
                        }
                    }
                }
            }
        }
        let mut out = String::new();
        walk(self, &mut out);
        out
    }

    /// The first depth-1 heading anywhere in the subtree, in document order.
    pub fn first_top_level_heading(&self) -> Option<&Node> {
        if let Node::Heading { depth: 1, .. } = self {
            return Some(self);
        }
        self.children()?
            .iter()
            .find_map(|child| child.first_top_level_heading())
    }

    /// True if the node is the begin marker of the named sentinel region.
    pub fn is_region_begin(&self, name: &str) -> bool {
        matches!(self, Node::Html { value } if value.trim() == begin_marker(name))
    }

    /// True if the node is the end marker of the named sentinel region.
    pub fn is_region_end(&self, name: &str) -> bool {
        matches!(self, Node::Html { value } if value.trim() == end_marker(name))
    }

    /// True if any node in the subtree is a begin marker of the named region.
    pub fn contains_region(&self, name: &str) -> bool {
        if self.is_region_begin(name) {
            return true;
        }
        self.children()
            .is_some_and(|children| children.iter().any(|c| c.contains_region(name)))
    }

    pub fn text(value: impl Into<String>) -> Node {
        Node::Text {
            value: value.into(),
        }
    }
}

/// The literal begin marker of a sentinel region, e.g. `<!-- index -->`.
pub fn begin_marker(name: &str) -> String {
    format!("<!-- {name} -->")
}

/// The literal end marker of a sentinel region, e.g. `<!-- /index -->`.
pub fn end_marker(name: &str) -> String {
    format!("<!-- /{name} -->")
}
