//! Table of contents
//!
//! Fills every `<!-- toc -->` region with links to all files written in
//! the run, wherever they live under the processed directory. The file
//! holding the region lists itself too, marked as such.

use crate::ast::{Node, TOC, ast_to_markdown};
use crate::commands::OutputCommand;
use crate::paths;
use crate::pipeline::fill_region;

/// Regenerates the `<!-- toc -->` region of every pending write that has
/// one.
pub fn update_toc_regions(commands: Vec<OutputCommand>, base: &str) -> Vec<OutputCommand> {
    let all_paths: Vec<String> = commands
        .iter()
        .filter_map(OutputCommand::as_write)
        .map(|write| write.path.clone())
        .collect();

    commands
        .into_iter()
        .map(|command| match command {
            OutputCommand::Write(write) if write.ast.contains_region(TOC) => {
                let body = toc_body(&write.path, &all_paths, base);
                let ast = fill_region(&write.ast, TOC, &body);
                let content = ast_to_markdown(&ast);
                OutputCommand::write(write.path, content, ast)
            }
            other => other,
        })
        .collect()
}

fn toc_body(toc_path: &str, all_paths: &[String], base: &str) -> Vec<Node> {
    let dir = paths::dir_of(toc_path);
    let mut items: Vec<(String, Node)> = all_paths
        .iter()
        .map(|path| {
            let url = paths::relative_between(dir, path);
            let label = base_relative_label(path, base);
            let mut inlines = vec![Node::Link {
                url: url.clone(),
                children: vec![Node::text(label)],
            }];
            if path == toc_path {
                inlines.push(Node::text(" "));
                inlines.push(Node::Emphasis {
                    children: vec![Node::text("(this file)")],
                });
            }
            let item = Node::ListItem {
                checked: None,
                children: vec![Node::Paragraph { children: inlines }],
            };
            (url, item)
        })
        .collect();
    items.sort_by(|a, b| paths::natural_cmp(&a.0, &b.0));

    vec![Node::List {
        ordered: false,
        children: items.into_iter().map(|(_, item)| item).collect(),
    }]
}

/// The label shown for a file: its path under `base`, without `.md`.
fn base_relative_label(path: &str, base: &str) -> String {
    let rel = if base.is_empty() {
        path
    } else {
        path.strip_prefix(&format!("{base}/")).unwrap_or(path)
    };
    rel.strip_suffix(".md").unwrap_or(rel).to_string()
}
