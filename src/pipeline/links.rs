//! Cross-file link rewriting
//!
//! Renames are collected from the rename notices in the command list, then
//! every pending write has its links re-pointed. Targets are resolved
//! relative to the linking file, so `../a/b.md` and `b.md` both find the
//! same rename entry.

use std::collections::HashMap;

use crate::ast::{Node, ast_to_markdown};
use crate::commands::OutputCommand;
use crate::paths;

/// Rewrites links in every pending write to follow file renames.
pub fn update_links(commands: Vec<OutputCommand>) -> Vec<OutputCommand> {
    let renames: HashMap<String, String> = commands
        .iter()
        .filter_map(|command| match command {
            OutputCommand::UpdateLinks { from, to } => {
                Some((paths::normalize(from), to.clone()))
            }
            _ => None,
        })
        .collect();
    if renames.is_empty() {
        return commands;
    }

    commands
        .into_iter()
        .map(|command| match command {
            OutputCommand::Write(write) => {
                let dir = paths::dir_of(&write.path).to_string();
                let ast = rewrite(&write.ast, &dir, &renames);
                let content = ast_to_markdown(&ast);
                OutputCommand::write(write.path, content, ast)
            }
            other => other,
        })
        .collect()
}

fn rewrite(node: &Node, dir: &str, renames: &HashMap<String, String>) -> Node {
    if let Node::Link { url, children } = node {
        if let Some((new_url, old_stem, new_stem)) = retarget(url, dir, renames) {
            return Node::Link {
                url: new_url,
                children: relabel(children, &old_stem, &new_stem),
            };
        }
    }
    match node.children() {
        Some(children) => node.with_children(
            children
                .iter()
                .map(|child| rewrite(child, dir, renames))
                .collect(),
        ),
        None => node.clone(),
    }
}

/// Resolves `url` against `dir` and looks it up in the rename map. Returns
/// the new url plus the old and new file stems for label rewriting.
fn retarget(
    url: &str,
    dir: &str,
    renames: &HashMap<String, String>,
) -> Option<(String, String, String)> {
    let (target, fragment) = match url.split_once('#') {
        Some((target, fragment)) => (target, Some(fragment)),
        None => (url, None),
    };
    if target.is_empty() || has_protocol(target) {
        return None;
    }
    let resolved = paths::normalize(&paths::join(dir, target));
    let new_target = renames.get(&resolved)?;
    let mut new_url = paths::relative_between(dir, new_target);
    if let Some(fragment) = fragment {
        new_url.push('#');
        new_url.push_str(fragment);
    }
    Some((
        new_url,
        paths::stem(&resolved).to_string(),
        paths::stem(new_target).to_string(),
    ))
}

fn has_protocol(target: &str) -> bool {
    match target.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// A label that is a single text node naming the old file stem follows the
/// rename; anything richer is left alone.
fn relabel(children: &[Node], old_stem: &str, new_stem: &str) -> Vec<Node> {
    if let [Node::Text { value }] = children {
        if value.contains(old_stem) {
            return vec![Node::text(value.replacen(old_stem, new_stem, 1))];
        }
    }
    children.to_vec()
}
