//! Directory pipeline
//!
//! Turns a set of parsed input files into output commands. Everything here
//! is pure: the passes only ever look at the command list, never at disk.
//!
//! Pass order matters. Ids are seeded from every input before any file is
//! transformed; renames are decided per file; links are rewritten against
//! the full rename map; conflicting writes are merged; missing directory
//! indexes are synthesized before the index and toc regions are filled.

mod deconflict;
mod indexes;
mod links;
mod toc;

pub use deconflict::deconflict;
pub use indexes::{add_missing_index_files, update_index_regions};
pub use links::update_links;
pub use toc::update_toc_regions;

use crate::ast::{Node, ast_to_markdown};
use crate::commands::OutputCommand;
use crate::ids::IdAllocator;
use crate::paths;
use crate::patterns::{Patterns, leading_box};

/// A parsed input file, with its path relative to the working directory.
#[derive(Debug)]
pub struct SourceFile {
    pub path: String,
    pub tree: Node,
}

/// Runs the whole pipeline over the files under `base`.
pub fn transform_directory(
    patterns: &Patterns,
    base: &str,
    mut files: Vec<SourceFile>,
) -> Vec<OutputCommand> {
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let ids = IdAllocator::new();
    for file in &files {
        ids.observe(patterns, &file.tree);
    }

    let mut commands = Vec::new();
    for file in &files {
        commands.extend(file_commands(patterns, &ids, base, file));
    }

    let commands = update_links(commands);
    let commands = deconflict(commands);
    let commands = add_missing_index_files(commands, base);
    let commands = update_index_regions(commands);
    update_toc_regions(commands, base)
}

/// Transforms one file and decides where it lives afterwards. A file whose
/// first top-level heading changes its title is renamed, which also emits
/// the delete of the old path and a rename notice for the link pass.
pub fn file_commands(
    patterns: &Patterns,
    ids: &IdAllocator,
    base: &str,
    file: &SourceFile,
) -> Vec<OutputCommand> {
    let transformed = crate::transform::transform_tree(patterns, ids, &file.tree);
    let content = ast_to_markdown(&transformed);
    let output = output_path_for(base, &file.path, title_of(&transformed).as_deref());

    if output == file.path {
        vec![OutputCommand::write(output, content, transformed)]
    } else {
        vec![
            OutputCommand::delete(file.path.clone()),
            OutputCommand::write(output.clone(), content, transformed),
            OutputCommand::UpdateLinks {
                from: file.path.clone(),
                to: output,
            },
        ]
    }
}

/// The file's title: the text of its first top-level heading with any
/// leading box stripped. The task id stays, so renamed files carry their
/// id in the file name.
pub fn title_of(tree: &Node) -> Option<String> {
    let heading = tree.first_top_level_heading()?;
    let text = heading.inline_text();
    let text = match leading_box(&text) {
        Some((_, end)) => text[end..].trim().to_string(),
        None => text.trim().to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

fn output_path_for(base: &str, input: &str, title: Option<&str>) -> String {
    let Some(title) = title else {
        return input.to_string();
    };
    // The root index names the whole directory; it never moves.
    if input == paths::join(base, "index.md") {
        return input.to_string();
    }
    if paths::file_name(input) == "index.md" {
        let dir = paths::dir_of(input);
        return paths::join(&paths::join(paths::dir_of(dir), title), "index.md");
    }
    paths::join(paths::dir_of(input), &format!("{title}.md"))
}

/// Rebuilds the named sentinel region with `body` between its markers.
pub fn fill_region(tree: &Node, name: &str, body: &[Node]) -> Node {
    let Some(children) = tree.children() else {
        return tree.clone();
    };
    let mut out = Vec::new();
    let mut skipping = false;
    for child in children {
        if skipping {
            if child.is_region_end(name) {
                out.push(child.clone());
                skipping = false;
            }
            continue;
        }
        if child.is_region_begin(name) {
            out.push(child.clone());
            out.extend(body.iter().cloned());
            skipping = true;
        } else {
            out.push(fill_region(child, name, body));
        }
    }
    tree.with_children(out)
}
