//! Directory indexes
//!
//! Two passes. The first makes sure every directory that receives a write
//! has an `index.md`, synthesizing a stub where one is missing. The second
//! fills every `<!-- index -->` region with the directory's entries: task
//! files as a checklist, everything else as plain links.

use std::collections::BTreeSet;

use crate::ast::{INDEX, Node, ast_to_markdown, markdown_to_ast};
use crate::commands::OutputCommand;
use crate::paths;
use crate::patterns::{BoxState, leading_box};
use crate::pipeline::fill_region;

/// Synthesizes an `index.md` stub for every written-to directory under
/// `base` that does not already get one.
pub fn add_missing_index_files(
    mut commands: Vec<OutputCommand>,
    base: &str,
) -> Vec<OutputCommand> {
    let written: BTreeSet<String> = commands
        .iter()
        .filter_map(OutputCommand::as_write)
        .map(|write| write.path.clone())
        .collect();

    let mut dirs = BTreeSet::new();
    for path in &written {
        let mut dir = paths::dir_of(path);
        loop {
            if dir != base && !dir.starts_with(&format!("{base}/")) && !base.is_empty() {
                break;
            }
            dirs.insert(dir.to_string());
            if dir == base || dir.is_empty() {
                break;
            }
            dir = paths::dir_of(dir);
        }
    }

    for dir in dirs {
        let index_path = paths::join(&dir, "index.md");
        if written.contains(&index_path) {
            continue;
        }
        let content = format!(
            "# {}\n\n<!-- index -->\n\n<!-- /index -->\n",
            paths::file_name(&dir)
        );
        let ast = markdown_to_ast(&content);
        commands.push(OutputCommand::write(index_path, content, ast));
    }
    commands
}

struct Entry {
    rel: String,
    name: String,
    box_state: Option<BoxState>,
    is_self: bool,
}

/// Regenerates the `<!-- index -->` region of every pending write that has
/// one, listing the sibling files and immediate subdirectories. The file
/// holding the region lists itself too, marked as such.
pub fn update_index_regions(commands: Vec<OutputCommand>) -> Vec<OutputCommand> {
    let metas: Vec<(String, Option<BoxState>)> = commands
        .iter()
        .filter_map(OutputCommand::as_write)
        .map(|write| (write.path.clone(), heading_box(&write.ast)))
        .collect();

    commands
        .into_iter()
        .map(|command| match command {
            OutputCommand::Write(write) if write.ast.contains_region(INDEX) => {
                let body = index_body(&write.path, &metas);
                let ast = fill_region(&write.ast, INDEX, &body);
                let content = ast_to_markdown(&ast);
                OutputCommand::write(write.path, content, ast)
            }
            other => other,
        })
        .collect()
}

/// The box on the file's first top-level heading, if any.
fn heading_box(tree: &Node) -> Option<BoxState> {
    let heading = tree.first_top_level_heading()?;
    leading_box(&heading.inline_text()).map(|(state, _)| state)
}

fn index_body(index_path: &str, metas: &[(String, Option<BoxState>)]) -> Vec<Node> {
    let dir = paths::dir_of(index_path);
    let mut entries: Vec<Entry> = metas
        .iter()
        .filter_map(|(path, box_state)| {
            let rel = paths::relative_between(dir, path);
            let parts: Vec<&str> = rel.split('/').collect();
            let in_dir = parts.len() == 1
                || (parts.len() == 2 && parts[1] == "index.md" && parts[0] != "..");
            in_dir.then(|| Entry {
                name: entry_name(&rel),
                rel,
                box_state: *box_state,
                is_self: path == index_path,
            })
        })
        .collect();
    entries.sort_by(|a, b| paths::natural_cmp(&a.rel, &b.rel));

    let (tasks, others): (Vec<&Entry>, Vec<&Entry>) =
        entries.iter().partition(|entry| entry.box_state.is_some());
    let (dirs, files): (Vec<&Entry>, Vec<&Entry>) =
        others.into_iter().partition(|entry| entry.rel.contains('/'));

    let mut body = Vec::new();
    if !tasks.is_empty() {
        body.push(Node::Heading {
            depth: 2,
            children: vec![Node::text("Tasks")],
        });
        body.push(Node::List {
            ordered: false,
            children: tasks.iter().map(|entry| task_item(entry)).collect(),
        });
    }
    if !dirs.is_empty() || !files.is_empty() {
        if !tasks.is_empty() {
            body.push(Node::Heading {
                depth: 3,
                children: vec![Node::text("Other files")],
            });
        }
        if !dirs.is_empty() {
            body.push(link_paragraph(&dirs, "📁 ", true));
        }
        if !files.is_empty() {
            body.push(link_paragraph(&files, "📄 ", false));
        }
    }
    body
}

fn entry_name(rel: &str) -> String {
    let name = rel.strip_suffix(".md").unwrap_or(rel);
    if name == "index" {
        return String::new();
    }
    name.strip_suffix("/index").unwrap_or(name).to_string()
}

fn task_item(entry: &Entry) -> Node {
    let state = entry.box_state.unwrap_or(BoxState::Unchecked);
    let mut inlines = Vec::new();
    // The in-progress box has no structural checkbox; it rides along as
    // literal text before the link.
    if state == BoxState::InProgress {
        inlines.push(Node::text("[…] "));
    }
    inlines.push(Node::Link {
        url: entry.rel.clone(),
        children: vec![Node::text(entry.name.clone())],
    });
    if entry.is_self {
        inlines.extend(self_marker());
    }
    Node::ListItem {
        checked: state.as_checked(),
        children: vec![Node::Paragraph { children: inlines }],
    }
}

fn self_marker() -> [Node; 2] {
    [
        Node::text(" "),
        Node::Emphasis {
            children: vec![Node::text("(this file)")],
        },
    ]
}

fn link_paragraph(entries: &[&Entry], icon: &str, trailing_slash: bool) -> Node {
    let mut children = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            children.push(Node::Break);
        }
        children.push(Node::Link {
            url: entry.rel.clone(),
            children: vec![Node::text(format!("{icon}{}", entry.name))],
        });
        if entry.is_self {
            children.extend(self_marker());
        }
        if trailing_slash {
            children.push(Node::text(" /"));
        }
    }
    Node::Paragraph { children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::markdown_to_ast;

    fn write(path: &str, content: &str) -> OutputCommand {
        OutputCommand::write(path, content, markdown_to_ast(content))
    }

    fn content_of<'a>(commands: &'a [OutputCommand], path: &str) -> &'a str {
        commands
            .iter()
            .filter_map(OutputCommand::as_write)
            .find(|w| w.path == path)
            .map(|w| w.content.as_str())
            .unwrap_or_else(|| panic!("no write for {path}"))
    }

    #[test]
    fn test_missing_indexes_are_synthesized_up_to_base() {
        let commands = add_missing_index_files(vec![write("n/sub/a.md", "x\n")], "n");
        let paths: Vec<&str> = commands
            .iter()
            .filter_map(OutputCommand::as_write)
            .map(|w| w.path.as_str())
            .collect();
        assert_eq!(paths, vec!["n/sub/a.md", "n/index.md", "n/sub/index.md"]);
        assert_eq!(
            content_of(&commands, "n/sub/index.md"),
            "# sub\n\n<!-- index -->\n\n<!-- /index -->\n"
        );
    }

    #[test]
    fn test_existing_index_is_not_duplicated() {
        let commands = add_missing_index_files(
            vec![write("n/index.md", "# n\n"), write("n/a.md", "x\n")],
            "n",
        );
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_index_lists_tasks_and_files() {
        let commands = vec![
            write("n/index.md", "# n\n\n<!-- index -->\n\n<!-- /index -->\n"),
            write("n/TODO-1 Alpha.md", "# [ ] TODO-1 Alpha\n"),
            write("n/TODO-2 Beta.md", "# [x] TODO-2 Beta\n"),
            write("n/notes.md", "just notes\n"),
            write("n/sub/index.md", "# sub\n"),
        ];
        let out = update_index_regions(commands);
        let index = content_of(&out, "n/index.md");
        assert_eq!(
            index,
            "# n\n\n<!-- index -->\n\n## Tasks\n\n\
             - [ ] [TODO-1 Alpha](<TODO-1 Alpha.md>)\n\
             - [x] [TODO-2 Beta](<TODO-2 Beta.md>)\n\n\
             ### Other files\n\n\
             [📁 sub](sub/index.md) /\n\n\
             [📄 ](index.md) _(this file)_\\\n\
             [📄 notes](notes.md)\n\n\
             <!-- /index -->\n"
        );
    }

    #[test]
    fn test_index_lists_the_containing_file_marked() {
        let commands = vec![
            write("n/index.md", "# n\n\n<!-- index -->\n\n<!-- /index -->\n"),
            write("n/notes.md", "notes\n"),
        ];
        let out = update_index_regions(commands);
        let index = content_of(&out, "n/index.md");
        assert!(index.contains("[📄 ](index.md) _(this file)_"));
        assert!(index.contains("[📄 notes](notes.md)"));
    }

    #[test]
    fn test_in_progress_task_rides_as_text() {
        let commands = vec![
            write("n/index.md", "# n\n\n<!-- index -->\n\n<!-- /index -->\n"),
            write("n/TODO-3 Ongoing.md", "# […] TODO-3 Ongoing\n"),
        ];
        let out = update_index_regions(commands);
        let index = content_of(&out, "n/index.md");
        assert!(index.contains("- […] [TODO-3 Ongoing](<TODO-3 Ongoing.md>)\n"));
    }

    #[test]
    fn test_files_outside_the_directory_are_excluded() {
        let commands = vec![
            write(
                "n/sub/index.md",
                "# sub\n\n<!-- index -->\n\n<!-- /index -->\n",
            ),
            write("n/other.md", "# other\n"),
            write("n/sub/deep/more/x.md", "# x\n"),
        ];
        let out = update_index_regions(commands);
        let index = content_of(&out, "n/sub/index.md");
        assert_eq!(
            index,
            "# sub\n\n<!-- index -->\n\n[📄 ](index.md) _(this file)_\n\n<!-- /index -->\n"
        );
    }
}
