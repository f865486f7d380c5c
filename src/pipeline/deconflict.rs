//! Write conflict resolution
//!
//! Two files can rename to the same output path, and a synthesized index
//! can collide with a renamed file. Conflicting writes are merged into one
//! deterministic write; identical deletes collapse to one.

use std::collections::HashMap;

use crate::ast::markdown_to_ast;
use crate::commands::{OutputCommand, WriteFile};
use crate::paths::sort_unique;

enum Slot {
    Passthrough(OutputCommand),
    Target(String),
}

/// Collapses commands that target the same path. Each path keeps the
/// position of its first occurrence in the list.
pub fn deconflict(commands: Vec<OutputCommand>) -> Vec<OutputCommand> {
    let mut slots: Vec<Slot> = Vec::new();
    let mut groups: HashMap<String, Vec<OutputCommand>> = HashMap::new();

    for command in commands {
        let path = match &command {
            OutputCommand::Write(write) => write.path.clone(),
            OutputCommand::Delete { path } => path.clone(),
            OutputCommand::UpdateLinks { .. } => {
                slots.push(Slot::Passthrough(command));
                continue;
            }
        };
        let group = groups.entry(path.clone()).or_default();
        if group.is_empty() {
            slots.push(Slot::Target(path));
        }
        group.push(command);
    }

    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Passthrough(command) => Some(command),
            Slot::Target(path) => {
                let group = groups.remove(&path)?;
                Some(resolve(path, group))
            }
        })
        .collect()
}

/// Resolves every command targeting one path to a single command. A write
/// always wins over a delete. Differing write contents are merged as whole
/// documents: sorted, deduplicated and newline-joined, then re-parsed.
fn resolve(path: String, group: Vec<OutputCommand>) -> OutputCommand {
    let contents: Vec<String> = group
        .iter()
        .filter_map(OutputCommand::as_write)
        .map(|write| write.content.clone())
        .collect();
    if contents.is_empty() {
        return OutputCommand::delete(path);
    }

    let unique = sort_unique(contents);
    if unique.len() == 1 {
        // All writes agree; keep the first one with its tree intact.
        if let Some(write) = group
            .into_iter()
            .find(|command| matches!(command, OutputCommand::Write(_)))
        {
            return write;
        }
        return OutputCommand::delete(path);
    }

    let content = unique.join("\n");
    let ast = markdown_to_ast(&content);
    OutputCommand::Write(WriteFile::new(path, content, ast))
}
