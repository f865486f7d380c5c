//! Output commands
//!
//! A run never touches the filesystem while deciding what to do. Each file
//! produces a list of commands; later passes rewrite the list; only the
//! very last step applies it (or prints it, under `--dry-run`).

use sha2::{Digest, Sha256};

use crate::ast::Node;

/// A pending write, carrying both the rendered content and the tree it was
/// rendered from so later passes can rewrite without re-parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFile {
    pub path: String,
    pub content: String,
    pub ast: Node,
}

impl WriteFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>, ast: Node) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            ast,
        }
    }

    /// Hex digest of the content, for plan output.
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCommand {
    Write(WriteFile),
    Delete { path: String },
    /// Instructs the link pass that references to `from` must now point at
    /// `to`. Never applied to disk.
    UpdateLinks { from: String, to: String },
}

impl OutputCommand {
    pub fn write(path: impl Into<String>, content: impl Into<String>, ast: Node) -> Self {
        Self::Write(WriteFile::new(path, content, ast))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::Delete { path: path.into() }
    }

    pub fn as_write(&self) -> Option<&WriteFile> {
        match self {
            Self::Write(write) => Some(write),
            _ => None,
        }
    }
}
