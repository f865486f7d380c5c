//! Task id allocation
//!
//! A single counter shared by every file in a run. Seeding scans whole
//! trees for existing task ids so that fresh numbers never collide with
//! any id already on disk, including ids buried in link labels or
//! paragraph text.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ast::Node;
use crate::patterns::Patterns;

/// Hands out task id numbers, strictly increasing within a run.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// An allocator whose first id is `{PID}-1`.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// An allocator seeded past every task id found in `trees`.
    pub fn seeded<'a>(patterns: &Patterns, trees: impl IntoIterator<Item = &'a Node>) -> Self {
        let allocator = Self::new();
        for tree in trees {
            allocator.observe(patterns, tree);
        }
        allocator
    }

    /// Bumps the counter past every task id in `tree`.
    pub fn observe(&self, patterns: &Patterns, tree: &Node) {
        let mut texts = Vec::new();
        tree.collect_texts(&mut texts);
        for text in texts {
            if let Some(task_id) = patterns.contained_task_id(text) {
                if let Some(number) = patterns.task_id_number(task_id) {
                    self.next.fetch_max(number + 1, Ordering::SeqCst);
                }
            }
        }
    }

    /// Allocates the next task id as a full `{PID}-{number}` string.
    pub fn allocate(&self, patterns: &Patterns) -> String {
        let number = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{number}", patterns.project_id())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::markdown_to_ast;
    use crate::patterns::ProjectId;

    #[test]
    fn test_fresh_allocator_starts_at_one() {
        let patterns = Patterns::new(ProjectId::default());
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(&patterns), "TODO-1");
        assert_eq!(ids.allocate(&patterns), "TODO-2");
    }

    #[test]
    fn test_seeding_skips_past_existing_ids() {
        let patterns = Patterns::new(ProjectId::default());
        let a = markdown_to_ast("# [ ] TODO-3 Title\n\n- [ ] TODO-7 item\n");
        let b = markdown_to_ast("see [TODO-12](other.md) for context\n");
        let ids = IdAllocator::seeded(&patterns, [&a, &b]);
        assert_eq!(ids.allocate(&patterns), "TODO-13");
    }

    #[test]
    fn test_foreign_project_ids_are_ignored() {
        let patterns = Patterns::new(ProjectId::parse("AB").unwrap());
        let tree = markdown_to_ast("- [ ] TODO-99 not ours\n- [ ] AB-2 ours\n");
        let ids = IdAllocator::seeded(&patterns, [&tree]);
        assert_eq!(ids.allocate(&patterns), "AB-3");
    }
}
