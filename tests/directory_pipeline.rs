/// End-to-end test of the directory pipeline against a real temp
/// directory: ids are numbered across files, files are renamed after
/// their titles, links follow the renames, a root index is synthesized,
/// and a second run changes nothing.
use std::fs;
use std::path::{Path, PathBuf};

use taskdown::ast::markdown_to_ast;
use taskdown::io::{only_changed, read_markdown_files, write_changes};
use taskdown::paths;
use taskdown::patterns::{Patterns, ProjectId};
use taskdown::pipeline::{SourceFile, transform_directory};

fn temp_base(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("taskdown_e2e_{tag}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

async fn run_pipeline(base: &Path) -> usize {
    let patterns = Patterns::new(ProjectId::default());
    let files = read_markdown_files(base).await.unwrap();
    let sources = files
        .into_iter()
        .map(|(path, content)| SourceFile {
            tree: markdown_to_ast(&content),
            path,
        })
        .collect();
    let commands = transform_directory(&patterns, &paths::to_slash(base), sources);
    let commands = only_changed(commands).await.unwrap();
    let count = commands.len();
    write_changes(commands, false).await.unwrap();
    count
}

#[tokio::test]
async fn test_directory_run_numbers_renames_and_links() {
    let base = temp_base("full");
    fs::write(
        base.join("alpha.md"),
        "# [ ] Alpha\n\nsee [beta](beta.md)\n\n- [ ] TODO-1 existing\n- [ ] new item\n",
    )
    .unwrap();
    fs::write(
        base.join("beta.md"),
        "# [ ] TODO-??? Beta\n\n- [ ] another\n",
    )
    .unwrap();

    run_pipeline(&base).await;

    // Both files were renamed after their titles.
    assert!(!base.join("alpha.md").exists());
    assert!(!base.join("beta.md").exists());

    let alpha = fs::read_to_string(base.join("TODO-2 Alpha.md")).unwrap();
    assert_eq!(
        alpha,
        "# [ ] TODO-2 Alpha\n\nsee [TODO-4 Beta](<TODO-4 Beta.md>)\n\n\
         - [ ] TODO-1 existing\n- [ ] TODO-3 new item\n"
    );

    let beta = fs::read_to_string(base.join("TODO-4 Beta.md")).unwrap();
    assert_eq!(beta, "# [ ] TODO-4 Beta\n\n- [ ] TODO-5 another\n");

    // A root index was synthesized listing both tasks.
    let index = fs::read_to_string(base.join("index.md")).unwrap();
    assert!(index.starts_with("# "));
    assert!(index.contains("<!-- index -->"));
    assert!(index.contains("- [ ] [TODO-2 Alpha](<TODO-2 Alpha.md>)\n"));
    assert!(index.contains("- [ ] [TODO-4 Beta](<TODO-4 Beta.md>)\n"));

    fs::remove_dir_all(&base).unwrap();
}

#[tokio::test]
async fn test_second_run_is_a_noop() {
    let base = temp_base("noop");
    fs::write(base.join("task.md"), "# Task\n\n- [ ] do it\n").unwrap();

    let first = run_pipeline(&base).await;
    assert!(first > 0);
    let second = run_pipeline(&base).await;
    assert_eq!(second, 0);

    fs::remove_dir_all(&base).unwrap();
}

#[tokio::test]
async fn test_nested_directories_get_indexes_and_dir_entries() {
    let base = temp_base("nested");
    fs::create_dir_all(base.join("sub")).unwrap();
    fs::write(base.join("notes.md"), "plain notes, no heading\n").unwrap();
    fs::write(base.join("sub/task.md"), "# [x] TODO-1 Done\n").unwrap();

    run_pipeline(&base).await;

    // Every directory got an index; the root one links the subdirectory.
    let root_index = fs::read_to_string(base.join("index.md")).unwrap();
    assert!(root_index.contains("[📁 sub](sub/index.md) /"));
    assert!(root_index.contains("[📄 notes](notes.md)"));

    let sub_index = fs::read_to_string(base.join("sub/index.md")).unwrap();
    assert!(sub_index.contains("- [x] [TODO-1 Done](<TODO-1 Done.md>)\n"));

    fs::remove_dir_all(&base).unwrap();
}

#[tokio::test]
async fn test_toc_region_lists_all_files() {
    let base = temp_base("toc");
    fs::write(
        base.join("index.md"),
        "# Overview\n\n<!-- toc -->\n\n<!-- /toc -->\n",
    )
    .unwrap();
    fs::write(base.join("a.md"), "content\n").unwrap();

    run_pipeline(&base).await;

    let index = fs::read_to_string(base.join("index.md")).unwrap();
    assert!(index.contains("- [a](a.md)\n"));
    assert!(index.contains("- [index](index.md) _(this file)_\n"));

    fs::remove_dir_all(&base).unwrap();
}
