//! Filesystem boundary
//!
//! Reading the input tree, filtering commands down to real changes and
//! applying them. Everything else in the crate stays off disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::commands::OutputCommand;
use crate::paths;

/// Reads every `.md` file under `base`, concurrently. Paths come back
/// slash-normalized and sorted.
pub async fn read_markdown_files(base: &Path) -> Result<Vec<(String, String)>> {
    let mut found: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", base.display()))?;
        let is_markdown = entry.path().extension().is_some_and(|ext| ext == "md");
        if entry.file_type().is_file() && is_markdown {
            found.push(entry.path().to_path_buf());
        }
    }

    let mut handles = Vec::new();
    for path in found {
        handles.push(tokio::spawn(async move {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            Ok::<_, anyhow::Error>((paths::to_slash(&path), content))
        }));
    }

    let mut files = Vec::new();
    for handle in handles {
        files.push(handle.await??);
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Drops commands that would not change anything on disk: writes whose
/// content already matches, and deletes of files that are already gone.
/// Rename notices never reach disk and are dropped too.
pub async fn only_changed(commands: Vec<OutputCommand>) -> Result<Vec<OutputCommand>> {
    let mut out = Vec::new();
    for command in commands {
        let keep = match &command {
            OutputCommand::Write(write) => match tokio::fs::read_to_string(&write.path).await {
                Ok(existing) => existing != write.content,
                Err(err) if err.kind() == ErrorKind::NotFound => true,
                Err(err) => {
                    return Err(err).with_context(|| format!("reading {}", write.path));
                }
            },
            OutputCommand::Delete { path } => match tokio::fs::metadata(path).await {
                Ok(_) => true,
                Err(err) if err.kind() == ErrorKind::NotFound => false,
                Err(err) => return Err(err).with_context(|| format!("checking {path}")),
            },
            OutputCommand::UpdateLinks { .. } => false,
        };
        if keep {
            out.push(command);
        }
    }
    Ok(out)
}

/// Applies the commands: deletes first, then writes, each batch
/// concurrently.
pub async fn write_changes(commands: Vec<OutputCommand>, verbose: bool) -> Result<()> {
    let mut deletes = Vec::new();
    let mut writes = Vec::new();
    for command in commands {
        match command {
            OutputCommand::Delete { path } => deletes.push(path),
            OutputCommand::Write(write) => writes.push(write),
            OutputCommand::UpdateLinks { .. } => {}
        }
    }

    let mut handles = Vec::new();
    for path in deletes {
        handles.push(tokio::spawn(async move {
            if verbose {
                println!("deleting {path}");
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err).with_context(|| format!("deleting {path}")),
            }
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let mut handles = Vec::new();
    for write in writes {
        handles.push(tokio::spawn(async move {
            if verbose {
                println!("writing {}", write.path);
            }
            if let Some(parent) = Path::new(&write.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            tokio::fs::write(&write.path, &write.content)
                .await
                .with_context(|| format!("writing {}", write.path))
        }));
    }
    for handle in handles {
        handle.await??;
    }
    Ok(())
}
