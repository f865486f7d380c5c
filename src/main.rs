use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use taskdown::ast::{ast_to_markdown, markdown_to_ast};
use taskdown::commands::OutputCommand;
use taskdown::ids::IdAllocator;
use taskdown::io;
use taskdown::paths;
use taskdown::patterns::{Patterns, ProjectId};
use taskdown::pipeline::{SourceFile, transform_directory};
use taskdown::transform::transform_tree;

#[derive(Parser)]
#[command(name = "taskdown")]
#[command(about = "Assign stable task ids to Markdown checklists and keep files, links and indexes in sync", long_about = None)]
struct Cli {
    #[arg(
        help = "A project id (2-5 uppercase letters), a directory, a file, or '-' for stdin, in any order"
    )]
    args: Vec<String>,

    #[arg(long, help = "Enable verbose debug output")]
    verbose: bool,

    #[arg(long, help = "Print the plan as JSON without writing anything")]
    dry_run: bool,
}

#[derive(Serialize)]
struct PlanEntry {
    action: &'static str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Positional arguments are classified by shape: anything that is
    // exactly a project id is the project id, the rest is the target.
    let mut project_id = None;
    let mut target = None;
    for arg in &cli.args {
        if let Some(id) = ProjectId::parse(arg) {
            if project_id.replace(id).is_some() {
                bail!("more than one project id given");
            }
        } else if target.replace(arg.clone()).is_some() {
            bail!("more than one input path given");
        }
    }

    let patterns = Patterns::new(project_id.unwrap_or_default());
    if cli.verbose {
        println!("project id: {}", patterns.project_id());
    }

    match target.as_deref() {
        None | Some("-") => transform_stdin(&patterns).await,
        Some(path) => {
            let meta = tokio::fs::metadata(path)
                .await
                .with_context(|| format!("checking {path}"))?;
            if meta.is_dir() {
                run_directory(&patterns, path, cli.verbose, cli.dry_run).await
            } else {
                transform_file(&patterns, path).await
            }
        }
    }
}

/// Single-document mode: the transformed Markdown goes to stdout, disk is
/// never touched.
async fn transform_stdin(patterns: &Patterns) -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("reading stdin")?;
    print!("{}", transform_document(patterns, &input));
    Ok(())
}

async fn transform_file(patterns: &Patterns, path: &str) -> Result<()> {
    let input = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {path}"))?;
    print!("{}", transform_document(patterns, &input));
    Ok(())
}

fn transform_document(patterns: &Patterns, input: &str) -> String {
    let tree = markdown_to_ast(input);
    let ids = IdAllocator::new();
    ids.observe(patterns, &tree);
    ast_to_markdown(&transform_tree(patterns, &ids, &tree))
}

async fn run_directory(patterns: &Patterns, dir: &str, verbose: bool, dry_run: bool) -> Result<()> {
    let base = normalize_base(dir);
    let files = io::read_markdown_files(Path::new(dir)).await?;
    if verbose {
        println!("read {} markdown files under {dir}", files.len());
    }

    let sources = files
        .into_iter()
        .map(|(path, content)| SourceFile {
            tree: markdown_to_ast(&content),
            path,
        })
        .collect();
    let commands = transform_directory(patterns, &base, sources);
    let commands = io::only_changed(commands).await?;

    if dry_run {
        let plan: Vec<PlanEntry> = commands.iter().map(plan_entry).collect();
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if verbose {
        println!("applying {} changes", commands.len());
    }
    io::write_changes(commands, verbose).await
}

/// The base as it appears inside command paths: `.` and trailing slashes
/// collapse away so prefix checks line up with the walked paths.
fn normalize_base(dir: &str) -> String {
    let slashed = paths::to_slash(Path::new(dir));
    let trimmed = slashed.trim_end_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn plan_entry(command: &OutputCommand) -> PlanEntry {
    match command {
        OutputCommand::Write(write) => PlanEntry {
            action: "write",
            path: write.path.clone(),
            bytes: Some(write.content.len()),
            sha256: Some(write.sha256()),
        },
        OutputCommand::Delete { path } => PlanEntry {
            action: "delete",
            path: path.clone(),
            bytes: None,
            sha256: None,
        },
        OutputCommand::UpdateLinks { from, to } => PlanEntry {
            action: "update-links",
            path: format!("{from} -> {to}"),
            bytes: None,
            sha256: None,
        },
    }
}
