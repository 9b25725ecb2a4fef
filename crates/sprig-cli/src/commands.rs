use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use sprig_sdk::{LogEntry, Repository};

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let base = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let format = cli.format;

    match cli.command {
        Command::Init(args) => cmd_init(&base, args),
        Command::HashObject(args) => cmd_hash_object(&base, args),
        Command::CatFile(args) => cmd_cat_file(&base, args),
        Command::WriteTree => cmd_write_tree(&base),
        Command::ReadTree(args) => cmd_read_tree(&base, args),
        Command::Commit(args) => cmd_commit(&base, args),
        Command::Log(args) => cmd_log(&base, args, format),
        Command::Checkout(args) => cmd_checkout(&base, args),
        Command::Tag(args) => cmd_tag(&base, args),
        Command::Branch(args) => cmd_branch(&base, args, format),
        Command::K(args) => cmd_k(&base, args, format),
    }
}

fn open_repo(base: &Path) -> anyhow::Result<Repository> {
    Ok(Repository::discover(base)?)
}

fn cmd_init(base: &Path, args: InitArgs) -> anyhow::Result<()> {
    let path = match args.path {
        Some(path) => base.join(path),
        None => base.to_path_buf(),
    };
    let repo = Repository::init(&path)?;
    println!(
        "{} Initialized sprig repository in {}",
        "✓".green().bold(),
        repo.meta_dir().display().to_string().bold()
    );
    if let Some(branch) = repo.current_branch()? {
        println!("  Branch: {}", branch.yellow());
    }
    Ok(())
}

fn cmd_hash_object(base: &Path, args: HashObjectArgs) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let file: PathBuf = base.join(&args.file);
    let id = repo
        .hash_object(&file)
        .with_context(|| format!("failed to hash {}", file.display()))?;
    println!("{id}");
    Ok(())
}

fn cmd_cat_file(base: &Path, args: CatFileArgs) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let payload = repo.cat_object(&args.rev, args.expect)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&payload)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_write_tree(base: &Path) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    println!("{}", repo.write_tree()?);
    Ok(())
}

fn cmd_read_tree(base: &Path, args: ReadTreeArgs) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let tree = repo.read_tree(&args.rev)?;
    println!("{} Working directory set to tree {}", "✓".green(), tree.short_hex().yellow());
    Ok(())
}

fn cmd_commit(base: &Path, args: CommitArgs) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let id = repo.commit(&args.message)?;
    let location = repo
        .current_branch()?
        .unwrap_or_else(|| "detached HEAD".into());
    println!(
        "[{} {}] {}",
        location.yellow().bold(),
        id.short_hex().dimmed(),
        args.message.lines().next().unwrap_or("")
    );
    Ok(())
}

fn cmd_log(base: &Path, args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let entries = repo
        .log(&args.rev)?
        .take(limit)
        .collect::<Result<Vec<_>, _>>()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text if args.oneline => {
            for entry in &entries {
                println!(
                    "{}{} {}",
                    entry.commit.id.short_hex().yellow(),
                    decoration(entry),
                    entry.commit.summary()
                );
            }
        }
        OutputFormat::Text => {
            for entry in &entries {
                print!("{}", log_text(entry));
            }
        }
    }
    Ok(())
}

/// The entry's `Display` form with the `commit` header line highlighted.
fn log_text(entry: &LogEntry) -> String {
    let text = entry.to_string();
    match text.split_once('\n') {
        Some((header, body)) => format!("{}\n{body}", header.yellow()),
        None => text,
    }
}

/// ` (HEAD, refs/heads/master)` or nothing.
fn decoration(entry: &LogEntry) -> String {
    if entry.refs.is_empty() {
        return String::new();
    }
    format!(" ({})", entry.refs.join(", ").green())
}

fn cmd_checkout(base: &Path, args: CheckoutArgs) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let id = repo.checkout(&args.rev)?;
    match repo.current_branch()? {
        Some(branch) => println!("Switched to branch {}", branch.yellow().bold()),
        None => println!("HEAD is now at {} (detached)", id.short_hex().yellow()),
    }
    Ok(())
}

fn cmd_tag(base: &Path, args: TagArgs) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let id = repo.tag(&args.name, &args.rev)?;
    println!("Tagged {} as {}", id.short_hex().dimmed(), args.name.yellow());
    Ok(())
}

fn cmd_branch(base: &Path, args: BranchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    if let Some(name) = &args.name {
        let id = repo.create_branch(name, &args.rev)?;
        println!("Created branch {} at {}", name.yellow(), id.short_hex().dimmed());
        return Ok(());
    }

    let branches = repo.branches()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&branches)?),
        OutputFormat::Text => {
            for branch in &branches {
                if branch.current {
                    println!("* {}", branch.name.green().bold());
                } else {
                    println!("  {}", branch.name);
                }
            }
        }
    }
    Ok(())
}

fn cmd_k(base: &Path, args: GraphArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo(base)?;
    let graph = repo.ref_graph()?;
    let dot = graph.to_dot();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
        OutputFormat::Text => print!("{dot}"),
    }

    if args.render {
        let output = base.join(&args.output);
        render::render_png(&dot, &output)?;
        render::open(&output)?;
        eprintln!("{} Wrote {}", "✓".green(), output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        run_command(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn full_session_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        run(&["sprig", "-C", root, "init"]).unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        run(&["sprig", "-C", root, "commit", "-m", "first"]).unwrap();
        run(&["sprig", "-C", root, "tag", "v1"]).unwrap();
        run(&["sprig", "-C", root, "branch", "feature"]).unwrap();
        run(&["sprig", "-C", root, "checkout", "feature"]).unwrap();
        run(&["sprig", "-C", root, "log", "--oneline"]).unwrap();
        run(&["sprig", "-C", root, "--format", "json", "branch"]).unwrap();
        run(&["sprig", "-C", root, "k"]).unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("feature"));
        assert_eq!(repo.resolve("v1").unwrap(), repo.resolve("master").unwrap());
    }

    #[test]
    fn log_text_matches_entry_display() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let id = repo.commit("first\n\nbody").unwrap();

        let entry = repo.log("").unwrap().next().unwrap().unwrap();
        let text = log_text(&entry);
        assert_eq!(text, entry.to_string());
        assert!(text.starts_with(&format!("commit {id} (HEAD, refs/heads/master)\ntree ")));
        assert!(text.ends_with("\n\nfirst\n\nbody\n"));
    }

    #[test]
    fn commands_outside_a_repository_fail() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        assert!(run(&["sprig", "-C", root, "write-tree"]).is_err());
    }

    #[test]
    fn unknown_revision_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        run(&["sprig", "-C", root, "init"]).unwrap();
        assert!(run(&["sprig", "-C", root, "cat-file", "nope"]).is_err());
    }
}
