use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sprig_sdk::ObjectKind;

#[derive(Parser)]
#[command(
    name = "sprig",
    about = "sprig: a small content-addressed version control system",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run as if started in DIR
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Store a file as a blob and print its id
    HashObject(HashObjectArgs),
    /// Print the payload of an object
    CatFile(CatFileArgs),
    /// Store the working directory as a tree and print its id
    WriteTree,
    /// Replace the working directory with a stored tree
    ReadTree(ReadTreeArgs),
    /// Record the working directory as a new commit
    Commit(CommitArgs),
    /// Show commit history
    Log(LogArgs),
    /// Switch the working directory and HEAD to a branch or commit
    Checkout(CheckoutArgs),
    /// Create or move a tag
    Tag(TagArgs),
    /// List branches, or create one
    Branch(BranchArgs),
    /// Print the ref and commit graph as Graphviz DOT
    K(GraphArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Object id or ref; defaults to HEAD
    #[arg(default_value = "")]
    pub rev: String,
    /// Fail unless the object has this kind
    #[arg(long)]
    pub expect: Option<ObjectKind>,
}

#[derive(Args)]
pub struct ReadTreeArgs {
    #[arg(default_value = "")]
    pub rev: String,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(default_value = "")]
    pub rev: String,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct CheckoutArgs {
    pub rev: String,
}

#[derive(Args)]
pub struct TagArgs {
    pub name: String,
    #[arg(default_value = "")]
    pub rev: String,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: Option<String>,
    #[arg(default_value = "")]
    pub rev: String,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Render to PNG with Graphviz and open it
    #[arg(long)]
    pub render: bool,
    #[arg(long, default_value = "sprig-graph.png")]
    pub output: PathBuf,
}
