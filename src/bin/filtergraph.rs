use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filtergraph", version)]
struct Cli {
    /// Log graph construction and compilation to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a JSON graph description and print the filter-graph expression.
    Compile(CompileArgs),
    /// Check a JSON graph description without printing the expression.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input graph description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Compile options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Prefix for auto-assigned labels (overrides the options file).
    #[arg(long)]
    label_prefix: Option<String>,

    /// Disable filter-graph escaping.
    #[arg(long, default_value_t = false)]
    no_escape: bool,

    /// Also print the resolved label of each terminal output, one per line.
    #[arg(long, default_value_t = false)]
    show_outputs: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input graph description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("filtergraph={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let desc = filtergraph::GraphDescription::from_path(&args.in_path)?;

    let mut opts = match &args.opts {
        Some(path) => filtergraph::CompileOpts::from_path(path)?,
        None => filtergraph::CompileOpts::default(),
    };
    if let Some(prefix) = args.label_prefix {
        opts.label_prefix = prefix;
    }
    if args.no_escape {
        opts.escape = false;
    }

    let graph = filtergraph::FilterGraph::new();
    let terminals = desc
        .build(&graph)
        .with_context(|| format!("build graph from '{}'", args.in_path.display()))?;
    let compiled = graph.compile_with(&terminals, &opts)?;

    println!("{compiled}");
    if args.show_outputs {
        for label in &compiled.outputs {
            println!("{label}");
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let desc = filtergraph::GraphDescription::from_path(&args.in_path)?;
    let graph = filtergraph::FilterGraph::new();
    let terminals = desc.build(&graph)?;
    let compiled = graph.compile(&terminals)?;
    eprintln!(
        "ok: {} node(s), {} output(s)",
        compiled.node_count,
        compiled.outputs.len()
    );
    Ok(())
}
