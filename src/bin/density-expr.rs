use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

const LONG_ABOUT: &str = "\
Expression to Minecraft density function JSON converter.

Targets game version 1.21.10 (pack format 88).

- Functions are named exactly as in the density function documentation.
- Arguments may be positional or keyword, e.g.
  clamp(input=1, min=2, max=3) => {\"type\":\"minecraft:clamp\",\"input\":1.0,\"min\":2.0,\"max\":3.0}
- Use a string literal to reference another density function or noise.
- `+ - * /` map to add/mul/invert nodes; `x ** n` needs a literal integer n >= 0.

Run `density-expr functions` for the full function table.";

#[derive(Parser, Debug)]
#[command(name = "density-expr", version, about, long_about = LONG_ABOUT)]
struct Cli {
    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Print debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lower an expression and print the density function JSON.
    Lower(LowerArgs),
    /// List every known function with its parameters.
    Functions,
}

#[derive(Parser, Debug)]
struct LowerArgs {
    /// Expression to lower. Read from stdin when omitted.
    expr: Option<String>,

    /// Print JSON on a single line.
    #[arg(long)]
    compact: bool,

    /// JSON file with lowering options (`max_depth`, `max_pow_exponent`, `max_nodes`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the maximum expression depth.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Override the largest integer power that may be unrolled.
    #[arg(long)]
    max_pow_exponent: Option<u32>,

    /// Override the largest number of function nodes in the output.
    #[arg(long)]
    max_nodes: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    match cli.cmd {
        Command::Lower(args) => cmd_lower(args),
        Command::Functions => cmd_functions(),
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::ERROR
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_opts(args: &LowerArgs) -> anyhow::Result<density_expr::LowerOpts> {
    let mut opts = match &args.config {
        Some(path) => read_opts(path)?,
        None => density_expr::LowerOpts::default(),
    };
    if let Some(d) = args.max_depth {
        opts.max_depth = d;
    }
    if let Some(e) = args.max_pow_exponent {
        opts.max_pow_exponent = e;
    }
    if let Some(n) = args.max_nodes {
        opts.max_nodes = n;
    }
    Ok(opts)
}

fn read_opts(path: &Path) -> anyhow::Result<density_expr::LowerOpts> {
    density_expr::LowerOpts::from_path(path)
        .with_context(|| format!("load lowering options '{}'", path.display()))
}

fn cmd_lower(args: LowerArgs) -> anyhow::Result<()> {
    let opts = load_opts(&args)?;

    let src = match &args.expr {
        Some(s) => s.clone(),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read expression from stdin")?;
            s
        }
    };
    if src.trim().is_empty() {
        anyhow::bail!("no expression given");
    }

    let value = density_expr::compile_str(&src, &opts)?;
    tracing::debug!(
        nodes = value.node_count(),
        depth = value.depth(),
        "lowered expression"
    );
    println!("{}", value.to_json_string(!args.compact)?);
    Ok(())
}

fn cmd_functions() -> anyhow::Result<()> {
    for def in density_expr::registry::functions() {
        println!("{def}");
    }
    Ok(())
}
