use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "b2r2-plan", version)]
struct Cli {
    /// Log analyze/configure decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a JSON blit request and print the job as JSON.
    Plan(PlanArgs),
    /// Sweep a grid of requests and check node-count agreement.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Temporary buffer budget in bytes.
    #[arg(long, default_value_t = b2r2_nodesplit::DEFAULT_MAX_BUF_SIZE)]
    max_buf_size: u32,

    /// Print the node list and the filter tables it uses instead of JSON.
    #[arg(long)]
    dump: bool,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Temporary buffer budget in bytes.
    #[arg(long, default_value_t = b2r2_nodesplit::DEFAULT_MAX_BUF_SIZE)]
    max_buf_size: u32,

    /// Extents swept for every width and height (comma separated).
    #[arg(long, value_delimiter = ',')]
    dims: Option<Vec<i32>>,

    /// Worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Skip the global-alpha variants.
    #[arg(long)]
    no_blend: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn read_request_json(path: &Path) -> anyhow::Result<b2r2_nodesplit::BlitRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let req: b2r2_nodesplit::BlitRequest =
        serde_json::from_reader(r).with_context(|| "parse request JSON")?;
    Ok(req)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let req = read_request_json(&args.in_path)?;

    let mut node_mem = b2r2_nodesplit::BumpAllocator::new(0x1000_0000, 0x10_0000);
    let mut buf_mem = b2r2_nodesplit::BumpAllocator::new(0x2000_0000, 0x100_0000);
    let job = b2r2_nodesplit::compile_job(&req, args.max_buf_size, &mut node_mem, &mut buf_mem)
        .with_context(|| format!("compile '{}'", args.in_path.display()))?;

    if args.dump {
        println!(
            "{:?}: {} nodes, {} temporary buffers",
            job.plan.kind,
            job.node_count(),
            job.work_bufs.len()
        );
        print!("{}", job.nodes.dump());
        print_filter_tables(&job.nodes);
    } else {
        let out = serde_json::to_string_pretty(&job).with_context(|| "serialize job")?;
        println!("{out}");
    }
    Ok(())
}

/// Print the coefficient tables the chain's rescale stages select, once per table.
fn print_filter_tables(nodes: &b2r2_nodesplit::NodeList) {
    let mut h_kinds = Vec::new();
    let mut v_kinds = Vec::new();
    for rescale in nodes.chain().filter_map(|n| n.rescale) {
        if !h_kinds.contains(&rescale.h_filter) {
            h_kinds.push(rescale.h_filter);
        }
        if !v_kinds.contains(&rescale.v_filter) {
            v_kinds.push(rescale.v_filter);
        }
    }

    let tables = b2r2_nodesplit::filter_tables();
    for kind in h_kinds {
        println!("h filter {kind:?}");
        for (phase, taps) in tables.horizontal(kind).iter().enumerate() {
            println!("  {phase:2}: {taps:?}");
        }
    }
    for kind in v_kinds {
        println!("v filter {kind:?}");
        for (phase, taps) in tables.vertical(kind).iter().enumerate() {
            println!("  {phase:2}: {taps:?}");
        }
    }
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let mut opts = b2r2_nodesplit::SweepOpts {
        max_buf_size: args.max_buf_size,
        threads: args.threads,
        blend: !args.no_blend,
        ..Default::default()
    };
    if let Some(dims) = args.dims {
        anyhow::ensure!(
            dims.iter().all(|d| *d > 0),
            "sweep dims must be positive"
        );
        opts.dims = dims;
    }

    let report = b2r2_nodesplit::run_sweep(&opts)?;
    eprintln!(
        "checked {} requests ({} rejected, {} nodes)",
        report.checked, report.rejected, report.nodes
    );
    if !report.mismatches.is_empty() {
        let out =
            serde_json::to_string_pretty(&report.mismatches).with_context(|| "serialize report")?;
        println!("{out}");
        anyhow::bail!("{} requests disagree with their plan", report.mismatches.len());
    }
    Ok(())
}
