use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::info;

use schedsim::loader;
use schedsim::stats::Summary;
use schedsim::types::{AllocatorKind, SchedulerKind};
use schedsim::SimConfig;
use schedsim::System;
use schedsim::Trace;
use schedsim::{DEFAULT_PAGE_KB, DEFAULT_QUANTUM};

/// schedsim: a deterministic process scheduling and memory management
/// simulator.
///
/// Reads a process descriptor file (one process per line: arrival time,
/// id, memory requirement in KB, job time), simulates the run under the
/// selected scheduling and allocation policies, and prints the event
/// trace followed by summary statistics. Identical inputs always produce
/// identical output.
#[derive(Debug, Parser)]
#[clap(version)]
struct Opts {
    /// Path to the process descriptor file.
    #[clap(short = 'f', long)]
    filename: PathBuf,

    /// Scheduling policy.
    #[clap(short = 'a', long, value_enum, default_value = "fcfs")]
    scheduler: SchedulerKind,

    /// Memory allocation policy.
    #[clap(short = 'm', long, value_enum, default_value = "unlimited")]
    allocator: AllocatorKind,

    /// Total physical memory in KB. Ignored by the unlimited allocator.
    #[clap(short = 's', long, default_value = "0")]
    memsize: u64,

    /// Page size in KB.
    #[clap(short = 'p', long, default_value_t = DEFAULT_PAGE_KB)]
    pagesize: u64,

    /// Round-robin quantum in cycles.
    #[clap(short = 'q', long, default_value_t = DEFAULT_QUANTUM)]
    quantum: u64,

    /// Print the summary statistics as JSON instead of text.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Enable verbose logging; repeat for trace-level detail. Logs go
    /// to stderr so the event trace on stdout stays clean.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let loglevel = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        loglevel,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let config = SimConfig::new(
        opts.scheduler,
        opts.allocator,
        opts.memsize,
        opts.pagesize,
        opts.quantum,
    )?;
    let procs = loader::load_processes(&opts.filename)
        .with_context(|| format!("failed to load {}", opts.filename.display()))?;
    info!(
        "simulating {} processes, scheduler {:?}, allocator {:?}",
        procs.len(),
        opts.scheduler,
        opts.allocator
    );

    let mut system = System::new(config, procs);
    let mut trace = Trace::new();
    system.run(&mut trace)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    trace.write_lines(&mut out)?;

    let summary = Summary::from_table(&system.table);
    if opts.json {
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        summary.format(&mut out)?;
    }
    Ok(())
}
