use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use csim::config::CacheConfig;
use csim::simulation::Simulator;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Replays a memory trace against an LRU set-associative cache",
    after_help = "Examples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 8 -E 2 -b 4 -t traces/yi.trace"
)]
struct Cli {
    /// Number of set index bits (the cache has 2^s sets).
    #[arg(short = 's', value_name = "num", value_parser = clap::value_parser!(u32).range(1..))]
    set_bits: u32,

    /// Number of lines per set.
    #[arg(short = 'E', value_name = "num", value_parser = clap::value_parser!(u64).range(1..))]
    lines_per_set: u64,

    /// Number of block offset bits (blocks are 2^b bytes).
    #[arg(short = 'b', value_name = "num", value_parser = clap::value_parser!(u32).range(1..))]
    block_bits: u32,

    /// Trace file.
    #[arg(short = 't', value_name = "file")]
    trace: PathBuf,

    /// Print the outcome of every trace event.
    #[arg(short = 'v')]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Warn
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let lines_per_set = usize::try_from(args.lines_per_set)?;
    let config = CacheConfig::new(args.set_bits, lines_per_set, args.block_bits)?;
    let mut simulator = Simulator::new(config)?;
    info!("{}", config.format_info());

    let verbose = args.verbose;
    let simulated = simulator.simulate_file(&args.trace, |event, outcome| {
        if verbose && !outcome.accesses().is_empty() {
            println!("{event} {outcome}");
        }
    });
    // an unreadable trace still reports a (zero) summary
    let result = match simulated {
        Ok(result) => result,
        Err(e) => {
            warn!("unable to read trace file {}: {e}", args.trace.display());
            simulator.result()
        }
    };

    println!("{result}");
    if verbose {
        println!("Percent Hits: {:.3}%", result.percent_hit());
        println!("Percent Misses: {:.3}%", result.percent_miss());
    }

    Ok(())
}
