use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use speedyfx::config::{parse_seed, SketchConfig, DEFAULT_BIT_WIDTH, DEFAULT_SEED};
use speedyfx::{batch, tokenizer, util, CodeTable, FeatureVector};

/// Inputs at least this large are split across the Rayon pool.
const PARALLEL_THRESHOLD: usize = 64 * 1024 * 1024;
const PARALLEL_CHUNK_SIZE: usize = 16 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "speedyfx", about = "Fast text-to-feature-vector hashing")]
struct Cli {
    /// Suppress the run summary on stderr
    #[arg(long, short, global = true)]
    quiet: bool,
    /// Log progress (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct SketchArgs {
    /// Code table seed, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_seed, default_value_t = DEFAULT_SEED)]
    seed: u32,
    /// Feature vector width in bits
    #[arg(long, default_value_t = DEFAULT_BIT_WIDTH)]
    bits: usize,
}

impl From<SketchArgs> for SketchConfig {
    fn from(args: SketchArgs) -> Self {
        SketchConfig::new(args.seed, args.bits)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sketch one file (or stdin) into a raw feature vector
    Sketch {
        /// Input file, or `-` for standard input
        input: PathBuf,
        /// Output file for the feature vector (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        params: SketchArgs,
    },
    /// Sketch every file in a directory tree, in parallel
    Batch {
        /// Directory to read
        #[arg(long)]
        input: PathBuf,
        /// Directory to write `<relative path>.fv` files into
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        params: SketchArgs,
    },
}

fn init_logging(verbose: bool) {
    // stdout carries the feature vector, so logs go to stderr only
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_table(config: &SketchConfig) -> CodeTable {
    let table = CodeTable::build(config.seed);
    if table.entries().iter().all(|&code| code == 0) {
        warn!(seed = config.seed, "seed yields an all-zero code table; every sketch will be empty");
    }
    table
}

fn sketch_input(input: &Path, table: &CodeTable, bit_width: usize) -> Result<(FeatureVector, u64)> {
    if input.as_os_str() == "-" {
        info!("reading standard input");
        return util::sketch_reader(io::stdin().lock(), table, bit_width);
    }

    let data = util::open_input(input)?;
    info!(path = %input.display(), bytes = data.len(), "input opened");
    let fv = if data.len() >= PARALLEL_THRESHOLD {
        tokenizer::sketch_parallel(&data, table, bit_width, PARALLEL_CHUNK_SIZE)?
    } else {
        tokenizer::sketch(&data, table, bit_width)?
    };
    Ok((fv, data.len() as u64))
}

fn throughput_mb_s(bytes: u64, secs: f64) -> f64 {
    if secs > 0.0 {
        bytes as f64 / (1024.0 * 1024.0) / secs
    } else {
        0.0
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sketch {
            input,
            output,
            params,
        } => {
            let config = SketchConfig::from(params);
            config.validate()?;

            let start = Instant::now();
            let table = build_table(&config);
            let (fv, bytes_read) = tokio::task::spawn_blocking(move || {
                sketch_input(&input, &table, config.bit_width)
            })
            .await??;
            util::write_sketch(&fv, output.as_deref())?;
            let elapsed = start.elapsed();

            if !cli.quiet {
                eprintln!("Feature vector built");
                eprintln!("  Seed: {:#010x}", config.seed);
                eprintln!("  Width: {} bits ({} bytes)", fv.bit_width(), fv.byte_len());
                eprintln!("  Bytes read: {}", bytes_read);
                eprintln!("  Bits set: {}", fv.count_ones());
                eprintln!("  Time elapsed: {:.3}s", elapsed.as_secs_f64());
                eprintln!(
                    "  Throughput: {:.2} MB/s",
                    throughput_mb_s(bytes_read, elapsed.as_secs_f64())
                );
            }
        }
        Commands::Batch {
            input,
            output,
            params,
        } => {
            let config = SketchConfig::from(params);
            config.validate()?;
            if !cli.quiet {
                eprintln!("Sketching directory...");
                eprintln!("  Input: {}", input.display());
                eprintln!("  Output: {}", output.display());
            }

            let start = Instant::now();
            let summary = batch::sketch_tree(&input, &output, &config).await?;
            let elapsed = start.elapsed();

            if !cli.quiet {
                eprintln!("\nBatch complete!");
                eprintln!("  Files sketched: {}", summary.files_sketched);
                eprintln!("  Bytes read: {}", summary.bytes_read);
                eprintln!("  Bits set: {}", summary.bits_set);
                eprintln!("  Time elapsed: {:.3}s", elapsed.as_secs_f64());
                eprintln!(
                    "  Throughput: {:.2} MB/s",
                    throughput_mb_s(summary.bytes_read, elapsed.as_secs_f64())
                );
            }
        }
    }

    Ok(())
}
