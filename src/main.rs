use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sgidbc::*;

/// Count the read pairs supporting each sgID/barcode combination.
///
/// The forward and reverse reads must agree on the barcode; the sgID of the forward read must
/// exactly match a known sgID, otherwise it is reported as `None`.
#[derive(Parser)]
#[command(name = "sgidbc")]
#[command(version)]
struct Cli {
    /// Forward read fastq file (optionally gzip compressed)
    forward: String,

    /// Reverse read fastq file. Derived from the forward file name when not given
    #[arg(long)]
    reverse: Option<String>,

    /// Token in the forward file name that marks the forward reads
    #[arg(long, default_value = "_R1")]
    r1_token: String,

    /// Replacement for the forward token to get the reverse file name
    #[arg(long, default_value = "_R2")]
    r2_token: String,

    /// YAML file with the known sgIDs. The built-in table is used when not given
    #[arg(long)]
    identifiers: Option<String>,

    /// Maximum edits in the constant anchor of the forward read
    #[arg(long, default_value_t = 1)]
    forward_max_edits: usize,

    /// Maximum edits in the constant anchor of the reverse read
    #[arg(long, default_value_t = 2)]
    reverse_max_edits: usize,

    /// Output file. Compressed with gzip if it ends with `.gz`
    #[arg(short, long, default_value = "MergeReadOut")]
    output: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sgidbc=debug,info")
    } else {
        EnvFilter::new("sgidbc=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let reverse = match &cli.reverse {
        Some(reverse) => reverse.clone(),
        None => reverse_path(&cli.forward, &cli.r1_token, &cli.r2_token)?,
    };

    let identifiers = match &cli.identifiers {
        Some(file) => IdentifierTable::from_yaml_file(file)
            .with_context(|| format!("Failed to load sgIDs from {}", file))?,
        None => IdentifierTable::reference(),
    };
    info!("Using {} known sgIDs", identifiers.len());

    let processor = PairProcessor::new(
        &LocatorConfig::forward().with_max_edits(cli.forward_max_edits),
        &LocatorConfig::reverse().with_max_edits(cli.reverse_max_edits),
        identifiers,
    )?;

    info!("Reading {} and {}", cli.forward, reverse);
    let reads = PairedFastq::new(&cli.forward, &reverse)?;

    // nothing is written unless every pair was read successfully
    let mut counts = BarcodeCounts::new();
    processor
        .run(reads, &mut counts)
        .with_context(|| format!("Failed to process {} and {}", cli.forward, reverse))?;

    let sorted = counts.finalize();
    write_counts_file(&cli.output, &sorted)
        .with_context(|| format!("Failed to write {}", cli.output))?;
    info!("Wrote {} sgID/barcode combinations to {}", sorted.len(), cli.output);

    Ok(())
}
