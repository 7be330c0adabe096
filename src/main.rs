extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod error;
mod locus;
mod sample;
mod tally;

use cli::Cli;

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let num_seqs = usize::try_from(cli.num_seqs).context("Sample size does not fit in memory")?;
    let cutoff = cli.cutoff.0;

    info!("locuscope v{}", cli::VERSION);
    info!(
        "Sampling {num_seqs} sequences from {} (cutoff {cutoff}, seed {:?})",
        cli.input_fasta_fp.display(),
        cli.seed
    );

    let subsample = sample::sample(&cli.input_fasta_fp, num_seqs, cli.seed)
        .with_context(|| format!("Could not sample from {}", cli.input_fasta_fp.display()))?;

    let tally = tally::tally(&subsample);
    info!(
        "Observed {} distinct leading tetramers",
        tally.distinct_observed()
    );

    for (tetramer, count) in tally.iter().take(5) {
        debug!("  {tetramer}\t{count}");
    }

    let verdict = locus::classify(&tally, num_seqs, cutoff);
    match verdict.locus() {
        Some(locus) => info!("Detected {locus} from {}", verdict.matched().join(", ")),
        None => warn!("No diagnostic tetramer above cutoff {cutoff}"),
    }
    println!("{verdict}");

    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
