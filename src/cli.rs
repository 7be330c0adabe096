use std::path::PathBuf;

use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;

use crate::error::LocusError;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 locuscope version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   detect the amplicon locus of a FASTA file from its 5' tetramers";

const LONG_ABOUT: &str = indoc::indoc! {"
    Determine the most likely amplicon locus of a FASTA file based on the first four
    nucleotides of a random subsample of its sequences.

    The most frequent 5' tetramer must match, above a given cutoff fraction of the
    sampled sequences, one of the following diagnostic tetramers:

      Tetramer    Amplicon    Forward primer
      TACG        16S rRNA    515f
      GTAG        ITS rRNA    ITS1f
      GCT[AC]     18S rRNA    Euk1391f

    Input must be unwrapped FASTA: each header line followed by exactly one sequence line.
"};

pub const DEFAULT_NUM_SEQS: u64 = 10000;
pub const DEFAULT_CUTOFF: f64 = 0.5;

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    long_about = LONG_ABOUT,
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// input FASTA file (.fa, .fna, .fasta), e.g. from Deblur
    #[arg(short = 'f', long, value_parser = existing_file)]
    pub input_fasta_fp: PathBuf,

    /// number of sequences to randomly subsample
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_NUM_SEQS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub num_seqs: u64,

    /// minimum fraction of sequences required to match a diagnostic 5' tetramer.
    /// must be in the interval (0,1]
    #[arg(
        short,
        long,
        value_parser = |x: &str| Cutoff::try_from(x),
        default_value_t = Cutoff(DEFAULT_CUTOFF),
        verbatim_doc_comment
    )]
    pub cutoff: Cutoff,

    /// random number seed, for a reproducible subsample
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Resolves `arg` to an absolute path and checks that it is a regular, existing file.
fn existing_file(arg: &str) -> Result<PathBuf, LocusError> {
    let path = std::path::absolute(arg)
        .map_err(|e| LocusError::InvalidInput(format!("could not resolve '{arg}': {e}")))?;

    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(LocusError::InvalidInput(format!(
            "'{}' is not a regular file",
            path.display()
        ))),
        Err(e) => Err(LocusError::InvalidInput(format!("'{}': {e}", path.display()))),
    }
}

/// A fraction in the interval (0,1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cutoff(pub f64);

impl std::fmt::Display for Cutoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> TryFrom<&'a str> for Cutoff {
    type Error = LocusError;

    fn try_from(arg: &'a str) -> Result<Cutoff, Self::Error> {
        let value = arg.trim().parse::<f64>().map_err(|_| {
            LocusError::InvalidCutoff(indoc::formatdoc! {"
            expected a number in (0,1], got '{arg}', as in:
              --cutoff 0.5
              --cutoff 0.9
              --cutoff 1
            "})
        })?;

        if !(value > 0.0 && value <= 1.0) {
            return Err(LocusError::InvalidCutoff(format!(
                "{value} is outside the interval (0,1]"
            )));
        }

        Ok(Cutoff(value))
    }
}
