use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocusError {
    #[error("unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "no sequence lines to sample from in {path:?}
expected a FASTA file with one header line followed by one sequence line per record"
    )]
    InsufficientData { path: PathBuf },

    #[error("invalid cutoff: {0}")]
    InvalidCutoff(String),

    #[error("invalid input file: {0}")]
    InvalidInput(String),
}
