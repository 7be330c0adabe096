use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::LocusError;

/// The lines of an unwrapped FASTA file, held in memory.
///
/// Records are assumed to be exactly two lines long (a header followed by a single sequence
/// line), so sequence lines sit at every odd 0-indexed position. Wrapped sequences or blank
/// lines break this assumption and are not detected.
pub struct SequenceFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl SequenceFile {
    /// Reads every line of the file at `path` into memory.
    ///
    /// # Errors
    ///
    /// Returns `LocusError::Io` if the file cannot be opened or a line cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LocusError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| LocusError::Io {
            path: path.clone(),
            source,
        })?;

        Self::from_reader(BufReader::new(file), path)
    }

    /// Reads every line of `reader`. `path` is only used for error reporting.
    pub fn from_reader(reader: impl BufRead, path: impl Into<PathBuf>) -> Result<Self, LocusError> {
        let path = path.into();

        // `lines()` strips both `\n` and `\r\n`
        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|source| LocusError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(SequenceFile { path, lines })
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The 0-indexed positions of every sequence line: 1, 3, 5, ...
    pub fn sequence_positions(&self) -> impl Iterator<Item = usize> {
        (1..self.lines.len()).step_by(2)
    }

    /// The number of sequence lines available for sampling.
    pub fn sequence_count(&self) -> usize {
        self.lines.len() / 2
    }

    /// Draws `num_seqs` sequence lines at random, returned in the order they were drawn.
    ///
    /// When the file holds fewer sequence lines than `num_seqs`, lines are drawn *with*
    /// replacement so that the subsample always has exactly `num_seqs` entries. Otherwise
    /// they are drawn without replacement.
    ///
    /// # Errors
    ///
    /// * `LocusError::InvalidInput` if `num_seqs` is zero.
    /// * `LocusError::InsufficientData` if the file has no sequence lines.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        num_seqs: usize,
        rng: &mut R,
    ) -> Result<Vec<&str>, LocusError> {
        if num_seqs == 0 {
            return Err(LocusError::InvalidInput(
                "the number of sequences to sample must be at least 1".to_string(),
            ));
        }

        let positions: Vec<usize> = self.sequence_positions().collect();
        let available = positions.len();
        if available == 0 {
            return Err(LocusError::InsufficientData {
                path: self.path.clone(),
            });
        }

        let indices: Vec<usize> = if available < num_seqs {
            warn!(
                "Only {available} sequences available but {num_seqs} requested; \
                sampling with replacement"
            );
            (0..num_seqs)
                .map(|_| rng.random_range(0..available))
                .collect()
        } else {
            debug!("Sampling {num_seqs} of {available} sequences without replacement");
            rand::seq::index::sample(rng, available, num_seqs)
                .into_iter()
                .collect()
        };

        Ok(indices
            .into_iter()
            .map(|i| self.lines[positions[i]].as_str())
            .collect())
    }
}

/// Creates the random number generator used for subsampling. A seed gives a fully reproducible
/// draw; `None` seeds from the operating system.
pub fn rng_from_seed(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    }
}

/// Reads the FASTA file at `path` and returns `num_seqs` randomly drawn sequences.
///
/// # Errors
///
/// See `SequenceFile::from_path` and `SequenceFile::sample`.
pub fn sample(
    path: impl AsRef<Path>,
    num_seqs: usize,
    seed: Option<u64>,
) -> Result<Vec<String>, LocusError> {
    let file = SequenceFile::from_path(path)?;
    info!(
        "Read {} lines ({} sequences) from {:?}",
        file.line_count(),
        file.sequence_count(),
        file.path
    );

    let mut rng = rng_from_seed(seed);
    let subsample = file.sample(num_seqs, &mut rng)?;

    Ok(subsample.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn fasta(seqs: &[&str]) -> SequenceFile {
        let text: String = seqs
            .iter()
            .enumerate()
            .map(|(i, s)| format!(">seq{i}\n{s}\n"))
            .collect();
        SequenceFile::from_reader(Cursor::new(text), "in-memory.fa").unwrap()
    }

    #[test]
    fn positions_are_every_second_line() {
        let file = fasta(&["AAAA", "CCCC", "GGGG"]);
        assert_eq!(file.sequence_positions().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(file.sequence_count(), 3);
    }

    #[test]
    fn dangling_header_is_not_a_sequence() {
        let file = SequenceFile::from_reader(Cursor::new(">a\nTACG\n>b\n"), "x.fa").unwrap();
        assert_eq!(file.sequence_count(), 1);
        assert_eq!(file.sequence_positions().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn without_replacement_draws_each_line_once() {
        let seqs = ["AAAA", "CCCC", "GGGG", "TTTT", "TACG"];
        let file = fasta(&seqs);
        let mut rng = rng_from_seed(Some(7));

        let mut drawn = file.sample(5, &mut rng).unwrap();
        drawn.sort_unstable();

        let mut expected = seqs.to_vec();
        expected.sort_unstable();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn never_returns_header_lines() {
        let file = fasta(&["TACGTT", "GTAGCC", "GCTAAA"]);
        let mut rng = rng_from_seed(Some(1));

        for seq in file.sample(50, &mut rng).unwrap() {
            assert!(!seq.starts_with('>'), "sampled a header: {seq}");
        }
    }

    #[test]
    fn small_files_are_sampled_with_replacement() {
        let file = fasta(&["TACG", "GTAG"]);
        let mut rng = rng_from_seed(Some(42));

        let drawn = file.sample(10, &mut rng).unwrap();
        assert_eq!(drawn.len(), 10);
        assert!(drawn.iter().all(|s| *s == "TACG" || *s == "GTAG"));
    }

    #[test]
    fn same_seed_same_subsample() {
        let seqs: Vec<String> = (0..200).map(|i| format!("ACGT{i:04}")).collect();
        let refs: Vec<&str> = seqs.iter().map(String::as_str).collect();
        let file = fasta(&refs);

        let a = file.sample(25, &mut rng_from_seed(Some(99))).unwrap();
        let b = file.sample(25, &mut rng_from_seed(Some(99))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_file_is_insufficient() {
        let file = SequenceFile::from_reader(Cursor::new(""), "empty.fa").unwrap();
        let err = file.sample(10, &mut rng_from_seed(Some(0))).unwrap_err();
        assert!(matches!(err, LocusError::InsufficientData { .. }));
    }

    #[test]
    fn header_only_file_is_insufficient() {
        let file = SequenceFile::from_reader(Cursor::new(">only a header\n"), "h.fa").unwrap();
        let err = file.sample(1, &mut rng_from_seed(None)).unwrap_err();
        assert!(matches!(err, LocusError::InsufficientData { .. }));
    }

    #[test]
    fn zero_sample_size_is_rejected() {
        let file = fasta(&["TACG"]);
        let err = file.sample(0, &mut rng_from_seed(Some(0))).unwrap_err();
        assert!(matches!(err, LocusError::InvalidInput(_)));
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let file = SequenceFile::from_reader(Cursor::new(">a\r\nTACGAA\r\n"), "crlf.fa").unwrap();
        let drawn = file.sample(1, &mut rng_from_seed(Some(3))).unwrap();
        assert_eq!(drawn, vec!["TACGAA"]);
    }

    #[test]
    fn sample_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, ">a\nTACGGA\n>b\nTACGAG\n>c\nTACGTA\n").unwrap();

        let drawn = sample(tmp.path(), 3, Some(5)).unwrap();
        assert_eq!(drawn.len(), 3);
        assert!(drawn.iter().all(|s| s.starts_with("TACG")));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = sample("definitely/not/a/file.fa", 10, None).unwrap_err();
        assert!(matches!(err, LocusError::Io { .. }));
    }
}
