use indexmap::IndexMap;

/// Length of the leading k-mer used for locus detection.
pub const KMER_LENGTH: usize = 4;

/// Zero-count keys appended so that a ranking always has at least three entries.
pub const PLACEHOLDERS: [&str; 2] = ["NNNX", "NNNY"];

/// Minimum number of ranked entries the classifier reads.
pub const MIN_RANKS: usize = 3;

/// Returns the first `KMER_LENGTH` characters of `seq`. Shorter sequences are returned whole.
pub fn leading_tetramer(seq: &str) -> &str {
    match seq.char_indices().nth(KMER_LENGTH) {
        Some((end, _)) => &seq[..end],
        None => seq,
    }
}

/// Leading tetramers of a subsample, ranked by how often they occur.
///
/// Ties are broken by the order in which each tetramer was first seen. This ordering is an
/// implementation detail and should not be relied upon.
#[derive(Debug, Clone, PartialEq)]
pub struct TetramerTally {
    ranking: Vec<(String, usize)>,
    distinct: usize,
}

impl TetramerTally {
    pub fn from_sequences<'a, I>(seqs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for seq in seqs {
            *counts.entry(leading_tetramer(seq)).or_insert(0) += 1;
        }

        let mut ranking: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        // stable, so first-seen order survives among equal counts
        ranking.sort_by(|a, b| b.1.cmp(&a.1));

        let distinct = ranking.len();
        debug_assert!(distinct > 0, "cannot tally an empty subsample");

        let mut tally = TetramerTally { ranking, distinct };
        tally.pad();
        tally
    }

    /// Appends placeholder entries until there are at least `MIN_RANKS` entries.
    fn pad(&mut self) {
        for placeholder in PLACEHOLDERS {
            if self.ranking.len() >= MIN_RANKS {
                break;
            }
            self.ranking.push((placeholder.to_string(), 0));
        }
    }

    /// The three highest-ranked entries.
    pub fn top_three(&self) -> [(&str, usize); 3] {
        let [a, b, c] = [&self.ranking[0], &self.ranking[1], &self.ranking[2]];
        [(a.0.as_str(), a.1), (b.0.as_str(), b.1), (c.0.as_str(), c.1)]
    }

    /// Number of distinct tetramers actually observed, excluding placeholders.
    pub fn distinct_observed(&self) -> usize {
        self.distinct
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ranking.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Tallies and ranks the leading tetramers of every sequence in `subsample`.
pub fn tally<S: AsRef<str>>(subsample: &[S]) -> TetramerTally {
    TetramerTally::from_sequences(subsample.iter().map(AsRef::as_ref))
}
