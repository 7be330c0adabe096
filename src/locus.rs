use std::fmt;

use crate::tally::TetramerTally;

/// Amplicon loci which can be recognised from their leading tetramers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locus {
    /// 16S rRNA, amplified with the 515f forward primer
    Bacterial16S,

    /// ITS rRNA, amplified with the ITS1f forward primer
    FungalIts,

    /// 18S rRNA, amplified with the Euk1391f forward primer
    Eukaryotic18S,
}

impl Locus {
    /// Returns the leading tetramers diagnostic of this locus.
    ///
    /// `ACAC` is listed for 18S although the Euk1391f primer pattern `GCT[AC]` would only give
    /// `GCTA` and `GCTC`. It is kept because it is part of the established decision rule.
    pub fn diagnostic_tetramers(&self) -> &'static [&'static str] {
        match self {
            Locus::Bacterial16S => &["TACG"],
            Locus::FungalIts => &["GTAG"],
            Locus::Eukaryotic18S => &["GCTA", "GCTC", "ACAC"],
        }
    }

    pub fn is_diagnostic(&self, tetramer: &str) -> bool {
        self.diagnostic_tetramers().contains(&tetramer)
    }

    pub fn gene(&self) -> &'static str {
        match self {
            Locus::Bacterial16S => "16S",
            Locus::FungalIts => "ITS",
            Locus::Eukaryotic18S => "18S",
        }
    }

    pub fn primer(&self) -> &'static str {
        match self {
            Locus::Bacterial16S => "515f",
            Locus::FungalIts => "ITS1f",
            Locus::Eukaryotic18S => "Euk1391f",
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.gene(), self.primer())
    }
}

/// The outcome of classifying a tally.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// A locus was detected. `fraction` is the share of the requested sample that starts with
    /// one of the `matched` tetramers.
    Detected {
        locus: Locus,
        fraction: f64,
        matched: Vec<String>,
    },

    /// No rule matched with enough support. `tetramer` is the most frequent leading tetramer.
    Undetermined { fraction: f64, tetramer: String },
}

impl Verdict {
    pub fn locus(&self) -> Option<Locus> {
        match self {
            Verdict::Detected { locus, .. } => Some(*locus),
            Verdict::Undetermined { .. } => None,
        }
    }

    pub fn fraction(&self) -> f64 {
        match self {
            Verdict::Detected { fraction, .. } | Verdict::Undetermined { fraction, .. } => {
                *fraction
            }
        }
    }

    /// The tetramers cited as evidence for this verdict.
    pub fn matched(&self) -> Vec<&str> {
        match self {
            Verdict::Detected { matched, .. } => matched.iter().map(String::as_str).collect(),
            Verdict::Undetermined { tetramer, .. } => vec![tetramer.as_str()],
        }
    }

    /// The supporting fraction as a percentage, to one decimal place.
    pub fn percent(&self) -> String {
        format!("{:.1}", self.fraction() * 100.0)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Detected { locus, matched, .. } => {
                let tetramers = match matched.as_slice() {
                    [a, b, c] => format!("{a}, {b}, or {c}"),
                    other => other.join(", "),
                };
                write!(
                    f,
                    "Amplicon locus: {locus} ({}% of sequences start with {tetramers})",
                    self.percent()
                )
            }
            Verdict::Undetermined { tetramer, .. } => write!(
                f,
                "Could not determine amplicon locus\n\
                (most frequent starting tetramer was {tetramer} with {}%)",
                self.percent()
            ),
        }
    }
}

/// Classifies a ranked tally against the diagnostic tetramers.
///
/// Fractions are taken over `num_seqs`, the requested sample size. Rules are tried in order and
/// the first to match wins:
///
/// 1. the top tetramer is `TACG` and makes up more than `cutoff` of the sample: 16S
/// 2. the top tetramer is `GTAG` and makes up more than `cutoff` of the sample: ITS
/// 3. the top three tetramers are all 18S tetramers and together make up more than `cutoff`: 18S
///
/// Otherwise the verdict is `Undetermined`. All comparisons are strict.
pub fn classify(tally: &TetramerTally, num_seqs: usize, cutoff: f64) -> Verdict {
    let [(first, count1), (second, count2), (third, count3)] = tally.top_three();

    let total = num_seqs as f64;
    let frac1 = count1 as f64 / total;
    let frac123 = (count1 + count2 + count3) as f64 / total;

    debug!(
        "Top tetramers: {first} ({count1}), {second} ({count2}), {third} ({count3}) of {num_seqs}"
    );

    for locus in [Locus::Bacterial16S, Locus::FungalIts] {
        if locus.is_diagnostic(first) && frac1 > cutoff {
            return Verdict::Detected {
                locus,
                fraction: frac1,
                matched: vec![first.to_string()],
            };
        }
    }

    let euk = Locus::Eukaryotic18S;
    if [first, second, third].iter().all(|t| euk.is_diagnostic(t)) && frac123 > cutoff {
        return Verdict::Detected {
            locus: euk,
            fraction: frac123,
            matched: vec![first.to_string(), second.to_string(), third.to_string()],
        };
    }

    Verdict::Undetermined {
        fraction: frac1,
        tetramer: first.to_string(),
    }
}
