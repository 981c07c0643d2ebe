use std::io::{BufRead, Write};

use crate::dag::WordDag;
use crate::error::{Error, Result};
use crate::hmm::{Hmm, NUM_STATES};
use crate::rune::split_runes;
use crate::viterbi::viterbi;

/// Position of a rune within its word: the BMES tagging scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmesState {
    /// First rune of a multi-rune word.
    Begin = 0,
    /// Interior rune of a multi-rune word.
    Middle = 1,
    /// Last rune of a multi-rune word.
    End = 2,
    /// A word of its own.
    Single = 3,
}

impl BmesState {
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub(crate) fn from_ordinal(ordinal: usize) -> BmesState {
        match ordinal {
            0 => BmesState::Begin,
            1 => BmesState::Middle,
            2 => BmesState::End,
            _ => BmesState::Single,
        }
    }
}

/// Four-state BMES segmentation model: an [Hmm] whose observables are
/// individual runes and whose states tag each rune with its position in a
/// word. A word boundary falls after every rune tagged End or Single.
///
/// Train it with rune/tag sequences (or load counts from a model file),
/// then let [add_edges](BmesHmm::add_edges) propose out-of-dictionary words
/// to the lattice.
#[derive(Debug, Clone, Default)]
pub struct BmesHmm {
    pub hmm: Hmm,
}

impl BmesHmm {
    pub fn new() -> BmesHmm {
        BmesHmm::default()
    }

    /// Accumulates one tagged rune sequence into the training counts.
    /// Remember to [normalize](BmesHmm::normalize) before decoding.
    pub fn train(&mut self, observations: &[&[u8]], tags: &[BmesState]) {
        let ordinals: Vec<usize> = tags.iter().map(|tag| tag.ordinal()).collect();
        self.hmm.train(observations, &ordinals);
    }

    pub fn normalize(&mut self) {
        self.hmm.normalize();
    }

    /// See [Hmm::is_trivial]. A trivial model contributes no edges.
    pub fn is_trivial(&self) -> bool {
        self.hmm.is_trivial()
    }

    /// Viterbi-decodes one BMES tag per rune.
    pub fn decode(&self, runes: &[&[u8]]) -> Vec<BmesState> {
        viterbi(&self.hmm, runes)
            .into_iter()
            .map(BmesState::from_ordinal)
            .collect()
    }

    /// Decodes the lattice sentence and adds one edge per decoded word,
    /// each carrying `weight`: an edge closes after every rune tagged End
    /// or Single and the next one opens right behind it.
    ///
    /// Does nothing for a trivial model.
    pub fn add_edges(&self, dag: &mut WordDag<'_>, weight: f64) -> Result<()> {
        if self.is_trivial() {
            return Ok(());
        }
        let runes = split_runes(dag.sentence())?;
        let states = self.decode(&runes);

        let mut edge_start = 0;
        let mut edge_end = 0;
        for (rune, state) in runes.iter().zip(&states) {
            edge_end += rune.len();
            if matches!(state, BmesState::End | BmesState::Single) {
                dag.add_edge(edge_start, edge_end, weight);
                edge_start = edge_end;
            }
        }
        Ok(())
    }
}

fn parse_counts(line: &str) -> Result<[u64; NUM_STATES]> {
    let mut counts = [0u64; NUM_STATES];
    let mut fields = line.split(' ');
    for slot in &mut counts {
        let field = fields
            .next()
            .ok_or_else(|| Error::Parse(format!("expected {NUM_STATES} counts in {line:?}")))?;
        *slot = field
            .parse()
            .map_err(|_| Error::Parse(format!("bad count {field:?}")))?;
    }
    Ok(counts)
}

/// Loads a model from its text form and normalizes it. Line 1 holds the
/// four initial-state counts, lines 2-5 the transition rows, then each
/// observed rune takes two lines: the rune itself and its four emission
/// counts. EOF terminates.
pub fn load_model<R: BufRead>(reader: R) -> Result<BmesHmm> {
    let mut model = BmesHmm::new();
    let mut lines = reader.lines();

    let pi_line = lines
        .next()
        .ok_or_else(|| Error::Parse("missing initial-state line".into()))??;
    model.hmm.training.pi = parse_counts(&pi_line)?;

    for row in &mut model.hmm.training.a {
        let a_line = lines
            .next()
            .ok_or_else(|| Error::Parse("missing transition row".into()))??;
        *row = parse_counts(&a_line)?;
    }

    while let Some(obs_line) = lines.next() {
        let obs = obs_line?;
        let counts_line = lines
            .next()
            .ok_or_else(|| Error::Parse(format!("missing emission counts for {obs:?}")))??;
        model
            .hmm
            .training
            .b
            .insert(obs.into_bytes().into_boxed_slice(), parse_counts(&counts_line)?);
    }

    model.normalize();
    Ok(model)
}

/// Writes the training counts in the same text form [load_model] reads.
/// Observables are emitted in sorted byte order so the output is
/// deterministic; the reader accepts any order.
pub fn save_model<W: Write>(model: &BmesHmm, writer: &mut W) -> Result<()> {
    let counts = &model.hmm.training;

    let write_counts = |writer: &mut W, row: &[u64; NUM_STATES]| -> Result<()> {
        writeln!(writer, "{} {} {} {}", row[0], row[1], row[2], row[3])?;
        Ok(())
    };

    write_counts(writer, &counts.pi)?;
    for row in &counts.a {
        write_counts(writer, row)?;
    }

    let mut observables: Vec<&[u8]> = counts.b.keys().map(|obs| obs.as_ref()).collect();
    observables.sort_unstable();
    for obs in observables {
        writer.write_all(obs)?;
        writer.write_all(b"\n")?;
        write_counts(writer, &counts.b[obs])?;
    }
    Ok(())
}
