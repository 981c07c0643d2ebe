use crate::dag::{shortest_path, WordDag};
use crate::dict::FreqDict;
use crate::error::Result;
use crate::rune::{add_special_edges, populate_rune_chain};
use crate::tagger::BmesHmm;

// Fallback edge weights when no dictionary supplies its suggestions.
const DEFAULT_RUNE_WEIGHT: f64 = 32.0;
const DEFAULT_HMM_WEIGHT: f64 = 16.0;

/// Builds the segmentation lattice for `sentence`: the single-rune fallback
/// chain, the collapsed special-class runs, then whatever the dictionary and
/// the model propose. Either collaborator may be absent.
pub fn build_dag<'a>(
    sentence: &'a [u8],
    dict: Option<&FreqDict>,
    hmm: Option<&BmesHmm>,
) -> Result<WordDag<'a>> {
    let (rune_weight, hmm_weight) = match dict {
        Some(dict) => (dict.suggest_rune_weight(), dict.suggest_hmm_weight()),
        None => (DEFAULT_RUNE_WEIGHT, DEFAULT_HMM_WEIGHT),
    };

    let mut dag = WordDag::new(sentence);
    populate_rune_chain(&mut dag, rune_weight)?;
    add_special_edges(&mut dag)?;
    if let Some(dict) = dict {
        dict.add_edges(&mut dag);
    }
    if let Some(hmm) = hmm {
        hmm.add_edges(&mut dag, hmm_weight)?;
    }
    Ok(dag)
}

/// Cuts the lattice sentence along its shortest path. The returned slices
/// partition the sentence byte-for-byte.
pub fn word_break_by_dag<'a>(dag: &WordDag<'a>) -> Result<Vec<&'a [u8]>> {
    let found = shortest_path(dag)?;
    let sentence = dag.sentence();

    let mut tokens = Vec::with_capacity(found.path.len() + 1);
    let mut start = 0;
    for &end in &found.path {
        tokens.push(&sentence[start..end]);
        start = end;
    }
    tokens.push(&sentence[start..]);
    Ok(tokens)
}

/// [word_break] over raw bytes, for callers that have not validated their
/// input: a truncated rune surfaces as [BadEncoding](crate::Error::BadEncoding).
pub fn word_break_bytes<'a>(
    sentence: &'a [u8],
    dict: Option<&FreqDict>,
    hmm: Option<&BmesHmm>,
) -> Result<Vec<&'a [u8]>> {
    if sentence.is_empty() {
        return Ok(Vec::new());
    }
    let dag = build_dag(sentence, dict, hmm)?;
    word_break_by_dag(&dag)
}

/// Segments `sentence` into an ordered sequence of word tokens.
///
/// The tokens are borrowed views that partition the sentence byte-for-byte;
/// concatenating them yields the sentence back, and every cut lies on a rune
/// boundary. Dictionary and model are both optional: with neither, the
/// sentence falls apart into runes and collapsed special-class runs.
///
/// # Example
///
/// ```rust
/// use wordseg_rs::{word_break, FreqDict};
///
/// let mut dict = FreqDict::new();
/// dict.add_word("雪花", 10);
/// dict.finalize();
///
/// let tokens = word_break("雪花飘", Some(&dict), None).unwrap();
/// assert_eq!(tokens, ["雪花", "飘"]);
/// ```
pub fn word_break<'a>(
    sentence: &'a str,
    dict: Option<&FreqDict>,
    hmm: Option<&BmesHmm>,
) -> Result<Vec<&'a str>> {
    let tokens = word_break_bytes(sentence.as_bytes(), dict, hmm)?;
    Ok(tokens
        .into_iter()
        // every cut point is produced by a rune hop, a dictionary match or a
        // rune-aligned model edge, so each token is itself valid UTF-8
        .map(|token| unsafe { std::str::from_utf8_unchecked(token) })
        .collect())
}

/// Owns a finalized dictionary and model and segments sentences with them.
///
/// Both resources are immutable once built, so one `Segmenter` is freely
/// shareable across worker threads; every call builds its own lattice.
#[derive(Debug, Default)]
pub struct Segmenter {
    dict: Option<FreqDict>,
    hmm: Option<BmesHmm>,
}

impl Segmenter {
    pub fn new(dict: Option<FreqDict>, hmm: Option<BmesHmm>) -> Segmenter {
        Segmenter { dict, hmm }
    }

    pub fn dict(&self) -> Option<&FreqDict> {
        self.dict.as_ref()
    }

    pub fn hmm(&self) -> Option<&BmesHmm> {
        self.hmm.as_ref()
    }

    pub fn segment<'a>(&self, sentence: &'a str) -> Result<Vec<&'a str>> {
        word_break(sentence, self.dict.as_ref(), self.hmm.as_ref())
    }

    pub fn segment_bytes<'a>(&self, sentence: &'a [u8]) -> Result<Vec<&'a [u8]>> {
        word_break_bytes(sentence, self.dict.as_ref(), self.hmm.as_ref())
    }

    /// Segments a batch of sentences, in parallel when the `rayon` feature
    /// is enabled.
    #[cfg(feature = "rayon")]
    pub fn batch_segment<'a>(&self, sentences: &[&'a str]) -> Result<Vec<Vec<&'a str>>> {
        use rayon::prelude::*;

        sentences
            .par_iter()
            .map(|&sentence| self.segment(sentence))
            .collect()
    }

    /// Segments a batch of sentences, in parallel when the `rayon` feature
    /// is enabled.
    #[cfg(not(feature = "rayon"))]
    pub fn batch_segment<'a>(&self, sentences: &[&'a str]) -> Result<Vec<Vec<&'a str>>> {
        sentences
            .iter()
            .map(|&sentence| self.segment(sentence))
            .collect()
    }
}
