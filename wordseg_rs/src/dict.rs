use std::io::{BufRead, Write};
use std::mem;

use crate::arena::{WordArena, WordRef};
use crate::dag::WordDag;
use crate::dat::DoubleArrayTrie;
use crate::error::{Error, Result};
use crate::trie::AcTrie;

/// Word frequency dictionary backing the segmentation lattice.
///
/// Words are accumulated with [add_word](FreqDict::add_word), then
/// [finalize](FreqDict::finalize) freezes the dictionary: the frequency
/// table is sorted for binary-search lookup and the Aho-Corasick trie is
/// compiled into its double-array form. A finalized dictionary is immutable
/// and freely shareable across threads.
///
/// Word bytes live in an append-only slab ([WordArena]); every internal
/// structure refers to them through stable [WordRef] handles.
///
/// # Example
///
/// ```rust
/// use wordseg_rs::FreqDict;
///
/// let mut dict = FreqDict::new();
/// dict.add_word("你好", 5);
/// dict.add_word("世界", 3);
/// dict.finalize();
///
/// assert_eq!(dict.freq("你好"), Some(5));
/// assert_eq!(dict.freq("再见"), None);
/// assert_eq!(dict.total(), 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FreqDict {
    arena: WordArena,
    entries: Vec<(WordRef, u64)>,
    total: u64,
    trie: AcTrie,
    dat: Option<DoubleArrayTrie>,
}

impl FreqDict {
    pub fn new() -> FreqDict {
        FreqDict::default()
    }

    /// Records one word with its frequency. Duplicate words each keep their
    /// own table row and all contribute to the running total; after
    /// [finalize](FreqDict::finalize) the lowest-frequency row wins lookup.
    ///
    /// Must not be called after [finalize](FreqDict::finalize).
    pub fn add_word(&mut self, word: &str, freq: u64) {
        debug_assert!(self.dat.is_none(), "add_word after finalize");
        let word = self.arena.push(word.as_bytes());
        self.entries.push((word, freq));
        self.trie.add(word, &self.arena);
        self.total += freq;
    }

    /// Freezes the dictionary: sorts the frequency table and compiles the
    /// scan automaton. Call exactly once, after the last word.
    pub fn finalize(&mut self) {
        debug_assert!(self.dat.is_none(), "duplicate call to finalize");
        let arena = &self.arena;
        self.entries.sort_by(|a, b| {
            arena
                .get(a.0)
                .cmp(arena.get(b.0))
                .then_with(|| a.1.cmp(&b.1))
        });
        let mut trie = mem::take(&mut self.trie);
        trie.finalize();
        self.dat = Some(DoubleArrayTrie::build_from(&trie, &self.arena));
        // the construction trie is scratch; only the double array survives
    }

    /// Frequency of `word`, or `None` when it is not in the dictionary.
    pub fn freq(&self, word: &str) -> Option<u64> {
        self.freq_bytes(word.as_bytes())
    }

    fn freq_bytes(&self, word: &[u8]) -> Option<u64> {
        let idx = self
            .entries
            .partition_point(|&(w, _)| self.arena.get(w) < word);
        match self.entries.get(idx) {
            Some(&(w, freq)) if self.arena.get(w) == word => Some(freq),
            _ => None,
        }
    }

    /// Sum of all recorded frequencies.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(word, freq)` rows, sorted once the dictionary is
    /// finalized.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|&(word, freq)| {
            // add_word only ever stores str bytes
            let word = unsafe { std::str::from_utf8_unchecked(self.arena.get(word)) };
            (word, freq)
        })
    }

    fn weight(&self, freq: u64) -> f64 {
        (self.total as f64).log2() - (freq as f64).log2()
    }

    /// Scans the lattice sentence and adds one edge per dictionary match,
    /// weighted `log2(total) - log2(freq)` so frequent words cost less.
    ///
    /// The dictionary must be finalized.
    pub fn add_edges(&self, dag: &mut WordDag<'_>) {
        debug_assert!(self.dat.is_some(), "add_edges before finalize");
        let Some(dat) = &self.dat else { return };
        let sentence = dag.sentence();
        dat.scan(sentence, &self.arena, |end, word| {
            let bytes = self.arena.get(word);
            if let Some(freq) = self.freq_bytes(bytes) {
                dag.add_edge(end - bytes.len(), end, self.weight(freq));
            }
        });
    }

    /// Suggested weight for the single-rune fallback edges.
    pub fn suggest_rune_weight(&self) -> f64 {
        ((self.total + 1) as f64).log2()
    }

    /// Suggested weight for HMM-proposed edges. The 2000 saturation constant
    /// keeps the penalty flat for small dictionaries; treat it as a tunable
    /// default.
    pub fn suggest_hmm_weight(&self) -> f64 {
        2.0 * ((self.total as f64).log2() - (self.total.min(2000) as f64).log2())
    }
}

/// Loads a dictionary from its text form, one `<word> <freq>` pair per line,
/// and finalizes it.
pub fn load_dict<R: BufRead>(reader: R) -> Result<FreqDict> {
    let mut dict = FreqDict::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (word, freq) = line
            .split_once(' ')
            .ok_or_else(|| Error::Parse(format!("missing frequency in line {line:?}")))?;
        let freq = freq
            .parse()
            .map_err(|_| Error::Parse(format!("bad frequency {freq:?}")))?;
        dict.add_word(word, freq);
    }
    log::debug!("loaded {} words, finalizing", dict.len());
    dict.finalize();
    Ok(dict)
}

/// Writes the dictionary in the same text form [load_dict] reads.
pub fn save_dict<W: Write>(dict: &FreqDict, writer: &mut W) -> Result<()> {
    for (word, freq) in dict.iter() {
        writeln!(writer, "{word} {freq}")?;
    }
    Ok(())
}
