use crate::dag::WordDag;
use crate::error::{Error, Result};

/// Byte length of the UTF-8 rune starting with `byte`, derived from the
/// leading-byte class. Continuation and invalid leading bytes hop 1.
pub fn rune_hop(byte: u8) -> usize {
    if byte & 0xe0 == 0xc0 {
        2
    } else if byte & 0xf0 == 0xe0 {
        3
    } else if byte & 0xf8 == 0xf0 {
        4
    } else {
        1
    }
}

/// Splits a byte sentence into its rune slices. Fails with
/// [Error::BadEncoding] when a rune's encoded length runs past the end of
/// the input.
pub fn split_runes(sentence: &[u8]) -> Result<Vec<&[u8]>> {
    let mut runes = Vec::new();
    let mut i = 0;
    while i < sentence.len() {
        let hop = rune_hop(sentence[i]);
        if i + hop > sentence.len() {
            return Err(Error::BadEncoding { offset: i });
        }
        runes.push(&sentence[i..i + hop]);
        i += hop;
    }
    Ok(runes)
}

/// Adds one edge per rune of the lattice sentence, each carrying `weight`.
/// This is the fallback chain that guarantees a path from start to end
/// exists whatever the dictionary and model propose.
pub fn populate_rune_chain(dag: &mut WordDag<'_>, weight: f64) -> Result<()> {
    let sentence = dag.sentence();
    let mut i = 0;
    while i < sentence.len() {
        let hop = rune_hop(sentence[i]);
        if i + hop > sentence.len() {
            return Err(Error::BadEncoding { offset: i });
        }
        dag.add_edge(i, i + hop, weight);
        i += hop;
    }
    Ok(())
}

/// Character class of a single rune, used to keep runs of non-Chinese text
/// together instead of letting the lattice cut through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialClass {
    /// A CJK unified ideograph; segmented normally.
    NotSpecial,
    /// ASCII space or tab.
    Whitespace,
    /// Carriage return or line feed.
    Crlf,
    /// U+2014 em dash, commonly doubled as the Chinese dash.
    CnDash,
    /// U+2026 ellipsis, commonly doubled as the Chinese ellipsis.
    CnEllipsis,
    /// U+3000 ideographic space.
    IdeographicSpace,
    /// Everything else: numerics, latin letters, punctuation, ...
    Other,
}

fn is_chinese(rune: &[u8]) -> bool {
    // U+4E00 ..= U+9FA5; byte-wise comparison of the UTF-8 encodings
    // preserves code point order
    rune.len() == 3 && rune >= "一".as_bytes() && rune <= "龥".as_bytes()
}

pub fn classify_rune(rune: &[u8]) -> SpecialClass {
    if is_chinese(rune) {
        return SpecialClass::NotSpecial;
    }
    if rune.len() == 1 {
        match rune[0] {
            b' ' | b'\t' => return SpecialClass::Whitespace,
            b'\r' | b'\n' => return SpecialClass::Crlf,
            _ => {}
        }
    }
    if rune == "—".as_bytes() {
        SpecialClass::CnDash
    } else if rune == "…".as_bytes() {
        SpecialClass::CnEllipsis
    } else if rune == "　".as_bytes() {
        SpecialClass::IdeographicSpace
    } else {
        SpecialClass::Other
    }
}

/// Collapses each maximal run of equal-class non-Chinese runes into a
/// single zero-weight edge, so whitespace, line breaks, dashes and foreign
/// text stay whole in the segmentation.
pub fn add_special_edges(dag: &mut WordDag<'_>) -> Result<()> {
    let runes = split_runes(dag.sentence())?;

    let mut run_len = 0usize;
    let mut pos = 0usize;
    let mut class = SpecialClass::NotSpecial;
    for rune in runes {
        let curr = classify_rune(rune);
        if curr != class {
            if class != SpecialClass::NotSpecial {
                dag.add_edge(pos - run_len, pos, 0.0);
            }
            class = curr;
            run_len = rune.len();
        } else {
            run_len += rune.len();
        }
        pos += rune.len();
    }
    if class != SpecialClass::NotSpecial {
        dag.add_edge(pos - run_len, pos, 0.0);
    }
    Ok(())
}
