use crate::arena::WordArena;
use crate::trie::AcTrie;

const TERMINATORS: &[&str] = &["。", "？", "！", "\n", "\r\n"];

/// Splits text into sentences on the Chinese terminators `。`, `？`, `！`
/// and line breaks, via an Aho-Corasick scan over the terminator set.
///
/// A cut lands right after every terminator; a lone line break therefore
/// forms a one-token sentence of its own, and whatever trails the last
/// terminator flushes as a final sentence.
///
/// # Example
///
/// ```rust
/// use wordseg_rs::split_sentences;
///
/// let sentences = split_sentences("你好。再见！\n回见");
/// assert_eq!(sentences, ["你好。", "再见！", "\n", "回见"]);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    trie: AcTrie,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        SentenceSplitter::new()
    }
}

impl SentenceSplitter {
    pub fn new() -> SentenceSplitter {
        // the arena is only needed while inserting; the splitter never
        // resolves the matched terminator back to its bytes
        let mut arena = WordArena::new();
        let mut trie = AcTrie::new();
        for terminator in TERMINATORS {
            let word = arena.push(terminator.as_bytes());
            trie.add(word, &arena);
        }
        trie.finalize();
        SentenceSplitter { trie }
    }

    /// Splits `text` into borrowed sentence slices. Empty segments (a
    /// terminator that is itself the tail of the previous one, like the
    /// `\n` of `\r\n`) are suppressed.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let bytes = text.as_bytes();
        let mut sentences = Vec::new();
        let mut processed = 0;
        self.trie.scan(bytes, None, |end, _word| {
            if end > processed {
                // terminators are whole runes, so `end` is a char boundary
                let sentence = unsafe { std::str::from_utf8_unchecked(&bytes[processed..end]) };
                sentences.push(sentence);
                processed = end;
            }
        });
        if processed < bytes.len() {
            let rest = unsafe { std::str::from_utf8_unchecked(&bytes[processed..]) };
            sentences.push(rest);
        }
        sentences
    }
}

/// One-shot convenience over [SentenceSplitter::split].
pub fn split_sentences(text: &str) -> Vec<&str> {
    SentenceSplitter::new().split(text)
}
