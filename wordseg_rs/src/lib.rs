#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod arena;
pub use arena::{WordArena, WordRef};

mod error;
pub use error::{Error, Result};

mod trie;
pub use trie::{AcTrie, ScanState};

mod dat;
pub use dat::DoubleArrayTrie;

mod dict;
pub use dict::{load_dict, save_dict, FreqDict};

mod hmm;
pub use hmm::{Hmm, HmmParams, NUM_STATES};

mod viterbi;
pub use viterbi::viterbi;

mod tagger;
pub use tagger::{load_model, save_model, BmesHmm, BmesState};

mod rune;
pub use rune::{
    add_special_edges, classify_rune, populate_rune_chain, rune_hop, split_runes, SpecialClass,
};

mod dag;
pub use dag::{shortest_path, ShortestPath, WordDag};

mod segmenter;
pub use segmenter::{build_dag, word_break, word_break_by_dag, word_break_bytes, Segmenter};

mod sentence;
pub use sentence::{split_sentences, SentenceSplitter};
