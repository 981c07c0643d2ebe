use std::collections::{BTreeMap, VecDeque};

use crate::arena::{WordArena, WordRef};

/// A single node of the construction-form trie.
///
/// Children are kept in an ordered map: double-array placement and match
/// emission both depend on deterministic child iteration.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrieNode {
    pub(crate) parent: u32,
    pub(crate) fail: u32,
    pub(crate) children: BTreeMap<u8, u32>,
    pub(crate) word: Option<WordRef>,
}

/// Aho-Corasick automaton in construction form.
///
/// Patterns are added byte-path by byte-path with [add](AcTrie::add), then
/// [finalize](AcTrie::finalize) computes the failure links. The finalized
/// trie can either be scanned directly (the sentence splitter does this) or
/// compiled into a [DoubleArrayTrie](crate::DoubleArrayTrie) for the hot
/// dictionary path, after which the construction form is discarded.
///
/// Pattern bytes live in a caller-owned [WordArena]; the trie only stores
/// [WordRef] handles.
#[derive(Debug, Clone)]
pub struct AcTrie {
    pub(crate) nodes: Vec<TrieNode>,
}

/// Resumable position of an in-progress [AcTrie::scan], for feeding input in
/// chunks.
#[derive(Debug, Clone, Copy)]
pub struct ScanState {
    node: u32,
}

impl Default for AcTrie {
    fn default() -> Self {
        AcTrie::new()
    }
}

impl AcTrie {
    pub fn new() -> AcTrie {
        AcTrie {
            nodes: vec![TrieNode::default()],
        }
    }

    fn add_node(&mut self, parent: u32, byte: u8) -> u32 {
        let id = self.nodes.len() as u32;
        self.nodes.push(TrieNode {
            parent,
            fail: 0,
            children: BTreeMap::new(),
            word: None,
        });
        self.nodes[parent as usize].children.insert(byte, id);
        id
    }

    /// Inserts a pattern. Adding the same word twice re-uses the same
    /// terminal; adding an empty word is a no-op.
    pub fn add(&mut self, word: WordRef, arena: &WordArena) {
        let bytes = arena.get(word);
        if bytes.is_empty() {
            return;
        }
        let mut node = 0u32;
        for &byte in bytes {
            node = match self.nodes[node as usize].children.get(&byte) {
                Some(&child) => child,
                None => self.add_node(node, byte),
            };
        }
        self.nodes[node as usize].word = Some(word);
    }

    /// Computes the failure links, breadth-first from the root.
    ///
    /// For a node reached from parent `p` via byte `c`, the failure link is
    /// the child-by-`c` of the first ancestor in `p`'s fail chain that has
    /// one, or the root. Must be called once, after the last
    /// [add](AcTrie::add).
    pub fn finalize(&mut self) {
        let mut queue = VecDeque::new();
        queue.push_back(0u32);
        while let Some(id) = queue.pop_front() {
            let children: Vec<(u8, u32)> = self.nodes[id as usize]
                .children
                .iter()
                .map(|(&byte, &child)| (byte, child))
                .collect();
            for (byte, child) in children {
                let mut curr = id;
                loop {
                    if curr == 0 {
                        self.nodes[child as usize].fail = 0;
                        break;
                    }
                    let fail = self.nodes[curr as usize].fail;
                    if let Some(&target) = self.nodes[fail as usize].children.get(&byte) {
                        self.nodes[child as usize].fail = target;
                        break;
                    }
                    curr = fail;
                }
                queue.push_back(child);
            }
        }
    }

    pub fn initial_scan_state(&self) -> ScanState {
        ScanState { node: 0 }
    }

    /// Scans `haystack`, invoking `matched` with `(end_position, word)` for
    /// every pattern occurrence. Matches ending at the same position are
    /// reported in fail-chain order, deepest pattern first.
    ///
    /// Passing a [ScanState] carries the automaton position across calls so
    /// chunked input matches exactly like a single contiguous scan.
    pub fn scan<F>(&self, haystack: &[u8], state: Option<&mut ScanState>, mut matched: F)
    where
        F: FnMut(usize, WordRef),
    {
        let mut implicit = self.initial_scan_state();
        let state = state.unwrap_or(&mut implicit);

        let mut i = 0;
        while i < haystack.len() {
            let node = &self.nodes[state.node as usize];
            if let Some(&child) = node.children.get(&haystack[i]) {
                state.node = child;
                i += 1;
                let mut m = state.node;
                while m != 0 {
                    let mnode = &self.nodes[m as usize];
                    if let Some(word) = mnode.word {
                        matched(i, word);
                    }
                    m = mnode.fail;
                }
            } else if state.node == 0 {
                i += 1;
            } else {
                state.node = node.fail;
            }
        }
    }
}
