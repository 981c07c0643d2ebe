use std::collections::VecDeque;

use crate::arena::{WordArena, WordRef};
use crate::trie::AcTrie;

const NOT_USED: u32 = u32::MAX;

/// One slot of the double array. A unit `k` is reachable from unit `j` on
/// byte `c` iff `check[k] == j` and `base[j] + c == k`.
#[derive(Debug, Clone, Copy)]
struct Unit {
    base: u32,
    check: u32,
    fail: u32,
    tail: u32,
}

impl Default for Unit {
    fn default() -> Self {
        Unit {
            base: NOT_USED,
            check: NOT_USED,
            fail: 0,
            tail: 0,
        }
    }
}

impl Unit {
    fn used(&self) -> bool {
        self.base != NOT_USED || self.check != NOT_USED
    }
}

/// Terminal entry. `tail_size` is the number of trailing word bytes elided
/// from the unit array by tail merging; index 0 of the tails table is a
/// sentinel meaning "no match here".
#[derive(Debug, Clone, Copy, Default)]
struct Tail {
    word: WordRef,
    tail_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MergeStatus {
    None,
    MergedTo,
    MergedFrom,
}

/// Aho-Corasick automaton compiled into a double-array trie.
///
/// Compared to the construction form, next-state lookup is a single indexed
/// read per input byte and the whole automaton lives in two flat arrays, so
/// scanning is O(n) over the input with cache-compact state.
///
/// Linear single-child chains below a terminal are merged into their highest
/// eligible ancestor ("tail compression"): the ancestor's terminal entry
/// records how many word bytes were elided, and the scanner verifies those
/// bytes with a direct compare instead of walking per-byte units.
///
/// Built once from a finalized [AcTrie] via
/// [build_from](DoubleArrayTrie::build_from); immutable afterwards. Word
/// bytes are resolved through the same [WordArena] the construction trie was
/// fed from.
#[derive(Debug, Clone)]
pub struct DoubleArrayTrie {
    units: Vec<Unit>,
    tails: Vec<Tail>,
}

fn load_factor(units: &[Unit], begin: usize, end: usize) -> f64 {
    if end == begin {
        return 0.0;
    }
    let mut used = 0usize;
    for unit in units.iter().take(end).skip(begin) {
        if unit.used() {
            used += 1;
        }
    }
    used as f64 / (end - begin) as f64
}

impl DoubleArrayTrie {
    /// Compiles a finalized construction trie.
    ///
    /// Placement is breadth-first: for each parent the smallest base at or
    /// after the `skip` watermark that leaves every child slot unused is
    /// taken. The watermark advances whenever the searched window gets
    /// denser than 0.80 or wider than 5000 slots, which bounds the cost of
    /// later searches on sparse tails of the array.
    pub fn build_from(trie: &AcTrie, arena: &WordArena) -> DoubleArrayTrie {
        let node_count = trie.nodes.len();
        let mut mstatus = vec![MergeStatus::None; node_count];
        let mut nodes_to_tails = vec![0u32; node_count];
        let mut tails = vec![Tail::default()]; // sentinel

        for (id, node) in trie.nodes.iter().enumerate() {
            let Some(word) = node.word else { continue };
            let mut tail_size = 0u32;
            let mut curr = id;
            if node.children.is_empty() {
                loop {
                    let parent_id = trie.nodes[curr].parent as usize;
                    if parent_id == 0 {
                        break;
                    }
                    let parent = &trie.nodes[parent_id];
                    if parent.fail != trie.nodes[curr].fail
                        || parent.word.is_some()
                        || parent.children.len() != 1
                    {
                        break;
                    }
                    mstatus[curr] = MergeStatus::MergedFrom;
                    mstatus[parent_id] = MergeStatus::MergedTo;
                    tail_size += 1;
                    curr = parent_id;
                }
            }
            nodes_to_tails[curr] = tails.len() as u32;
            tails.push(Tail { word, tail_size });
        }
        debug_assert!(tails.len() < NOT_USED as usize);

        // Fail links that land on an elided chain node are redirected to the
        // next non-elided ancestor in the fail chain. Elided nodes carry no
        // terminal and no transitions, so the redirect preserves the exact
        // match multiset while keeping every stored fail target placeable.
        let resolve_fail = |mut id: usize| {
            while mstatus[id] == MergeStatus::MergedFrom {
                id = trie.nodes[id].fail as usize;
            }
            id
        };

        let mut node_to_unit = vec![0u32; node_count];
        let mut units: Vec<Unit> = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(0usize);
        let mut skip = 0usize;
        while let Some(id) = queue.pop_front() {
            if mstatus[id] == MergeStatus::MergedFrom {
                continue;
            }
            let node = &trie.nodes[id];

            let mut new_base = skip;
            loop {
                if units.len() <= new_base {
                    break;
                }
                if units[new_base].used() {
                    new_base += 1;
                    continue;
                }
                let mut good = true;
                for &byte in node.children.keys() {
                    let place = new_base + byte as usize;
                    if units.len() <= place {
                        break;
                    }
                    if units[place].used() {
                        good = false;
                        break;
                    }
                }
                if good {
                    break;
                }
                new_base += 1;
            }
            if load_factor(&units, skip, new_base) > 0.80 || (new_base - skip) > 5000 {
                skip = new_base;
            }
            // keeps base + any byte inside the array for every placed state
            if units.len() <= new_base + 0xff {
                units.resize(new_base + 0xff + 1, Unit::default());
                debug_assert!(units.len() < NOT_USED as usize);
            }
            units[node_to_unit[id] as usize].base = new_base as u32;
            for (&byte, &child) in &node.children {
                let child = child as usize;
                let place = new_base + byte as usize;
                units[place].check = node_to_unit[id];
                units[place].fail = node_to_unit[resolve_fail(trie.nodes[child].fail as usize)];
                units[place].tail = nodes_to_tails[child];
                node_to_unit[child] = place as u32;
                if mstatus[id] != MergeStatus::MergedTo {
                    queue.push_back(child);
                }
            }
        }

        log::debug!(
            "double-array trie built: {} units, {} tails, load {:.3}",
            units.len(),
            tails.len(),
            load_factor(&units, 0, units.len()),
        );

        DoubleArrayTrie { units, tails }
    }

    /// Scans `haystack`, invoking `matched` with `(end_position, word)` for
    /// every pattern occurrence, exactly as the construction trie would
    /// report them (per end position, discovery order may differ on merged
    /// terminals).
    ///
    /// An out-of-range `base + byte`, or a unit that never got a base, is
    /// treated as "no transition", never as a hit.
    pub fn scan<F>(&self, haystack: &[u8], arena: &WordArena, mut matched: F)
    where
        F: FnMut(usize, WordRef),
    {
        let mut state = 0usize;
        let mut i = 0;
        while i < haystack.len() {
            let base = self.units[state].base;
            let next = if base == NOT_USED {
                None
            } else {
                let to = base as usize + haystack[i] as usize;
                self.units
                    .get(to)
                    .filter(|unit| unit.check == state as u32)
                    .map(|_| to)
            };
            match next {
                Some(to) => {
                    state = to;
                    i += 1;
                    let mut m = state;
                    while m != 0 {
                        let tail_idx = self.units[m].tail as usize;
                        if tail_idx != 0 {
                            let tail = &self.tails[tail_idx];
                            let tail_size = tail.tail_size as usize;
                            if i + tail_size <= haystack.len() {
                                let word = arena.get(tail.word);
                                if haystack[i..i + tail_size]
                                    == word[word.len() - tail_size..]
                                {
                                    matched(i + tail_size, tail.word);
                                }
                            }
                        }
                        m = self.units[m].fail as usize;
                    }
                }
                None => {
                    if state == 0 {
                        i += 1;
                    } else {
                        state = self.units[state].fail as usize;
                    }
                }
            }
        }
    }
}
