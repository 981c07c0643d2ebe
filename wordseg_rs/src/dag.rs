use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{Error, Result};

/// Weighted word lattice over a borrowed sentence.
///
/// Vertices are the byte offsets `0..=n` of the sentence; an edge
/// `(from, to, weight)` proposes the slice `sentence[from..to]` as one
/// output token. Edges always point forward and inserting a duplicate edge
/// keeps the smaller weight, so every producer can propose independently.
///
/// The lattice borrows the sentence and is rebuilt per segmentation call;
/// nothing in it is shared.
#[derive(Debug, Clone)]
pub struct WordDag<'a> {
    sentence: &'a [u8],
    adjacents: Vec<BTreeMap<usize, f64>>,
    in_degree: Vec<usize>,
}

impl<'a> WordDag<'a> {
    pub fn new(sentence: &'a [u8]) -> WordDag<'a> {
        WordDag {
            sentence,
            adjacents: vec![BTreeMap::new(); sentence.len() + 1],
            in_degree: vec![0; sentence.len() + 1],
        }
    }

    pub fn start(&self) -> usize {
        0
    }

    pub fn end(&self) -> usize {
        self.sentence.len()
    }

    pub fn sentence(&self) -> &'a [u8] {
        self.sentence
    }

    pub fn in_degree(&self) -> &[usize] {
        &self.in_degree
    }

    pub fn adjacents(&self, of: usize) -> &BTreeMap<usize, f64> {
        &self.adjacents[of]
    }

    /// Inserts edge `(from, to)` or, when it already exists, lowers its
    /// weight to `weight` if that is strictly smaller.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) {
        debug_assert!(from < to && to <= self.end());
        match self.adjacents[from].entry(to) {
            Entry::Occupied(mut entry) => {
                if *entry.get() > weight {
                    entry.insert(weight);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(weight);
                self.in_degree[to] += 1;
            }
        }
    }

    /// Renders the lattice in graphviz dot form, labelling each edge with
    /// the sentence slice it spans and its weight.
    pub fn dump_graphviz<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "digraph {{")?;
        for (from, edges) in self.adjacents.iter().enumerate() {
            for (&to, &weight) in edges {
                write!(writer, "  ")?;
                if from == self.start() {
                    write!(writer, "start")?;
                } else {
                    write!(writer, "{from}")?;
                }
                write!(writer, " -> ")?;
                if to == self.end() {
                    write!(writer, "end")?;
                } else {
                    write!(writer, "{to}")?;
                }
                let label = format!(
                    "{}(weight={})",
                    String::from_utf8_lossy(&self.sentence[from..to]),
                    weight
                );
                writeln!(writer, " [label={}]", graphviz_quote(&label))?;
            }
        }
        writeln!(writer, "}}")?;
        Ok(())
    }
}

fn graphviz_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for ch in s.chars() {
        if ch == '"' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Shortest path through a [WordDag]: the interior cut points between start
/// and end, plus the total score (lower is better).
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub path: Vec<usize>,
    pub score: f64,
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    visited: bool,
    score: f64,
    from: usize,
}

/// Single-source shortest path from start to end, relaxing edges in
/// topological order.
///
/// Kahn-style worklist: a vertex enters the worklist only once every
/// incoming edge has been relaxed, so each relaxation sees the final score
/// of its source. Ties keep the earlier-visited predecessor.
///
/// Returns [Error::Internal] when no path reaches the end vertex; lattices
/// populated with the rune chain always have one.
pub fn shortest_path(dag: &WordDag<'_>) -> Result<ShortestPath> {
    let mut in_degree = dag.in_degree().to_vec();
    let mut nodes = vec![
        SearchNode {
            visited: false,
            score: 0.0,
            from: 0,
        };
        in_degree.len()
    ];
    nodes[dag.start()].visited = true;

    let mut worklist = vec![dag.start()];
    while let Some(from) = worklist.pop() {
        for (&to, &weight) in dag.adjacents(from) {
            let new_score = nodes[from].score + weight;
            if !nodes[to].visited {
                nodes[to].visited = true;
                nodes[to].score = new_score;
                nodes[to].from = from;
            } else if nodes[to].score > new_score {
                nodes[to].score = new_score;
                nodes[to].from = from;
            }
            in_degree[to] -= 1;
            if in_degree[to] == 0 {
                worklist.push(to);
            }
        }
    }

    if !nodes[dag.end()].visited {
        return Err(Error::Internal);
    }

    let mut path = Vec::new();
    let mut vertex = dag.end();
    loop {
        vertex = nodes[vertex].from;
        if vertex == dag.start() {
            break;
        }
        path.push(vertex);
    }
    path.reverse();
    Ok(ShortestPath {
        path,
        score: nodes[dag.end()].score,
    })
}
