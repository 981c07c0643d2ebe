use foldhash::HashMap;

/// Number of hidden states. The segmentation model tags every rune with one
/// of Begin/Middle/End/Single, see [BmesState](crate::BmesState).
pub const NUM_STATES: usize = 4;

/// One view of the model parameters: initial-state `pi`, transition matrix
/// `a` and per-observable emission rows `b`. Observables are individual
/// UTF-8 runes, hashed and compared as byte strings.
///
/// Two instantiations coexist on a model: `HmmParams<u64>` holds raw
/// training counts, `HmmParams<f64>` the normalized log2 probabilities
/// derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HmmParams<T> {
    pub pi: [T; NUM_STATES],
    pub a: [[T; NUM_STATES]; NUM_STATES],
    pub b: HashMap<Box<[u8]>, [T; NUM_STATES]>,
}

/// Normalizes one count row into log2 relative frequencies:
/// `log2(count) - log2(sum)`. A row summing to zero normalizes to all-zero;
/// callers mask such rows through [Hmm::is_trivial].
pub(crate) fn normalize_row(counts: &[u64; NUM_STATES]) -> [f64; NUM_STATES] {
    let sum: u64 = counts.iter().sum();
    if sum == 0 {
        return [0.0; NUM_STATES];
    }
    let log_sum = (sum as f64).log2();
    counts.map(|count| (count as f64).log2() - log_sum)
}

/// Hidden Markov model with a dynamic observable set, suitable for Chinese
/// segmentation workloads. States are plain ordinals `0..NUM_STATES`.
///
/// Training mutates the count view; [normalize](Hmm::normalize) derives the
/// log-probability view the decoder reads. A normalized model is immutable
/// in practice and freely shareable.
#[derive(Debug, Clone, Default)]
pub struct Hmm {
    pub training: HmmParams<u64>,
    pub normalized: HmmParams<f64>,
}

impl Hmm {
    pub fn new() -> Hmm {
        Hmm::default()
    }

    /// Accumulates one tagged observation sequence into the training counts.
    /// `observations` and `tags` must have equal lengths; tag values are
    /// state ordinals below [NUM_STATES].
    pub fn train(&mut self, observations: &[&[u8]], tags: &[usize]) {
        debug_assert_eq!(observations.len(), tags.len());
        if observations.is_empty() {
            return;
        }
        self.training.pi[tags[0]] += 1;
        for (obs, &tag) in observations.iter().zip(tags) {
            self.training
                .b
                .entry(Box::from(*obs))
                .or_insert([0; NUM_STATES])[tag] += 1;
        }
        for pair in tags.windows(2) {
            self.training.a[pair[0]][pair[1]] += 1;
        }
    }

    /// Derives the normalized view from the current training counts.
    pub fn normalize(&mut self) {
        self.normalized.pi = normalize_row(&self.training.pi);
        for (row, counts) in self.normalized.a.iter_mut().zip(&self.training.a) {
            *row = normalize_row(counts);
        }
        self.normalized.b = self
            .training
            .b
            .iter()
            .map(|(obs, counts)| (obs.clone(), normalize_row(counts)))
            .collect();
    }

    /// A model is trivial when it has no usable distribution: the initial
    /// counts sum to zero, or some transition row does. Callers skip the HMM
    /// contribution entirely for trivial models.
    pub fn is_trivial(&self) -> bool {
        if self.training.pi.iter().sum::<u64>() == 0 {
            return true;
        }
        self.training
            .a
            .iter()
            .any(|row| row.iter().sum::<u64>() == 0)
    }

    /// Log2 emission probability of `obs` in `state`. An observable the
    /// model never saw emits uniformly over the four states.
    pub fn emission(&self, obs: &[u8], state: usize) -> f64 {
        match self.normalized.b.get(obs) {
            Some(row) => row[state],
            None => -(NUM_STATES as f64).log2(),
        }
    }

    /// Score of starting in `state` while observing `obs`.
    pub fn initial(&self, state: usize, obs: &[u8]) -> f64 {
        self.normalized.pi[state] + self.emission(obs, state)
    }

    /// Score of moving `from -> to` while observing `obs` at the target.
    pub fn transition(&self, from: usize, to: usize, obs: &[u8]) -> f64 {
        self.emission(obs, to) + self.normalized.a[from][to]
    }
}
