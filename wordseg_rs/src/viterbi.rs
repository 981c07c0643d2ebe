use crate::hmm::{Hmm, NUM_STATES};

/// Maximum-likelihood state decoding over an observation sequence.
///
/// Dynamic programming in log space with two row buffers and a backpointer
/// table; `O(T * NUM_STATES^2)` time, `O(T)` memory. Ties prefer the lowest
/// state ordinal: the first from-state seeds each column maximum
/// unconditionally and only a strictly greater score replaces it, and the
/// final column argmax keeps the first maximum it sees.
///
/// Returns one state ordinal per observation; empty input decodes to an
/// empty sequence. The model must be normalized and non-trivial for the
/// scores to be meaningful.
pub fn viterbi(model: &Hmm, observations: &[&[u8]]) -> Vec<usize> {
    if observations.is_empty() {
        return Vec::new();
    }

    let mut curr = [0.0f64; NUM_STATES];
    let mut next = [0.0f64; NUM_STATES];
    for (state, score) in curr.iter_mut().enumerate() {
        *score = model.initial(state, observations[0]);
    }

    let mut back: Vec<[usize; NUM_STATES]> = Vec::with_capacity(observations.len() - 1);
    for &obs in &observations[1..] {
        let mut from = [0usize; NUM_STATES];
        for i in 0..NUM_STATES {
            for j in 0..NUM_STATES {
                let score = curr[i] + model.transition(i, j, obs);
                if i == 0 || score > next[j] {
                    from[j] = i;
                    next[j] = score;
                }
            }
        }
        std::mem::swap(&mut curr, &mut next);
        back.push(from);
    }

    let mut best = 0;
    for state in 1..NUM_STATES {
        if curr[state] > curr[best] {
            best = state;
        }
    }

    let mut states = vec![0usize; observations.len()];
    states[observations.len() - 1] = best;
    let mut idx = best;
    for (t, from) in back.iter().enumerate().rev() {
        idx = from[idx];
        states[t] = idx;
    }
    states
}
