//! The sampler kernel: one token's decrement/sample/increment cycle.

use rand::Rng;

use crate::counts::TopicWordMatrix;
use crate::error::{CoreError, CoreResult};
use crate::model::Book;

/// Outcome of sampling a single token, used by the sweep driver to track
/// the change-ratio diagnostic and accumulate `DeltaTW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelStep {
    pub word: u32,
    pub old_topic: i16,
    pub new_topic: i16,
}

impl KernelStep {
    pub fn changed(&self) -> bool {
        self.old_topic != self.new_topic
    }
}

/// Resample the topic assigned to token `word_idx` of character `char_idx`
/// in `book`, given the current snapshot `tw`/`n`. Mutates `book`, `tw`, and
/// `n` in place to keep invariants 1-5 holding after the call.
///
/// `n` must have every entry `> 0` before the call (guaranteed by uniform
/// random initialization and by the fact that the decrement below only ever
/// touches the token's own slot).
pub fn sample_token(
    book: &mut Book,
    char_idx: usize,
    word_idx: usize,
    tw: &mut TopicWordMatrix,
    n: &mut [i64],
    alpha: &[f64],
    beta: f64,
    num_themes: usize,
    rng: &mut impl Rng,
) -> CoreResult<KernelStep> {
    let k = n.len();
    let word = book.characters[char_idx].words[word_idx];
    let old_topic = book.characters[char_idx].z[word_idx];

    // Decrement first: the conditional distribution must exclude this token.
    book.decrement_topic(char_idx, old_topic, num_themes);
    tw.decrement(word, old_topic as usize);
    n[old_topic as usize] -= 1;

    if n[old_topic as usize] < 0 || tw.get(word, old_topic as usize) < 0 {
        return Err(CoreError::invariant(format!(
            "count went negative decrementing topic {old_topic} for word {word}"
        )));
    }

    let totalwords_b = book.totalwords as f64;
    let n_c = book.characters[char_idx].num_words() as f64;
    let theta = &book.theta;
    let rho = &book.characters[char_idx].rho;

    let mut u = vec![0.0f64; k];
    let mut total = 0.0f64;
    for topic in 0..k {
        let eta = if topic < num_themes {
            theta[topic] as f64 / totalwords_b
        } else {
            rho[topic - num_themes] as f64 / n_c
        };
        let phi = (tw.get(word, topic) as f64 + beta) / n[topic] as f64;
        let weight = (eta + alpha[topic]) * phi;
        if !weight.is_finite() || weight < 0.0 {
            return Err(CoreError::invariant(format!(
                "non-finite or negative unnormalized weight {weight} at topic {topic}"
            )));
        }
        u[topic] = weight;
        total += weight;
    }

    if total <= 0.0 || !total.is_finite() {
        return Err(CoreError::invariant(
            "unnormalized distribution sums to a non-positive value",
        ));
    }

    let new_topic = draw_categorical(&u, total, rng);

    tw.increment(word, new_topic as usize);
    n[new_topic as usize] += 1;
    book.increment_topic(char_idx, new_topic, num_themes);
    book.characters[char_idx].z[word_idx] = new_topic;

    Ok(KernelStep {
        word,
        old_topic,
        new_topic,
    })
}

/// Draw an index from `[0, u.len())` with probability proportional to `u`,
/// given its precomputed sum `total`.
fn draw_categorical(u: &[f64], total: f64, rng: &mut impl Rng) -> i16 {
    let mut draw = rng.random::<f64>() * total;
    for (topic, &weight) in u.iter().enumerate() {
        draw -= weight;
        if draw < 0.0 {
            return topic as i16;
        }
    }
    // Floating-point rounding can leave a sliver of mass unconsumed; fall
    // back to the last topic rather than panic on an out-of-range draw.
    (u.len() - 1) as i16
}
