use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use duet_core::counts::TopicWordMatrix;
use duet_core::kernel::sample_token;
use duet_core::model::{Book, Character};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const NUM_THEMES: usize = 20;
const NUM_ROLES: usize = 20;
const NUM_TOPICS: usize = NUM_THEMES + NUM_ROLES;
const VOCAB: usize = 500;
const TOKENS: usize = 2000;

fn fresh_state(seed: u64) -> (Book, TopicWordMatrix, ChaCha8Rng) {
    let tokens: Vec<u32> = (0..TOKENS).map(|i| (i % VOCAB) as u32).collect();
    let mut character = Character::new("bench", tokens.clone(), NUM_ROLES);
    let mut book = Book::new("bench-book", NUM_THEMES);
    let mut tw = TopicWordMatrix::zeros(VOCAB, NUM_TOPICS);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for (idx, &w) in tokens.iter().enumerate() {
        let z = rng.random_range(0..NUM_TOPICS) as i16;
        character.z[idx] = z;
        tw.increment(w, z as usize);
        if (z as usize) < NUM_THEMES {
            book.theta[z as usize] += 1;
        } else {
            character.rho[z as usize - NUM_THEMES] += 1;
        }
    }
    book.add_character(character);
    (book, tw, rng)
}

fn bench_kernel(c: &mut Criterion) {
    let alpha = vec![0.001; NUM_TOPICS];

    c.bench_function("sample_token sweep over 2000 tokens", |b| {
        b.iter_batched(
            || fresh_state(1),
            |(mut book, mut tw, mut rng)| {
                let mut n = tw.column_sums();
                for word_idx in 0..book.characters[0].num_words() {
                    sample_token(
                        black_box(&mut book),
                        0,
                        word_idx,
                        &mut tw,
                        &mut n,
                        &alpha,
                        0.1,
                        NUM_THEMES,
                        &mut rng,
                    )
                    .unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_kernel);
criterion_main!(benches);
