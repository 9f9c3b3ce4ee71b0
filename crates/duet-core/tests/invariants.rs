//! Property-based checks for invariants 1-5 (spec section 8).

use duet_core::counts::TopicWordMatrix;
use duet_core::kernel::sample_token;
use duet_core::model::{Book, Character};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn build_book(num_themes: usize, num_roles: usize, vocab: usize, tokens: &[u32], seed: u64) -> (Book, TopicWordMatrix) {
    let num_topics = num_themes + num_roles;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut character = Character::new("c", tokens.to_vec(), num_roles);
    let mut book = Book::new("b", num_themes);
    let mut tw = TopicWordMatrix::zeros(vocab, num_topics);

    use rand::Rng;
    for (idx, &w) in tokens.iter().enumerate() {
        let z = rng.random_range(0..num_topics) as i16;
        character.z[idx] = z;
        tw.increment(w, z as usize);
        if (z as usize) < num_themes {
            book.theta[z as usize] += 1;
        } else {
            character.rho[z as usize - num_themes] += 1;
        }
    }
    book.add_character(character);
    (book, tw)
}

proptest! {
    /// Invariants 1, 2, 4, 5: after every kernel call, theta/rho reconstruct
    /// from z, all counts stay nonnegative, and the column sums stay
    /// conserved against the total token count.
    #[test]
    fn kernel_preserves_invariants(
        num_themes in 1usize..4,
        num_roles in 1usize..4,
        vocab in 2usize..6,
        token_count in 1usize..20,
        seed in any::<u64>(),
    ) {
        let tokens: Vec<u32> = (0..token_count).map(|i| (i % vocab) as u32).collect();
        let (mut book, mut tw) = build_book(num_themes, num_roles, vocab, &tokens, seed);
        let num_topics = num_themes + num_roles;
        let alpha = vec![0.01; num_topics];
        let mut n = tw.column_sums();
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0xABCD);

        for word_idx in 0..tokens.len() {
            sample_token(&mut book, 0, word_idx, &mut tw, &mut n, &alpha, 0.1, num_themes, &mut rng).unwrap();
        }

        prop_assert!(book.theta.iter().all(|&c| c >= 0));
        prop_assert!(book.characters[0].rho.iter().all(|&c| c >= 0));
        prop_assert!(n.iter().all(|&c| c >= 0));
        prop_assert_eq!(tw.column_sums(), n.clone());
        prop_assert_eq!(n.iter().sum::<i64>() as usize, tokens.len());

        let mut theta = vec![0i64; num_themes];
        let mut rho = vec![0i64; num_roles];
        for &z in &book.characters[0].z {
            if (z as usize) < num_themes {
                theta[z as usize] += 1;
            } else {
                rho[z as usize - num_themes] += 1;
            }
        }
        prop_assert_eq!(theta, book.theta.clone());
        prop_assert_eq!(rho, book.characters[0].rho.clone());
    }
}

/// Property 5: a character with zero tokens is a no-op on all counts.
#[test]
fn empty_character_is_noop() {
    let book = Book::new("b", 2);
    assert_eq!(book.theta, vec![0, 0]);
    assert_eq!(book.totalwords, 0);
    assert_eq!(book.characters.len(), 0);
}
