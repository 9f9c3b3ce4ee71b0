//! Corpus loading: turns raw input lines into `Book`/`Character` values
//! with a uniform-random initial topic assignment, plus the `TopicWordMatrix`
//! those assignments induce.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use duet_core::counts::TopicWordMatrix;
use duet_core::model::{Book, Character, MAX_CHARACTER_WORDS, MIN_CHARACTER_WORDS};

use crate::error::{IoError, IoResult};
use crate::records::parse_line;
use crate::vocab::Vocabulary;

/// Read `path` (capped at `maxlines`, if given), keep only in-vocabulary
/// words per character, skip characters outside the
/// `[MIN_CHARACTER_WORDS, MAX_CHARACTER_WORDS]` window, assign each
/// surviving token a uniformly random topic in `[0, numthemes+numroles)`,
/// and build the books (grouped by first-seen order) plus the resulting
/// `TopicWordMatrix`.
pub fn load_corpus(
    path: &Path,
    vocab: &Vocabulary,
    num_themes: usize,
    num_roles: usize,
    maxlines: Option<usize>,
    seed: u64,
) -> IoResult<(Vec<Book>, TopicWordMatrix)> {
    let num_topics = num_themes + num_roles;
    let file = fs::File::open(path)
        .map_err(|e| IoError::malformed(0, format!("cannot open {}: {e}", path.display())))?;
    let reader = BufReader::new(file);

    let mut tw = TopicWordMatrix::zeros(vocab.len(), num_topics);
    let mut books: Vec<Book> = Vec::new();
    let mut book_index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for (line_no, line) in reader.lines().enumerate() {
        if let Some(cap) = maxlines {
            if line_no >= cap {
                break;
            }
        }
        let line = line.map_err(|e| IoError::malformed(line_no + 1, format!("read error: {e}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record = match parse_line(trimmed, line_no + 1) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(line = line_no + 1, %err, "skipping malformed line");
                continue;
            }
        };

        let word_ids: Vec<u32> = record
            .words
            .iter()
            .filter_map(|w| vocab.index_of(w))
            .collect();

        if word_ids.len() < MIN_CHARACTER_WORDS {
            continue;
        }
        if word_ids.len() > MAX_CHARACTER_WORDS {
            let err = IoError::too_long(record.charid.clone(), word_ids.len());
            tracing::warn!(%err, "skipping character, too long");
            continue;
        }

        let book_idx = *book_index.entry(record.bookname.clone()).or_insert_with(|| {
            books.push(Book::new(record.bookname.clone(), num_themes));
            books.len() - 1
        });

        let mut character = Character::new(record.charid, word_ids, num_roles);
        for z in character.z.iter_mut() {
            *z = rng.random_range(0..num_topics) as i16;
        }

        let book = &mut books[book_idx];
        let char_idx = book.characters.len();
        book.add_character(character);
        let topics: Vec<i16> = book.characters[char_idx].z.clone();
        let words: Vec<u32> = book.characters[char_idx].words.clone();
        for (&word, &topic) in words.iter().zip(topics.iter()) {
            book.increment_topic(char_idx, topic, num_themes);
            tw.increment(word, topic as usize);
        }
    }

    tracing::info!(books = books.len(), "corpus loaded");
    Ok((books, tw))
}
