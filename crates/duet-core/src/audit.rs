//! Reconstruct `TW` from assignments and compare against the maintained
//! matrix, to catch arithmetic drift between incremental updates.

use tracing::error;

use crate::counts::TopicWordMatrix;
use crate::error::{CoreError, CoreResult};
use crate::model::Book;

/// Rebuild `TW` from `books`' current word/topic assignments and assert it
/// matches `tw` exactly, and that each book's character word counts sum to
/// its recorded `totalwords`. Fails loudly: logs the mismatch at `error`
/// level before returning.
pub fn audit(books: &[Book], tw: &TopicWordMatrix) -> CoreResult<()> {
    let mut rebuilt = TopicWordMatrix::zeros(tw.num_words(), tw.num_topics());

    for book in books {
        let mut charactercount = 0usize;
        for character in &book.characters {
            charactercount += character.num_words();
            for (&word, &topic) in character.words.iter().zip(character.z.iter()) {
                rebuilt.increment(word, topic as usize);
            }
        }
        if charactercount as u64 != book.totalwords {
            let detail = format!(
                "book '{}': character word counts sum to {} but totalwords is {}",
                book.name, charactercount, book.totalwords
            );
            error!(%detail, "audit failed");
            return Err(CoreError::invariant(detail));
        }
    }

    if rebuilt != *tw {
        let detail = "reconstructed topic-word matrix does not match the maintained matrix";
        error!(detail, "audit failed");
        return Err(CoreError::invariant(detail));
    }

    Ok(())
}
