//! Books, characters, and the topic bookkeeping they carry.
//!
//! A [`Book`] owns its [`Character`]s by value, which keeps ownership a tree
//! (per the design note on character/book back-references): there is no
//! separate character registry with back-pointers into books, so a mutable
//! handle to one book is always enough to update both its own theme counts
//! and the role counts of any character within it.

/// Largest topic count representable in the 16-bit signed assignment array
/// (`z` must fit in `i16`, so `K` is bounded below `i16::MAX`).
pub const MAX_TOPICS: usize = i16::MAX as usize;

/// Largest number of word-types a single character may carry without being
/// skipped at load time (see [`MIN_CHARACTER_WORDS`] for the lower bound).
pub const MAX_CHARACTER_WORDS: usize = 32_767;

/// Smallest number of in-vocabulary word-types a character needs to
/// participate in sampling.
pub const MIN_CHARACTER_WORDS: usize = 10;

/// A character: a dense token stream plus its current topic assignments and
/// the role-count vector those assignments induce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    /// Word-type id per token, indices into the shared vocabulary.
    pub words: Vec<u32>,
    /// Current topic assignment per token. Themes are `< numthemes`, roles
    /// are `>= numthemes`.
    pub z: Vec<i16>,
    /// `rho[r]` = count of tokens in this character currently assigned role `r`.
    pub rho: Vec<i64>,
}

impl Character {
    pub fn new(name: impl Into<String>, words: Vec<u32>, num_roles: usize) -> Self {
        let n = words.len();
        Character {
            name: name.into(),
            words,
            z: vec![0; n],
            rho: vec![0; num_roles],
        }
    }

    /// Number of tokens this character carries (`n_c` in the spec).
    pub fn num_words(&self) -> usize {
        self.words.len()
    }
}

/// A book: the theme-count vector shared by all of its characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    /// `theta[t]` = count of tokens across all characters of this book
    /// currently assigned theme `t`.
    pub theta: Vec<i64>,
    pub characters: Vec<Character>,
    /// Sum of `characters[..].num_words()`, fixed once the book is loaded.
    pub totalwords: u64,
}

impl Book {
    pub fn new(name: impl Into<String>, num_themes: usize) -> Self {
        Book {
            name: name.into(),
            theta: vec![0; num_themes],
            characters: Vec::new(),
            totalwords: 0,
        }
    }

    pub fn add_character(&mut self, character: Character) {
        self.totalwords += character.num_words() as u64;
        self.characters.push(character);
    }

    /// Decrement the theme or role slot for `topic` on the given character,
    /// per whether `topic` is a theme (`< num_themes`) or a role.
    pub fn decrement_topic(&mut self, char_idx: usize, topic: i16, num_themes: usize) {
        if (topic as usize) < num_themes {
            self.theta[topic as usize] -= 1;
        } else {
            self.characters[char_idx].rho[topic as usize - num_themes] -= 1;
        }
    }

    /// Increment the theme or role slot for `topic` on the given character.
    pub fn increment_topic(&mut self, char_idx: usize, topic: i16, num_themes: usize) {
        if (topic as usize) < num_themes {
            self.theta[topic as usize] += 1;
        } else {
            self.characters[char_idx].rho[topic as usize - num_themes] += 1;
        }
    }

    /// Total token count owned by this book, recomputed from its characters.
    pub fn token_count(&self) -> usize {
        self.characters.iter().map(Character::num_words).sum()
    }
}
