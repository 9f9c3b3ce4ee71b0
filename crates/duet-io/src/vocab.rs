//! Vocabulary construction: a frequency pass over the input file that
//! selects the `numwords` most common word-types (each word counted at
//! most once per character line) and writes them out for later reuse.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{IoError, IoResult};
use crate::records::split_fields;

/// An ordered vocabulary plus the word -> index lexicon built from it.
/// Index order matches descending frequency, ties broken by first-seen
/// order (matching `collections.Counter.most_common`).
pub struct Vocabulary {
    pub words: Vec<String>,
    pub counts: Vec<u64>,
    lexicon: HashMap<String, u32>,
}

impl Vocabulary {
    fn from_words_and_counts(words: Vec<String>, counts: Vec<u64>) -> Self {
        let mut lexicon = HashMap::with_capacity(words.len());
        for (idx, word) in words.iter().enumerate() {
            lexicon.insert(word.clone(), idx as u32);
        }
        Vocabulary {
            words,
            counts,
            lexicon,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of `word` in the selected vocabulary, if it was selected.
    pub fn index_of(&self, word: &str) -> Option<u32> {
        self.lexicon.get(word).copied()
    }

    /// Read back a `word\tcount` file previously written by
    /// [`Vocabulary::write_to`], preserving its order as the index order.
    pub fn load(path: &Path) -> IoResult<Self> {
        let file = fs::File::open(path)
            .map_err(|e| IoError::malformed(0, format!("cannot open {}: {e}", path.display())))?;
        let reader = BufReader::new(file);

        let mut words = Vec::new();
        let mut counts = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| IoError::malformed(line_no + 1, format!("read error: {e}")))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut parts = trimmed.splitn(2, '\t');
            let word = parts
                .next()
                .ok_or_else(|| IoError::malformed(line_no + 1, "missing word field"))?;
            let count = parts
                .next()
                .ok_or_else(|| IoError::malformed(line_no + 1, "missing count field"))?
                .parse::<u64>()
                .map_err(|e| IoError::malformed(line_no + 1, format!("bad count: {e}")))?;
            words.push(word.to_string());
            counts.push(count);
        }

        Ok(Vocabulary::from_words_and_counts(words, counts))
    }

    /// Write this vocabulary as `word\tcount` lines, in its existing order.
    pub fn write_to(&self, path: &Path) -> IoResult<()> {
        let mut file = fs::File::create(path)
            .map_err(|e| IoError::malformed(0, format!("cannot create {}: {e}", path.display())))?;
        for (word, count) in self.words.iter().zip(self.counts.iter()) {
            writeln!(file, "{word}\t{count}")
                .map_err(|e| IoError::malformed(0, format!("write error: {e}")))?;
        }
        Ok(())
    }

    /// Scan `path` line by line (capped at `maxlines`, if given), counting
    /// each distinct word once per line, then keep the top `numwords`.
    pub fn build(path: &Path, numwords: usize, maxlines: Option<usize>) -> IoResult<Self> {
        let file = fs::File::open(path)
            .map_err(|e| IoError::malformed(0, format!("cannot open {}: {e}", path.display())))?;
        let reader = BufReader::new(file);

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, u64> = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            if let Some(cap) = maxlines {
                if line_no >= cap {
                    break;
                }
            }
            let line = line
                .map_err(|e| IoError::malformed(line_no + 1, format!("read error: {e}")))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Ok((_, _, words)) = split_fields(trimmed, line_no + 1) else {
                continue;
            };

            let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
            for w in &words {
                if !seen.insert(w.as_str()) {
                    continue;
                }
                match counts.get_mut(w.as_str()) {
                    Some(c) => *c += 1,
                    None => {
                        counts.insert(w.clone(), 1);
                        order.push(w.clone());
                    }
                }
            }
        }

        let mut entries: Vec<(String, u64)> = order
            .into_iter()
            .map(|w| {
                let c = counts[&w];
                (w, c)
            })
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(numwords);

        let words: Vec<String> = entries.iter().map(|(w, _)| w.clone()).collect();
        let counts: Vec<u64> = entries.iter().map(|(_, c)| *c).collect();

        tracing::info!(selected = words.len(), "vocabulary built");
        Ok(Vocabulary::from_words_and_counts(words, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_corpus(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f
    }

    #[test]
    fn counts_each_word_once_per_character() {
        let f = write_corpus(&[
            "book1|c1 label the the cat sat",
            "book1|c2 label the dog ran",
        ]);
        let vocab = Vocabulary::build(f.path(), 10, None).unwrap();
        // "the" appears in both lines but only once per line -> count 2
        let the_idx = vocab.index_of("the").unwrap();
        assert!(the_idx < vocab.len() as u32);
    }

    #[test]
    fn truncates_to_numwords_by_descending_frequency() {
        let f = write_corpus(&[
            "book1|c1 label a a a b b c",
            "book1|c2 label a b",
        ]);
        let vocab = Vocabulary::build(f.path(), 2, None).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.index_of("a").is_some());
        assert!(vocab.index_of("b").is_some());
        assert!(vocab.index_of("c").is_none());
    }

    #[test]
    fn respects_maxlines_cap() {
        let f = write_corpus(&[
            "book1|c1 label only this line",
            "book1|c2 label skip this entirely",
        ]);
        let vocab = Vocabulary::build(f.path(), 10, Some(1)).unwrap();
        assert!(vocab.index_of("skip").is_none());
        assert!(vocab.index_of("only").is_some());
    }

    #[test]
    fn write_then_load_preserves_order_and_counts() {
        let f = write_corpus(&["book1|c1 label a a a b b c"]);
        let built = Vocabulary::build(f.path(), 3, None).unwrap();

        let out = tempfile::NamedTempFile::new().unwrap();
        built.write_to(out.path()).unwrap();
        let reloaded = Vocabulary::load(out.path()).unwrap();

        assert_eq!(reloaded.words, built.words);
        assert_eq!(reloaded.counts, built.counts);
    }
}
