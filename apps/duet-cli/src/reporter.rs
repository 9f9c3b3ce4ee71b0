//! Top-word reporting: prints the twelve most-counted words per topic,
//! colored by whether the topic is a theme or a role.

use colored::Colorize;
use duet_core::counts::TopicWordMatrix;
use duet_io::Vocabulary;
use duet_worker::Reporter;

pub struct TopWordReporter<'a> {
    vocab: &'a Vocabulary,
    num_themes: usize,
    top_n: usize,
}

impl<'a> TopWordReporter<'a> {
    pub fn new(vocab: &'a Vocabulary, num_themes: usize, top_n: usize) -> Self {
        TopWordReporter {
            vocab,
            num_themes,
            top_n,
        }
    }
}

impl Reporter for TopWordReporter<'_> {
    fn report(&mut self, iteration: usize, tw: &TopicWordMatrix) {
        println!("{}", format!("ITERATION {iteration}").bold());
        let column_sums = tw.column_sums();
        for topic in 0..tw.num_topics() {
            let label = if topic < self.num_themes {
                format!("theme {topic}").blue()
            } else {
                format!("role {}", topic - self.num_themes).yellow()
            };
            let words: Vec<String> = tw
                .top_words(topic, self.top_n)
                .into_iter()
                .map(|(w, _)| {
                    self.vocab
                        .words
                        .get(w as usize)
                        .cloned()
                        .unwrap_or_else(|| "?".to_string())
                })
                .collect();
            let total: i64 = column_sums[topic];
            println!("{label}: {}   {total}", words.join(" | "));
        }
        println!();
    }
}
