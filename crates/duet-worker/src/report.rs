//! Periodic top-word reporting hook, invoked by the coordinator every 20
//! iterations (spec section 6). Kept as a trait so the worker crate stays
//! ignorant of vocabulary lookups and output formatting, both of which are
//! `duet-io`/CLI concerns.

use duet_core::counts::TopicWordMatrix;

pub trait Reporter {
    fn report(&mut self, iteration: usize, tw: &TopicWordMatrix);
}

/// Default reporter used when no caller-supplied one is configured.
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&mut self, _iteration: usize, _tw: &TopicWordMatrix) {}
}
