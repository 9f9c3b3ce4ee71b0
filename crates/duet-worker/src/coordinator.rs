//! The shard coordinator: the outer iteration loop that shuffles books,
//! partitions them across parallel workers, merges their deltas, and
//! periodically rebalances `alpha` and audits count consistency.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use duet_core::counts::TopicWordMatrix;
use duet_core::error::{CoreError, CoreResult};
use duet_core::hyper::Hyperparameters;
use duet_core::model::Book;

use crate::partition::{shuffle_and_partition, stride_partition};
use crate::report::Reporter;
use crate::seed::shard_seed;
use crate::sweep::run_sweep;

/// Number of tokens worth of top-word reports and alpha rebalancing.
const REPORT_EVERY: usize = 20;
/// Iteration past which alpha rebalancing is allowed to kick in.
const ALPHA_REBALANCE_AFTER: usize = 99;
/// Audit cadence: runs whenever `iteration % AUDIT_EVERY == AUDIT_OFFSET`.
const AUDIT_EVERY: usize = 50;
const AUDIT_OFFSET: usize = 1;

/// Owns the authoritative `TW`, the global book list, and the
/// hyperparameters between iterations. Workers receive disjoint, owned
/// partitions of the book list plus a private copy of `TW` for the
/// duration of one sweep; nothing is shared mutably across threads.
pub struct Coordinator {
    pub books: Vec<Book>,
    pub tw: TopicWordMatrix,
    pub hyper: Hyperparameters,
    pub num_themes: usize,
    pub num_processes: usize,
}

impl Coordinator {
    pub fn new(
        books: Vec<Book>,
        tw: TopicWordMatrix,
        hyper: Hyperparameters,
        num_themes: usize,
        num_processes: usize,
    ) -> Self {
        Coordinator {
            books,
            tw,
            hyper,
            num_themes,
            num_processes,
        }
    }

    /// Run `num_iterations` coordinator rounds, reporting through `reporter`.
    pub fn run(&mut self, num_iterations: usize, reporter: &mut dyn Reporter) -> CoreResult<()> {
        // Iteration 0 partitions the initial order without shuffling; every
        // later iteration reshuffles the freshly-merged book list first.
        let mut shards: Vec<Vec<Book>> =
            stride_partition(std::mem::take(&mut self.books), self.num_processes);

        for iteration in 0..num_iterations {
            if iteration > 0 {
                let mut shuffle_rng = ChaCha8Rng::seed_from_u64(iteration as u64);
                let pooled: Vec<Book> = shards.into_iter().flatten().collect();
                shards = shuffle_and_partition(pooled, self.num_processes, &mut shuffle_rng);
            }

            let snapshots: Vec<TopicWordMatrix> = shards.iter().map(|_| self.tw.clone()).collect();
            let seeds: Vec<u64> = (0..self.num_processes)
                .map(|s| shard_seed(s, iteration))
                .collect();

            let outcomes = self.dispatch_sweeps(&mut shards, snapshots, &seeds)?;

            // Widen every shard's 16-bit delta to 64-bit and reduce them in
            // that domain before the single merge into the authoritative
            // TW (spec §4.4 step 5: `TW <- TW + sum_s DeltaTW_s`). The
            // reduction has no ordering dependency (merge commutativity),
            // so it runs across rayon's pool, but it must never re-sum two
            // DeltaMatrixes against each other at 16-bit width first: a
            // cell common enough to be hit by every shard can exceed
            // i16::MAX once their deltas are combined, even though no
            // single shard's delta can.
            let cells = self.tw.num_words() * self.tw.num_topics();
            let merged: Vec<i64> = outcomes
                .par_iter()
                .map(|outcome| outcome.delta.widen())
                .reduce(
                    || vec![0i64; cells],
                    |mut acc, widened| {
                        for (a, d) in acc.iter_mut().zip(widened.iter()) {
                            *a += d;
                        }
                        acc
                    },
                );
            self.tw.add_flat(&merged);

            let mut rebuilt_books = Vec::new();
            for outcome in outcomes.into_iter() {
                debug!(
                    iteration,
                    change_ratio = outcome.change_ratio,
                    "shard sweep complete"
                );
                rebuilt_books.extend(outcome.books);
            }

            shards = stride_partition(rebuilt_books, self.num_processes);

            if iteration % REPORT_EVERY == 0 {
                reporter.report(iteration, &self.tw);
                if iteration > ALPHA_REBALANCE_AFTER {
                    let column_sums = self.tw.column_sums();
                    self.hyper.rescale(&column_sums);
                    let alpha = &self.hyper.alpha;
                    info!(iteration, ?alpha, "rescaled alpha");
                }
            }

            if iteration % AUDIT_EVERY == AUDIT_OFFSET {
                let flat: Vec<Book> = shards.iter().flat_map(|s| s.iter().cloned()).collect();
                if let Err(err) = duet_core::run_audit(&flat, &self.tw) {
                    warn!(iteration, %err, "audit failed");
                    return Err(err);
                }
            }
        }

        self.books = shards.into_iter().flatten().collect();
        Ok(())
    }

    fn dispatch_sweeps(
        &self,
        shards: &mut Vec<Vec<Book>>,
        snapshots: Vec<TopicWordMatrix>,
        seeds: &[u64],
    ) -> CoreResult<Vec<crate::sweep::SweepOutcome>> {
        let alpha = self.hyper.alpha.clone();
        let beta = self.hyper.beta;
        let num_themes = self.num_themes;
        let taken: Vec<Vec<Book>> = std::mem::take(shards);

        let mut results: Vec<Option<CoreResult<crate::sweep::SweepOutcome>>> =
            (0..taken.len()).map(|_| None).collect();

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(taken.len());
            for (shard_idx, ((books, tw), &seed)) in
                taken.into_iter().zip(snapshots.into_iter()).zip(seeds.iter()).enumerate()
            {
                let alpha = &alpha;
                handles.push((
                    shard_idx,
                    scope.spawn(move || run_sweep(books, tw, alpha, beta, num_themes, seed)),
                ));
            }
            for (shard_idx, handle) in handles {
                let outcome = handle
                    .join()
                    .map_err(|_| CoreError::worker(shard_idx, "worker thread panicked"));
                results[shard_idx] = Some(outcome.and_then(|r| r));
            }
        });

        results
            .into_iter()
            .map(|r| r.expect("every shard index is filled exactly once"))
            .collect()
    }
}
