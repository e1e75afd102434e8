use super::{Eligibility, HandlePool, LetterFilter, Limiter};
use crate::engine::{Corrector, Loader};
use anyhow::{Context, Result};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Bit pattern meaning "no accuracy set": handles keep what their loader gave them.
const LOADER_ACCURACY: u64 = u64::MAX;

/// Outcome of one parallel benchmark run.
#[derive(Debug, Clone, Default)]
pub struct BenchReport {
    pub letters: String,
    pub strict_len: bool,
    pub scheduled: usize,
    pub skipped: usize,
    /// Words with no test letter, never scheduled
    pub rejected: usize,
    /// Word → candidates, for every word with more than one candidate
    pub ambiguous: BTreeMap<String, Vec<String>>,
    /// Word → error, for tasks that could not get a dictionary handle
    pub failures: BTreeMap<String, String>,
    pub elapsed: Duration,
    pub concurrency: usize,
    pub handles_created: usize,
    pub peak_in_flight: usize,
}

/// Corrects many words at once over a pool of dictionary handles.
///
/// At most `concurrency` tasks run at any instant: the limiter admits a
/// task before it is spawned, and the worker pool has the same number of
/// threads. A run returns only after every spawned task has finished.
pub struct ParallelBench<L: Loader> {
    pool: HandlePool<L>,
    limiter: Limiter,
    workers: rayon::ThreadPool,
    /// `f64` bits applied to every handle on checkout
    accuracy: AtomicU64,
}

impl<L: Loader> ParallelBench<L> {
    pub fn new(loader: L, concurrency: usize) -> Result<Self> {
        let limiter = Limiter::new(concurrency);
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(limiter.capacity())
            .thread_name(|i| format!("bench-worker-{}", i))
            .build()
            .context("Failed to start benchmark worker threads")?;

        Ok(Self {
            pool: HandlePool::new(loader),
            limiter,
            workers,
            accuracy: AtomicU64::new(LOADER_ACCURACY),
        })
    }

    /// Accuracy every pooled handle uses from its next checkout on.
    pub fn set_accuracy(&self, accuracy: f64) {
        self.accuracy.store(accuracy.to_bits(), Ordering::Relaxed);
    }

    /// The accuracy set with [`set_accuracy`](Self::set_accuracy), if any
    pub fn accuracy(&self) -> Option<f64> {
        match self.accuracy.load(Ordering::Relaxed) {
            LOADER_ACCURACY => None,
            bits => Some(f64::from_bits(bits)),
        }
    }

    pub fn pool(&self) -> &HandlePool<L> {
        &self.pool
    }

    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    pub fn concurrency(&self) -> usize {
        self.limiter.capacity()
    }

    /// Correct every word whose test letter is in `letters`.
    ///
    /// `on_ambiguous` is called from worker threads, in no particular order,
    /// for each word that corrects to more than one candidate.
    pub fn run<F>(&self, words: &[String], letters: &str, strict_len: bool, on_ambiguous: F) -> BenchReport
    where
        F: Fn(&str, &[String]) + Sync,
    {
        let filter = LetterFilter::new(letters);
        let ambiguous: DashMap<String, Vec<String>> = DashMap::new();
        let failures: DashMap<String, String> = DashMap::new();
        let (mut scheduled, mut skipped, mut rejected) = (0, 0, 0);

        self.limiter.reset_peak();
        let start = Instant::now();

        self.workers.in_place_scope(|scope| {
            for word in words {
                match filter.classify(word) {
                    Eligibility::Scheduled => scheduled += 1,
                    Eligibility::Skipped => {
                        skipped += 1;
                        continue;
                    }
                    Eligibility::Rejected => {
                        rejected += 1;
                        continue;
                    }
                }

                let permit = self.limiter.acquire();
                let (ambiguous, failures, on_ambiguous) = (&ambiguous, &failures, &on_ambiguous);
                scope.spawn(move |_| {
                    let _permit = permit;
                    self.correct_one(word, strict_len, ambiguous, failures, on_ambiguous);
                });
            }
        });

        let elapsed = start.elapsed();
        debug!(scheduled, ?elapsed, "Parallel run finished");

        BenchReport {
            letters: filter.letters().to_string(),
            strict_len,
            scheduled,
            skipped,
            rejected,
            ambiguous: ambiguous.into_iter().collect(),
            failures: failures.into_iter().collect(),
            elapsed,
            concurrency: self.concurrency(),
            handles_created: self.pool.created(),
            peak_in_flight: self.limiter.peak(),
        }
    }

    fn correct_one<F>(
        &self,
        word: &str,
        strict_len: bool,
        ambiguous: &DashMap<String, Vec<String>>,
        failures: &DashMap<String, String>,
        on_ambiguous: &F,
    ) where
        F: Fn(&str, &[String]) + Sync,
    {
        let mut handle = match self.pool.checkout() {
            Ok(handle) => handle,
            Err(err) => {
                error!(word, error = %err, "Benchmark task could not load a dictionary");
                failures.insert(word.to_string(), err.to_string());
                return;
            }
        };

        if let Some(accuracy) = self.accuracy() {
            handle.apply_accuracy(accuracy);
        }

        let correction = handle.correct(word, strict_len);
        if correction.is_ambiguous() {
            let candidates = correction.words();
            on_ambiguous(word, &candidates);
            ambiguous.insert(word.to_string(), candidates);
        }
    }
}
