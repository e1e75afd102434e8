pub mod bench;
pub mod cli;
pub mod config;
pub mod engine;

#[cfg(test)]
pub(crate) mod test_support;

pub use bench::{HandlePool, Limiter, ParallelBench};
pub use cli::{Dispatcher, Flow};
pub use config::Config;
pub use engine::{Corrector, Loader, NeuronEngine, WordListLoader};

use std::num::NonZeroUsize;
use std::thread;

/// One task per logical CPU, or one if that can't be determined
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
