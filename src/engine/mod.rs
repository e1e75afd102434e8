pub mod dictionary;
pub mod neurons;
pub mod scoring;

use std::path::PathBuf;

pub use dictionary::Dictionary;
pub use neurons::{NeuronEngine, WordListLoader};

/// A single correction candidate as ranked by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub word: String,
    /// Normalized score in `[0, 1]`
    pub score: f64,
    /// `candidate length - query length`, in chars
    pub len_diff: i32,
}

/// Result of one lookup. Candidate order is the engine's ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correction {
    pub candidates: Vec<Candidate>,
    pub words_touched: usize,
}

impl Correction {
    /// True if `word` appears verbatim among the candidates
    pub fn contains(&self, word: &str) -> bool {
        self.candidates.iter().any(|c| c.word == word)
    }

    pub fn words(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.word.clone()).collect()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// One letter-pair bucket of an index, as reported by `Corrector::neuron`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuronInfo {
    pub key: String,
    pub size: usize,
    pub sample: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dictionary {path} contains no words")]
    EmptyDictionary { path: PathBuf },

    #[error("Malformed entry at {path}:{line}: {entry:?}")]
    Malformed {
        path: PathBuf,
        line: usize,
        entry: String,
    },

    #[error("Failed to build dictionary index: {0}")]
    Index(#[from] fst::Error),

    #[error("Invalid accuracy {value:?}: expected a fraction in (0, 1] or a percentage such as 90 or 90%")]
    InvalidAccuracy { value: String },
}

/// A loaded dictionary plus its index.
///
/// Implementations keep per-lookup scratch state, so every method that
/// corrects takes `&mut self`. A handle may move between threads but is only
/// ever used by one caller at a time.
pub trait Corrector: Send {
    fn correct(&mut self, word: &str, strict_len: bool) -> Correction;

    fn words(&self) -> Vec<String>;

    fn word_count(&self) -> usize;

    /// Size of the largest index bucket
    fn max_index_size(&self) -> usize;

    /// Histogram of bucket sizes as `(size, bucket_count)`, ascending by size
    fn index_sizes(&self) -> Vec<(usize, usize)>;

    /// The buckets a lookup of `word` would visit
    fn neuron(&self, word: &str) -> Vec<NeuronInfo>;

    /// Keep candidates scoring at least `accuracy` times the best score.
    /// `accuracy` is already validated to lie in `(0, 1]`.
    fn apply_accuracy(&mut self, accuracy: f64);

    /// Parse a user-supplied accuracy and apply it.
    fn set_accuracy(&mut self, arg: &str) -> Result<(), EngineError> {
        self.apply_accuracy(parse_accuracy(arg)?);
        Ok(())
    }

    fn accuracy(&self) -> f64;
}

/// Creates engine handles from one dictionary source.
///
/// `strict` controls how loudly (and how pickily) the source is read; the
/// startup load is strict, pool growth is not.
pub trait Loader: Send + Sync {
    type Handle: Corrector;

    fn load(&self, strict: bool) -> Result<Self::Handle, EngineError>;
}

/// Strip every whitespace character from `input`.
pub fn remove_spaces(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse an accuracy argument: `0.9`, `90` and `90%` all mean 90%.
///
/// A bare number up to 1 is a fraction. Above 1 it must be a whole
/// percentage unless it carries a `%`, so `1.5` is rejected rather than
/// read as 1.5%.
pub fn parse_accuracy(arg: &str) -> Result<f64, EngineError> {
    let trimmed = arg.trim();
    let invalid = || EngineError::InvalidAccuracy {
        value: trimmed.to_string(),
    };

    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(n) => (n.trim(), true),
        None => (trimmed, false),
    };
    let value: f64 = number.parse().map_err(|_| invalid())?;
    let value = if percent {
        value / 100.0
    } else if value > 1.0 {
        if value.fract() != 0.0 {
            return Err(invalid());
        }
        value / 100.0
    } else {
        value
    };

    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(invalid())
    }
}
