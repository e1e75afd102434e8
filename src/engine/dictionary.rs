use super::EngineError;
use fst::{Set, SetBuilder, Streamer};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Sorted, deduplicated word set backed by an in-memory FST.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load a plain word list: one word per line, blank lines and `#`
    /// comments ignored.
    ///
    /// In strict mode an entry containing whitespace is an error and the load
    /// summary is logged at info level. Otherwise such entries are skipped.
    pub fn load_word_list(path: &Path, strict: bool) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut words = Vec::new();
        let mut skipped = 0usize;

        for (idx, line) in content.lines().enumerate() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            if entry.chars().any(char::is_whitespace) {
                if strict {
                    return Err(EngineError::Malformed {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        entry: entry.to_string(),
                    });
                }
                skipped += 1;
                continue;
            }
            words.push(entry.to_string());
        }

        let dictionary = Self::from_words(words)?;
        if dictionary.is_empty() {
            return Err(EngineError::EmptyDictionary {
                path: path.to_path_buf(),
            });
        }

        if strict {
            info!(
                path = %path.display(),
                words = dictionary.len(),
                "Loaded dictionary"
            );
        } else {
            debug!(
                path = %path.display(),
                words = dictionary.len(),
                skipped,
                "Loaded dictionary copy"
            );
        }

        Ok(dictionary)
    }

    /// Build a dictionary from arbitrary words (useful for testing)
    pub fn from_words<I, S>(words: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = words.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();

        let mut builder = SetBuilder::memory();
        for word in &sorted {
            builder.insert(word.as_bytes())?;
        }
        let set = Set::new(builder.into_inner()?)?;

        Ok(Self { set })
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// All words in byte order
    pub fn all_words(&self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.set.len());
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                words.push(word);
            }
        }

        words
    }
}
